//! Selection rectangle editor, the functional core of the overlay.
//!
//! Owns the rectangle geometry and the drag flags. The host feeds it
//! left-button and move events in overlay coordinates and renders whatever
//! `view()` returns. No windowing types cross this boundary.

pub mod cursor;
pub mod geometry;

pub use cursor::{cursor_for_zone, CursorShape, CursorTracker};
pub use geometry::{Point, Rect, ScreenSize};
pub use hit_test::{hit_test, HitZone, EDGE_GAP};

use crate::capture::CaptureRegion;
use serde::Serialize;

/// Edits that leave a side at or below this many pixels are discarded.
pub const MIN_RECT_SIZE: Point = Point { x: 5.0, y: 5.0 };

/// Where the editor is in the create → edit lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EditorPhase {
    /// No rectangle yet.
    Idle,
    /// Left button held, growing a new rectangle from its anchor.
    Creating,
    /// Rectangle finalized, button released.
    Drawn,
    /// Left button held on a drawn rectangle; `Body` moves, edges resize.
    Editing(HitZone),
}

/// Result of a left-button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// Double-click on a valid rectangle: run the capture pipeline.
    TriggerPipeline,
    /// The press was consumed by the editor.
    Edited,
}

/// Snapshot handed to the UI after every event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorView {
    pub rect: Rect,
    /// CSS cursor name, present only when the cursor changed.
    pub cursor: Option<&'static str>,
    pub drawn: bool,
    pub valid: bool,
}

#[derive(Debug)]
pub struct RectangleEditor {
    rect: Rect,
    screen: ScreenSize,
    is_dragging: bool,
    is_rect_drawn: bool,
    is_left_button_down: bool,
    last_mouse_point: Point,
    current_zone: HitZone,
    cursor: CursorTracker,
}

impl RectangleEditor {
    pub fn new(screen: ScreenSize) -> Self {
        Self {
            rect: Rect::default(),
            screen,
            is_dragging: false,
            is_rect_drawn: false,
            is_left_button_down: false,
            last_mouse_point: Point::default(),
            current_zone: HitZone::None,
            cursor: CursorTracker::default(),
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// The overlay was resized; clamping uses the new bounds from now on.
    pub fn set_screen_size(&mut self, screen: ScreenSize) {
        self.screen = screen;
    }

    pub fn is_valid(&self) -> bool {
        self.rect.is_valid()
    }

    pub fn phase(&self) -> EditorPhase {
        match (self.is_rect_drawn, self.is_left_button_down) {
            (false, false) => EditorPhase::Idle,
            (false, true) => EditorPhase::Creating,
            (true, true) if self.is_dragging => EditorPhase::Editing(self.current_zone),
            (true, _) => EditorPhase::Drawn,
        }
    }

    /// Discard the rectangle and return to `Idle`.
    pub fn reset(&mut self) {
        self.rect = Rect::default();
        self.is_dragging = false;
        self.is_rect_drawn = false;
        self.current_zone = HitZone::None;
        self.cursor.set(CursorShape::Arrow);
    }

    /// Region to capture: the rectangle minus its drawn border.
    pub fn capture_region(&self, border_thickness: u32) -> Option<CaptureRegion> {
        if !self.is_valid() {
            return None;
        }
        CaptureRegion::inside_border(&self.rect, border_thickness)
    }

    /// Left button pressed at `point`. `click_count` is 2 for a double-click.
    pub fn left_button_down(&mut self, point: Point, click_count: u32) -> PressOutcome {
        self.is_left_button_down = true;

        if self.is_valid() && click_count == 2 {
            return PressOutcome::TriggerPipeline;
        }

        self.update_zone(point);

        if self.is_rect_drawn && self.current_zone == HitZone::None {
            log::debug!("[EDITOR] Press outside the selection, discarding it");
            self.reset();
        }

        self.last_mouse_point = point;

        if self.is_rect_drawn {
            self.is_dragging = true;
            log::debug!(
                "[EDITOR] {} by {:?}",
                if self.current_zone.is_resize() { "Resizing" } else { "Moving" },
                self.current_zone
            );
        } else {
            // Anchor for a new rectangle.
            self.rect.left = point.x;
            self.rect.top = point.y;
        }

        PressOutcome::Edited
    }

    pub fn left_button_up(&mut self) {
        self.is_dragging = false;
        self.is_left_button_down = false;

        if self.is_valid() {
            self.is_rect_drawn = true;
        }

        self.cursor.apply(self.current_zone);
    }

    pub fn mouse_move(&mut self, point: Point) {
        if !self.is_left_button_down {
            self.update_zone(point);
            return;
        }

        if !self.is_rect_drawn {
            self.grow_from_anchor(point);
            self.update_zone(point);
            return;
        }

        if self.is_dragging {
            self.drag(point);
        } else {
            self.update_zone(point);
        }
    }

    /// Current state for the UI. Consumes the pending cursor change.
    pub fn view(&mut self) -> EditorView {
        EditorView {
            rect: self.rect,
            cursor: self.cursor.take_change().map(CursorShape::css_name),
            drawn: self.is_rect_drawn,
            valid: self.is_valid(),
        }
    }

    fn update_zone(&mut self, point: Point) {
        self.current_zone = hit_test(point, &self.rect);
        self.cursor.apply(self.current_zone);
    }

    /// Creation only grows down-right from the anchor; both deltas must
    /// exceed the minimum size before anything is committed.
    fn grow_from_anchor(&mut self, point: Point) {
        let delta_x = point.x - self.last_mouse_point.x;
        let delta_y = point.y - self.last_mouse_point.y;

        if delta_x > MIN_RECT_SIZE.x && delta_y > MIN_RECT_SIZE.y {
            self.rect.width = delta_x;
            self.rect.height = delta_y;
        }
    }

    fn drag(&mut self, point: Point) {
        let delta_x = point.x - self.last_mouse_point.x;
        let delta_y = point.y - self.last_mouse_point.y;

        let mut next = clamp_to_screen(self.rect, self.screen);
        apply_zone_delta(&mut next, self.current_zone, delta_x, delta_y);

        // Don't collapse or invert; the whole frame is dropped instead.
        if next.width > MIN_RECT_SIZE.x && next.height > MIN_RECT_SIZE.y {
            self.rect = next;
            self.last_mouse_point = point;
        }
    }
}

/// Pull the rectangle back on-screen before an edit is applied.
pub fn clamp_to_screen(rect: Rect, screen: ScreenSize) -> Rect {
    let mut next = rect;

    if next.left <= 0.0 {
        next.left = 0.0;
    }
    if next.top <= 0.0 {
        next.top = 0.0;
    }
    if next.width > screen.width {
        next.width = screen.width;
    }
    if next.height > screen.height {
        next.height = screen.height;
    }
    if next.left + next.width >= screen.width {
        next.left -= next.left + next.width - screen.width;
    }
    if next.top + next.height >= screen.height {
        next.top -= next.top + next.height - screen.height;
    }

    next
}

/// Move or resize `rect` by the mouse delta according to the grabbed zone.
pub fn apply_zone_delta(rect: &mut Rect, zone: HitZone, delta_x: f64, delta_y: f64) {
    match zone {
        HitZone::Body => {
            rect.left += delta_x;
            rect.top += delta_y;
        }
        HitZone::TopLeft => {
            rect.left += delta_x;
            rect.top += delta_y;
            rect.width -= delta_x;
            rect.height -= delta_y;
        }
        HitZone::TopRight => {
            rect.top += delta_y;
            rect.width += delta_x;
            rect.height -= delta_y;
        }
        HitZone::BottomRight => {
            rect.width += delta_x;
            rect.height += delta_y;
        }
        HitZone::BottomLeft => {
            rect.left += delta_x;
            rect.width -= delta_x;
            rect.height += delta_y;
        }
        HitZone::Left => {
            rect.left += delta_x;
            rect.width -= delta_x;
        }
        HitZone::Right => {
            rect.width += delta_x;
        }
        HitZone::Top => {
            rect.top += delta_y;
            rect.height -= delta_y;
        }
        HitZone::Bottom => {
            rect.height += delta_y;
        }
        HitZone::None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: ScreenSize = ScreenSize {
        width: 1920.0,
        height: 1080.0,
    };

    fn editor_with_rect(from: Point, to: Point) -> RectangleEditor {
        let mut editor = RectangleEditor::new(SCREEN);
        editor.left_button_down(from, 1);
        editor.mouse_move(to);
        editor.left_button_up();
        editor
    }

    fn drag(editor: &mut RectangleEditor, from: Point, to: Point) {
        editor.left_button_down(from, 1);
        editor.mouse_move(to);
        editor.left_button_up();
    }

    #[test]
    fn new_editor_is_idle_and_empty() {
        let editor = RectangleEditor::new(SCREEN);
        assert_eq!(editor.phase(), EditorPhase::Idle);
        assert_eq!(editor.rect(), Rect::default());
        assert!(!editor.is_valid());
    }

    #[test]
    fn dragging_creates_rectangle_from_anchor() {
        let editor = editor_with_rect(Point::new(100.0, 100.0), Point::new(300.0, 250.0));
        assert_eq!(editor.rect(), Rect::new(100.0, 100.0, 200.0, 150.0));
        assert_eq!(editor.phase(), EditorPhase::Drawn);
        assert!(editor.is_valid());
    }

    #[test]
    fn creation_phase_is_reported_while_button_held() {
        let mut editor = RectangleEditor::new(SCREEN);
        editor.left_button_down(Point::new(10.0, 10.0), 1);
        assert_eq!(editor.phase(), EditorPhase::Creating);
        editor.mouse_move(Point::new(50.0, 60.0));
        assert_eq!(editor.rect(), Rect::new(10.0, 10.0, 40.0, 50.0));
    }

    #[test]
    fn tiny_drag_creates_nothing() {
        let mut editor = editor_with_rect(Point::new(100.0, 100.0), Point::new(104.0, 200.0));
        assert!(!editor.is_valid());
        assert_eq!(editor.phase(), EditorPhase::Idle);
        assert!(!editor.view().drawn);
    }

    #[test]
    fn dragging_up_left_creates_nothing() {
        let editor = editor_with_rect(Point::new(300.0, 300.0), Point::new(100.0, 100.0));
        assert!(!editor.is_valid());
        assert!(editor.rect().width >= 0.0 && editor.rect().height >= 0.0);
    }

    #[test]
    fn shrinking_during_creation_keeps_last_valid_size() {
        let mut editor = RectangleEditor::new(SCREEN);
        editor.left_button_down(Point::new(100.0, 100.0), 1);
        editor.mouse_move(Point::new(200.0, 200.0));
        editor.mouse_move(Point::new(90.0, 90.0));
        editor.left_button_up();
        assert_eq!(editor.rect(), Rect::new(100.0, 100.0, 100.0, 100.0));
    }

    #[test]
    fn bottom_right_corner_resizes() {
        let mut editor = editor_with_rect(Point::new(100.0, 100.0), Point::new(300.0, 250.0));
        drag(&mut editor, Point::new(298.0, 248.0), Point::new(318.0, 268.0));
        assert_eq!(editor.rect(), Rect::new(100.0, 100.0, 220.0, 170.0));
    }

    #[test]
    fn left_edge_resizes() {
        let mut editor = editor_with_rect(Point::new(100.0, 100.0), Point::new(300.0, 250.0));
        drag(&mut editor, Point::new(102.0, 175.0), Point::new(132.0, 175.0));
        assert_eq!(editor.rect(), Rect::new(130.0, 100.0, 170.0, 150.0));
    }

    #[test]
    fn body_drag_moves_without_resizing() {
        let mut editor = editor_with_rect(Point::new(100.0, 100.0), Point::new(300.0, 250.0));
        drag(&mut editor, Point::new(200.0, 175.0), Point::new(250.0, 125.0));
        assert_eq!(editor.rect(), Rect::new(150.0, 50.0, 200.0, 150.0));
    }

    #[test]
    fn editing_phase_tracks_grabbed_zone() {
        let mut editor = editor_with_rect(Point::new(100.0, 100.0), Point::new(300.0, 250.0));
        editor.left_button_down(Point::new(200.0, 100.0), 1);
        assert_eq!(editor.phase(), EditorPhase::Editing(HitZone::Top));
        editor.mouse_move(Point::new(200.0, 80.0));
        assert_eq!(editor.rect(), Rect::new(100.0, 80.0, 200.0, 170.0));
        editor.left_button_up();
        assert_eq!(editor.phase(), EditorPhase::Drawn);
    }

    #[test]
    fn every_zone_follows_its_update_rule() {
        let base = Rect::new(100.0, 100.0, 200.0, 150.0);
        let (dx, dy) = (10.0, 20.0);
        let cases = [
            (HitZone::Body, Rect::new(110.0, 120.0, 200.0, 150.0)),
            (HitZone::TopLeft, Rect::new(110.0, 120.0, 190.0, 130.0)),
            (HitZone::TopRight, Rect::new(100.0, 120.0, 210.0, 130.0)),
            (HitZone::BottomRight, Rect::new(100.0, 100.0, 210.0, 170.0)),
            (HitZone::BottomLeft, Rect::new(110.0, 100.0, 190.0, 170.0)),
            (HitZone::Left, Rect::new(110.0, 100.0, 190.0, 150.0)),
            (HitZone::Right, Rect::new(100.0, 100.0, 210.0, 150.0)),
            (HitZone::Top, Rect::new(100.0, 120.0, 200.0, 130.0)),
            (HitZone::Bottom, Rect::new(100.0, 100.0, 200.0, 170.0)),
            (HitZone::None, base),
        ];
        for (zone, expected) in cases {
            let mut rect = base;
            apply_zone_delta(&mut rect, zone, dx, dy);
            assert_eq!(rect, expected, "{zone:?}");
        }
    }

    #[test]
    fn resize_below_minimum_is_rejected() {
        let mut editor = editor_with_rect(Point::new(100.0, 100.0), Point::new(300.0, 250.0));
        let before = editor.rect();

        // Pull the right edge past the left edge.
        editor.left_button_down(Point::new(298.0, 175.0), 1);
        editor.mouse_move(Point::new(50.0, 175.0));
        assert_eq!(editor.rect(), before);

        // Exactly the minimum is still rejected.
        editor.mouse_move(Point::new(103.0, 175.0));
        assert_eq!(editor.rect(), before);

        // The rejected frames did not move the last sampled point.
        editor.mouse_move(Point::new(288.0, 175.0));
        assert_eq!(editor.rect().width, 190.0);
        editor.left_button_up();
    }

    #[test]
    fn resize_never_leaves_minimum_size() {
        let mut editor = editor_with_rect(Point::new(100.0, 100.0), Point::new(300.0, 250.0));
        editor.left_button_down(Point::new(102.0, 102.0), 1);
        let mut p = Point::new(102.0, 102.0);
        for _ in 0..60 {
            p = Point::new(p.x + 7.0, p.y + 5.0);
            editor.mouse_move(p);
            let r = editor.rect();
            assert!(r.width > MIN_RECT_SIZE.x && r.height > MIN_RECT_SIZE.y, "{r:?}");
        }
    }

    #[test]
    fn move_is_clamped_to_screen_on_next_frame() {
        let mut editor = editor_with_rect(Point::new(100.0, 100.0), Point::new(300.0, 250.0));
        editor.left_button_down(Point::new(200.0, 175.0), 1);
        editor.mouse_move(Point::new(50.0, 175.0));
        assert_eq!(editor.rect().left, -50.0);
        // The next frame floors left at zero before applying its delta.
        editor.mouse_move(Point::new(50.0, 175.0));
        assert_eq!(editor.rect().left, 0.0);
        editor.left_button_up();
    }

    #[test]
    fn clamp_pulls_rectangle_back_on_screen() {
        let screen = ScreenSize::new(800.0, 600.0);
        assert_eq!(
            clamp_to_screen(Rect::new(-10.0, -5.0, 100.0, 100.0), screen),
            Rect::new(0.0, 0.0, 100.0, 100.0)
        );
        assert_eq!(
            clamp_to_screen(Rect::new(750.0, 550.0, 100.0, 100.0), screen),
            Rect::new(700.0, 500.0, 100.0, 100.0)
        );
        assert_eq!(
            clamp_to_screen(Rect::new(10.0, 10.0, 900.0, 700.0), screen),
            Rect::new(0.0, 0.0, 800.0, 600.0)
        );
    }

    #[test]
    fn press_outside_drawn_rectangle_resets() {
        let mut editor = editor_with_rect(Point::new(100.0, 100.0), Point::new(300.0, 250.0));
        editor.left_button_down(Point::new(500.0, 500.0), 1);
        assert!(!editor.is_valid());
        assert_eq!(editor.rect(), Rect::new(500.0, 500.0, 0.0, 0.0));
        assert_eq!(editor.phase(), EditorPhase::Creating);

        // The same press starts a new rectangle.
        editor.mouse_move(Point::new(600.0, 560.0));
        editor.left_button_up();
        assert_eq!(editor.rect(), Rect::new(500.0, 500.0, 100.0, 60.0));
    }

    #[test]
    fn double_click_on_valid_rectangle_triggers_pipeline() {
        let mut editor = editor_with_rect(Point::new(100.0, 100.0), Point::new(300.0, 250.0));
        let before = editor.rect();
        assert_eq!(
            editor.left_button_down(Point::new(200.0, 175.0), 2),
            PressOutcome::TriggerPipeline
        );
        editor.left_button_up();
        assert_eq!(editor.rect(), before);
    }

    #[test]
    fn double_click_without_rectangle_just_anchors() {
        let mut editor = RectangleEditor::new(SCREEN);
        assert_eq!(
            editor.left_button_down(Point::new(40.0, 40.0), 2),
            PressOutcome::Edited
        );
        assert_eq!(editor.rect(), Rect::new(40.0, 40.0, 0.0, 0.0));
    }

    #[test]
    fn hovering_reports_cursor_changes_once() {
        let mut editor = editor_with_rect(Point::new(100.0, 100.0), Point::new(300.0, 250.0));
        let _ = editor.view();

        editor.mouse_move(Point::new(200.0, 175.0));
        assert_eq!(editor.view().cursor, Some("all-scroll"));
        editor.mouse_move(Point::new(201.0, 176.0));
        assert_eq!(editor.view().cursor, None);

        editor.mouse_move(Point::new(101.0, 101.0));
        assert_eq!(editor.view().cursor, Some("nwse-resize"));
        editor.mouse_move(Point::new(50.0, 50.0));
        assert_eq!(editor.view().cursor, Some("default"));
    }

    #[test]
    fn capture_region_requires_valid_rectangle() {
        let editor = RectangleEditor::new(SCREEN);
        assert!(editor.capture_region(2).is_none());

        let editor = editor_with_rect(Point::new(100.0, 100.0), Point::new(300.0, 250.0));
        let region = editor.capture_region(2).unwrap();
        assert_eq!((region.x, region.y, region.width, region.height), (102, 102, 196, 146));
    }
}
