use super::hit_test::HitZone;
use serde::Serialize;

/// Cursor shapes the overlay can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CursorShape {
    #[default]
    Arrow,
    /// All-directions move cursor, shown over the body.
    Move,
    /// Diagonal `\` resize (top-left / bottom-right corners).
    ResizeNwse,
    /// Diagonal `/` resize (top-right / bottom-left corners).
    ResizeNesw,
    /// Vertical resize (top / bottom edges).
    ResizeNs,
    /// Horizontal resize (left / right edges).
    ResizeWe,
}

impl CursorShape {
    /// CSS `cursor` value used by the web overlay.
    pub fn css_name(self) -> &'static str {
        match self {
            CursorShape::Arrow => "default",
            CursorShape::Move => "all-scroll",
            CursorShape::ResizeNwse => "nwse-resize",
            CursorShape::ResizeNesw => "nesw-resize",
            CursorShape::ResizeNs => "ns-resize",
            CursorShape::ResizeWe => "ew-resize",
        }
    }
}

pub fn cursor_for_zone(zone: HitZone) -> CursorShape {
    match zone {
        HitZone::None => CursorShape::Arrow,
        HitZone::Body => CursorShape::Move,
        HitZone::TopLeft | HitZone::BottomRight => CursorShape::ResizeNwse,
        HitZone::TopRight | HitZone::BottomLeft => CursorShape::ResizeNesw,
        HitZone::Top | HitZone::Bottom => CursorShape::ResizeNs,
        HitZone::Left | HitZone::Right => CursorShape::ResizeWe,
    }
}

/// Remembers the displayed cursor so the UI is only told about changes.
#[derive(Debug, Default)]
pub struct CursorTracker {
    current: CursorShape,
    pending: Option<CursorShape>,
}

impl CursorTracker {
    /// Select the cursor for `zone`. Records a pending change only when the
    /// shape differs from the one on screen.
    pub fn apply(&mut self, zone: HitZone) {
        self.set(cursor_for_zone(zone));
    }

    pub fn set(&mut self, shape: CursorShape) {
        if shape != self.current {
            self.current = shape;
            self.pending = Some(shape);
        }
    }

    /// Take the change accumulated since the last call, if any.
    pub fn take_change(&mut self) -> Option<CursorShape> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zones_map_to_matching_cursors() {
        assert_eq!(cursor_for_zone(HitZone::None), CursorShape::Arrow);
        assert_eq!(cursor_for_zone(HitZone::Body), CursorShape::Move);
        assert_eq!(cursor_for_zone(HitZone::TopLeft), CursorShape::ResizeNwse);
        assert_eq!(cursor_for_zone(HitZone::BottomRight), CursorShape::ResizeNwse);
        assert_eq!(cursor_for_zone(HitZone::TopRight), CursorShape::ResizeNesw);
        assert_eq!(cursor_for_zone(HitZone::BottomLeft), CursorShape::ResizeNesw);
        assert_eq!(cursor_for_zone(HitZone::Top), CursorShape::ResizeNs);
        assert_eq!(cursor_for_zone(HitZone::Bottom), CursorShape::ResizeNs);
        assert_eq!(cursor_for_zone(HitZone::Left), CursorShape::ResizeWe);
        assert_eq!(cursor_for_zone(HitZone::Right), CursorShape::ResizeWe);
    }

    #[test]
    fn tracker_reports_only_changes() {
        let mut tracker = CursorTracker::default();

        tracker.apply(HitZone::None);
        assert_eq!(tracker.take_change(), None);

        tracker.apply(HitZone::Body);
        tracker.apply(HitZone::Body);
        assert_eq!(tracker.take_change(), Some(CursorShape::Move));
        assert_eq!(tracker.take_change(), None);

        // Different zones, same shape
        tracker.apply(HitZone::Left);
        assert_eq!(tracker.take_change(), Some(CursorShape::ResizeWe));
        tracker.apply(HitZone::Right);
        assert_eq!(tracker.take_change(), None);
        assert_eq!(tracker.current, CursorShape::ResizeWe);
    }

    #[test]
    fn change_and_revert_still_reports_latest() {
        let mut tracker = CursorTracker::default();
        tracker.apply(HitZone::Top);
        tracker.apply(HitZone::None);
        assert_eq!(tracker.take_change(), Some(CursorShape::Arrow));
    }
}
