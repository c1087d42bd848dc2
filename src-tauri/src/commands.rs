//! Tauri command handlers for the overlay page.
//!
//! Pointer coordinates arrive in CSS pixels, which are the editor's
//! coordinates. Every pointer command answers with the editor's view.

use crate::{overlay, AppState};
use serde::Serialize;
use snip_translate::editor::{EditorPhase, EditorView, Point, PressOutcome, ScreenSize};
use snip_translate::overlay::{KeyCommand, OverlayMode};
use tauri::{AppHandle, Emitter, Manager, State};

const RIGHT_BUTTON: u8 = 2;

/// Sent back to the page once it knows its size.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportInfo {
    pub border_thickness: u32,
    /// Startup problems the output area should show.
    pub notice: Option<String>,
}

#[tauri::command]
pub fn set_viewport(
    state: State<'_, AppState>,
    width: f64,
    height: f64,
) -> Result<ViewportInfo, String> {
    let mut editor = state.editor.lock().map_err(|e| e.to_string())?;
    editor.set_screen_size(ScreenSize::new(width, height));
    log::debug!("[OVERLAY] Viewport {}x{}", width, height);

    Ok(ViewportInfo {
        border_thickness: state.config.border_thickness,
        notice: state.notice.lock().map_err(|e| e.to_string())?.clone(),
    })
}

#[tauri::command]
pub fn pointer_down(
    app: AppHandle,
    state: State<'_, AppState>,
    x: f64,
    y: f64,
    button: u8,
    click_count: u32,
) -> Result<EditorView, String> {
    if button == RIGHT_BUTTON {
        overlay::set_mode(&app, OverlayMode::Minimized).map_err(|e| e.to_string())?;
        return state
            .editor
            .lock()
            .map(|mut editor| editor.view())
            .map_err(|e| e.to_string());
    }

    let mut editor = state.editor.lock().map_err(|e| e.to_string())?;
    let before = editor.phase();
    let outcome = editor.left_button_down(Point::new(x, y), click_count);
    log_transition(before, editor.phase());
    let view = editor.view();
    drop(editor);

    if outcome == PressOutcome::TriggerPipeline {
        spawn_translation(app);
    }
    Ok(view)
}

#[tauri::command]
pub fn pointer_move(state: State<'_, AppState>, x: f64, y: f64) -> Result<EditorView, String> {
    let mut editor = state.editor.lock().map_err(|e| e.to_string())?;
    editor.mouse_move(Point::new(x, y));
    Ok(editor.view())
}

#[tauri::command]
pub fn pointer_up(state: State<'_, AppState>) -> Result<EditorView, String> {
    let mut editor = state.editor.lock().map_err(|e| e.to_string())?;
    let before = editor.phase();
    editor.left_button_up();
    log_transition(before, editor.phase());
    Ok(editor.view())
}

fn log_transition(before: EditorPhase, after: EditorPhase) {
    if before != after {
        log::debug!("[EDITOR] {:?} -> {:?}", before, after);
    }
}

#[tauri::command]
pub fn key_down(app: AppHandle, key: String) -> Result<(), String> {
    match KeyCommand::from_key(&key) {
        Some(KeyCommand::Exit) => {
            log::info!("[OVERLAY] Escape pressed, exiting");
            app.exit(0);
        }
        Some(KeyCommand::Anchor(anchor)) => {
            app.emit("output-anchor", anchor).map_err(|e| e.to_string())?;
        }
        None => {}
    }
    Ok(())
}

/// Start the pipeline for the current selection. `None` when there is no
/// valid selection.
#[tauri::command]
pub async fn translate(app: AppHandle) -> Result<Option<u64>, String> {
    start_translation(&app).await
}

#[tauri::command]
pub fn toggle_overlay(app: AppHandle) -> Result<(), String> {
    overlay::toggle(&app).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn exit_app(app: AppHandle) {
    log::info!("[OVERLAY] Exit requested");
    app.exit(0);
}

pub fn spawn_translation(app: AppHandle) {
    tauri::async_runtime::spawn(async move {
        if let Err(e) = start_translation(&app).await {
            log::error!("[PIPELINE] Could not start: {}", e);
        }
    });
}

pub async fn start_translation(app: &AppHandle) -> Result<Option<u64>, String> {
    let state = app.state::<AppState>();

    let region = {
        let editor = state.editor.lock().map_err(|e| e.to_string())?;
        editor.capture_region(state.config.border_thickness)
    };
    let Some(region) = region else {
        log::info!("[PIPELINE] No valid selection, nothing to translate");
        return Ok(None);
    };

    let window = overlay::overlay_window(app).map_err(|e| e.to_string())?;
    let mapping = overlay::screen_mapping(&window).map_err(|e| e.to_string())?;

    let run_id = state.worker.start(region.to_screen(mapping)).await;
    Ok(Some(run_id))
}
