//! The overlay window: maximize/minimize and screen geometry.

use crate::AppState;
use snip_translate::capture::ScreenMapping;
use snip_translate::overlay::OverlayMode;
use tauri::{AppHandle, Manager, Runtime, WebviewWindow, Window};

pub const OVERLAY_LABEL: &str = "overlay";

pub fn overlay_window(app: &AppHandle) -> tauri::Result<WebviewWindow> {
    app.get_webview_window(OVERLAY_LABEL)
        .ok_or(tauri::Error::WindowNotFound)
}

pub fn set_mode(app: &AppHandle, mode: OverlayMode) -> tauri::Result<()> {
    let window = overlay_window(app)?;
    match mode {
        OverlayMode::Maximized => {
            window.unminimize()?;
            window.show()?;
            window.maximize()?;
            window.set_focus()?;
        }
        OverlayMode::Minimized => window.minimize()?,
    }

    store_mode(app, mode);
    log::info!("[OVERLAY] {:?}", mode);
    Ok(())
}

pub fn toggle(app: &AppHandle) -> tauri::Result<()> {
    let current = app
        .state::<AppState>()
        .overlay
        .lock()
        .map(|mode| *mode)
        .unwrap_or_default();
    set_mode(app, current.toggle())
}

/// Follow resizes made outside the app (taskbar, window manager).
pub fn sync_from_window<R: Runtime>(window: &Window<R>) {
    if window.label() != OVERLAY_LABEL {
        return;
    }
    let mode = if window.is_minimized().unwrap_or(false) {
        OverlayMode::Minimized
    } else {
        OverlayMode::Maximized
    };
    store_mode(window.app_handle(), mode);
}

fn store_mode<R: Runtime>(app: &AppHandle<R>, mode: OverlayMode) {
    if let Some(state) = app.try_state::<AppState>() {
        if let Ok(mut current) = state.overlay.lock() {
            if *current != mode {
                log::debug!("[OVERLAY] Mode now {:?}", mode);
            }
            *current = mode;
        }
    }
}

/// How overlay coordinates land on the primary monitor's pixels.
pub fn screen_mapping(window: &WebviewWindow) -> tauri::Result<ScreenMapping> {
    let scale_factor = window.scale_factor()?;
    let inner = window.inner_position()?;
    let (monitor_x, monitor_y) = match window.primary_monitor()? {
        Some(monitor) => (monitor.position().x, monitor.position().y),
        None => (0, 0),
    };

    Ok(ScreenMapping {
        scale_factor,
        origin_x: inner.x - monitor_x,
        origin_y: inner.y - monitor_y,
    })
}
