//! System tray icon and menu.
//!
//! Left-click toggles the overlay. The menu offers the same actions as the
//! overlay's buttons.

use crate::{commands, overlay};
use tauri::{
    image::Image as TauriImage,
    menu::{MenuBuilder, MenuItemBuilder},
    tray::{MouseButton, TrayIconBuilder, TrayIconEvent},
    AppHandle,
};

pub fn setup_tray(app: &AppHandle) -> Result<(), Box<dyn std::error::Error>> {
    let toggle_item = MenuItemBuilder::with_id("toggle", "Show / Hide Overlay").build(app)?;
    let translate_item = MenuItemBuilder::with_id("translate", "Translate Selection").build(app)?;
    let quit_item = MenuItemBuilder::with_id("quit", "Quit snip-translate").build(app)?;
    let menu = MenuBuilder::new(app)
        .item(&toggle_item)
        .item(&translate_item)
        .separator()
        .item(&quit_item)
        .build()?;

    // Decode the PNG icon to RGBA for Tauri's Image type
    let icon_bytes = include_bytes!("../icons/32x32.png");
    let icon_img = image::load_from_memory(icon_bytes)
        .map_err(|e| format!("Failed to decode tray icon: {}", e))?;
    let rgba = icon_img.to_rgba8();
    let (w, h) = (rgba.width(), rgba.height());
    let tray_icon = TauriImage::new_owned(rgba.into_raw(), w, h);

    TrayIconBuilder::new()
        .icon(tray_icon)
        .tooltip("snip-translate")
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_tray_icon_event(|tray_icon, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                ..
            } = event
            {
                if let Err(e) = overlay::toggle(tray_icon.app_handle()) {
                    log::error!("[OVERLAY] Toggle from tray failed: {}", e);
                }
            }
        })
        .on_menu_event(|app, event| match event.id().as_ref() {
            "toggle" => {
                if let Err(e) = overlay::toggle(app) {
                    log::error!("[OVERLAY] Toggle from tray failed: {}", e);
                }
            }
            "translate" => commands::spawn_translation(app.clone()),
            "quit" => {
                log::info!("[OVERLAY] Quit requested from tray menu");
                app.exit(0);
            }
            _ => {}
        })
        .build(app)?;

    Ok(())
}
