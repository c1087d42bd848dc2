//! Global hotkey backed by tauri-plugin-global-shortcut.
//!
//! Pressing the registered combo toggles the overlay.

use crate::overlay;
use snip_translate::hotkey::{HotkeyBackend, HotkeyCombo, HotkeyError, HotkeyHandle};
use tauri::AppHandle;
use tauri_plugin_global_shortcut::{GlobalShortcutExt, Shortcut, ShortcutState};

pub struct PluginHotkeys {
    app: AppHandle,
}

impl PluginHotkeys {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

fn to_shortcut(combo: &HotkeyCombo) -> Result<Shortcut, HotkeyError> {
    combo
        .to_string()
        .parse::<Shortcut>()
        .map_err(|e| HotkeyError::Register {
            combo: combo.clone(),
            reason: e.to_string(),
        })
}

impl HotkeyBackend for PluginHotkeys {
    fn register(&self, combo: &HotkeyCombo) -> Result<HotkeyHandle, HotkeyError> {
        let shortcut = to_shortcut(combo)?;
        let id = shortcut.id();

        self.app
            .global_shortcut()
            .on_shortcut(shortcut, |app, _shortcut, event| {
                if event.state != ShortcutState::Pressed {
                    return;
                }
                log::info!("[HOTKEY] Pressed, toggling overlay");
                if let Err(e) = overlay::toggle(app) {
                    log::error!("[HOTKEY] Toggle failed: {}", e);
                }
            })
            .map_err(|e| HotkeyError::Register {
                combo: combo.clone(),
                reason: e.to_string(),
            })?;

        Ok(HotkeyHandle {
            id,
            combo: combo.clone(),
        })
    }

    fn unregister(&self, handle: HotkeyHandle) -> Result<(), HotkeyError> {
        let shortcut = to_shortcut(&handle.combo)?;
        self.app
            .global_shortcut()
            .unregister(shortcut)
            .map_err(|e| HotkeyError::Unregister {
                combo: handle.combo.clone(),
                reason: e.to_string(),
            })?;
        log::info!("[HOTKEY] Unregistered {}", handle.combo);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_combos_are_accepted_by_the_plugin() {
        for text in ["Control+Space", "ctrl+shift+t", "Alt+F9", "Super+Escape"] {
            let combo: HotkeyCombo = text.parse().unwrap();
            assert!(to_shortcut(&combo).is_ok(), "{} should convert", combo);
        }
    }

    #[test]
    fn conversion_is_stable() {
        let combo: HotkeyCombo = "Control+Space".parse().unwrap();
        assert_eq!(
            to_shortcut(&combo).unwrap(),
            "control+space".parse::<Shortcut>().unwrap()
        );
    }
}
