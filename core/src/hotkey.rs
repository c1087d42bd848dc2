//! Global hotkey abstraction.
//!
//! The core only knows combos and handles. The host implements
//! `HotkeyBackend` on top of the platform's global shortcut facility.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub control: bool,
    pub alt: bool,
    pub shift: bool,
    pub super_key: bool,
}

impl Modifiers {
    pub fn is_empty(&self) -> bool {
        !(self.control || self.alt || self.shift || self.super_key)
    }
}

/// A modifier set plus one key, e.g. `Control+Space`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HotkeyCombo {
    pub modifiers: Modifiers,
    pub key: String,
}

impl FromStr for HotkeyCombo {
    type Err = HotkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut modifiers = Modifiers::default();
        let mut key: Option<String> = None;

        for part in s.split('+').map(str::trim) {
            if part.is_empty() {
                return Err(HotkeyError::Parse(s.to_string()));
            }
            match part.to_ascii_lowercase().as_str() {
                "control" | "ctrl" => modifiers.control = true,
                "alt" | "option" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                "super" | "win" | "meta" | "cmd" | "command" => modifiers.super_key = true,
                _ => {
                    if key.is_some() {
                        return Err(HotkeyError::Parse(s.to_string()));
                    }
                    key = Some(canonical_key(part));
                }
            }
        }

        match key {
            Some(key) => Ok(Self { modifiers, key }),
            None => Err(HotkeyError::Parse(s.to_string())),
        }
    }
}

fn canonical_key(key: &str) -> String {
    if key.chars().count() == 1 {
        return key.to_ascii_uppercase();
    }
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
        None => String::new(),
    }
}

impl fmt::Display for HotkeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.control {
            f.write_str("Control+")?;
        }
        if self.modifiers.alt {
            f.write_str("Alt+")?;
        }
        if self.modifiers.shift {
            f.write_str("Shift+")?;
        }
        if self.modifiers.super_key {
            f.write_str("Super+")?;
        }
        f.write_str(&self.key)
    }
}

/// Returned by a successful registration; pass it back to unregister.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyHandle {
    pub id: u32,
    pub combo: HotkeyCombo,
}

#[derive(Debug, thiserror::Error)]
pub enum HotkeyError {
    #[error("Invalid hotkey `{0}`")]
    Parse(String),

    #[error("Could not register hotkey {combo}: {reason}")]
    Register { combo: HotkeyCombo, reason: String },

    #[error("Could not unregister hotkey {combo}: {reason}")]
    Unregister { combo: HotkeyCombo, reason: String },
}

pub trait HotkeyBackend {
    fn register(&self, combo: &HotkeyCombo) -> Result<HotkeyHandle, HotkeyError>;
    fn unregister(&self, handle: HotkeyHandle) -> Result<(), HotkeyError>;
}

/// Parse and register `combo`, logging instead of failing.
pub fn register_or_report<B: HotkeyBackend>(
    backend: &B,
    combo: &str,
) -> Result<HotkeyHandle, HotkeyError> {
    let result = combo.parse::<HotkeyCombo>().and_then(|combo| {
        if combo.modifiers.is_empty() {
            log::warn!("[HOTKEY] {} has no modifier and will capture the key system-wide", combo);
        }
        backend.register(&combo)
    });
    match &result {
        Ok(handle) => log::info!("[HOTKEY] Registered {}", handle.combo),
        Err(e) => log::error!("[HOTKEY] {} (continuing without a hotkey)", e),
    }
    result
}
