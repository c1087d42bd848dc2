//! Overlay window state and keyboard commands.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OverlayMode {
    #[default]
    Maximized,
    Minimized,
}

impl OverlayMode {
    pub fn toggle(self) -> Self {
        match self {
            OverlayMode::Maximized => OverlayMode::Minimized,
            OverlayMode::Minimized => OverlayMode::Maximized,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum VerticalAlign {
    Top,
    Bottom,
}

/// Where the output text sits: a row of the three-row layout, and which
/// edge of that row it hugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputAnchor {
    pub row: u8,
    pub align: VerticalAlign,
}

impl Default for OutputAnchor {
    fn default() -> Self {
        Self {
            row: 0,
            align: VerticalAlign::Top,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Exit,
    Anchor(OutputAnchor),
}

impl KeyCommand {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        let anchor = |row, align| Some(KeyCommand::Anchor(OutputAnchor { row, align }));
        match key {
            "Escape" | "Esc" => Some(KeyCommand::Exit),
            "1" | "Digit1" | "Numpad1" => anchor(0, VerticalAlign::Top),
            "2" | "Digit2" | "Numpad2" => anchor(1, VerticalAlign::Bottom),
            "3" | "Digit3" | "Numpad3" => anchor(2, VerticalAlign::Bottom),
            _ => None,
        }
    }
}
