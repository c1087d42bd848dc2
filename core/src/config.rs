//! Application configuration.
//!
//! Resolution order:
//!   1. Built-in defaults
//!   2. JSON file at `$SNIP_TRANSLATE_CONFIG`, or the platform config dir:
//!        macOS:   ~/Library/Application Support/snip-translate/config.json
//!        Linux:   ~/.config/snip-translate/config.json
//!        Windows: %APPDATA%/snip-translate/config.json
//!   3. `SNIP_TRANSLATE_*` environment variables (a `.env` file is honored)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_PATH_ENV: &str = "SNIP_TRANSLATE_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub source_lang: String,
    pub target_lang: String,
    /// Global shortcut that toggles the overlay, e.g. `Control+Space`.
    pub hotkey: String,
    /// Width of the selection outline; excluded from every capture.
    pub border_thickness: u32,
    pub ocr: OcrConfig,
    pub translator: TranslatorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_lang: "en".to_string(),
            target_lang: "hu".to_string(),
            hotkey: "Control+Space".to_string(),
            border_thickness: 2,
            ocr: OcrConfig::default(),
            translator: TranslatorConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrBackend {
    Tesseract,
    /// Windows.Media.Ocr; only available on Windows builds.
    Windows,
}

/// Tesseract `--oem` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OcrEngineMode {
    LegacyOnly,
    LstmOnly,
    LegacyAndLstm,
    Default,
}

impl OcrEngineMode {
    pub fn as_oem(self) -> u8 {
        match self {
            OcrEngineMode::LegacyOnly => 0,
            OcrEngineMode::LstmOnly => 1,
            OcrEngineMode::LegacyAndLstm => 2,
            OcrEngineMode::Default => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OcrConfig {
    pub backend: OcrBackend,
    pub program: PathBuf,
    pub language: String,
    pub engine_mode: OcrEngineMode,
    pub page_seg_mode: Option<u8>,
    pub tessdata_dir: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            backend: OcrBackend::Tesseract,
            program: PathBuf::from("tesseract"),
            language: "eng".to_string(),
            engine_mode: OcrEngineMode::Default,
            page_seg_mode: None,
            tessdata_dir: None,
            timeout_secs: 30,
        }
    }
}

impl OcrConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// The external translator: `<program> <script> --srclang=.. --targetlang=.. --text=..`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TranslatorConfig {
    pub program: PathBuf,
    pub script: PathBuf,
    pub timeout_secs: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("node"),
            script: PathBuf::from("main.js"),
            timeout_secs: 30,
        }
    }
}

impl TranslatorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Default config file location.
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("snip-translate")
        .join("config.json")
}

impl AppConfig {
    /// Load defaults, the config file and environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            log::info!("[CONFIG] Loaded environment from {}", path.display());
        }

        let path = config_path();
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());

        log::info!(
            "[CONFIG] {} → {}, hotkey {}, OCR {:?}",
            config.source_lang,
            config.target_lang,
            config.hotkey,
            config.ocr.backend
        );
        Ok(config)
    }

    /// Read a JSON config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("[CONFIG] No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `SNIP_TRANSLATE_*` overrides from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("SNIP_TRANSLATE_SOURCE_LANG") {
            self.source_lang = v;
        }
        if let Some(v) = get("SNIP_TRANSLATE_TARGET_LANG") {
            self.target_lang = v;
        }
        if let Some(v) = get("SNIP_TRANSLATE_HOTKEY") {
            self.hotkey = v;
        }
        if let Some(v) = get("SNIP_TRANSLATE_TRANSLATOR") {
            self.translator.program = PathBuf::from(v);
        }
        if let Some(v) = get("SNIP_TRANSLATE_TRANSLATOR_SCRIPT") {
            self.translator.script = PathBuf::from(v);
        }
        if let Some(v) = get("SNIP_TRANSLATE_TESSERACT") {
            self.ocr.program = PathBuf::from(v);
        }
        if let Some(v) = get("SNIP_TRANSLATE_TESSDATA") {
            self.ocr.tessdata_dir = Some(PathBuf::from(v));
        }
    }
}
