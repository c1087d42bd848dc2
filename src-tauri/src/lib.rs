//! snip-translate: Tauri application entry point.
//!
//! This is the app shell that wires together:
//! - The overlay window and its commands (overlay.rs, commands.rs)
//! - Screen capture through xcap (capture/)
//! - The global hotkey (hotkey.rs) and system tray (tray.rs)
//! - The core crate's editor and pipeline worker

mod capture;
mod commands;
mod hotkey;
mod overlay;
mod tray;

use capture::XcapCapture;
use snip_translate::config::{AppConfig, OcrBackend, OcrConfig};
use snip_translate::editor::{RectangleEditor, ScreenSize};
use snip_translate::hotkey::{register_or_report, HotkeyBackend, HotkeyHandle};
use snip_translate::ocr::OcrEngine;
use snip_translate::overlay::OverlayMode;
use snip_translate::pipeline::{Pipeline, PipelineUpdate, PipelineWorker, UpdateReceiver};
use snip_translate::translate::ScriptTranslator;
use std::sync::Mutex;
use tauri::{AppHandle, Emitter, Manager, RunEvent, WindowEvent};

pub type Worker = PipelineWorker<XcapCapture, OcrEngine, ScriptTranslator>;

/// Everything the commands share. The editor is only touched from command
/// handlers; the worker reports back through its channel.
pub struct AppState {
    pub config: AppConfig,
    pub editor: Mutex<RectangleEditor>,
    pub overlay: Mutex<OverlayMode>,
    pub worker: Worker,
    pub hotkey: Mutex<Option<HotkeyHandle>>,
    pub notice: Mutex<Option<String>>,
}

fn load_config() -> (AppConfig, Option<String>) {
    match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => {
            log::error!("[CONFIG] {} (using defaults)", e);
            (AppConfig::default(), Some(e.to_string()))
        }
    }
}

fn build_engine(config: &OcrConfig) -> Result<OcrEngine, Box<dyn std::error::Error>> {
    match OcrEngine::from_config(config) {
        Ok(engine) => Ok(engine),
        Err(e) => {
            log::error!("[OCR] {}, falling back to tesseract", e);
            let fallback = OcrConfig {
                backend: OcrBackend::Tesseract,
                ..config.clone()
            };
            Ok(OcrEngine::from_config(&fallback)?)
        }
    }
}

/// Forward pipeline results to the page, skipping superseded runs.
fn forward_results(app: AppHandle, mut updates: UpdateReceiver) {
    tauri::async_runtime::spawn(async move {
        while let Some(PipelineUpdate { run_id, text }) = updates.recv().await {
            let state = app.state::<AppState>();
            if !state.worker.is_current(run_id) {
                log::debug!("[PIPELINE] Dropping result of superseded run {}", run_id);
                continue;
            }
            if let Err(e) = app.emit("translation-result", &text) {
                log::error!("[PIPELINE] Failed to deliver result: {}", e);
            }
        }
    });
}

fn register_hotkey(app: &AppHandle) {
    let state = app.state::<AppState>();
    let backend = hotkey::PluginHotkeys::new(app.clone());

    match register_or_report(&backend, &state.config.hotkey) {
        Ok(handle) => {
            if let Ok(mut slot) = state.hotkey.lock() {
                *slot = Some(handle);
            }
        }
        Err(e) => {
            let message = e.to_string();
            if let Ok(mut notice) = state.notice.lock() {
                *notice = Some(message.clone());
            }
            // Reaches the page if it is already listening; set_viewport covers the rest.
            let _ = app.emit("hotkey-error", message);
        }
    }
}

fn shutdown(app: &AppHandle) {
    let Some(state) = app.try_state::<AppState>() else {
        return;
    };

    let handle = state.hotkey.lock().ok().and_then(|mut slot| slot.take());
    if let Some(handle) = handle {
        let backend = hotkey::PluginHotkeys::new(app.clone());
        if let Err(e) = backend.unregister(handle) {
            log::warn!("[HOTKEY] {}", e);
        }
    }

    tauri::async_runtime::block_on(state.worker.shutdown());
    log::info!("[PIPELINE] Worker stopped");
}

/// Entry point, called by the Tauri runtime.
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::init();

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_global_shortcut::Builder::new().build())
        .invoke_handler(tauri::generate_handler![
            commands::set_viewport,
            commands::pointer_down,
            commands::pointer_move,
            commands::pointer_up,
            commands::key_down,
            commands::translate,
            commands::toggle_overlay,
            commands::exit_app,
        ])
        .setup(|app| {
            log::info!("snip-translate starting up");

            let (config, notice) = load_config();
            let engine = build_engine(&config.ocr)?;
            log::info!("[OCR] Using {} engine", engine.name());

            let pipeline = Pipeline::new(
                XcapCapture,
                engine,
                ScriptTranslator::from_config(&config.translator),
                config.source_lang.clone(),
                config.target_lang.clone(),
            );
            let (worker, updates) = PipelineWorker::new(pipeline);

            app.manage(AppState {
                config,
                editor: Mutex::new(RectangleEditor::new(ScreenSize::new(0.0, 0.0))),
                overlay: Mutex::new(OverlayMode::Maximized),
                worker,
                hotkey: Mutex::new(None),
                notice: Mutex::new(notice),
            });

            forward_results(app.handle().clone(), updates);
            register_hotkey(app.handle());
            tray::setup_tray(app.handle())?;

            log::info!("Overlay ready");
            Ok(())
        })
        .on_window_event(|window, event| {
            if let WindowEvent::Resized(_) = event {
                overlay::sync_from_window(window);
            }
        })
        .build(tauri::generate_context!())
        .expect("Error building snip-translate");

    app.run(|app, event| {
        if let RunEvent::Exit = event {
            shutdown(app);
        }
    });
}
