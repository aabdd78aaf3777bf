//! Snelterecht desktop helper — Tauri application entry point.
//!
//! This is the app shell that wires together:
//! - System tray and global hotkey (tray.rs, hotkey.rs) as capture triggers
//! - The capture → upload → hand-off pipeline (orchestrator.rs, backend.rs)
//! - Background update polling (update/)
//! - Tauri command handlers for the settings window

mod backend;
pub mod capture;
pub mod config;
pub mod hotkey;
pub mod navigator;
mod notify;
pub mod orchestrator;
pub mod preferences;
mod tray;
pub mod update;
pub mod upload;

use backend::TauriCaptureBackend;
use config::AppConfig;
use orchestrator::CaptureOrchestrator;
use preferences::PreferenceStore;
use std::sync::Arc;
use tauri::{AppHandle, Manager, RunEvent, WebviewUrl, WebviewWindow, WebviewWindowBuilder, WindowEvent, Wry};
use update::{TauriUpdateHost, UpdateDriver};
use upload::UploadClient;

pub const MAIN_WINDOW_LABEL: &str = "main";

/// Process-wide state, owned by Tauri and shared with every trigger source.
pub struct AppState {
    pub config: AppConfig,
    pub preferences: Arc<PreferenceStore>,
    pub orchestrator: Arc<CaptureOrchestrator<TauriCaptureBackend<Wry>>>,
    pub updates: Arc<UpdateDriver<TauriUpdateHost<Wry>>>,
}

/// Tauri command: the practice software currently stored, if any.
#[tauri::command]
fn get_selected_software(state: tauri::State<'_, AppState>) -> Result<Option<String>, String> {
    Ok(state.preferences.selected_software())
}

/// Tauri command: store the practice software chosen in the settings form.
#[tauri::command]
fn set_selected_software(state: tauri::State<'_, AppState>, software: String) -> Result<(), String> {
    state
        .preferences
        .set_selected_software(&software)
        .map_err(|e| e.to_string())
}

/// Show the settings window, creating it if it was closed.
///
/// A new window is also a place to show queued update errors.
fn show_main_window(app: &AppHandle) -> tauri::Result<WebviewWindow> {
    if let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) {
        window.show()?;
        window.set_focus()?;
        return Ok(window);
    }

    let handle = app.clone();
    let window = WebviewWindowBuilder::new(app, MAIN_WINDOW_LABEL, WebviewUrl::App("index.html".into()))
        .title("Snelterecht")
        .inner_size(1024.0, 728.0)
        .on_navigation(move |url| {
            if is_app_url(url) {
                return true;
            }
            // Links out of the settings page go to the user's browser
            navigator::open_external(&handle, url);
            false
        })
        .build()?;

    app.state::<AppState>().updates.set_surface_available(true);
    Ok(window)
}

fn is_app_url(url: &url::Url) -> bool {
    matches!(url.scheme(), "tauri" | "about" | "data")
        || matches!(url.host_str(), Some("tauri.localhost") | Some("localhost"))
}

/// Entry point — called by Tauri runtime.
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let dotenv_path = config::load_dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Some(path) = dotenv_path {
        log::info!("[CONFIG] Loaded environment from {}", path.display());
    }

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_notification::init())
        .plugin(tauri_plugin_global_shortcut::Builder::new().build())
        .plugin(tauri_plugin_updater::Builder::new().build())
        .invoke_handler(tauri::generate_handler![get_selected_software, set_selected_software])
        .setup(|app| {
            log::info!("Snelterecht starting up");

            let app_config = AppConfig::from_env();
            log::info!(
                "[CONFIG] Backend {}, frontend {}, update check every {}s",
                app_config.backend_url,
                app_config.frontend_url,
                app_config.update_poll_interval.as_secs()
            );

            let handle = app.handle().clone();
            let prefs = Arc::new(PreferenceStore::new(preferences::preferences_path()));
            let backend = TauriCaptureBackend::new(
                handle.clone(),
                UploadClient::new(&app_config.backend_url)?,
                Arc::clone(&prefs),
                (config::CAPTURE_WIDTH, config::CAPTURE_HEIGHT),
            );
            let orchestrator = Arc::new(CaptureOrchestrator::new(backend, app_config.frontend_url.clone()));
            let updates = Arc::new(UpdateDriver::new(
                TauriUpdateHost::new(handle),
                app_config.update_poll_interval,
                app_config.restart_delay,
            ));

            let accelerator = app_config.hotkey.clone();
            let start_minimized = app_config.start_minimized;
            app.manage(AppState {
                config: app_config,
                preferences: prefs,
                orchestrator: Arc::clone(&orchestrator),
                updates: Arc::clone(&updates),
            });

            tray::setup_tray(app.handle())?;

            if let Err(e) = hotkey::register_capture_hotkey(app.handle(), &accelerator, orchestrator) {
                log::error!("[HOTKEY] {} — hotkey capture unavailable this session", e);
            }

            let window = show_main_window(app.handle())?;
            if start_minimized {
                window.minimize()?;
            }

            tauri::async_runtime::spawn(updates.run());

            log::info!("System tray initialized — ready for captures");
            Ok(())
        })
        .on_window_event(|window, event| {
            if window.label() == MAIN_WINDOW_LABEL && matches!(event, WindowEvent::Destroyed) {
                window.state::<AppState>().updates.set_surface_available(false);
            }
        })
        .build(tauri::generate_context!())
        .expect("Error building Snelterecht");

    app.run(|app, event| match event {
        // Closing the settings window must not end the tray app
        RunEvent::ExitRequested { code: None, api, .. } => api.prevent_exit(),
        RunEvent::Exit => hotkey::unregister_all(app),
        #[cfg(target_os = "macos")]
        RunEvent::Reopen { .. } => {
            if let Err(e) = show_main_window(app) {
                log::error!("Failed to reopen settings window: {}", e);
            }
        }
        _ => {}
    });
}
