//! Global capture hotkey.
//!
//! Registered once at startup and unregistered on exit so no OS-level hook
//! outlives the process. A failed registration (key taken by another app)
//! only disables the hotkey trigger; tray capture keeps working. The "adding
//! patient" notification is shown only when the capture actually starts.

use crate::notify;
use crate::orchestrator::{self, CaptureBackend, CaptureOrchestrator};
use std::sync::Arc;
use tauri::{AppHandle, Runtime};
use tauri_plugin_global_shortcut::{GlobalShortcutExt, Shortcut, ShortcutState};

pub const HOTKEY_NOTIFICATION_TITLE: &str = "Nieuwe patiënt aan het toevoegen...";
pub const HOTKEY_NOTIFICATION_BODY: &str = "We sturen je door naar Snelterecht.";

pub fn parse_hotkey(accelerator: &str) -> Result<Shortcut, HotkeyError> {
    accelerator
        .parse::<Shortcut>()
        .map_err(|e| HotkeyError::InvalidAccelerator {
            accelerator: accelerator.to_string(),
            reason: e.to_string(),
        })
}

/// Bind `accelerator` to a capture run that announces itself with a short
/// notification once it goes ahead.
pub fn register_capture_hotkey<R, B>(
    app: &AppHandle<R>,
    accelerator: &str,
    orchestrator: Arc<CaptureOrchestrator<B>>,
) -> Result<(), HotkeyError>
where
    R: Runtime,
    B: CaptureBackend,
{
    let shortcut = parse_hotkey(accelerator)?;

    app.global_shortcut()
        .on_shortcut(shortcut, move |app, _shortcut, event| {
            if event.state != ShortcutState::Pressed {
                return;
            }
            log::info!("[HOTKEY] Capture hotkey pressed");
            let app = app.clone();
            orchestrator::spawn_capture_with(Arc::clone(&orchestrator), move || {
                notify::show_notification(&app, HOTKEY_NOTIFICATION_TITLE, HOTKEY_NOTIFICATION_BODY);
            });
        })
        .map_err(|e| HotkeyError::RegistrationFailed {
            accelerator: accelerator.to_string(),
            reason: e.to_string(),
        })?;

    log::info!("[HOTKEY] Registered {}", accelerator);
    Ok(())
}

pub fn unregister_all<R: Runtime>(app: &AppHandle<R>) {
    match app.global_shortcut().unregister_all() {
        Ok(()) => log::info!("[HOTKEY] Unregistered all shortcuts"),
        Err(e) => log::warn!("[HOTKEY] Failed to unregister shortcuts: {}", e),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HotkeyError {
    #[error("'{accelerator}' is not a valid shortcut: {reason}")]
    InvalidAccelerator { accelerator: String, reason: String },

    #[error("Could not register '{accelerator}': {reason}")]
    RegistrationFailed { accelerator: String, reason: String },
}
