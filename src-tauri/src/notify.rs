//! User-facing notifications: toast notifications and native message dialogs.
//!
//! Both are best-effort. A failure to show one is logged, never propagated.

use tauri::{AppHandle, Runtime, WebviewWindow};
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};
use tauri_plugin_notification::NotificationExt;

pub fn show_notification<R: Runtime>(app: &AppHandle<R>, title: &str, body: &str) {
    if let Err(e) = app.notification().builder().title(title).body(body).show() {
        log::warn!("[NOTIFY] Could not show notification '{}': {}", title, e);
    }
}

/// Error-styled dialog, attached to `parent` when one is given.
pub fn show_error_dialog<R: Runtime>(
    app: &AppHandle<R>,
    parent: Option<&WebviewWindow<R>>,
    title: &str,
    message: &str,
) {
    let mut dialog = app
        .dialog()
        .message(message)
        .title(title)
        .kind(MessageDialogKind::Error)
        .buttons(MessageDialogButtons::OkCustom("Sluiten".to_string()));

    if let Some(window) = parent {
        dialog = dialog.parent(window);
    }

    dialog.show(|_| {});
}
