//! `UpdateHost` backed by `tauri-plugin-updater` and native dialogs.

use super::driver::{UpdateError, UpdateHost};
use crate::notify;
use tauri::{AppHandle, Manager, Runtime};
use tauri_plugin_updater::{Update, UpdaterExt};

pub struct TauriUpdateHost<R: Runtime> {
    app: AppHandle<R>,
}

impl<R: Runtime> TauriUpdateHost<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self { app }
    }
}

impl<R: Runtime> UpdateHost for TauriUpdateHost<R> {
    type Update = Update;

    async fn check(&self) -> Result<Option<Update>, UpdateError> {
        let updater = self
            .app
            .updater()
            .map_err(|e| UpdateError::Unavailable(e.to_string()))?;
        updater
            .check()
            .await
            .map_err(|e| UpdateError::Check(e.to_string()))
    }

    fn version_of(update: &Update) -> String {
        update.version.clone()
    }

    async fn download_and_install(&self, update: Update) -> Result<(), UpdateError> {
        let mut downloaded: u64 = 0;
        let mut last_logged: u64 = 0;

        update
            .download_and_install(
                |chunk_length, content_length| {
                    downloaded = downloaded.saturating_add(chunk_length as u64);
                    // Log roughly every 5 MB
                    if downloaded - last_logged >= 5 * 1024 * 1024 {
                        last_logged = downloaded;
                        log::info!(
                            "[UPDATE] Downloaded {} of {} bytes",
                            downloaded,
                            content_length.map_or_else(|| "?".to_string(), |n| n.to_string())
                        );
                    }
                },
                || log::info!("[UPDATE] Download finished, installing"),
            )
            .await
            .map_err(|e| UpdateError::Download(e.to_string()))
    }

    fn restart(&self) {
        log::info!("[UPDATE] Restarting to finish the update");
        self.app.restart();
    }

    fn show_not_available(&self) {
        notify::show_error_dialog(
            &self.app,
            self.app.get_webview_window(crate::MAIN_WINDOW_LABEL).as_ref(),
            "Error",
            "Er is geen update beschikbaar.",
        );
    }

    fn report_error(&self, message: &str) {
        match self.app.get_webview_window(crate::MAIN_WINDOW_LABEL) {
            Some(window) => notify::show_error_dialog(
                &self.app,
                Some(&window),
                "Fout bij het updaten",
                message,
            ),
            None => log::warn!("[UPDATE] Main window gone before error could be shown: {}", message),
        }
    }
}
