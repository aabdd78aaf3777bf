//! Production `CaptureBackend` — xcap, arboard, reqwest and the Tauri shell.

use crate::capture::{self, CaptureError, ClipboardError};
use crate::navigator;
use crate::notify;
use crate::orchestrator::{CaptureBackend, PipelineError};
use crate::preferences::PreferenceStore;
use crate::upload::{UploadClient, UploadError};
use image::DynamicImage;
use std::sync::Arc;
use tauri::{AppHandle, Runtime};
use url::Url;

pub struct TauriCaptureBackend<R: Runtime> {
    app: AppHandle<R>,
    uploader: UploadClient,
    preferences: Arc<PreferenceStore>,
    max_width: u32,
    max_height: u32,
}

impl<R: Runtime> TauriCaptureBackend<R> {
    pub fn new(
        app: AppHandle<R>,
        uploader: UploadClient,
        preferences: Arc<PreferenceStore>,
        (max_width, max_height): (u32, u32),
    ) -> Self {
        Self {
            app,
            uploader,
            preferences,
            max_width,
            max_height,
        }
    }
}

impl<R: Runtime> CaptureBackend for TauriCaptureBackend<R> {
    async fn selected_software(&self) -> Option<String> {
        let preferences = Arc::clone(&self.preferences);
        tauri::async_runtime::spawn_blocking(move || preferences.selected_software())
            .await
            .unwrap_or_else(|e| {
                log::warn!("[PREFS] Preference read worker failed: {}", e);
                None
            })
    }

    async fn capture_screen(&self) -> Result<DynamicImage, CaptureError> {
        let (w, h) = (self.max_width, self.max_height);
        tauri::async_runtime::spawn_blocking(move || capture::capture_screen(w, h))
            .await
            .map_err(|e| CaptureError::Worker(e.to_string()))?
    }

    async fn write_clipboard(&self, image: Arc<DynamicImage>) -> Result<(), ClipboardError> {
        tauri::async_runtime::spawn_blocking(move || capture::write_image_to_clipboard(&image))
            .await
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))?
    }

    async fn upload(&self, image: Arc<DynamicImage>, software: Option<&str>) -> Result<String, UploadError> {
        let data_uri = tauri::async_runtime::spawn_blocking(move || capture::encode_data_uri(&image))
            .await
            .map_err(|e| UploadError::Request(format!("encoder worker failed: {}", e)))??;
        self.uploader.upload(&data_uri, software).await
    }

    fn open_url(&self, url: &Url) {
        navigator::open_external(&self.app, url);
    }

    fn report_failure(&self, error: &PipelineError) {
        let body = match error {
            PipelineError::CaptureUnavailable(_) => "Het scherm kon niet worden vastgelegd.",
            PipelineError::UploadFailed(_) => {
                "De schermafbeelding staat op je klembord, maar kon niet naar Snelterecht worden verstuurd."
            }
            PipelineError::Navigation(_) => "Snelterecht kon niet worden geopend.",
        };
        notify::show_notification(&self.app, "Toevoegen mislukt", body);
    }
}
