//! Capture orchestrator — turns a trigger into one capture → upload → hand-off run.
//!
//! At most one run is in flight per process. The guard is an explicit
//! compare-and-set on an `AtomicBool`, released by an RAII guard on every
//! terminal path, so a second trigger (hotkey and tray fired together, or a
//! nested callback) is a clean no-op instead of a duplicate upload.
//!
//! Within a run the order is fixed: clipboard write, then upload, then
//! navigation. The image stays on the clipboard even when the upload fails.
//! The captured frame is shared by `Arc` so backends can hand it to blocking
//! workers without copying it.

use crate::capture::{CaptureError, ClipboardError};
use crate::navigator::{self, NavigationError};
use crate::upload::UploadError;
use image::DynamicImage;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use url::Url;

/// The side-effecting stages the orchestrator sequences.
///
/// Production wiring lives in `backend.rs`; tests substitute a recording fake.
pub trait CaptureBackend: Send + Sync + 'static {
    /// Practice software preference, re-read on every trigger.
    fn selected_software(&self) -> impl Future<Output = Option<String>> + Send;

    fn capture_screen(&self) -> impl Future<Output = Result<DynamicImage, CaptureError>> + Send;

    fn write_clipboard(
        &self,
        image: Arc<DynamicImage>,
    ) -> impl Future<Output = Result<(), ClipboardError>> + Send;

    fn upload(
        &self,
        image: Arc<DynamicImage>,
        software: Option<&str>,
    ) -> impl Future<Output = Result<String, UploadError>> + Send;

    /// Fire-and-forget hand-off to the default URL handler.
    fn open_url(&self, url: &Url);

    /// Surface a failed run to the user.
    fn report_failure(&self, error: &PipelineError);
}

/// One in-flight capture attempt. Never leaves the orchestrator.
#[derive(Debug)]
struct CaptureRequest {
    attempt: u64,
    image: Arc<DynamicImage>,
    software: Option<String>,
}

#[derive(Debug)]
pub enum CaptureOutcome {
    /// Another capture was already running; nothing happened.
    Skipped,
    Completed { attempt: u64, id: String, url: Url },
    Failed { attempt: u64, error: PipelineError },
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Capture unavailable: {0}")]
    CaptureUnavailable(#[from] CaptureError),

    #[error("Upload failed: {0}")]
    UploadFailed(#[from] UploadError),

    #[error("Could not build hand-off URL: {0}")]
    Navigation(#[from] NavigationError),
}

pub struct CaptureOrchestrator<B> {
    backend: B,
    frontend_url: String,
    in_flight: AtomicBool,
    attempts: AtomicU64,
}

impl<B: CaptureBackend> CaptureOrchestrator<B> {
    pub fn new(backend: B, frontend_url: impl Into<String>) -> Self {
        Self {
            backend,
            frontend_url: frontend_url.into(),
            in_flight: AtomicBool::new(false),
            attempts: AtomicU64::new(0),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Run the full pipeline once, or do nothing if a run is already active.
    pub async fn trigger_capture(&self) -> CaptureOutcome {
        self.trigger_capture_with(|| {}).await
    }

    /// Like `trigger_capture`, calling `on_start` only once the run is
    /// actually going ahead. Skipped triggers never call it.
    pub async fn trigger_capture_with<F>(&self, on_start: F) -> CaptureOutcome
    where
        F: FnOnce() + Send,
    {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            log::info!("[CAPTURE] Capture already in progress — ignoring trigger");
            return CaptureOutcome::Skipped;
        };

        on_start();
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        let software = self.backend.selected_software().await;
        let start = std::time::Instant::now();

        match self.run(attempt, software).await {
            Ok((id, url)) => {
                log::info!(
                    "[CAPTURE] #{} Successfully sent to backend ({}ms total)",
                    attempt,
                    start.elapsed().as_millis()
                );
                CaptureOutcome::Completed { attempt, id, url }
            }
            Err(error) => {
                log::error!("[CAPTURE] #{} {}", attempt, error);
                self.backend.report_failure(&error);
                CaptureOutcome::Failed { attempt, error }
            }
        }
    }

    async fn run(&self, attempt: u64, software: Option<String>) -> Result<(String, Url), PipelineError> {
        log::info!("[CAPTURE] #{} Capturing screenshot...", attempt);
        let image = self.backend.capture_screen().await?;
        let request = CaptureRequest {
            attempt,
            image: Arc::new(image),
            software,
        };

        match self.backend.write_clipboard(Arc::clone(&request.image)).await {
            Ok(()) => log::info!(
                "[CAPTURE] #{} Screenshot taken and copied to clipboard",
                request.attempt
            ),
            Err(e) => log::warn!("[CAPTURE] #{} {}", request.attempt, e),
        }

        let id = self
            .backend
            .upload(Arc::clone(&request.image), request.software.as_deref())
            .await?;

        let url = navigator::patient_handoff_url(
            &self.frontend_url,
            request.software.as_deref(),
            Some(&id),
        )?;
        self.backend.open_url(&url);

        Ok((id, url))
    }
}

/// Start a capture on the async runtime without waiting for it.
///
/// Trigger sources call this from tray/hotkey callbacks.
pub fn spawn_capture<B: CaptureBackend>(orchestrator: Arc<CaptureOrchestrator<B>>) {
    spawn_capture_with(orchestrator, || {});
}

/// `spawn_capture` with a hook that runs only if the capture goes ahead.
pub fn spawn_capture_with<B, F>(orchestrator: Arc<CaptureOrchestrator<B>>, on_start: F)
where
    B: CaptureBackend,
    F: FnOnce() + Send + 'static,
{
    tauri::async_runtime::spawn(async move {
        orchestrator.trigger_capture_with(on_start).await;
    });
}

struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_is_exclusive_and_released_on_drop() {
        let flag = AtomicBool::new(false);
        let first = InFlightGuard::acquire(&flag);
        assert!(first.is_some());
        assert!(InFlightGuard::acquire(&flag).is_none());

        drop(first);
        assert!(!flag.load(Ordering::SeqCst));
        assert!(InFlightGuard::acquire(&flag).is_some());
    }
}
