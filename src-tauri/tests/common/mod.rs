//! Recording fake for the capture pipeline.

#![allow(dead_code)]

use image::{DynamicImage, RgbaImage};
use snelterecht_lib::capture::{CaptureError, ClipboardError};
use snelterecht_lib::orchestrator::{CaptureBackend, PipelineError};
use snelterecht_lib::upload::UploadError;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ReadPreference,
    Capture,
    Clipboard,
    Upload { software: Option<String> },
    Open(String),
    Failure(String),
}

pub enum UploadReply {
    Id(&'static str),
    HttpError(u16),
    TimedOut,
}

pub struct RecordingBackend {
    calls: Mutex<Vec<Call>>,
    software: Option<String>,
    screens: bool,
    clipboard_ok: bool,
    reply: UploadReply,
    upload_gate: Option<Arc<Notify>>,
}

impl RecordingBackend {
    pub fn new(software: Option<&str>, reply: UploadReply) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            software: software.map(str::to_string),
            screens: true,
            clipboard_ok: true,
            reply,
            upload_gate: None,
        }
    }

    pub fn without_screens(mut self) -> Self {
        self.screens = false;
        self
    }

    pub fn with_broken_clipboard(mut self) -> Self {
        self.clipboard_ok = false;
        self
    }

    /// Uploads park until the gate is notified.
    pub fn with_upload_gate(mut self, gate: Arc<Notify>) -> Self {
        self.upload_gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    pub fn uploads(&self) -> usize {
        self.count(|c| matches!(c, Call::Upload { .. }))
    }

    pub fn opened(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Open(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl CaptureBackend for RecordingBackend {
    async fn selected_software(&self) -> Option<String> {
        self.record(Call::ReadPreference);
        self.software.clone()
    }

    async fn capture_screen(&self) -> Result<DynamicImage, CaptureError> {
        self.record(Call::Capture);
        if !self.screens {
            return Err(CaptureError::NoScreens);
        }
        Ok(DynamicImage::ImageRgba8(RgbaImage::new(16, 9)))
    }

    async fn write_clipboard(&self, _image: Arc<DynamicImage>) -> Result<(), ClipboardError> {
        if !self.clipboard_ok {
            return Err(ClipboardError::Unavailable("no display".to_string()));
        }
        self.record(Call::Clipboard);
        Ok(())
    }

    async fn upload(&self, _image: Arc<DynamicImage>, software: Option<&str>) -> Result<String, UploadError> {
        self.record(Call::Upload {
            software: software.map(str::to_string),
        });
        if let Some(gate) = &self.upload_gate {
            gate.notified().await;
        }
        match self.reply {
            UploadReply::Id(id) => Ok(id.to_string()),
            UploadReply::HttpError(status) => Err(UploadError::Status {
                status,
                body: "boom".to_string(),
            }),
            UploadReply::TimedOut => Err(UploadError::TimedOut),
        }
    }

    fn open_url(&self, url: &Url) {
        self.record(Call::Open(url.to_string()));
    }

    fn report_failure(&self, error: &PipelineError) {
        self.record(Call::Failure(error.to_string()));
    }
}
