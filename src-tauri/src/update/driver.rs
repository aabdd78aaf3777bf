//! Update driver — runs the poll timer and executes coordinator effects.
//!
//! The coordinator sits behind a `std::sync::Mutex` that is never held across
//! an await. Checks and downloads run as their own tasks so a slow update
//! server never blocks the timer.

use super::state::{UpdateCoordinator, UpdateEffect, UpdateEvent, UpdateState};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

/// What the driver needs from the outside world.
pub trait UpdateHost: Send + Sync + 'static {
    type Update: Send + 'static;

    fn check(&self) -> impl Future<Output = Result<Option<Self::Update>, UpdateError>> + Send;

    fn version_of(update: &Self::Update) -> String;

    fn download_and_install(
        &self,
        update: Self::Update,
    ) -> impl Future<Output = Result<(), UpdateError>> + Send;

    fn restart(&self);

    fn show_not_available(&self);

    fn report_error(&self, message: &str);
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("Updater unavailable: {0}")]
    Unavailable(String),

    #[error("Update check failed: {0}")]
    Check(String),

    #[error("Update download failed: {0}")]
    Download(String),
}

pub struct UpdateDriver<H: UpdateHost> {
    host: H,
    coordinator: Mutex<UpdateCoordinator>,
    pending: Mutex<Option<H::Update>>,
    poll_interval: Duration,
}

impl<H: UpdateHost> UpdateDriver<H> {
    pub fn new(host: H, poll_interval: Duration, restart_delay: Duration) -> Self {
        Self {
            host,
            coordinator: Mutex::new(UpdateCoordinator::new(restart_delay)),
            pending: Mutex::new(None),
            poll_interval,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn snapshot(&self) -> UpdateState {
        self.coordinator().state().clone()
    }

    pub fn is_polling(&self) -> bool {
        self.coordinator().is_polling()
    }

    /// Poll loop. The first tick fires immediately (the ready-time check),
    /// then every `poll_interval` until the coordinator stops polling.
    pub async fn run(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if !self.is_polling() {
                break;
            }
            let effects = self.coordinator().on_tick(Instant::now());
            self.apply(effects);
        }

        log::info!("[UPDATE] Polling stopped");
    }

    /// A window exists (or no longer does) to show update errors on.
    pub fn set_surface_available(self: &Arc<Self>, available: bool) {
        let effects = self.coordinator().set_surface_available(available);
        self.apply(effects);
    }

    fn handle(self: &Arc<Self>, event: UpdateEvent) {
        let effects = self.coordinator().handle(event);
        self.apply(effects);
    }

    fn apply(self: &Arc<Self>, effects: Vec<UpdateEffect>) {
        for effect in effects {
            match effect {
                UpdateEffect::RunCheck => {
                    let driver = Arc::clone(self);
                    tokio::spawn(async move { driver.run_check().await });
                }
                UpdateEffect::StopPolling => {
                    log::info!("[UPDATE] Stopping update polling for this session");
                }
                UpdateEffect::StartDownload => {
                    let driver = Arc::clone(self);
                    tokio::spawn(async move { driver.run_download().await });
                }
                UpdateEffect::ShowNotAvailable => self.host.show_not_available(),
                UpdateEffect::ScheduleRestart(delay) => {
                    log::info!("[UPDATE] Restarting into the new version in {}ms", delay.as_millis());
                    let driver = Arc::clone(self);
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        driver.host.restart();
                    });
                }
                UpdateEffect::ReportError(message) => self.host.report_error(&message),
            }
        }
    }

    async fn run_check(self: Arc<Self>) {
        log::debug!("[UPDATE] Checking for updates");
        match self.host.check().await {
            Ok(Some(update)) => {
                let version = H::version_of(&update);
                *self.pending() = Some(update);
                self.handle(UpdateEvent::UpdateAvailable { version });
            }
            Ok(None) => self.handle(UpdateEvent::UpdateNotAvailable),
            Err(e) => self.handle(UpdateEvent::Failed(e.to_string())),
        }
    }

    async fn run_download(self: Arc<Self>) {
        let Some(update) = self.pending().take() else {
            log::warn!("[UPDATE] Download requested without a pending update");
            return;
        };

        self.handle(UpdateEvent::DownloadStarted);
        match self.host.download_and_install(update).await {
            Ok(()) => self.handle(UpdateEvent::Downloaded),
            Err(e) => self.handle(UpdateEvent::Failed(e.to_string())),
        }
    }

    fn coordinator(&self) -> MutexGuard<'_, UpdateCoordinator> {
        self.coordinator.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn pending(&self) -> MutexGuard<'_, Option<H::Update>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}
