//! Update state machine — pure, no timers, no I/O.
//!
//! Events from the update checker go in, effects for the driver come out.
//! Each user-facing notification fires at most once per process, and polling
//! is stopped at most once, on the first "update found" or "downloaded" event.
//! While no window exists only the latest failure is kept for display.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePhase {
    Idle,
    Checking,
    Available,
    Downloading,
    Downloaded,
    NotAvailable,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateEvent {
    UpdateAvailable { version: String },
    UpdateNotAvailable,
    DownloadStarted,
    Downloaded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateEffect {
    /// Ask the update server whether a newer version exists.
    RunCheck,
    /// Cancel the recurring check timer.
    StopPolling,
    /// Fetch and install the update that was just found.
    StartDownload,
    /// Tell the user there is nothing to update (shown once, error-styled).
    ShowNotAvailable,
    /// Quit and relaunch into the installed version after the delay.
    ScheduleRestart(Duration),
    /// Show an update failure on the main window.
    ReportError(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateState {
    pub phase: UpdatePhase,
    pub last_checked_at: Option<Instant>,
    pub notified_available: bool,
    pub notified_downloaded: bool,
    pub notified_unavailable: bool,
}

impl Default for UpdateState {
    fn default() -> Self {
        Self {
            phase: UpdatePhase::Idle,
            last_checked_at: None,
            notified_available: false,
            notified_downloaded: false,
            notified_unavailable: false,
        }
    }
}

#[derive(Debug)]
pub struct UpdateCoordinator {
    state: UpdateState,
    polling: bool,
    restart_delay: Duration,
    surface_available: bool,
    pending_error: Option<String>,
}

impl UpdateCoordinator {
    pub fn new(restart_delay: Duration) -> Self {
        Self {
            state: UpdateState::default(),
            polling: true,
            restart_delay,
            surface_available: false,
            pending_error: None,
        }
    }

    pub fn state(&self) -> &UpdateState {
        &self.state
    }

    pub fn is_polling(&self) -> bool {
        self.polling
    }

    /// The latest error waiting for a window to be shown on.
    pub fn pending_error(&self) -> Option<&str> {
        self.pending_error.as_deref()
    }

    /// Timer tick. Starts a check unless polling has stopped or a check or
    /// download is still running.
    pub fn on_tick(&mut self, now: Instant) -> Vec<UpdateEffect> {
        if !self.polling {
            return Vec::new();
        }
        if matches!(self.state.phase, UpdatePhase::Checking | UpdatePhase::Downloading) {
            log::debug!("[UPDATE] Previous check still running — skipping tick");
            return Vec::new();
        }

        self.state.phase = UpdatePhase::Checking;
        self.state.last_checked_at = Some(now);
        vec![UpdateEffect::RunCheck]
    }

    pub fn handle(&mut self, event: UpdateEvent) -> Vec<UpdateEffect> {
        let mut effects = Vec::new();

        match event {
            UpdateEvent::UpdateAvailable { version } => {
                self.state.phase = UpdatePhase::Available;
                if !self.state.notified_available {
                    self.state.notified_available = true;
                    log::info!("[UPDATE] Update available: {}", version);
                    self.stop_polling(&mut effects);
                    effects.push(UpdateEffect::StartDownload);
                }
            }
            UpdateEvent::UpdateNotAvailable => {
                self.state.phase = UpdatePhase::NotAvailable;
                if !self.state.notified_unavailable {
                    self.state.notified_unavailable = true;
                    effects.push(UpdateEffect::ShowNotAvailable);
                }
            }
            UpdateEvent::DownloadStarted => {
                self.state.phase = UpdatePhase::Downloading;
            }
            UpdateEvent::Downloaded => {
                self.state.phase = UpdatePhase::Downloaded;
                if !self.state.notified_downloaded {
                    self.state.notified_downloaded = true;
                    self.stop_polling(&mut effects);
                    effects.push(UpdateEffect::ScheduleRestart(self.restart_delay));
                }
            }
            UpdateEvent::Failed(message) => {
                self.state.phase = UpdatePhase::Error;
                log::error!("[UPDATE] Fout bij het updaten: {}", message);
                if self.surface_available {
                    effects.push(UpdateEffect::ReportError(message));
                } else {
                    // Latest only
                    self.pending_error = Some(message);
                }
            }
        }

        effects
    }

    /// Record whether a window exists to present errors on. The error kept
    /// while there was none is released when one appears.
    pub fn set_surface_available(&mut self, available: bool) -> Vec<UpdateEffect> {
        self.surface_available = available;
        if !available {
            return Vec::new();
        }
        self.pending_error
            .take()
            .map(UpdateEffect::ReportError)
            .into_iter()
            .collect()
    }

    fn stop_polling(&mut self, effects: &mut Vec<UpdateEffect>) {
        if self.polling {
            self.polling = false;
            effects.push(UpdateEffect::StopPolling);
        }
    }
}
