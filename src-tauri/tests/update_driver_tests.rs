//! Update driver behaviour on a paused tokio clock with a scripted host.

use snelterecht_lib::update::{UpdateDriver, UpdateError, UpdateHost, UpdatePhase};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const POLL: Duration = Duration::from_secs(10);
const RESTART: Duration = Duration::from_millis(3500);

#[derive(Clone, Copy)]
enum CheckReply {
    NoUpdate,
    Found(&'static str),
    Fail,
}

struct FakeHost {
    reply: CheckReply,
    download_ok: bool,
    checks: AtomicUsize,
    downloads: AtomicUsize,
    restarts: AtomicUsize,
    not_available_dialogs: AtomicUsize,
    errors: Mutex<Vec<String>>,
}

impl FakeHost {
    fn new(reply: CheckReply) -> Self {
        Self {
            reply,
            download_ok: true,
            checks: AtomicUsize::new(0),
            downloads: AtomicUsize::new(0),
            restarts: AtomicUsize::new(0),
            not_available_dialogs: AtomicUsize::new(0),
            errors: Mutex::new(Vec::new()),
        }
    }

    fn failing_download(mut self) -> Self {
        self.download_ok = false;
        self
    }

    fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }

    fn restarts(&self) -> usize {
        self.restarts.load(Ordering::SeqCst)
    }

    fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl UpdateHost for FakeHost {
    type Update = String;

    async fn check(&self) -> Result<Option<String>, UpdateError> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            CheckReply::NoUpdate => Ok(None),
            CheckReply::Found(version) => Ok(Some(version.to_string())),
            CheckReply::Fail => Err(UpdateError::Check("offline".to_string())),
        }
    }

    fn version_of(update: &String) -> String {
        update.clone()
    }

    async fn download_and_install(&self, _update: String) -> Result<(), UpdateError> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        if self.download_ok {
            Ok(())
        } else {
            Err(UpdateError::Download("signature mismatch".to_string()))
        }
    }

    fn restart(&self) {
        self.restarts.fetch_add(1, Ordering::SeqCst);
    }

    fn show_not_available(&self) {
        self.not_available_dialogs.fetch_add(1, Ordering::SeqCst);
    }

    fn report_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

fn driver(host: FakeHost) -> Arc<UpdateDriver<FakeHost>> {
    Arc::new(UpdateDriver::new(host, POLL, RESTART))
}

#[tokio::test(start_paused = true)]
async fn no_update_shows_dialog_once_and_keeps_polling() {
    let driver = driver(FakeHost::new(CheckReply::NoUpdate));
    tokio::spawn(Arc::clone(&driver).run());

    tokio::time::sleep(Duration::from_secs(25)).await;

    let host = driver.host();
    assert_eq!(host.checks(), 3);
    assert_eq!(host.not_available_dialogs.load(Ordering::SeqCst), 1);
    assert!(driver.is_polling());
    assert_eq!(driver.snapshot().phase, UpdatePhase::NotAvailable);
}

#[tokio::test(start_paused = true)]
async fn downloaded_update_restarts_once_after_delay() {
    let driver = driver(FakeHost::new(CheckReply::Found("1.4.0")));
    let poller = tokio::spawn(Arc::clone(&driver).run());

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(driver.host().restarts(), 0);
    assert_eq!(driver.snapshot().phase, UpdatePhase::Downloaded);
    assert!(!driver.is_polling());

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(driver.host().restarts(), 1);

    // The poll loop notices it was stopped on its next tick and exits
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert!(poller.is_finished());

    let host = driver.host();
    assert_eq!(host.checks(), 1);
    assert_eq!(host.downloads.load(Ordering::SeqCst), 1);
    assert_eq!(host.restarts(), 1);
    assert!(host.errors().is_empty());
}

#[tokio::test(start_paused = true)]
async fn check_errors_wait_for_a_window() {
    let driver = driver(FakeHost::new(CheckReply::Fail));
    tokio::spawn(Arc::clone(&driver).run());

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(driver.host().checks(), 1);
    assert!(driver.host().errors().is_empty());
    assert_eq!(driver.snapshot().phase, UpdatePhase::Error);

    driver.set_surface_available(true);
    assert_eq!(driver.host().errors(), vec!["Update check failed: offline".to_string()]);

    // Errors do not stop polling; the next failure is shown straight away
    tokio::time::sleep(POLL).await;
    assert_eq!(driver.host().checks(), 2);
    assert_eq!(driver.host().errors().len(), 2);
    assert!(driver.is_polling());
}

#[tokio::test(start_paused = true)]
async fn failed_download_reports_and_never_restarts() {
    let driver = driver(FakeHost::new(CheckReply::Found("1.4.0")).failing_download());
    driver.set_surface_available(true);
    tokio::spawn(Arc::clone(&driver).run());

    tokio::time::sleep(Duration::from_secs(30)).await;

    let host = driver.host();
    assert_eq!(host.checks(), 1);
    assert_eq!(host.restarts(), 0);
    assert_eq!(
        host.errors(),
        vec!["Update download failed: signature mismatch".to_string()]
    );
    assert_eq!(driver.snapshot().phase, UpdatePhase::Error);
    assert!(!driver.is_polling());
}
