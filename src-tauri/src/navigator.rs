//! Deep-link navigator — builds web app URLs and hands them to the OS.
//!
//! Query parameter names are part of the contract with the web front end:
//! `fromApp`, `software` and `id` must not be renamed.

use tauri::{AppHandle, Runtime};
use url::Url;

pub const PATIENTS_ROUTE: &str = "/patienten/all";
pub const NEW_GAP_ROUTE: &str = "/gaten/nieuw";

/// Join an origin, a route and query parameters into a URL.
///
/// Parameters are form-encoded in the order given. No `?` is emitted when
/// there are no parameters.
pub fn build_url(origin: &str, route: &str, params: &[(&str, &str)]) -> Result<Url, NavigationError> {
    let raw = format!("{}{}", origin.trim_end_matches('/'), route);
    let mut url = Url::parse(&raw).map_err(|e| NavigationError::InvalidUrl {
        url: raw.clone(),
        reason: e.to_string(),
    })?;

    if !params.is_empty() {
        let mut query = url.query_pairs_mut();
        for (key, value) in params {
            query.append_pair(key, value);
        }
    }

    Ok(url)
}

/// URL that drops the user into the patient list right after an upload.
///
/// `fromApp=true` is always present; `software` and `id` only when known.
pub fn patient_handoff_url(
    frontend_url: &str,
    software: Option<&str>,
    id: Option<&str>,
) -> Result<Url, NavigationError> {
    let mut params = vec![("fromApp", "true")];
    if let Some(software) = software {
        params.push(("software", software));
    }
    if let Some(id) = id {
        params.push(("id", id));
    }
    build_url(frontend_url, PATIENTS_ROUTE, &params)
}

/// Open a URL in the user's default handler.
///
/// Fire-and-forget: a missing handler is logged and otherwise ignored.
pub fn open_external<R: Runtime>(app: &AppHandle<R>, url: &Url) {
    use tauri_plugin_shell::ShellExt;

    log::info!("[NAV] Opening {}", url);
    #[allow(deprecated)]
    let opened = app.shell().open(url.as_str(), None);
    if let Err(e) = opened {
        log::warn!("[NAV] {}", NavigationError::OpenFailed(e.to_string()));
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("'{url}' is not a valid URL: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("No handler could open the URL: {0}")]
    OpenFailed(String),
}
