//! System tray setup and menu handler.
//!
//! The tray icon is the resident entry point of the helper. Clicking it pops
//! the context menu; the menu items start a capture, open the web app, or quit.

use crate::navigator::{self, NEW_GAP_ROUTE, PATIENTS_ROUTE};
use crate::orchestrator;
use crate::AppState;
use tauri::{
    image::Image as TauriImage,
    menu::{MenuBuilder, MenuItem, MenuItemBuilder},
    tray::TrayIconBuilder,
    AppHandle, Manager,
};

/// What a tray menu entry does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayAction {
    CaptureFromPatientCard,
    ReportNewGap,
    AddPatientManually,
    Quit,
}

impl TrayAction {
    pub const ALL: [TrayAction; 4] = [
        TrayAction::CaptureFromPatientCard,
        TrayAction::ReportNewGap,
        TrayAction::AddPatientManually,
        TrayAction::Quit,
    ];

    pub fn id(self) -> &'static str {
        match self {
            TrayAction::CaptureFromPatientCard => "capture",
            TrayAction::ReportNewGap => "new_gap",
            TrayAction::AddPatientManually => "add_patient",
            TrayAction::Quit => "quit",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrayAction::CaptureFromPatientCard => "Toevoegen vanaf patiëntenkaart",
            TrayAction::ReportNewGap => "Nieuwe lege plek melden",
            TrayAction::AddPatientManually => "Handmatig patiënt toevoegen",
            TrayAction::Quit => "Snelterecht afsluiten",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.id() == id)
    }

    /// Web app route this entry opens directly, if any.
    pub fn route(self) -> Option<&'static str> {
        match self {
            TrayAction::ReportNewGap => Some(NEW_GAP_ROUTE),
            TrayAction::AddPatientManually => Some(PATIENTS_ROUTE),
            TrayAction::CaptureFromPatientCard | TrayAction::Quit => None,
        }
    }
}

/// Sets up the system tray icon and its context menu.
///
/// Left- and right-click both open the menu; capture only starts from the
/// menu entry, never from a bare click.
pub fn setup_tray(app: &AppHandle) -> Result<(), Box<dyn std::error::Error>> {
    let capture_item = menu_item(app, TrayAction::CaptureFromPatientCard)?;
    let gap_item = menu_item(app, TrayAction::ReportNewGap)?;
    let manual_item = menu_item(app, TrayAction::AddPatientManually)?;
    let quit_item = menu_item(app, TrayAction::Quit)?;

    let menu = MenuBuilder::new(app)
        .item(&capture_item)
        .separator()
        .item(&gap_item)
        .item(&manual_item)
        .separator()
        .item(&quit_item)
        .build()?;

    // Decode the PNG icon to RGBA for Tauri's Image type
    let icon_bytes = include_bytes!("../icons/32x32.png");
    let icon_img = image::load_from_memory(icon_bytes)
        .map_err(|e| format!("Failed to decode tray icon: {}", e))?;
    let rgba = icon_img.to_rgba8();
    let (w, h) = (rgba.width(), rgba.height());
    let tray_icon = TauriImage::new_owned(rgba.into_raw(), w, h);

    let _tray = TrayIconBuilder::new()
        .icon(tray_icon)
        .tooltip("Snelterecht")
        .menu(&menu)
        .show_menu_on_left_click(true)
        .on_menu_event(|app, event| match TrayAction::from_id(event.id().as_ref()) {
            Some(action) => handle_action(app, action),
            None => log::warn!("[TRAY] Unknown menu item: {:?}", event.id()),
        })
        .build(app)?;

    Ok(())
}

fn menu_item(
    app: &AppHandle,
    action: TrayAction,
) -> tauri::Result<MenuItem<tauri::Wry>> {
    MenuItemBuilder::with_id(action.id(), action.label()).build(app)
}

fn handle_action(app: &AppHandle, action: TrayAction) {
    log::info!("[TRAY] {:?} selected", action);
    let state = app.state::<AppState>();

    match action {
        TrayAction::CaptureFromPatientCard => {
            orchestrator::spawn_capture(state.orchestrator.clone());
        }
        TrayAction::ReportNewGap | TrayAction::AddPatientManually => {
            let Some(route) = action.route() else { return };
            match navigator::build_url(&state.config.frontend_url, route, &[]) {
                Ok(url) => navigator::open_external(app, &url),
                Err(e) => log::error!("[TRAY] {}", e),
            }
        }
        TrayAction::Quit => {
            log::info!("[TRAY] Quit requested from tray menu");
            app.exit(0);
        }
    }
}
