//! Build script for the Snelterecht desktop helper.
//!
//! Only the Tauri code generation step is needed; capture, clipboard and
//! updater support come from crates and plugins.

fn main() {
    tauri_build::build();
}
