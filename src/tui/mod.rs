//! TUI Module - Milking Control Dashboard
//!
//! Barn-themed terminal interface for the robotic milking system.
//!
//! Layering:
//! - `theme` and `widgets` are pure presentation helpers
//! - `state` holds UI-side state only; domain state stays in
//!   [`FarmState`](crate::farm::FarmState)
//! - `events` maps raw key events to [`Action`](events::Action)s
//! - `app` owns the terminal, the event loop and all rendering

mod app;
mod events;
mod state;
mod theme;
mod widgets;

pub use app::DairyApp;

use crate::settings::SettingsStore;

/// Launch the interactive dashboard
pub async fn run(store: SettingsStore, seed: Option<u64>) -> anyhow::Result<()> {
    DairyApp::new(store, seed)?.run().await
}
