//! App state persistence — JSON save/load across restarts.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::app::{AppState, Overlay, Panel};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Serialize, Deserialize)]
pub struct PersistedState {
    pub last_date: Option<NaiveDate>,
    pub active_panel: Panel,
    pub show_markers: bool,
    pub show_underlying: bool,
    pub filter_keys: Vec<String>,
    pub welcome_dismissed: bool,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            last_date: None,
            active_panel: Panel::Days,
            show_markers: true,
            show_underlying: false,
            filter_keys: Vec::new(),
            welcome_dismissed: false,
        }
    }
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Extract persisted state from AppState.
pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        last_date: app.day.as_ref().map(|d| d.date),
        active_panel: app.active_panel,
        show_markers: app.chart.show_markers,
        show_underlying: app.chart.show_underlying,
        filter_keys: app.filter_keys.clone(),
        welcome_dismissed: app.overlay != Overlay::Welcome,
    }
}

/// Apply persisted state to AppState.
pub fn apply(app: &mut AppState, state: PersistedState) {
    app.active_panel = state.active_panel;
    app.chart.show_markers = state.show_markers;
    app.chart.show_underlying = state.show_underlying;
    app.filter_keys = state.filter_keys;
    app.pending_restore = state.last_date;
    if !state.welcome_dismissed {
        app.overlay = Overlay::Welcome;
    }
}
