//! Persistence bridge: the widget's single storage record.
//!
//! There is one record per storage scope, under a fixed key. A second widget
//! pointed at the same storage reads and writes the same record.

use super::storage::Storage;
use crate::data::WidgetState;
use anyhow::{Context, Result};

/// Key of the one persisted record
pub const STORAGE_KEY: &str = "pomodoro-state";

/// Serialize the full state and overwrite the record
pub fn save_state(storage: &mut dyn Storage, state: &WidgetState) -> Result<()> {
    let json = serde_json::to_string(state).context("Failed to serialize widget state")?;
    storage
        .set(STORAGE_KEY, &json)
        .context("Failed to save widget state")?;
    tracing::trace!("Saved widget state: {}", json);
    Ok(())
}

/// Read the record back
///
/// A missing record is `Ok(None)`. A record that is present but does not
/// parse, or lacks any field, is an error; there is no partial recovery.
pub fn load_state(storage: &dyn Storage) -> Result<Option<WidgetState>> {
    let Some(json) = storage
        .get(STORAGE_KEY)
        .context("Failed to read widget state")?
    else {
        return Ok(None);
    };

    let state: WidgetState = serde_json::from_str(&json)
        .context(format!("Malformed widget state record '{}'", STORAGE_KEY))?;
    Ok(Some(state))
}
