//! Persistence of the canvas between runs
//!
//! The boxes and settings are stored as one JSON blob in eframe's storage.
//! egui's own memory (window positions etc.) is persisted by eframe itself.

use crate::settings::Settings;
use crate::shape::Shapes;
use anyhow::{Context, Result};
use eframe::Storage;
use serde::{Deserialize, Serialize};

/// storage key of the saved canvas
pub const STATE_KEY: &str = "drag_and_draw.state";

/// everything that survives a restart
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedState {
    #[serde(default)]
    pub shapes: Shapes,
    #[serde(default)]
    pub settings: Settings,
}

impl SavedState {
    pub fn new(shapes: Shapes, settings: Settings) -> Self {
        SavedState { shapes, settings }
    }

    /// Write state into storage
    pub fn save(&self, storage: &mut dyn Storage) -> Result<()> {
        let json = serde_json::to_string(self).context("Failed to encode canvas state")?;
        storage.set_string(STATE_KEY, json);
        Ok(())
    }

    /// Read state from storage, `None` if nothing was saved yet
    pub fn load(storage: &dyn Storage) -> Result<Option<Self>> {
        let Some(json) = storage.get_string(STATE_KEY) else {
            return Ok(None);
        };
        let state = serde_json::from_str(&json)
            .with_context(|| format!("Failed to decode stored value for {STATE_KEY}"))?;
        Ok(Some(state))
    }

    /// Load saved state, falling back to an empty canvas
    ///
    /// A missing storage, a missing key and an undecodable value all give the
    /// default; the last one is logged.
    pub fn restore_or_default(storage: Option<&dyn Storage>) -> Self {
        let Some(storage) = storage else {
            log::debug!("No storage available, starting with an empty canvas");
            return Self::default();
        };
        match Self::load(storage) {
            Ok(Some(state)) => {
                log::info!("Restored {} boxes", state.shapes.boxes.len());
                state
            }
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Discarding saved canvas: {:#}", e);
                Self::default()
            }
        }
    }
}
