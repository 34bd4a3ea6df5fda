/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Panel preferences loaded from TOML.
//!
//! Missing file or malformed content falls back to defaults with a single
//! warning; a config problem must never keep the panel from coming up.

use std::path::{Path, PathBuf};

use log::warn;
use serde::Deserialize;

/// Display preferences for the manager panel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Name of the master control; rendered as `"<name>: ON"` etc.
    pub master_label: String,

    /// Initial panel width in canvas units. Preserved across rebuilds.
    pub panel_width: f32,

    /// Fixed panel height while collapsed.
    pub collapsed_height: f32,

    /// Height contributed by each visible control row while expanded.
    pub row_height: f32,

    /// Expanded-panel base height (title bar and padding).
    pub header_height: f32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            master_label: "control".to_string(),
            panel_width: 320.0,
            collapsed_height: 85.0,
            row_height: 24.0,
            header_height: 40.0,
        }
    }
}

impl PanelConfig {
    /// Parse a TOML document, falling back to defaults on any error.
    pub fn from_toml_str(raw: &str) -> Self {
        match toml::from_str(raw) {
            Ok(config) => config,
            Err(e) => {
                warn!("Malformed panel config, using defaults: {e}");
                Self::default()
            },
        }
    }

    /// Load from a TOML file. A missing or unreadable file yields defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::from_toml_str(&raw),
            Err(e) => {
                warn!("Panel config not readable at {}: {e}", path.display());
                Self::default()
            },
        }
    }
}

/// Default config location under the platform config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("graph-bypass").join("panel.toml"))
}
