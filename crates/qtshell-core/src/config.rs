// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shell configuration, handed over by the Java activity as JSON.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

/// Settings for the shell activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// `tracing-subscriber` filter directive. `RUST_LOG` takes precedence.
    pub log_filter: String,
    /// Lay the Qt view out edge to edge (behind bars and cutouts) on create.
    pub immersive: bool,
    /// Delays after resume / focus gain / configuration change at which the
    /// window is asked to re-apply insets. Insets can arrive late, so one
    /// request is not enough.
    pub relayout_delays_ms: Vec<u64>,
    /// Intent action treated as a deep link.
    pub view_action: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_owned(),
            immersive: true,
            relayout_delays_ms: vec![50, 100, 500, 750, 1000, 2000],
            view_action: crate::ACTION_VIEW.to_owned(),
        }
    }
}

impl ShellConfig {
    /// Parse and validate a JSON document. Blank input yields the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: ShellConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.view_action.trim().is_empty() {
            return Err(BridgeError::Config("view_action must not be empty".into()));
        }
        if self.relayout_delays_ms.windows(2).any(|w| w[0] > w[1]) {
            return Err(BridgeError::Config(format!(
                "relayout_delays_ms must be ascending, got {:?}",
                self.relayout_delays_ms
            )));
        }
        Ok(())
    }

    pub fn relayout_delays(&self) -> impl Iterator<Item = Duration> + '_ {
        self.relayout_delays_ms
            .iter()
            .map(|ms| Duration::from_millis(*ms))
    }
}
