//! Pass/interception classifier configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Forget the last known holder whenever a "no holder" frame appears.
    ///
    /// Off by default: a handoff across a short loose-ball gap still counts.
    pub reset_baseline_on_gap: bool,
}
