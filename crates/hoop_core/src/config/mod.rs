//! # Analysis Configuration
//!
//! All tuning constants of the temporal inference layer live here instead of
//! being scattered through the components.
//!
//! ## Presets
//! - `broadcast` (default): values tuned for standard broadcast footage
//! - `responsive`: shorter windows, reacts faster to handoffs, more flicker
//! - `strict`: longer windows, tighter distances, fewer false events
//!
//! ## Usage
//! ```rust
//! use hoop_core::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::default();
//! let strict = AnalysisConfig::strict();
//! let from_env = AnalysisConfig::from_env_or_default();
//! assert!(config.validate().is_ok());
//! ```
//!
//! ## Environment Variables
//!
//! - `HOOP_ANALYSIS_PROFILE`: Select preset (broadcast, responsive, strict)

mod ball_config;
mod event_config;
mod possession_config;
mod tactical_config;

pub use ball_config::BallTrackConfig;
pub use event_config::EventConfig;
pub use possession_config::{
    PossessionConfig, StabilizationPolicy, MIN_CONSECUTIVE_FRAMES, MIN_VOTE_WINDOW,
};
pub use tactical_config::{TacticalConfig, DEFAULT_COURT_HEIGHT, DEFAULT_COURT_WIDTH};

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Environment variable selecting a preset.
pub const PROFILE_ENV_VAR: &str = "HOOP_ANALYSIS_PROFILE";

/// Configuration of every component
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub ball: BallTrackConfig,
    #[serde(default)]
    pub possession: PossessionConfig,
    #[serde(default)]
    pub events: EventConfig,
    #[serde(default)]
    pub tactical: TacticalConfig,
}

impl AnalysisConfig {
    /// Standard broadcast footage (default)
    pub fn broadcast() -> Self {
        Self::default()
    }

    /// Faster handoffs: majority vote over a short window
    pub fn responsive() -> Self {
        let mut cfg = Self::default();
        cfg.possession.policy = StabilizationPolicy::MajorityVote;
        cfg.possession.vote_window = 5;
        cfg.possession.grace_frames = 2;
        cfg.tactical.smoothing_factor = 0.6;
        cfg
    }

    /// Conservative: more evidence before a holder change
    pub fn strict() -> Self {
        let mut cfg = Self::default();
        cfg.ball.max_speed_px_per_frame = 20.0;
        cfg.possession.containment_threshold = 0.9;
        cfg.possession.possession_distance_px = 40.0;
        cfg.possession.min_consecutive_frames = 15;
        cfg.tactical.match_distance_threshold = 35.0;
        cfg
    }

    /// Preset by name, `None` for unknown names.
    pub fn from_profile(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "" | "default" | "broadcast" => Some(Self::broadcast()),
            "responsive" => Some(Self::responsive()),
            "strict" => Some(Self::strict()),
            _ => None,
        }
    }

    /// Load from environment variable HOOP_ANALYSIS_PROFILE or use default
    pub fn from_env_or_default() -> Self {
        let profile = env::var(PROFILE_ENV_VAR).unwrap_or_default();
        Self::from_profile(&profile).unwrap_or_else(|| {
            tracing::warn!("Unknown {} '{}', using defaults", PROFILE_ENV_VAR, profile);
            Self::default()
        })
    }

    /// Parse a YAML or JSON document. Missing sections fall back to defaults.
    pub fn from_str_with_format(text: &str, json: bool) -> Result<Self> {
        let cfg: AnalysisConfig = if json {
            serde_json::from_str(text)?
        } else {
            serde_yaml::from_str(text)?
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        let json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        Self::from_str_with_format(&text, json)
    }

    /// Reject values that would make a component meaningless.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(AnalysisError::InvalidConfig(msg.to_string()));

        if !(self.ball.max_speed_px_per_frame > 0.0) {
            return invalid("ball.max_speed_px_per_frame must be positive");
        }
        let p = &self.possession;
        if !(0.0..=1.0).contains(&p.containment_threshold) {
            return invalid("possession.containment_threshold must be within [0, 1]");
        }
        if !(p.possession_distance_px > 0.0) {
            return invalid("possession.possession_distance_px must be positive");
        }
        if p.min_consecutive_frames < MIN_CONSECUTIVE_FRAMES {
            return Err(AnalysisError::InvalidConfig(format!(
                "possession.min_consecutive_frames must be at least {}",
                MIN_CONSECUTIVE_FRAMES
            )));
        }
        if p.vote_window < MIN_VOTE_WINDOW {
            return Err(AnalysisError::InvalidConfig(format!(
                "possession.vote_window must be at least {}",
                MIN_VOTE_WINDOW
            )));
        }
        let t = &self.tactical;
        if !(0.0..=1.0).contains(&t.smoothing_factor) {
            return invalid("tactical.smoothing_factor must be within [0, 1]");
        }
        if !(t.match_distance_threshold > 0.0) {
            return invalid("tactical.match_distance_threshold must be positive");
        }
        if !(t.court_width > 0.0 && t.court_height > 0.0) {
            return invalid("tactical court extent must be positive");
        }
        Ok(())
    }
}

// ========== Tests ==========
