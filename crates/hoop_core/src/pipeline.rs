//! # Analysis pipeline
//!
//! Runs every component over one video in dependency order:
//!
//! ```text
//! ball ─► clean ─► assign ─► classify / ball control
//! positions + keypoints ─► stabilize
//! ```
//!
//! All per-frame inputs are checked for alignment up front; a misaligned
//! stream fails the whole run before any component executes.
//!
//! The stages are exposed individually so a host can cache intermediate
//! results and resume from them.

use crate::analysis::{
    self, BallControlShare, CleanedBallTrack, EventTotals, PassEvents, StabilizedTactics,
};
use crate::config::{AnalysisConfig, StabilizationPolicy};
use crate::error::{AnalysisError, Result};
use crate::models::{AnalysisInput, Holder, KeypointSet, PositionFrame, Team};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Everything derived for one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub frame_count: usize,
    pub policy: StabilizationPolicy,
    pub ball: CleanedBallTrack,
    pub holders: Vec<Holder>,
    pub events: PassEvents,
    pub totals: EventTotals,
    pub ball_control: Vec<Option<Team>>,
    pub control_share: BallControlShare,
    /// Absent when the input carried no tactical data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tactical: Option<StabilizedTactics>,
}

/// Stage runner bound to one configuration.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: AnalysisConfig,
}

impl Pipeline {
    /// Fails on an invalid configuration.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Every per-frame stream must match the player stream's length.
    /// Tactical streams may be omitted entirely (left empty).
    pub fn validate(&self, input: &AnalysisInput) -> Result<()> {
        let frames = input.frame_count();
        AnalysisError::check_len("ball", frames, input.ball.len())?;
        AnalysisError::check_len("teams", frames, input.teams.len())?;
        if input.has_tactical_data() {
            if !input.tactical_positions.is_empty() {
                AnalysisError::check_len("tactical_positions", frames, input.tactical_positions.len())?;
            }
            if !input.court_keypoints.is_empty() {
                AnalysisError::check_len("court_keypoints", frames, input.court_keypoints.len())?;
            }
        }
        Ok(())
    }

    pub fn clean_ball(&self, input: &AnalysisInput) -> CleanedBallTrack {
        analysis::clean(&input.ball, self.config.ball.max_speed_px_per_frame)
    }

    pub fn assign_possession(&self, input: &AnalysisInput, ball: &CleanedBallTrack) -> Result<Vec<Holder>> {
        analysis::assign(&input.players, &ball.boxes, &self.config.possession)
    }

    pub fn stabilize_tactics(&self, input: &AnalysisInput) -> Result<Option<StabilizedTactics>> {
        if !input.has_tactical_data() {
            return Ok(None);
        }
        let frames = input.frame_count();
        // An omitted stream stands in as "nothing detected" for every frame
        let positions = if input.tactical_positions.is_empty() {
            vec![PositionFrame::new(); frames]
        } else {
            input.tactical_positions.clone()
        };
        let keypoints: Vec<Option<KeypointSet>> = if input.court_keypoints.is_empty() {
            vec![None; frames]
        } else {
            input.court_keypoints.clone()
        };
        analysis::stabilize(&positions, &keypoints, &self.config.tactical).map(Some)
    }

    /// Downstream stages given the ball track and holders.
    pub fn finish(
        &self,
        input: &AnalysisInput,
        ball: CleanedBallTrack,
        holders: Vec<Holder>,
    ) -> Result<AnalysisReport> {
        AnalysisError::check_len("holders", input.frame_count(), holders.len())?;

        let events = analysis::classify(&holders, &input.teams, &self.config.events)?;
        let totals = EventTotals::from_events(&events);
        let ball_control = analysis::team_ball_control(&holders, &input.teams)?;
        let control_share = BallControlShare::overall(&ball_control);
        let tactical = self.stabilize_tactics(input)?;

        info!(
            "Analysis: {} frames, passes {}/{}, interceptions {}/{}, control {:.1}%/{:.1}%",
            input.frame_count(),
            totals.passes_for(Team::One),
            totals.passes_for(Team::Two),
            totals.interceptions_for(Team::One),
            totals.interceptions_for(Team::Two),
            control_share.team_one * 100.0,
            control_share.team_two * 100.0
        );

        Ok(AnalysisReport {
            frame_count: input.frame_count(),
            policy: self.config.possession.policy,
            ball,
            holders,
            events,
            totals,
            ball_control,
            control_share,
            tactical,
        })
    }

    /// All stages, no caching.
    pub fn run(&self, input: &AnalysisInput) -> Result<AnalysisReport> {
        self.validate(input)?;
        let ball = self.clean_ball(input);
        let holders = self.assign_possession(input, &ball)?;
        self.finish(input, ball, holders)
    }
}

/// Validate `config` and analyze one video.
pub fn run_analysis(input: &AnalysisInput, config: &AnalysisConfig) -> Result<AnalysisReport> {
    Pipeline::new(config.clone())?.run(input)
}
