//! # Possession Assigner
//!
//! Decides, frame by frame, which player holds the ball.
//!
//! ## Algorithm
//! 1. Ball present: pick the raw candidate for the frame
//!    ([`candidate::select_candidate`]) and feed it to the configured
//!    stabilization policy, which decides what is reported.
//! 2. Ball missing: no candidate is computed. The last reported holder is
//!    kept for up to `grace_frames` frames with the policy's evidence frozen.
//!    Once the grace runs out the report drops to "no holder" and the policy
//!    starts from scratch.
//!
//! One assigner instance carries the state of one video.

pub mod candidate;
pub mod policy;

pub use candidate::{key_points, min_key_point_distance, select_candidate};
pub use policy::{build_policy, ConsecutiveFramesPolicy, MajorityVotePolicy, PossessionPolicy};

use crate::config::PossessionConfig;
use crate::error::{AnalysisError, Result};
use crate::geometry::BBox;
use crate::models::{Holder, PlayerFrame};
use tracing::debug;

/// Stateful per-video possession tracker.
pub struct PossessionAssigner {
    config: PossessionConfig,
    policy: Box<dyn PossessionPolicy>,
    reported: Holder,
    frames_without_ball: usize,
}

impl PossessionAssigner {
    pub fn new(config: PossessionConfig) -> Self {
        let policy = build_policy(&config);
        Self::with_policy(config, policy)
    }

    /// Use a caller-supplied stabilization policy.
    pub fn with_policy(config: PossessionConfig, policy: Box<dyn PossessionPolicy>) -> Self {
        Self {
            config,
            policy,
            reported: None,
            frames_without_ball: 0,
        }
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Advance one frame.
    pub fn step(&mut self, players: &PlayerFrame, ball: Option<&BBox>) -> Holder {
        self.reported = match ball {
            Some(ball) => {
                self.frames_without_ball = 0;
                let candidate = select_candidate(players, ball, &self.config);
                self.policy.observe(candidate)
            }
            None => {
                self.frames_without_ball += 1;
                if self.frames_without_ball <= self.config.grace_frames {
                    self.reported
                } else {
                    if self.frames_without_ball == self.config.grace_frames + 1 {
                        debug!(
                            "Possession: ball missing for {} frames, dropping holder {:?}",
                            self.frames_without_ball, self.reported
                        );
                        self.policy.reset();
                    }
                    None
                }
            }
        };
        self.reported
    }

    /// Run over a whole video. Both sequences must have one entry per frame.
    pub fn assign(&mut self, players: &[PlayerFrame], ball: &[Option<BBox>]) -> Result<Vec<Holder>> {
        AnalysisError::check_len("ball", players.len(), ball.len())?;

        Ok(players
            .iter()
            .zip(ball)
            .map(|(frame, ball)| self.step(frame, ball.as_ref()))
            .collect())
    }
}

/// Per-frame holders for one video with a fresh assigner.
pub fn assign(
    players: &[PlayerFrame],
    ball: &[Option<BBox>],
    config: &PossessionConfig,
) -> Result<Vec<Holder>> {
    let mut assigner = PossessionAssigner::new(config.clone());
    let holders = assigner.assign(players, ball)?;

    debug!(
        "Possession ({}): {} of {} frames have a holder",
        assigner.policy_name(),
        holders.iter().filter(|h| h.is_some()).count(),
        holders.len()
    );
    Ok(holders)
}
