//! # Pass/Interception Classifier
//!
//! Labels each change of ball holder as a pass (same team) or an
//! interception (other team).
//!
//! ## State
//! - `last_holder`: the most recent valid holder
//! - `last_team`: that holder's team in the frame it was last seen holding
//!
//! ## Per frame
//! When the current holder is valid and differs from a valid `last_holder`,
//! its team is compared with `last_team`: equal means a pass for that team,
//! different (both known) means an interception for the new team. The state
//! then moves to the current holder whenever it is valid. "No holder" frames
//! never emit. Whether they erase `last_holder` is governed by
//! [`EventConfig::reset_baseline_on_gap`].

use crate::config::EventConfig;
use crate::error::{AnalysisError, Result};
use crate::models::{FrameEvent, Holder, Team, TeamFrame, TrackId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Per-frame event streams. Both have one entry per frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassEvents {
    pub passes: Vec<FrameEvent>,
    pub interceptions: Vec<FrameEvent>,
}

impl PassEvents {
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

#[derive(Debug, Default)]
struct Baseline {
    holder: Option<TrackId>,
    team: Option<Team>,
}

/// Classify every holder change of one video.
///
/// `holders` and `teams` must have one entry per frame.
pub fn classify(holders: &[Holder], teams: &[TeamFrame], config: &EventConfig) -> Result<PassEvents> {
    AnalysisError::check_len("teams", holders.len(), teams.len())?;

    let mut events = PassEvents {
        passes: vec![None; holders.len()],
        interceptions: vec![None; holders.len()],
    };
    let mut baseline = Baseline::default();

    for (frame, (&holder, team_frame)) in holders.iter().zip(teams).enumerate() {
        let Some(current) = holder else {
            if config.reset_baseline_on_gap {
                baseline = Baseline::default();
            }
            continue;
        };
        let current_team = team_frame.get(&current).copied();

        if let Some(previous) = baseline.holder {
            if previous != current {
                match (baseline.team, current_team) {
                    (Some(before), Some(now)) if before == now => {
                        debug!("Frame {}: pass {} -> {} ({})", frame, previous, current, now);
                        events.passes[frame] = Some(now);
                    }
                    (Some(_), Some(now)) => {
                        debug!("Frame {}: interception by {} ({})", frame, current, now);
                        events.interceptions[frame] = Some(now);
                    }
                    _ => {}
                }
            }
        }

        baseline.holder = Some(current);
        baseline.team = current_team;
    }

    Ok(events)
}

/// Pass and interception counts per team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTotals {
    /// Indexed by [`Team::index`]
    pub passes: [usize; 2],
    pub interceptions: [usize; 2],
}

impl EventTotals {
    pub fn from_events(events: &PassEvents) -> Self {
        let mut totals = Self::default();
        for team in events.passes.iter().flatten() {
            totals.passes[team.index()] += 1;
        }
        for team in events.interceptions.iter().flatten() {
            totals.interceptions[team.index()] += 1;
        }
        totals
    }

    pub fn passes_for(&self, team: Team) -> usize {
        self.passes[team.index()]
    }

    pub fn interceptions_for(&self, team: Team) -> usize {
        self.interceptions[team.index()]
    }
}
