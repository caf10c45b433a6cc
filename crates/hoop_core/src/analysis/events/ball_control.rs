//! Team ball control
//!
//! Which team holds the ball in each frame, and the running share of control
//! each team has accumulated up to that frame.

use crate::error::{AnalysisError, Result};
use crate::models::{Holder, Team, TeamFrame};
use serde::{Deserialize, Serialize};

/// Controlling team per frame; `None` when nobody holds the ball or the
/// holder has no team in that frame.
pub fn team_ball_control(holders: &[Holder], teams: &[TeamFrame]) -> Result<Vec<Option<Team>>> {
    AnalysisError::check_len("teams", holders.len(), teams.len())?;

    Ok(holders
        .iter()
        .zip(teams)
        .map(|(holder, team_frame)| holder.and_then(|id| team_frame.get(&id).copied()))
        .collect())
}

/// Share of controlled frames per team, 0.0 - 1.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BallControlShare {
    pub team_one: f32,
    pub team_two: f32,
}

impl BallControlShare {
    pub fn for_team(&self, team: Team) -> f32 {
        match team {
            Team::One => self.team_one,
            Team::Two => self.team_two,
        }
    }

    /// Share over the whole sequence.
    pub fn overall(control: &[Option<Team>]) -> Self {
        Self::cumulative(control).last().copied().unwrap_or_default()
    }

    /// Running share up to and including each frame.
    ///
    /// Frames without a controlling team are left out of the denominator;
    /// until the first controlled frame both shares are 0.
    pub fn cumulative(control: &[Option<Team>]) -> Vec<Self> {
        let mut counts = [0usize; 2];
        control
            .iter()
            .map(|team| {
                if let Some(team) = team {
                    counts[team.index()] += 1;
                }
                let total = (counts[0] + counts[1]) as f32;
                if total > 0.0 {
                    Self {
                        team_one: counts[0] as f32 / total,
                        team_two: counts[1] as f32 / total,
                    }
                } else {
                    Self::default()
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrackId;

    #[test]
    fn test_control_follows_holder_team() {
        let teams: Vec<TeamFrame> = vec![
            TeamFrame::from([(TrackId(3), Team::One), (TrackId(8), Team::Two)]);
            4
        ];
        let holders = vec![None, Some(TrackId(3)), Some(TrackId(8)), Some(TrackId(12))];
        let control = team_ball_control(&holders, &teams).unwrap();
        assert_eq!(control, vec![None, Some(Team::One), Some(Team::Two), None]);
    }

    #[test]
    fn test_cumulative_share() {
        let control = vec![None, Some(Team::One), Some(Team::One), None, Some(Team::Two)];
        let shares = BallControlShare::cumulative(&control);

        assert_eq!(shares[0], BallControlShare::default());
        assert!((shares[2].team_one - 1.0).abs() < 1e-6);
        assert!((shares[3].team_one - 1.0).abs() < 1e-6);
        assert!((shares[4].for_team(Team::One) - 2.0 / 3.0).abs() < 1e-6);
        assert!((shares[4].for_team(Team::Two) - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(BallControlShare::overall(&control), shares[4]);
    }

    #[test]
    fn test_empty_sequences() {
        assert!(team_ball_control(&[], &[]).unwrap().is_empty());
        assert_eq!(BallControlShare::overall(&[]), BallControlShare::default());
    }

    #[test]
    fn test_length_mismatch_is_fatal() {
        assert!(team_ball_control(&[None], &[]).is_err());
    }
}
