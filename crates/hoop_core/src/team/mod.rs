//! # Team assignment
//!
//! Builds the per-frame track → team mapping consumed by the event
//! classifier. The actual jersey classification is external and plugged in
//! through [`TeamClassifier`]; this module only decides when to ask it.
//!
//! Answers are memoized per track id, and the memo is dropped every
//! `reset_interval` frames so a tracker id that gets recycled onto a player
//! of the other team is eventually re-examined.

use crate::geometry::BBox;
use crate::models::{PlayerFrame, Team, TeamFrame, TrackId};
use std::collections::HashMap;
use tracing::debug;

/// Frames between memo resets.
pub const DEFAULT_MEMO_RESET_INTERVAL: usize = 50;

/// External jersey classifier.
pub trait TeamClassifier {
    /// Team of the player in `bbox` at `frame`, `None` when undecidable
    /// (empty crop, classifier failure).
    fn classify(&mut self, frame: usize, track: TrackId, bbox: &BBox) -> Option<Team>;
}

impl<F> TeamClassifier for F
where
    F: FnMut(usize, TrackId, &BBox) -> Option<Team>,
{
    fn classify(&mut self, frame: usize, track: TrackId, bbox: &BBox) -> Option<Team> {
        self(frame, track, bbox)
    }
}

/// Memoizing front end of a [`TeamClassifier`], one per video.
pub struct TeamAssigner<C: TeamClassifier> {
    classifier: C,
    reset_interval: usize,
    memo: HashMap<TrackId, Team>,
    classifier_calls: usize,
}

impl<C: TeamClassifier> TeamAssigner<C> {
    pub fn new(classifier: C) -> Self {
        Self::with_reset_interval(classifier, DEFAULT_MEMO_RESET_INTERVAL)
    }

    /// `reset_interval` of 0 never resets.
    pub fn with_reset_interval(classifier: C, reset_interval: usize) -> Self {
        Self {
            classifier,
            reset_interval,
            memo: HashMap::new(),
            classifier_calls: 0,
        }
    }

    /// How often the classifier was actually invoked.
    pub fn classifier_calls(&self) -> usize {
        self.classifier_calls
    }

    /// Teams for one frame.
    pub fn assign_frame(&mut self, frame: usize, players: &PlayerFrame) -> TeamFrame {
        if self.reset_interval > 0 && frame % self.reset_interval == 0 {
            self.memo.clear();
        }

        let mut teams = TeamFrame::new();
        for (&id, bbox) in players {
            let team = match self.memo.get(&id) {
                Some(team) => Some(*team),
                None => {
                    self.classifier_calls += 1;
                    let team = self.classifier.classify(frame, id, bbox);
                    if let Some(team) = team {
                        self.memo.insert(id, team);
                    }
                    team
                }
            };
            if let Some(team) = team {
                teams.insert(id, team);
            }
        }
        teams
    }

    /// Teams for a whole video, frames in order.
    pub fn assign_all(&mut self, players: &[PlayerFrame]) -> Vec<TeamFrame> {
        let teams: Vec<TeamFrame> = players
            .iter()
            .enumerate()
            .map(|(frame, p)| self.assign_frame(frame, p))
            .collect();
        debug!(
            "Team assignment: {} frames, {} classifier calls",
            players.len(),
            self.classifier_calls
        );
        teams
    }

    pub fn into_classifier(self) -> C {
        self.classifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(ids: &[u32]) -> PlayerFrame {
        ids.iter()
            .map(|&id| (TrackId(id), BBox::new(0.0, 0.0, 10.0, 20.0)))
            .collect()
    }

    fn by_parity(_: usize, id: TrackId, _: &BBox) -> Option<Team> {
        Some(if id.0 % 2 == 0 { Team::Two } else { Team::One })
    }

    #[test]
    fn test_assigns_every_player() {
        let mut assigner = TeamAssigner::new(by_parity);
        let teams = assigner.assign_frame(0, &frame(&[1, 2, 3]));
        assert_eq!(teams[&TrackId(1)], Team::One);
        assert_eq!(teams[&TrackId(2)], Team::Two);
        assert_eq!(teams.len(), 3);
    }

    #[test]
    fn test_memoizes_between_resets() {
        let mut assigner = TeamAssigner::new(by_parity);
        let players = vec![frame(&[1, 2]); 120];
        let teams = assigner.assign_all(&players);

        assert_eq!(teams.len(), 120);
        // Classified at frames 0, 50 and 100
        assert_eq!(assigner.classifier_calls(), 6);
    }

    #[test]
    fn test_reset_picks_up_recycled_id() {
        // The classifier changes its mind about #7 after frame 2
        let classifier = |frame: usize, _: TrackId, _: &BBox| {
            Some(if frame < 2 { Team::One } else { Team::Two })
        };
        let mut assigner = TeamAssigner::with_reset_interval(classifier, 4);
        let teams = assigner.assign_all(&vec![frame(&[7]); 6]);

        assert_eq!(teams[3][&TrackId(7)], Team::One);
        assert_eq!(teams[4][&TrackId(7)], Team::Two);
    }

    #[test]
    fn test_undecided_players_are_retried() {
        let mut calls = 0;
        let classifier = |_: usize, _: TrackId, _: &BBox| {
            calls += 1;
            (calls > 1).then_some(Team::Two)
        };
        let mut assigner = TeamAssigner::new(classifier);
        let teams = assigner.assign_all(&vec![frame(&[3]); 3]);

        assert!(teams[0].is_empty());
        assert_eq!(teams[1][&TrackId(3)], Team::Two);
        assert_eq!(assigner.classifier_calls(), 2);
    }
}
