//! Temporal stabilization policies
//!
//! A policy consumes the raw per-frame candidate stream and decides what gets
//! reported. Both implementations guarantee that a candidate seen for a single
//! isolated frame is never reported.
//!
//! ## Consecutive frames
//! Counts how many frames in a row the same candidate appeared. The candidate
//! is reported once the streak reaches `min_consecutive_frames`; any change of
//! candidate (including "no holder") restarts the streak and reports nobody.
//!
//! ## Majority vote
//! Keeps the last `vote_window` raw candidates. A holder is reported when it
//! fills at least half the window; otherwise the previous report stands.

use crate::config::{
    PossessionConfig, StabilizationPolicy, MIN_CONSECUTIVE_FRAMES, MIN_VOTE_WINDOW,
};
use crate::models::{Holder, TrackId};
use std::collections::{BTreeMap, VecDeque};

/// Turns raw candidates into a reported holder, one frame at a time.
///
/// Implementations hold per-video state; build a fresh one per run.
pub trait PossessionPolicy: Send {
    /// Feed the raw candidate of the next frame, get the holder to report.
    fn observe(&mut self, candidate: Holder) -> Holder;

    /// Drop all accumulated evidence.
    fn reset(&mut self);

    fn name(&self) -> &'static str;
}

/// Build the policy selected by `config.policy`.
pub fn build_policy(config: &PossessionConfig) -> Box<dyn PossessionPolicy> {
    match config.policy {
        StabilizationPolicy::Consecutive => {
            Box::new(ConsecutiveFramesPolicy::new(config.min_consecutive_frames))
        }
        StabilizationPolicy::MajorityVote => Box::new(MajorityVotePolicy::new(config.vote_window)),
    }
}

// ========== Consecutive frames ==========

#[derive(Debug, Clone)]
pub struct ConsecutiveFramesPolicy {
    min_frames: usize,
    streak_holder: Holder,
    streak_len: usize,
}

impl ConsecutiveFramesPolicy {
    /// Streaks shorter than [`MIN_CONSECUTIVE_FRAMES`] are raised to it.
    pub fn new(min_frames: usize) -> Self {
        Self {
            min_frames: min_frames.max(MIN_CONSECUTIVE_FRAMES),
            streak_holder: None,
            streak_len: 0,
        }
    }

    /// Length of the current streak.
    pub fn streak(&self) -> usize {
        self.streak_len
    }
}

impl PossessionPolicy for ConsecutiveFramesPolicy {
    fn observe(&mut self, candidate: Holder) -> Holder {
        let Some(id) = candidate else {
            self.reset();
            return None;
        };

        if self.streak_holder == Some(id) {
            self.streak_len += 1;
        } else {
            self.streak_holder = Some(id);
            self.streak_len = 1;
        }

        (self.streak_len >= self.min_frames).then_some(id)
    }

    fn reset(&mut self) {
        self.streak_holder = None;
        self.streak_len = 0;
    }

    fn name(&self) -> &'static str {
        "consecutive"
    }
}

// ========== Majority vote ==========

#[derive(Debug, Clone)]
pub struct MajorityVotePolicy {
    window: usize,
    buffer: VecDeque<Holder>,
    reported: Holder,
}

impl MajorityVotePolicy {
    /// Windows shorter than [`MIN_VOTE_WINDOW`] are raised to it.
    pub fn new(window: usize) -> Self {
        let window = window.max(MIN_VOTE_WINDOW);
        Self {
            window,
            buffer: VecDeque::with_capacity(window),
            reported: None,
        }
    }

    /// Most frequent holder in the buffer with its count.
    ///
    /// Count ties keep the current report, then the lowest id.
    fn leader(&self) -> Option<(TrackId, usize)> {
        let mut counts: BTreeMap<TrackId, usize> = BTreeMap::new();
        for id in self.buffer.iter().flatten() {
            *counts.entry(*id).or_insert(0) += 1;
        }

        let mut leader: Option<(TrackId, usize)> = None;
        for (id, count) in counts {
            let better = match leader {
                None => true,
                Some((_, lead_count)) => {
                    count > lead_count || (count == lead_count && self.reported == Some(id))
                }
            };
            if better {
                leader = Some((id, count));
            }
        }
        leader
    }
}

impl PossessionPolicy for MajorityVotePolicy {
    fn observe(&mut self, candidate: Holder) -> Holder {
        if self.buffer.len() == self.window {
            self.buffer.pop_front();
        }
        self.buffer.push_back(candidate);

        if let Some((id, count)) = self.leader() {
            if 2 * count >= self.window {
                self.reported = Some(id);
            }
        }
        self.reported
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.reported = None;
    }

    fn name(&self) -> &'static str {
        "majority_vote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<Holder> {
        raw.iter().map(|&i| if i == 0 { None } else { Some(TrackId(i)) }).collect()
    }

    fn run(policy: &mut dyn PossessionPolicy, stream: &[Holder]) -> Vec<Holder> {
        stream.iter().map(|&c| policy.observe(c)).collect()
    }

    #[test]
    fn test_consecutive_promotes_at_threshold() {
        let mut policy = ConsecutiveFramesPolicy::new(11);
        let out = run(&mut policy, &ids(&[5; 11]));
        assert!(out[..10].iter().all(Option::is_none));
        assert_eq!(out[10], Some(TrackId(5)));
    }

    #[test]
    fn test_consecutive_change_restarts_streak() {
        let mut policy = ConsecutiveFramesPolicy::new(3);
        let out = run(&mut policy, &ids(&[5, 5, 5, 7, 7, 7, 0, 7]));
        assert_eq!(out, ids(&[0, 0, 5, 0, 0, 7, 0, 0]));
        assert_eq!(policy.streak(), 1);
    }

    #[test]
    fn test_consecutive_no_single_frame_flicker() {
        let mut policy = ConsecutiveFramesPolicy::new(3);
        let out = run(&mut policy, &ids(&[5, 5, 5, 5, 9, 5, 5, 5, 5]));
        assert!(!out.contains(&Some(TrackId(9))));
    }

    #[test]
    fn test_short_windows_are_raised_to_the_floor() {
        let stream = ids(&[5, 5, 5, 9, 5, 5]);
        for frames in [0, 1] {
            let mut policy = ConsecutiveFramesPolicy::new(frames);
            assert!(!run(&mut policy, &stream).contains(&Some(TrackId(9))));
        }
        for window in [0, 1, 2] {
            let mut policy = MajorityVotePolicy::new(window);
            let out = run(&mut policy, &ids(&[5, 5, 5, 9, 0, 5]));
            assert!(!out.contains(&Some(TrackId(9))), "window {} flickered", window);
        }
    }

    #[test]
    fn test_isolated_intruder_never_reported() {
        let intruder = TrackId(100);
        for (lead, tail) in [(0, 0), (0, 6), (1, 1), (4, 0), (5, 5), (12, 3), (2, 15)] {
            let mut stream = vec![Some(TrackId(5)); lead];
            stream.push(Some(intruder));
            stream.extend(std::iter::repeat(Some(TrackId(5))).take(tail));

            let policies: [Box<dyn PossessionPolicy>; 4] = [
                Box::new(ConsecutiveFramesPolicy::new(11)),
                Box::new(ConsecutiveFramesPolicy::new(MIN_CONSECUTIVE_FRAMES)),
                Box::new(MajorityVotePolicy::new(5)),
                Box::new(MajorityVotePolicy::new(MIN_VOTE_WINDOW)),
            ];
            for mut policy in policies {
                let out = run(policy.as_mut(), &stream);
                assert!(
                    !out.contains(&Some(intruder)),
                    "{} lead {} tail {}",
                    policy.name(),
                    lead,
                    tail
                );
            }
        }
    }

    #[test]
    fn test_majority_needs_half_the_window() {
        let mut policy = MajorityVotePolicy::new(5);
        let out = run(&mut policy, &ids(&[4, 4, 4, 4]));
        // 2 × count must reach 5
        assert_eq!(out, ids(&[0, 0, 4, 4]));
    }

    #[test]
    fn test_majority_no_single_frame_flicker() {
        let mut policy = MajorityVotePolicy::new(5);
        let out = run(&mut policy, &ids(&[5, 5, 5, 5, 5, 9, 5, 5, 0, 5]));
        assert!(!out.contains(&Some(TrackId(9))));
        assert_eq!(out[9], Some(TrackId(5)));
    }

    #[test]
    fn test_majority_switches_on_sustained_evidence() {
        let mut policy = MajorityVotePolicy::new(5);
        let out = run(&mut policy, &ids(&[5, 5, 5, 5, 5, 8, 8, 8]));
        assert_eq!(out[6], Some(TrackId(5)));
        assert_eq!(out[7], Some(TrackId(8)));
    }

    #[test]
    fn test_majority_holds_through_loose_ball() {
        let mut policy = MajorityVotePolicy::new(5);
        let out = run(&mut policy, &ids(&[5, 5, 5, 0, 0, 0, 0, 0]));
        assert!(out[2..].iter().all(|h| *h == Some(TrackId(5))));
    }

    #[test]
    fn test_majority_tie_keeps_current_holder() {
        let mut policy = MajorityVotePolicy::new(4);
        let out = run(&mut policy, &ids(&[6, 6, 6, 6, 2, 2]));
        // Buffer [6, 6, 2, 2]: both reach half, the current holder stays
        assert_eq!(out[5], Some(TrackId(6)));
    }

    #[test]
    fn test_reset_clears_evidence() {
        let mut policy = MajorityVotePolicy::new(3);
        run(&mut policy, &ids(&[5, 5, 5]));
        policy.reset();
        assert_eq!(policy.observe(None), None);
    }

    #[test]
    fn test_build_policy_follows_config() {
        let mut cfg = PossessionConfig::default();
        assert_eq!(build_policy(&cfg).name(), "consecutive");
        cfg.policy = StabilizationPolicy::MajorityVote;
        assert_eq!(build_policy(&cfg).name(), "majority_vote");
    }

    #[cfg(all(test, feature = "proptest"))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: an id that appears for one isolated frame is never reported
            #[test]
            fn prop_isolated_id_never_reported(
                stable in 1u32..50,
                lead in 0usize..20,
                tail in 0usize..20,
                majority in any::<bool>(),
            ) {
                let intruder = TrackId(100);
                let mut stream = vec![Some(TrackId(stable)); lead];
                stream.push(Some(intruder));
                stream.extend(std::iter::repeat(Some(TrackId(stable))).take(tail));

                let mut policy: Box<dyn PossessionPolicy> = if majority {
                    Box::new(MajorityVotePolicy::new(5))
                } else {
                    Box::new(ConsecutiveFramesPolicy::new(11))
                };
                for c in stream {
                    prop_assert_ne!(policy.observe(c), Some(intruder));
                }
            }
        }
    }
}
