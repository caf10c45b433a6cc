//! Temporal inference components
//!
//! Data flows ball_track -> possession -> events. The tactical stabilizer runs
//! on its own inputs.

pub mod ball_track;
pub mod events;
pub mod possession;
pub mod tactical;

pub use ball_track::{clean, CleanedBallTrack, TrackStatus};
pub use events::{classify, team_ball_control, BallControlShare, EventTotals, PassEvents};
pub use possession::{assign, PossessionAssigner, PossessionPolicy};
pub use tactical::{stabilize, StabilizedTactics};
