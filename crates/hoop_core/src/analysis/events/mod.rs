//! Ball events derived from the holder sequence

pub mod ball_control;
pub mod pass_interception;

pub use ball_control::{team_ball_control, BallControlShare};
pub use pass_interception::{classify, EventTotals, PassEvents};
