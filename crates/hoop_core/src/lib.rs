//! # hoop_core - Temporal inference for basketball broadcast detections
//!
//! Turns noisy per-frame detections (player boxes, ball box, court keypoints,
//! team labels) into temporally stable facts about the game.
//!
//! ## Features
//! - Ball track cleaning: outlier rejection and gap interpolation
//! - Possession assignment with configurable stabilization policy
//! - Pass / interception classification and team ball control
//! - Tactical coordinate smoothing and court keypoint ordering
//!
//! Every component is a synchronous batch transform over a whole video held in
//! memory. Running state is created per call, so separate videos can be
//! analyzed concurrently without sharing anything.

// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod geometry;
pub mod models;
pub mod pipeline;
pub mod team;

pub use config::{AnalysisConfig, StabilizationPolicy};
pub use error::{AnalysisError, Result};
pub use geometry::{containment_ratio, distance, BBox, Point};
pub use models::{
    AnalysisInput, FrameEvent, Holder, KeypointSet, PlayerFrame, PositionFrame, Team, TeamFrame,
    TrackId,
};
pub use pipeline::{run_analysis, AnalysisReport, Pipeline};
pub use team::{TeamAssigner, TeamClassifier};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
