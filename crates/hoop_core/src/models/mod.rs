pub mod frame;
pub mod track;

pub use frame::{
    AnalysisInput, FrameEvent, Holder, KeypointSet, PlayerFrame, PositionFrame, TeamFrame,
};
pub use track::{Team, TrackId};
