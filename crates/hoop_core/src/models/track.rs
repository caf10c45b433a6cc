//! Track identities and team labels

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity assigned by the upstream tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub u32);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for TrackId {
    fn from(id: u32) -> Self {
        TrackId(id)
    }
}

/// Team label. Serialized as the upstream integer label `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Team {
    One,
    Two,
}

impl Team {
    /// Upstream integer label.
    pub fn label(&self) -> u8 {
        match self {
            Team::One => 1,
            Team::Two => 2,
        }
    }

    /// Index into per-team arrays (`0` or `1`).
    pub fn index(&self) -> usize {
        match self {
            Team::One => 0,
            Team::Two => 1,
        }
    }
}

impl TryFrom<u8> for Team {
    type Error = String;

    fn try_from(label: u8) -> Result<Self, Self::Error> {
        match label {
            1 => Ok(Team::One),
            2 => Ok(Team::Two),
            other => Err(format!("invalid team label {}, expected 1 or 2", other)),
        }
    }
}

impl From<Team> for u8 {
    fn from(team: Team) -> Self {
        team.label()
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Team {}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_labels_round_trip() {
        assert_eq!(Team::try_from(1u8), Ok(Team::One));
        assert_eq!(Team::try_from(2u8), Ok(Team::Two));
        assert!(Team::try_from(0u8).is_err());
        assert!(Team::try_from(3u8).is_err());
        assert_eq!(Team::Two.index(), 1);
    }

    #[test]
    fn test_team_serde_uses_integer_label() {
        let json = serde_json::to_string(&Team::Two).unwrap();
        assert_eq!(json, "2");
        let parsed: Result<Team, _> = serde_json::from_str("7");
        assert!(parsed.is_err());
    }
}
