use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Length mismatch in {stream}: expected {expected} frames, found {found}")]
    LengthMismatch {
        stream: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AnalysisError {
    /// Fail fast unless `found == expected`.
    pub fn check_len(stream: &'static str, expected: usize, found: usize) -> Result<()> {
        if expected == found {
            Ok(())
        } else {
            Err(AnalysisError::LengthMismatch {
                stream,
                expected,
                found,
            })
        }
    }

    /// Precondition violations corrupt every downstream frame; nothing to retry.
    pub fn is_precondition(&self) -> bool {
        matches!(self, AnalysisError::LengthMismatch { .. })
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AnalysisError {
    fn from(err: serde_yaml::Error) -> Self {
        AnalysisError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
