//! Error types with fix suggestions

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum FarmError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings import failed: {details}")]
    SettingsImport { details: String },

    #[error("Robot '{robot_id}' not found")]
    RobotNotFound { robot_id: String },

    #[error("Cow '{cow_id}' not found")]
    CowNotFound { cow_id: String },
}

impl FixSuggestion for FarmError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            FarmError::Io(_) => Some("Check file path and permissions"),
            FarmError::Json(_) => Some("Check the document is well-formed JSON"),
            FarmError::SettingsImport { .. } => {
                Some("Export current settings first to see the expected shape")
            }
            FarmError::RobotNotFound { .. } => {
                Some("Robot ids are fixed at seed time (R001-R004)")
            }
            FarmError::CowNotFound { .. } => {
                Some("The cow may have been deleted; refresh the herd view")
            }
        }
    }
}
