//! Level loading errors
//!
//! The only failure class in the core. Inside the frame loop these are logged
//! and turned into the terminal `AllLevelsCleared` phase.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    /// No layout exists for this level
    NotFound { level: u32, path: Option<PathBuf> },
    /// The layout exists but could not be read
    Unreadable {
        level: u32,
        path: PathBuf,
        message: String,
    },
    /// The layout contains no rows
    Empty { level: u32 },
}

impl LevelError {
    /// Level number the error refers to
    pub fn level(&self) -> u32 {
        match self {
            Self::NotFound { level, .. } | Self::Unreadable { level, .. } | Self::Empty { level } => {
                *level
            }
        }
    }
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound {
                level,
                path: Some(path),
            } => write!(f, "level {level} not found at {}", path.display()),
            Self::NotFound { level, path: None } => write!(f, "level {level} not found"),
            Self::Unreadable {
                level,
                path,
                message,
            } => write!(
                f,
                "level {level} at {} is unreadable: {message}",
                path.display()
            ),
            Self::Empty { level } => write!(f, "level {level} has no rows"),
        }
    }
}

impl std::error::Error for LevelError {}
