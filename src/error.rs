//! Error types for lore_radio.

use std::path::PathBuf;

/// Result type alias for radio operations.
pub type Result<T> = std::result::Result<T, RadioError>;

/// Errors raised while loading the catalog, persisting state or tuning.
#[derive(Debug, thiserror::Error)]
pub enum RadioError {
    /// The audio root directory does not exist.
    #[error("{} not found. Place your game audio folders here.", .0.display())]
    MissingDirectory(PathBuf),

    /// A station folder does not hold exactly one audio file.
    #[error("{} must contain exactly one WAV (found {found})", .path.display())]
    InvalidStation { path: PathBuf, found: usize },

    /// The audio header or frame count could not be parsed.
    #[error("cannot read audio header of {}", .path.display())]
    UnreadableAudio {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The audio file parsed but reports no playable length.
    #[error("{} has zero duration", .0.display())]
    EmptyAudio(PathBuf),

    /// The persisted session file exists but cannot be parsed.
    #[error("corrupt state file {}", .path.display())]
    CorruptState {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The optional config file exists but cannot be parsed.
    #[error("corrupt config file {}", .path.display())]
    CorruptConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No such (game, station) pair in the catalog.
    #[error("unknown station '{game}' / '{station}'")]
    UnknownStation { game: String, station: String },

    /// Audio output or decoder failure.
    #[error("audio error: {0}")]
    Audio(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RadioError {
    /// True for errors caused by a stale (game, station) reference.
    pub fn is_unknown_station(&self) -> bool {
        matches!(self, RadioError::UnknownStation { .. })
    }
}
