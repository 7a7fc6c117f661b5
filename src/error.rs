//! Error types for role resolution and match configuration.
//!
//! A missing free room is not an error: allocation returns `None` and the caller
//! decides the fallback.

use crate::components::PlayerId;
use std::path::PathBuf;

/// Rejection of a role operation. Role state is left untouched when one is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RoleError {
    /// A player reported hitting themselves. Callers drop the event.
    #[error("{0} cannot hit themselves")]
    InvalidHit(PlayerId),

    /// The id was never registered, or was already removed. This is a caller bug.
    #[error("{0} is not registered")]
    UnknownPlayer(PlayerId),

    #[error("{0} is already registered")]
    DuplicatePlayer(PlayerId),
}

/// Problems with match configuration, detected before the match starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no room anchors configured")]
    NoRoomsConfigured,

    #[error("occupancy threshold must be finite and positive, got {0}")]
    InvalidThreshold(f32),

    #[error("match needs at least one player")]
    NoPlayers,

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
