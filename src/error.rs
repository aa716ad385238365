//! Error types
//!
//! Malformed device lines are recovered where they are read. Wiring,
//! settings and script errors are fatal at startup.

use thiserror::Error;

/// Device line could not be turned into an angle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed device message {line:?}: {reason}")]
    MalformedMessage { line: String, reason: &'static str },
}

/// A collaborator the game needs was not supplied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WiringError {
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),
}

/// Settings file could not be used
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Scripted key sequence could not be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("bad script entry {0:?}, expected <seconds>:<key>:<down|up>")]
    Malformed(String),
    #[error("bad time in script entry {0:?}")]
    BadTime(String),
    #[error("unknown key in script entry {0:?}")]
    UnknownKey(String),
    #[error("expected down/up in script entry {0:?}")]
    BadState(String),
}

/// Crate-level error
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Wiring(#[from] WiringError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        name: &'static str,
        reason: &'static str,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
