use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the geoscript compiler.
#[derive(Debug, Error)]
pub enum GeoscriptError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Errors raised while turning command tokens into a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("command `{command}` expects an argument")]
    MissingArgument { command: &'static str },

    #[error("invalid value `{value}` for command `{command}`")]
    InvalidValue { command: &'static str, value: String },

    #[error("unknown coordinate mode `{0}` (expected F, L or S)")]
    UnknownCoordinateMode(String),

    #[error("unknown line type `{0}` (expected LN, LY, BN or BY)")]
    UnknownCurveStyle(String),

    #[error("no domain file given")]
    MissingDomain,
}

/// Errors caused by inconsistent domain arrays.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{what}: expected {expected} entries, found {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid {name} boundaries: {reason}")]
    InvalidBoundaries { name: &'static str, reason: String },

    #[error("loop {index} is not closed")]
    LoopNotClosed { index: usize },

    #[error("point {index} has {found} coordinates (expected 2 or 3)")]
    PointArity { index: usize, found: usize },

    #[error("domain has no lines")]
    Empty,

    #[error("loop added before any shape")]
    LoopWithoutShape,

    #[error("failed to read domain file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed domain document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised while writing the geometry script.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to format geometry script")]
    Format(#[from] std::fmt::Error),

    #[error("failed to write geometry script to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the external mesh generator call.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("failed to launch `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write mesher log {path}")]
    Log {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}")]
    Failed { program: String, status: String },
}

/// Convenience type alias for results using [`GeoscriptError`].
pub type Result<T> = std::result::Result<T, GeoscriptError>;
