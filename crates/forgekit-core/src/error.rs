use std::path::PathBuf;
use thiserror::Error;

/// Core error type for forgekit operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or missing declarative project fields. Aborts the whole build.
    #[error("Invalid project configuration: {message}")]
    Schema { message: String },

    /// Two target names derive the same define-key set.
    #[error("Targets '{first}' and '{second}' both derive the define key prefix '{prefix}'")]
    NameCollision {
        first: String,
        second: String,
        prefix: String,
    },

    /// A single target has nothing usable to build.
    #[error("Target '{target}': {message}")]
    Config { target: String, message: String },

    /// The override-configuration file of a target failed to load or parse.
    #[error("Target '{target}': failed to load override config {}: {source}", .path.display())]
    OverrideLoad {
        target: String,
        path: PathBuf,
        #[source]
        source: OverrideLoadError,
    },

    #[error("Failed to parse manifest at {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    #[must_use]
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema {
            message: msg.into(),
        }
    }

    #[must_use]
    pub fn config(target: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Config {
            target: target.into(),
            message: msg.into(),
        }
    }

    /// Stable machine-readable code for JSON output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "IO_ERROR",
            Self::Schema { .. } => "SCHEMA_ERROR",
            Self::NameCollision { .. } => "NAME_COLLISION",
            Self::Config { .. } => "CONFIG_ERROR",
            Self::OverrideLoad { .. } => "OVERRIDE_LOAD_ERROR",
            Self::ManifestParse { .. } => "MANIFEST_PARSE_ERROR",
        }
    }

    /// Whether the error only affects a single target.
    ///
    /// Everything else aborts before any target is resolved.
    #[must_use]
    pub fn is_target_scoped(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::OverrideLoad { .. })
    }
}

/// Failure reported by a [`ConfigLoader`](crate::loader::ConfigLoader).
#[derive(Error, Debug)]
pub enum OverrideLoadError {
    #[error("file not found")]
    NotFound,

    #[error("read failed: {0}")]
    Read(#[source] std::io::Error),

    #[error("parse failed: {0}")]
    Parse(String),

    #[error("expected an object at the top level")]
    NotAnObject,
}
