pub mod config;
pub mod externals;
pub mod keys;
pub mod version;

use forgekit_core::{Error, SCHEMA_VERSION};
use miette::Result;
use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorJson {
    pub code: String,
    pub message: String,
}

impl From<&Error> for ErrorJson {
    fn from(err: &Error) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

#[derive(Serialize)]
struct FailureJson {
    schema_version: u32,
    ok: bool,
    error: ErrorJson,
}

/// Report an error that stops the command.
///
/// With `--json` a single `{ok: false, error}` object goes to stdout and the
/// process exits with status 1.
pub fn fail(err: &Error, json: bool) -> Result<()> {
    if json {
        let result = FailureJson {
            schema_version: SCHEMA_VERSION,
            ok: false,
            error: err.into(),
        };
        println!(
            "{}",
            serde_json::to_string(&result).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        std::process::exit(1);
    }
    Err(miette::miette!(code = err.code(), "{}", err))
}
