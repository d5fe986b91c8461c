use std::fmt::Write;

/// Crate version as published.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shape version stamped into every JSON report the CLI prints.
pub const SCHEMA_VERSION: u32 = 1;

/// `forgekit <version>`, followed by ` (<hash>)` when the build was given
/// `FORGEKIT_BUILD_GIT_HASH`.
#[must_use]
pub fn version_string() -> String {
    let mut s = format!("forgekit {VERSION}");
    if let Some(hash) = option_env!("FORGEKIT_BUILD_GIT_HASH") {
        let _ = write!(s, " ({hash})");
    }
    s
}
