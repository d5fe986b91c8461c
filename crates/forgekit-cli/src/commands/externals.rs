//! `forgekit externals` command implementation.

use forgekit_core::{compute_externals, Config, Manifest, SCHEMA_VERSION};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

#[derive(Serialize)]
struct ExternalsJson<'a> {
    schema_version: u32,
    ok: bool,
    module_format: &'static str,
    count: usize,
    externals: &'a [String],
}

pub fn run(config: &Config) -> Result<()> {
    let manifest = match Manifest::load(&config.cwd) {
        Ok(manifest) => manifest,
        Err(e) => return super::fail(&e, config.json_logs),
    };
    let externals = compute_externals(&manifest);

    if config.json_logs {
        let result = ExternalsJson {
            schema_version: SCHEMA_VERSION,
            ok: true,
            module_format: manifest.module_format.as_str(),
            count: externals.len(),
            externals: &externals,
        };
        println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
    } else {
        for id in &externals {
            println!("{id}");
        }
    }
    Ok(())
}
