//! `forgekit keys` command implementation.

use forgekit_core::project::load_project;
use forgekit_core::{derive_keys, Config, DefineKeySet, SCHEMA_VERSION};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize)]
struct KeysJson<'a> {
    schema_version: u32,
    ok: bool,
    keys: &'a BTreeMap<String, DefineKeySet>,
}

pub fn run(config: &Config) -> Result<()> {
    let keys = load_project(&config.cwd, config.project_file.as_deref())
        .and_then(|(_, project)| derive_keys(&project.target_names()));
    let keys = match keys {
        Ok(keys) => keys,
        Err(e) => return super::fail(&e, config.json_logs),
    };

    if config.json_logs {
        let result = KeysJson {
            schema_version: SCHEMA_VERSION,
            ok: true,
            keys: &keys,
        };
        println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
    } else {
        let width = keys.keys().map(String::len).max().unwrap_or(0);
        for (name, set) in &keys {
            println!("{name:<width$}  {}  {}", set.dev_server_url, set.name);
        }
    }
    Ok(())
}
