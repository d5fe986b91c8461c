//! `forgekit config` command implementation.
//!
//! Loads the project configuration and `package.json`, resolves every target
//! concurrently and prints the result. A failing target is reported on its
//! own; schema and name-collision errors stop the command before any target
//! is resolved.

use super::ErrorJson;
use forgekit_core::project::load_project;
use forgekit_core::{
    resolve_all, resolve_inline_config, Config, ConfigFragment, DevSession, Error,
    FileConfigLoader, Manifest, ProjectContext, ResolvedConfig, TargetKind, SCHEMA_VERSION,
};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::io::{self, Write};
use tracing::debug;

#[derive(Serialize)]
struct ConfigResultJson<'a> {
    schema_version: u32,
    ok: bool,
    cwd: String,
    command: &'static str,
    mode: &'static str,
    inline_config: &'a ConfigFragment,
    targets: Vec<TargetJson<'a>>,
    errors: Vec<TargetErrorJson>,
}

#[derive(Serialize)]
struct TargetJson<'a> {
    name: &'a str,
    kind: TargetKind,
    config: &'a ConfigFragment,
}

#[derive(Serialize)]
struct TargetErrorJson {
    target: String,
    #[serde(flatten)]
    error: ErrorJson,
}

/// Run the config command, optionally printing only `only_target`.
pub fn run(config: &Config, only_target: Option<&str>) -> Result<()> {
    let json = config.json_logs;

    let (path, project) = match load_project(&config.cwd, config.project_file.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => return super::fail(&e, json),
    };
    debug!(path = %path.display(), "Using project configuration");

    if let Some(name) = only_target {
        if project.target(name).is_none() {
            return super::fail(
                &Error::schema(format!("no target named '{name}' in {}", path.display())),
                json,
            );
        }
    }

    let manifest = match Manifest::load(&config.cwd) {
        Ok(manifest) => manifest,
        Err(e) => return super::fail(&e, json),
    };
    let ctx = ProjectContext::new(&config.cwd, config.command, manifest).with_mode(config.mode());
    let session = DevSession::new();
    let loader = FileConfigLoader::new(&config.cwd);

    let runtime = tokio::runtime::Runtime::new().into_diagnostic()?;
    let results = match runtime.block_on(resolve_all(&project.targets, &ctx, &session, &loader)) {
        Ok(results) => results,
        Err(e) => return super::fail(&e, json),
    };

    let names = project.targets.iter().map(|t| t.name.as_str());
    let selected: Vec<(&str, &std::result::Result<ResolvedConfig, Error>)> = names
        .zip(&results)
        .filter(|(name, _)| only_target.map_or(true, |only| only == *name))
        .collect();

    let inline_config = resolve_inline_config(&project.options);
    let ok = selected.iter().all(|(_, r)| r.is_ok());

    if json {
        let result = ConfigResultJson {
            schema_version: SCHEMA_VERSION,
            ok,
            cwd: config.cwd.display().to_string(),
            command: ctx.command.as_str(),
            mode: ctx.mode.as_str(),
            inline_config: &inline_config,
            targets: selected
                .iter()
                .filter_map(|(_, r)| r.as_ref().ok())
                .map(|resolved| TargetJson {
                    name: &resolved.target,
                    kind: resolved.kind,
                    config: &resolved.config,
                })
                .collect(),
            errors: selected
                .iter()
                .filter_map(|(name, r)| {
                    r.as_ref().err().map(|e| TargetErrorJson {
                        target: (*name).to_string(),
                        error: e.into(),
                    })
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
    } else {
        print_human(&selected)?;
    }

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn print_human(selected: &[(&str, &std::result::Result<ResolvedConfig, Error>)]) -> Result<()> {
    let mut out = io::stdout().lock();
    for (name, result) in selected {
        match result {
            Ok(resolved) => {
                writeln!(out, "\x1b[1m## {name}\x1b[0m ({})", resolved.kind.as_str())
                    .into_diagnostic()?;
                let pretty = serde_json::to_string_pretty(&resolved.config).into_diagnostic()?;
                writeln!(out, "{pretty}\n").into_diagnostic()?;
            }
            Err(e) => {
                eprintln!("\x1b[31merror\x1b[0m [{}] {e}", e.code());
            }
        }
    }
    Ok(())
}
