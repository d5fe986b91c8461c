//! Per-target configuration factories.
//!
//! Every target resolves to `merge(defaults, derived, user_override)`:
//! framework defaults first, then the fragment derived from the target
//! declaration, then the user's override file, which wins.

pub mod main;
pub mod preload;
pub mod renderer;

use crate::define::{derive_keys, DefineKeySet};
use crate::dev::hooks::{DevServerHandle, HookRef};
use crate::dev::{DevSession, RegistrySnapshot};
use crate::error::Error;
use crate::fragment::{ConfigFragment, ConfigValue};
use crate::loader::{ConfigEnv, ConfigLoader};
use crate::merge::merge;
use crate::project::{Command, ProjectContext, TargetKind, TargetSpec};
use futures::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Shared inputs for resolving the targets of one build invocation.
#[derive(Clone, Copy)]
pub struct FactoryContext<'a> {
    pub project: &'a ProjectContext,
    /// Define keys of every declared target.
    pub keys: &'a BTreeMap<String, DefineKeySet>,
    pub snapshot: &'a RegistrySnapshot,
    pub session: &'a DevSession,
}

/// The final configuration of one target, ready for the bundler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    pub target: String,
    pub kind: TargetKind,
    pub config: ConfigFragment,
}

impl ResolvedConfig {
    /// Hooks in the top-level `plugins` list.
    #[must_use]
    pub fn hooks(&self) -> Vec<&HookRef> {
        self.config
            .get("plugins")
            .and_then(ConfigValue::as_list)
            .map(|plugins| plugins.iter().filter_map(ConfigValue::as_hook).collect())
            .unwrap_or_default()
    }

    /// Forward the bundler's dev server to every hook.
    pub fn configure_server(&self, server: &Arc<dyn DevServerHandle>) {
        for hook in self.hooks() {
            hook.configure_server(Arc::clone(server));
        }
    }

    /// Tell every hook that the bundle has been written.
    pub fn close_bundle(&self) {
        for hook in self.hooks() {
            hook.close_bundle();
        }
    }
}

/// Defaults shared by main-process and preload builds.
#[must_use]
pub fn base_build_config(project: &ProjectContext) -> ConfigFragment {
    let serve = project.command == Command::Serve;
    let build = ConfigFragment::new()
        .with("emptyOutDir", false)
        .with("outDir", ".vite/build")
        .with(
            "watch",
            if serve {
                ConfigValue::empty_map()
            } else {
                ConfigValue::Null
            },
        )
        .with("minify", project.command == Command::Build)
        .with("sourcemap", serve);

    ConfigFragment::new()
        .with("root", project.root.display().to_string())
        .with("mode", project.mode.as_str())
        .with("build", build)
        .with("clearScreen", false)
}

/// Framework defaults for a target kind.
#[must_use]
pub fn default_config(spec: &TargetSpec, project: &ProjectContext) -> ConfigFragment {
    match spec.kind {
        TargetKind::Main | TargetKind::Preload => base_build_config(project),
        TargetKind::Renderer => renderer::default_config(project),
    }
}

/// The fragment derived from the target declaration itself.
pub fn derived_config(spec: &TargetSpec, cx: FactoryContext<'_>) -> Result<ConfigFragment, Error> {
    match spec.kind {
        TargetKind::Main => Ok(main::derived_config(spec, cx)),
        TargetKind::Preload => preload::derived_config(spec, cx),
        TargetKind::Renderer => Ok(renderer::derived_config(spec, cx)),
    }
}

/// Resolve one target against an already loaded user override.
pub fn build_config(
    spec: &TargetSpec,
    cx: FactoryContext<'_>,
    user_override: Option<&ConfigFragment>,
) -> Result<ResolvedConfig, Error> {
    spec.ensure_buildable()?;

    let defaults = default_config(spec, cx.project);
    let derived = derived_config(spec, cx)?;
    let config = merge(&defaults, std::iter::once(&derived).chain(user_override));

    debug!(
        target_name = %spec.name,
        kind = spec.kind.as_str(),
        has_override = user_override.is_some(),
        "Resolved target config"
    );
    Ok(ResolvedConfig {
        target: spec.name.clone(),
        kind: spec.kind,
        config,
    })
}

/// Load the target's override file (if any) and resolve it.
pub async fn resolve_target<L: ConfigLoader>(
    spec: &TargetSpec,
    cx: FactoryContext<'_>,
    loader: &L,
) -> Result<ResolvedConfig, Error> {
    spec.ensure_buildable()?;

    let user_override = match &spec.config {
        Some(path) => {
            let env = ConfigEnv {
                mode: cx.project.mode,
                command: cx.project.command,
            };
            loader
                .load(path, &env)
                .await
                .map_err(|source| Error::OverrideLoad {
                    target: spec.name.clone(),
                    path: path.clone(),
                    source,
                })?
        }
        None => None,
    };

    build_config(spec, cx, user_override.as_ref())
}

/// Resolve every target concurrently.
///
/// Name collisions abort before any target is touched. Afterwards each
/// target succeeds or fails on its own, in declaration order.
pub async fn resolve_all<L: ConfigLoader>(
    specs: &[TargetSpec],
    project: &ProjectContext,
    session: &DevSession,
    loader: &L,
) -> Result<Vec<Result<ResolvedConfig, Error>>, Error> {
    let names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
    let keys = derive_keys(&names)?;
    let snapshot = session
        .snapshot()
        .with_fallback(RegistrySnapshot::from_env(&names));

    let cx = FactoryContext {
        project,
        keys: &keys,
        snapshot: &snapshot,
        session,
    };
    let results = join_all(specs.iter().map(|spec| resolve_target(spec, cx, loader))).await;

    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(
        targets = results.len(),
        failed,
        mode = project.mode.as_str(),
        "Resolved target configs"
    );
    Ok(results)
}
