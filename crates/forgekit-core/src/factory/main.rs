//! Main-process target: a library-style single-entry build.

use super::FactoryContext;
use crate::define::target_defines;
use crate::dev::hooks::{HookRef, HotRestart, RebuildAction};
use crate::externals::compute_externals;
use crate::fragment::{ConfigFragment, ConfigValue};
use crate::project::TargetSpec;

/// Package fields tried in order when resolving dependencies for Node.
const MAIN_FIELDS: &[&str] = &["module", "jsnext:main", "jsnext"];

#[must_use]
pub fn derived_config(spec: &TargetSpec, cx: FactoryContext<'_>) -> ConfigFragment {
    let manifest = &cx.project.manifest;

    let mut build = ConfigFragment::new();
    if let Some(entry) = spec.declared_entry() {
        let lib = ConfigFragment::new()
            .with("entry", entry.to_value())
            .with("fileName", spec.name.as_str())
            .with("formats", ConfigValue::list([manifest.module_format.as_str()]));
        build.insert("lib", lib);
    }
    build.set_path(
        "rollupOptions.external",
        ConfigValue::list(compute_externals(manifest)),
    );

    let resolve = ConfigFragment::new()
        .with("conditions", ConfigValue::list(["node"]))
        .with("mainFields", ConfigValue::list(MAIN_FIELDS.iter().copied()));

    let restart = HookRef::new(HotRestart::new(RebuildAction::Restart, cx.session.clone()));

    ConfigFragment::new()
        .with("build", build)
        .with("plugins", ConfigValue::list([restart]))
        .with(
            "define",
            target_defines(cx.keys, &spec.name, cx.project.is_live(), cx.snapshot),
        )
        .with("resolve", resolve)
}
