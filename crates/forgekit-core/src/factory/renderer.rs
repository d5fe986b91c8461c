//! Renderer target: a UI bundle with its own dev server.

use super::FactoryContext;
use crate::dev::hooks::{ExposeRenderer, HookRef};
use crate::fragment::{ConfigFragment, ConfigValue};
use crate::project::{ProjectContext, TargetSpec};

/// Renderer defaults. Assets use a relative base so the built UI also
/// loads from a local file path.
#[must_use]
pub fn default_config(project: &ProjectContext) -> ConfigFragment {
    ConfigFragment::new()
        .with("root", project.root.display().to_string())
        .with("mode", project.mode.as_str())
        .with("base", "./")
        .with(
            "resolve",
            ConfigFragment::new().with("preserveSymlinks", true),
        )
        .with("clearScreen", false)
}

#[must_use]
pub fn derived_config(spec: &TargetSpec, cx: FactoryContext<'_>) -> ConfigFragment {
    let mut build = ConfigFragment::new().with("outDir", format!(".vite/renderer/{}", spec.name));
    if let Some(entry) = spec.declared_entry() {
        build.set_path("rollupOptions.input", entry.to_value());
    }

    let expose = HookRef::new(ExposeRenderer::new(spec.name.as_str(), cx.session.clone()));

    ConfigFragment::new()
        .with("build", build)
        .with("plugins", ConfigValue::list([expose]))
}
