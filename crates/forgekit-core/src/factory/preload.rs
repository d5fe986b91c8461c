//! Preload target: one self-contained script.
//!
//! Preload code runs in a restricted bridge context and cannot load chunks,
//! so dynamic imports are inlined and the output format is always CommonJS.
//! Only the file extension follows the manifest's module format.

use super::FactoryContext;
use crate::dev::hooks::{HookRef, HotRestart, RebuildAction};
use crate::error::Error;
use crate::externals::compute_externals;
use crate::fragment::{ConfigFragment, ConfigValue};
use crate::project::{Entry, TargetSpec};

pub fn derived_config(spec: &TargetSpec, cx: FactoryContext<'_>) -> Result<ConfigFragment, Error> {
    if let Some(Entry::Multiple(paths)) = spec.declared_entry() {
        if paths.len() > 1 {
            return Err(Error::config(
                &spec.name,
                format!("a preload target takes a single entry, got {}", paths.len()),
            ));
        }
    }

    let manifest = &cx.project.manifest;
    let ext = if manifest.module_format.is_esm() {
        "mjs"
    } else {
        "js"
    };

    let output = ConfigFragment::new()
        .with("format", "cjs")
        .with("inlineDynamicImports", true)
        .with("entryFileNames", format!("[name].{ext}"))
        .with("chunkFileNames", format!("[name].{ext}"))
        .with("assetFileNames", "[name].[ext]");

    let mut rollup_options = ConfigFragment::new()
        .with("external", ConfigValue::list(compute_externals(manifest)))
        .with("output", output);
    // Preloads may pull in web assets, so the entry is a rollup input rather than a lib entry.
    if let Some(entry) = spec.declared_entry() {
        rollup_options.insert("input", entry.to_value());
    }

    let reload = HookRef::new(HotRestart::new(RebuildAction::Reload, cx.session.clone()));

    Ok(ConfigFragment::new()
        .with("build", ConfigFragment::new().with("rollupOptions", rollup_options))
        .with("plugins", ConfigValue::list([reload])))
}

#[cfg(test)]
mod tests {
    use crate::dev::hooks::tests_support::FakeServer;
    use crate::dev::hooks::HOT_RELOAD_HOOK;
    use crate::factory::build_config;
    use crate::factory::test_support::Fixture;
    use crate::fragment::ConfigValue;
    use crate::project::{Command, Manifest, Mode, ModuleFormat, TargetKind, TargetSpec};

    fn preload_spec() -> TargetSpec {
        TargetSpec::new("preload", TargetKind::Preload).with_entry("src/preload.ts")
    }

    #[test]
    fn test_single_inlined_bundle_in_production() {
        let fixture = Fixture::new(Command::Build, Mode::Production, &["preload"]);
        let resolved = build_config(&preload_spec(), fixture.cx(), None).unwrap();
        let config = &resolved.config;

        assert_eq!(
            config.get_path("build.rollupOptions.output.inlineDynamicImports"),
            Some(&ConfigValue::Bool(true))
        );
        assert_eq!(
            config.get_path("build.rollupOptions.input"),
            Some(&ConfigValue::from("src/preload.ts"))
        );
        assert_eq!(
            config
                .get_path("build.rollupOptions.output.entryFileNames")
                .and_then(ConfigValue::as_str),
            Some("[name].js")
        );
    }

    #[test]
    fn test_format_fixed_regardless_of_manifest() {
        let mut fixture = Fixture::new(Command::Build, Mode::Production, &["preload"]);
        for format in [ModuleFormat::CommonJs, ModuleFormat::Esm] {
            fixture.project.manifest = Manifest::new(format, Vec::<String>::new());
            let resolved = build_config(&preload_spec(), fixture.cx(), None).unwrap();
            assert_eq!(
                resolved
                    .config
                    .get_path("build.rollupOptions.output.format")
                    .and_then(ConfigValue::as_str),
                Some("cjs"),
                "{format:?}"
            );
        }
        assert_eq!(
            build_config(&preload_spec(), fixture.cx(), None)
                .unwrap()
                .config
                .get_path("build.rollupOptions.output.chunkFileNames")
                .and_then(ConfigValue::as_str),
            Some("[name].mjs")
        );
    }

    #[test]
    fn test_multiple_entries_rejected() {
        let fixture = Fixture::new(Command::Build, Mode::Production, &["preload"]);
        let spec = TargetSpec::new("preload", TargetKind::Preload)
            .with_entries(["src/a.ts", "src/b.ts"]);
        let err = build_config(&spec, fixture.cx(), None).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");

        let spec = TargetSpec::new("preload", TargetKind::Preload).with_entries(["src/a.ts"]);
        assert!(build_config(&spec, fixture.cx(), None).is_ok());
    }

    #[test]
    fn test_rebuild_reloads_live_servers() {
        let fixture = Fixture::new(Command::Serve, Mode::Development, &["preload"]);
        let window = FakeServer::new(Some(5173));
        let settings = FakeServer::new(Some(5174));
        fixture.session.register_server("main_window", window.clone());
        fixture.session.register_server("settings", settings.clone());

        let resolved = build_config(&preload_spec(), fixture.cx(), None).unwrap();
        assert_eq!(resolved.hooks()[0].name(), HOT_RELOAD_HOOK);

        resolved.close_bundle();
        assert_eq!(window.reloads(), 1);
        assert_eq!(settings.reloads(), 1);
    }

    #[test]
    fn test_serve_keeps_watch_and_sourcemaps() {
        let fixture = Fixture::new(Command::Serve, Mode::Development, &["preload"]);
        let resolved = build_config(&preload_spec(), fixture.cx(), None).unwrap();
        assert_eq!(
            resolved.config.get_path("build.watch"),
            Some(&ConfigValue::empty_map())
        );
        assert_eq!(
            resolved.config.get_path("build.sourcemap"),
            Some(&ConfigValue::Bool(true))
        );
    }
}
