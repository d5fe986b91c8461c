//! Project-level inputs: build context, manifest and target declarations.

mod manifest;

pub use manifest::{Manifest, ModuleFormat};

use crate::error::Error;
use crate::fragment::{ConfigFragment, ConfigValue};
use crate::loader;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Build mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Development,
    Production,
}

impl Mode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    /// Parse `development` / `production` (also `dev` / `prod`).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }
}

/// The command driving the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Build,
    Serve,
}

impl Command {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Serve => "serve",
        }
    }

    /// Mode used when none is given: `serve` develops, `build` ships.
    #[must_use]
    pub fn default_mode(self) -> Mode {
        match self {
            Self::Build => Mode::Production,
            Self::Serve => Mode::Development,
        }
    }
}

/// Immutable inputs shared by every target of one build invocation.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub root: PathBuf,
    pub mode: Mode,
    pub command: Command,
    pub manifest: Manifest,
}

impl ProjectContext {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, command: Command, manifest: Manifest) -> Self {
        Self {
            root: root.into(),
            mode: command.default_mode(),
            command,
            manifest,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Whether live dev-server URLs should be injected.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.mode == Mode::Development
    }
}

/// What a target builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Main,
    Preload,
    Renderer,
}

impl TargetKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Preload => "preload",
            Self::Renderer => "renderer",
        }
    }
}

/// A single entry path or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Entry {
    Single(String),
    Multiple(Vec<String>),
}

impl Entry {
    /// First declared path.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(path) => Some(path),
            Self::Multiple(paths) => paths.first().map(String::as_str),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(path) => path.is_empty(),
            Self::Multiple(paths) => paths.is_empty(),
        }
    }

    #[must_use]
    pub fn to_value(&self) -> ConfigValue {
        match self {
            Self::Single(path) => path.as_str().into(),
            Self::Multiple(paths) => ConfigValue::list(paths.iter().map(String::as_str)),
        }
    }
}

/// One declared build target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    pub name: String,
    pub kind: TargetKind,
    pub entry: Option<Entry>,
    /// Override-configuration file, relative to the project root.
    pub config: Option<PathBuf>,
}

impl TargetSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: TargetKind) -> Self {
        Self {
            name: name.into(),
            kind,
            entry: None,
            config: None,
        }
    }

    #[must_use]
    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(Entry::Single(entry.into()));
        self
    }

    #[must_use]
    pub fn with_entries<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entry = Some(Entry::Multiple(entries.into_iter().map(Into::into).collect()));
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: impl Into<PathBuf>) -> Self {
        self.config = Some(config.into());
        self
    }

    /// The entry, unless it is missing or an empty list.
    #[must_use]
    pub fn declared_entry(&self) -> Option<&Entry> {
        self.entry.as_ref().filter(|entry| !entry.is_empty())
    }

    /// Fail unless the target declares an entry or an override config.
    pub fn ensure_buildable(&self) -> Result<(), Error> {
        if self.declared_entry().is_none() && self.config.is_none() {
            return Err(Error::config(
                &self.name,
                "neither `entry` nor `config` is set; nothing to build",
            ));
        }
        Ok(())
    }
}

/// Declarative project configuration: ordered targets plus bundler options.
#[derive(Debug, Clone, Default)]
pub struct ProjectConfig {
    pub targets: Vec<TargetSpec>,
    /// Free-form options forwarded to the bundler, see [`resolve_inline_config`].
    pub options: ConfigFragment,
}

impl ProjectConfig {
    /// Parse a project configuration document.
    ///
    /// A forge-style document (top-level `plugins` array) is unwrapped to the
    /// `config` of its first plugin whose name mentions `vite`.
    pub fn from_value(value: &Value) -> Result<Self, Error> {
        let doc = match value.get("plugins").and_then(Value::as_array) {
            Some(plugins) => plugins
                .iter()
                .find(|p| {
                    p.get("name")
                        .and_then(Value::as_str)
                        .is_some_and(|n| n.contains("vite"))
                })
                .and_then(|p| p.get("config"))
                .ok_or_else(|| Error::schema("no vite plugin with a `config` found in `plugins`"))?,
            None => value,
        };

        if !doc.is_object() {
            return Err(Error::schema("project configuration must be an object"));
        }

        let build = doc
            .get("build")
            .ok_or_else(|| Error::schema("`build` is required"))?
            .as_array()
            .ok_or_else(|| Error::schema("`build` must be an array"))?;

        let mut targets = Vec::with_capacity(build.len());
        let mut derived = Vec::new();
        for (index, item) in build.iter().enumerate() {
            let (target, explicit) = parse_build_target(item, index)?;
            if !explicit {
                derived.push(index);
            }
            targets.push(target);
        }

        if let Some(renderer) = doc.get("renderer") {
            let renderer = renderer
                .as_array()
                .ok_or_else(|| Error::schema("`renderer` must be an array"))?;
            for (index, item) in renderer.iter().enumerate() {
                targets.push(parse_renderer_target(item, index)?);
            }
        }

        assign_derived_names(&mut targets, &derived);

        let mut seen = HashSet::new();
        for target in &targets {
            if target.name.is_empty() {
                return Err(Error::schema("target names must not be empty"));
            }
            if !seen.insert(target.name.as_str()) {
                return Err(Error::schema(format!(
                    "duplicate target name '{}'",
                    target.name
                )));
            }
        }

        let options = match doc.get("options").or_else(|| doc.get("CLIOptions")) {
            None | Some(Value::Null) => ConfigFragment::new(),
            Some(v) => ConfigFragment::from_json(v.clone())
                .ok_or_else(|| Error::schema("`options` must be an object"))?,
        };

        Ok(Self { targets, options })
    }

    /// Target names in declaration order.
    #[must_use]
    pub fn target_names(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.name.as_str()).collect()
    }

    #[must_use]
    pub fn target(&self, name: &str) -> Option<&TargetSpec> {
        self.targets.iter().find(|t| t.name == name)
    }
}

fn parse_entry(item: &Value, what: &str) -> Result<Option<Entry>, Error> {
    match item.get("entry") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(paths)) if paths.is_empty() => Ok(None),
        Some(Value::String(path)) => Ok(Some(Entry::Single(path.clone()))),
        Some(Value::Array(paths)) => paths
            .iter()
            .map(|p| {
                p.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| Error::schema(format!("{what}: `entry` items must be strings")))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|paths| Some(Entry::Multiple(paths))),
        Some(_) => Err(Error::schema(format!(
            "{what}: `entry` must be a string or an array of strings"
        ))),
    }
}

fn parse_string_field(item: &Value, key: &str, what: &str) -> Result<Option<String>, Error> {
    match item.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(Error::schema(format!("{what}: `{key}` must be a string"))),
    }
}

fn file_stem(path: &str) -> Option<String> {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.split('.').next().unwrap_or(s).to_string())
        .filter(|s| !s.is_empty())
}

/// `vite.preload.config.mjs` -> `preload`. Plain `vite.config.ts` has no
/// distinguishing part and yields `None`.
fn config_stem(path: &str) -> Option<String> {
    let file_name = Path::new(path).file_name()?.to_str()?;
    let mut parts: Vec<&str> = file_name.split('.').collect();
    if parts.len() > 1 {
        parts.pop();
    }
    if parts.len() > 1 && parts[0] == "vite" {
        parts.remove(0);
    }
    let stem: Vec<&str> = parts.into_iter().take_while(|p| *p != "config").collect();
    Some(stem.join(".")).filter(|s| !s.is_empty())
}

/// Give every build target without an explicit `name` a unique one.
///
/// A derived name that is empty, repeated among derived names, or taken by an
/// explicit name falls back to the target kind, then to `<kind>_<index>`.
/// Explicit names are left alone so their duplicates still surface.
fn assign_derived_names(targets: &mut [TargetSpec], derived: &[usize]) {
    let mut taken: HashSet<String> = (0..targets.len())
        .filter(|i| !derived.contains(i))
        .map(|i| targets[i].name.clone())
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for &i in derived {
        *counts.entry(targets[i].name.as_str()).or_default() += 1;
    }
    let needs_fallback: Vec<usize> = derived
        .iter()
        .copied()
        .filter(|&i| {
            let name = targets[i].name.as_str();
            name.is_empty() || counts[name] > 1 || taken.contains(name)
        })
        .collect();

    for &i in derived {
        if !needs_fallback.contains(&i) {
            taken.insert(targets[i].name.clone());
        }
    }
    for i in needs_fallback {
        let kind = targets[i].kind.as_str();
        let name = if taken.contains(kind) {
            format!("{kind}_{i}")
        } else {
            kind.to_string()
        };
        taken.insert(name.clone());
        targets[i].name = name;
    }
}

/// Parse one `build[]` item. The flag is true when the name was set explicitly.
fn parse_build_target(item: &Value, index: usize) -> Result<(TargetSpec, bool), Error> {
    let what = format!("build[{index}]");
    if !item.is_object() {
        return Err(Error::schema(format!("{what} must be an object")));
    }

    let entry = parse_entry(item, &what)?;
    let config = parse_string_field(item, "config", &what)?;
    let kind = match parse_string_field(item, "target", &what)?.as_deref() {
        None | Some("main") => TargetKind::Main,
        Some("preload") => TargetKind::Preload,
        Some(other) => {
            return Err(Error::schema(format!(
                "{what}: unknown target kind '{other}' (expected `main` or `preload`)"
            )))
        }
    };

    // Name falls back to the entry file stem, then the config file stem.
    let explicit = parse_string_field(item, "name", &what)?;
    let is_explicit = explicit.is_some();
    let name = explicit
        .or_else(|| entry.as_ref().and_then(Entry::first).and_then(file_stem))
        .or_else(|| config.as_deref().and_then(config_stem))
        .unwrap_or_default();

    let target = TargetSpec {
        name,
        kind,
        entry,
        config: config.map(PathBuf::from),
    };
    Ok((target, is_explicit))
}

fn parse_renderer_target(item: &Value, index: usize) -> Result<TargetSpec, Error> {
    let what = format!("renderer[{index}]");
    if !item.is_object() {
        return Err(Error::schema(format!("{what} must be an object")));
    }
    let name = parse_string_field(item, "name", &what)?
        .ok_or_else(|| Error::schema(format!("{what}: `name` is required")))?;

    Ok(TargetSpec {
        name,
        kind: TargetKind::Renderer,
        entry: parse_entry(item, &what)?,
        config: parse_string_field(item, "config", &what)?.map(PathBuf::from),
    })
}

/// Turn the free-form options bag into bundler inline config.
///
/// `root`, `base`, `mode`, `logLevel` and `clearScreen` pass through,
/// `config` becomes `configFile`, `force` becomes `optimizeDeps.force`, and
/// every remaining key is a server option.
#[must_use]
pub fn resolve_inline_config(options: &ConfigFragment) -> ConfigFragment {
    const PASS_THROUGH: &[&str] = &["root", "base", "mode", "logLevel", "clearScreen"];

    let mut inline = ConfigFragment::new();
    let mut server = ConfigFragment::new();
    for (key, value) in options.iter() {
        match key.as_str() {
            k if PASS_THROUGH.contains(&k) => {
                inline.insert(k, value.clone());
            }
            "config" => {
                inline.insert("configFile", value.clone());
            }
            "force" => inline.set_path("optimizeDeps.force", value.clone()),
            other => {
                server.insert(other, value.clone());
            }
        }
    }
    if !server.is_empty() {
        inline.insert("server", server);
    }
    inline
}

/// Project configuration files, in discovery order.
pub const PROJECT_FILES: &[&str] = &["forgekit.config.json", "forgekit.config.js", "forge.config.js"];

/// Find the project configuration file in `root`.
#[must_use]
pub fn find_project_file(root: &Path) -> Option<PathBuf> {
    PROJECT_FILES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
}

/// Load the project configuration.
///
/// If `explicit` is `Some`, use that file (relative to `root`). Otherwise
/// auto-discover; finding nothing is a [`Error::Schema`].
pub fn load_project(root: &Path, explicit: Option<&Path>) -> Result<(PathBuf, ProjectConfig), Error> {
    let path = match explicit {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => root.join(p),
        None => find_project_file(root).ok_or_else(|| {
            Error::schema(format!(
                "no project configuration found in {} (looked for {})",
                root.display(),
                PROJECT_FILES.join(", ")
            ))
        })?,
    };

    let source = std::fs::read_to_string(&path)?;
    let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
    let parsed = if is_json {
        loader::parse_json_config(&source)
    } else {
        loader::parse_script_config(&source)
    }
    .map_err(|e| Error::schema(format!("{}: {e}", path.display())))?
    .ok_or_else(|| Error::schema(format!("{}: exports no configuration", path.display())))?;

    let config = ProjectConfig::from_value(&parsed.to_json())?;
    debug!(path = %path.display(), targets = config.targets.len(), "Loaded project configuration");
    Ok((path, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_build_and_renderer() {
        let config = ProjectConfig::from_value(&json!({
            "build": [
                {"entry": "src/main.ts", "config": "vite.main.config.mjs"},
                {"entry": "src/preload.ts", "config": "vite.preload.config.mjs", "target": "preload"}
            ],
            "renderer": [
                {"name": "main_window", "config": "vite.renderer.config.mjs"}
            ]
        }))
        .unwrap();

        assert_eq!(config.target_names(), vec!["main", "preload", "main_window"]);
        let preload = config.target("preload").unwrap();
        assert_eq!(preload.kind, TargetKind::Preload);
        assert_eq!(preload.entry, Some(Entry::Single("src/preload.ts".into())));
        assert_eq!(
            config.target("main_window").unwrap().config,
            Some(PathBuf::from("vite.renderer.config.mjs"))
        );
    }

    #[test]
    fn test_build_must_be_array() {
        let err = ProjectConfig::from_value(&json!({"build": {"entry": "src/main.ts"}})).unwrap_err();
        assert_eq!(err.code(), "SCHEMA_ERROR");
        let err = ProjectConfig::from_value(&json!({})).unwrap_err();
        assert_eq!(err.code(), "SCHEMA_ERROR");
    }

    #[test]
    fn test_renderer_must_be_array() {
        let err = ProjectConfig::from_value(&json!({"build": [], "renderer": "x"})).unwrap_err();
        assert_eq!(err.code(), "SCHEMA_ERROR");
    }

    #[test]
    fn test_renderer_requires_name() {
        let err = ProjectConfig::from_value(&json!({"build": [], "renderer": [{"config": "r.mjs"}]}))
            .unwrap_err();
        assert!(err.to_string().contains("renderer[0]"));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = ProjectConfig::from_value(&json!({
            "build": [
                {"name": "main", "entry": "src/main.ts"},
                {"name": "main", "entry": "lib/main.js"}
            ]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("duplicate target name 'main'"));

        let err = ProjectConfig::from_value(&json!({
            "build": [{"name": "app", "entry": "src/main.ts"}],
            "renderer": [{"name": "app", "entry": "index.html"}]
        }))
        .unwrap_err();
        assert_eq!(err.code(), "SCHEMA_ERROR");
    }

    #[test]
    fn test_name_from_config_when_no_entry() {
        let config =
            ProjectConfig::from_value(&json!({"build": [{"config": "vite.worker.config.mjs"}]}))
                .unwrap();
        assert_eq!(config.target_names(), vec!["worker"]);

        let config =
            ProjectConfig::from_value(&json!({"build": [{"config": "vite.config.ts"}]})).unwrap();
        assert_eq!(config.target_names(), vec!["main"]);
    }

    #[test]
    fn test_index_entries_fall_back_to_kind() {
        let config = ProjectConfig::from_value(&json!({
            "build": [
                {"entry": "src/main/index.ts"},
                {"entry": "src/preload/index.ts", "target": "preload"}
            ]
        }))
        .unwrap();
        assert_eq!(config.target_names(), vec!["main", "preload"]);
    }

    #[test]
    fn test_config_only_targets_named_after_config() {
        let config = ProjectConfig::from_value(&json!({
            "build": [
                {"config": "vite.main.config.mjs"},
                {"config": "vite.preload.config.mjs", "target": "preload"}
            ],
            "renderer": [{"name": "main_window", "config": "vite.renderer.config.mjs"}]
        }))
        .unwrap();
        assert_eq!(config.target_names(), vec!["main", "preload", "main_window"]);
    }

    #[test]
    fn test_derived_names_never_clash() {
        let config = ProjectConfig::from_value(&json!({
            "build": [
                {"entry": "src/main.ts"},
                {"entry": "a/index.ts"},
                {"entry": "b/index.ts"},
                {"name": "preload", "entry": "src/bridge.ts", "target": "preload"},
                {"entry": "c/index.ts", "target": "preload"}
            ]
        }))
        .unwrap();
        assert_eq!(
            config.target_names(),
            vec!["main", "main_1", "main_2", "preload", "preload_4"]
        );
    }

    #[test]
    fn test_empty_target_kept_for_factory_to_reject() {
        let config = ProjectConfig::from_value(&json!({"build": [{"name": "ghost"}]})).unwrap();
        let ghost = config.target("ghost").unwrap();
        assert_eq!(ghost.ensure_buildable().unwrap_err().code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_empty_entry_list_is_no_entry() {
        let config = ProjectConfig::from_value(&json!({
            "build": [{"name": "main", "entry": []}]
        }))
        .unwrap();
        let main = config.target("main").unwrap();
        assert_eq!(main.entry, None);
        assert_eq!(main.ensure_buildable().unwrap_err().code(), "CONFIG_ERROR");

        let built = TargetSpec::new("main", TargetKind::Main).with_entries(Vec::<String>::new());
        assert!(built.declared_entry().is_none());
        assert_eq!(built.ensure_buildable().unwrap_err().code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_entry_list() {
        let config = ProjectConfig::from_value(&json!({
            "build": [{"entry": ["src/worker.ts", "src/other.ts"], "name": "workers"}]
        }))
        .unwrap();
        assert_eq!(
            config.target("workers").unwrap().entry,
            Some(Entry::Multiple(vec!["src/worker.ts".into(), "src/other.ts".into()]))
        );
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = ProjectConfig::from_value(&json!({"build": [{"entry": "a.ts", "target": "worker"}]}))
            .unwrap_err();
        assert_eq!(err.code(), "SCHEMA_ERROR");
    }

    #[test]
    fn test_forge_style_document() {
        let config = ProjectConfig::from_value(&json!({
            "packagerConfig": {},
            "plugins": [
                {"name": "@electron-forge/plugin-fuses", "config": {}},
                {"name": "electron-forge-plugin-vite", "config": {
                    "build": [{"entry": "src/main.js", "config": "vite.main.config.mjs"}],
                    "CLIOptions": {"port": 3000}
                }}
            ]
        }))
        .unwrap();
        assert_eq!(config.target_names(), vec!["main"]);
        assert_eq!(
            config.options.get("port"),
            Some(&ConfigValue::Number(3000.into()))
        );
    }

    #[test]
    fn test_resolve_inline_config_renames() {
        let options = ConfigFragment::from_json(json!({
            "root": "app",
            "mode": "staging",
            "config": "vite.config.ts",
            "force": true,
            "clearScreen": false,
            "port": 3000,
            "host": "0.0.0.0"
        }))
        .unwrap();
        let inline = resolve_inline_config(&options);
        assert_eq!(
            inline.to_json(),
            json!({
                "root": "app",
                "mode": "staging",
                "configFile": "vite.config.ts",
                "clearScreen": false,
                "optimizeDeps": {"force": true},
                "server": {"port": 3000, "host": "0.0.0.0"}
            })
        );
    }

    #[test]
    fn test_mode_defaults_follow_command() {
        let ctx = ProjectContext::new("/app", Command::Serve, Manifest::default());
        assert_eq!(ctx.mode, Mode::Development);
        assert!(ctx.is_live());
        let ctx = ProjectContext::new("/app", Command::Build, Manifest::default());
        assert_eq!(ctx.mode, Mode::Production);
        assert!(!ctx.is_live());
    }

    #[test]
    fn test_project_file_discovery_order() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_project_file(dir.path()).is_none());

        std::fs::write(dir.path().join("forge.config.js"), "module.exports = {};").unwrap();
        assert_eq!(
            find_project_file(dir.path()).unwrap(),
            dir.path().join("forge.config.js")
        );

        std::fs::write(dir.path().join("forgekit.config.json"), "{}").unwrap();
        assert_eq!(
            find_project_file(dir.path()).unwrap(),
            dir.path().join("forgekit.config.json")
        );
    }

    #[test]
    fn test_load_forge_config_js() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("forge.config.js"),
            r#"
            module.exports = {
              packagerConfig: { asar: true },
              plugins: [
                {
                  name: '@electron-forge/plugin-vite',
                  config: {
                    build: [
                      { entry: 'src/main.js', config: 'vite.main.config.mjs', target: 'main' },
                    ],
                    renderer: [{ name: 'main_window', config: 'vite.renderer.config.mjs' }],
                  },
                },
              ],
            };
            "#,
        )
        .unwrap();

        let (path, config) = load_project(dir.path(), None).unwrap();
        assert_eq!(path, dir.path().join("forge.config.js"));
        assert_eq!(config.target_names(), vec!["main", "main_window"]);
    }

    #[test]
    fn test_load_project_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_project(dir.path(), None).unwrap_err().code(), "SCHEMA_ERROR");
        assert_eq!(
            load_project(dir.path(), Some(Path::new("nope.json")))
                .unwrap_err()
                .code(),
            "IO_ERROR"
        );
    }
}
