//! `package.json` reading.
//!
//! Only two fields matter to the engine: `type` (module format) and the keys
//! of `dependencies`.

use crate::error::Error;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Output module format declared by the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModuleFormat {
    /// `"type": "module"`
    Esm,
    #[default]
    CommonJs,
}

impl ModuleFormat {
    #[must_use]
    pub fn is_esm(self) -> bool {
        self == Self::Esm
    }

    /// Bundler format name (`es` / `cjs`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Esm => "es",
            Self::CommonJs => "cjs",
        }
    }
}

/// Project manifest metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub module_format: ModuleFormat,
    /// Production dependency names, sorted.
    pub dependencies: Vec<String>,
    /// Development dependency names, sorted. Never externalized.
    pub dev_dependencies: Vec<String>,
}

#[derive(Deserialize)]
struct RawManifest {
    #[serde(rename = "type")]
    module_type: Option<String>,
    #[serde(default)]
    dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: BTreeMap<String, serde_json::Value>,
}

impl Manifest {
    /// Build a manifest from its parts.
    pub fn new<I, S>(module_format: ModuleFormat, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dependencies: Vec<String> = dependencies.into_iter().map(Into::into).collect();
        dependencies.sort();
        dependencies.dedup();
        Self {
            module_format,
            dependencies,
            dev_dependencies: Vec::new(),
        }
    }

    /// Parse `package.json` content. `path` is only used for error reporting.
    pub fn parse(content: &str, path: &Path) -> Result<Self, Error> {
        let raw: RawManifest =
            serde_json::from_str(content).map_err(|source| Error::ManifestParse {
                path: path.to_path_buf(),
                source,
            })?;
        let module_format = if raw.module_type.as_deref() == Some("module") {
            ModuleFormat::Esm
        } else {
            ModuleFormat::CommonJs
        };
        Ok(Self {
            module_format,
            dependencies: raw.dependencies.into_keys().collect(),
            dev_dependencies: raw.dev_dependencies.into_keys().collect(),
        })
    }

    /// Load `<root>/package.json`. A missing file yields an empty manifest.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join("package.json");
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content, &path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(Error::Io(e)),
        }
    }
}
