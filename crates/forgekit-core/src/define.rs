//! Target-qualified define constants.
//!
//! Every target name maps to two globally unique constants:
//! `<NAME>_VITE_DEV_SERVER_URL` and `<NAME>_VITE_NAME`. `<NAME>` is the
//! target name uppercased with every non-alphanumeric character replaced by
//! `_`, so distinct names can collapse to the same keys (`main` / `Main`,
//! `main-window` / `main_window`); that is rejected up front.

use crate::dev::RegistrySnapshot;
use crate::error::Error;
use crate::fragment::{ConfigFragment, ConfigValue};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

pub const DEV_SERVER_URL_SUFFIX: &str = "_VITE_DEV_SERVER_URL";
pub const NAME_SUFFIX: &str = "_VITE_NAME";

/// The pair of define keys owned by one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefineKeySet {
    /// e.g. `RENDERER_VITE_DEV_SERVER_URL`
    pub dev_server_url: String,
    /// e.g. `RENDERER_VITE_NAME`
    pub name: String,
}

impl DefineKeySet {
    #[must_use]
    pub fn for_target(name: &str) -> Self {
        let prefix = key_prefix(name);
        Self {
            dev_server_url: format!("{prefix}{DEV_SERVER_URL_SUFFIX}"),
            name: format!("{prefix}{NAME_SUFFIX}"),
        }
    }
}

/// `main_window` → `MAIN_WINDOW`
#[must_use]
pub fn key_prefix(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Derive the define keys for every target name.
///
/// Repeating the same name is harmless; two different names that derive the
/// same keys fail with [`Error::NameCollision`].
pub fn derive_keys<S: AsRef<str>>(names: &[S]) -> Result<BTreeMap<String, DefineKeySet>, Error> {
    let mut owners: HashMap<String, &str> = HashMap::new();
    let mut keys = BTreeMap::new();

    for name in names {
        let name = name.as_ref();
        let prefix = key_prefix(name);
        if let Some(first) = owners.get(&prefix) {
            if *first != name {
                return Err(Error::NameCollision {
                    first: (*first).to_string(),
                    second: name.to_string(),
                    prefix,
                });
            }
            continue;
        }
        owners.insert(prefix, name);
        keys.insert(name.to_string(), DefineKeySet::for_target(name));
    }

    debug!(count = keys.len(), "Derived define keys");
    Ok(keys)
}

/// JS string literal for a define replacement.
#[must_use]
pub fn js_string_literal(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Define constants describing every target except `exclude`.
///
/// When `live`, the dev-server URL comes from the snapshot (and is `Unset`
/// if that target has no listening server yet). Otherwise it is always
/// `Unset`, so packaged builds fall back to loading local files.
#[must_use]
pub fn target_defines(
    keys: &BTreeMap<String, DefineKeySet>,
    exclude: &str,
    live: bool,
    snapshot: &RegistrySnapshot,
) -> ConfigFragment {
    let mut define = ConfigFragment::new();
    for (name, set) in keys.iter().filter(|(name, _)| name.as_str() != exclude) {
        let url = if live {
            snapshot
                .url(name)
                .map_or(ConfigValue::Unset, |url| js_string_literal(url).into())
        } else {
            ConfigValue::Unset
        };
        define.insert(set.dev_server_url.clone(), url);
        define.insert(set.name.clone(), js_string_literal(name));
    }
    define
}
