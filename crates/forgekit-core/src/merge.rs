//! Deep merge of configuration fragments.
//!
//! `merge(base, [o1, o2, ..])` folds left to right; later fragments win.
//!
//! | override value         | result                                          |
//! |------------------------|-------------------------------------------------|
//! | `Undefined` / `Null`   | base value kept (key absent stays absent)       |
//! | `Unset`                | `Unset`, whatever the base holds                |
//! | list (or base is list) | base items, then override items not in the base  |
//! | map over map           | merged key by key with these same rules         |
//! | anything else          | replaces the base value                         |
//!
//! Lists extend instead of replacing so that framework-required entries
//! (reload hooks, externals) survive user overrides. Override items already
//! in the base are skipped, which keeps re-applying an override a no-op.
//! Repeats inside a single override are kept as written.

use crate::fragment::{ConfigFragment, ConfigValue};

/// Merge `overrides` into `base`, left to right. Inputs are never mutated.
pub fn merge<'a, I>(base: &ConfigFragment, overrides: I) -> ConfigFragment
where
    I: IntoIterator<Item = &'a ConfigFragment>,
{
    overrides
        .into_iter()
        .fold(base.clone(), |acc, layer| merge_fragments(&acc, layer))
}

fn merge_fragments(base: &ConfigFragment, over: &ConfigFragment) -> ConfigFragment {
    let mut merged = base.clone();
    for (key, value) in over.iter() {
        let next = match base.get(key) {
            Some(existing) => merge_value(existing, value),
            None if value.is_nullish() => continue,
            None => merge_value(&ConfigValue::Undefined, value),
        };
        merged.insert(key.clone(), next);
    }
    merged
}

fn merge_value(base: &ConfigValue, over: &ConfigValue) -> ConfigValue {
    match (base, over) {
        (_, ConfigValue::Undefined | ConfigValue::Null) => base.clone(),
        (_, ConfigValue::Unset) => ConfigValue::Unset,
        (ConfigValue::Undefined | ConfigValue::Null | ConfigValue::Unset, ConfigValue::Map(map)) => {
            ConfigValue::Map(merge_fragments(&ConfigFragment::new(), map))
        }
        (ConfigValue::Undefined | ConfigValue::Null | ConfigValue::Unset, _) => over.clone(),
        (ConfigValue::List(_), _) | (_, ConfigValue::List(_)) => {
            let mut items = arraify(base);
            let fresh: Vec<ConfigValue> = arraify(over)
                .into_iter()
                .filter(|item| !items.contains(item))
                .collect();
            items.extend(fresh);
            ConfigValue::List(items)
        }
        (ConfigValue::Map(a), ConfigValue::Map(b)) => ConfigValue::Map(merge_fragments(a, b)),
        (_, ConfigValue::Map(map)) => ConfigValue::Map(merge_fragments(&ConfigFragment::new(), map)),
        _ => over.clone(),
    }
}

fn arraify(value: &ConfigValue) -> Vec<ConfigValue> {
    match value {
        ConfigValue::List(items) => items.clone(),
        other => vec![other.clone()],
    }
}
