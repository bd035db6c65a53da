//! Filename substitution table.

use std::collections::BTreeMap;

/// Built-in substitutions: drop `:`, `_`, `?`, `'` and `\`; turn `/` into `_`.
pub fn default_substitutions() -> BTreeMap<String, String> {
    [(":", ""), ("_", ""), ("/", "_"), ("?", ""), ("'", ""), ("\\", "")]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Ordered rule list: `defaults` in sorted key order, then the override-only
/// keys. An override of a default key replaces its value in place.
///
/// With the default table `/` is handled before `_`, so the defaults alone
/// leave none of their keys behind and a second pass is a no-op. Rules added
/// by overrides run last, so their output is not rewritten by a default rule.
pub fn merge_substitutions(
    defaults: &BTreeMap<String, String>,
    overrides: &BTreeMap<String, String>,
) -> Vec<(String, String)> {
    let mut rules: Vec<(String, String)> = defaults
        .iter()
        .map(|(k, v)| (k.clone(), overrides.get(k).unwrap_or(v).clone()))
        .collect();
    rules.extend(
        overrides
            .iter()
            .filter(|(k, _)| !defaults.contains_key(*k))
            .map(|(k, v)| (k.clone(), v.clone())),
    );
    rules
}

/// Applies every rule, one after another, in list order.
pub fn apply_substitutions(name: &str, rules: &[(String, String)]) -> String {
    let mut result = name.to_string();
    for (from, to) in rules {
        if from.is_empty() {
            continue;
        }
        result = result.replace(from.as_str(), to);
    }
    result
}
