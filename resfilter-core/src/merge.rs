use crate::error::Result;
use crate::filterdoc::{DEFAULT_SCOPE, FilterDocument};
use serde_json::{Value, json};
use std::collections::HashSet;
use tracing::debug;

/// Merge newly resolved hosts into the document's domain-rule array.
///
/// Hosts already registered (case-sensitive exact match) are left alone;
/// each new one appends a `[host, "everywhere", ""]` rule. The whole array
/// is then sorted lexicographically by its `(domain, scope, comment)`
/// tuple. Nothing outside the array is touched. Idempotent: merging the
/// same host set twice adds nothing the second time.
///
/// Returns the number of rules added.
pub fn merge(document: &mut FilterDocument, new_hosts: &[String]) -> Result<usize> {
    let rules = document.rules_mut()?;

    let mut registered: HashSet<String> = rules
        .iter()
        .filter_map(|rule| rule.get(0).and_then(Value::as_str))
        .map(String::from)
        .collect();

    let mut added = 0;
    for host in new_hosts {
        if host.is_empty() || registered.contains(host) {
            continue;
        }
        rules.push(json!([host, DEFAULT_SCOPE, ""]));
        registered.insert(host.clone());
        added += 1;
    }

    rules.sort_by_cached_key(rule_key);
    debug!("Merge added {} rule(s), {} total", added, rules.len());
    Ok(added)
}

fn rule_key(rule: &Value) -> (String, String, String) {
    let field = |i: usize| {
        rule.get(i)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    (field(0), field(1), field(2))
}
