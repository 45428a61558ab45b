// Tests for the merge engine

use resfilter_core::filterdoc::FilterDocument;
use resfilter_core::merge::merge;
use serde_json::json;

fn document_with_rules(rules: serde_json::Value) -> FilterDocument {
    FilterDocument::from_value(json!({
        "meta": { "exported": "2024-01-01" },
        "data": {
            "filteReddit": {
                "domains": {
                    "type": "table",
                    "value": rules
                }
            },
            "otherModule": { "setting": true }
        }
    }))
    .unwrap()
}

#[test]
fn test_merge_appends_and_sorts() {
    let mut doc = document_with_rules(json!([
        ["zeta.com", "everywhere", ""],
        ["alpha.com", "everywhere", ""]
    ]));

    let added = merge(
        &mut doc,
        &["middle.net".to_string(), "beta.org".to_string()],
    )
    .unwrap();

    assert_eq!(added, 2);
    let domains = doc.domains();
    assert_eq!(domains, vec!["alpha.com", "beta.org", "middle.net", "zeta.com"]);
}

#[test]
fn test_merge_is_idempotent() {
    let mut doc = document_with_rules(json!([["existing.com", "everywhere", ""]]));
    let hosts = vec!["new-site.net".to_string(), "existing.com".to_string()];

    let first = merge(&mut doc, &hosts).unwrap();
    let after_first = doc.as_value().clone();
    let second = merge(&mut doc, &hosts).unwrap();

    assert_eq!(first, 1);
    assert_eq!(second, 0);
    assert_eq!(doc.as_value(), &after_first);
}

#[test]
fn test_merge_cardinality_is_union() {
    let mut doc = document_with_rules(json!([
        ["a.com", "everywhere", ""],
        ["b.com", "everywhere", ""]
    ]));

    // Overlaps with existing and repeats within itself.
    let hosts = vec![
        "b.com".to_string(),
        "c.com".to_string(),
        "c.com".to_string(),
        "d.com".to_string(),
    ];
    merge(&mut doc, &hosts).unwrap();

    // |{a,b} ∪ {b,c,d}| = 4
    assert_eq!(doc.domains().len(), 4);
}

#[test]
fn test_merge_is_case_sensitive() {
    let mut doc = document_with_rules(json!([["Example.com", "everywhere", ""]]));

    let added = merge(&mut doc, &["example.com".to_string()]).unwrap();

    assert_eq!(added, 1);
    assert_eq!(doc.domains().len(), 2);
}

#[test]
fn test_merge_leaves_unrelated_keys_untouched() {
    let mut doc = document_with_rules(json!([["a.com", "everywhere", ""]]));
    let before = doc.as_value().clone();

    merge(&mut doc, &["b.com".to_string()]).unwrap();

    let after = doc.as_value();
    assert_eq!(after["meta"], before["meta"]);
    assert_eq!(after["data"]["otherModule"], before["data"]["otherModule"]);
    assert_eq!(
        after["data"]["filteReddit"]["domains"]["type"],
        before["data"]["filteReddit"]["domains"]["type"]
    );
}

#[test]
fn test_merge_sorts_by_full_tuple() {
    let mut doc = document_with_rules(json!([
        ["same.com", "everywhere", "z-comment"],
        ["same.com", "casual", "a-comment"]
    ]));

    merge(&mut doc, &[]).unwrap();

    let rules = doc.rules().unwrap();
    assert_eq!(rules[0], json!(["same.com", "casual", "a-comment"]));
    assert_eq!(rules[1], json!(["same.com", "everywhere", "z-comment"]));
}

#[test]
fn test_merge_rejects_document_without_rule_path() {
    let result = FilterDocument::from_value(json!({ "data": {} }));
    assert!(result.is_err());
}
