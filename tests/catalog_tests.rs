use std::fs;

use ruleforge::{load_catalog, CatalogIndex, ParamKind, RuleForgeError};
use serde_json::json;

fn bundle() -> serde_json::Value {
    json!({
        "events": [
            { "type": "http.request", "name": "HTTP request", "description": "Any proxied request" },
            { "type": "mcp.tool_call", "name": "MCP tool call" }
        ],
        "operators": [
            { "operator": "==", "label": "equals", "aliases": ["eq", "="] },
            { "value": "exists", "name": "exists", "value_required": false },
            { "op": "in", "multiValue": true },
            { "label": "broken" },
            { "operator": "==", "label": "shadowed" }
        ],
        "actions": [
            {
                "type": "webhook",
                "label": "Webhook",
                "params": [
                    { "name": "url", "kind": "string", "required": true, "inputHint": "url" },
                    { "name": "method", "kind": "string", "choices": ["POST", "PUT"] },
                    { "name": "headers", "kind": "object" }
                ]
            },
            { "label": "missing type" }
        ]
    })
}

#[test]
fn loads_catalog_bundle_from_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("catalog.json");
    fs::write(&path, bundle().to_string()).expect("write catalog");

    let catalog = load_catalog(&path).expect("catalog loads");
    assert_eq!(catalog.events().len(), 2);
    assert_eq!(catalog.operators().len(), 3);
    assert_eq!(catalog.actions().len(), 1);

    let webhook = catalog.action("webhook").expect("webhook");
    assert_eq!(webhook.params[0].input_hint.as_deref(), Some("url"));
    assert!(webhook.params[1].is_single_select());
    assert_eq!(webhook.params[2].kind, ParamKind::Object);
}

#[test]
fn missing_file_is_a_catalog_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_catalog(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, RuleForgeError::Catalog { .. }));
}

#[test]
fn label_lookup_covers_aliases() {
    let raw = bundle();
    let catalog = CatalogIndex::from_raw(&raw["events"], &raw["operators"], &raw["actions"]);

    assert_eq!(catalog.operator_label("=="), "equals");
    assert_eq!(catalog.operator_label("eq"), "equals");
    assert_eq!(catalog.operator_label("="), "equals");
    assert_eq!(catalog.operator_label("exists"), "exists");
    assert_eq!(catalog.operator_label("in"), "in");
    assert_eq!(catalog.operator_label("matches"), "matches");
    assert!(catalog.operator("in").expect("in").multi_value);
    assert!(catalog.operator("eq").is_none());
    assert_eq!(catalog.event_label("mcp.tool_call"), "MCP tool call");
}
