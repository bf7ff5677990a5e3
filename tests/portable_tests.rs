mod common;

use ruleforge::portable::{deserialize_str, deserialize_value, serialize, to_json_string};
use ruleforge::{flatten, ImportError, RuleCompiler, CompilerConfig};
use serde_json::json;

#[test]
fn export_then_import_round_trips() {
    let rule = common::flat_rule();

    let imported = deserialize_value(&serde_json::to_value(serialize(&rule)).unwrap()).unwrap();
    assert_eq!(
        flatten(&imported.expression).conditions,
        flatten(&rule.expression).conditions
    );
    assert_eq!(imported.actions, rule.actions);
    assert_eq!(imported, rule);
}

#[test]
fn export_text_round_trips() {
    let rule = common::flat_rule();
    let text = to_json_string(&rule).unwrap();
    assert_eq!(deserialize_str(&text).unwrap(), rule);
}

#[test]
fn export_reduces_actions_to_type_and_params() {
    let doc = serialize(&common::flat_rule());
    let value = serde_json::to_value(&doc).unwrap();
    assert_eq!(
        value["actions"][0],
        json!({ "type": "tag", "params": { "tags": ["admin", "audit"] } })
    );
    assert_eq!(
        value["conditions"][3],
        json!({ "path": "$.host", "operator": "==", "comparePath": "$.origin" })
    );
}

#[test]
fn empty_condition_list_is_rejected() {
    let err = deserialize_value(&json!({
        "name": "R",
        "event": "e",
        "conditions": [],
        "actions": [{ "type": "t", "params": {} }]
    }))
    .unwrap_err();

    assert_eq!(err, ImportError::NoConditions);
    assert!(err.to_string().contains("at least one condition"));
}

#[test]
fn imported_rules_open_in_the_form() {
    let compiler = RuleCompiler::new(common::catalog(), CompilerConfig::default());
    let rule = compiler
        .import(
            r#"{
                "name": "From file",
                "event": "http.request",
                "aggregator": "or",
                "conditions": [{ "path": "$.method", "operator": "==", "value": "DELETE" }],
                "actions": [{ "type": "legacy_webhook", "params": { "url": "https://x" } }]
            }"#,
        )
        .unwrap();

    let form = compiler.build_form(Some(&rule));
    assert!(form.actions[0].impaired);
    assert_eq!(form.conditions[0].value, "DELETE");

    let saved = compiler.compile(&form).unwrap();
    assert_eq!(saved.actions, rule.actions);
}
