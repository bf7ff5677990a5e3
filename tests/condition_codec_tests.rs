use ruleforge::codec::{condition_from_field, stringify_value};
use ruleforge::{
    build_condition_field, coerce_value, infer_value_type, CatalogIndex, Condition,
    ConditionField, Operand, ValueType,
};
use serde_json::json;

#[test]
fn value_optional_operator_compiles_to_empty_literal() {
    let catalog = CatalogIndex::from_raw(
        &json!([]),
        &json!([
            { "operator": "==", "value_required": true },
            { "operator": "exists", "value_required": false }
        ]),
        &json!([]),
    );
    assert!(!catalog.operator("exists").unwrap().value_required);

    let condition: Condition = serde_json::from_value(json!({
        "op": "exists",
        "left": { "path": "$.user.id" }
    }))
    .unwrap();

    let field = build_condition_field(&condition);
    assert_eq!(
        field,
        ConditionField {
            path: "$.user.id".into(),
            operator: "exists".into(),
            value: String::new(),
            value_type: ValueType::String,
            compare_path: None,
        }
    );

    let compiled = condition_from_field(&field);
    assert_eq!(compiled.right, Some(Operand::literal("")));
}

#[test]
fn numeric_coercion_is_idempotent() {
    for raw in ["0", "42", "-7", "3.14", "1e3", "  12 ", "0.5", "-0.25", "1000000"] {
        let once = coerce_value(raw, ValueType::Number);
        let twice = coerce_value(&stringify_value(Some(&once)), ValueType::Number);
        assert_eq!(once, twice, "coercion of {raw:?} is not stable");
        assert!(once.is_number(), "{raw:?} should coerce to a number");
    }
}

#[test]
fn booleans_round_trip_through_fields() {
    let condition = Condition::new("==", "$.secure", Some(Operand::literal(false)));
    let field = build_condition_field(&condition);
    assert_eq!(field.value, "false");
    assert_eq!(field.value_type, ValueType::Boolean);
    assert_eq!(condition_from_field(&field), condition);
}

#[test]
fn null_right_reads_as_empty_string() {
    let condition: Condition = serde_json::from_value(json!({
        "op": "==",
        "left": { "path": "$.a" },
        "right": null
    }))
    .unwrap();
    let field = build_condition_field(&condition);
    assert_eq!(field.value, "");
    assert_eq!(infer_value_type(None), ValueType::String);
}
