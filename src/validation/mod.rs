use crate::catalog::{CatalogIndex, ParamKind};
use crate::codec::{active_params, normalize_param, ParamValue};
use crate::form::FormState;

/// 编译前检查表单，按顺序返回全部问题
///
/// 即使操作符不需要值，条件也必须同时有路径和值。
pub fn validate(form: &FormState, catalog: &CatalogIndex) -> Vec<String> {
    let mut issues = Vec::new();

    if form.name.trim().is_empty() {
        issues.push("Rule name is required".to_string());
    }
    if form.event.trim().is_empty() {
        issues.push("Select an event".to_string());
    }

    for (idx, condition) in form.conditions.iter().enumerate() {
        let position = idx + 1;
        if condition.path.trim().is_empty() {
            issues.push(format!("Condition {position}: path is required"));
        }
        if condition.value.trim().is_empty() && condition.compare_path().is_none() {
            issues.push(format!("Condition {position}: value is required"));
        }
    }
    if form.conditions.is_empty() {
        issues.push("Add at least one condition".to_string());
    }
    if form.actions.is_empty() {
        issues.push("Add at least one action".to_string());
    }

    for (idx, action) in form.actions.iter().enumerate() {
        let position = idx + 1;
        let Some(descriptor) = catalog.action(action.action_type.trim()) else {
            if action.action_type.trim().is_empty() {
                issues.push(format!("Action {position}: choose an action type"));
            }
            continue;
        };

        for param in active_params(descriptor, &action.params) {
            if !param.required {
                continue;
            }
            let value = action.params.get(&param.name);
            let missing = match param.kind {
                ParamKind::Boolean => !value.map_or(false, ParamValue::to_bool),
                ParamKind::StringArray
                | ParamKind::String
                | ParamKind::Number
                | ParamKind::Integer => normalize_param(param, value).is_none(),
                ParamKind::Object | ParamKind::Variant { .. } => false,
            };
            if missing {
                issues.push(format!(
                    "Action {position} ({}): {} is required",
                    descriptor.label,
                    param.display_label()
                ));
            }
        }
    }

    issues
}
