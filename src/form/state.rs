use serde::{Deserialize, Serialize};

use crate::catalog::CatalogIndex;
use crate::codec::{
    build_action_state, build_condition_field, reconcile, ActionField, ConditionField,
};
use crate::config::CompilerConfig;
use crate::expression::{flatten, Aggregator};
use crate::rule::Rule;

/// 可编辑规则，由单个编辑会话持有，切换规则或重置时整体替换
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub event: String,
    /// 保留输入文本，编译时解析
    #[serde(default)]
    pub priority: String,
    #[serde(default = "FormState::default_active")]
    pub active: bool,
    #[serde(default)]
    pub aggregator: Aggregator,
    #[serde(default)]
    pub conditions: Vec<ConditionField>,
    #[serde(default)]
    pub actions: Vec<ActionField>,
    /// 源规则在不同层级混用了聚合符，扁平条件列表无法体现该分组
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub collapsed_nesting: bool,
}

impl FormState {
    fn default_active() -> bool {
        true
    }
}

fn empty_condition(catalog: &CatalogIndex, config: &CompilerConfig) -> ConditionField {
    let operator = catalog
        .first_operator()
        .map(|operator| operator.id.clone())
        .unwrap_or_else(|| config.default_operator.clone());
    ConditionField::empty(operator)
}

fn default_actions(catalog: &CatalogIndex) -> Vec<ActionField> {
    catalog
        .first_action()
        .map(build_action_state)
        .into_iter()
        .collect()
}

/// 为 `rule` 构建编辑表单；`rule` 为 `None` 时构建新表单
pub fn build_form(
    rule: Option<&Rule>,
    catalog: &CatalogIndex,
    config: &CompilerConfig,
) -> FormState {
    let Some(rule) = rule else {
        return FormState {
            name: String::new(),
            description: String::new(),
            event: catalog
                .first_event()
                .map(|event| event.event_type.clone())
                .unwrap_or_default(),
            priority: config.default_priority.to_string(),
            active: true,
            aggregator: Aggregator::And,
            conditions: vec![empty_condition(catalog, config)],
            actions: default_actions(catalog),
            collapsed_nesting: false,
        };
    };

    let flattened = flatten(&rule.expression);
    let mut conditions: Vec<ConditionField> = flattened
        .conditions
        .iter()
        .map(build_condition_field)
        .collect();
    if conditions.is_empty() {
        conditions.push(empty_condition(catalog, config));
    }

    let mut actions: Vec<ActionField> = rule
        .actions
        .iter()
        .map(|action| reconcile(action, catalog))
        .collect();
    if actions.is_empty() {
        actions = default_actions(catalog);
    }

    FormState {
        name: rule.name.clone(),
        description: rule.description.clone().unwrap_or_default(),
        event: rule.event.clone(),
        priority: rule.priority.to_string(),
        active: rule.active,
        aggregator: rule.expression.aggregator(),
        conditions,
        actions,
        collapsed_nesting: flattened.collapsed_nesting,
    }
}
