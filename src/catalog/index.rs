use std::collections::HashMap;

use serde_json::Value;

use super::action::{normalize_actions, ActionDescriptor};
use super::event::{normalize_events, EventDescriptor};
use super::operator::{normalize_operators, OperatorDescriptor};

/// 规范化后的目录及派生查找表，每次加载目录时构建一次
///
/// 所有编解码调用显式传入索引，不做全局缓存。
#[derive(Clone, Debug, Default)]
pub struct CatalogIndex {
    events: Vec<EventDescriptor>,
    operators: Vec<OperatorDescriptor>,
    actions: Vec<ActionDescriptor>,
    operator_labels: HashMap<String, String>,
    operator_positions: HashMap<String, usize>,
    action_positions: HashMap<String, usize>,
}

impl CatalogIndex {
    pub fn new(
        events: Vec<EventDescriptor>,
        operators: Vec<OperatorDescriptor>,
        actions: Vec<ActionDescriptor>,
    ) -> Self {
        let mut operator_labels = HashMap::new();
        for operator in &operators {
            operator_labels
                .entry(operator.id.clone())
                .or_insert_with(|| operator.label.clone());
        }
        // 别名不覆盖规范 id
        for operator in &operators {
            for alias in &operator.aliases {
                operator_labels
                    .entry(alias.clone())
                    .or_insert_with(|| operator.label.clone());
            }
        }

        let operator_positions = operators
            .iter()
            .enumerate()
            .map(|(idx, operator)| (operator.id.clone(), idx))
            .collect();
        let action_positions = actions
            .iter()
            .enumerate()
            .map(|(idx, action)| (action.action_type.clone(), idx))
            .collect();

        Self {
            events,
            operators,
            actions,
            operator_labels,
            operator_positions,
            action_positions,
        }
    }

    /// 规范化三个原始目录并建立索引
    pub fn from_raw(events: &Value, operators: &Value, actions: &Value) -> Self {
        let index = Self::new(
            normalize_events(events),
            normalize_operators(operators),
            normalize_actions(actions),
        );
        tracing::debug!(
            events = index.events.len(),
            operators = index.operators.len(),
            actions = index.actions.len(),
            "catalogs indexed"
        );
        index
    }

    pub fn events(&self) -> &[EventDescriptor] {
        &self.events
    }

    pub fn operators(&self) -> &[OperatorDescriptor] {
        &self.operators
    }

    pub fn actions(&self) -> &[ActionDescriptor] {
        &self.actions
    }

    pub fn event(&self, event_type: &str) -> Option<&EventDescriptor> {
        self.events
            .iter()
            .find(|event| event.event_type == event_type)
    }

    /// 按规范 id 查找操作符，不解析别名
    pub fn operator(&self, id: &str) -> Option<&OperatorDescriptor> {
        self.operator_positions
            .get(id)
            .map(|idx| &self.operators[*idx])
    }

    pub fn action(&self, action_type: &str) -> Option<&ActionDescriptor> {
        self.action_positions
            .get(action_type)
            .map(|idx| &self.actions[*idx])
    }

    /// 操作符 id 或别名的显示名称；未知操作符显示原始 id
    pub fn operator_label<'a>(&'a self, operator: &'a str) -> &'a str {
        self.operator_labels
            .get(operator)
            .map(String::as_str)
            .unwrap_or(operator)
    }

    pub fn operator_labels(&self) -> &HashMap<String, String> {
        &self.operator_labels
    }

    pub fn event_label<'a>(&'a self, event_type: &'a str) -> &'a str {
        self.event(event_type)
            .map(|event| event.label.as_str())
            .unwrap_or(event_type)
    }

    pub fn first_event(&self) -> Option<&EventDescriptor> {
        self.events.first()
    }

    pub fn first_operator(&self) -> Option<&OperatorDescriptor> {
        self.operators.first()
    }

    pub fn first_action(&self) -> Option<&ActionDescriptor> {
        self.actions.first()
    }
}
