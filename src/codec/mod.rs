// 编解码：表达式叶子 <-> 条件字段，存储动作 <-> 可编辑动作

pub mod action;
pub mod condition;
pub mod params;

pub use action::{
    active_params, build_action_state, compile_action, default_param, next_action_id,
    normalize_param, reconcile, reconcile_into, set_param, ActionField,
};
pub use condition::{
    build_condition_field, coerce_bool, coerce_value, condition_from_field, infer_value_type,
    stringify_value, ConditionField, ValueType,
};
pub use params::{ParamMap, ParamValue};
