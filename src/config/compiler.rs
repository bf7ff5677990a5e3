use serde::{Deserialize, Serialize};

use super::env::EnvConfig;

/// 编译器配置：新建表单时使用的默认值
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompilerConfig {
    /// 新规则的默认优先级
    #[serde(default = "CompilerConfig::default_priority")]
    pub default_priority: i64,
    /// 操作符目录为空时空条件使用的操作符
    #[serde(default = "CompilerConfig::default_operator")]
    pub default_operator: String,
}

impl CompilerConfig {
    fn default_priority() -> i64 {
        10
    }

    fn default_operator() -> String {
        "==".to_string()
    }

    /// 从环境变量加载配置
    ///
    /// 支持：
    /// - RULEFORGE_DEFAULT_PRIORITY: 默认优先级（整数）
    /// - RULEFORGE_DEFAULT_OPERATOR: 默认操作符
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(priority) = EnvConfig::get_parsed::<i64>(EnvConfig::DEFAULT_PRIORITY_VAR) {
            config.default_priority = priority;
        }
        if let Some(operator) = EnvConfig::get_env_optional(EnvConfig::DEFAULT_OPERATOR_VAR) {
            config.default_operator = operator;
        }
        config
    }

    pub fn with_default_priority(mut self, priority: i64) -> Self {
        self.default_priority = priority;
        self
    }

    pub fn with_default_operator(mut self, operator: impl Into<String>) -> Self {
        self.default_operator = operator.into();
        self
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            default_priority: Self::default_priority(),
            default_operator: Self::default_operator(),
        }
    }
}
