use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuleForgeError>;

#[derive(Debug, Error)]
pub enum RuleForgeError {
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error("failed to load catalog from `{path}`: {message}")]
    Catalog { path: String, message: String },
    #[error("rule form has {} validation issue(s): {}", .0.len(), .0.join("; "))]
    Invalid(Vec<String>),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RuleForgeError {
    pub fn catalog(path: impl Into<String>, message: impl Into<String>) -> Self {
        RuleForgeError::Catalog {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// 导入可移植规则文档时的硬性失败
///
/// 消息面向最终用户，应原样展示。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("import document is empty; paste an exported rule JSON")]
    EmptyInput,
    #[error("import document is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("import document must be a JSON object")]
    NotAnObject,
    #[error("import document must contain at least one condition")]
    NoConditions,
    #[error("condition {index} is missing `path`")]
    ConditionMissingPath { index: usize },
    #[error("condition {index} is missing `operator`")]
    ConditionMissingOperator { index: usize },
    #[error("import document must contain at least one action")]
    NoActions,
    #[error("action {index} is missing `type`")]
    ActionMissingType { index: usize },
}
