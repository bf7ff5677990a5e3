use std::env;
use std::str::FromStr;

/// 环境变量读取工具
pub struct EnvConfig;

impl EnvConfig {
    pub const DEBUG_VAR: &'static str = "RULEFORGE_DEBUG";
    pub const DEFAULT_PRIORITY_VAR: &'static str = "RULEFORGE_DEFAULT_PRIORITY";
    pub const DEFAULT_OPERATOR_VAR: &'static str = "RULEFORGE_DEFAULT_OPERATOR";

    /// 获取可选的环境变量，空字符串视为未设置
    pub fn get_env_optional(key: &str) -> Option<String> {
        env::var(key)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// 解析环境变量；解析失败时记录警告并返回 `None`
    pub fn get_parsed<T: FromStr>(key: &str) -> Option<T> {
        let raw = Self::get_env_optional(key)?;
        match raw.parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(key = %key, value = %raw, "ignoring unparsable environment value");
                None
            }
        }
    }

    /// 检查是否启用调试模式
    pub fn is_debug_mode() -> bool {
        env::var(Self::DEBUG_VAR).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_unset() {
        env::set_var("RULEFORGE_TEST_BLANK", "   ");
        assert_eq!(EnvConfig::get_env_optional("RULEFORGE_TEST_BLANK"), None);
        env::remove_var("RULEFORGE_TEST_BLANK");
    }

    #[test]
    fn parses_or_ignores() {
        env::set_var("RULEFORGE_TEST_NUM", "42");
        assert_eq!(EnvConfig::get_parsed::<i64>("RULEFORGE_TEST_NUM"), Some(42));
        env::set_var("RULEFORGE_TEST_NUM", "forty-two");
        assert_eq!(EnvConfig::get_parsed::<i64>("RULEFORGE_TEST_NUM"), None);
        env::remove_var("RULEFORGE_TEST_NUM");
    }
}
