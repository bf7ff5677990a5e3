use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::EnvConfig;

/// 日志配置
pub struct LoggingConfig;

impl LoggingConfig {
    /// 初始化日志系统
    ///
    /// 支持通过环境变量配置：
    /// - RUST_LOG: 设置日志级别（error, warn, info, debug, trace）
    /// - RULEFORGE_DEBUG: 启用详细调试输出
    ///
    /// 重复调用是安全的，已安装的订阅者会被保留。
    ///
    /// ```no_run
    /// use ruleforge::utils::LoggingConfig;
    ///
    /// LoggingConfig::init();
    /// tracing::info!("ready");
    /// ```
    pub fn init() {
        let is_debug = Self::is_debug();

        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => {
                if is_debug {
                    EnvFilter::new("ruleforge=debug,info")
                } else {
                    EnvFilter::new("ruleforge=info,warn")
                }
            }
        };

        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(is_debug)
            .with_file(is_debug)
            .with_line_number(is_debug);

        let installed = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .is_ok();

        if installed && is_debug {
            tracing::debug!("debug logging enabled");
        }
    }

    /// 初始化日志系统（带自定义过滤器）
    pub fn init_with_filter(filter: &str) {
        tracing_subscriber::registry()
            .with(EnvFilter::new(filter))
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .ok();
    }

    /// 检查是否启用调试模式
    pub fn is_debug() -> bool {
        EnvConfig::is_debug_mode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_debug() {
        std::env::remove_var(EnvConfig::DEBUG_VAR);
        assert!(!LoggingConfig::is_debug());

        std::env::set_var(EnvConfig::DEBUG_VAR, "1");
        assert!(LoggingConfig::is_debug());

        std::env::remove_var(EnvConfig::DEBUG_VAR);
    }

    #[test]
    fn init_twice_does_not_panic() {
        LoggingConfig::init_with_filter("ruleforge=trace");
        LoggingConfig::init();
    }
}
