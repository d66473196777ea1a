//! 日志初始化
//!
//! 级别和格式既可以写在 `[logging]` 配置段，也可以来自环境变量
//! `RUST_LOG` / `LOG_LEVEL` / `LOG_FORMAT`。

use std::str::FromStr;

use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::LoggingInitError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    #[serde(alias = "warning")]
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

/// 输出格式，对应 `tracing-subscriber` 的四种 fmt 布局
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Json,
    /// 多行输出，适合开发
    Pretty,
}

/// 与配置文件使用同一套名称（大小写不敏感）
fn parse_name<T: DeserializeOwned>(s: &str) -> Result<T, String> {
    let lowered = s.trim().to_ascii_lowercase();
    let deserializer: StrDeserializer<'_, ValueError> = lowered.as_str().into_deserializer();
    T::deserialize(deserializer).map_err(|e| e.to_string())
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_name(s)
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_name(s)
    }
}

/// 日志配置
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// 输出模块路径
    pub show_target: bool,
    pub show_thread_names: bool,
    /// `EnvFilter` 指令，例如 "beanbridge=debug,beanbridge_host=warn"；优先于 `level`
    pub filter: Option<String>,
}

impl LoggingConfig {
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_target(mut self, show: bool) -> Self {
        self.show_target = show;
        self
    }

    pub fn with_thread_names(mut self, show: bool) -> Self {
        self.show_thread_names = show;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// 无法识别的 `LOG_LEVEL` / `LOG_FORMAT` 值保留默认
    pub fn from_env() -> Self {
        let read = |key: &str| std::env::var(key).ok();

        Self {
            level: read("LOG_LEVEL").and_then(|v| v.parse().ok()).unwrap_or_default(),
            format: read("LOG_FORMAT").and_then(|v| v.parse().ok()).unwrap_or_default(),
            filter: read("RUST_LOG"),
            ..Self::default()
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let by_level = || {
            EnvFilter::builder()
                .with_default_directive(LevelFilter::from(self.level).into())
                .parse_lossy("")
        };
        match self.filter.as_deref() {
            Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|e| {
                eprintln!("Ignoring invalid log filter '{}': {}", directives, e);
                by_level()
            }),
            None => by_level(),
        }
    }

    /// 安装全局订阅者；进程内已有订阅者时返回错误
    pub fn init(self) -> Result<(), LoggingInitError> {
        let subscriber = fmt()
            .with_env_filter(self.env_filter())
            .with_target(self.show_target)
            .with_thread_names(self.show_thread_names);

        match self.format {
            LogFormat::Compact => subscriber.compact().try_init(),
            LogFormat::Full => subscriber.try_init(),
            LogFormat::Json => subscriber.json().try_init(),
            LogFormat::Pretty => subscriber.pretty().try_init(),
        }
        .map_err(|e| LoggingInitError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_match_config_file() {
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!(" WARNING ".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("Json".parse::<LogFormat>().unwrap(), LogFormat::Json);

        let err = "verbose".parse::<LogLevel>().unwrap_err();
        assert!(err.contains("verbose"));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_defaults_and_overrides() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Compact);
        assert!(config.filter.is_none());

        let config = LoggingConfig::default()
            .with_level(LogLevel::Error)
            .with_format(LogFormat::Pretty)
            .with_target(true)
            .with_filter("beanbridge=trace");
        assert_eq!(config.level, LogLevel::Error);
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.show_target);
        assert!(!config.show_thread_names);
        assert_eq!(config.filter.as_deref(), Some("beanbridge=trace"));
    }

    #[test]
    fn test_level_filter_mapping() {
        assert_eq!(LevelFilter::from(LogLevel::Trace), LevelFilter::TRACE);
        assert_eq!(LevelFilter::from(LogLevel::Warn), LevelFilter::WARN);
    }

    #[test]
    fn test_second_init_is_an_error() {
        let _ = LoggingConfig::default().with_level(LogLevel::Warn).init();
        assert!(LoggingConfig::default().init().is_err());
    }
}
