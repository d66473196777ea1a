//! 桥接配置
//!
//! 配置是可选的。默认值即完整行为：发布所有宿主 Bean，并否决重复扫描到的类型。
//!
//! ```toml
//! [bridge]
//! publish = true
//! veto = true
//! exclude = ["internalCache"]
//!
//! [logging]
//! level = "info"
//! format = "compact"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::SettingsError;
use crate::logging::{LogFormat, LogLevel, LoggingConfig};

/// 配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "BEANBRIDGE_CONFIG";

/// 默认配置文件名（相对于工作目录）
pub const DEFAULT_CONFIG_FILE: &str = "beanbridge.toml";

const PUBLISH_ENV: &str = "BEANBRIDGE_PUBLISH";
const VETO_ENV: &str = "BEANBRIDGE_VETO";

/// `[bridge]` 段
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    /// 是否把宿主 Bean 发布到消费方容器
    pub publish: bool,

    /// 是否否决宿主已经管理的扫描类型
    pub veto: bool,

    /// 永不发布的宿主 Bean 名称
    pub exclude: Vec<String>,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            publish: true,
            veto: true,
            exclude: Vec::new(),
        }
    }
}

/// `[logging]` 段
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: Option<LogLevel>,
    pub format: Option<LogFormat>,
    pub filter: Option<String>,
}

impl LoggingSettings {
    /// 在环境变量配置的基础上应用文件中的设置
    pub fn to_config(&self) -> LoggingConfig {
        let mut config = LoggingConfig::from_env();
        if let Some(level) = self.level {
            config = config.with_level(level);
        }
        if let Some(format) = self.format {
            config = config.with_format(format);
        }
        if let Some(filter) = &self.filter {
            config = config.with_filter(filter.clone());
        }
        config
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    bridge: BridgeSettings,
    logging: LoggingSettings,
}

/// 完整的配置文件内容
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub bridge: BridgeSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// 从 TOML 字符串解析
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let file: SettingsFile = toml::from_str(content)?;
        Ok(Self {
            bridge: file.bridge,
            logging: file.logging,
        })
    }

    /// 从文件加载
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// 按约定加载配置，并应用环境变量覆盖
    ///
    /// 路径取自 `BEANBRIDGE_CONFIG`，否则为工作目录下的 `beanbridge.toml`。
    /// 文件不存在时使用默认值；文件无法解析时记录警告并使用默认值。
    pub fn load() -> Self {
        let (path, explicit) = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => (PathBuf::from(path), true),
            Err(_) => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let mut settings = if path.exists() {
            match Self::from_file(&path) {
                Ok(settings) => {
                    tracing::debug!("Loaded bridge settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    tracing::warn!("{}, using default bridge settings", e);
                    Self::default()
                }
            }
        } else {
            if explicit {
                tracing::warn!("Config file {:?} does not exist, using default bridge settings", path);
            }
            Self::default()
        };

        settings.bridge.apply_env();
        settings
    }
}

impl BridgeSettings {
    /// 按约定加载 `[bridge]` 段
    pub fn load() -> Self {
        Settings::load().bridge
    }

    /// 从 TOML 字符串解析 `[bridge]` 段
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Settings::from_toml_str(content).map(|s| s.bridge)
    }

    /// 从文件加载 `[bridge]` 段
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        Settings::from_file(path).map(|s| s.bridge)
    }

    /// 否决只在宿主 Bean 会被发布时生效
    pub fn veto_enabled(&self) -> bool {
        self.veto && self.publish
    }

    /// 是否排除该宿主 Bean
    pub fn is_excluded(&self, bean_name: &str) -> bool {
        self.exclude.iter().any(|name| name == bean_name)
    }

    fn apply_env(&mut self) {
        if let Some(publish) = env_flag(PUBLISH_ENV) {
            self.publish = publish;
        }
        if let Some(veto) = env_flag(VETO_ENV) {
            self.veto = veto;
        }
    }
}

fn env_flag(key: &str) -> Option<bool> {
    let value = std::env::var(key).ok()?;
    let flag = parse_flag(&value);
    if flag.is_none() {
        tracing::warn!("Ignoring invalid boolean value '{}' for {}", value, key);
    }
    flag
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.bridge.publish);
        assert!(settings.bridge.veto);
        assert!(settings.bridge.exclude.is_empty());
    }

    #[test]
    fn test_parse_full_file() {
        let settings = Settings::from_toml_str(
            r#"
            [bridge]
            veto = false
            exclude = ["internalCache", "metrics"]

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        assert!(settings.bridge.publish);
        assert!(!settings.bridge.veto);
        assert!(settings.bridge.is_excluded("metrics"));
        assert!(!settings.bridge.is_excluded("greeter"));
        assert_eq!(settings.logging.level, Some(LogLevel::Debug));
        assert_eq!(settings.logging.format, Some(LogFormat::Json));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let err = BridgeSettings::from_toml_str("[bridge]\npublish = \"sometimes\"").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));

        let err = BridgeSettings::from_file("/nonexistent/beanbridge.toml").unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("YES"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
