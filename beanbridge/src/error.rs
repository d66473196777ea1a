use std::path::PathBuf;

use beanbridge_reflect::ClassNotFound;
use thiserror::Error;

/// 宿主 Bean 无法发布的原因
///
/// 每个变体只影响一个 Bean，发布器记录日志后继续处理其余 Bean。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("Bean '{0}' has no class name and is ignored")]
    NoClassName(String),

    #[error("Class {class_name} of bean '{bean_name}' not found")]
    ClassNotFound { bean_name: String, class_name: String },

    #[error("FactoryBean {class_name} of bean '{bean_name}' declares no object_type method")]
    MissingObjectType { bean_name: String, class_name: String },

    #[error("Cannot determine product type of FactoryBean {class_name} (bean '{bean_name}'): {reason}")]
    MalformedObjectType {
        bean_name: String,
        class_name: String,
        reason: String,
    },

    #[error("Product class {product} of FactoryBean bean '{bean_name}' not found")]
    ProducedClassNotFound { bean_name: String, product: String },

    #[error("Cannot introspect {class_name} for bean '{bean_name}': {source}")]
    Introspection {
        bean_name: String,
        class_name: String,
        source: ClassNotFound,
    },
}

impl TranslateError {
    /// 出错的宿主 Bean 名称
    pub fn bean_name(&self) -> &str {
        match self {
            TranslateError::NoClassName(bean_name)
            | TranslateError::ClassNotFound { bean_name, .. }
            | TranslateError::MissingObjectType { bean_name, .. }
            | TranslateError::MalformedObjectType { bean_name, .. }
            | TranslateError::ProducedClassNotFound { bean_name, .. }
            | TranslateError::Introspection { bean_name, .. } => bean_name,
        }
    }
}

/// 读取桥接配置失败
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// 日志系统初始化失败（例如已经安装了全局订阅者）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to initialize logging: {0}")]
pub struct LoggingInitError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bean_name_of_every_variant() {
        let err = TranslateError::ProducedClassNotFound {
            bean_name: "factory".to_string(),
            product: "com.missing.Hello".to_string(),
        };
        assert_eq!(err.bean_name(), "factory");
        assert_eq!(
            err.to_string(),
            "Product class com.missing.Hello of FactoryBean bean 'factory' not found"
        );
        assert_eq!(TranslateError::NoClassName("anon".to_string()).bean_name(), "anon");
    }
}
