//! 宿主容器错误
//!
//! 对外统一使用 `anyhow::Result`，
//! 需要区分的情况用 [`BeanError`] 表示，调用方可通过 `downcast_ref` 识别。

use thiserror::Error;

pub use anyhow::Result;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BeanError {
    #[error("No bean named '{0}' available")]
    NoSuchBean(String),

    #[error("Bean definition '{0}' already exists")]
    AlreadyExists(String),

    #[error("Error creating bean '{0}': {1}")]
    CreationFailed(String, String),

    #[error("Cannot {0}: configuration is frozen")]
    ConfigurationFrozen(&'static str),
}
