use thiserror::Error;

/// 类加载失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("class not found: {0}")]
pub struct ClassNotFound(pub String);

/// 反射相关错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReflectError {
    #[error("malformed generic type '{signature}': {reason}")]
    MalformedType { signature: String, reason: String },
}
