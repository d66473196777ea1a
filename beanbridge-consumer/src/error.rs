use beanbridge_reflect::ClassNotFound;
use thiserror::Error;

/// 解析注入目标失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("Unsatisfied dependency for type {type_name} with qualifiers {qualifiers}")]
    Unsatisfied { type_name: String, qualifiers: String },

    #[error("Ambiguous dependency for type {type_name}, candidates: {candidates:?}")]
    Ambiguous {
        type_name: String,
        candidates: Vec<String>,
    },

    #[error("Bean {0} returned no instance but is not nullable")]
    NullInstance(String),
}

/// 启动失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeploymentError {
    #[error("Cannot deploy scanned type: {0}")]
    ClassNotFound(#[from] ClassNotFound),

    #[error("Duplicate bean name '{0}'")]
    DuplicateName(String),
}
