//! 内置注解
//!
//! 限定符 `Any` / `Default` / `Named`，作用域 `Dependent`，
//! 以及用于识别自定义限定符和构造型的元注解。

use beanbridge_reflect::{Annotation, AnnotationKind};

/// 每个 Bean 都带有的限定符
pub const ANY: AnnotationKind = AnnotationKind::new("Any");

/// 未声明其它限定符时的默认限定符
pub const DEFAULT: AnnotationKind = AnnotationKind::new("Default");

/// 按名称限定，成员 `value` 为名称
pub const NAMED: AnnotationKind = AnnotationKind::new("Named");

/// 伪作用域：实例归调用方所有，不做缓存
pub const DEPENDENT: AnnotationKind = AnnotationKind::new("Dependent");

/// `Bean::scope` 返回的共享实例
pub static DEPENDENT_SCOPE: AnnotationKind = DEPENDENT;

/// 元注解：标记注解类型为限定符
pub const QUALIFIER: AnnotationKind = AnnotationKind::new("Qualifier");

/// 元注解：标记注解类型为构造型
pub const STEREOTYPE: AnnotationKind = AnnotationKind::new("Stereotype");

pub fn any() -> Annotation {
    Annotation::marker(ANY)
}

pub fn default_qualifier() -> Annotation {
    Annotation::marker(DEFAULT)
}

pub fn named(value: impl Into<String>) -> Annotation {
    Annotation::marker(NAMED).with_member("value", value)
}

/// 内置限定符
pub(crate) fn is_builtin_qualifier(kind: &AnnotationKind) -> bool {
    *kind == ANY || *kind == DEFAULT || *kind == NAMED
}
