use std::collections::BTreeSet;
use std::fmt;

use anyhow::Result;
use beanbridge_reflect::{Annotation, AnnotationKind, Class, Object};

/// Bean 契约 - 容器按此接口解析、创建和销毁一个逻辑 Bean
///
/// 查询方法在 Bean 的整个生命周期内必须返回相同的值。
pub trait Bean: Send + Sync + fmt::Debug {
    /// Bean 名称，未命名的 Bean 返回 None
    fn name(&self) -> Option<&str>;

    /// Bean 的实现类
    fn bean_class(&self) -> &Class;

    /// 可用于注入的类型集合
    fn types(&self) -> &BTreeSet<Class>;

    /// 限定符实例
    fn qualifiers(&self) -> &BTreeSet<Annotation>;

    /// 作用域
    fn scope(&self) -> &AnnotationKind;

    /// 构造型
    fn stereotypes(&self) -> &BTreeSet<AnnotationKind>;

    /// `create` 是否可能不返回实例
    fn is_nullable(&self) -> bool;

    /// 需要容器注入的位置
    fn injection_points(&self) -> &[InjectionPoint];

    fn is_alternative(&self) -> bool;

    /// 创建实例
    fn create(&self, context: &mut CreationalContext) -> Result<Option<Object>>;

    /// 销毁由 `create` 得到的实例
    fn destroy(&self, instance: &Object, context: &mut CreationalContext) -> Result<()>;

    /// 是否可以按给定类型和限定符注入
    fn matches(&self, type_name: &str, required: &[Annotation]) -> bool {
        self.types().iter().any(|t| t.name() == type_name)
            && required.iter().all(|q| self.qualifiers().contains(q))
    }

    /// 用于日志和错误信息的描述
    fn describe(&self) -> String {
        match self.name() {
            Some(name) => format!("{} ({})", name, self.bean_class().name()),
            None => self.bean_class().name().to_string(),
        }
    }
}

/// 注入点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionPoint {
    pub required_type: String,
    pub qualifiers: BTreeSet<Annotation>,
}

/// 创建上下文 - 跟踪一次创建过程中产生的依赖实例
#[derive(Default)]
pub struct CreationalContext {
    dependents: Vec<Object>,
    released: bool,
}

impl CreationalContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录依赖实例，释放时一并丢弃
    pub fn push(&mut self, dependent: Object) {
        self.dependents.push(dependent);
    }

    /// 释放上下文持有的所有依赖实例
    pub fn release(&mut self) {
        tracing::trace!("Releasing creational context with {} dependent(s)", self.dependents.len());
        self.dependents.clear();
        self.released = true;
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn dependent_count(&self) -> usize {
        self.dependents.len()
    }
}

impl fmt::Debug for CreationalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreationalContext")
            .field("dependents", &self.dependents.len())
            .field("released", &self.released)
            .finish()
    }
}
