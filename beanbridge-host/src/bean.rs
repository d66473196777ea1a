use std::fmt;
use std::sync::Arc;

use beanbridge_reflect::{ClassInfo, Object};

use crate::{Result, Scope};

/// FactoryBean 标记接口的类名
///
/// 实现 [`FactoryBean`] 的类在类元数据中直接声明此接口。
pub const FACTORY_BEAN_CLASS_NAME: &str = "beanbridge_host::FactoryBean";

/// FactoryBean 声明产品类型的方法名，返回类型形如 `Class<Product>`
pub const OBJECT_TYPE_METHOD_NAME: &str = "object_type";

/// FactoryBean 标记接口的类元数据
pub fn factory_bean_interface() -> ClassInfo {
    ClassInfo::interface(FACTORY_BEAN_CLASS_NAME)
}

beanbridge_reflect::submit_class!(factory_bean_interface());

/// 实例提供函数；允许返回 None（空 Bean）
pub type InstanceSupplier = Arc<dyn Fn() -> Result<Option<Object>> + Send + Sync>;

/// 销毁回调（@PreDestroy）
pub type DestroyCallback = Arc<dyn Fn(&Object) -> Result<()> + Send + Sync>;

/// FactoryBean - 由 Bean 生产真正被注入的对象
///
/// 容器按名称返回的是 [`FactoryBean::get_object`] 的结果，而不是工厂本身。
pub trait FactoryBean: Send + Sync {
    /// 生产对象
    fn get_object(&self) -> Result<Option<Object>>;

    /// 产品类型的全限定类名，未知时返回 None
    fn object_type(&self) -> Option<&str>;

    /// 产品是否为共享实例
    fn is_singleton(&self) -> bool {
        true
    }
}

/// 实例来源
#[derive(Clone)]
pub(crate) enum InstanceSource {
    Supplier(InstanceSupplier),
    Factory(Arc<dyn FactoryBean>),
}

/// Bean 定义 - 描述如何创建和管理 Bean
#[derive(Clone)]
pub struct BeanDefinition {
    /// Bean 的名称
    pub name: String,

    /// 声明的类名；纯粹由回调生产的 Bean 没有类名
    pub bean_class_name: Option<String>,

    /// Bean 的作用域
    pub scope: Scope,

    /// 是否延迟初始化（仅对单例有效）
    pub lazy: bool,

    /// 销毁回调
    pub destroy_callback: Option<DestroyCallback>,

    pub(crate) source: InstanceSource,
}

impl BeanDefinition {
    /// 由实例提供函数创建 Bean 定义
    pub fn new<F>(name: impl Into<String>, supplier: F) -> Self
    where
        F: Fn() -> Result<Option<Object>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            bean_class_name: None,
            scope: Scope::default(),
            lazy: false,
            destroy_callback: None,
            source: InstanceSource::Supplier(Arc::new(supplier)),
        }
    }

    /// 由 FactoryBean 创建 Bean 定义
    ///
    /// `class_name` 是工厂自身的类名，按名称获取时返回工厂的产品。
    pub fn factory_bean<B>(name: impl Into<String>, class_name: impl Into<String>, factory: B) -> Self
    where
        B: FactoryBean + 'static,
    {
        Self {
            name: name.into(),
            bean_class_name: Some(class_name.into()),
            scope: Scope::Singleton,
            lazy: true,
            destroy_callback: None,
            source: InstanceSource::Factory(Arc::new(factory)),
        }
    }

    /// 设置声明的类名
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.bean_class_name = Some(class_name.into());
        self
    }

    /// 设置作用域
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// 设置延迟初始化
    pub fn with_lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    /// 设置销毁回调
    pub fn with_destroy<F>(mut self, destroy_fn: F) -> Self
    where
        F: Fn(&Object) -> Result<()> + Send + Sync + 'static,
    {
        self.destroy_callback = Some(Arc::new(destroy_fn));
        self
    }

    /// 每次获取是否返回新实例
    pub fn is_prototype(&self) -> bool {
        match &self.source {
            InstanceSource::Supplier(_) => self.scope.is_prototype(),
            InstanceSource::Factory(factory) => !factory.is_singleton(),
        }
    }

    /// 是否由 FactoryBean 生产
    pub fn is_factory_bean(&self) -> bool {
        matches!(self.source, InstanceSource::Factory(_))
    }

    /// 用于类型匹配的类名：FactoryBean 取产品类型，否则取声明的类名
    pub fn effective_type_name(&self) -> Option<&str> {
        match &self.source {
            InstanceSource::Supplier(_) => self.bean_class_name.as_deref(),
            InstanceSource::Factory(factory) => factory.object_type(),
        }
    }
}

impl fmt::Debug for BeanDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanDefinition")
            .field("name", &self.name)
            .field("bean_class_name", &self.bean_class_name)
            .field("scope", &self.scope)
            .field("lazy", &self.lazy)
            .field("factory_bean", &self.is_factory_bean())
            .finish()
    }
}
