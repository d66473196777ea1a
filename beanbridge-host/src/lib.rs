// beanbridge-host: 按名称管理 Bean 的宿主容器
//
// 提供：
// - 单例和原型作用域
// - FactoryBean（按名称返回工厂的产品）
// - 按类型查找 Bean 名称
// - ApplicationContextAware 回调与 Web 根上下文

pub mod bean;
pub mod bean_factory;
pub mod context;
pub mod error;
pub mod scope;
pub mod web;

pub use bean::{
    factory_bean_interface, BeanDefinition, DestroyCallback, FactoryBean, InstanceSupplier,
    FACTORY_BEAN_CLASS_NAME,
    OBJECT_TYPE_METHOD_NAME,
};
pub use bean_factory::{
    BeanFactory, ConfigurableBeanFactory, ConfigurableListableBeanFactory, DefaultListableBeanFactory,
    ListableBeanFactory,
};
pub use context::{ApplicationContext, ApplicationContextAware, ContextAwareRegistry};
pub use error::{BeanError, Result};
pub use scope::Scope;
pub use web::ContextLoader;

// 导出 inventory，供 submit_context_aware! 宏使用
pub use inventory;
