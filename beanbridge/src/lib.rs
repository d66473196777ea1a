// beanbridge: 把按名称管理的宿主容器 Bean 发布到按类型注入的消费方容器
//
// - ApplicationContextProvider：宿主启动时记录应用上下文
// - ContextLocator：Web 根上下文优先，其次是记录的上下文
// - BeanVetoExtension：否决宿主已经管理的扫描类型
// - BeanIntegrationExtension：类型发现结束后发布宿主 Bean

pub mod context;
pub mod descriptor;
pub mod error;
pub mod locator;
pub mod logging;
pub mod publisher;
pub mod settings;
pub mod translator;
pub mod veto;

pub use context::ApplicationContextProvider;
pub use descriptor::PublishedBean;
pub use error::{LoggingInitError, SettingsError, TranslateError};
pub use locator::{ContextLocator, ContextSource, ProviderContextSource, StaticContextSource, WebContextSource};
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use publisher::BeanIntegrationExtension;
pub use settings::{BridgeSettings, LoggingSettings, Settings};
pub use translator::translate;
pub use veto::BeanVetoExtension;

/// 常用类型
pub mod prelude {
    pub use crate::{
        ApplicationContextProvider, BeanIntegrationExtension, BeanVetoExtension, BridgeSettings, ContextLocator,
        LoggingConfig, PublishedBean,
    };
    pub use beanbridge_consumer::{Bean, BeanHandle, BeanManager, Bootstrap, Container, Extension};
    pub use beanbridge_host::{ApplicationContext, ApplicationContextAware, ContextLoader, FactoryBean};
    pub use beanbridge_reflect::{submit_class, Class, ClassInfo, MethodInfo, Object};
}
