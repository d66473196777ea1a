// beanbridge-consumer: 按类型注入的消费方容器
//
// 启动分两个阶段：
// - ProcessAnnotatedType：每个扫描到的类型一次，扩展可以否决
// - AfterBeanDiscovery：一次，扩展可以追加 Bean
// 启动完成后由 Container 按类型和限定符解析 Bean。

pub mod annotations;
pub mod bean;
pub mod bootstrap;
pub mod container;
pub mod error;
pub mod event;
pub mod extension;
pub mod manager;

pub use bean::{Bean, CreationalContext, InjectionPoint};
pub use bootstrap::{Bootstrap, ManagedBean};
pub use container::{BeanHandle, Container};
pub use error::{DeploymentError, ResolutionError};
pub use event::{AfterBeanDiscovery, ProcessAnnotatedType};
pub use extension::{load_extensions, Extension, ExtensionSubmission};
pub use manager::{AnnotatedType, BeanManager};

// 导出 inventory，供 submit_extension! 宏使用
pub use inventory;
