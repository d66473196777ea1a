//! 扩展机制
//!
//! 扩展在启动期间观察事件；可以显式添加，也可以通过 `submit_extension!` 全局登记。

use crate::event::{AfterBeanDiscovery, ProcessAnnotatedType};
use crate::manager::BeanManager;

/// 启动扩展 trait
pub trait Extension: Send + Sync {
    /// 扩展名称
    fn name(&self) -> &str;

    /// 优先级（数字越小越先收到事件）
    fn priority(&self) -> i32 {
        100
    }

    /// 每个扫描到的类型触发一次
    fn process_annotated_type(&self, _event: &mut ProcessAnnotatedType, _manager: &BeanManager) {}

    /// 类型发现结束后触发一次
    fn after_bean_discovery(&self, _event: &mut AfterBeanDiscovery, _manager: &BeanManager) {}
}

/// 扩展提交结构
pub struct ExtensionSubmission {
    pub create: fn() -> Box<dyn Extension>,
}

inventory::collect!(ExtensionSubmission);

/// 用于全局登记扩展的宏，类型需要实现 `Default`
#[macro_export]
macro_rules! submit_extension {
    ($extension_type:ty) => {
        $crate::inventory::submit! {
            $crate::ExtensionSubmission {
                create: || ::std::boxed::Box::new(<$extension_type>::default())
            }
        }
    };
}

/// 从全局注册表加载所有扩展，按优先级排序
pub fn load_extensions() -> Vec<Box<dyn Extension>> {
    let mut extensions: Vec<Box<dyn Extension>> = Vec::new();

    for submission in inventory::iter::<ExtensionSubmission> {
        let extension = (submission.create)();
        tracing::debug!("Discovered extension: {}", extension.name());
        extensions.push(extension);
    }

    extensions.sort_by_key(|e| e.priority());
    extensions
}
