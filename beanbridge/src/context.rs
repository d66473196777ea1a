//! 宿主上下文提供者
//!
//! 宿主容器在 `refresh()` 时通过 [`ApplicationContextAware`] 回调写入进程级的上下文引用，
//! 上下文定位器在 Web 上下文不可用时读取它。

use std::sync::{Arc, OnceLock};

use beanbridge_host::{ApplicationContext, ApplicationContextAware};

static APPLICATION_CONTEXT: OnceLock<Arc<ApplicationContext>> = OnceLock::new();

/// 持有宿主应用上下文的组件，只写入一次
#[derive(Debug, Default)]
pub struct ApplicationContextProvider;

beanbridge_host::submit_context_aware!(ApplicationContextProvider);

impl ApplicationContextProvider {
    /// 写入上下文；已有上下文时保留原值
    pub fn set(context: Arc<ApplicationContext>) {
        let id = context.id().to_string();
        match APPLICATION_CONTEXT.set(context) {
            Ok(()) => tracing::debug!("Application context '{}' stored", id),
            Err(_) => tracing::warn!(
                "Application context already set, ignoring context '{}'",
                id
            ),
        }
    }

    pub fn get() -> Option<Arc<ApplicationContext>> {
        APPLICATION_CONTEXT.get().cloned()
    }
}

impl ApplicationContextAware for ApplicationContextProvider {
    fn set_application_context(&self, context: Arc<ApplicationContext>) -> anyhow::Result<()> {
        Self::set(context);
        Ok(())
    }
}
