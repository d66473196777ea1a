//! Web 集成
//!
//! Servlet 容器启动时由监听器把根上下文绑定到当前 Web 应用，
//! 之后任何组件都可以通过 [`ContextLoader::current_web_application_context`] 取得它。

use std::sync::Arc;

use parking_lot::RwLock;

use crate::context::ApplicationContext;

static CURRENT_WEB_CONTEXT: RwLock<Option<Arc<ApplicationContext>>> = parking_lot::const_rwlock(None);

/// Web 应用根上下文的加载器
pub struct ContextLoader;

impl ContextLoader {
    /// 绑定并启动 Web 应用根上下文
    pub fn init_web_application_context(context: Arc<ApplicationContext>) -> crate::Result<()> {
        if !context.is_active() {
            context.refresh()?;
        }
        let mut current = CURRENT_WEB_CONTEXT.write();
        if current.is_some() {
            tracing::warn!(
                "Replacing existing web application context with '{}'",
                context.id()
            );
        }
        tracing::info!("Root web application context '{}' initialized", context.id());
        *current = Some(context);
        Ok(())
    }

    /// 当前 Web 应用的根上下文
    pub fn current_web_application_context() -> Option<Arc<ApplicationContext>> {
        CURRENT_WEB_CONTEXT.read().clone()
    }

    /// 解绑并关闭根上下文
    pub fn close_web_application_context() -> crate::Result<()> {
        let closed = CURRENT_WEB_CONTEXT.write().take();
        match closed {
            Some(context) => {
                tracing::info!("Closing root web application context '{}'", context.id());
                context.close()
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beanbridge_reflect::ClassRegistry;

    #[test]
    fn test_web_context_lifecycle() {
        assert!(ContextLoader::current_web_application_context().is_none());

        let context = ApplicationContext::with_class_loader("web", Arc::new(ClassRegistry::new()));
        ContextLoader::init_web_application_context(context.clone()).unwrap();

        let current = ContextLoader::current_web_application_context().unwrap();
        assert!(Arc::ptr_eq(&current, &context));
        assert!(current.is_active());

        ContextLoader::close_web_application_context().unwrap();
        assert!(ContextLoader::current_web_application_context().is_none());
        assert!(!context.is_active());
    }
}
