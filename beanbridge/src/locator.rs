//! 宿主上下文定位器
//!
//! 依次尝试 Web 应用根上下文和进程级上下文引用；都不可用时桥接不做任何事情，
//! 不使用宿主容器的应用仍然可以正常启动。

use std::sync::Arc;

use beanbridge_host::{ApplicationContext, ContextLoader};

use crate::context::ApplicationContextProvider;

/// 宿主上下文的一个来源
pub trait ContextSource: Send + Sync {
    /// 来源名称（用于日志）
    fn name(&self) -> &str;

    fn lookup(&self) -> Option<Arc<ApplicationContext>>;
}

/// 当前 Web 应用的根上下文
#[derive(Debug, Default)]
pub struct WebContextSource;

impl ContextSource for WebContextSource {
    fn name(&self) -> &str {
        "web application context"
    }

    fn lookup(&self) -> Option<Arc<ApplicationContext>> {
        ContextLoader::current_web_application_context()
    }
}

/// 由 [`ApplicationContextProvider`] 保存的上下文
#[derive(Debug, Default)]
pub struct ProviderContextSource;

impl ContextSource for ProviderContextSource {
    fn name(&self) -> &str {
        "ApplicationContextProvider"
    }

    fn lookup(&self) -> Option<Arc<ApplicationContext>> {
        ApplicationContextProvider::get()
    }
}

/// 固定的上下文，或者固定没有上下文
#[derive(Debug, Default)]
pub struct StaticContextSource(Option<Arc<ApplicationContext>>);

impl StaticContextSource {
    pub fn new(context: Option<Arc<ApplicationContext>>) -> Self {
        Self(context)
    }
}

impl ContextSource for StaticContextSource {
    fn name(&self) -> &str {
        "static context"
    }

    fn lookup(&self) -> Option<Arc<ApplicationContext>> {
        self.0.clone()
    }
}

pub struct ContextLocator {
    sources: Vec<Box<dyn ContextSource>>,
}

impl ContextLocator {
    /// Web 上下文优先，其次是进程级引用
    pub fn new() -> Self {
        Self::with_sources(vec![Box::new(WebContextSource), Box::new(ProviderContextSource)])
    }

    pub fn with_sources(sources: Vec<Box<dyn ContextSource>>) -> Self {
        Self { sources }
    }

    /// 只使用给定的上下文
    pub fn fixed(context: Option<Arc<ApplicationContext>>) -> Self {
        Self::with_sources(vec![Box::new(StaticContextSource::new(context))])
    }

    /// 查找宿主上下文；找不到时记录警告并返回 None
    pub fn locate(&self) -> Option<Arc<ApplicationContext>> {
        for source in &self.sources {
            match source.lookup() {
                Some(context) => {
                    tracing::info!(
                        "Application context '{}' found via {}",
                        context.id(),
                        source.name()
                    );
                    return Some(context);
                }
                None => tracing::warn!("No application context available via {}", source.name()),
            }
        }
        tracing::warn!("No host application context found, bean bridge is inactive");
        None
    }
}

impl Default for ContextLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ContextLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        f.debug_struct("ContextLocator").field("sources", &names).finish()
    }
}
