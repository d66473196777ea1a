//! 启动事件
//!
//! 启动分两个阶段依次触发：先为每个扫描到的类型触发 [`ProcessAnnotatedType`]，
//! 再触发一次 [`AfterBeanDiscovery`]。

use std::sync::Arc;

use crate::bean::Bean;
use crate::manager::AnnotatedType;

/// 扫描到一个类型时触发，扩展可以否决该类型
#[derive(Debug)]
pub struct ProcessAnnotatedType {
    annotated_type: AnnotatedType,
    vetoed: bool,
}

impl ProcessAnnotatedType {
    pub fn new(annotated_type: AnnotatedType) -> Self {
        Self {
            annotated_type,
            vetoed: false,
        }
    }

    pub fn annotated_type(&self) -> &AnnotatedType {
        &self.annotated_type
    }

    /// 丢弃该类型，容器不会为它注册 Bean
    pub fn veto(&mut self) {
        self.vetoed = true;
    }

    pub fn is_vetoed(&self) -> bool {
        self.vetoed
    }

    pub(crate) fn into_annotated_type(self) -> AnnotatedType {
        self.annotated_type
    }
}

/// 类型发现结束后触发一次，扩展可以追加 Bean
#[derive(Debug, Default)]
pub struct AfterBeanDiscovery {
    beans: Vec<Arc<dyn Bean>>,
}

impl AfterBeanDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_bean(&mut self, bean: Arc<dyn Bean>) {
        tracing::trace!("Bean added after discovery: {}", bean.describe());
        self.beans.push(bean);
    }

    pub fn beans(&self) -> &[Arc<dyn Bean>] {
        &self.beans
    }

    pub(crate) fn into_beans(self) -> Vec<Arc<dyn Bean>> {
        self.beans
    }
}
