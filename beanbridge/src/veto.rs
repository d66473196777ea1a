use std::sync::{Arc, OnceLock};

use beanbridge_consumer::{BeanManager, Extension, ProcessAnnotatedType};
use beanbridge_host::ConfigurableListableBeanFactory;

use crate::locator::ContextLocator;
use crate::settings::BridgeSettings;

/// 否决扩展 - 宿主容器已经管理的类型不再由消费方容器自己注册
///
/// 第一次收到事件时定位宿主上下文并缓存结果，之后不再重新定位。
pub struct BeanVetoExtension {
    locator: ContextLocator,
    settings: BridgeSettings,
    bean_factory: OnceLock<Option<Arc<dyn ConfigurableListableBeanFactory>>>,
}

beanbridge_consumer::submit_extension!(BeanVetoExtension);

impl BeanVetoExtension {
    pub fn new(locator: ContextLocator, settings: BridgeSettings) -> Self {
        tracing::info!("BeanVetoExtension created.");
        Self {
            locator,
            settings,
            bean_factory: OnceLock::new(),
        }
    }

    fn bean_factory(&self) -> Option<&Arc<dyn ConfigurableListableBeanFactory>> {
        self.bean_factory
            .get_or_init(|| self.locator.locate().map(|context| context.get_bean_factory()))
            .as_ref()
    }

    /// 宿主中与该类型匹配、且没有被排除的 Bean 名称
    fn matching_bean_names(&self, event: &ProcessAnnotatedType) -> Vec<String> {
        let Some(bean_factory) = self.bean_factory() else {
            return Vec::new();
        };
        bean_factory
            .get_bean_names_for_type(event.annotated_type().java_class())
            .into_iter()
            .filter(|name| !self.settings.is_excluded(name))
            .collect()
    }
}

impl Default for BeanVetoExtension {
    fn default() -> Self {
        Self::new(ContextLocator::new(), BridgeSettings::load())
    }
}

impl Extension for BeanVetoExtension {
    fn name(&self) -> &str {
        "BeanVetoExtension"
    }

    /// 在发布扩展之前收到事件
    fn priority(&self) -> i32 {
        50
    }

    fn process_annotated_type(&self, event: &mut ProcessAnnotatedType, _manager: &BeanManager) {
        if !self.settings.veto_enabled() {
            return;
        }

        let names = self.matching_bean_names(event);
        if !names.is_empty() {
            tracing::info!(
                "Vetoing {}, managed by host bean(s) {:?}",
                event.annotated_type().java_class().name(),
                names
            );
            event.veto();
        }
    }
}

impl std::fmt::Debug for BeanVetoExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanVetoExtension")
            .field("locator", &self.locator)
            .field("settings", &self.settings)
            .field("initialized", &self.bean_factory.get().is_some())
            .finish()
    }
}
