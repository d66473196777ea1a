use std::sync::Arc;

use beanbridge_consumer::{AfterBeanDiscovery, BeanManager, Extension};
use beanbridge_host::ConfigurableListableBeanFactory;

use crate::error::TranslateError;
use crate::locator::ContextLocator;
use crate::settings::BridgeSettings;
use crate::translator::translate;

/// Bean 发布扩展 - 类型发现结束后把宿主容器的 Bean 加入消费方容器
#[derive(Debug)]
pub struct BeanIntegrationExtension {
    locator: ContextLocator,
    settings: BridgeSettings,
}

beanbridge_consumer::submit_extension!(BeanIntegrationExtension);

impl BeanIntegrationExtension {
    pub fn new(locator: ContextLocator, settings: BridgeSettings) -> Self {
        tracing::info!("BeanIntegrationExtension created.");
        Self { locator, settings }
    }

    /// 发布宿主容器的所有 Bean，返回发布的数量
    pub fn publish(&self, event: &mut AfterBeanDiscovery, manager: &BeanManager) -> usize {
        if !self.settings.publish {
            tracing::debug!("Bean publication disabled by configuration");
            return 0;
        }

        let Some(context) = self.locator.locate() else {
            return 0;
        };
        let bean_factory = context.get_bean_factory();

        let mut published = 0;
        for name in bean_factory.get_bean_definition_names() {
            if self.settings.is_excluded(&name) {
                tracing::debug!("Bean '{}' excluded from publication", name);
                continue;
            }
            if self.publish_bean(&name, &bean_factory, event, manager) {
                published += 1;
            }
        }

        tracing::info!(
            "Published {} bean(s) from application context '{}'",
            published,
            context.id()
        );
        published
    }

    fn publish_bean(
        &self,
        name: &str,
        bean_factory: &Arc<dyn ConfigurableListableBeanFactory>,
        event: &mut AfterBeanDiscovery,
        manager: &BeanManager,
    ) -> bool {
        let definition = match bean_factory.get_bean_definition(name) {
            Ok(definition) => definition,
            Err(e) => {
                tracing::warn!("Cannot read definition of bean '{}': {:#}", name, e);
                return false;
            }
        };

        match translate(name, &definition, bean_factory, manager) {
            Ok(bean) => {
                tracing::info!("Registering bean '{}'", name);
                tracing::debug!("{:?}", bean);
                event.add_bean(Arc::new(bean));
                true
            }
            Err(e @ TranslateError::NoClassName(_)) => {
                tracing::info!("{}", e);
                false
            }
            Err(e) => {
                tracing::warn!("{}", e);
                false
            }
        }
    }
}

impl Default for BeanIntegrationExtension {
    fn default() -> Self {
        Self::new(ContextLocator::new(), BridgeSettings::load())
    }
}

impl Extension for BeanIntegrationExtension {
    fn name(&self) -> &str {
        "BeanIntegrationExtension"
    }

    fn after_bean_discovery(&self, event: &mut AfterBeanDiscovery, manager: &BeanManager) {
        self.publish(event, manager);
    }
}
