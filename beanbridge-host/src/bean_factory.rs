//! Bean Factory - 宿主容器接口
//!
//! 按名称管理 Bean：列举定义、按名称获取、按类型查找名称、销毁原型实例。

use std::collections::HashMap;
use std::sync::Arc;

use beanbridge_reflect::{Class, ClassLoader, ClassRegistry, Object};
use parking_lot::RwLock;

use crate::bean::{BeanDefinition, InstanceSource};
use crate::error::{BeanError, Result};

/// BeanFactory - 最基础的容器接口
pub trait BeanFactory: Send + Sync {
    /// 通过名称获取 Bean；工厂允许返回空 Bean
    fn get_bean(&self, name: &str) -> Result<Option<Object>>;

    /// 检查是否包含指定名称的 Bean
    fn contains_bean(&self, name: &str) -> bool;

    /// 每次获取是否返回新实例
    fn is_prototype(&self, name: &str) -> Result<bool>;
}

/// ListableBeanFactory - 可列举的 Bean 工厂
pub trait ListableBeanFactory: BeanFactory {
    /// 按注册顺序返回所有 Bean 定义名称
    fn get_bean_definition_names(&self) -> Vec<String>;

    /// 获取类型可赋值给 `class` 的所有 Bean 名称
    fn get_bean_names_for_type(&self, class: &Class) -> Vec<String>;

    /// 获取 Bean 定义的数量
    fn get_bean_definition_count(&self) -> usize;
}

/// ConfigurableBeanFactory - 可配置的 Bean 工厂
pub trait ConfigurableBeanFactory: BeanFactory {
    /// 注册 Bean 定义
    fn register_bean_definition(&self, definition: BeanDefinition) -> Result<()>;

    /// 检查是否包含指定的 Bean 定义
    fn contains_bean_definition(&self, name: &str) -> bool;

    /// 获取单个 Bean 定义
    fn get_bean_definition(&self, name: &str) -> Result<BeanDefinition>;

    /// 销毁一个由调用方持有的实例（通常是原型 Bean）
    fn destroy_bean(&self, name: &str, instance: &Object) -> Result<()>;
}

/// ConfigurableListableBeanFactory - 可配置且可列举的 Bean 工厂
pub trait ConfigurableListableBeanFactory: ListableBeanFactory + ConfigurableBeanFactory {
    /// 预实例化所有非延迟加载的单例 Bean
    fn preinstantiate_singletons(&self) -> Result<()>;

    /// 冻结配置（不再允许注册 Bean 定义）
    fn freeze_configuration(&self);

    /// 检查配置是否已冻结
    fn is_configuration_frozen(&self) -> bool;

    /// 销毁所有缓存的单例（调用 destroy 回调）
    fn destroy_singletons(&self) -> Result<()>;
}

/// DefaultListableBeanFactory - ConfigurableListableBeanFactory 的默认实现
pub struct DefaultListableBeanFactory {
    /// Bean 定义存储
    definitions: RwLock<HashMap<String, BeanDefinition>>,

    /// 注册顺序
    names: RwLock<Vec<String>>,

    /// 单例缓存；空 Bean 也会被缓存
    singletons: RwLock<HashMap<String, Option<Object>>>,

    /// 用于按类型匹配的类加载器
    class_loader: Arc<dyn ClassLoader>,

    /// 配置是否已冻结
    configuration_frozen: RwLock<bool>,
}

impl DefaultListableBeanFactory {
    /// 使用全局类注册表创建 Bean 工厂
    pub fn new() -> Self {
        Self::with_class_loader(ClassRegistry::global())
    }

    /// 使用指定的类加载器创建 Bean 工厂
    pub fn with_class_loader(class_loader: Arc<dyn ClassLoader>) -> Self {
        Self {
            definitions: RwLock::new(HashMap::new()),
            names: RwLock::new(Vec::new()),
            singletons: RwLock::new(HashMap::new()),
            class_loader,
            configuration_frozen: RwLock::new(false),
        }
    }

    pub fn class_loader(&self) -> &Arc<dyn ClassLoader> {
        &self.class_loader
    }

    fn definition(&self, name: &str) -> Result<BeanDefinition> {
        self.definitions.read().get(name).cloned().ok_or_else(|| {
            tracing::debug!("Bean '{}' not found in container", name);
            BeanError::NoSuchBean(name.to_string()).into()
        })
    }

    /// 创建实例；调用提供函数时不持有任何锁，提供函数可以再次访问工厂
    fn create_instance(&self, definition: &BeanDefinition) -> Result<Option<Object>> {
        let created = match &definition.source {
            InstanceSource::Supplier(supplier) => supplier(),
            InstanceSource::Factory(factory) => factory.get_object(),
        };
        created.map_err(|e| BeanError::CreationFailed(definition.name.clone(), format!("{:#}", e)).into())
    }

    fn is_type_match(&self, definition: &BeanDefinition, class: &Class) -> bool {
        let Some(type_name) = definition.effective_type_name() else {
            return false;
        };
        match self.class_loader.load_class(type_name) {
            Ok(bean_type) => self.class_loader.is_assignable(class, &bean_type),
            Err(e) => {
                tracing::trace!("Skipping type match for bean '{}': {}", definition.name, e);
                false
            }
        }
    }
}

impl Default for DefaultListableBeanFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl BeanFactory for DefaultListableBeanFactory {
    fn get_bean(&self, name: &str) -> Result<Option<Object>> {
        tracing::trace!("Requesting bean: '{}'", name);

        let definition = self.definition(name)?;

        if definition.is_prototype() {
            tracing::debug!("Creating new instance of prototype bean '{}'", name);
            return self.create_instance(&definition);
        }

        if let Some(bean) = self.singletons.read().get(name) {
            tracing::debug!("Returning cached instance of singleton bean '{}'", name);
            return Ok(bean.clone());
        }

        tracing::info!("Creating shared instance of singleton bean '{}'", name);
        let bean = self.create_instance(&definition)?;

        // 并发创建时以先写入缓存的实例为准
        let mut singletons = self.singletons.write();
        let cached = singletons.entry(name.to_string()).or_insert(bean);
        Ok(cached.clone())
    }

    fn contains_bean(&self, name: &str) -> bool {
        self.definitions.read().contains_key(name)
    }

    fn is_prototype(&self, name: &str) -> Result<bool> {
        Ok(self.definition(name)?.is_prototype())
    }
}

impl ListableBeanFactory for DefaultListableBeanFactory {
    fn get_bean_definition_names(&self) -> Vec<String> {
        self.names.read().clone()
    }

    fn get_bean_names_for_type(&self, class: &Class) -> Vec<String> {
        let definitions: Vec<BeanDefinition> = {
            let names = self.names.read();
            let definitions = self.definitions.read();
            names.iter().filter_map(|n| definitions.get(n).cloned()).collect()
        };

        definitions
            .iter()
            .filter(|def| self.is_type_match(def, class))
            .map(|def| def.name.clone())
            .collect()
    }

    fn get_bean_definition_count(&self) -> usize {
        self.definitions.read().len()
    }
}

impl ConfigurableBeanFactory for DefaultListableBeanFactory {
    fn register_bean_definition(&self, definition: BeanDefinition) -> Result<()> {
        if *self.configuration_frozen.read() {
            return Err(BeanError::ConfigurationFrozen("register bean definition").into());
        }

        let name = definition.name.clone();
        tracing::trace!(
            "Attempting to register bean: name='{}', class={:?}, scope={:?}",
            name,
            definition.bean_class_name,
            definition.scope
        );

        let mut definitions = self.definitions.write();
        if definitions.contains_key(&name) {
            tracing::warn!("Bean '{}' already exists, registration failed", name);
            return Err(BeanError::AlreadyExists(name).into());
        }
        definitions.insert(name.clone(), definition);
        self.names.write().push(name.clone());

        tracing::debug!("Bean definition registered successfully: '{}'", name);
        Ok(())
    }

    fn contains_bean_definition(&self, name: &str) -> bool {
        self.definitions.read().contains_key(name)
    }

    fn get_bean_definition(&self, name: &str) -> Result<BeanDefinition> {
        self.definition(name)
    }

    fn destroy_bean(&self, name: &str, instance: &Object) -> Result<()> {
        let definition = self.definition(name)?;
        if let Some(destroy_fn) = &definition.destroy_callback {
            destroy_fn(instance)?;
            tracing::debug!("Bean '{}' destroyed successfully", name);
        }
        Ok(())
    }
}

impl ConfigurableListableBeanFactory for DefaultListableBeanFactory {
    fn preinstantiate_singletons(&self) -> Result<()> {
        let bean_names: Vec<String> = {
            let names = self.names.read();
            let definitions = self.definitions.read();
            names
                .iter()
                .filter(|n| {
                    definitions
                        .get(*n)
                        .map(|def| !def.is_prototype() && !def.lazy)
                        .unwrap_or(false)
                })
                .cloned()
                .collect()
        };

        tracing::debug!("Pre-instantiating {} singleton beans", bean_names.len());

        for name in bean_names {
            self.get_bean(&name)?;
        }

        Ok(())
    }

    fn freeze_configuration(&self) {
        *self.configuration_frozen.write() = true;
        tracing::debug!("Bean factory configuration frozen");
    }

    fn is_configuration_frozen(&self) -> bool {
        *self.configuration_frozen.read()
    }

    fn destroy_singletons(&self) -> Result<()> {
        tracing::info!("Destroying singleton beans");

        let beans: Vec<(String, Option<Object>)> = self.singletons.write().drain().collect();

        for (name, bean) in beans {
            let Some(bean) = bean else { continue };
            let callback = self
                .definitions
                .read()
                .get(&name)
                .and_then(|def| def.destroy_callback.clone());

            if let Some(destroy_fn) = callback {
                match destroy_fn(&bean) {
                    Ok(()) => tracing::debug!("Bean '{}' destroyed successfully", name),
                    Err(e) => tracing::warn!("Failed to destroy bean '{}': {}", name, e),
                }
            }
        }

        tracing::info!("Singleton beans destruction completed");
        Ok(())
    }
}
