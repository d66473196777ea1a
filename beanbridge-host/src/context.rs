use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use beanbridge_reflect::{ClassLoader, Object};
use parking_lot::RwLock;

use crate::bean::{BeanDefinition, FactoryBean};
use crate::bean_factory::{
    BeanFactory, ConfigurableBeanFactory, ConfigurableListableBeanFactory, DefaultListableBeanFactory,
    ListableBeanFactory,
};
use crate::{Result, Scope};

/// 感知应用上下文的组件（类似 Spring 的 ApplicationContextAware）
///
/// 上下文在 `refresh()` 时对每个组件调用一次 `set_application_context`。
pub trait ApplicationContextAware: Send + Sync {
    fn set_application_context(&self, context: Arc<ApplicationContext>) -> Result<()>;
}

/// ApplicationContextAware 组件注册表 - 用于 inventory 收集
pub struct ContextAwareRegistry {
    pub name: &'static str,
    pub create: fn() -> Arc<dyn ApplicationContextAware>,
}

inventory::collect!(ContextAwareRegistry);

/// 将类型登记为可被组件扫描发现的 ApplicationContextAware 组件
///
/// 类型需要实现 `Default`。
#[macro_export]
macro_rules! submit_context_aware {
    ($aware_type:ty) => {
        $crate::inventory::submit! {
            $crate::ContextAwareRegistry {
                name: stringify!($aware_type),
                create: || ::std::sync::Arc::new(<$aware_type>::default()),
            }
        }
    };
}

/// 应用上下文 - 持有 BeanFactory，驱动启动与关闭
pub struct ApplicationContext {
    /// 上下文标识（用于日志）
    id: String,

    /// Bean 工厂 - 负责 Bean 的创建和管理
    bean_factory: Arc<DefaultListableBeanFactory>,

    /// 显式添加的 ApplicationContextAware 组件
    aware_components: RwLock<Vec<Arc<dyn ApplicationContextAware>>>,

    active: AtomicBool,
}

impl ApplicationContext {
    /// 使用全局类注册表创建上下文
    pub fn new(id: impl Into<String>) -> Arc<Self> {
        Self::with_bean_factory(id, DefaultListableBeanFactory::new())
    }

    /// 使用指定的类加载器创建上下文
    pub fn with_class_loader(id: impl Into<String>, class_loader: Arc<dyn ClassLoader>) -> Arc<Self> {
        Self::with_bean_factory(id, DefaultListableBeanFactory::with_class_loader(class_loader))
    }

    fn with_bean_factory(id: impl Into<String>, bean_factory: DefaultListableBeanFactory) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            bean_factory: Arc::new(bean_factory),
            aware_components: RwLock::new(Vec::new()),
            active: AtomicBool::new(false),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// 获取内部的 BeanFactory
    pub fn get_bean_factory(&self) -> Arc<dyn ConfigurableListableBeanFactory> {
        self.bean_factory.clone()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// 注册 Bean 定义
    pub fn register(&self, definition: BeanDefinition) -> Result<()> {
        self.bean_factory.register_bean_definition(definition)
    }

    /// 注册单例 Bean
    pub fn register_singleton<T, F>(
        &self,
        name: impl Into<String>,
        class_name: impl Into<String>,
        factory: F,
    ) -> Result<()>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Result<T> + Send + Sync + 'static,
    {
        let definition = BeanDefinition::new(name, move || Ok(Some(Arc::new(factory()?) as Object)))
            .with_class_name(class_name)
            .with_scope(Scope::Singleton);
        self.register(definition)
    }

    /// 注册原型 Bean
    pub fn register_prototype<T, F>(
        &self,
        name: impl Into<String>,
        class_name: impl Into<String>,
        factory: F,
    ) -> Result<()>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Result<T> + Send + Sync + 'static,
    {
        let definition = BeanDefinition::new(name, move || Ok(Some(Arc::new(factory()?) as Object)))
            .with_class_name(class_name)
            .with_scope(Scope::Prototype);
        self.register(definition)
    }

    /// 注册 FactoryBean
    pub fn register_factory_bean<B>(
        &self,
        name: impl Into<String>,
        class_name: impl Into<String>,
        factory: B,
    ) -> Result<()>
    where
        B: FactoryBean + 'static,
    {
        self.register(BeanDefinition::factory_bean(name, class_name, factory))
    }

    /// 添加 ApplicationContextAware 组件
    pub fn add_context_aware(&self, component: Arc<dyn ApplicationContextAware>) {
        self.aware_components.write().push(component);
    }

    /// 所有 Bean 定义名称（注册顺序）
    pub fn get_bean_definition_names(&self) -> Vec<String> {
        self.bean_factory.get_bean_definition_names()
    }

    /// 通过名称获取 Bean
    pub fn get_bean(&self, name: &str) -> Result<Option<Object>> {
        self.bean_factory.get_bean(name)
    }

    /// 启动上下文
    ///
    /// 1. 回调所有 ApplicationContextAware 组件（显式添加的和扫描到的）
    /// 2. 冻结配置
    /// 3. 预实例化非延迟加载的单例
    pub fn refresh(self: &Arc<Self>) -> Result<()> {
        tracing::info!("Refreshing application context '{}'", self.id);

        let mut components: Vec<Arc<dyn ApplicationContextAware>> = self.aware_components.read().clone();

        let registered: Vec<_> = inventory::iter::<ContextAwareRegistry>.into_iter().collect();
        if !registered.is_empty() {
            tracing::debug!("Found {} ApplicationContextAware component(s)", registered.len());
        }
        for entry in registered {
            tracing::debug!("  ├─ ApplicationContextAware: {}", entry.name);
            components.push((entry.create)());
        }

        for component in components {
            component.set_application_context(Arc::clone(self))?;
        }

        self.bean_factory.freeze_configuration();
        self.bean_factory.preinstantiate_singletons()?;
        self.active.store(true, Ordering::Release);

        tracing::info!(
            "Application context '{}' started with {} bean definition(s)",
            self.id,
            self.bean_factory.get_bean_definition_count()
        );
        Ok(())
    }

    /// 关闭上下文，销毁所有单例
    pub fn close(&self) -> Result<()> {
        if !self.active.swap(false, Ordering::AcqRel) {
            return Ok(());
        }
        tracing::info!("Closing application context '{}'", self.id);
        self.bean_factory.destroy_singletons()
    }
}

impl std::fmt::Debug for ApplicationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationContext")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .field("bean_definitions", &self.bean_factory.get_bean_definition_count())
            .finish()
    }
}
