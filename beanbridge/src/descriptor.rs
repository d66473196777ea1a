use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use beanbridge_consumer::annotations::DEPENDENT_SCOPE;
use beanbridge_consumer::{Bean, CreationalContext, InjectionPoint};
use beanbridge_host::ConfigurableListableBeanFactory;
use beanbridge_reflect::{Annotation, AnnotationKind, Class, Object};

/// 发布到消费方容器的宿主 Bean
///
/// 创建后不可变；`create` / `destroy` 只是委托给宿主 Bean 工厂。
#[derive(Clone)]
pub struct PublishedBean {
    name: String,
    bean_class: Class,
    types: BTreeSet<Class>,
    qualifiers: BTreeSet<Annotation>,
    stereotypes: BTreeSet<AnnotationKind>,
    bean_factory: Arc<dyn ConfigurableListableBeanFactory>,
}

impl PublishedBean {
    pub fn new(
        name: impl Into<String>,
        bean_class: Class,
        types: BTreeSet<Class>,
        qualifiers: BTreeSet<Annotation>,
        stereotypes: BTreeSet<AnnotationKind>,
        bean_factory: Arc<dyn ConfigurableListableBeanFactory>,
    ) -> Self {
        Self {
            name: name.into(),
            bean_class,
            types,
            qualifiers,
            stereotypes,
            bean_factory,
        }
    }

    /// 宿主 Bean 名称
    pub fn bean_name(&self) -> &str {
        &self.name
    }

    pub fn bean_factory(&self) -> &Arc<dyn ConfigurableListableBeanFactory> {
        &self.bean_factory
    }
}

impl Bean for PublishedBean {
    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn bean_class(&self) -> &Class {
        &self.bean_class
    }

    fn types(&self) -> &BTreeSet<Class> {
        &self.types
    }

    fn qualifiers(&self) -> &BTreeSet<Annotation> {
        &self.qualifiers
    }

    fn scope(&self) -> &AnnotationKind {
        &DEPENDENT_SCOPE
    }

    fn stereotypes(&self) -> &BTreeSet<AnnotationKind> {
        &self.stereotypes
    }

    fn is_nullable(&self) -> bool {
        true
    }

    fn injection_points(&self) -> &[InjectionPoint] {
        &[]
    }

    fn is_alternative(&self) -> bool {
        false
    }

    fn create(&self, _context: &mut CreationalContext) -> Result<Option<Object>> {
        tracing::debug!("Creating bean '{}' from host container", self.name);
        self.bean_factory.get_bean(&self.name)
    }

    /// 只有原型 Bean 交还宿主销毁；共享实例仍归宿主所有
    fn destroy(&self, instance: &Object, context: &mut CreationalContext) -> Result<()> {
        if self.bean_factory.is_prototype(&self.name)? {
            tracing::debug!("Destroying prototype bean '{}'", self.name);
            self.bean_factory.destroy_bean(&self.name, instance)?;
            context.release();
        }
        Ok(())
    }
}

impl fmt::Debug for PublishedBean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types: Vec<&str> = self.types.iter().map(Class::name).collect();
        let qualifiers: Vec<String> = self.qualifiers.iter().map(ToString::to_string).collect();
        let stereotypes: Vec<String> = self.stereotypes.iter().map(ToString::to_string).collect();
        f.debug_struct("PublishedBean")
            .field("name", &self.name)
            .field("bean_class", &self.bean_class.name())
            .field("types", &types)
            .field("qualifiers", &qualifiers)
            .field("stereotypes", &stereotypes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beanbridge_consumer::annotations::{any, default_qualifier, DEPENDENT};
    use beanbridge_host::{BeanDefinition, BeanFactory, ConfigurableBeanFactory, DefaultListableBeanFactory, Scope};
    use beanbridge_reflect::{ClassInfo, ClassRegistry};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Worker;

    fn published(name: &str, factory: Arc<DefaultListableBeanFactory>) -> PublishedBean {
        let class = factory.class_loader().load_class("com.example.Worker").unwrap();
        let types = factory.class_loader().type_closure(&class).unwrap();
        PublishedBean::new(
            name,
            class,
            types,
            [any(), default_qualifier()].into_iter().collect(),
            BTreeSet::new(),
            factory,
        )
    }

    fn factory(destroyed: Arc<AtomicUsize>) -> Arc<DefaultListableBeanFactory> {
        let registry = ClassRegistry::new();
        registry.register(ClassInfo::class("com.example.Worker"));
        let factory = DefaultListableBeanFactory::with_class_loader(Arc::new(registry));

        factory
            .register_bean_definition(
                BeanDefinition::new("worker", || Ok(Some(Arc::new(Worker) as Object)))
                    .with_class_name("com.example.Worker")
                    .with_scope(Scope::Prototype)
                    .with_destroy(move |_| {
                        destroyed.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    }),
            )
            .unwrap();
        factory
            .register_bean_definition(
                BeanDefinition::new("shared", || Ok(Some(Arc::new(Worker) as Object)))
                    .with_class_name("com.example.Worker"),
            )
            .unwrap();
        factory
            .register_bean_definition(BeanDefinition::new("nothing", || Ok(None)).with_class_name("com.example.Worker"))
            .unwrap();
        Arc::new(factory)
    }

    #[test]
    fn test_fixed_metadata() {
        let bean = published("shared", factory(Arc::new(AtomicUsize::new(0))));
        assert_eq!(bean.name(), Some("shared"));
        assert_eq!(bean.scope(), &DEPENDENT);
        assert!(std::ptr::eq(bean.scope(), &DEPENDENT_SCOPE));
        assert!(bean.is_nullable());
        assert!(!bean.is_alternative());
        assert!(bean.injection_points().is_empty());
        assert!(bean.types().contains(bean.bean_class()));

        let debug = format!("{:?}", bean);
        assert!(debug.contains("shared"));
        assert!(debug.contains("@Default"));
    }

    #[test]
    fn test_create_delegates_to_host() {
        let factory = factory(Arc::new(AtomicUsize::new(0)));
        let mut ctx = CreationalContext::new();

        let shared = published("shared", factory.clone());
        let a = shared.create(&mut ctx).unwrap().unwrap();
        let b = shared.create(&mut ctx).unwrap().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a, &factory.get_bean("shared").unwrap().unwrap()));

        let prototype = published("worker", factory.clone());
        let a = prototype.create(&mut ctx).unwrap().unwrap();
        let b = prototype.create(&mut ctx).unwrap().unwrap();
        assert!(!Arc::ptr_eq(&a, &b));

        assert!(published("nothing", factory).create(&mut ctx).unwrap().is_none());
    }

    #[test]
    fn test_destroy_only_forwards_prototypes() {
        let destroyed = Arc::new(AtomicUsize::new(0));
        let factory = factory(destroyed.clone());

        let shared = published("shared", factory.clone());
        let mut ctx = CreationalContext::new();
        let instance = shared.create(&mut ctx).unwrap().unwrap();
        shared.destroy(&instance, &mut ctx).unwrap();
        assert!(!ctx.is_released());
        assert_eq!(destroyed.load(Ordering::SeqCst), 0);

        let prototype = published("worker", factory);
        let mut ctx = CreationalContext::new();
        let instance = prototype.create(&mut ctx).unwrap().unwrap();
        prototype.destroy(&instance, &mut ctx).unwrap();
        assert!(ctx.is_released());
        assert_eq!(destroyed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_host_errors_propagate() {
        let bean = published("missing", factory(Arc::new(AtomicUsize::new(0))));
        let err = bean.create(&mut CreationalContext::new()).unwrap_err();
        assert!(err.downcast_ref::<beanbridge_host::BeanError>().is_some());
    }
}
