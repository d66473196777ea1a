use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use beanbridge::{BeanIntegrationExtension, BeanVetoExtension, BridgeSettings, ContextLocator};
use beanbridge_consumer::annotations::{any, default_qualifier};
use beanbridge_consumer::{Bean, BeanManager, Bootstrap, Container};
use beanbridge_host::{
    factory_bean_interface, ApplicationContext, BeanDefinition, FactoryBean, Scope, FACTORY_BEAN_CLASS_NAME,
    OBJECT_TYPE_METHOD_NAME,
};
use beanbridge_reflect::{ClassInfo, ClassRegistry, GenericType, MethodInfo, Object};

struct HelloService;
struct Hello;
struct Worker;

struct HelloFactory;

impl FactoryBean for HelloFactory {
    fn get_object(&self) -> Result<Option<Object>> {
        Ok(Some(Arc::new(Hello)))
    }

    fn object_type(&self) -> Option<&str> {
        Some("com.example.Hello")
    }
}

struct Fixture {
    registry: Arc<ClassRegistry>,
    context: Arc<ApplicationContext>,
    destroyed: Arc<AtomicUsize>,
}

fn registry() -> Arc<ClassRegistry> {
    let registry = ClassRegistry::new();
    registry.register(factory_bean_interface());
    registry.register(ClassInfo::interface("com.example.Greeter"));
    registry.register(
        ClassInfo::class("com.example.HelloService")
            .implements("com.example.Greeter")
            .constructor(|| Arc::new(HelloService)),
    );
    registry.register(ClassInfo::class("com.example.Hello").constructor(|| Arc::new(Hello)));
    registry.register(
        ClassInfo::class("com.example.HelloFactoryBean")
            .implements(FACTORY_BEAN_CLASS_NAME)
            .method(MethodInfo::new(
                OBJECT_TYPE_METHOD_NAME,
                GenericType::parameterized("Class", vec![GenericType::class("com.example.Hello")]),
            )),
    );
    registry.register(ClassInfo::class("com.example.Worker").constructor(|| Arc::new(Worker)));
    registry.register(ClassInfo::class("com.example.Standalone").constructor(|| Arc::new(Worker)));
    Arc::new(registry)
}

/// 宿主容器：greeter / factory / prototypeService / ghost
fn host() -> Fixture {
    let registry = registry();
    let destroyed = Arc::new(AtomicUsize::new(0));
    let context = ApplicationContext::with_class_loader("root", registry.clone());

    context
        .register_singleton("greeter", "com.example.HelloService", || Ok(HelloService))
        .unwrap();
    context
        .register_factory_bean("factory", "com.example.HelloFactoryBean", HelloFactory)
        .unwrap();

    let counter = destroyed.clone();
    context
        .register(
            BeanDefinition::new("prototypeService", || Ok(Some(Arc::new(Worker) as Object)))
                .with_class_name("com.example.Worker")
                .with_scope(Scope::Prototype)
                .with_destroy(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }),
        )
        .unwrap();
    context
        .register(BeanDefinition::new("ghost", || Ok(None)).with_class_name("com.missing.Ghost"))
        .unwrap();

    context.refresh().unwrap();

    Fixture {
        registry,
        context,
        destroyed,
    }
}

fn boot(registry: Arc<ClassRegistry>, context: Option<Arc<ApplicationContext>>, scanned: &[&str]) -> Container {
    Bootstrap::new(BeanManager::new(registry))
        .add_extension(BeanVetoExtension::new(
            ContextLocator::fixed(context.clone()),
            BridgeSettings::default(),
        ))
        .add_extension(BeanIntegrationExtension::new(
            ContextLocator::fixed(context),
            BridgeSettings::default(),
        ))
        .add_classes(scanned.iter().copied())
        .boot()
        .unwrap()
}

fn type_names(bean: &Arc<dyn Bean>) -> Vec<&str> {
    bean.types().iter().map(|c| c.name()).collect()
}

#[test]
fn test_singleton_is_published_and_shared() {
    let fixture = host();
    let container = boot(fixture.registry.clone(), Some(fixture.context.clone()), &[]);

    let bean = container.get_bean_by_name("greeter").unwrap();
    assert_eq!(bean.bean_class().name(), "com.example.HelloService");
    let types = type_names(&bean);
    assert!(types.contains(&"com.example.HelloService"));
    assert!(types.contains(&"Object"));
    assert!(bean.qualifiers().contains(&any()));
    assert!(bean.qualifiers().contains(&default_qualifier()));

    let handle = container.get("com.example.HelloService").unwrap();
    let host_instance = fixture.context.get_bean("greeter").unwrap().unwrap();
    assert!(Arc::ptr_eq(handle.get().unwrap(), &host_instance));

    // 通过接口类型同样可以注入
    let by_interface = container.get("com.example.Greeter").unwrap();
    assert!(Arc::ptr_eq(by_interface.get().unwrap(), &host_instance));
}

#[test]
fn test_factory_bean_product_is_published() {
    let fixture = host();
    let container = boot(fixture.registry.clone(), Some(fixture.context.clone()), &[]);

    let bean = container.get_bean_by_name("factory").unwrap();
    assert_eq!(bean.bean_class().name(), "com.example.Hello");
    assert!(type_names(&bean).contains(&"com.example.Hello"));
    assert!(!type_names(&bean).contains(&"com.example.HelloFactoryBean"));

    let handle = container.get("com.example.Hello").unwrap();
    assert!(handle.downcast::<Hello>().is_some());
    assert!(container.resolve("com.example.HelloFactoryBean", &[]).is_empty());
}

#[test]
fn test_prototype_instances_are_destroyed_by_host() {
    let fixture = host();
    let container = boot(fixture.registry.clone(), Some(fixture.context.clone()), &[]);

    let mut first = container.get("com.example.Worker").unwrap();
    let second = container.get("com.example.Worker").unwrap();
    assert!(!Arc::ptr_eq(first.get().unwrap(), second.get().unwrap()));

    first.destroy().unwrap();
    assert_eq!(fixture.destroyed.load(Ordering::SeqCst), 1);
    assert!(first.context().is_released());
}

#[test]
fn test_unloadable_class_is_skipped() {
    let fixture = host();
    let container = boot(fixture.registry.clone(), Some(fixture.context.clone()), &[]);

    assert!(container.get_bean_by_name("ghost").is_none());
    let mut names: Vec<&str> = container.beans().iter().filter_map(|b| b.name()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["factory", "greeter", "prototypeService"]);
}

#[test]
fn test_scanned_copy_is_vetoed() {
    let fixture = host();
    let container = boot(
        fixture.registry.clone(),
        Some(fixture.context.clone()),
        &["com.example.HelloService", "com.example.Standalone"],
    );

    let candidates = container.resolve("com.example.HelloService", &[]);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].name(), Some("greeter"));

    // 宿主没有管理的类型保留
    assert_eq!(container.resolve("com.example.Standalone", &[]).len(), 1);
    assert_eq!(container.beans().len(), 4);
}

#[test]
fn test_absent_host_is_a_no_op() {
    let container = boot(registry(), None, &["com.example.HelloService", "com.example.Worker"]);

    assert_eq!(container.beans().len(), 2);
    assert!(container.get("com.example.HelloService").unwrap().downcast::<HelloService>().is_some());
    assert!(container.get("com.example.Worker").is_ok());
}

#[test]
fn test_scanned_copy_survives_when_publication_is_disabled() {
    let fixture = host();
    let settings = BridgeSettings {
        publish: false,
        ..BridgeSettings::default()
    };
    let container = Bootstrap::new(BeanManager::new(fixture.registry.clone()))
        .add_extension(BeanVetoExtension::new(
            ContextLocator::fixed(Some(fixture.context.clone())),
            settings.clone(),
        ))
        .add_extension(BeanIntegrationExtension::new(
            ContextLocator::fixed(Some(fixture.context.clone())),
            settings,
        ))
        .add_class("com.example.HelloService")
        .boot()
        .unwrap();

    assert_eq!(container.beans().len(), 1);
    assert!(container.get_bean_by_name("greeter").is_none());
    let handle = container.get("com.example.HelloService").unwrap();
    assert!(handle.downcast::<HelloService>().is_some());
}
