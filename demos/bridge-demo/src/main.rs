use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use beanbridge::prelude::*;
use beanbridge::Settings;
use beanbridge_consumer::annotations::{named, QUALIFIER, STEREOTYPE};
use beanbridge_host::{BeanDefinition, Scope, FACTORY_BEAN_CLASS_NAME, OBJECT_TYPE_METHOD_NAME};
use beanbridge_reflect::{AnnotationKind, GenericType};

// ==================== 类元数据 ====================

const PREMIUM: AnnotationKind = AnnotationKind::new("demo.Premium");
const SERVICE: AnnotationKind = AnnotationKind::new("demo.Service");

submit_class!(ClassInfo::annotation_type(&PREMIUM).annotated(QUALIFIER));
submit_class!(ClassInfo::annotation_type(&SERVICE).annotated(STEREOTYPE));
submit_class!(ClassInfo::interface("demo.Greeter"));
submit_class!(ClassInfo::class("demo.HelloService")
    .implements("demo.Greeter")
    .annotated(PREMIUM)
    .annotated(SERVICE)
    .constructor(|| Arc::new(HelloService::new("scanned"))));
submit_class!(ClassInfo::class("demo.Hello").constructor(|| Arc::new(Hello)));
submit_class!(ClassInfo::class("demo.HelloFactoryBean")
    .implements(FACTORY_BEAN_CLASS_NAME)
    .method(MethodInfo::new(
        OBJECT_TYPE_METHOD_NAME,
        GenericType::parameterized("Class", vec![GenericType::class("demo.Hello")]),
    )));
submit_class!(ClassInfo::class("demo.Worker"));
submit_class!(ClassInfo::class("demo.AuditLog")
    .annotated(named("auditLog"))
    .constructor(|| Arc::new(AuditLog)));

// ==================== 业务类型 ====================

#[derive(Debug)]
struct HelloService {
    origin: &'static str,
}

impl HelloService {
    fn new(origin: &'static str) -> Self {
        Self { origin }
    }

    fn greet(&self, name: &str) -> String {
        format!("Hello, {}! (from {} HelloService)", name, self.origin)
    }
}

#[derive(Debug)]
struct Hello;

struct HelloFactoryBean;

impl FactoryBean for HelloFactoryBean {
    fn get_object(&self) -> anyhow::Result<Option<Object>> {
        Ok(Some(Arc::new(Hello)))
    }

    fn object_type(&self) -> Option<&str> {
        Some("demo.Hello")
    }
}

#[derive(Debug)]
struct Worker {
    id: usize,
}

#[derive(Debug)]
struct AuditLog;

// ==================== 启动 ====================

fn start_host() -> anyhow::Result<Arc<ApplicationContext>> {
    let context = ApplicationContext::new("root");

    context.register_singleton("greeter", "demo.HelloService", || Ok(HelloService::new("host")))?;
    context.register_factory_bean("helloFactory", "demo.HelloFactoryBean", HelloFactoryBean)?;

    let next_id = Arc::new(AtomicUsize::new(1));
    context.register(
        BeanDefinition::new("worker", move || {
            let id = next_id.fetch_add(1, Ordering::SeqCst);
            Ok(Some(Arc::new(Worker { id }) as Object))
        })
        .with_class_name("demo.Worker")
        .with_scope(Scope::Prototype)
        .with_destroy(|instance| {
            if let Some(worker) = instance.downcast_ref::<Worker>() {
                tracing::info!("Worker #{} destroyed by host", worker.id);
            }
            Ok(())
        }),
    )?;
    context.register(BeanDefinition::new("legacy", || Ok(None)).with_class_name("demo.legacy.Missing"))?;

    context.refresh()?;
    Ok(context)
}

fn main() -> anyhow::Result<()> {
    let settings = Settings::load();
    if let Err(e) = settings.logging.to_config().init() {
        eprintln!("{}", e);
    }

    let host = start_host()?;

    let container = Bootstrap::new(BeanManager::default())
        .with_discovered_extensions()
        .add_classes(["demo.HelloService", "demo.AuditLog"])
        .boot()?;

    println!("Consumer beans:");
    for bean in container.beans() {
        println!("  - {:?}", bean);
    }

    let greeter = container.get("demo.Greeter")?;
    if let Some(service) = greeter.downcast::<HelloService>() {
        println!("{}", service.greet("bridge"));
    }

    let hello = container.get("demo.Hello")?;
    println!("Hello product: {:?}", hello.downcast::<Hello>());

    let mut worker = container.get("demo.Worker")?;
    println!("Worker: {:?}", worker.downcast::<Worker>());
    worker.destroy()?;

    let audit = container.select("demo.AuditLog", &[named("auditLog")])?;
    println!("Consumer-managed bean: {:?}", audit.downcast::<AuditLog>());

    host.close()?;
    Ok(())
}
