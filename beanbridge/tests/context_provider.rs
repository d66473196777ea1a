//! 进程级上下文引用和 Web 根上下文都是全局状态，放在单独的测试二进制中顺序执行

use std::sync::Arc;

use beanbridge::ApplicationContextProvider;
use beanbridge_consumer::{BeanManager, Bootstrap, Container};
use beanbridge_host::{ApplicationContext, ContextLoader};
use beanbridge_reflect::{submit_class, ClassInfo};

struct HelloService;

submit_class!(ClassInfo::class("provider_test.HelloService").constructor(|| Arc::new(HelloService)));

fn boot() -> Container {
    Bootstrap::new(BeanManager::default())
        .with_discovered_extensions()
        .add_class("provider_test.HelloService")
        .boot()
        .unwrap()
}

fn bean_names(container: &Container) -> Vec<String> {
    container
        .beans()
        .iter()
        .filter_map(|b| b.name().map(String::from))
        .collect()
}

#[test]
fn test_host_context_discovery() {
    // 还没有宿主容器：扫描到的类型保留，不发布任何 Bean
    assert!(ApplicationContextProvider::get().is_none());
    let container = boot();
    assert_eq!(container.beans().len(), 1);
    assert!(bean_names(&container).is_empty());

    // 宿主启动时通过 ApplicationContextAware 回调记录上下文
    let root = ApplicationContext::new("root");
    root.register_singleton("greeter", "provider_test.HelloService", || Ok(HelloService))
        .unwrap();
    root.refresh().unwrap();

    let stored = ApplicationContextProvider::get().unwrap();
    assert!(Arc::ptr_eq(&stored, &root));

    // 只写入一次
    ApplicationContextProvider::set(ApplicationContext::new("other"));
    assert!(Arc::ptr_eq(&ApplicationContextProvider::get().unwrap(), &root));

    let container = boot();
    assert_eq!(bean_names(&container), vec!["greeter".to_string()]);
    let handle = container.get("provider_test.HelloService").unwrap();
    assert!(Arc::ptr_eq(
        handle.get().unwrap(),
        &root.get_bean("greeter").unwrap().unwrap()
    ));

    // Web 根上下文优先
    let web = ApplicationContext::new("web");
    web.register_singleton("webGreeter", "provider_test.HelloService", || Ok(HelloService))
        .unwrap();
    ContextLoader::init_web_application_context(web).unwrap();

    let container = boot();
    assert_eq!(bean_names(&container), vec!["webGreeter".to_string()]);

    ContextLoader::close_web_application_context().unwrap();
    let container = boot();
    assert_eq!(bean_names(&container), vec!["greeter".to_string()]);
}
