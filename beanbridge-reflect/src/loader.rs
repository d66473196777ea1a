//! 类加载器
//!
//! [`ClassRegistry`] 是默认实现；全局注册表在首次访问时从
//! `submit_class!` 收集的元数据构建。

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::class::{Class, ClassInfo, OBJECT_CLASS_NAME};
use crate::error::ClassNotFound;

/// 类加载器 trait
pub trait ClassLoader: Send + Sync {
    /// 按全限定名加载类
    fn load_class(&self, name: &str) -> Result<Class, ClassNotFound>;

    /// 类型闭包：类本身、所有父类和所有接口（传递），以及根类
    fn type_closure(&self, class: &Class) -> Result<BTreeSet<Class>, ClassNotFound> {
        let mut closure = BTreeSet::new();
        let mut pending = VecDeque::from([class.clone()]);

        while let Some(current) = pending.pop_front() {
            if !closure.insert(current.clone()) {
                continue;
            }
            if let Some(superclass) = current.superclass() {
                pending.push_back(self.load_class(superclass)?);
            }
            for interface in current.interfaces() {
                pending.push_back(self.load_class(interface)?);
            }
        }

        if !closure.iter().any(|c| c.name() == OBJECT_CLASS_NAME) {
            closure.insert(self.load_class(OBJECT_CLASS_NAME)?);
        }

        Ok(closure)
    }

    /// `source` 的实例能否赋值给 `target`
    ///
    /// 闭包中存在无法加载的类型时视为不可赋值。
    fn is_assignable(&self, target: &Class, source: &Class) -> bool {
        if target == source {
            return true;
        }
        self.type_closure(source)
            .map(|closure| closure.contains(target))
            .unwrap_or(false)
    }
}

/// 全局类提交项 - 用于 inventory 收集
pub struct ClassSubmission {
    pub info: fn() -> ClassInfo,
}

impl ClassSubmission {
    pub const fn new(info: fn() -> ClassInfo) -> Self {
        Self { info }
    }
}

inventory::collect!(ClassSubmission);

/// 基于名称映射的类注册表
pub struct ClassRegistry {
    classes: RwLock<HashMap<String, Class>>,
}

impl ClassRegistry {
    /// 创建只包含根类的注册表
    pub fn new() -> Self {
        let mut classes = HashMap::new();
        classes.insert(
            OBJECT_CLASS_NAME.to_string(),
            Class::new(ClassInfo::class(OBJECT_CLASS_NAME)),
        );
        Self {
            classes: RwLock::new(classes),
        }
    }

    /// 进程级注册表，包含所有通过 `submit_class!` 提交的类
    pub fn global() -> Arc<ClassRegistry> {
        static GLOBAL: OnceLock<Arc<ClassRegistry>> = OnceLock::new();

        GLOBAL
            .get_or_init(|| {
                let registry = ClassRegistry::new();
                for submission in inventory::iter::<ClassSubmission> {
                    registry.register((submission.info)());
                }
                tracing::debug!("Global class registry initialized with {} class(es)", registry.len());
                Arc::new(registry)
            })
            .clone()
    }

    /// 注册类；同名类会被替换
    pub fn register(&self, info: ClassInfo) -> Class {
        let class = Class::new(info);
        let mut classes = self.classes.write();
        if classes.insert(class.name().to_string(), class.clone()).is_some() {
            tracing::warn!("Class '{}' registered twice, replacing previous definition", class.name());
        } else {
            tracing::trace!("Registered class '{}'", class.name());
        }
        class
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.classes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.read().is_empty()
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassLoader for ClassRegistry {
    fn load_class(&self, name: &str) -> Result<Class, ClassNotFound> {
        self.classes
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| ClassNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ClassRegistry {
        let registry = ClassRegistry::new();
        registry.register(ClassInfo::interface("com.example.Greeter"));
        registry.register(ClassInfo::interface("com.example.Polite").implements("com.example.Greeter"));
        registry.register(ClassInfo::class("com.example.Base").implements("com.example.Polite"));
        registry.register(ClassInfo::class("com.example.HelloService").extends("com.example.Base"));
        registry.register(ClassInfo::class("com.example.Broken").implements("com.example.Missing"));
        registry
    }

    fn names(closure: &BTreeSet<Class>) -> Vec<&str> {
        closure.iter().map(|c| c.name()).collect()
    }

    #[test]
    fn test_type_closure_is_transitive() {
        let registry = registry();
        let class = registry.load_class("com.example.HelloService").unwrap();
        let closure = registry.type_closure(&class).unwrap();

        assert_eq!(
            names(&closure),
            vec![
                "Object",
                "com.example.Base",
                "com.example.Greeter",
                "com.example.HelloService",
                "com.example.Polite",
            ]
        );
    }

    #[test]
    fn test_interface_closure_contains_object() {
        let registry = registry();
        let class = registry.load_class("com.example.Greeter").unwrap();
        let closure = registry.type_closure(&class).unwrap();
        assert_eq!(names(&closure), vec!["Object", "com.example.Greeter"]);
    }

    #[test]
    fn test_missing_supertype() {
        let registry = registry();
        let class = registry.load_class("com.example.Broken").unwrap();
        assert_eq!(
            registry.type_closure(&class).unwrap_err(),
            ClassNotFound("com.example.Missing".to_string())
        );
        assert!(registry.load_class("com.missing.Ghost").is_err());
    }

    #[test]
    fn test_is_assignable() {
        let registry = registry();
        let service = registry.load_class("com.example.HelloService").unwrap();
        let greeter = registry.load_class("com.example.Greeter").unwrap();
        let broken = registry.load_class("com.example.Broken").unwrap();

        assert!(registry.is_assignable(&greeter, &service));
        assert!(!registry.is_assignable(&service, &greeter));
        assert!(!registry.is_assignable(&greeter, &broken));
        assert!(registry.is_assignable(&broken, &broken));
    }
}
