use std::sync::Arc;

use anyhow::{Context, Result};
use beanbridge_reflect::{Annotation, Object};

use crate::annotations;
use crate::bean::{Bean, CreationalContext};
use crate::error::ResolutionError;
use crate::manager::BeanManager;

/// 启动完成后的容器 - 按类型和限定符解析 Bean
pub struct Container {
    manager: Arc<BeanManager>,
    beans: Vec<Arc<dyn Bean>>,
}

impl Container {
    pub(crate) fn new(manager: Arc<BeanManager>, beans: Vec<Arc<dyn Bean>>) -> Self {
        Self { manager, beans }
    }

    /// 所有已注册的 Bean（扫描到的在前，扩展追加的在后）
    pub fn beans(&self) -> &[Arc<dyn Bean>] {
        &self.beans
    }

    pub fn bean_manager(&self) -> &Arc<BeanManager> {
        &self.manager
    }

    /// 查找可以注入到给定类型和限定符的所有 Bean
    ///
    /// 未给出限定符时按 `@Default` 查找。
    pub fn resolve(&self, type_name: &str, qualifiers: &[Annotation]) -> Vec<Arc<dyn Bean>> {
        let default_qualifiers;
        let required = if qualifiers.is_empty() {
            default_qualifiers = [annotations::default_qualifier()];
            &default_qualifiers[..]
        } else {
            qualifiers
        };

        self.beans
            .iter()
            .filter(|bean| bean.matches(type_name, required))
            .cloned()
            .collect()
    }

    /// 查找唯一可注入的 Bean
    pub fn resolve_unique(
        &self,
        type_name: &str,
        qualifiers: &[Annotation],
    ) -> Result<Arc<dyn Bean>, ResolutionError> {
        let mut candidates = self.resolve(type_name, qualifiers);
        match candidates.len() {
            0 => Err(ResolutionError::Unsatisfied {
                type_name: type_name.to_string(),
                qualifiers: format_qualifiers(qualifiers),
            }),
            1 => Ok(candidates.remove(0)),
            _ => Err(ResolutionError::Ambiguous {
                type_name: type_name.to_string(),
                candidates: candidates.iter().map(|b| b.describe()).collect(),
            }),
        }
    }

    /// 按类型获取实例（默认限定符）
    pub fn get(&self, type_name: &str) -> Result<BeanHandle> {
        self.select(type_name, &[])
    }

    /// 按类型和限定符获取实例
    pub fn select(&self, type_name: &str, qualifiers: &[Annotation]) -> Result<BeanHandle> {
        let bean = self.resolve_unique(type_name, qualifiers)?;
        BeanHandle::create(bean)
    }

    /// 按 Bean 名称查找
    pub fn get_bean_by_name(&self, name: &str) -> Option<Arc<dyn Bean>> {
        self.beans.iter().find(|b| b.name() == Some(name)).cloned()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("beans", &self.beans.len())
            .finish()
    }
}

fn format_qualifiers(qualifiers: &[Annotation]) -> String {
    if qualifiers.is_empty() {
        return annotations::default_qualifier().to_string();
    }
    qualifiers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// 一次创建得到的实例及其创建上下文
///
/// 调用 [`BeanHandle::destroy`] 把实例交还给 Bean 销毁。
pub struct BeanHandle {
    bean: Arc<dyn Bean>,
    instance: Option<Object>,
    context: CreationalContext,
    destroyed: bool,
}

impl BeanHandle {
    /// 通过 Bean 创建实例
    pub fn create(bean: Arc<dyn Bean>) -> Result<Self> {
        let mut context = CreationalContext::new();
        let instance = bean
            .create(&mut context)
            .with_context(|| format!("Failed to create bean {}", bean.describe()))?;

        if instance.is_none() && !bean.is_nullable() {
            return Err(ResolutionError::NullInstance(bean.describe()).into());
        }

        Ok(Self {
            bean,
            instance,
            context,
            destroyed: false,
        })
    }

    /// 实例；可空 Bean 可能没有实例
    pub fn get(&self) -> Option<&Object> {
        self.instance.as_ref()
    }

    /// 以具体类型访问实例
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.instance.as_ref().and_then(|i| i.downcast_ref::<T>())
    }

    pub fn bean(&self) -> &Arc<dyn Bean> {
        &self.bean
    }

    pub fn context(&self) -> &CreationalContext {
        &self.context
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// 销毁实例；空实例和重复销毁都直接返回
    pub fn destroy(&mut self) -> Result<()> {
        if self.destroyed {
            return Ok(());
        }
        self.destroyed = true;
        match self.instance.take() {
            Some(instance) => self.bean.destroy(&instance, &mut self.context),
            None => {
                self.context.release();
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for BeanHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanHandle")
            .field("bean", &self.bean.describe())
            .field("has_instance", &self.instance.is_some())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{named, DEPENDENT_SCOPE};
    use crate::bean::InjectionPoint;
    use beanbridge_reflect::{AnnotationKind, Class, ClassInfo, OBJECT_CLASS_NAME};
    use std::collections::BTreeSet;

    #[derive(Debug)]
    struct FixedBean {
        name: Option<String>,
        class: Class,
        types: BTreeSet<Class>,
        qualifiers: BTreeSet<Annotation>,
        stereotypes: BTreeSet<AnnotationKind>,
        nullable: bool,
        value: Option<u32>,
    }

    impl FixedBean {
        fn new(name: &str, value: Option<u32>) -> Self {
            let class = Class::new(ClassInfo::class("com.example.Counter"));
            let types = [class.clone(), Class::new(ClassInfo::class(OBJECT_CLASS_NAME))]
                .into_iter()
                .collect();
            let qualifiers = [annotations::any(), annotations::default_qualifier(), named(name)]
                .into_iter()
                .collect();
            Self {
                name: Some(name.to_string()),
                class,
                types,
                qualifiers,
                stereotypes: BTreeSet::new(),
                nullable: false,
                value,
            }
        }
    }

    impl Bean for FixedBean {
        fn name(&self) -> Option<&str> {
            self.name.as_deref()
        }
        fn bean_class(&self) -> &Class {
            &self.class
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
            self.nullable
        }
        fn injection_points(&self) -> &[InjectionPoint] {
            &[]
        }
        fn is_alternative(&self) -> bool {
            false
        }
        fn create(&self, context: &mut CreationalContext) -> Result<Option<Object>> {
            context.push(Arc::new("dependent"));
            Ok(self.value.map(|v| Arc::new(v) as Object))
        }
        fn destroy(&self, _instance: &Object, context: &mut CreationalContext) -> Result<()> {
            context.release();
            Ok(())
        }
    }

    fn container(beans: Vec<Arc<dyn Bean>>) -> Container {
        Container::new(Arc::new(BeanManager::new(Arc::new(beanbridge_reflect::ClassRegistry::new()))), beans)
    }

    #[test]
    fn test_resolution_errors() {
        let empty = container(Vec::new());
        let err = empty.resolve_unique("com.example.Counter", &[]).unwrap_err();
        assert!(matches!(err, ResolutionError::Unsatisfied { .. }));

        let two = container(vec![
            Arc::new(FixedBean::new("a", Some(1))),
            Arc::new(FixedBean::new("b", Some(2))),
        ]);
        let err = two.resolve_unique("com.example.Counter", &[]).unwrap_err();
        assert!(matches!(err, ResolutionError::Ambiguous { ref candidates, .. } if candidates.len() == 2));

        let bean = two.resolve_unique("com.example.Counter", &[named("b")]).unwrap();
        assert_eq!(bean.name(), Some("b"));
        assert!(two.get_bean_by_name("a").is_some());
    }

    #[test]
    fn test_handle_lifecycle() {
        let c = container(vec![Arc::new(FixedBean::new("a", Some(7)))]);
        let mut handle = c.get("Object").unwrap();
        assert_eq!(handle.downcast::<u32>(), Some(&7));
        assert_eq!(handle.context().dependent_count(), 1);

        handle.destroy().unwrap();
        assert!(handle.is_destroyed());
        assert!(handle.context().is_released());
        assert!(handle.get().is_none());
    }

    #[test]
    fn test_null_instance_requires_nullable() {
        let c = container(vec![Arc::new(FixedBean::new("a", None))]);
        let err = c.get("com.example.Counter").unwrap_err();
        assert!(err.downcast_ref::<ResolutionError>().is_some());

        let mut nullable = FixedBean::new("b", None);
        nullable.nullable = true;
        let c = container(vec![Arc::new(nullable)]);
        let handle = c.get("com.example.Counter").unwrap();
        assert!(handle.get().is_none());
    }
}
