use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use beanbridge_reflect::{Annotation, AnnotationKind, Class, ClassLoader, ClassNotFound, ClassRegistry};
use parking_lot::RwLock;

use crate::annotations::{self, QUALIFIER, STEREOTYPE};

/// 带注解视图的类型
#[derive(Debug, Clone)]
pub struct AnnotatedType {
    java_class: Class,
    type_closure: BTreeSet<Class>,
    annotations: Vec<Annotation>,
}

impl AnnotatedType {
    pub fn java_class(&self) -> &Class {
        &self.java_class
    }

    pub fn type_closure(&self) -> &BTreeSet<Class> {
        &self.type_closure
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn is_annotation_present(&self, kind: &AnnotationKind) -> bool {
        self.annotations.iter().any(|a| a.annotation_type() == kind)
    }

    pub fn annotation(&self, kind: &AnnotationKind) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.annotation_type() == kind)
    }
}

/// BeanManager - 启动期间提供给扩展的内省工具
pub struct BeanManager {
    class_loader: Arc<dyn ClassLoader>,
    qualifiers: RwLock<HashSet<AnnotationKind>>,
    stereotypes: RwLock<HashSet<AnnotationKind>>,
}

impl BeanManager {
    pub fn new(class_loader: Arc<dyn ClassLoader>) -> Self {
        Self {
            class_loader,
            qualifiers: RwLock::new(HashSet::new()),
            stereotypes: RwLock::new(HashSet::new()),
        }
    }

    pub fn class_loader(&self) -> &Arc<dyn ClassLoader> {
        &self.class_loader
    }

    /// 声明自定义限定符
    pub fn register_qualifier(&self, kind: AnnotationKind) {
        tracing::debug!("Registered qualifier {}", kind);
        self.qualifiers.write().insert(kind);
    }

    /// 声明自定义构造型
    pub fn register_stereotype(&self, kind: AnnotationKind) {
        tracing::debug!("Registered stereotype {}", kind);
        self.stereotypes.write().insert(kind);
    }

    /// 构建类型的注解视图，包括完整的类型闭包
    pub fn create_annotated_type(&self, class: &Class) -> Result<AnnotatedType, ClassNotFound> {
        let type_closure = self.class_loader.type_closure(class)?;
        Ok(AnnotatedType {
            java_class: class.clone(),
            type_closure,
            annotations: class.annotations().to_vec(),
        })
    }

    pub fn is_qualifier(&self, kind: &AnnotationKind) -> bool {
        annotations::is_builtin_qualifier(kind)
            || self.qualifiers.read().contains(kind)
            || self.has_meta_annotation(kind, &QUALIFIER)
    }

    pub fn is_stereotype(&self, kind: &AnnotationKind) -> bool {
        self.stereotypes.read().contains(kind) || self.has_meta_annotation(kind, &STEREOTYPE)
    }

    /// 注解类型自身是否带有某个元注解
    fn has_meta_annotation(&self, kind: &AnnotationKind, meta: &AnnotationKind) -> bool {
        self.class_loader
            .load_class(kind.name())
            .map(|class| class.is_annotation() && class.is_annotation_present(meta))
            .unwrap_or(false)
    }
}

impl Default for BeanManager {
    fn default() -> Self {
        Self::new(ClassRegistry::global())
    }
}

impl std::fmt::Debug for BeanManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanManager")
            .field("qualifiers", &self.qualifiers.read().len())
            .field("stereotypes", &self.stereotypes.read().len())
            .finish()
    }
}
