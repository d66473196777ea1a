use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use anyhow::anyhow;
use beanbridge_reflect::{Annotation, AnnotationKind, Class, Object};

use crate::annotations::{self, DEPENDENT, NAMED};
use crate::bean::{Bean, CreationalContext, InjectionPoint};
use crate::container::Container;
use crate::error::DeploymentError;
use crate::event::{AfterBeanDiscovery, ProcessAnnotatedType};
use crate::extension::{self, Extension};
use crate::manager::{AnnotatedType, BeanManager};

/// 启动器 - 在单个线程上依次驱动类型发现和 Bean 发现两个阶段
pub struct Bootstrap {
    manager: Arc<BeanManager>,
    extensions: Vec<Box<dyn Extension>>,
    classes: Vec<String>,
}

impl Bootstrap {
    pub fn new(manager: BeanManager) -> Self {
        Self {
            manager: Arc::new(manager),
            extensions: Vec::new(),
            classes: Vec::new(),
        }
    }

    /// 添加扩展
    pub fn add_extension(mut self, extension: impl Extension + 'static) -> Self {
        self.extensions.push(Box::new(extension));
        self
    }

    /// 添加所有通过 `submit_extension!` 登记的扩展
    pub fn with_discovered_extensions(mut self) -> Self {
        self.extensions.extend(extension::load_extensions());
        self
    }

    /// 添加一个由扫描器发现的类
    pub fn add_class(mut self, name: impl Into<String>) -> Self {
        self.classes.push(name.into());
        self
    }

    pub fn add_classes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn bean_manager(&self) -> &Arc<BeanManager> {
        &self.manager
    }

    /// 执行启动
    pub fn boot(mut self) -> Result<Container, DeploymentError> {
        self.extensions.sort_by_key(|e| e.priority());

        tracing::info!(
            "Bootstrapping container with {} extension(s) and {} scanned type(s)",
            self.extensions.len(),
            self.classes.len()
        );

        let mut beans: Vec<Arc<dyn Bean>> = Vec::new();

        // 1. 类型发现
        for name in &self.classes {
            let class = self.manager.class_loader().load_class(name)?;
            let annotated_type = self.manager.create_annotated_type(&class)?;

            let mut event = ProcessAnnotatedType::new(annotated_type);
            for extension in &self.extensions {
                extension.process_annotated_type(&mut event, &self.manager);
            }

            if event.is_vetoed() {
                tracing::debug!("Type {} vetoed during discovery", class.name());
                continue;
            }

            beans.push(Arc::new(ManagedBean::new(event.into_annotated_type(), &self.manager)));
        }

        // 2. Bean 发现结束
        let mut event = AfterBeanDiscovery::new();
        for extension in &self.extensions {
            extension.after_bean_discovery(&mut event, &self.manager);
        }
        beans.extend(event.into_beans());

        let mut names = HashSet::new();
        for bean in &beans {
            if let Some(name) = bean.name() {
                if !names.insert(name.to_string()) {
                    return Err(DeploymentError::DuplicateName(name.to_string()));
                }
            }
        }

        tracing::info!("Container started with {} bean(s)", beans.len());
        Ok(Container::new(self.manager, beans))
    }
}

/// 扫描到的类对应的 Bean，通过无参构造函数创建
#[derive(Debug)]
pub struct ManagedBean {
    name: Option<String>,
    bean_class: Class,
    types: BTreeSet<Class>,
    qualifiers: BTreeSet<Annotation>,
    stereotypes: BTreeSet<AnnotationKind>,
    scope: AnnotationKind,
}

impl ManagedBean {
    pub fn new(annotated_type: AnnotatedType, manager: &BeanManager) -> Self {
        let mut qualifiers = BTreeSet::new();
        let mut stereotypes = BTreeSet::new();

        for annotation in annotated_type.annotations() {
            let kind = annotation.annotation_type();
            if manager.is_qualifier(kind) {
                qualifiers.insert(annotation.clone());
            }
            if manager.is_stereotype(kind) {
                stereotypes.insert(kind.clone());
            }
        }

        // 只有 @Named / @Any 时仍然是默认 Bean
        if qualifiers
            .iter()
            .all(|q: &Annotation| *q.annotation_type() == NAMED || *q.annotation_type() == annotations::ANY)
        {
            qualifiers.insert(annotations::default_qualifier());
        }
        qualifiers.insert(annotations::any());

        let name = annotated_type
            .annotation(&NAMED)
            .and_then(|named| named.member("value"))
            .map(String::from);

        Self {
            name,
            bean_class: annotated_type.java_class().clone(),
            types: annotated_type.type_closure().clone(),
            qualifiers,
            stereotypes,
            scope: DEPENDENT,
        }
    }
}

impl Bean for ManagedBean {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
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
        &self.scope
    }

    fn stereotypes(&self) -> &BTreeSet<AnnotationKind> {
        &self.stereotypes
    }

    fn is_nullable(&self) -> bool {
        false
    }

    fn injection_points(&self) -> &[InjectionPoint] {
        &[]
    }

    fn is_alternative(&self) -> bool {
        false
    }

    fn create(&self, _context: &mut CreationalContext) -> anyhow::Result<Option<Object>> {
        self.bean_class
            .new_instance()
            .map(Some)
            .ok_or_else(|| anyhow!("Class {} has no no-arg constructor", self.bean_class.name()))
    }

    fn destroy(&self, _instance: &Object, context: &mut CreationalContext) -> anyhow::Result<()> {
        context.release();
        Ok(())
    }
}
