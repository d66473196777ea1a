use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::annotation::{Annotation, AnnotationKind};
use crate::error::ReflectError;
use crate::generic::GenericType;

/// 根类名称，所有类型闭包都包含它
pub const OBJECT_CLASS_NAME: &str = "Object";

/// 容器管理的对象引用
pub type Object = Arc<dyn Any + Send + Sync>;

/// 无参构造函数
pub type Constructor = fn() -> Object;

/// 类的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
    Annotation,
}

/// 声明的方法 - 名称加上泛型返回类型签名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInfo {
    name: String,
    return_type_signature: String,
}

impl MethodInfo {
    pub fn new(name: impl Into<String>, return_type: GenericType) -> Self {
        Self {
            name: name.into(),
            return_type_signature: return_type.to_string(),
        }
    }

    /// 以原始签名字符串声明，解析延迟到 [`MethodInfo::generic_return_type`]
    pub fn with_signature(name: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type_signature: signature.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn return_type_signature(&self) -> &str {
        &self.return_type_signature
    }

    /// 解析泛型返回类型
    pub fn generic_return_type(&self) -> Result<GenericType, ReflectError> {
        self.return_type_signature.parse()
    }
}

/// 类元数据
#[derive(Clone)]
pub struct ClassInfo {
    name: String,
    kind: ClassKind,
    superclass: Option<String>,
    interfaces: Vec<String>,
    annotations: Vec<Annotation>,
    methods: Vec<MethodInfo>,
    constructor: Option<Constructor>,
}

impl ClassInfo {
    fn with_kind(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            superclass: None,
            interfaces: Vec::new(),
            annotations: Vec::new(),
            methods: Vec::new(),
            constructor: None,
        }
    }

    /// 普通类
    pub fn class(name: impl Into<String>) -> Self {
        Self::with_kind(name, ClassKind::Class)
    }

    /// 接口
    pub fn interface(name: impl Into<String>) -> Self {
        Self::with_kind(name, ClassKind::Interface)
    }

    /// 注解类型
    pub fn annotation_type(kind: &AnnotationKind) -> Self {
        Self::with_kind(kind.name(), ClassKind::Annotation)
    }

    /// 设置父类
    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// 添加直接声明的接口（接口类型上表示父接口）
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// 添加注解
    pub fn annotated(mut self, annotation: impl Into<Annotation>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    /// 添加声明的方法
    pub fn method(mut self, method: MethodInfo) -> Self {
        self.methods.push(method);
        self
    }

    /// 设置无参构造函数
    pub fn constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for ClassInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassInfo")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("superclass", &self.superclass)
            .field("interfaces", &self.interfaces)
            .field("annotations", &self.annotations)
            .field("methods", &self.methods)
            .field("instantiable", &self.constructor.is_some())
            .finish()
    }
}

/// 已加载的类
///
/// 克隆代价很低；相等、哈希和排序都只看类名。
#[derive(Clone)]
pub struct Class(Arc<ClassInfo>);

impl Class {
    pub fn new(info: ClassInfo) -> Self {
        Class(Arc::new(info))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// 不含包名的简单类名
    pub fn simple_name(&self) -> &str {
        self.name().rsplit(|c| c == '.' || c == ':').next().unwrap_or(self.name())
    }

    pub fn kind(&self) -> ClassKind {
        self.0.kind
    }

    pub fn is_interface(&self) -> bool {
        self.0.kind == ClassKind::Interface
    }

    pub fn is_annotation(&self) -> bool {
        self.0.kind == ClassKind::Annotation
    }

    /// 直接父类名称；根类返回 None
    pub fn superclass(&self) -> Option<&str> {
        if self.name() == OBJECT_CLASS_NAME {
            return None;
        }
        match (&self.0.superclass, self.0.kind) {
            (Some(name), _) => Some(name.as_str()),
            (None, ClassKind::Interface) => None,
            (None, _) => Some(OBJECT_CLASS_NAME),
        }
    }

    /// 直接声明的接口，不含从父类继承的接口
    pub fn interfaces(&self) -> &[String] {
        &self.0.interfaces
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.0.annotations
    }

    pub fn is_annotation_present(&self, kind: &AnnotationKind) -> bool {
        self.0
            .annotations
            .iter()
            .any(|a| a.annotation_type() == kind)
    }

    /// 按名称查找本类声明的方法，不查找父类
    pub fn declared_method(&self, name: &str) -> Option<&MethodInfo> {
        self.0.methods.iter().find(|m| m.name() == name)
    }

    /// 调用无参构造函数
    pub fn new_instance(&self) -> Option<Object> {
        self.0.constructor.map(|ctor| ctor())
    }

    pub fn info(&self) -> &ClassInfo {
        &self.0
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for Class {}

impl Hash for Class {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl PartialOrd for Class {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Class {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name().cmp(other.name())
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class({})", self.name())
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind() {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Annotation => "@interface",
        };
        write!(f, "{} {}", prefix, self.name())
    }
}
