use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// 注解类型 - 通过名称标识
///
/// 限定符只需要比较类型即可，而 [`Annotation`] 还携带成员值。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationKind(Cow<'static, str>);

impl AnnotationKind {
    /// 常量注解类型
    pub const fn new(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// 运行时构造的注解类型
    pub fn named(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// 注解实例 - 注解类型加上成员值
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Annotation {
    kind: AnnotationKind,
    members: BTreeMap<String, String>,
}

impl Annotation {
    /// 无成员的标记注解
    pub fn marker(kind: AnnotationKind) -> Self {
        Self {
            kind,
            members: BTreeMap::new(),
        }
    }

    /// 设置成员值
    pub fn with_member(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.members.insert(name.into(), value.into());
        self
    }

    pub fn annotation_type(&self) -> &AnnotationKind {
        &self.kind
    }

    pub fn member(&self, name: &str) -> Option<&str> {
        self.members.get(name).map(String::as_str)
    }
}

impl From<AnnotationKind> for Annotation {
    fn from(kind: AnnotationKind) -> Self {
        Annotation::marker(kind)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.members.is_empty() {
            let members: Vec<String> = self
                .members
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            write!(f, "({})", members.join(", "))?;
        }
        Ok(())
    }
}
