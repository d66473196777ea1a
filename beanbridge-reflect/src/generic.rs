//! 泛型类型签名
//!
//! 声明方法的泛型返回类型以字符串签名保存，例如 `Class<com.example.Hello>`，
//! 在需要时才解析为 [`GenericType`]。

use std::fmt;
use std::str::FromStr;

use crate::error::ReflectError;

/// 泛型类型
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenericType {
    /// 普通类引用
    Class(String),

    /// 参数化类型，例如 `Class<Hello>`
    Parameterized {
        raw: String,
        arguments: Vec<GenericType>,
    },

    /// 通配符，`?` 或 `? extends Bound`
    Wildcard { upper: Option<Box<GenericType>> },
}

impl GenericType {
    pub fn class(name: impl Into<String>) -> Self {
        GenericType::Class(name.into())
    }

    pub fn parameterized(raw: impl Into<String>, arguments: Vec<GenericType>) -> Self {
        GenericType::Parameterized {
            raw: raw.into(),
            arguments,
        }
    }

    /// 实际类型参数；非参数化类型返回 None
    pub fn actual_type_arguments(&self) -> Option<&[GenericType]> {
        match self {
            GenericType::Parameterized { arguments, .. } => Some(arguments),
            _ => None,
        }
    }

    /// 擦除后的类名
    ///
    /// 通配符取其上界；无界通配符没有可用的类名。
    pub fn raw_name(&self) -> Option<&str> {
        match self {
            GenericType::Class(name) => Some(name),
            GenericType::Parameterized { raw, .. } => Some(raw),
            GenericType::Wildcard { upper } => upper.as_ref().and_then(|t| t.raw_name()),
        }
    }
}

impl fmt::Display for GenericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenericType::Class(name) => write!(f, "{}", name),
            GenericType::Parameterized { raw, arguments } => {
                write!(f, "{}<", raw)?;
                for (i, arg) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ">")
            }
            GenericType::Wildcard { upper: None } => write!(f, "?"),
            GenericType::Wildcard { upper: Some(bound) } => write!(f, "? extends {}", bound),
        }
    }
}

impl FromStr for GenericType {
    type Err = ReflectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = SignatureParser { input: s, pos: 0 };
        let ty = parser.parse_type()?;
        parser.skip_whitespace();
        if parser.pos != s.len() {
            return Err(parser.error("unexpected trailing characters"));
        }
        Ok(ty)
    }
}

struct SignatureParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> SignatureParser<'a> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn error(&self, reason: &str) -> ReflectError {
        ReflectError::MalformedType {
            signature: self.input.to_string(),
            reason: format!("{} at offset {}", reason, self.pos),
        }
    }

    fn parse_identifier(&mut self) -> &'a str {
        let input = self.input;
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, '<' | '>' | ',' | '?') || c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
        &input[start..self.pos]
    }

    fn parse_type(&mut self) -> Result<GenericType, ReflectError> {
        self.skip_whitespace();

        if self.peek() == Some('?') {
            self.pos += 1;
            self.skip_whitespace();
            let checkpoint = self.pos;
            if self.parse_identifier() == "extends" {
                let bound = self.parse_type()?;
                return Ok(GenericType::Wildcard {
                    upper: Some(Box::new(bound)),
                });
            }
            self.pos = checkpoint;
            return Ok(GenericType::Wildcard { upper: None });
        }

        let raw = self.parse_identifier();
        if raw.is_empty() {
            return Err(self.error("expected a type name"));
        }

        self.skip_whitespace();
        if self.peek() != Some('<') {
            return Ok(GenericType::Class(raw.to_string()));
        }
        self.pos += 1;

        let mut arguments = Vec::new();
        loop {
            arguments.push(self.parse_type()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('>') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.error("expected ',' or '>'")),
            }
        }

        Ok(GenericType::Parameterized {
            raw: raw.to_string(),
            arguments,
        })
    }
}
