//! Serializable declarations read by the in-memory front end.
//!
//! A model file is a JSON document listing annotation classes, classes and
//! top-level functions. Types may be written as a qualified-name string
//! (`"com.example.Foo"`) or as a full object with arguments and aliases.
//! The builder methods exist so tests can assemble models in code.

use inject_common::Span;
use serde::{Deserialize, Serialize};

use crate::ty::AstType;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelFile {
    /// Path of the source file spans point into, relative to the model file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub annotations: Vec<AnnotationDecl>,
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
    #[serde(default)]
    pub functions: Vec<FunctionDecl>,
}

/// An annotation class and the annotations declared on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationDecl {
    pub name: String,
    #[serde(default)]
    pub meta: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDecl {
    #[serde(default)]
    pub package: String,
    pub name: String,
    #[serde(default)]
    pub interface: bool,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub companion: bool,
    /// Names of the class's type parameters, referenced from member types
    /// as bare names (`"T"`).
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub annotations: Vec<String>,
    #[serde(default)]
    pub super_types: Vec<AstType>,
    #[serde(default)]
    pub constructor: Option<ConstructorDecl>,
    #[serde(default)]
    pub members: Vec<MemberDecl>,
    #[serde(default)]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConstructorDecl {
    #[serde(default)]
    pub annotations: Vec<String>,
    #[serde(default)]
    pub params: Vec<ParamDecl>,
    #[serde(default)]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: AstType,
    #[serde(default)]
    pub annotations: Vec<String>,
    #[serde(default, rename = "val")]
    pub is_val: bool,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    #[default]
    Fun,
    Val,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDecl {
    pub name: String,
    #[serde(default)]
    pub kind: MemberKind,
    #[serde(default)]
    pub params: Vec<ParamDecl>,
    #[serde(default)]
    pub receiver: Option<AstType>,
    pub returns: AstType,
    #[serde(default)]
    pub annotations: Vec<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub suspend: bool,
    #[serde(default)]
    pub span: Option<Span>,
}

/// A top-level function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDecl {
    #[serde(default)]
    pub package: String,
    pub name: String,
    #[serde(default)]
    pub params: Vec<ParamDecl>,
    pub returns: AstType,
    #[serde(default)]
    pub annotations: Vec<String>,
    #[serde(default)]
    pub span: Option<Span>,
}

// ── Builders ───────────────────────────────────────────────────────────

impl ModelFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an annotation class `name` carrying the annotations `meta`.
    pub fn annotation(mut self, name: &str, meta: &[&str]) -> Self {
        self.annotations.push(AnnotationDecl {
            name: name.to_string(),
            meta: meta.iter().map(|m| m.to_string()).collect(),
        });
        self
    }

    pub fn class(mut self, class: ClassDecl) -> Self {
        self.classes.push(class);
        self
    }

    pub fn function(mut self, function: FunctionDecl) -> Self {
        self.functions.push(function);
        self
    }
}

impl ClassDecl {
    pub fn new(package: &str, name: &str) -> Self {
        ClassDecl {
            package: package.to_string(),
            name: name.to_string(),
            ..ClassDecl::default()
        }
    }

    pub fn interface(mut self) -> Self {
        self.interface = true;
        self.is_abstract = true;
        self
    }

    pub fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }

    pub fn with_companion(mut self) -> Self {
        self.companion = true;
        self
    }

    pub fn annotated(mut self, annotation: &str) -> Self {
        self.annotations.push(annotation.to_string());
        self
    }

    pub fn type_parameter(mut self, name: &str) -> Self {
        self.type_parameters.push(name.to_string());
        self
    }

    pub fn extends(mut self, ty: impl Into<AstType>) -> Self {
        self.super_types.push(ty.into());
        self
    }

    pub fn constructor(mut self, constructor: ConstructorDecl) -> Self {
        self.constructor = Some(constructor);
        self
    }

    pub fn member(mut self, member: MemberDecl) -> Self {
        self.members.push(member);
        self
    }

    pub fn span(mut self, start: u32, end: u32) -> Self {
        self.span = Some(Span::new(start, end));
        self
    }
}

impl ConstructorDecl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn annotated(mut self, annotation: &str) -> Self {
        self.annotations.push(annotation.to_string());
        self
    }

    pub fn param(mut self, param: ParamDecl) -> Self {
        self.params.push(param);
        self
    }
}

impl ParamDecl {
    pub fn new(name: &str, ty: impl Into<AstType>) -> Self {
        ParamDecl {
            name: name.to_string(),
            ty: ty.into(),
            annotations: Vec::new(),
            is_val: false,
            private: false,
            default: false,
            span: None,
        }
    }

    pub fn annotated(mut self, annotation: &str) -> Self {
        self.annotations.push(annotation.to_string());
        self
    }

    pub fn val(mut self) -> Self {
        self.is_val = true;
        self
    }

    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }

    pub fn with_default(mut self) -> Self {
        self.default = true;
        self
    }
}

impl MemberDecl {
    pub fn fun(name: &str, returns: impl Into<AstType>) -> Self {
        MemberDecl {
            name: name.to_string(),
            kind: MemberKind::Fun,
            params: Vec::new(),
            receiver: None,
            returns: returns.into(),
            annotations: Vec::new(),
            is_abstract: false,
            private: false,
            suspend: false,
            span: None,
        }
    }

    pub fn val(name: &str, returns: impl Into<AstType>) -> Self {
        MemberDecl {
            kind: MemberKind::Val,
            ..MemberDecl::fun(name, returns)
        }
    }

    pub fn param(mut self, param: ParamDecl) -> Self {
        self.params.push(param);
        self
    }

    pub fn receiver(mut self, ty: impl Into<AstType>) -> Self {
        self.receiver = Some(ty.into());
        self
    }

    pub fn annotated(mut self, annotation: &str) -> Self {
        self.annotations.push(annotation.to_string());
        self
    }

    pub fn abstract_member(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }

    pub fn suspend(mut self) -> Self {
        self.suspend = true;
        self
    }

    pub fn span(mut self, start: u32, end: u32) -> Self {
        self.span = Some(Span::new(start, end));
        self
    }
}

impl FunctionDecl {
    pub fn new(package: &str, name: &str, returns: impl Into<AstType>) -> Self {
        FunctionDecl {
            package: package.to_string(),
            name: name.to_string(),
            params: Vec::new(),
            returns: returns.into(),
            annotations: Vec::new(),
            span: None,
        }
    }

    pub fn param(mut self, param: ParamDecl) -> Self {
        self.params.push(param);
        self
    }

    pub fn annotated(mut self, annotation: &str) -> Self {
        self.annotations.push(annotation.to_string());
        self
    }
}
