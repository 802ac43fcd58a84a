//! Declaration identity for diagnostics and cycle tracking.

use std::fmt;

use inject_common::Span;

use crate::ty::AstType;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Class,
    Method,
    Constructor,
    Function,
    Param,
    Type,
}

/// A handle on one declaration in the front end's model.
///
/// Identity is `(kind, path)`: the same declaration produced twice by a front
/// end compares equal. `trace` is the text shown in resolution traces and
/// `span` points at the declaration in source, when the front end knows it.
/// Neither takes part in equality.
#[derive(Clone, Debug)]
pub struct Element {
    pub kind: ElementKind,
    pub path: String,
    pub trace: String,
    pub span: Option<Span>,
}

impl Element {
    pub fn new(kind: ElementKind, path: impl Into<String>, trace: impl Into<String>) -> Self {
        Element {
            kind,
            path: path.into(),
            trace: trace.into(),
            span: None,
        }
    }

    pub fn with_span(mut self, span: Option<Span>) -> Self {
        self.span = span;
        self
    }

    /// An element standing for a type with no declaration of its own, such
    /// as a function type requested from a component.
    pub fn of_type(ty: &AstType) -> Self {
        let text = ty.to_string();
        Element::new(ElementKind::Type, text.clone(), text)
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.path == other.path
    }
}

impl Eq for Element {}

impl std::hash::Hash for Element {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.path.hash(state);
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.trace)
    }
}
