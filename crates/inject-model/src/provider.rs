//! The contract between a front end and the compiler core.

use std::cell::RefCell;
use std::fmt;

use serde::Serialize;

use crate::ast::{ClassRef, MethodRef};
use crate::element::Element;
use crate::ty::{AstType, KnownType};

/// Factory for type-model objects, implemented once per front end.
///
/// Implementations must hand out objects whose identity (their
/// [`Element`]) is stable: asking for the same declaration twice yields
/// values that compare equal.
pub trait TypeModel {
    /// The class declaring `ty`, if `ty` names a class the front end knows.
    fn class_of(&self, ty: &AstType) -> Option<ClassRef>;

    /// Top-level functions named `name` in `package`.
    fn find_functions(&self, package: &str, name: &str) -> Vec<MethodRef>;

    /// Classes carrying the annotation `annotation`, in declaration order.
    fn classes_annotated_with(&self, annotation: &str) -> Vec<ClassRef>;

    /// A declared type for a well-known generic class.
    fn declared_type_of(&self, known: KnownType, arguments: Vec<AstType>) -> AstType {
        AstType::known(known, arguments)
    }

    /// Whether a value of type `from` can be used where `to` is expected.
    fn is_assignable(&self, to: &AstType, from: &AstType) -> bool {
        to == from
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One message for the host toolchain, attached to the most specific
/// element available.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Stable diagnostic code such as `E0002`.
    pub code: Option<&'static str>,
    pub message: String,
    /// Extra lines shown under the message, e.g. a resolution trace.
    pub notes: Vec<String>,
    pub element: Option<Element>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, element: Option<Element>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            code: None,
            message: message.into(),
            notes: Vec::new(),
            element,
        }
    }

    pub fn warning(message: impl Into<String>, element: Option<Element>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            code: None,
            message: message.into(),
            notes: Vec::new(),
            element,
        }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_notes(mut self, notes: Vec<String>) -> Self {
        self.notes = notes;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Diagnostics sink.
pub trait Messenger {
    fn report(&self, diagnostic: Diagnostic);

    fn warn(&self, message: &str, element: Option<&Element>) {
        self.report(Diagnostic::warning(message, element.cloned()));
    }

    fn error(&self, message: &str, element: Option<&Element>) {
        self.report(Diagnostic::error(message, element.cloned()));
    }
}

/// A messenger that keeps everything it is given, in order.
#[derive(Debug, Default)]
pub struct CollectingMessenger {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl CollectingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.borrow().iter().any(Diagnostic::is_error)
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Drain the collected diagnostics.
    pub fn take(&self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }
}

impl Messenger for CollectingMessenger {
    fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }
}
