//! The unit of lookup in the binding catalog.

use std::fmt;

use inject_model::{AstAnnotation, AstType};

/// A type together with an optional qualifier.
///
/// Two keys are equal when both their types are structurally equal and
/// their qualifiers are equal (or both absent).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeKey {
    pub ty: AstType,
    pub qualifier: Option<AstAnnotation>,
}

impl TypeKey {
    pub fn new(ty: AstType, qualifier: Option<AstAnnotation>) -> Self {
        TypeKey { ty, qualifier }
    }

    pub fn unqualified(ty: AstType) -> Self {
        TypeKey { ty, qualifier: None }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{} {}", qualifier, self.ty),
            None => write!(f, "{}", self.ty),
        }
    }
}
