//! Type model for the inject compiler.
//!
//! Everything the resolver knows about the program being compiled comes
//! through the traits in this crate. A front end implements [`TypeModel`]
//! and the `Ast*` traits; [`memory`] is the front end used by the command
//! line driver and by tests.

pub mod annotations;
pub mod ast;
pub mod element;
pub mod memory;
pub mod provider;
pub mod ty;

pub use ast::{
    inheritance_chain, AstAnnotated, AstClass, AstConstructor, AstMethod, AstParam, ClassRef,
    ConstructorRef, MethodKind, MethodRef,
};
pub use element::{Element, ElementKind};
pub use memory::MemoryModel;
pub use provider::{CollectingMessenger, Diagnostic, Messenger, Severity, TypeModel};
pub use ty::{AstAnnotation, AstType, KnownType};
