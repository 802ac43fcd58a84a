//! Declaration views: classes, methods, constructors and parameters.
//!
//! Front ends implement [`AstClass`], [`AstMethod`] and [`AstConstructor`]
//! over their native models and hand them out as reference-counted trait
//! objects. The resolver only ever sees these traits.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashSet;

use crate::element::Element;
use crate::ty::{AstAnnotation, AstType};

pub type ClassRef = Rc<dyn AstClass>;
pub type MethodRef = Rc<dyn AstMethod>;
pub type ConstructorRef = Rc<dyn AstConstructor>;

/// Anything that can carry annotations.
pub trait AstAnnotated {
    fn annotations(&self) -> Vec<AstAnnotation>;

    fn has_annotation(&self, class_name: &str) -> bool {
        self.annotations()
            .iter()
            .any(|a| a.ty.qualified_name() == class_name)
    }

    /// The first annotation whose own class is annotated with `class_name`,
    /// e.g. the `@Singleton` on a class when asked for `Scope`.
    fn annotation_annotated_with(&self, class_name: &str) -> Option<AstAnnotation> {
        self.annotations()
            .into_iter()
            .find(|a| a.is_annotated_with(class_name))
    }
}

pub trait AstClass: AstAnnotated + fmt::Debug {
    fn element(&self) -> Element;

    fn package_name(&self) -> &str;

    fn name(&self) -> &str;

    fn companion(&self) -> Option<ClassRef>;

    fn is_interface(&self) -> bool;

    fn is_abstract(&self) -> bool;

    fn is_private(&self) -> bool;

    fn super_types(&self) -> Vec<ClassRef>;

    fn primary_constructor(&self) -> Option<ConstructorRef>;

    /// Members declared directly on this class, in declaration order.
    fn methods(&self) -> Vec<MethodRef>;

    fn ty(&self) -> AstType;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MethodKind {
    Function,
    Property,
}

/// A member function or property, or a top-level function.
pub trait AstMethod: AstAnnotated + fmt::Debug {
    fn element(&self) -> Element;

    fn name(&self) -> &str;

    fn kind(&self) -> MethodKind;

    /// Value parameters. Always empty for properties.
    fn parameters(&self) -> Vec<AstParam>;

    fn is_suspend(&self) -> bool;

    fn receiver_parameter_type(&self) -> Option<AstType>;

    fn return_type(&self) -> AstType;

    /// The return type as seen from `enclosing`, a class inheriting this
    /// member: type parameters of the declaring class are replaced by the
    /// arguments `enclosing` supplies through its supertypes. Members with
    /// no enclosing class (top-level functions) return the declared type.
    fn return_type_for(&self, enclosing: &dyn AstClass) -> AstType {
        let _ = enclosing;
        self.return_type()
    }

    /// The name used to call this member from generated code. Top-level
    /// functions are fully qualified.
    fn member_name(&self) -> String;

    fn is_abstract(&self) -> bool;

    fn is_private(&self) -> bool;

    /// Whether `self` overrides `other`: same name, same shape.
    fn overrides(&self, other: &dyn AstMethod) -> bool {
        self.name() == other.name()
            && self.kind() == other.kind()
            && self.receiver_parameter_type() == other.receiver_parameter_type()
            && self
                .parameters()
                .iter()
                .map(|p| &p.ty)
                .eq(other.parameters().iter().map(|p| &p.ty))
    }
}

pub trait AstConstructor: AstAnnotated + fmt::Debug {
    fn element(&self) -> Element;

    /// The type this constructor creates.
    fn ty(&self) -> AstType;

    fn parameters(&self) -> Vec<AstParam>;
}

/// A value parameter of a constructor or function.
#[derive(Clone, Debug)]
pub struct AstParam {
    pub name: String,
    pub ty: AstType,
    pub is_val: bool,
    pub is_private: bool,
    pub has_default: bool,
    pub annotations: Vec<AstAnnotation>,
    pub element: Element,
}

impl AstAnnotated for AstParam {
    fn annotations(&self) -> Vec<AstAnnotation> {
        self.annotations.clone()
    }
}

impl fmt::Display for AstParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}

impl PartialEq for dyn AstClass {
    fn eq(&self, other: &Self) -> bool {
        self.element() == other.element()
    }
}

impl Eq for dyn AstClass {}

impl PartialEq for dyn AstMethod {
    fn eq(&self, other: &Self) -> bool {
        self.element() == other.element()
    }
}

impl Eq for dyn AstMethod {}

impl PartialEq for dyn AstConstructor {
    fn eq(&self, other: &Self) -> bool {
        self.element() == other.element()
    }
}

impl Eq for dyn AstConstructor {}

/// `class` followed by all of its ancestors, depth-first, each declaration
/// once even when reachable along several paths.
pub fn inheritance_chain(class: &ClassRef) -> Vec<ClassRef> {
    fn visit(class: &ClassRef, seen: &mut FxHashSet<Element>, out: &mut Vec<ClassRef>) {
        if !seen.insert(class.element()) {
            return;
        }
        out.push(Rc::clone(class));
        for parent in class.super_types() {
            visit(&parent, seen, out);
        }
    }

    let mut seen = FxHashSet::default();
    let mut out = Vec::new();
    visit(class, &mut seen, &mut out);
    out
}
