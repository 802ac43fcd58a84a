//! An in-memory front end over a JSON model file.
//!
//! This is what `injectc` reads, and what the tests in every crate build
//! their inputs with. Each wrapper below is a cheap view: an `Rc` on the
//! shared model plus indices into it.

mod decl;

pub use decl::{
    AnnotationDecl, ClassDecl, ConstructorDecl, FunctionDecl, MemberDecl, MemberKind, ModelFile,
    ParamDecl,
};

use std::fmt;
use std::path::Path;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::ast::{
    AstAnnotated, AstClass, AstConstructor, AstMethod, AstParam, ClassRef, ConstructorRef,
    MethodKind, MethodRef,
};
use crate::element::{Element, ElementKind};
use crate::provider::TypeModel;
use crate::ty::{AstAnnotation, AstType};

#[derive(Debug)]
struct ModelData {
    file: ModelFile,
    classes: FxHashMap<String, usize>,
    meta: FxHashMap<String, Vec<String>>,
}

impl ModelData {
    fn annotation(&self, name: &str) -> AstAnnotation {
        AstAnnotation::new(AstType::named(name))
            .with_meta(self.meta.get(name).cloned().unwrap_or_default())
    }

    fn annotations(&self, names: &[String]) -> Vec<AstAnnotation> {
        names.iter().map(|name| self.annotation(name)).collect()
    }

    fn params(&self, owner: &str, params: &[ParamDecl]) -> Vec<AstParam> {
        params
            .iter()
            .map(|p| AstParam {
                name: p.name.clone(),
                ty: p.ty.clone(),
                is_val: p.is_val,
                is_private: p.private,
                has_default: p.default,
                annotations: self.annotations(&p.annotations),
                element: Element::new(
                    ElementKind::Param,
                    format!("{}#{}", owner, p.name),
                    format!("{}: {}", p.name, p.ty),
                )
                .with_span(p.span),
            })
            .collect()
    }
}

impl ModelData {
    /// Type arguments bound to the type parameters of class `target`, as
    /// declared along the supertypes of class `from`. `None` if `target`
    /// is not an ancestor of `from`.
    fn substitution(&self, from: usize, target: usize) -> Option<FxHashMap<String, AstType>> {
        let mut seen = FxHashSet::default();
        let mut stack = vec![(from, FxHashMap::default())];
        while let Some((index, bindings)) = stack.pop() {
            if index == target {
                return Some(bindings);
            }
            if !seen.insert(index) {
                continue;
            }
            for super_type in &self.file.classes[index].super_types {
                let super_type = super_type.resolved_type();
                let Some(&next) = self.classes.get(&super_type.qualified_name()) else {
                    continue;
                };
                let next_bindings = self.file.classes[next]
                    .type_parameters
                    .iter()
                    .cloned()
                    .zip(super_type.arguments.iter().map(|a| substitute(a, &bindings)))
                    .collect();
                stack.push((next, next_bindings));
            }
        }
        None
    }
}

/// Replace type parameter references in `ty` with their bindings.
fn substitute(ty: &AstType, bindings: &FxHashMap<String, AstType>) -> AstType {
    if ty.package.is_empty() && ty.arguments.is_empty() && ty.alias.is_none() {
        if let Some(bound) = bindings.get(&ty.name) {
            return if ty.nullable {
                bound.clone().make_nullable()
            } else {
                bound.clone()
            };
        }
    }
    let mut out = ty.clone();
    out.arguments = ty.arguments.iter().map(|a| substitute(a, bindings)).collect();
    out.alias = ty.alias.as_ref().map(|a| Box::new(substitute(a, bindings)));
    out
}

fn class_type(decl: &ClassDecl) -> AstType {
    AstType::new(decl.package.as_str(), decl.name.as_str())
}

fn join_types(params: &[ParamDecl]) -> String {
    params
        .iter()
        .map(|p| p.ty.qualified_name())
        .collect::<Vec<_>>()
        .join(",")
}

fn join_params(params: &[ParamDecl]) -> String {
    params
        .iter()
        .map(|p| format!("{}: {}", p.name, p.ty))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The model behind a [`ModelFile`].
#[derive(Clone, Debug)]
pub struct MemoryModel {
    data: Rc<ModelData>,
}

impl MemoryModel {
    pub fn new(file: ModelFile) -> Self {
        let classes = file
            .classes
            .iter()
            .enumerate()
            .map(|(index, c)| (class_type(c).qualified_name(), index))
            .collect();
        let meta = file
            .annotations
            .iter()
            .map(|a| (a.name.clone(), a.meta.clone()))
            .collect();
        MemoryModel {
            data: Rc::new(ModelData {
                file,
                classes,
                meta,
            }),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<ModelFile>(json).map(MemoryModel::new)
    }

    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        MemoryModel::from_json(&content)
            .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
    }

    /// The source file named by the model, if any.
    pub fn source(&self) -> Option<&str> {
        self.data.file.source.as_deref()
    }

    fn class_at(&self, index: usize, companion: bool) -> ClassRef {
        let decl = &self.data.file.classes[index];
        let name = if companion {
            format!("{}.Companion", decl.name)
        } else {
            decl.name.clone()
        };
        Rc::new(MemoryClass {
            data: Rc::clone(&self.data),
            index,
            companion,
            name,
        })
    }
}

impl TypeModel for MemoryModel {
    fn class_of(&self, ty: &AstType) -> Option<ClassRef> {
        let name = ty.resolved_type().qualified_name();
        self.data
            .classes
            .get(&name)
            .map(|&index| self.class_at(index, false))
    }

    fn find_functions(&self, package: &str, name: &str) -> Vec<MethodRef> {
        self.data
            .file
            .functions
            .iter()
            .enumerate()
            .filter(|(_, f)| f.package == package && f.name == name)
            .map(|(index, _)| {
                Rc::new(MemoryFunction {
                    data: Rc::clone(&self.data),
                    index,
                }) as MethodRef
            })
            .collect()
    }

    fn classes_annotated_with(&self, annotation: &str) -> Vec<ClassRef> {
        self.data
            .file
            .classes
            .iter()
            .enumerate()
            .filter(|(_, c)| c.annotations.iter().any(|a| a == annotation))
            .map(|(index, _)| self.class_at(index, false))
            .collect()
    }

    fn is_assignable(&self, to: &AstType, from: &AstType) -> bool {
        if to == from {
            return true;
        }
        if from.nullable && !to.nullable {
            return false;
        }
        let target = to.non_null();
        let mut seen = FxHashSet::default();
        let mut stack = vec![from.non_null()];
        while let Some(ty) = stack.pop() {
            if ty == target {
                return true;
            }
            let Some(&index) = self.data.classes.get(&ty.resolved_type().qualified_name()) else {
                continue;
            };
            if seen.insert(index) {
                stack.extend(self.data.file.classes[index].super_types.iter().cloned());
            }
        }
        false
    }
}

// ── Classes ────────────────────────────────────────────────────────────

struct MemoryClass {
    data: Rc<ModelData>,
    index: usize,
    companion: bool,
    name: String,
}

impl MemoryClass {
    fn decl(&self) -> &ClassDecl {
        &self.data.file.classes[self.index]
    }

    fn path(&self) -> String {
        if self.package_name().is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package_name(), self.name)
        }
    }
}

impl fmt::Debug for MemoryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemoryClass({})", self.path())
    }
}

impl AstAnnotated for MemoryClass {
    fn annotations(&self) -> Vec<AstAnnotation> {
        if self.companion {
            return Vec::new();
        }
        self.data.annotations(&self.decl().annotations)
    }
}

impl AstClass for MemoryClass {
    fn element(&self) -> Element {
        Element::new(ElementKind::Class, self.path(), self.ty().to_string())
            .with_span(self.decl().span)
    }

    fn package_name(&self) -> &str {
        &self.decl().package
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn companion(&self) -> Option<ClassRef> {
        if self.companion || !self.decl().companion {
            return None;
        }
        Some(Rc::new(MemoryClass {
            data: Rc::clone(&self.data),
            index: self.index,
            companion: true,
            name: format!("{}.Companion", self.decl().name),
        }))
    }

    fn is_interface(&self) -> bool {
        !self.companion && self.decl().interface
    }

    fn is_abstract(&self) -> bool {
        !self.companion && (self.decl().is_abstract || self.decl().interface)
    }

    fn is_private(&self) -> bool {
        self.decl().private
    }

    fn super_types(&self) -> Vec<ClassRef> {
        if self.companion {
            return Vec::new();
        }
        self.decl()
            .super_types
            .iter()
            .filter_map(|ty| {
                self.data
                    .classes
                    .get(&ty.resolved_type().qualified_name())
                    .map(|&index| {
                        Rc::new(MemoryClass {
                            data: Rc::clone(&self.data),
                            index,
                            companion: false,
                            name: self.data.file.classes[index].name.clone(),
                        }) as ClassRef
                    })
            })
            .collect()
    }

    fn primary_constructor(&self) -> Option<ConstructorRef> {
        if self.companion {
            return None;
        }
        self.decl().constructor.as_ref().map(|_| {
            Rc::new(MemoryConstructor {
                data: Rc::clone(&self.data),
                class: self.index,
            }) as ConstructorRef
        })
    }

    fn methods(&self) -> Vec<MethodRef> {
        if self.companion {
            return Vec::new();
        }
        (0..self.decl().members.len())
            .map(|member| {
                Rc::new(MemoryMember {
                    data: Rc::clone(&self.data),
                    class: self.index,
                    member,
                }) as MethodRef
            })
            .collect()
    }

    fn ty(&self) -> AstType {
        AstType::new(self.package_name(), self.name.as_str())
    }
}

// ── Members ────────────────────────────────────────────────────────────

struct MemoryMember {
    data: Rc<ModelData>,
    class: usize,
    member: usize,
}

impl MemoryMember {
    fn owner(&self) -> &ClassDecl {
        &self.data.file.classes[self.class]
    }

    fn decl(&self) -> &MemberDecl {
        &self.owner().members[self.member]
    }

    fn path(&self) -> String {
        let decl = self.decl();
        let owner = class_type(self.owner()).qualified_name();
        match decl.kind {
            MemberKind::Fun => format!("{}.{}({})", owner, decl.name, join_types(&decl.params)),
            MemberKind::Val => format!("{}.{}", owner, decl.name),
        }
    }
}

impl fmt::Debug for MemoryMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemoryMember({})", self.path())
    }
}

impl AstAnnotated for MemoryMember {
    fn annotations(&self) -> Vec<AstAnnotation> {
        self.data.annotations(&self.decl().annotations)
    }
}

impl AstMethod for MemoryMember {
    fn element(&self) -> Element {
        let decl = self.decl();
        let owner = class_type(self.owner());
        let trace = match decl.kind {
            MemberKind::Fun => format!(
                "{}.{}({}): {}",
                owner,
                decl.name,
                join_params(&decl.params),
                decl.returns
            ),
            MemberKind::Val => format!("{}.{}: {}", owner, decl.name, decl.returns),
        };
        Element::new(ElementKind::Method, self.path(), trace).with_span(decl.span)
    }

    fn name(&self) -> &str {
        &self.decl().name
    }

    fn kind(&self) -> MethodKind {
        match self.decl().kind {
            MemberKind::Fun => MethodKind::Function,
            MemberKind::Val => MethodKind::Property,
        }
    }

    fn parameters(&self) -> Vec<AstParam> {
        if self.decl().kind == MemberKind::Val {
            return Vec::new();
        }
        self.data.params(&self.path(), &self.decl().params)
    }

    fn is_suspend(&self) -> bool {
        self.decl().suspend
    }

    fn receiver_parameter_type(&self) -> Option<AstType> {
        self.decl().receiver.clone()
    }

    fn return_type(&self) -> AstType {
        self.decl().returns.clone()
    }

    fn return_type_for(&self, enclosing: &dyn AstClass) -> AstType {
        let returns = &self.decl().returns;
        let bindings = self
            .data
            .classes
            .get(&enclosing.ty().qualified_name())
            .and_then(|&from| self.data.substitution(from, self.class));
        match bindings {
            Some(bindings) if !bindings.is_empty() => substitute(returns, &bindings),
            _ => returns.clone(),
        }
    }

    fn member_name(&self) -> String {
        self.decl().name.clone()
    }

    fn is_abstract(&self) -> bool {
        self.decl().is_abstract
    }

    fn is_private(&self) -> bool {
        self.decl().private
    }
}

// ── Top-level functions ────────────────────────────────────────────────

struct MemoryFunction {
    data: Rc<ModelData>,
    index: usize,
}

impl MemoryFunction {
    fn decl(&self) -> &FunctionDecl {
        &self.data.file.functions[self.index]
    }

    fn qualified_name(&self) -> String {
        let decl = self.decl();
        if decl.package.is_empty() {
            decl.name.clone()
        } else {
            format!("{}.{}", decl.package, decl.name)
        }
    }
}

impl fmt::Debug for MemoryFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemoryFunction({})", self.qualified_name())
    }
}

impl AstAnnotated for MemoryFunction {
    fn annotations(&self) -> Vec<AstAnnotation> {
        self.data.annotations(&self.decl().annotations)
    }
}

impl AstMethod for MemoryFunction {
    fn element(&self) -> Element {
        let decl = self.decl();
        let path = format!("{}({})", self.qualified_name(), join_types(&decl.params));
        let trace = format!(
            "{}({}): {}",
            self.qualified_name(),
            join_params(&decl.params),
            decl.returns
        );
        Element::new(ElementKind::Function, path, trace).with_span(decl.span)
    }

    fn name(&self) -> &str {
        &self.decl().name
    }

    fn kind(&self) -> MethodKind {
        MethodKind::Function
    }

    fn parameters(&self) -> Vec<AstParam> {
        let owner = format!("{}({})", self.qualified_name(), join_types(&self.decl().params));
        self.data.params(&owner, &self.decl().params)
    }

    fn is_suspend(&self) -> bool {
        false
    }

    fn receiver_parameter_type(&self) -> Option<AstType> {
        None
    }

    fn return_type(&self) -> AstType {
        self.decl().returns.clone()
    }

    fn member_name(&self) -> String {
        self.qualified_name()
    }

    fn is_abstract(&self) -> bool {
        false
    }

    fn is_private(&self) -> bool {
        false
    }
}

// ── Constructors ───────────────────────────────────────────────────────

struct MemoryConstructor {
    data: Rc<ModelData>,
    class: usize,
}

impl MemoryConstructor {
    fn owner(&self) -> &ClassDecl {
        &self.data.file.classes[self.class]
    }

    fn decl(&self) -> Option<&ConstructorDecl> {
        self.owner().constructor.as_ref()
    }

    fn path(&self) -> String {
        format!("{}.<init>", class_type(self.owner()).qualified_name())
    }
}

impl fmt::Debug for MemoryConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemoryConstructor({})", self.path())
    }
}

impl AstAnnotated for MemoryConstructor {
    fn annotations(&self) -> Vec<AstAnnotation> {
        self.decl()
            .map(|c| self.data.annotations(&c.annotations))
            .unwrap_or_default()
    }
}

impl AstConstructor for MemoryConstructor {
    fn element(&self) -> Element {
        let params = self.decl().map(|c| c.params.as_slice()).unwrap_or_default();
        let trace = format!("{}({})", class_type(self.owner()), join_params(params));
        Element::new(ElementKind::Constructor, self.path(), trace)
            .with_span(self.decl().and_then(|c| c.span))
    }

    fn ty(&self) -> AstType {
        class_type(self.owner())
    }

    fn parameters(&self) -> Vec<AstParam> {
        let params = self.decl().map(|c| c.params.as_slice()).unwrap_or_default();
        self.data.params(&self.path(), params)
    }
}
