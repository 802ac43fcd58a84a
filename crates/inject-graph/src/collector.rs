//! The binding catalog for one component.
//!
//! Built once per top-level component class, then read-only. Problems found
//! while collecting (conflicting scopes, duplicate bindings, malformed
//! `@Provides` members) are kept as diagnostics and do not stop collection.

use std::rc::Rc;

use inject_common::Options;
use inject_model::{
    inheritance_chain, AstClass, AstType, ClassRef, ConstructorRef, Diagnostic, Element, KnownType,
    MethodRef, TypeModel,
};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::error::codes;
use crate::key::TypeKey;
use crate::rules;

/// The class owning a scope, and how to reach its `_scoped` cache from the
/// generated component. `accessor` is `None` for the component itself.
#[derive(Clone, Debug)]
pub struct ScopeOwner {
    pub class: ClassRef,
    pub accessor: Option<String>,
    pub scope: AstType,
}

/// A member that produces a value, reached through `accessor` when it is
/// declared on a parent component.
#[derive(Clone, Debug)]
pub struct MethodCreator {
    pub method: MethodRef,
    pub accessor: Option<String>,
    pub scope: Option<ScopeOwner>,
}

#[derive(Clone, Debug)]
pub enum TypeCreator {
    Constructor {
        constructor: ConstructorRef,
        scope: Option<ScopeOwner>,
    },
    Method(MethodCreator),
    /// Several `@IntoSet`/`@IntoMap` members folded into one collection.
    /// A scope on any member applies to the collection as a whole.
    Container {
        creator: &'static str,
        args: Vec<MethodCreator>,
        scope: Option<ScopeOwner>,
    },
}

/// A scoped class whose scope no reachable component owns.
#[derive(Clone, Debug)]
pub struct MissingScope {
    pub ty: AstType,
    pub scope: AstType,
}

/// Outcome of looking for the scope-owning ancestor in an inheritance chain.
#[derive(Debug, Default)]
pub struct ScopeSearch {
    pub found: Option<(ClassRef, AstType)>,
    /// Every further ancestor carrying a scope annotation.
    pub conflicts: Vec<(ClassRef, AstType)>,
}

/// Walk `class` and its ancestors looking for scope annotations.
pub fn find_scope(class: &ClassRef, options: &Options) -> ScopeSearch {
    let mut search = ScopeSearch::default();
    for ancestor in inheritance_chain(class) {
        let Some(scope) = rules::scope_type(ancestor.as_ref(), options) else {
            continue;
        };
        if search.found.is_none() {
            search.found = Some((ancestor, scope));
        } else {
            search.conflicts.push((ancestor, scope));
        }
    }
    search
}

#[derive(Debug)]
struct Entry {
    creator: TypeCreator,
    accessor: Option<String>,
    element: Element,
}

#[derive(Debug)]
struct ContainerEntry {
    creator: &'static str,
    args: Vec<MethodCreator>,
    scope: Option<ScopeOwner>,
}

pub struct TypeCollector<'a> {
    model: &'a dyn TypeModel,
    options: Options,
    component: ClassRef,
    types: FxHashMap<TypeKey, Entry>,
    containers: FxHashMap<TypeKey, ContainerEntry>,
    provider_types: FxHashMap<TypeKey, MethodCreator>,
    provider_methods: Vec<MethodRef>,
    scopes: Vec<ScopeOwner>,
    scope_class: Option<ClassRef>,
    visiting: FxHashSet<Element>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> TypeCollector<'a> {
    pub fn new(model: &'a dyn TypeModel, options: Options, component: &ClassRef) -> Self {
        let mut collector = TypeCollector {
            model,
            options,
            component: Rc::clone(component),
            types: FxHashMap::default(),
            containers: FxHashMap::default(),
            provider_types: FxHashMap::default(),
            provider_methods: Vec::new(),
            scopes: Vec::new(),
            scope_class: None,
            visiting: FxHashSet::default(),
            diagnostics: Vec::new(),
        };
        let scope = collector.collect_scope(component, None);
        collector.scope_class = scope.as_ref().map(|owner| Rc::clone(&owner.class));
        collector.collect(component, None, scope);
        debug!(
            component = %component.element(),
            bindings = collector.types.len(),
            containers = collector.containers.len(),
            providers = collector.provider_methods.len(),
            "collected bindings"
        );
        collector
    }

    pub fn component(&self) -> &ClassRef {
        &self.component
    }

    /// The ancestor of the component declaring its scope, if any.
    pub fn scope_class(&self) -> Option<&ClassRef> {
        self.scope_class.as_ref()
    }

    /// The scope annotation type applied to the component, if any.
    pub fn scope_type(&self) -> Option<&AstType> {
        self.scopes
            .iter()
            .find(|owner| owner.accessor.is_none())
            .map(|owner| &owner.scope)
    }

    /// Abstract members of the component the generated class implements, in
    /// inheritance-chain order.
    pub fn provider_methods(&self) -> &[MethodRef] {
        &self.provider_methods
    }

    pub fn scopes(&self) -> &[ScopeOwner] {
        &self.scopes
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Look up the binding for `key`.
    ///
    /// Explicit bindings come first, then multibinding containers, then an
    /// injectable constructor for unqualified keys. The component's own
    /// provider requirements are the last resort and are skipped entirely
    /// when `skip_self` is set, so a requirement never satisfies itself.
    pub fn resolve(&self, key: &TypeKey, skip_self: bool) -> Result<Option<TypeCreator>, MissingScope> {
        if let Some(entry) = self.types.get(key) {
            return Ok(Some(entry.creator.clone()));
        }
        if let Some(container) = self.containers.get(key) {
            return Ok(Some(TypeCreator::Container {
                creator: container.creator,
                args: container.args.clone(),
                scope: container.scope.clone(),
            }));
        }
        if key.qualifier.is_none() {
            if let Some(creator) = self.constructor_for(&key.ty)? {
                return Ok(Some(creator));
            }
        }
        if !skip_self {
            if let Some(method) = self.provider_types.get(key) {
                return Ok(Some(TypeCreator::Method(method.clone())));
            }
        }
        Ok(None)
    }

    fn constructor_for(&self, ty: &AstType) -> Result<Option<TypeCreator>, MissingScope> {
        let Some(class) = self.model.class_of(ty) else {
            return Ok(None);
        };
        if !rules::is_inject_class(class.as_ref(), &self.options) {
            return Ok(None);
        }
        let Some(constructor) = class.primary_constructor() else {
            return Ok(None);
        };
        let scope = match rules::scope_type(class.as_ref(), &self.options) {
            None => None,
            Some(scope) => match self.scopes.iter().find(|owner| owner.scope == scope) {
                Some(owner) => Some(owner.clone()),
                None => {
                    return Err(MissingScope {
                        ty: ty.clone(),
                        scope,
                    })
                }
            },
        };
        Ok(Some(TypeCreator::Constructor { constructor, scope }))
    }

    // ── Collection ─────────────────────────────────────────────────────

    fn collect_scope(&mut self, class: &ClassRef, accessor: Option<String>) -> Option<ScopeOwner> {
        let search = find_scope(class, &self.options);
        let (owner, scope) = search.found?;
        for (conflict, conflict_scope) in search.conflicts {
            self.error(
                codes::CONFLICTING_SCOPES,
                format!("Cannot apply scope: @{}", conflict_scope),
                conflict.element(),
            );
            self.error(
                codes::CONFLICTING_SCOPES,
                format!("as scope: @{} is already applied", scope),
                owner.element(),
            );
        }
        let owner = ScopeOwner {
            class: owner,
            accessor,
            scope,
        };
        self.scopes.push(owner.clone());
        Some(owner)
    }

    fn collect(&mut self, class: &ClassRef, accessor: Option<String>, scope: Option<ScopeOwner>) {
        if !self.visiting.insert(class.element()) {
            return;
        }
        let root = accessor.is_none();

        let mut seen: Vec<MethodRef> = Vec::new();
        for ancestor in inheritance_chain(class) {
            for method in ancestor.methods() {
                if seen.iter().any(|s| s.overrides(method.as_ref())) {
                    continue;
                }
                seen.push(Rc::clone(&method));

                if rules::is_provides(method.as_ref()) {
                    self.add_provides(class.as_ref(), method, accessor.clone(), scope.as_ref());
                } else if rules::is_provider(method.as_ref()) {
                    let key = TypeKey::new(
                        method.return_type_for(class.as_ref()),
                        rules::qualifier(method.as_ref(), &self.options),
                    );
                    let creator = MethodCreator {
                        method: Rc::clone(&method),
                        accessor: accessor.clone(),
                        scope: None,
                    };
                    if root {
                        self.provider_methods.push(method);
                        self.provider_types.entry(key).or_insert(creator);
                    } else {
                        let element = method.element();
                        self.add_binding(key, TypeCreator::Method(creator), accessor.clone(), element);
                    }
                }
            }
        }

        let Some(constructor) = class.primary_constructor() else {
            return;
        };
        for param in constructor.parameters() {
            if !rules::is_component(&param) {
                continue;
            }
            if root {
                if !param.is_val {
                    self.error(
                        codes::INVALID_COMPONENT_PARAM,
                        format!("@Component parameter: {} must be val", param.name),
                        param.element.clone(),
                    );
                } else if param.is_private {
                    self.error(
                        codes::INVALID_COMPONENT_PARAM,
                        format!("@Component parameter: {} must not be private", param.name),
                        param.element.clone(),
                    );
                }
            }
            let Some(parent) = self.model.class_of(&param.ty) else {
                continue;
            };
            let path = match &accessor {
                Some(prefix) => format!("{}.{}", prefix, param.name),
                None => param.name.clone(),
            };
            let parent_scope = self.collect_scope(&parent, Some(path.clone()));
            self.collect(&parent, Some(path), parent_scope);
        }
    }

    fn add_provides(
        &mut self,
        level: &dyn AstClass,
        method: MethodRef,
        accessor: Option<String>,
        level_scope: Option<&ScopeOwner>,
    ) {
        let element = method.element();
        if method.is_private() {
            self.error(
                codes::INVALID_PROVIDES,
                format!("@Provides method must not be private: {}", method.name()),
                element,
            );
            return;
        }
        let return_type = method.return_type_for(level);
        if return_type.is_unit() {
            self.error(
                codes::INVALID_PROVIDES,
                format!("@Provides method must return a value: {}", method.name()),
                element,
            );
            return;
        }

        let scope = match rules::scope_type(method.as_ref(), &self.options) {
            None => None,
            Some(method_scope) => match level_scope {
                Some(owner) if owner.scope == method_scope => Some(owner.clone()),
                _ => {
                    self.error(
                        codes::INVALID_PROVIDES,
                        format!(
                            "@Provides with scope: @{} must be declared in a component with the same scope",
                            method_scope
                        ),
                        element.clone(),
                    );
                    None
                }
            },
        };
        let qualifier = rules::qualifier(method.as_ref(), &self.options);
        let is_into_set = rules::is_into_set(method.as_ref());
        let is_into_map = rules::is_into_map(method.as_ref());
        let creator = MethodCreator {
            method,
            accessor: accessor.clone(),
            scope,
        };

        if is_into_set {
            let ty = self.model.declared_type_of(KnownType::Set, vec![return_type]);
            self.add_container(TypeKey::new(ty, qualifier), "setOf", creator);
        } else if is_into_map {
            let pair = return_type.resolved_type();
            if !pair.is_known(KnownType::Pair) || pair.arguments.len() != 2 {
                self.error(
                    codes::INVALID_PROVIDES,
                    format!("@IntoMap must have return type of type: Pair, found: {}", return_type),
                    element,
                );
                return;
            }
            let ty = self
                .model
                .declared_type_of(KnownType::Map, pair.arguments.clone());
            self.add_container(TypeKey::new(ty, qualifier), "mapOf", creator);
        } else {
            let key = TypeKey::new(return_type, qualifier);
            self.add_binding(key, TypeCreator::Method(creator), accessor, element);
        }
    }

    fn add_container(&mut self, key: TypeKey, creator: &'static str, mut member: MethodCreator) {
        // The member's scope moves to the container; members are never cached
        // one by one.
        let scope = member.scope.take();
        let entry = self.containers.entry(key).or_insert_with(|| ContainerEntry {
            creator,
            args: Vec::new(),
            scope: None,
        });
        if entry.scope.is_none() {
            entry.scope = scope;
        }
        entry.args.push(member);
    }

    /// Record a binding. Bindings from the component and its ancestors shadow
    /// those of parent components; two bindings at the same level conflict.
    fn add_binding(&mut self, key: TypeKey, creator: TypeCreator, accessor: Option<String>, element: Element) {
        if let Some(existing) = self.types.get(&key) {
            if existing.accessor == accessor {
                let previous = existing.element.clone();
                self.error(
                    codes::DUPLICATE_BINDING,
                    format!("Cannot provide: {}", key),
                    element,
                );
                self.error(
                    codes::DUPLICATE_BINDING,
                    "as it is already provided".to_string(),
                    previous,
                );
            }
            return;
        }
        self.types.insert(
            key,
            Entry {
                creator,
                accessor,
                element,
            },
        );
    }

    fn error(&mut self, code: &'static str, message: String, element: Element) {
        self.diagnostics
            .push(Diagnostic::error(message, Some(element)).with_code(code));
    }
}
