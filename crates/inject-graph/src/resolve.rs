//! The recursive resolution engine: turns a requested key into a [`Plan`].

use std::rc::Rc;

use inject_common::Options;
use inject_model::{
    AstParam, AstType, ClassRef, ConstructorRef, Element, KnownType, MethodKind, MethodRef,
    TypeModel,
};
use tracing::trace;

use crate::collector::{MethodCreator, TypeCreator};
use crate::context::Context;
use crate::error::GenerateError;
use crate::key::TypeKey;
use crate::plan::Plan;
use crate::rules;

/// How a binding was found for a key, before its dependencies are resolved.
enum Candidate {
    Provides(MethodCreator),
    Scoped {
        accessor: Option<String>,
        owner: ClassRef,
    },
    Constructor(ConstructorRef),
    Container {
        creator: &'static str,
        args: Vec<MethodCreator>,
    },
    Function {
        element: Element,
        key: TypeKey,
        args: Vec<AstType>,
    },
    NamedFunction {
        function: MethodRef,
        args: Vec<AstType>,
    },
    Arg(String),
    Lazy(TypeKey),
}

/// How to look a key up: directly, or as parameter `index` of `size`,
/// where lambda arguments in scope are tried first.
#[derive(Clone, Copy)]
enum Lookup {
    Key,
    Indexed { index: usize, size: usize },
}

pub struct Resolver<'a> {
    model: &'a dyn TypeModel,
    options: &'a Options,
}

impl<'a> Resolver<'a> {
    pub fn new(model: &'a dyn TypeModel, options: &'a Options) -> Self {
        Resolver { model, options }
    }

    /// Resolve `key` to a full construction plan.
    pub fn provide(&self, key: &TypeKey, context: &Context<'_>) -> Result<Plan, GenerateError> {
        self.provide_with(key, context, Lookup::Key)
    }

    fn provide_with(
        &self,
        key: &TypeKey,
        context: &Context<'_>,
        lookup: Lookup,
    ) -> Result<Plan, GenerateError> {
        trace!(%key, depth = context.trace().len(), "provide");
        let candidate = match lookup {
            Lookup::Key => self.find(key, context)?,
            Lookup::Indexed { index, size } => self.find_with_index(key, context, index, size)?,
        };
        let Some(candidate) = candidate else {
            return Err(GenerateError::NoBinding {
                key: key.clone(),
                trace: context.trace(),
                element: context.source.clone(),
            });
        };
        match candidate {
            Candidate::Provides(creator) => self.provide_provides(&creator, context),
            Candidate::Scoped { accessor, owner } => {
                let inner = self.provide(key, &context.without_scoped(key.ty.clone()))?;
                Ok(Plan::Scoped {
                    accessor,
                    owner,
                    cache_key: key.ty.source_name(),
                    inner: Box::new(inner),
                })
            }
            Candidate::Constructor(constructor) => self.provide_constructor(&constructor, context),
            Candidate::Container { creator, args } => {
                let args = args
                    .iter()
                    .map(|member| self.provide_provides(member, context))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Plan::Container { creator, args })
            }
            Candidate::Function { element, key, args } => {
                context.use_element(&element, |context| {
                    let args = name_args(args);
                    let body = self.provide(&key, &context.with_args(args.clone()))?;
                    Ok(Plan::Function {
                        args,
                        body: Box::new(body),
                    })
                })
            }
            Candidate::NamedFunction { function, args } => {
                context.use_element(&function.element(), |context| {
                    let args = name_args(args);
                    let context = context.with_args(args.clone());
                    let call_args = self.provide_params(&function.parameters(), &context)?;
                    Ok(Plan::NamedFunction {
                        function: Rc::clone(&function),
                        args,
                        call_args,
                    })
                })
            }
            Candidate::Arg(name) => Ok(Plan::Arg(name)),
            Candidate::Lazy(inner) => Ok(Plan::Lazy(Box::new(self.provide(&inner, context)?))),
        }
    }

    fn provide_provides(
        &self,
        creator: &MethodCreator,
        context: &Context<'_>,
    ) -> Result<Plan, GenerateError> {
        let method = &creator.method;
        context.use_element(&method.element(), |context| {
            let receiver_type = method.receiver_parameter_type();
            let enter_scope = creator.accessor.is_some() && receiver_type.is_some();
            let accessor = creator.accessor.as_ref().map(|name| {
                match &context.parent_scope_name {
                    Some(parent) => name
                        .strip_prefix(parent.as_str())
                        .and_then(|rest| rest.strip_prefix('.'))
                        .unwrap_or(name.as_str())
                        .to_string(),
                    None => name.clone(),
                }
            });
            let context = if enter_scope {
                context.with_parent_scope_name(accessor.as_deref())
            } else {
                context
            };

            let receiver = match receiver_type {
                Some(ty) => {
                    let key = TypeKey::new(ty, rules::qualifier(method.as_ref(), self.options));
                    Some(Box::new(self.provide(&key, &context)?))
                }
                None => None,
            };
            let args = match method.kind() {
                MethodKind::Property => Vec::new(),
                MethodKind::Function => self.provide_params(&method.parameters(), &context)?,
            };
            Ok(Plan::Provides {
                accessor,
                enter_scope,
                method: Rc::clone(method),
                receiver,
                args,
            })
        })
    }

    fn provide_constructor(
        &self,
        constructor: &ConstructorRef,
        context: &Context<'_>,
    ) -> Result<Plan, GenerateError> {
        context.use_element(&constructor.element(), |context| {
            let args = self.provide_params(&constructor.parameters(), &context)?;
            Ok(Plan::Constructor {
                constructor: Rc::clone(constructor),
                args,
            })
        })
    }

    fn provide_params(
        &self,
        params: &[AstParam],
        context: &Context<'_>,
    ) -> Result<Vec<Plan>, GenerateError> {
        let size = params.len();
        params
            .iter()
            .enumerate()
            .map(|(index, param)| {
                let key = TypeKey::new(param.ty.clone(), rules::qualifier(param, self.options));
                self.provide_with(&key, context, Lookup::Indexed { index, size })
            })
            .collect()
    }

    /// Bind parameter `index` of `size` to the lambda argument at the same
    /// position counted from the end, when the types line up. Otherwise
    /// fall back to [`Resolver::find`].
    fn find_with_index(
        &self,
        key: &TypeKey,
        context: &Context<'_>,
        index: usize,
        size: usize,
    ) -> Result<Option<Candidate>, GenerateError> {
        let from_end = size - index - 1;
        if let Some((ty, name)) = context.args.iter().rev().nth(from_end) {
            if self.model.is_assignable(&key.ty, ty) {
                return Ok(Some(Candidate::Arg(name.clone())));
            }
        }
        self.find(key, context)
    }

    fn find(&self, key: &TypeKey, context: &Context<'_>) -> Result<Option<Candidate>, GenerateError> {
        let skip_self = context.skip_provider.as_ref() == Some(&key.ty);
        match context.collector.resolve(key, skip_self) {
            Ok(Some(creator)) => return Ok(Some(to_candidate(creator, key, context))),
            Ok(None) => {}
            Err(missing) => {
                return Err(GenerateError::UnresolvableScope {
                    ty: missing.ty,
                    scope: missing.scope,
                    trace: context.trace(),
                    element: context.source.clone(),
                })
            }
        }

        if key.ty.is_function() {
            let resolved = key.ty.resolved_type();
            if let Some((ret, params)) = resolved.arguments.split_last() {
                if key.ty.is_type_alias() {
                    let function = self
                        .model
                        .find_functions(&key.ty.package, &key.ty.name)
                        .into_iter()
                        .find(|f| rules::is_inject_function(f.as_ref()));
                    if let Some(function) = function {
                        return Ok(Some(Candidate::NamedFunction {
                            function,
                            args: params.to_vec(),
                        }));
                    }
                }
                return Ok(Some(Candidate::Function {
                    element: Element::of_type(&key.ty),
                    key: TypeKey::new(ret.clone(), key.qualifier.clone()),
                    args: params.to_vec(),
                }));
            }
        }

        if key.ty.is_known(KnownType::Lazy) {
            if let Some(inner) = key.ty.resolved_type().arguments.first() {
                return Ok(Some(Candidate::Lazy(TypeKey::new(
                    inner.clone(),
                    key.qualifier.clone(),
                ))));
            }
        }

        Ok(None)
    }
}

/// Decide whether a binding is used directly or through its scope cache.
/// The type whose cache entry is being filled on this path is never wrapped
/// again.
fn to_candidate(creator: TypeCreator, key: &TypeKey, context: &Context<'_>) -> Candidate {
    let unwrapping = context.skip_scoped.as_ref() == Some(&key.ty);
    match creator {
        TypeCreator::Constructor { constructor, scope } => match scope {
            Some(owner) if !unwrapping => Candidate::Scoped {
                accessor: owner.accessor,
                owner: owner.class,
            },
            _ => Candidate::Constructor(constructor),
        },
        TypeCreator::Method(creator) => match &creator.scope {
            Some(owner) if !unwrapping => Candidate::Scoped {
                accessor: owner.accessor.clone(),
                owner: Rc::clone(&owner.class),
            },
            _ => Candidate::Provides(creator),
        },
        TypeCreator::Container {
            creator,
            args,
            scope,
        } => match scope {
            Some(owner) if !unwrapping => Candidate::Scoped {
                accessor: owner.accessor,
                owner: owner.class,
            },
            _ => Candidate::Container { creator, args },
        },
    }
}

fn name_args(types: Vec<AstType>) -> Vec<(AstType, String)> {
    types
        .into_iter()
        .enumerate()
        .map(|(index, ty)| (ty, format!("arg{}", index)))
        .collect()
}
