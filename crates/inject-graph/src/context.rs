//! The resolution context threaded through every `provide` call.

use std::cell::RefCell;

use inject_model::{AstType, Element};

use crate::collector::TypeCollector;
use crate::cycle::{CycleDetector, CycleResult};
use crate::error::GenerateError;

/// An immutable value; every `with_*` returns a modified copy. The cycle
/// detector is the one piece of state shared along a generation pass.
#[derive(Clone)]
pub struct Context<'a> {
    pub collector: &'a TypeCollector<'a>,
    cycles: &'a RefCell<CycleDetector>,
    /// The element currently being resolved, for diagnostics.
    pub source: Element,
    /// Lambda parameters introduced by enclosing function bodies, with the
    /// names they are bound to.
    pub args: Vec<(AstType, String)>,
    /// A scoped type whose cache entry is being filled on this path.
    pub skip_scoped: Option<AstType>,
    /// The return type of the provider requirement being generated.
    pub skip_provider: Option<AstType>,
    /// Accessor of the parent component the emitted code is currently
    /// scoped into with `with(...)`.
    pub parent_scope_name: Option<String>,
}

impl<'a> Context<'a> {
    pub fn new(collector: &'a TypeCollector<'a>, cycles: &'a RefCell<CycleDetector>) -> Self {
        Context {
            collector,
            cycles,
            source: collector.component().element(),
            args: Vec::new(),
            skip_scoped: None,
            skip_provider: None,
            parent_scope_name: None,
        }
    }

    pub fn without_scoped(&self, scoped: AstType) -> Self {
        Context {
            skip_scoped: Some(scoped),
            ..self.clone()
        }
    }

    pub fn without_provider(&self, provider: AstType) -> Self {
        Context {
            skip_provider: Some(provider),
            ..self.clone()
        }
    }

    pub fn with_source(&self, source: Element) -> Self {
        Context {
            source,
            ..self.clone()
        }
    }

    /// Nest into `name`, joining with any enclosing scope name as `outer.name`.
    pub fn with_parent_scope_name(&self, name: Option<&str>) -> Self {
        let Some(name) = name else {
            return self.clone();
        };
        let joined = match &self.parent_scope_name {
            Some(parent) => format!("{}.{}", parent, name),
            None => name.to_string(),
        };
        Context {
            parent_scope_name: Some(joined),
            ..self.clone()
        }
    }

    pub fn with_args(&self, args: Vec<(AstType, String)>) -> Self {
        Context {
            args,
            ..self.clone()
        }
    }

    /// Run `f` with `source` pushed on the resolution path.
    ///
    /// Fails with [`GenerateError::Cycle`] when `source` is already on the
    /// path. The path is popped again whether or not `f` succeeds.
    pub fn use_element<T>(
        &self,
        source: &Element,
        f: impl FnOnce(Context<'a>) -> Result<T, GenerateError>,
    ) -> Result<T, GenerateError> {
        let result = self.cycles.borrow_mut().check(source);
        match result {
            CycleResult::None => {
                let out = f(self.with_source(source.clone()));
                self.cycles.borrow_mut().pop();
                out
            }
            CycleResult::Cycle => Err(GenerateError::Cycle {
                trace: self.trace(),
                element: source.clone(),
            }),
            CycleResult::Resolvable => Err(GenerateError::LazyCycle {
                trace: self.trace(),
                element: source.clone(),
            }),
        }
    }

    /// The active resolution path, most recent first.
    pub fn trace(&self) -> Vec<String> {
        self.cycles.borrow().trace()
    }
}
