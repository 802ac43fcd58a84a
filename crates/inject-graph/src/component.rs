//! Planning a whole component: validation, collection and one plan per
//! provider requirement.

use std::cell::RefCell;

use inject_common::Options;
use inject_model::{AstType, ClassRef, Diagnostic, MethodRef, TypeModel};
use tracing::debug;

use crate::collector::TypeCollector;
use crate::context::Context;
use crate::cycle::CycleDetector;
use crate::error::GenerateError;
use crate::key::TypeKey;
use crate::plan::Plan;
use crate::resolve::Resolver;
use crate::rules;

/// The resolved body of one provider requirement.
#[derive(Debug)]
pub struct ProviderPlan {
    pub method: MethodRef,
    pub return_type: AstType,
    pub plan: Plan,
}

#[derive(Debug)]
pub struct ComponentPlan {
    pub component: ClassRef,
    /// The scope applied to the component, through itself or an ancestor.
    pub scope: Option<AstType>,
    /// One entry per requirement, in declaration order. Empty when
    /// generation failed.
    pub providers: Vec<ProviderPlan>,
    /// The error that aborted generation, if any.
    pub failure: Option<GenerateError>,
    /// Problems reported without aborting.
    pub diagnostics: Vec<Diagnostic>,
}

impl ComponentPlan {
    pub fn has_errors(&self) -> bool {
        self.failure.is_some() || self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Every diagnostic for this component, the aborting error last.
    pub fn all_diagnostics(&self) -> Vec<Diagnostic> {
        let mut all = self.diagnostics.clone();
        if let Some(failure) = &self.failure {
            all.push(failure.to_diagnostic());
        }
        all
    }
}

fn validate(component: &ClassRef) -> Result<(), GenerateError> {
    let message = if !component.is_abstract() {
        "must be abstract"
    } else if component.is_private() {
        "must not be private"
    } else {
        return Ok(());
    };
    Err(GenerateError::InvalidComponent {
        message: format!("@Component class: {} {}", component.ty(), message),
        element: component.element(),
    })
}

/// Resolve every provider requirement of `component`.
///
/// The first resolution failure aborts the component; problems found while
/// collecting bindings are reported alongside it.
pub fn plan_component(model: &dyn TypeModel, options: &Options, component: &ClassRef) -> ComponentPlan {
    debug!(component = %component.element(), "planning component");

    if let Err(failure) = validate(component) {
        return ComponentPlan {
            component: component.clone(),
            scope: None,
            providers: Vec::new(),
            failure: Some(failure),
            diagnostics: Vec::new(),
        };
    }

    let collector = TypeCollector::new(model, *options, component);
    let cycles = RefCell::new(CycleDetector::new());
    let context = Context::new(&collector, &cycles);
    let resolver = Resolver::new(model, options);

    let mut providers = Vec::new();
    let mut failure = None;
    for method in collector.provider_methods() {
        let return_type = method.return_type_for(component.as_ref());
        let key = TypeKey::new(return_type.clone(), rules::qualifier(method.as_ref(), options));
        let result = context
            .without_provider(return_type.clone())
            .use_element(&method.element(), |context| resolver.provide(&key, &context));
        match result {
            Ok(plan) => {
                debug!(provider = method.name(), %plan, "resolved");
                providers.push(ProviderPlan {
                    method: method.clone(),
                    return_type,
                    plan,
                });
            }
            Err(error) => {
                debug!(provider = method.name(), %error, "resolution failed");
                failure = Some(error);
                providers.clear();
                break;
            }
        }
    }

    ComponentPlan {
        component: component.clone(),
        scope: collector.scope_type().cloned(),
        providers,
        failure,
        diagnostics: collector.diagnostics().to_vec(),
    }
}
