//! Component file generation.
//!
//! For a component `Foo` this produces `InjectFoo.kt`, holding the class
//! `InjectFoo` implementing every provider requirement, plus the `create`
//! factory functions.

use std::path::PathBuf;

use inject_common::Options;
use inject_graph::error::codes;
use inject_graph::{plan_component, ComponentPlan, ProviderPlan};
use inject_model::annotations::{self, runtime::{KCLASS, LAZY_MAP, SCOPED_COMPONENT}};
use inject_model::{AstParam, ClassRef, Diagnostic, Messenger, MethodKind, TypeModel};
use tracing::debug;

use crate::emit::expression;
use crate::ir::{concat, delimited, hardline, indent, text, CodeIR};
use crate::printer::{print, PrintConfig};

/// One generated compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub package: String,
    /// File and class name, without extension.
    pub name: String,
    pub contents: String,
}

impl GeneratedFile {
    /// `com/example/InjectFoo.kt` for package `com.example`.
    pub fn relative_path(&self) -> PathBuf {
        let mut path = PathBuf::new();
        for segment in self.package.split('.').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.push(format!("{}.kt", self.name));
        path
    }
}

/// The result of generating one component.
#[derive(Debug)]
pub struct Generated {
    pub file: GeneratedFile,
    pub diagnostics: Vec<Diagnostic>,
    /// Whether generation aborted and `file` is a stub.
    pub failed: bool,
}

pub struct InjectGenerator<'a> {
    model: &'a dyn TypeModel,
    options: Options,
}

impl<'a> InjectGenerator<'a> {
    pub fn new(model: &'a dyn TypeModel, options: Options) -> Self {
        InjectGenerator { model, options }
    }

    pub fn generate(&self, component: &ClassRef) -> Generated {
        let plan = plan_component(self.model, &self.options, component);
        let mut diagnostics = plan.all_diagnostics();
        let receiver = self.create_receiver(component, &mut diagnostics);
        let name = format!("Inject{}", component.name());

        let mut parts = Vec::new();
        if !component.package_name().is_empty() {
            parts.push(text(format!("package {}", component.package_name())));
            parts.push(hardline());
            parts.push(hardline());
        }
        parts.push(component_class(&name, &plan));
        for create in create_functions(&name, component, &receiver) {
            parts.push(hardline());
            parts.push(hardline());
            parts.push(create);
        }
        let contents = print(&concat(parts), &PrintConfig::default());

        debug!(
            component = %component.element(),
            providers = plan.providers.len(),
            failed = plan.failure.is_some(),
            "generated component"
        );
        Generated {
            file: GeneratedFile {
                package: component.package_name().to_string(),
                name,
                contents,
            },
            diagnostics,
            failed: plan.failure.is_some(),
        }
    }

    /// The receiver type of the `create` functions: the companion when
    /// companion extensions are on and one exists, `KClass<Component>`
    /// otherwise.
    fn create_receiver(&self, component: &ClassRef, diagnostics: &mut Vec<Diagnostic>) -> String {
        let class_receiver = format!("{}<{}>", KCLASS, component.ty().source_name());
        if !self.options.generate_companion_extensions {
            return class_receiver;
        }
        match component.companion() {
            Some(companion) => companion.ty().source_name(),
            None => {
                diagnostics.push(
                    Diagnostic::error(
                        format!(
                            "Missing companion for class: {}.\n\
                             When you have the option inject.generateCompanionExtensions=true you must declare \
                             a companion object on the component class for the extension function to apply to.\n\
                             You can do so by adding 'companion object' to the class.",
                            component.ty().source_name()
                        ),
                        Some(component.element()),
                    )
                    .with_code(codes::MISSING_COMPANION),
                );
                class_receiver
            }
        }
    }
}

fn parameters(component: &ClassRef) -> Vec<AstParam> {
    component
        .primary_constructor()
        .map(|c| c.parameters())
        .unwrap_or_default()
}

fn param_decl(param: &AstParam) -> CodeIR {
    text(format!("{}: {}", param.name, param.ty.source_name()))
}

/// Forwarded arguments, written flat: `a, b`.
fn names<'p>(params: impl IntoIterator<Item = &'p AstParam>) -> String {
    params
        .into_iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn component_class(name: &str, plan: &ComponentPlan) -> CodeIR {
    let component = &plan.component;
    let params = parameters(component);
    let non_default: Vec<&AstParam> = params.iter().filter(|p| !p.has_default).collect();
    let secondary = non_default.len() != params.len();
    let super_name = component.ty().source_name();

    let mut header = vec![text(format!("class {}", name))];
    if !params.is_empty() && !secondary {
        header.push(delimited("(", params.iter().map(param_decl).collect(), ")"));
    }
    header.push(text(" : "));
    if component.is_interface() || secondary {
        header.push(text(super_name));
    } else {
        header.push(text(format!("{}({})", super_name, names(&params))));
    }
    if plan.scope.is_some() {
        header.push(text(format!(", {}", SCOPED_COMPONENT)));
    }

    let mut members = Vec::new();
    if secondary {
        members.push(concat(vec![
            text("constructor"),
            delimited("(", params.iter().map(param_decl).collect(), ")"),
            text(format!(" : super({})", names(&params))),
        ]));
        members.push(concat(vec![
            text("constructor"),
            delimited("(", non_default.iter().map(|p| param_decl(p)).collect(), ")"),
            text(format!(
                " : super({})",
                non_default
                    .iter()
                    .map(|p| format!("{0} = {0}", p.name))
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        ]));
    }
    if plan.scope.is_some() {
        members.push(text(format!(
            "override val _scoped: {} = {}()",
            LAZY_MAP, LAZY_MAP
        )));
    }
    members.extend(plan.providers.iter().map(provider));

    if members.is_empty() {
        return concat(header);
    }
    let mut body = Vec::new();
    for (i, member) in members.into_iter().enumerate() {
        if i > 0 {
            body.push(hardline());
        }
        body.push(hardline());
        body.push(member);
    }
    header.push(text(" {"));
    header.push(indent(concat(body)));
    header.push(hardline());
    header.push(text("}"));
    concat(header)
}

fn provider(provider: &ProviderPlan) -> CodeIR {
    let method = &provider.method;
    let ty = provider.return_type.source_name();
    match method.kind() {
        MethodKind::Property => concat(vec![
            text(format!("override val {}: {}", method.name(), ty)),
            indent(concat(vec![
                hardline(),
                text("get() = "),
                expression(&provider.plan),
            ])),
        ]),
        MethodKind::Function => {
            let suspend = if method.is_suspend() { "suspend " } else { "" };
            concat(vec![
                text(format!("override {}fun {}(): {} = ", suspend, method.name(), ty)),
                expression(&provider.plan),
            ])
        }
    }
}

/// One `create` with every constructor parameter, and a second one without
/// the defaulted ones when there are any.
fn create_functions(name: &str, component: &ClassRef, receiver: &str) -> Vec<CodeIR> {
    let params = parameters(component);
    let ty = component.ty().source_name();
    let create = |params: &[&AstParam]| {
        concat(vec![
            text(format!("fun {}.create", receiver)),
            delimited("(", params.iter().map(|p| param_decl(p)).collect(), ")"),
            text(format!(": {} = {}({})", ty, name, names(params.iter().copied()))),
        ])
    };
    let all: Vec<&AstParam> = params.iter().collect();
    let non_default: Vec<&AstParam> = params.iter().filter(|p| !p.has_default).collect();
    let mut functions = vec![create(&all)];
    if non_default.len() != all.len() {
        functions.push(create(&non_default));
    }
    functions
}

/// Generate every `@Component` class in `model`, reporting diagnostics to
/// `messenger`. Components that fail still produce a stub file.
pub fn process(model: &dyn TypeModel, options: &Options, messenger: &dyn Messenger) -> Vec<GeneratedFile> {
    let generator = InjectGenerator::new(model, *options);
    let components = model.classes_annotated_with(annotations::COMPONENT);
    debug!(count = components.len(), "processing components");
    components
        .iter()
        .map(|component| {
            let generated = generator.generate(component);
            for diagnostic in generated.diagnostics {
                messenger.report(diagnostic);
            }
            generated.file
        })
        .collect()
}
