//! Lowering construction plans to Kotlin expressions.

use inject_graph::Plan;
use inject_model::annotations::runtime::SCOPED_COMPONENT;
use inject_model::{AstType, MethodKind};

use crate::ir::{block, concat, delimited, text, CodeIR};

/// The expression that builds `plan`. Every type is written fully
/// qualified, so the generated file needs no imports.
pub fn expression(plan: &Plan) -> CodeIR {
    match plan {
        Plan::Provides {
            accessor,
            enter_scope,
            method,
            receiver,
            args,
        } => {
            let mut call = Vec::new();
            if let Some(receiver) = receiver {
                call.push(expression(receiver));
                call.push(text("."));
            }
            call.push(text(method.member_name()));
            if method.kind() == MethodKind::Function {
                call.push(arguments(args));
            }
            let call = concat(call);
            match accessor {
                Some(accessor) if *enter_scope => block(format!("with({}) {{", accessor), call),
                Some(accessor) => concat(vec![text(format!("{}.", accessor)), call]),
                None => call,
            }
        }
        Plan::Scoped {
            accessor,
            cache_key,
            inner,
            ..
        } => {
            let cache = match accessor {
                Some(accessor) => format!("({} as {})._scoped", accessor, SCOPED_COMPONENT),
                None => "_scoped".to_string(),
            };
            block(
                format!("{}.get(\"{}\") {{", cache, escape(cache_key)),
                expression(inner),
            )
        }
        Plan::Constructor { constructor, args } => {
            concat(vec![text(constructor.ty().qualified_name()), arguments(args)])
        }
        Plan::Container { creator, args } => concat(vec![text(*creator), arguments(args)]),
        Plan::Function { args, body } => lambda(args, expression(body)),
        Plan::NamedFunction {
            function,
            args,
            call_args,
        } => lambda(
            args,
            concat(vec![text(function.member_name()), arguments(call_args)]),
        ),
        Plan::Arg(name) => text(name.clone()),
        Plan::Lazy(inner) => block("lazy {", expression(inner)),
    }
}

fn arguments(args: &[Plan]) -> CodeIR {
    delimited("(", args.iter().map(expression).collect(), ")")
}

fn lambda(args: &[(AstType, String)], body: CodeIR) -> CodeIR {
    if args.is_empty() {
        return block("{", body);
    }
    let names: Vec<&str> = args.iter().map(|(_, name)| name.as_str()).collect();
    block(format!("{{ {} ->", names.join(", ")), body)
}

/// Escape `s` for a Kotlin string literal.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_string_templates() {
        assert_eq!(escape("a\"b$c"), "a\\\"b\\$c");
    }
}
