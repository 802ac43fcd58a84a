//! Construction plans: how one requested value gets built.

use std::fmt;

use inject_model::{AstType, ClassRef, ConstructorRef, MethodRef};

/// A node of the construction plan. The tree mirrors the object graph the
/// generated code builds at runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Plan {
    /// Call a member. `accessor` reaches the declaring instance; with
    /// `enter_scope` the call is wrapped in `with(accessor) { ... }` so an
    /// extension receiver declared on a parent component resolves.
    Provides {
        accessor: Option<String>,
        enter_scope: bool,
        method: MethodRef,
        receiver: Option<Box<Plan>>,
        args: Vec<Plan>,
    },
    /// Fetch from (or fill) the owner's `_scoped` cache under `cache_key`.
    Scoped {
        accessor: Option<String>,
        owner: ClassRef,
        cache_key: String,
        inner: Box<Plan>,
    },
    Constructor {
        constructor: ConstructorRef,
        args: Vec<Plan>,
    },
    /// A collection builder call over multibound members.
    Container {
        creator: &'static str,
        args: Vec<Plan>,
    },
    /// A lambda over `args` whose body is `body`.
    Function {
        args: Vec<(AstType, String)>,
        body: Box<Plan>,
    },
    /// A lambda over `args` calling an injectable top-level function.
    NamedFunction {
        function: MethodRef,
        args: Vec<(AstType, String)>,
        call_args: Vec<Plan>,
    },
    /// A reference to a lambda parameter.
    Arg(String),
    Lazy(Box<Plan>),
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Plan]) -> fmt::Result {
    for item in items {
        write!(f, ", {}", item)?;
    }
    Ok(())
}

fn write_params(f: &mut fmt::Formatter<'_>, args: &[(AstType, String)]) -> fmt::Result {
    if args.is_empty() {
        return Ok(());
    }
    let names: Vec<&str> = args.iter().map(|(_, name)| name.as_str()).collect();
    write!(f, "{} -> ", names.join(", "))
}

/// A compact one-line rendering of the tree, for logs and tests.
impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plan::Provides {
                accessor,
                method,
                receiver,
                args,
                ..
            } => {
                write!(f, "Provides(")?;
                if let Some(accessor) = accessor {
                    write!(f, "{}.", accessor)?;
                }
                write!(f, "{}", method.name())?;
                if let Some(receiver) = receiver {
                    write!(f, ", receiver: {}", receiver)?;
                }
                write_list(f, args)?;
                write!(f, ")")
            }
            Plan::Scoped { inner, .. } => write!(f, "Scoped({})", inner),
            Plan::Constructor { constructor, args } => {
                write!(f, "Constructor({}", constructor.ty())?;
                write_list(f, args)?;
                write!(f, ")")
            }
            Plan::Container { creator, args } => {
                write!(f, "Container({}", creator)?;
                write_list(f, args)?;
                write!(f, ")")
            }
            Plan::Function { args, body } => {
                write!(f, "Function(")?;
                write_params(f, args)?;
                write!(f, "{})", body)
            }
            Plan::NamedFunction {
                function,
                args,
                call_args,
            } => {
                write!(f, "NamedFunction(")?;
                write_params(f, args)?;
                write!(f, "{}", function.member_name())?;
                write_list(f, call_args)?;
                write!(f, ")")
            }
            Plan::Arg(name) => write!(f, "Arg({})", name),
            Plan::Lazy(inner) => write!(f, "Lazy({})", inner),
        }
    }
}
