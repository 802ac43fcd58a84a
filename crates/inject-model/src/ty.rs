//! Type representation shared by every front end.
//!
//! `AstType` is a plain value: two types are the same type when they name the
//! same declaration with the same arguments, no matter which front-end object
//! produced them. That is what lets `TypeKey` use it as a hash-map key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Packages whose members are visible without an import. Types from these
/// packages render by simple name.
const DEFAULT_IMPORTS: &[&str] = &[
    "kotlin",
    "kotlin.annotation",
    "kotlin.collections",
    "kotlin.comparisons",
    "kotlin.io",
    "kotlin.ranges",
    "kotlin.sequences",
    "kotlin.text",
];

/// A declared type: a named declaration applied to type arguments.
///
/// A type alias keeps its own name and records the aliased type in `alias`;
/// [`AstType::resolved_type`] follows the chain.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "TypeRepr")]
pub struct AstType {
    pub package: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<AstType>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<Box<AstType>>,
}

/// Types the resolver synthesizes itself, through
/// [`TypeModel::declared_type_of`](crate::TypeModel::declared_type_of).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KnownType {
    Set,
    Map,
    Pair,
    Lazy,
}

impl KnownType {
    pub fn package(self) -> &'static str {
        match self {
            KnownType::Set | KnownType::Map => "kotlin.collections",
            KnownType::Pair | KnownType::Lazy => "kotlin",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            KnownType::Set => "Set",
            KnownType::Map => "Map",
            KnownType::Pair => "Pair",
            KnownType::Lazy => "Lazy",
        }
    }
}

impl AstType {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        AstType {
            package: package.into(),
            name: name.into(),
            arguments: Vec::new(),
            nullable: false,
            alias: None,
        }
    }

    /// Build a type from a qualified name such as `com.example.Foo`.
    ///
    /// The last dot separates package from name; a trailing `?` marks the
    /// type nullable.
    pub fn named(qualified: &str) -> Self {
        let (qualified, nullable) = match qualified.strip_suffix('?') {
            Some(rest) => (rest, true),
            None => (qualified, false),
        };
        let mut ty = match qualified.rsplit_once('.') {
            Some((package, name)) => AstType::new(package, name),
            None => AstType::new("", qualified),
        };
        ty.nullable = nullable;
        ty
    }

    pub fn known(known: KnownType, arguments: Vec<AstType>) -> Self {
        AstType::new(known.package(), known.name()).with_arguments(arguments)
    }

    /// A `kotlin.FunctionN` type over `params` returning `ret`.
    pub fn function(params: Vec<AstType>, ret: AstType) -> Self {
        let mut arguments = params;
        let name = format!("Function{}", arguments.len());
        arguments.push(ret);
        AstType::new("kotlin", name).with_arguments(arguments)
    }

    /// A type alias named `package.name` standing for `target`.
    pub fn alias(package: impl Into<String>, name: impl Into<String>, target: AstType) -> Self {
        let mut ty = AstType::new(package, name);
        ty.alias = Some(Box::new(target));
        ty
    }

    pub fn unit() -> Self {
        AstType::new("kotlin", "Unit")
    }

    pub fn lazy(inner: AstType) -> Self {
        AstType::known(KnownType::Lazy, vec![inner])
    }

    pub fn with_arguments(mut self, arguments: Vec<AstType>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn make_nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// The same type without the nullable marker.
    pub fn non_null(&self) -> AstType {
        let mut ty = self.clone();
        ty.nullable = false;
        ty
    }

    /// `package.name`, or just `name` in the root package.
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    /// Follow type aliases down to the underlying type.
    pub fn resolved_type(&self) -> &AstType {
        let mut ty = self;
        while let Some(target) = &ty.alias {
            ty = target;
        }
        ty
    }

    pub fn is_type_alias(&self) -> bool {
        self.alias.is_some()
    }

    pub fn is_unit(&self) -> bool {
        let ty = self.resolved_type();
        ty.package == "kotlin" && ty.name == "Unit"
    }

    /// Whether the underlying type is a `kotlin.FunctionN`. The last type
    /// argument is the return type.
    pub fn is_function(&self) -> bool {
        let ty = self.resolved_type();
        ty.package == "kotlin"
            && !ty.arguments.is_empty()
            && ty
                .name
                .strip_prefix("Function")
                .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
    }

    pub fn is_known(&self, known: KnownType) -> bool {
        let ty = self.resolved_type();
        ty.package == known.package() && ty.name == known.name()
    }

    fn display_name(&self) -> String {
        if DEFAULT_IMPORTS.contains(&self.package.as_str()) {
            self.name.clone()
        } else {
            self.qualified_name()
        }
    }
}

impl AstType {
    /// The type as written in generated source: every name fully qualified.
    pub fn source_name(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_to(&mut out, true);
        out
    }

    fn write_to(&self, f: &mut impl fmt::Write, qualified: bool) -> fmt::Result {
        let name = if qualified {
            self.qualified_name()
        } else {
            self.display_name()
        };
        if self.alias.is_none() && self.is_function() {
            let (ret, params) = match self.arguments.split_last() {
                Some(split) => split,
                None => return write!(f, "{}", name),
            };
            if self.nullable {
                write!(f, "(")?;
            }
            write!(f, "(")?;
            for (i, p) in params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                p.write_to(f, qualified)?;
            }
            write!(f, ") -> ")?;
            ret.write_to(f, qualified)?;
            if self.nullable {
                write!(f, ")?")?;
            }
            return Ok(());
        }
        write!(f, "{}", name)?;
        if !self.arguments.is_empty() {
            write!(f, "<")?;
            for (i, a) in self.arguments.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                a.write_to(f, qualified)?;
            }
            write!(f, ">")?;
        }
        if self.nullable {
            write!(f, "?")?;
        }
        Ok(())
    }
}

impl fmt::Display for AstType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f, false)
    }
}

impl From<&str> for AstType {
    fn from(qualified: &str) -> Self {
        AstType::named(qualified)
    }
}

/// Wire form of a type: either a qualified-name string or a full object.
#[derive(Deserialize)]
#[serde(untagged)]
enum TypeRepr {
    Name(String),
    Full {
        #[serde(default)]
        package: String,
        name: String,
        #[serde(default)]
        arguments: Vec<AstType>,
        #[serde(default)]
        nullable: bool,
        #[serde(default)]
        alias: Option<Box<AstType>>,
    },
}

impl From<TypeRepr> for AstType {
    fn from(repr: TypeRepr) -> Self {
        match repr {
            TypeRepr::Name(name) => AstType::named(&name),
            TypeRepr::Full {
                package,
                name,
                arguments,
                nullable,
                alias,
            } => AstType {
                package,
                name,
                arguments,
                nullable,
                alias,
            },
        }
    }
}

/// An annotation use. Identity is the annotation's type alone.
///
/// `meta` lists the qualified names of the annotations declared on the
/// annotation class itself (`@Scope`, `@Qualifier`, ...).
#[derive(Clone, Debug)]
pub struct AstAnnotation {
    pub ty: AstType,
    pub meta: Vec<String>,
}

impl AstAnnotation {
    pub fn new(ty: AstType) -> Self {
        AstAnnotation { ty, meta: Vec::new() }
    }

    pub fn with_meta(mut self, meta: Vec<String>) -> Self {
        self.meta = meta;
        self
    }

    pub fn is_annotated_with(&self, class_name: &str) -> bool {
        self.meta.iter().any(|m| m == class_name)
    }
}

impl PartialEq for AstAnnotation {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty
    }
}

impl Eq for AstAnnotation {}

impl std::hash::Hash for AstAnnotation {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.ty.hash(state);
    }
}

impl fmt::Display for AstAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.ty)
    }
}
