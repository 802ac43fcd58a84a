//! Layout IR for generated source.
//!
//! Emitters describe code as a tree of text, line breaks and indentation;
//! the printer decides at each `Group` whether it fits on one line.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeIR {
    /// Literal text, emitted verbatim.
    Text(String),
    /// A space when flat; a newline plus indentation when broken.
    Space,
    /// Nothing when flat; a newline plus indentation when broken.
    SoftLine,
    /// Always a newline plus the current indentation.
    Hardline,
    /// Increase indentation for the child.
    Indent(Box<CodeIR>),
    /// Render the child flat if it fits in the remaining width, broken
    /// otherwise.
    Group(Box<CodeIR>),
    Concat(Vec<CodeIR>),
    Empty,
}

pub fn text(s: impl Into<String>) -> CodeIR {
    CodeIR::Text(s.into())
}

pub fn space() -> CodeIR {
    CodeIR::Space
}

pub fn softline() -> CodeIR {
    CodeIR::SoftLine
}

pub fn hardline() -> CodeIR {
    CodeIR::Hardline
}

pub fn indent(ir: CodeIR) -> CodeIR {
    CodeIR::Indent(Box::new(ir))
}

pub fn group(ir: CodeIR) -> CodeIR {
    CodeIR::Group(Box::new(ir))
}

pub fn concat(parts: Vec<CodeIR>) -> CodeIR {
    CodeIR::Concat(parts)
}

/// `open`, then `body` indented on its own lines, then `}`.
pub fn block(open: impl Into<String>, body: CodeIR) -> CodeIR {
    concat(vec![
        text(open),
        indent(concat(vec![hardline(), body])),
        hardline(),
        text("}"),
    ])
}

/// `items` separated by `,` and a breakable space, inside `open`/`close`.
/// When broken, each item goes on its own indented line.
pub fn delimited(open: &str, items: Vec<CodeIR>, close: &str) -> CodeIR {
    if items.is_empty() {
        return text(format!("{}{}", open, close));
    }
    let mut parts = vec![softline()];
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            parts.push(text(","));
            parts.push(space());
        }
        parts.push(item);
    }
    concat(vec![
        text(open),
        group(concat(vec![indent(concat(parts)), softline()])),
        text(close),
    ])
}
