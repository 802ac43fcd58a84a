//! Stack-based printer for [`CodeIR`].

use crate::ir::CodeIR;

#[derive(Debug, Clone)]
pub struct PrintConfig {
    /// Spaces per indentation level. Default: 4.
    pub indent_size: usize,
    /// Width at which groups break. Default: 100.
    pub max_width: usize,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            indent_size: 4,
            max_width: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Flat,
    Break,
}

#[derive(Debug)]
struct PrintCmd<'a> {
    indent: usize,
    mode: Mode,
    ir: &'a CodeIR,
}

/// Output buffer that writes indentation lazily, so blank lines carry no
/// trailing whitespace.
struct Writer {
    out: String,
    col: usize,
    pending_indent: Option<usize>,
}

impl Writer {
    fn text(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        if let Some(indent) = self.pending_indent.take() {
            self.out.push_str(&" ".repeat(indent));
        }
        self.out.push_str(s);
        self.col += s.len();
    }

    fn newline(&mut self, indent: usize) {
        self.out.push('\n');
        self.col = indent;
        self.pending_indent = Some(indent);
    }
}

/// Render `ir`, ending with a single newline.
pub fn print(ir: &CodeIR, config: &PrintConfig) -> String {
    let mut writer = Writer {
        out: String::new(),
        col: 0,
        pending_indent: None,
    };
    let mut stack = vec![PrintCmd {
        indent: 0,
        mode: Mode::Break,
        ir,
    }];

    while let Some(cmd) = stack.pop() {
        match cmd.ir {
            CodeIR::Empty => {}
            CodeIR::Text(s) => writer.text(s),
            CodeIR::Space => match cmd.mode {
                Mode::Flat => writer.text(" "),
                Mode::Break => writer.newline(cmd.indent),
            },
            CodeIR::SoftLine => {
                if cmd.mode == Mode::Break {
                    writer.newline(cmd.indent);
                }
            }
            CodeIR::Hardline => writer.newline(cmd.indent),
            CodeIR::Indent(child) => stack.push(PrintCmd {
                indent: cmd.indent + config.indent_size,
                mode: cmd.mode,
                ir: child,
            }),
            CodeIR::Group(child) => {
                let fits = writer.col.saturating_add(measure_flat(child)) <= config.max_width;
                stack.push(PrintCmd {
                    indent: cmd.indent,
                    mode: if fits { Mode::Flat } else { Mode::Break },
                    ir: child,
                });
            }
            CodeIR::Concat(parts) => {
                for part in parts.iter().rev() {
                    stack.push(PrintCmd {
                        indent: cmd.indent,
                        mode: cmd.mode,
                        ir: part,
                    });
                }
            }
        }
    }

    let mut out = writer.out;
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Width of `ir` rendered flat; `usize::MAX` if it contains a hard line.
fn measure_flat(ir: &CodeIR) -> usize {
    match ir {
        CodeIR::Empty | CodeIR::SoftLine => 0,
        CodeIR::Text(s) => s.len(),
        CodeIR::Space => 1,
        CodeIR::Hardline => usize::MAX,
        CodeIR::Indent(child) | CodeIR::Group(child) => measure_flat(child),
        CodeIR::Concat(parts) => {
            let mut total: usize = 0;
            for part in parts {
                total = total.saturating_add(measure_flat(part));
                if total == usize::MAX {
                    break;
                }
            }
            total
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::*;

    fn narrow(max_width: usize) -> PrintConfig {
        PrintConfig {
            indent_size: 4,
            max_width,
        }
    }

    #[test]
    fn arguments_stay_flat_when_they_fit() {
        let ir = concat(vec![
            text("Foo"),
            delimited("(", vec![text("a"), text("b")], ")"),
        ]);
        assert_eq!(print(&ir, &PrintConfig::default()), "Foo(a, b)\n");
    }

    #[test]
    fn arguments_break_one_per_line() {
        let ir = concat(vec![
            text("Foo"),
            delimited("(", vec![text("first"), text("second")], ")"),
        ]);
        assert_eq!(print(&ir, &narrow(10)), "Foo(\n    first,\n    second\n)\n");
    }

    #[test]
    fn blocks_indent_their_body() {
        let ir = block("lazy {", block("with(a) {", text("b")));
        assert_eq!(
            print(&ir, &PrintConfig::default()),
            "lazy {\n    with(a) {\n        b\n    }\n}\n"
        );
    }

    #[test]
    fn blank_lines_have_no_trailing_spaces() {
        let ir = indent(concat(vec![
            text("a"),
            hardline(),
            hardline(),
            text("b"),
        ]));
        assert_eq!(print(&ir, &PrintConfig::default()), "a\n\n    b\n");
    }

    #[test]
    fn hard_lines_force_groups_to_break() {
        let ir = concat(vec![
            text("Foo"),
            delimited("(", vec![block("lazy {", text("x"))], ")"),
        ]);
        assert_eq!(
            print(&ir, &PrintConfig::default()),
            "Foo(\n    lazy {\n        x\n    }\n)\n"
        );
    }

    #[test]
    fn empty_arguments() {
        let ir = concat(vec![text("Foo"), delimited("(", Vec::new(), ")")]);
        assert_eq!(print(&ir, &PrintConfig::default()), "Foo()\n");
    }
}
