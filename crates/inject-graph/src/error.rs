//! Errors that abort generation of a component.

use inject_model::{AstType, Diagnostic, Element};

use crate::key::TypeKey;

/// A failure that stops generation of the current component. A stub is still
/// emitted for it; other components carry on.
///
/// Resolution failures carry the active resolution path, most recent first.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GenerateError {
    /// The component declaration itself is unusable.
    #[error("{message}")]
    InvalidComponent { message: String, element: Element },

    #[error("Cannot find an @Inject constructor or provider for: {key}")]
    NoBinding {
        key: TypeKey,
        trace: Vec<String>,
        element: Element,
    },

    #[error("Cycle detected")]
    Cycle { trace: Vec<String>, element: Element },

    /// A scoped class was requested but no component in reach owns its scope.
    #[error("Cannot find component with scope: @{scope} to inject {ty}")]
    UnresolvableScope {
        ty: AstType,
        scope: AstType,
        trace: Vec<String>,
        element: Element,
    },

    /// The cycle detector classified an entry as breakable through a lazy
    /// binding. Breaking cycles that way is not supported.
    #[error("Cycle through a lazy binding cannot be resolved")]
    LazyCycle { trace: Vec<String>, element: Element },
}

impl GenerateError {
    pub fn element(&self) -> &Element {
        match self {
            GenerateError::InvalidComponent { element, .. }
            | GenerateError::NoBinding { element, .. }
            | GenerateError::Cycle { element, .. }
            | GenerateError::UnresolvableScope { element, .. }
            | GenerateError::LazyCycle { element, .. } => element,
        }
    }

    pub fn trace(&self) -> &[String] {
        match self {
            GenerateError::InvalidComponent { .. } => &[],
            GenerateError::NoBinding { trace, .. }
            | GenerateError::Cycle { trace, .. }
            | GenerateError::UnresolvableScope { trace, .. }
            | GenerateError::LazyCycle { trace, .. } => trace,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            GenerateError::InvalidComponent { .. } => "E0001",
            GenerateError::NoBinding { .. } => "E0002",
            GenerateError::Cycle { .. } => "E0003",
            GenerateError::UnresolvableScope { .. } => "E0004",
            GenerateError::LazyCycle { .. } => "E0005",
        }
    }

    /// The message followed by the resolution trace, one element per line.
    pub fn full_message(&self) -> String {
        let mut message = self.to_string();
        for line in self.trace() {
            message.push('\n');
            message.push_str(line);
        }
        message
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.to_string(), Some(self.element().clone()))
            .with_code(self.code())
            .with_notes(self.trace().to_vec())
    }
}

/// Codes for problems that are reported without aborting generation.
pub mod codes {
    pub const CONFLICTING_SCOPES: &str = "E0006";
    pub const DUPLICATE_BINDING: &str = "E0007";
    pub const INVALID_PROVIDES: &str = "E0008";
    pub const INVALID_COMPONENT_PARAM: &str = "E0009";
    pub const MISSING_COMPANION: &str = "E0010";
}
