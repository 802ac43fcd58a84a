//! Shared types for the inject graph compiler.
//!
//! - [`span`]: byte-offset source spans and on-demand line/column lookup
//! - [`options`]: the configuration surface consumed by the resolver and emitter

pub mod options;
pub mod span;

pub use options::Options;
pub use span::{LineIndex, Span};
