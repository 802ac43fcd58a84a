//! Kotlin source generation for inject components.
//!
//! [`process`] plans every `@Component` class in a model and renders the
//! plans through a small layout IR ([`ir`]) and printer ([`printer`]).

pub mod emit;
pub mod generator;
pub mod ir;
pub mod printer;

pub use generator::{process, Generated, GeneratedFile, InjectGenerator};
pub use printer::PrintConfig;
