//! Binding resolution for inject components.
//!
//! For one component class this crate collects the available bindings
//! ([`TypeCollector`]), then resolves every provider requirement into a
//! construction [`Plan`] ([`Resolver`]), tracking the active path with a
//! [`CycleDetector`]. [`plan_component`] ties the steps together; turning
//! plans into source is left to the code generator.

pub mod collector;
pub mod component;
pub mod context;
pub mod cycle;
pub mod diagnostics;
pub mod error;
pub mod key;
pub mod plan;
pub mod resolve;
pub mod rules;

pub use collector::{MethodCreator, ScopeOwner, TypeCollector, TypeCreator};
pub use component::{plan_component, ComponentPlan, ProviderPlan};
pub use context::Context;
pub use cycle::{CycleDetector, CycleResult};
pub use error::GenerateError;
pub use key::TypeKey;
pub use plan::Plan;
pub use resolve::Resolver;
