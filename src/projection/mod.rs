//! Projection engine for monthly accumulation projections

mod engine;
mod input;
mod trajectory;

pub use engine::{deflate, ProjectionConfig, ProjectionEngine};
pub use input::{CapitalInputs, ProjectionInput, MAX_HORIZON_MONTHS};
pub use trajectory::{round_to_cents, ProjectionPoint, ProjectionResult, ProjectionSummary};
