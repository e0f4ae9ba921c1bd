//! Investment Simulator - deterministic projection engine for savings plans
//!
//! This library provides:
//! - Month-by-month accumulation projections with inflation adjustment
//! - Monthly rate resolution for fixed-income products and equities
//! - Calculation sessions guarding against overlapping runs
//! - What-if scenarios, record comparison and batch projections

pub mod config;
pub mod error;
pub mod locale;
pub mod projection;
pub mod rates;
pub mod record;
pub mod scenario;
pub mod session;

// Re-export commonly used types
pub use config::{ProviderConfig, ResolverConfig};
pub use error::{LoadError, ProjectionError, ProviderError, SessionError};
pub use projection::{CapitalInputs, ProjectionEngine, ProjectionInput, ProjectionPoint, ProjectionResult};
pub use rates::{InstrumentDescriptor, InstrumentType, RateResolution, RateResolver};
pub use record::SimulationRecord;
pub use scenario::ScenarioRunner;
pub use session::{Calculation, CalculationSession, SessionStatus};
