//! Calculation sessions: rate resolution followed by projection
//!
//! A session runs at most one calculation at a time. A `run` issued while
//! another is in flight is rejected with [`SessionError::Busy`] rather than
//! queued, so a stale calculation can never overwrite a newer one.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{info, warn};
use parking_lot::Mutex;

use crate::error::SessionError;
use crate::projection::{CapitalInputs, ProjectionEngine, ProjectionResult};
use crate::rates::{InstrumentDescriptor, RateResolution, RateResolver};
use crate::record::SimulationRecord;

/// Whether a calculation is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Running,
}

/// A completed calculation
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub instrument: InstrumentDescriptor,
    pub capital: CapitalInputs,
    /// Rate the projection used, possibly a fallback
    pub rate: RateResolution,
    pub result: ProjectionResult,
}

impl Calculation {
    /// Non-fatal warning to show alongside the result when a fallback rate was used
    pub fn warning(&self) -> Option<&str> {
        if self.rate.success {
            None
        } else {
            Some(
                self.rate
                    .message
                    .as_deref()
                    .unwrap_or("Using fallback rate."),
            )
        }
    }

    /// Record shape handed to a persistence collaborator
    pub fn to_record(&self, created_at: DateTime<Utc>) -> SimulationRecord {
        SimulationRecord::from_calculation(self, created_at)
    }
}

/// How the last calculation ended
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Completed(Calculation),
    Failed(SessionError),
}

#[derive(Debug)]
struct SessionState {
    status: SessionStatus,
    /// True while the run is still resolving its rate
    cancellable: bool,
    cancel_requested: bool,
    last_outcome: Option<SessionOutcome>,
}

/// Orchestrates [`RateResolver`] and [`ProjectionEngine`] for one caller
pub struct CalculationSession {
    resolver: Arc<RateResolver>,
    engine: ProjectionEngine,
    state: Mutex<SessionState>,
}

impl CalculationSession {
    pub fn new(resolver: Arc<RateResolver>, engine: ProjectionEngine) -> Self {
        Self {
            resolver,
            engine,
            state: Mutex::new(SessionState {
                status: SessionStatus::Idle,
                cancellable: false,
                cancel_requested: false,
                last_outcome: None,
            }),
        }
    }

    /// Resolve the instrument's rate, then project the capital inputs.
    ///
    /// A fallback rate does not abort the run; it is reported through
    /// [`Calculation::warning`]. Fails with `Busy` when a run is already in
    /// flight, `Cancelled` when [`cancel`](Self::cancel) was called before the
    /// projection started, and `InvalidInput` when the engine rejects the inputs.
    pub async fn run(
        &self,
        instrument: &InstrumentDescriptor,
        capital: CapitalInputs,
    ) -> Result<Calculation, SessionError> {
        let _guard = self.begin()?;

        let rate = self.resolver.resolve(instrument).await;

        let outcome = if self.take_cancel_request() {
            Err(SessionError::Cancelled)
        } else {
            self.engine
                .project(&capital.with_rate(rate.monthly_rate))
                .map(|result| Calculation {
                    instrument: instrument.clone(),
                    capital,
                    rate,
                    result,
                })
                .map_err(SessionError::from)
        };

        match &outcome {
            Ok(calculation) => info!(
                "Calculation for {} completed: gross {:.2} over {} months",
                instrument,
                calculation.result.gross_future_value,
                capital.horizon_months
            ),
            Err(e) => warn!("Calculation for {} failed: {}", instrument, e),
        }

        self.state.lock().last_outcome = Some(match &outcome {
            Ok(calculation) => SessionOutcome::Completed(calculation.clone()),
            Err(e) => SessionOutcome::Failed(e.clone()),
        });

        outcome
    }

    /// Flag the running calculation for cancellation.
    ///
    /// The flag is checked once, after rate resolution and before projecting.
    /// Returns true only when the request will take effect; false when nothing
    /// is running or the run has already moved past that check.
    pub fn cancel(&self) -> bool {
        let mut state = self.state.lock();
        if state.status == SessionStatus::Running && state.cancellable {
            state.cancel_requested = true;
            true
        } else {
            false
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.state.lock().status
    }

    pub fn is_running(&self) -> bool {
        self.status() == SessionStatus::Running
    }

    pub fn last_outcome(&self) -> Option<SessionOutcome> {
        self.state.lock().last_outcome.clone()
    }

    /// Last completed calculation, if the last run succeeded
    pub fn last_calculation(&self) -> Option<Calculation> {
        match self.last_outcome() {
            Some(SessionOutcome::Completed(calculation)) => Some(calculation),
            _ => None,
        }
    }

    /// Error from the last run, if it failed
    pub fn last_error(&self) -> Option<SessionError> {
        match self.last_outcome() {
            Some(SessionOutcome::Failed(e)) => Some(e),
            _ => None,
        }
    }

    fn begin(&self) -> Result<RunGuard<'_>, SessionError> {
        let mut state = self.state.lock();
        if state.status == SessionStatus::Running {
            warn!("Rejected calculation: session busy");
            return Err(SessionError::Busy);
        }
        state.status = SessionStatus::Running;
        state.cancellable = true;
        state.cancel_requested = false;
        Ok(RunGuard { session: self })
    }

    /// Close the cancellation window, reporting whether a cancel arrived in it
    fn take_cancel_request(&self) -> bool {
        let mut state = self.state.lock();
        state.cancellable = false;
        std::mem::take(&mut state.cancel_requested)
    }
}

/// Returns the session to `Idle` however the run ends, including when the
/// future is dropped mid-await.
struct RunGuard<'a> {
    session: &'a CalculationSession,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.session.state.lock();
        state.status = SessionStatus::Idle;
        state.cancellable = false;
        state.cancel_requested = false;
    }
}
