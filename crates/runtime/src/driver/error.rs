use std::num::NonZeroI32;

use uom::si::f64::Time;
use weft_core::{SolverFailure, StepFault, seconds};

/// Errors that end a run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("integrator failed with status {status} at time {}", secs(.time))]
    IntegratorFailed { status: NonZeroI32, time: Time },

    #[error("non-linear system solver failed at time {}", secs(.time))]
    NonlinearSolverFailed { time: Time },

    #[error("linear system solver failed at time {}", secs(.time))]
    LinearSolverFailed { time: Time },

    #[error("mixed system solver failed at time {}", secs(.time))]
    MixedSolverFailed { time: Time },

    /// The step after the last committed time faulted again on its retry.
    ///
    /// `time` is the last committed time, which the run was rolled back to.
    #[error("retried step after time {} failed", secs(.time))]
    RetryExhausted {
        time: Time,
        #[source]
        source: StepFault,
    },
}

impl Error {
    /// Returns the numeric termination code for this error.
    ///
    /// Codes are always negative. An integrator status `s` maps to `-1 + s`
    /// for negative statuses and `-1 - s` for positive ones.
    ///
    /// Integrator codes share the number range of the fixed codes: status `-1`
    /// gives `-2` like a nonlinear solver failure, and status `-4` gives `-5`
    /// like an exhausted retry. Match on the variant to tell them apart.
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            Self::IntegratorFailed { status, .. } => {
                (-1_i32).saturating_sub(status.get().saturating_abs())
            }
            Self::NonlinearSolverFailed { .. } => -2,
            Self::LinearSolverFailed { .. } => -3,
            Self::MixedSolverFailed { .. } => -4,
            Self::RetryExhausted { .. } => -5,
        }
    }

    /// Returns the simulation time at which the run ended.
    #[must_use]
    pub fn time(&self) -> Time {
        match self {
            Self::IntegratorFailed { time, .. }
            | Self::NonlinearSolverFailed { time }
            | Self::LinearSolverFailed { time }
            | Self::MixedSolverFailed { time }
            | Self::RetryExhausted { time, .. } => *time,
        }
    }

    pub(crate) fn solver(failure: SolverFailure, time: Time) -> Self {
        match failure {
            SolverFailure::Nonlinear => Self::NonlinearSolverFailed { time },
            SolverFailure::Linear => Self::LinearSolverFailed { time },
            SolverFailure::Mixed => Self::MixedSolverFailed { time },
        }
    }
}

fn secs(time: &Time) -> f64 {
    seconds(*time)
}
