use std::num::NonZeroI32;

use crate::{Model, SimulationData, SolverCursor, StepFault};

/// Outcome reported by an integrator for one step.
///
/// A failed status is not a fault: the driver commits the step's bookkeeping
/// and then ends the run with the integrator's method-specific code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Success,
    Failed(NonZeroI32),
}

impl StepStatus {
    /// Converts a raw status code, where zero means success.
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        NonZeroI32::new(code).map_or(Self::Success, Self::Failed)
    }

    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failed(code) => code.get(),
        }
    }

    #[must_use]
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

/// An integration method that advances the model by one step.
///
/// The driver sets `cursor.step_size` before each call.
/// A successful step leaves the integrated states in the current generation of
/// `data` and advances `cursor.current_time` by the step it actually took.
/// Method-private state (step-size controllers, Jacobians, statistics) lives
/// in the implementing type.
pub trait Integrator<M: Model> {
    /// A short name for the active method, used in diagnostics.
    fn name(&self) -> &str;

    /// Attempts one integration step.
    ///
    /// # Errors
    ///
    /// Returns a [`StepFault`] for numerical exceptions the driver should
    /// recover from by retrying with a smaller step.
    fn step(
        &mut self,
        model: &M,
        data: &mut SimulationData<M::State>,
        cursor: &mut SolverCursor,
    ) -> Result<StepStatus, StepFault>;

    /// Folds statistics gathered since the last event into the run totals.
    ///
    /// Called after every committed step that ended in an event or a state
    /// reselection, before the method restarts from the new baseline.
    fn merge_event_statistics(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_code_is_success() {
        assert_eq!(StepStatus::from_code(0), StepStatus::Success);
        assert!(StepStatus::from_code(0).is_success());
    }

    #[test]
    fn nonzero_code_round_trips() {
        let status = StepStatus::from_code(-7);
        assert!(!status.is_success());
        assert_eq!(status.code(), -7);
    }
}
