use std::fmt::Debug;

use crate::{SimulationData, StepFault, Temporal};

/// Model-specific behavior a driver evaluates around each integration step.
///
/// After every successful integration step the driver calls, in this order:
///
/// 1. [`update_inputs`](Self::update_inputs)
/// 2. [`evaluate_derivatives`](Self::evaluate_derivatives)
/// 3. [`evaluate_algebraics`](Self::evaluate_algebraics)
/// 4. [`update_outputs`](Self::update_outputs)
/// 5. [`store_delayed`](Self::store_delayed)
///
/// and later [`check_asserts`](Self::check_asserts) and
/// [`check_termination`](Self::check_termination).
/// Each callback works on the current generation of the run's
/// [`SimulationData`] and must not keep references to it past the call.
///
/// Only [`evaluate_derivatives`](Self::evaluate_derivatives) is required; the
/// other callbacks default to doing nothing.
pub trait Model {
    /// A full snapshot of the model's continuous states and algebraic variables.
    type State: Temporal + Clone + Debug;

    /// Refreshes the model inputs for the current time.
    ///
    /// # Errors
    ///
    /// Returns a [`StepFault`] if the inputs cannot be evaluated.
    fn update_inputs(&self, _data: &mut SimulationData<Self::State>) -> Result<(), StepFault> {
        Ok(())
    }

    /// Evaluates the state derivatives at the current generation.
    ///
    /// # Errors
    ///
    /// Returns a [`StepFault`] if the derivatives cannot be evaluated.
    fn evaluate_derivatives(&self, data: &mut SimulationData<Self::State>)
    -> Result<(), StepFault>;

    /// Evaluates the algebraic variables at the current generation.
    ///
    /// # Errors
    ///
    /// Returns a [`StepFault`] if an algebraic system cannot be solved.
    fn evaluate_algebraics(
        &self,
        _data: &mut SimulationData<Self::State>,
    ) -> Result<(), StepFault> {
        Ok(())
    }

    /// Refreshes the model outputs from the current generation.
    ///
    /// # Errors
    ///
    /// Returns a [`StepFault`] if the outputs cannot be evaluated.
    fn update_outputs(&self, _data: &mut SimulationData<Self::State>) -> Result<(), StepFault> {
        Ok(())
    }

    /// Records values needed later by delay expressions.
    ///
    /// # Errors
    ///
    /// Returns a [`StepFault`] if the delay buffers cannot be updated.
    fn store_delayed(&self, _data: &mut SimulationData<Self::State>) -> Result<(), StepFault> {
        Ok(())
    }

    /// Checks model assertions such as variable range limits.
    ///
    /// # Errors
    ///
    /// Returns [`StepFault::Assertion`] if an assertion is violated; the
    /// driver then retries the step with a smaller step size.
    fn check_asserts(&self, _data: &SimulationData<Self::State>) -> Result<(), StepFault> {
        Ok(())
    }

    /// Returns a signal if the model has requested termination.
    fn check_termination(&self, _data: &SimulationData<Self::State>) -> Option<TerminationSignal> {
        None
    }

    /// Returns the number of instrumented operations the model times.
    ///
    /// The count is fixed for the whole run and sizes every profiling record.
    fn tracked_operations(&self) -> usize {
        0
    }
}

/// A model-level request to end the run early.
///
/// Termination is not an error: the current step's bookkeeping completes, the
/// stop time is shortened to the current time, and the run ends normally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationSignal {
    pub message: String,
}

impl TerminationSignal {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
