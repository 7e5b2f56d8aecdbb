use std::fmt;

use crate::{Model, SimulationData, SolverCursor, StepFault};

/// The kind of discrete event found at the end of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    None,
    /// A scheduled time event was reached.
    Time,
    /// A zero-crossing indicator changed sign during the step.
    State,
}

impl EventKind {
    #[must_use]
    pub fn is_event(self) -> bool {
        self != Self::None
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("no"),
            Self::Time => f.write_str("time"),
            Self::State => f.write_str("state"),
        }
    }
}

/// Detects and applies discrete events.
///
/// Detection runs once per attempted step after the continuous-system update.
/// It compares the current generation against the last committed one, may
/// move `cursor.current_time` back to the located event instant, and must not
/// change any continuous state.
/// Handling applies the discrete updates and runs only after the driver has
/// emitted the left-limit point.
pub trait EventHandler<M: Model> {
    /// Records the zero-crossing indicator values of the current generation.
    ///
    /// Called after the continuous-system update and again when a step is
    /// committed, so the next detection compares against committed values.
    fn save_zero_crossings(&mut self, _model: &M, _data: &SimulationData<M::State>) {}

    /// Returns the earliest event reached by the step that just finished.
    ///
    /// # Errors
    ///
    /// Returns a [`StepFault`] if root finding fails.
    fn detect(
        &mut self,
        model: &M,
        data: &SimulationData<M::State>,
        cursor: &mut SolverCursor,
    ) -> Result<EventKind, StepFault>;

    /// Applies the discrete updates for the detected event.
    ///
    /// # Errors
    ///
    /// Returns a [`StepFault`] if the event iteration fails.
    fn handle(
        &mut self,
        model: &M,
        data: &mut SimulationData<M::State>,
        cursor: &mut SolverCursor,
    ) -> Result<(), StepFault>;
}

/// A handler for models without events.
impl<M: Model> EventHandler<M> for () {
    fn detect(
        &mut self,
        _model: &M,
        _data: &SimulationData<M::State>,
        _cursor: &mut SolverCursor,
    ) -> Result<EventKind, StepFault> {
        Ok(EventKind::None)
    }

    fn handle(
        &mut self,
        _model: &M,
        _data: &mut SimulationData<M::State>,
        _cursor: &mut SolverCursor,
    ) -> Result<(), StepFault> {
        Ok(())
    }
}
