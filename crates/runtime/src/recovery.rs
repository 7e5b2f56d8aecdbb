use uom::si::f64::Time;
use weft_core::{SimulationData, SolverCursor, Temporal};

/// Tracks whether the current attempt is a retry of a failed step.
///
/// A fault during a normal attempt rolls the run back to the last committed
/// generation and schedules exactly one retry with half the step size.
/// A fault during that retry is fatal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Recovery {
    #[default]
    Normal,
    Retrying,
}

impl Recovery {
    /// Halves `step` while a retry is in effect.
    pub(crate) fn scale_step(self, step: Time) -> Time {
        match self {
            Self::Normal => step,
            Self::Retrying => step * 0.5,
        }
    }

    /// Leaves retry mode after an attempt that raised no fault.
    pub(crate) fn on_success(&mut self) {
        *self = Self::Normal;
    }

    /// Reacts to a fault raised inside an attempt.
    ///
    /// The run is always rolled back to the last committed generation, and
    /// the cursor to `checkpoint`, the state it had before the attempt.
    /// Returns `true` if a retry is scheduled, or `false` if the retry budget
    /// is already spent.
    pub(crate) fn on_fault<S: Temporal + Clone>(
        &mut self,
        data: &mut SimulationData<S>,
        cursor: &mut SolverCursor,
        checkpoint: SolverCursor,
    ) -> bool {
        roll_back(data, cursor, checkpoint);
        match self {
            Self::Normal => {
                *self = Self::Retrying;
                true
            }
            Self::Retrying => false,
        }
    }
}

/// Restores the last committed generation and the cursor it was reached with.
///
/// Time events consumed by the failed attempt are pending again.
/// The grid index is held on the next attempt, like after an event step.
fn roll_back<S: Temporal + Clone>(
    data: &mut SimulationData<S>,
    cursor: &mut SolverCursor,
    checkpoint: SolverCursor,
) {
    data.restore_old_values();
    data.rebaseline();
    *cursor = checkpoint;
    cursor.current_time = data.current().get_time();
    cursor.did_event_step = true;
}
