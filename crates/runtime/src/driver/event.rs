use uom::si::f64::Time;
use weft_core::EventKind;

/// Progress reported by the driver to its observer.
///
/// Every event is emitted between iterations, after the step it describes has
/// been committed or rolled back, so an observer returning
/// [`Action::StopEarly`](super::Action::StopEarly) never interrupts a step.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A step was committed.
    Committed {
        /// Zero-based number of the committed step.
        step: usize,
        time: Time,
        /// Whether the step ended in an event or a state reselection.
        did_event_step: bool,
        /// Fraction of the simulation window covered so far, in `[0, 1]`.
        progress: f64,
    },

    /// The committed step ended in a discrete event.
    Discontinuity { kind: EventKind, time: Time },

    /// The committed step selected a new set of states.
    Reselected { time: Time },

    /// A step raised a fault and was rolled back for a retry.
    Retrying {
        /// Time of the committed generation the retry restarts from.
        time: Time,
        reason: String,
    },
}
