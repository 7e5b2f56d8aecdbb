use uom::si::f64::Time;

use crate::EventQueue;

/// The driver's position in a run.
///
/// Only the driver and its failure-recovery logic mutate the cursor between
/// calls; collaborators may adjust it during a call (an integrator advances
/// `current_time`, an event handler moves it back to a located event).
///
/// `current_time` never decreases across committed steps but is moved back
/// to the last committed time when a failed attempt is rolled back.
/// The active integration method and its private state are owned by the
/// [`Integrator`](crate::Integrator) implementation.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverCursor {
    pub current_time: Time,
    pub step_size: Time,
    /// Time reached by the last step that did not end in an event.
    pub last_step_time: Time,
    pub did_event_step: bool,
    pub events: EventQueue,
}

impl SolverCursor {
    /// Creates a cursor positioned at `start` with an empty event queue.
    #[must_use]
    pub fn new(start: Time) -> Self {
        Self {
            current_time: start,
            step_size: start - start,
            last_step_time: start,
            did_event_step: false,
            events: EventQueue::new(),
        }
    }

    /// Creates a cursor at `start` with time events already scheduled.
    #[must_use]
    pub fn with_time_events(start: Time, events: impl IntoIterator<Item = Time>) -> Self {
        let mut cursor = Self::new(start);
        for time in events {
            cursor.events.schedule(time);
        }
        cursor
    }
}
