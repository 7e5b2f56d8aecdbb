use uom::si::f64::Time;
use weft_core::SimulationWindow;

/// Tracks the nominal output grid across a run.
///
/// Each regular step aims at the next grid point.
/// After a step that ended in an event (or was rolled back for a retry) the
/// index is held, so the following step aims at the same grid point from the
/// event-adjusted time instead of skipping ahead.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StepGrid {
    window: SimulationWindow,
    index: usize,
}

impl StepGrid {
    pub(crate) fn new(window: SimulationWindow) -> Self {
        Self { window, index: 0 }
    }

    /// Moves to the next grid point unless the previous step was irregular.
    ///
    /// Returns `true` if the index advanced.
    pub(crate) fn advance(&mut self, did_event_step: bool) -> bool {
        if !did_event_step {
            self.index += 1;
        }
        !did_event_step
    }

    /// Returns the step from `current_time` to the targeted grid point.
    ///
    /// Once the index runs past the last grid point the target is the stop time.
    pub(crate) fn nominal_step(&self, current_time: Time) -> Time {
        self.window.grid_time(self.index) - current_time
    }
}

/// Shortens `step` so it ends on the next time event instead of passing it.
pub(crate) fn clamp_to_time_event(
    current_time: Time,
    step: Time,
    next_event: Option<Time>,
) -> Time {
    match next_event {
        Some(event) if event > current_time && current_time + step > event => event - current_time,
        _ => step,
    }
}
