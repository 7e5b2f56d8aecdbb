use uom::si::f64::Time;

use crate::EventKind;

/// Pending discrete events for the current run.
///
/// Time events are absolute instants scheduled ahead of time and kept in
/// ascending order.
/// State events are the zero-crossing indicators an event handler found to
/// have changed sign during the current step; they are cleared at the start of
/// every iteration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventQueue {
    time_events: Vec<Time>,
    state_events: Vec<usize>,
}

impl EventQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a time event, ignoring exact duplicates.
    pub fn schedule(&mut self, time: Time) {
        let index = self.time_events.partition_point(|t| *t < time);
        if self.time_events.get(index) != Some(&time) {
            self.time_events.insert(index, time);
        }
    }

    /// Returns the earliest scheduled time event.
    #[must_use]
    pub fn next_time_event(&self) -> Option<Time> {
        self.time_events.first().copied()
    }

    /// Returns the scheduled time events in ascending order.
    #[must_use]
    pub fn time_events(&self) -> &[Time] {
        &self.time_events
    }

    /// Returns `true` if a time event is scheduled at or before `time`.
    #[must_use]
    pub fn has_due(&self, time: Time) -> bool {
        self.next_time_event().is_some_and(|t| t <= time)
    }

    /// Removes every time event at or before `time`, returning how many fired.
    pub fn pop_due(&mut self, time: Time) -> usize {
        let due = self.time_events.partition_point(|t| *t <= time);
        self.time_events.drain(..due);
        due
    }

    /// Records that zero-crossing indicator `indicator` changed sign.
    pub fn push_state_event(&mut self, indicator: usize) {
        if !self.state_events.contains(&indicator) {
            self.state_events.push(indicator);
        }
    }

    /// Returns the indicators that crossed zero during the current step.
    #[must_use]
    pub fn state_events(&self) -> &[usize] {
        &self.state_events
    }

    /// Clears the state events found during the previous iteration.
    pub fn begin_iteration(&mut self) {
        self.state_events.clear();
    }

    /// Merges the pending events into the kind that fires first.
    ///
    /// State events were located strictly inside the step, so they precede a
    /// time event due at the step's end point `reached`.
    #[must_use]
    pub fn merged(&self, reached: Time) -> EventKind {
        if !self.state_events.is_empty() {
            EventKind::State
        } else if self.has_due(reached) {
            EventKind::Time
        } else {
            EventKind::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::time::second;

    fn s(value: f64) -> Time {
        Time::new::<second>(value)
    }

    #[test]
    fn time_events_are_sorted_and_deduplicated() {
        let mut queue = EventQueue::new();
        queue.schedule(s(0.5));
        queue.schedule(s(0.2));
        queue.schedule(s(0.5));
        queue.schedule(s(0.9));

        assert_eq!(queue.time_events(), &[s(0.2), s(0.5), s(0.9)]);
        assert_eq!(queue.next_time_event(), Some(s(0.2)));
    }

    #[test]
    fn pop_due_removes_past_events_only() {
        let mut queue = EventQueue::new();
        queue.schedule(s(0.2));
        queue.schedule(s(0.5));

        assert_eq!(queue.pop_due(s(0.1)), 0);
        assert!(queue.has_due(s(0.2)));
        assert_eq!(queue.pop_due(s(0.3)), 1);
        assert_eq!(queue.next_time_event(), Some(s(0.5)));
    }

    #[test]
    fn state_events_take_precedence_within_a_step() {
        let mut queue = EventQueue::new();
        queue.schedule(s(1.0));
        assert_eq!(queue.merged(s(1.0)), EventKind::Time);

        queue.push_state_event(3);
        queue.push_state_event(3);
        assert_eq!(queue.state_events(), &[3]);
        assert_eq!(queue.merged(s(1.0)), EventKind::State);

        queue.begin_iteration();
        assert_eq!(queue.merged(s(0.5)), EventKind::None);
    }
}
