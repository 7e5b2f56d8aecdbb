use crate::{HistoryError, OperationTimers, SimulationWindow, StepHistory};

/// Everything a simulation run knows about the model's variables.
///
/// `SimulationData` owns the [`StepHistory`] of full state snapshots (all
/// continuous states and algebraic variables) plus two derived snapshots:
///
/// - *pre-values*, copied after the continuous-system update so discrete
///   updates can refer to values from just before an event
/// - *old-values*, copied when a step is committed and used to restore the
///   current generation when an attempted step has to be rolled back
///
/// Collaborators receive borrowed access to it for the duration of a single
/// call; only the driver holds it across a run.
#[derive(Debug, Clone)]
pub struct SimulationData<S> {
    window: SimulationWindow,
    history: StepHistory<S>,
    pre: S,
    old: S,
    timers: OperationTimers,
}

impl<S: Clone> SimulationData<S> {
    /// Creates run data with a two-generation history seeded from `initial`.
    pub fn new(window: SimulationWindow, initial: S) -> Self {
        Self {
            window,
            history: StepHistory::with_min_depth(initial.clone()),
            pre: initial.clone(),
            old: initial,
            timers: OperationTimers::default(),
        }
    }

    /// Creates run data whose history keeps `depth` generations.
    ///
    /// Multistep integrators that look further back than the previous
    /// generation need more than the default two.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::TooShallow`] if `depth` is less than two.
    pub fn with_history_depth(
        window: SimulationWindow,
        initial: S,
        depth: usize,
    ) -> Result<Self, HistoryError> {
        Ok(Self {
            window,
            history: StepHistory::new(initial.clone(), depth)?,
            pre: initial.clone(),
            old: initial,
            timers: OperationTimers::default(),
        })
    }

    /// Advances the history ring at the start of an attempted step.
    pub fn rotate(&mut self) {
        self.history.rotate();
    }

    /// Copies the current generation into the pre-values.
    pub fn store_pre_values(&mut self) {
        self.pre.clone_from(self.history.current());
    }

    /// Copies the current generation into the old-values.
    pub fn store_old_values(&mut self) {
        self.old.clone_from(self.history.current());
    }

    /// Restores the current generation from the old-values.
    pub fn restore_old_values(&mut self) {
        self.history.current_mut().clone_from(&self.old);
    }

    /// Treats the current generation as the only valid baseline.
    ///
    /// Every older generation is overwritten with the current one.
    pub fn rebaseline(&mut self) {
        self.history.rebaseline();
    }
}

impl<S> SimulationData<S> {
    #[must_use]
    pub fn window(&self) -> &SimulationWindow {
        &self.window
    }

    #[must_use]
    pub fn history(&self) -> &StepHistory<S> {
        &self.history
    }

    /// The snapshot being integrated or most recently committed.
    #[must_use]
    pub fn current(&self) -> &S {
        self.history.current()
    }

    pub fn current_mut(&mut self) -> &mut S {
        self.history.current_mut()
    }

    #[must_use]
    pub fn previous(&self) -> &S {
        self.history.previous()
    }

    #[must_use]
    pub fn pre_values(&self) -> &S {
        &self.pre
    }

    #[must_use]
    pub fn old_values(&self) -> &S {
        &self.old
    }

    #[must_use]
    pub fn timers(&self) -> &OperationTimers {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut OperationTimers {
        &mut self.timers
    }

    /// Replaces the operation timers with `count` fresh ones.
    pub fn reset_timers(&mut self, count: usize) {
        self.timers = OperationTimers::new(count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{f64::Time, time::second};

    use crate::Temporal;

    #[derive(Debug, Clone, PartialEq)]
    struct Point {
        time: Time,
        x: f64,
    }

    impl Temporal for Point {
        fn get_time(&self) -> Time {
            self.time
        }

        fn set_time(&mut self, time: Time) {
            self.time = time;
        }
    }

    fn data() -> SimulationData<Point> {
        let window =
            SimulationWindow::new(Time::new::<second>(0.0), Time::new::<second>(1.0), 4).unwrap();
        SimulationData::new(
            window,
            Point {
                time: Time::new::<second>(0.0),
                x: 1.0,
            },
        )
    }

    #[test]
    fn restore_undoes_an_attempted_step() {
        let mut data = data();
        data.rotate();
        data.current_mut().x = 42.0;
        data.current_mut().set_time(Time::new::<second>(0.25));

        data.restore_old_values();

        assert_eq!(data.current().x, 1.0);
        assert_eq!(data.current().get_time(), Time::new::<second>(0.0));
    }

    #[test]
    fn committed_values_become_the_rollback_target() {
        let mut data = data();
        data.rotate();
        data.current_mut().x = 2.0;
        data.store_old_values();

        data.rotate();
        data.current_mut().x = 3.0;
        data.restore_old_values();

        assert_eq!(data.current().x, 2.0);
    }

    #[test]
    fn pre_values_track_the_current_generation() {
        let mut data = data();
        data.current_mut().x = 9.0;
        assert_eq!(data.pre_values().x, 1.0);

        data.store_pre_values();
        assert_eq!(data.pre_values().x, 9.0);
    }

    #[test]
    fn rebaseline_aligns_previous_with_current() {
        let mut data = data();
        data.rotate();
        data.current_mut().x = 5.0;
        assert_eq!(data.previous().x, 1.0);

        data.rebaseline();
        assert_eq!(data.previous().x, 5.0);
    }

    #[test]
    fn deeper_history_is_supported() {
        let window =
            SimulationWindow::new(Time::new::<second>(0.0), Time::new::<second>(1.0), 1).unwrap();
        let initial = Point {
            time: Time::new::<second>(0.0),
            x: 0.0,
        };

        let data = SimulationData::with_history_depth(window, initial.clone(), 4).unwrap();
        assert_eq!(data.history().depth(), 4);

        assert!(SimulationData::with_history_depth(window, initial, 1).is_err());
    }
}
