//! Synthetic collaborators with predictable trajectories.
//!
//! The [`Ramp`] model integrates `x' = rate` so every state value and event
//! time can be computed by hand.

use std::cell::Cell;

use uom::si::{f64::Time, time::second};
use weft_core::{
    EventHandler, EventKind, Integrator, Model, SimulationData, SimulationWindow, SolverCursor,
    StateSelector, StepFault, StepStatus, TerminationSignal, Temporal, seconds,
};

/// Shorthand for a time in seconds.
pub fn s(value: f64) -> Time {
    Time::new::<second>(value)
}

/// A window from `start` to `stop` seconds.
pub fn window(start: f64, stop: f64, steps: usize) -> SimulationWindow {
    SimulationWindow::new(s(start), s(stop), steps).expect("valid window")
}

/// The state of a [`Ramp`] model.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub time: Time,
    pub x: f64,
    pub dx: f64,
}

impl Point {
    /// The initial point of a [`Ramp`] with the given rate.
    ///
    /// The derivative is already consistent with the model, since the
    /// integrator steps with the derivative evaluated at the previous point.
    pub fn at_origin(rate: f64) -> Self {
        Self {
            time: s(0.0),
            x: 0.0,
            dx: rate,
        }
    }
}

impl Temporal for Point {
    fn get_time(&self) -> Time {
        self.time
    }

    fn set_time(&mut self, time: Time) {
        self.time = time;
    }
}

/// A model with a constant derivative.
#[derive(Debug, Default)]
pub struct Ramp {
    pub rate: f64,
    /// Request termination at the first committed step at or after this time.
    pub terminate_at: Option<Time>,
    /// Fail the assertion check whenever `x` exceeds this value.
    pub max_x: Option<f64>,
    /// Number of timed operations; derivative evaluation is operation 0.
    pub operations: usize,
    derivative_calls: Cell<usize>,
}

impl Ramp {
    pub fn new(rate: f64) -> Self {
        Self {
            rate,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn terminating_at(mut self, time: Time) -> Self {
        self.terminate_at = Some(time);
        self
    }

    #[must_use]
    pub fn asserting_below(mut self, max_x: f64) -> Self {
        self.max_x = Some(max_x);
        self
    }

    #[must_use]
    pub fn timing(mut self, operations: usize) -> Self {
        self.operations = operations;
        self
    }

    /// Number of derivative evaluations so far.
    pub fn derivative_calls(&self) -> usize {
        self.derivative_calls.get()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("x = {x} exceeds {max}")]
pub struct OutOfRange {
    pub x: f64,
    pub max: f64,
}

impl Model for Ramp {
    type State = Point;

    fn evaluate_derivatives(&self, data: &mut SimulationData<Point>) -> Result<(), StepFault> {
        self.derivative_calls.set(self.derivative_calls.get() + 1);
        let rate = self.rate;
        let timed = self.operations > 0;
        let state = data.current_mut();
        state.dx = rate;
        if timed {
            data.timers_mut().measure(0, || ());
        }
        Ok(())
    }

    fn check_asserts(&self, data: &SimulationData<Point>) -> Result<(), StepFault> {
        match self.max_x {
            Some(max) if data.current().x > max => Err(StepFault::assertion(
                OutOfRange {
                    x: data.current().x,
                    max,
                }
                .to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn check_termination(&self, data: &SimulationData<Point>) -> Option<TerminationSignal> {
        self.terminate_at
            .filter(|at| data.current().time >= *at)
            .map(|_| TerminationSignal::new("ramp reached its end"))
    }

    fn tracked_operations(&self) -> usize {
        self.operations
    }
}

#[derive(Debug, thiserror::Error)]
#[error("step size too small")]
pub struct StepTooSmall;

/// Forward Euler with scripted faults and failures.
#[derive(Debug, Default)]
pub struct FixedStep {
    /// Number of calls so far.
    pub calls: usize,
    /// The step size of every call, in call order.
    pub step_sizes: Vec<Time>,
    /// Number of times event statistics were merged.
    pub merged: usize,
    fault_on: Vec<usize>,
    always_fault: bool,
    fail_on: Option<(usize, i32)>,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise a fault on the given one-based call.
    #[must_use]
    pub fn faulting_on(mut self, call: usize) -> Self {
        self.fault_on.push(call);
        self
    }

    /// Raise a fault on every call.
    #[must_use]
    pub fn always_faulting(mut self) -> Self {
        self.always_fault = true;
        self
    }

    /// Report `status` on the given one-based call.
    #[must_use]
    pub fn failing_on(mut self, call: usize, status: i32) -> Self {
        self.fail_on = Some((call, status));
        self
    }
}

impl Integrator<Ramp> for FixedStep {
    fn name(&self) -> &str {
        "fixed-step"
    }

    fn step(
        &mut self,
        _model: &Ramp,
        data: &mut SimulationData<Point>,
        cursor: &mut SolverCursor,
    ) -> Result<StepStatus, StepFault> {
        self.calls += 1;
        self.step_sizes.push(cursor.step_size);

        if self.always_fault || self.fault_on.contains(&self.calls) {
            return Err(StepFault::integrator(StepTooSmall));
        }

        let state = data.current_mut();
        state.x += state.dx * seconds(cursor.step_size);
        cursor.current_time += cursor.step_size;

        Ok(match self.fail_on {
            Some((call, status)) if call == self.calls => StepStatus::from_code(status),
            _ => StepStatus::Success,
        })
    }

    fn merge_event_statistics(&mut self) {
        self.merged += 1;
    }
}

/// Resets `x` to zero whenever it reaches `level`, and handles scheduled
/// time events.
///
/// The crossing instant is located by linear interpolation between the last
/// committed point and the end of the step.
#[derive(Debug)]
pub struct Sawtooth {
    pub level: f64,
    /// Every handled event, in order.
    pub handled: Vec<(EventKind, Time)>,
    /// Zero-crossing values saved by the driver.
    pub saved: Vec<f64>,
}

impl Sawtooth {
    pub fn new(level: f64) -> Self {
        Self {
            level,
            handled: Vec::new(),
            saved: Vec::new(),
        }
    }
}

impl EventHandler<Ramp> for Sawtooth {
    fn save_zero_crossings(&mut self, _model: &Ramp, data: &SimulationData<Point>) {
        self.saved.push(data.current().x - self.level);
    }

    fn detect(
        &mut self,
        _model: &Ramp,
        data: &SimulationData<Point>,
        cursor: &mut SolverCursor,
    ) -> Result<EventKind, StepFault> {
        let before = data.previous();
        let after = data.current();
        if before.x < self.level && after.x >= self.level {
            let fraction = (self.level - before.x) / (after.x - before.x);
            cursor.current_time = before.time + (cursor.current_time - before.time) * fraction;
            cursor.events.push_state_event(0);
            log::debug!("x crossed {} at {}", self.level, seconds(cursor.current_time));
        }
        Ok(cursor.events.merged(cursor.current_time))
    }

    fn handle(
        &mut self,
        _model: &Ramp,
        data: &mut SimulationData<Point>,
        cursor: &mut SolverCursor,
    ) -> Result<(), StepFault> {
        let kind = cursor.events.merged(cursor.current_time);
        cursor.events.pop_due(cursor.current_time);
        if kind == EventKind::State {
            data.current_mut().x = 0.0;
        }
        self.handled.push((kind, cursor.current_time));
        Ok(())
    }
}

/// Selects a new state set once, at the first step at or after `at`.
#[derive(Debug)]
pub struct SwitchOnce {
    pub at: Time,
    pub switched: bool,
}

impl SwitchOnce {
    pub fn at(at: Time) -> Self {
        Self {
            at,
            switched: false,
        }
    }
}

impl StateSelector<Ramp> for SwitchOnce {
    fn reselect(
        &mut self,
        _model: &Ramp,
        data: &mut SimulationData<Point>,
    ) -> Result<bool, StepFault> {
        if self.switched || data.current().time < self.at {
            return Ok(false);
        }
        self.switched = true;
        Ok(true)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("state set is singular")]
pub struct Singular;

/// Fails once, on the first attempted step at or after `at`.
#[derive(Debug)]
pub struct SingularOnce {
    pub at: Time,
    pub faulted: bool,
}

impl SingularOnce {
    pub fn at(at: Time) -> Self {
        Self { at, faulted: false }
    }
}

impl StateSelector<Ramp> for SingularOnce {
    fn reselect(
        &mut self,
        _model: &Ramp,
        data: &mut SimulationData<Point>,
    ) -> Result<bool, StepFault> {
        if self.faulted || data.current().time < self.at {
            return Ok(false);
        }
        self.faulted = true;
        Err(StepFault::state_selection(Singular))
    }
}
