//! Time-stepping driver for hybrid ODE/DAE models.
//!
//! A [`Driver`] bundles a model with its collaborators (integrator, event
//! handler, state selector, equation solvers and result writer) and advances
//! the model across a [`SimulationWindow`] on a uniform output grid.
//!
//! # Example
//!
//! ```ignore
//! use weft_runtime::{Config, Driver, Trajectory};
//!
//! let mut driver = Driver::new(model, integrator)
//!     .with_events(detector)
//!     .with_writer(Trajectory::new());
//!
//! let (data, solution) = driver.simulate(window, initial, &Config::default())?;
//!
//! for point in driver.writer.points() {
//!     println!("{point:?}");
//! }
//! ```

mod action;
mod error;
mod event;
mod solution;

pub use action::Action;
pub use error::Error;
pub use event::Event;
pub use solution::{Solution, Status};

use std::io::Write;

use uom::si::f64::Time;
use weft_core::{
    EquationSolver, EquationSystems, EventHandler, EventKind, Integrator, Model, Observer,
    ResultWriter, SimulationData, SimulationWindow, SolverCursor, StateSelector, StepFault,
    StepStatus, Temporal, seconds,
};

use crate::{
    Config, StepProfiler, events,
    grid::{StepGrid, clamp_to_time_event},
    recovery::Recovery,
    reselect,
};

/// A model together with everything needed to simulate it.
///
/// Collaborators default to `()`, which means no events, a fixed state set,
/// equation solvers that never fail and a writer that discards every point.
pub struct Driver<M, I, E = (), Sel = (), W = (), N = (), L = (), X = ()> {
    pub model: M,
    pub integrator: I,
    pub events: E,
    pub selector: Sel,
    pub writer: W,
    pub systems: EquationSystems<N, L, X>,
    profile_sink: Option<Box<dyn Write>>,
}

/// What an attempt that raised no fault produced.
#[derive(Debug)]
struct Attempt<S> {
    status: StepStatus,
    event: EventKind,
    reselected: bool,
    left_limit: Option<SimulationData<S>>,
}

impl<M, I> Driver<M, I> {
    pub fn new(model: M, integrator: I) -> Self {
        Self {
            model,
            integrator,
            events: (),
            selector: (),
            writer: (),
            systems: EquationSystems::default(),
            profile_sink: None,
        }
    }
}

impl<M, I, E, Sel, W, N, L, X> Driver<M, I, E, Sel, W, N, L, X> {
    pub fn with_events<E2>(self, events: E2) -> Driver<M, I, E2, Sel, W, N, L, X> {
        Driver {
            model: self.model,
            integrator: self.integrator,
            events,
            selector: self.selector,
            writer: self.writer,
            systems: self.systems,
            profile_sink: self.profile_sink,
        }
    }

    pub fn with_selector<Sel2>(self, selector: Sel2) -> Driver<M, I, E, Sel2, W, N, L, X> {
        Driver {
            model: self.model,
            integrator: self.integrator,
            events: self.events,
            selector,
            writer: self.writer,
            systems: self.systems,
            profile_sink: self.profile_sink,
        }
    }

    pub fn with_writer<W2>(self, writer: W2) -> Driver<M, I, E, Sel, W2, N, L, X> {
        Driver {
            model: self.model,
            integrator: self.integrator,
            events: self.events,
            selector: self.selector,
            writer,
            systems: self.systems,
            profile_sink: self.profile_sink,
        }
    }

    pub fn with_systems<N2, L2, X2>(
        self,
        systems: EquationSystems<N2, L2, X2>,
    ) -> Driver<M, I, E, Sel, W, N2, L2, X2> {
        Driver {
            model: self.model,
            integrator: self.integrator,
            events: self.events,
            selector: self.selector,
            writer: self.writer,
            systems,
            profile_sink: self.profile_sink,
        }
    }

    /// Sends profiling records to `sink` instead of `<model_prefix>_prof.data`.
    ///
    /// Records are still only written when [`Config::measure_time`] is set.
    /// The sink is used by the next profiled run.
    #[must_use]
    pub fn with_profile_sink(mut self, sink: impl Write + 'static) -> Self {
        self.profile_sink = Some(Box::new(sink));
        self
    }
}

impl<M, I, E, Sel, W, N, L, X> Driver<M, I, E, Sel, W, N, L, X>
where
    M: Model,
    I: Integrator<M>,
    E: EventHandler<M>,
    Sel: StateSelector<M>,
    W: ResultWriter<M::State>,
    N: EquationSolver<M::State>,
    L: EquationSolver<M::State>,
    X: EquationSolver<M::State>,
{
    /// Runs the simulation from the window's start time to its stop time.
    ///
    /// # Algorithm
    ///
    /// Each iteration attempts one step:
    ///
    /// 1. Rotate the history so the attempt writes a fresh generation.
    /// 2. Aim at the next grid point, or at the same one again after an event
    ///    step. Halve the step on a retry and cap it at the next time event.
    /// 3. Call the integrator once, then update the continuous system.
    /// 4. Detect and handle events, then check for a new state set.
    /// 5. Check model assertions.
    ///
    /// If the attempt raised no fault, the step is committed: the generation
    /// becomes the rollback target, a profiling record is written, and the
    /// point is emitted. Then model termination and the failure predicates are
    /// checked, in the order integrator, nonlinear, linear, mixed.
    ///
    /// A fault rolls the run back to the last committed generation and retries
    /// the step once with half the step size. Nothing from the failed attempt
    /// is written out, and time events it consumed are pending again.
    /// A fault during the retry ends the run, leaving `data` and `cursor` at
    /// the last committed step.
    ///
    /// # Observer
    ///
    /// The observer receives an [`Event`] after each committed or rolled-back
    /// step and may return [`Action::StopEarly`] to end the run there.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the integrator reports a failed step, an
    /// equation solver reports an unresolved system, or a retried step faults
    /// again.
    pub fn run<Obs>(
        &mut self,
        data: &mut SimulationData<M::State>,
        cursor: &mut SolverCursor,
        config: &Config,
        mut observer: Obs,
    ) -> Result<Solution, Error>
    where
        Obs: Observer<Event, Action>,
    {
        let start = data.window().start_time();
        cursor.current_time = start;
        cursor.last_step_time = start;
        data.current_mut().set_time(start);
        data.store_old_values();
        data.reset_timers(self.model.tracked_operations());

        let mut profiler = self.open_profiler(config);

        log::info!(
            "{} integration from {} to {}",
            self.integrator.name(),
            seconds(start),
            seconds(data.window().stop_time())
        );
        log::debug!("initial values: {:?}", data.current());

        let result = self.step_loop(data, cursor, config, &mut profiler, &mut observer);
        profiler.finish();
        result
    }

    /// Runs the simulation without observation.
    ///
    /// This is a convenience wrapper around [`run`](Self::run).
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] under the same conditions as [`run`](Self::run).
    pub fn run_unobserved(
        &mut self,
        data: &mut SimulationData<M::State>,
        cursor: &mut SolverCursor,
        config: &Config,
    ) -> Result<Solution, Error> {
        self.run(data, cursor, config, ())
    }

    /// Simulates `initial` across `window` with no scheduled time events.
    ///
    /// Returns the final run data along with the run summary.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] under the same conditions as [`run`](Self::run).
    pub fn simulate(
        &mut self,
        window: SimulationWindow,
        initial: M::State,
        config: &Config,
    ) -> Result<(SimulationData<M::State>, Solution), Error> {
        let mut data = SimulationData::new(window, initial);
        let mut cursor = SolverCursor::new(window.start_time());
        let solution = self.run_unobserved(&mut data, &mut cursor, config)?;
        Ok((data, solution))
    }

    fn open_profiler(&mut self, config: &Config) -> StepProfiler {
        let Some(path) = config.profile_path() else {
            return StepProfiler::disabled();
        };
        match self.profile_sink.take() {
            Some(sink) => StepProfiler::new(sink),
            None => StepProfiler::create(&path),
        }
    }

    fn step_loop<Obs>(
        &mut self,
        data: &mut SimulationData<M::State>,
        cursor: &mut SolverCursor,
        config: &Config,
        profiler: &mut StepProfiler,
        observer: &mut Obs,
    ) -> Result<Solution, Error>
    where
        Obs: Observer<Event, Action>,
    {
        let window = *data.window();
        let mut grid = StepGrid::new(window);
        let mut recovery = Recovery::default();
        let mut solution = Solution {
            status: Status::Complete,
            committed_steps: 0,
            attempts: 0,
            retries: 0,
            final_time: cursor.current_time,
            profile_records: 0,
        };

        while cursor.current_time < window.stop_time() {
            solution.attempts += 1;
            let checkpoint = cursor.clone();

            let attempt = match self.attempt(data, cursor, &mut grid, recovery, profiler) {
                Ok(attempt) => attempt,
                Err(fault) => {
                    if !recovery.on_fault(data, cursor, checkpoint) {
                        let time = cursor.current_time;
                        log::error!(
                            "Simulation terminated after time {:.12}: retried step failed: {fault}",
                            seconds(time)
                        );
                        return Err(Error::RetryExhausted {
                            time,
                            source: fault,
                        });
                    }

                    solution.retries += 1;
                    log::warn!(
                        "Integrator attempt to handle a problem at time {:.12}: {fault}",
                        seconds(cursor.current_time)
                    );
                    let event = Event::Retrying {
                        time: cursor.current_time,
                        reason: fault.to_string(),
                    };
                    if let Some(Action::StopEarly) = observer.observe(&event) {
                        solution.status = Status::StoppedByObserver;
                        break;
                    }
                    continue;
                }
            };
            recovery.on_success();

            let step = solution.committed_steps;
            self.commit(data, cursor, config, profiler, attempt.left_limit);
            solution.committed_steps += 1;
            solution.final_time = cursor.current_time;

            let terminated = self.model.check_termination(data);
            if let Some(signal) = &terminated {
                log::info!(
                    "Simulation call terminate() at time {:.12}: {}",
                    seconds(cursor.current_time),
                    signal.message
                );
            }

            self.check_failures(attempt.status, data, cursor.current_time)?;

            let time = cursor.current_time;
            let mut notifications = Vec::with_capacity(3);
            if attempt.event.is_event() {
                notifications.push(Event::Discontinuity {
                    kind: attempt.event,
                    time,
                });
            }
            if attempt.reselected {
                notifications.push(Event::Reselected { time });
            }
            notifications.push(Event::Committed {
                step,
                time,
                did_event_step: cursor.did_event_step,
                progress: window.progress(time),
            });
            let stop_requested = notifications.iter().fold(false, |stop, event| {
                matches!(observer.observe(event), Some(Action::StopEarly)) || stop
            });

            if let Some(signal) = terminated {
                solution.status = Status::Terminated {
                    message: signal.message,
                };
                break;
            }
            if stop_requested {
                solution.status = Status::StoppedByObserver;
                break;
            }
        }

        solution.profile_records = profiler.records_written();
        Ok(solution)
    }

    /// Attempts one step; any fault leaves the run to be rolled back.
    fn attempt(
        &mut self,
        data: &mut SimulationData<M::State>,
        cursor: &mut SolverCursor,
        grid: &mut StepGrid,
        recovery: Recovery,
        profiler: &mut StepProfiler,
    ) -> Result<Attempt<M::State>, StepFault> {
        profiler.begin_step(data.timers_mut());
        cursor.events.begin_iteration();
        data.rotate();

        if !grid.advance(cursor.did_event_step) {
            log::info!(
                "offset value for the next step: {:.10}",
                seconds(cursor.current_time - cursor.last_step_time)
            );
        }

        let nominal = recovery.scale_step(grid.nominal_step(cursor.current_time));
        cursor.step_size = clamp_to_time_event(
            cursor.current_time,
            nominal,
            cursor.events.next_time_event(),
        );
        log::info!(
            "call solver from {} to {} (stepSize: {})",
            seconds(cursor.current_time),
            seconds(cursor.current_time + cursor.step_size),
            seconds(cursor.step_size)
        );

        let status = self.integrator.step(&self.model, data, cursor)?;
        data.current_mut().set_time(cursor.current_time);
        self.update_continuous_system(data)?;
        self.events.save_zero_crossings(&self.model, data);

        let detected = events::coordinate(&self.model, &mut self.events, data, cursor)?;
        let reselected = reselect::maybe_reselect(&self.model, &mut self.selector, data, cursor)?;

        self.model.check_asserts(data)?;

        Ok(Attempt {
            status,
            event: detected.kind,
            reselected,
            left_limit: detected.left_limit,
        })
    }

    fn update_continuous_system(
        &self,
        data: &mut SimulationData<M::State>,
    ) -> Result<(), StepFault> {
        self.model.update_inputs(data)?;
        self.model.evaluate_derivatives(data)?;
        self.model.evaluate_algebraics(data)?;
        self.model.update_outputs(data)?;
        self.model.store_delayed(data)?;
        data.store_pre_values();
        Ok(())
    }

    /// Makes the attempted step the new committed generation and emits it.
    ///
    /// The left limit of an event handled during the step is emitted first.
    fn commit(
        &mut self,
        data: &mut SimulationData<M::State>,
        cursor: &SolverCursor,
        config: &Config,
        profiler: &mut StepProfiler,
        left_limit: Option<SimulationData<M::State>>,
    ) {
        data.store_pre_values();
        data.store_old_values();
        self.events.save_zero_crossings(&self.model, data);

        profiler.record_if_enabled(data.current().get_time(), data.timers());

        if let Some(left_limit) = &left_limit {
            self.writer.emit(left_limit);
        }
        if !(config.suppress_event_emit && cursor.did_event_step) {
            self.writer.emit(data);
        }
        log::trace!("committed values: {:?}", data.current());

        if cursor.did_event_step {
            self.integrator.merge_event_statistics();
        }
    }

    fn check_failures(
        &self,
        status: StepStatus,
        data: &SimulationData<M::State>,
        time: Time,
    ) -> Result<(), Error> {
        let error = match status {
            StepStatus::Failed(status) => Error::IntegratorFailed { status, time },
            StepStatus::Success => match self.systems.first_failure(data) {
                Some(failure) => Error::solver(failure, time),
                None => return Ok(()),
            },
        };
        log::error!("model terminate | {error}");
        Err(error)
    }
}
