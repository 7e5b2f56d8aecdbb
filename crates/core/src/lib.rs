//! Core traits and types for hybrid simulation with Weft.
//!
//! This crate defines the data a simulation run owns and the capability
//! traits its external collaborators implement:
//!
//! - [`SimulationWindow`], [`SimulationData`], [`StepHistory`] and
//!   [`SolverCursor`]: the state a driver owns for the duration of a run
//! - [`Model`]: model callbacks evaluated in a fixed order after each step
//! - [`Integrator`], [`EventHandler`], [`StateSelector`], [`EquationSolver`]
//!   and [`ResultWriter`]: the pluggable pieces a driver coordinates
//! - [`Observer`]: receives driver events and optionally returns control actions
//!
//! Nothing in this crate advances time on its own. See `weft-runtime` for the
//! driver that ties these pieces together.

mod cursor;
mod data;
mod equation;
mod events;
mod fault;
mod history;
mod integrator;
mod model;
mod observer;
mod queue;
mod selector;
mod temporal;
mod timers;
mod window;
mod writer;

pub use cursor::SolverCursor;
pub use data::SimulationData;
pub use equation::{EquationSolver, EquationSystems, SolverFailure};
pub use events::{EventHandler, EventKind};
pub use fault::StepFault;
pub use history::{HistoryError, StepHistory};
pub use integrator::{Integrator, StepStatus};
pub use model::{Model, TerminationSignal};
pub use observer::Observer;
pub use queue::EventQueue;
pub use selector::StateSelector;
pub use temporal::{Temporal, seconds};
pub use timers::OperationTimers;
pub use window::{SimulationWindow, WindowError};
pub use writer::ResultWriter;
