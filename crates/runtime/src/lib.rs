//! Time-stepping and event coordination for hybrid ODE/DAE simulations.
//!
//! The [`Driver`] advances a [`Model`](weft_core::Model) over a uniform
//! output grid, one integrator step per iteration.
//! Around each step it coordinates discrete events and state reselection,
//! rolls back and retries a step once when a collaborator raises a
//! [`StepFault`](weft_core::StepFault), and reports unresolved solver failures
//! as an [`Error`] with a numeric termination code.
//!
//! Profiling records can be written for every committed step and read back
//! with [`ProfileReader`].

mod config;
mod driver;
mod events;
mod grid;
mod profiling;
mod recovery;
mod reselect;
mod trajectory;

pub use config::Config;
pub use driver::{Action, Driver, Error, Event, Solution, Status};
pub use profiling::{ProfileReader, ProfileRecord, StepProfiler};
pub use trajectory::Trajectory;

/// Returns the numeric termination code of a finished run.
///
/// A run that did not fail, including one that was terminated by the model
/// or stopped by an observer, has code zero.
/// Failed runs have the negative code of their [`Error`].
#[must_use]
pub fn termination_code<T>(result: &Result<T, Error>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(err) => err.code(),
    }
}
