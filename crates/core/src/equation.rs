use std::fmt;

use crate::SimulationData;

/// An equation solver that can report unresolved failures.
///
/// Nonlinear, linear and mixed systems are solved inside the model's
/// evaluation callbacks.
/// A solver that gives up records the failure instead of raising a fault, and
/// the driver queries it after each committed step.
///
/// Closures of the form `Fn(&SimulationData<S>) -> bool` implement this trait,
/// and `()` is a solver that never fails.
pub trait EquationSolver<S> {
    /// Returns `true` if the last solve left a system unresolved.
    fn has_failure(&self, data: &SimulationData<S>) -> bool;
}

impl<S, F> EquationSolver<S> for F
where
    F: Fn(&SimulationData<S>) -> bool,
{
    fn has_failure(&self, data: &SimulationData<S>) -> bool {
        self(data)
    }
}

impl<S> EquationSolver<S> for () {
    fn has_failure(&self, _data: &SimulationData<S>) -> bool {
        false
    }
}

/// The class of equation system that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverFailure {
    Nonlinear,
    Linear,
    Mixed,
}

impl fmt::Display for SolverFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nonlinear => f.write_str("non-linear"),
            Self::Linear => f.write_str("linear"),
            Self::Mixed => f.write_str("mixed"),
        }
    }
}

/// The equation solvers a driver checks after each committed step.
#[derive(Debug, Clone, Copy, Default)]
pub struct EquationSystems<N = (), L = (), X = ()> {
    pub nonlinear: N,
    pub linear: L,
    pub mixed: X,
}

impl<N, L, X> EquationSystems<N, L, X> {
    /// Returns the first failing system in priority order: nonlinear, then
    /// linear, then mixed.
    pub fn first_failure<S>(&self, data: &SimulationData<S>) -> Option<SolverFailure>
    where
        N: EquationSolver<S>,
        L: EquationSolver<S>,
        X: EquationSolver<S>,
    {
        if self.nonlinear.has_failure(data) {
            Some(SolverFailure::Nonlinear)
        } else if self.linear.has_failure(data) {
            Some(SolverFailure::Linear)
        } else if self.mixed.has_failure(data) {
            Some(SolverFailure::Mixed)
        } else {
            None
        }
    }
}
