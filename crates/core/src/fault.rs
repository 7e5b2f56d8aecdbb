use std::error::Error as StdError;

use thiserror::Error;

/// A recoverable fault raised inside an attempted step.
///
/// Any collaborator called between the start of a step and its commit may
/// return a `StepFault`: a numerical exception in the integrator or the
/// equation solvers, a failed model evaluation, or a violated model assertion.
/// The driver rolls the step back and retries it once with half the step
/// size before treating the fault as fatal.
#[derive(Debug, Error)]
pub enum StepFault {
    #[error("assertion failed: {message}")]
    Assertion { message: String },

    #[error("integrator raised an error")]
    Integrator(#[source] Box<dyn StdError + Send + Sync>),

    #[error("model evaluation failed")]
    Model(#[source] Box<dyn StdError + Send + Sync>),

    #[error("event handling failed")]
    Event(#[source] Box<dyn StdError + Send + Sync>),

    #[error("state selection failed")]
    StateSelection(#[source] Box<dyn StdError + Send + Sync>),
}

impl StepFault {
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion {
            message: message.into(),
        }
    }

    pub fn integrator<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Integrator(Box::new(err))
    }

    pub fn model<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Model(Box::new(err))
    }

    pub fn event<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Event(Box::new(err))
    }

    pub fn state_selection<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::StateSelection(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("division by zero")]
    struct DivByZero;

    #[test]
    fn sources_are_preserved() {
        let fault = StepFault::model(DivByZero);
        assert_eq!(fault.to_string(), "model evaluation failed");
        assert_eq!(
            fault.source().map(ToString::to_string).as_deref(),
            Some("division by zero")
        );
    }

    #[test]
    fn assertion_message_is_displayed() {
        let fault = StepFault::assertion("x >= 0 violated");
        assert_eq!(fault.to_string(), "assertion failed: x >= 0 violated");
    }
}
