use std::num::NonZeroUsize;

use thiserror::Error;
use uom::si::f64::Time;

use crate::seconds;

/// The interval a simulation run covers and its nominal output grid.
///
/// A window is fixed for the duration of a run.
/// The grid divides `[start, stop]` into `num_steps` equal intervals; the
/// driver aims each step at the next grid point unless an event or a retry
/// forces an irregular step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationWindow {
    start: Time,
    stop: Time,
    num_steps: NonZeroUsize,
}

/// Error returned when constructing an invalid [`SimulationWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum WindowError {
    #[error("number of steps must be at least one")]
    ZeroSteps,

    #[error("window bounds must be finite, got start = {start} s, stop = {stop} s")]
    NonFinite { start: f64, stop: f64 },

    #[error("stop time {stop} s is before start time {start} s")]
    StopBeforeStart { start: f64, stop: f64 },
}

impl SimulationWindow {
    /// Creates a window from `start` to `stop` with `num_steps` grid intervals.
    ///
    /// A window with `start == stop` is valid and produces no steps.
    ///
    /// # Errors
    ///
    /// Returns a [`WindowError`] if `num_steps` is zero, either bound is not
    /// finite, or `stop` precedes `start`.
    pub fn new(start: Time, stop: Time, num_steps: usize) -> Result<Self, WindowError> {
        let num_steps = NonZeroUsize::new(num_steps).ok_or(WindowError::ZeroSteps)?;

        let (start_s, stop_s) = (seconds(start), seconds(stop));
        if !start_s.is_finite() || !stop_s.is_finite() {
            return Err(WindowError::NonFinite {
                start: start_s,
                stop: stop_s,
            });
        }
        if stop < start {
            return Err(WindowError::StopBeforeStart {
                start: start_s,
                stop: stop_s,
            });
        }

        Ok(Self {
            start,
            stop,
            num_steps,
        })
    }

    #[must_use]
    pub fn start_time(&self) -> Time {
        self.start
    }

    #[must_use]
    pub fn stop_time(&self) -> Time {
        self.stop
    }

    #[must_use]
    pub fn num_steps(&self) -> NonZeroUsize {
        self.num_steps
    }

    /// Returns `stop - start`.
    #[must_use]
    pub fn duration(&self) -> Time {
        self.stop - self.start
    }

    /// Returns the time of grid point `index`.
    ///
    /// Evaluated as `index * (stop - start) / num_steps + start`, in that
    /// order. Indices at or past `num_steps` map to exactly `stop`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn grid_time(&self, index: usize) -> Time {
        let steps = self.num_steps.get();
        if index >= steps {
            return self.stop;
        }
        self.duration() * (index as f64) / (steps as f64) + self.start
    }

    /// Returns the fraction of the window covered at `time`, clamped to `[0, 1]`.
    ///
    /// An empty window reports full progress.
    #[must_use]
    pub fn progress(&self, time: Time) -> f64 {
        let total = seconds(self.duration());
        if total <= 0.0 {
            return 1.0;
        }
        (seconds(time - self.start) / total).clamp(0.0, 1.0)
    }
}
