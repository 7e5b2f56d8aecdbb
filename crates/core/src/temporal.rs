use uom::si::{f64::Time, time::second};

/// A trait for state snapshots that carry simulation time.
///
/// Every generation stored in a [`StepHistory`](crate::StepHistory) is
/// stamped with the time it represents.
/// The driver reads that stamp when profiling and restores the solver cursor
/// from it after a rollback, so the stamp must always agree with the values
/// the snapshot holds.
///
/// # Example
///
/// ```
/// use weft_core::Temporal;
/// use uom::si::f64::Time;
///
/// #[derive(Clone)]
/// struct Tank {
///     time: Time,
///     level: f64,
/// }
///
/// impl Temporal for Tank {
///     fn get_time(&self) -> Time {
///         self.time
///     }
///
///     fn set_time(&mut self, time: Time) {
///         self.time = time;
///     }
/// }
/// ```
pub trait Temporal {
    /// Returns the simulation time of this snapshot.
    fn get_time(&self) -> Time;

    /// Stamps the snapshot with a new simulation time.
    fn set_time(&mut self, time: Time);
}

impl Temporal for Time {
    fn get_time(&self) -> Time {
        *self
    }

    fn set_time(&mut self, time: Time) {
        *self = time;
    }
}

/// Returns a time value in seconds, for diagnostics and binary logs.
#[must_use]
pub fn seconds(time: Time) -> f64 {
    time.get::<second>()
}
