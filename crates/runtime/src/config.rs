use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Run-level flags the driver reacts to.
///
/// Configuration is resolved by the caller (command line, config file, test
/// setup) and passed to each run explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Skip the trajectory point of a step that ended in an event.
    ///
    /// The left-limit point emitted before the event is handled is kept.
    pub suppress_event_emit: bool,

    /// Write one profiling record per committed step.
    pub measure_time: bool,

    /// Prefix for output files; profiling goes to `<prefix>_prof.data`.
    pub model_prefix: String,
}

impl Config {
    /// Returns the profiling log path if time measurement is enabled.
    #[must_use]
    pub fn profile_path(&self) -> Option<PathBuf> {
        self.measure_time
            .then(|| PathBuf::from(format!("{}_prof.data", self.model_prefix)))
    }
}
