use uom::si::f64::Time;

/// Indicates how a run that did not fail ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Reached the stop time.
    Complete,

    /// The model requested termination; the stop time was shortened to the
    /// time of the last committed step.
    Terminated { message: String },

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub status: Status,

    /// Number of committed steps.
    pub committed_steps: usize,

    /// Number of step attempts, including retries.
    pub attempts: usize,

    /// Number of rolled-back steps that were retried.
    pub retries: usize,

    /// Time of the last committed step.
    pub final_time: Time,

    /// Number of profiling records written.
    pub profile_records: usize,
}
