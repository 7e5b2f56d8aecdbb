//! Per-step profiling records.
//!
//! When time measurement is enabled, the driver appends one
//! [`ProfileRecord`] to a binary log for every committed step.
//! Profiling never affects the simulation: if the log cannot be opened or a
//! write fails, the recorder logs a warning and disables itself for the rest
//! of the run.

mod reader;
mod record;

pub use reader::ProfileReader;
pub use record::ProfileRecord;

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
    time::Instant,
};

use uom::si::f64::Time;
use weft_core::{OperationTimers, seconds};

/// Appends profiling records to a sink while profiling stays enabled.
pub struct StepProfiler {
    sink: Option<Box<dyn Write>>,
    step_no: u32,
    written: usize,
    step_started: Option<Instant>,
}

impl StepProfiler {
    /// A recorder that never writes.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            sink: None,
            step_no: 0,
            written: 0,
            step_started: None,
        }
    }

    /// A recorder writing to an arbitrary sink.
    pub fn new(sink: impl Write + 'static) -> Self {
        Self {
            sink: Some(Box::new(sink)),
            ..Self::disabled()
        }
    }

    /// A recorder writing to a file at `path`.
    ///
    /// If the file cannot be created, a warning is logged and the recorder
    /// starts out disabled.
    pub fn create(path: &Path) -> Self {
        match File::create(path) {
            Ok(file) => Self::new(BufWriter::new(file)),
            Err(err) => {
                log::warn!(
                    "Time measurements output file {} could not be opened: {err}",
                    path.display()
                );
                Self::disabled()
            }
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Returns the number of records written so far.
    #[must_use]
    pub fn records_written(&self) -> usize {
        self.written
    }

    /// Starts timing a new step attempt.
    ///
    /// Clears the per-operation timers so each record covers a single step.
    pub fn begin_step(&mut self, timers: &mut OperationTimers) {
        if self.is_enabled() {
            timers.clear_all();
            self.step_started = Some(Instant::now());
        }
    }

    /// Appends the record for a committed step, if profiling is enabled.
    ///
    /// Record numbers count committed steps from zero.
    /// Each record is flushed on its own, so a buffered sink reports a write
    /// failure at the record that hit it.
    pub fn record_if_enabled(&mut self, time: Time, timers: &OperationTimers) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };

        let wall = self
            .step_started
            .take()
            .map_or(0.0, |started| started.elapsed().as_secs_f64());
        let record = ProfileRecord::from_timers(self.step_no, seconds(time), wall, timers);
        self.step_no = self.step_no.wrapping_add(1);

        match record.write_to(sink).and_then(|()| sink.flush()) {
            Ok(()) => self.written += 1,
            Err(err) => self.disable(&err),
        }
    }

    /// Flushes and closes the log.
    pub fn finish(mut self) {
        if let Some(mut sink) = self.sink.take() {
            if let Err(err) = sink.flush() {
                log::warn!("Time measurements output file could not be flushed: {err}");
            }
        }
    }

    fn disable(&mut self, err: &io::Error) {
        log::warn!(
            "Disabled time measurements because the output file could not be generated: {err}"
        );
        self.sink = None;
    }
}

impl std::fmt::Debug for StepProfiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepProfiler")
            .field("enabled", &self.is_enabled())
            .field("step_no", &self.step_no)
            .field("written", &self.written)
            .finish_non_exhaustive()
    }
}
