use std::time::{Duration, Instant};

/// Per-operation call counters and wall-clock accumulators.
///
/// A model registers a fixed number of instrumented operations (functions or
/// profile blocks) before a run starts.
/// Each operation is bracketed by [`tick`](Self::tick) and
/// [`accumulate`](Self::accumulate); the accumulate call counts one call and
/// adds the elapsed time since the matching tick.
///
/// Indices outside the registered range are ignored.
#[derive(Debug, Clone, Default)]
pub struct OperationTimers {
    timers: Vec<Timer>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Timer {
    started: Option<Instant>,
    calls: u32,
    total: Duration,
}

impl OperationTimers {
    /// Creates `count` cleared timers.
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            timers: vec![Timer::default(); count],
        }
    }

    /// Returns the number of tracked operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Resets every call count and accumulated time to zero.
    pub fn clear_all(&mut self) {
        self.timers.fill(Timer::default());
    }

    /// Marks the start of a call to operation `op`.
    pub fn tick(&mut self, op: usize) {
        if let Some(timer) = self.timers.get_mut(op) {
            timer.started = Some(Instant::now());
        }
    }

    /// Marks the end of a call to operation `op`.
    ///
    /// Does nothing if `op` was not ticked.
    pub fn accumulate(&mut self, op: usize) {
        if let Some(timer) = self.timers.get_mut(op) {
            if let Some(started) = timer.started.take() {
                timer.total += started.elapsed();
                timer.calls = timer.calls.saturating_add(1);
            }
        }
    }

    /// Runs `f` as one call to operation `op`.
    pub fn measure<R>(&mut self, op: usize, f: impl FnOnce() -> R) -> R {
        self.tick(op);
        let result = f();
        self.accumulate(op);
        result
    }

    /// Returns the number of completed calls to `op` since the last clear.
    #[must_use]
    pub fn calls(&self, op: usize) -> u32 {
        self.timers.get(op).map_or(0, |timer| timer.calls)
    }

    /// Returns the accumulated time of `op` in seconds.
    #[must_use]
    pub fn accumulated(&self, op: usize) -> f64 {
        self.timers
            .get(op)
            .map_or(0.0, |timer| timer.total.as_secs_f64())
    }

    /// Iterates over `(calls, seconds)` for every tracked operation.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.timers
            .iter()
            .map(|timer| (timer.calls, timer.total.as_secs_f64()))
    }
}
