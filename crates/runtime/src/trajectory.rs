use uom::si::f64::Time;
use weft_core::{ResultWriter, SimulationData, Temporal};

/// An in-memory result writer that keeps a copy of every emitted point.
#[derive(Debug, Clone)]
pub struct Trajectory<S> {
    points: Vec<S>,
}

impl<S> Trajectory<S> {
    #[must_use]
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Returns the emitted points in emission order.
    #[must_use]
    pub fn points(&self) -> &[S] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn into_points(self) -> Vec<S> {
        self.points
    }
}

impl<S: Temporal> Trajectory<S> {
    /// Returns the time of every emitted point.
    #[must_use]
    pub fn times(&self) -> Vec<Time> {
        self.points.iter().map(Temporal::get_time).collect()
    }
}

impl<S> Default for Trajectory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone> ResultWriter<S> for Trajectory<S> {
    fn emit(&mut self, data: &SimulationData<S>) {
        self.points.push(data.current().clone());
    }
}
