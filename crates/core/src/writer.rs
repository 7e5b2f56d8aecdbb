use crate::SimulationData;

/// Persists trajectory points.
///
/// The driver calls [`emit`](Self::emit) with the run data whenever the
/// current generation should appear in the output: once per committed step,
/// preceded by the left-limit point of an event handled during that step.
pub trait ResultWriter<S> {
    fn emit(&mut self, data: &SimulationData<S>);
}

/// A writer that discards every point.
impl<S> ResultWriter<S> for () {
    fn emit(&mut self, _data: &SimulationData<S>) {}
}

impl<S, W: ResultWriter<S> + ?Sized> ResultWriter<S> for &mut W {
    fn emit(&mut self, data: &SimulationData<S>) {
        (**self).emit(data);
    }
}
