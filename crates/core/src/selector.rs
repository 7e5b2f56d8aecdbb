use crate::{Model, SimulationData, StepFault};

/// Chooses the active set of dynamic states.
///
/// Some models can switch which variables are integrated as states when the
/// current set becomes structurally degenerate.
/// A selector checks for that after each step and, if it picks a new set,
/// rewrites the current generation to be consistent with it.
pub trait StateSelector<M: Model> {
    /// Returns `true` if a new state set was selected.
    ///
    /// # Errors
    ///
    /// Returns a [`StepFault`] if the selection cannot be evaluated.
    fn reselect(&mut self, model: &M, data: &mut SimulationData<M::State>)
    -> Result<bool, StepFault>;
}

/// A selector for models with a fixed state set.
impl<M: Model> StateSelector<M> for () {
    fn reselect(
        &mut self,
        _model: &M,
        _data: &mut SimulationData<M::State>,
    ) -> Result<bool, StepFault> {
        Ok(false)
    }
}
