use weft_core::{Model, SimulationData, SolverCursor, StateSelector, StepFault, seconds};

/// Asks the selector for a new state set and, if one was chosen, restarts the
/// integrator from the current generation the same way an event does.
pub(crate) fn maybe_reselect<M, Sel>(
    model: &M,
    selector: &mut Sel,
    data: &mut SimulationData<M::State>,
    cursor: &mut SolverCursor,
) -> Result<bool, StepFault>
where
    M: Model,
    Sel: StateSelector<M>,
{
    let reselected = selector.reselect(model, data)?;
    if reselected {
        log::info!(
            "new set of states selected at time {:.12}",
            seconds(cursor.current_time)
        );
        cursor.did_event_step = true;
        data.rebaseline();
    }
    Ok(reselected)
}
