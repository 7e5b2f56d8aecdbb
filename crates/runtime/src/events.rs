use weft_core::{
    EventHandler, EventKind, Model, SimulationData, SolverCursor, StepFault, Temporal, seconds,
};

/// The outcome of event coordination for one attempted step.
#[derive(Debug)]
pub(crate) struct Detected<S> {
    pub(crate) kind: EventKind,
    /// The run data as it stood just before the event was handled.
    ///
    /// It is only written out once the step commits, so a step that is rolled
    /// back leaves nothing behind in the output.
    pub(crate) left_limit: Option<SimulationData<S>>,
}

/// Runs event detection for the step that just finished and, if an event was
/// reached, handles it.
///
/// The detector may move `cursor.current_time` back to the event instant; that
/// time is stamped onto the current generation before the left limit is taken.
/// On an event the handler applies the discrete updates and the history is
/// rebaselined so the integrator restarts from the post-event values.
pub(crate) fn coordinate<M, E>(
    model: &M,
    handler: &mut E,
    data: &mut SimulationData<M::State>,
    cursor: &mut SolverCursor,
) -> Result<Detected<M::State>, StepFault>
where
    M: Model,
    E: EventHandler<M>,
{
    let kind = handler.detect(model, data, cursor)?;
    if !kind.is_event() {
        cursor.last_step_time = cursor.current_time;
        cursor.did_event_step = false;
        return Ok(Detected {
            kind,
            left_limit: None,
        });
    }

    data.current_mut().set_time(cursor.current_time);
    log::info!("{kind} event at time {:.12}", seconds(cursor.current_time));

    let left_limit = data.clone();
    handler.handle(model, data, cursor)?;

    cursor.did_event_step = true;
    data.rebaseline();
    Ok(Detected {
        kind,
        left_limit: Some(left_limit),
    })
}
