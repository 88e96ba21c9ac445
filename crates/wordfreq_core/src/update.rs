use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            // Runs keep their own snapshot; editing never touches one in flight.
            state.set_input(text);
            Vec::new()
        }
        Msg::AnalyzeClicked => state.request_analysis(),
        Msg::ChunkCounted {
            run_id,
            chunk_index,
            pairs,
            elapsed,
        } => state.apply_chunk(run_id, chunk_index, pairs, elapsed),
        Msg::ChunkFailed {
            run_id,
            chunk_index,
            message,
        } => state.apply_failure(run_id, chunk_index, message),
        Msg::ResumeRun { run_id } => state.resume_run(run_id),
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
