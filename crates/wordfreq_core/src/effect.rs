use crate::RunId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Create the execution context that serves every chunk of `run_id`.
    SpawnWorker { run_id: RunId },
    DispatchChunk {
        run_id: RunId,
        chunk_index: usize,
        tokens: Vec<String>,
    },
    /// Post `Msg::ResumeRun` once the host has drained its pending events.
    YieldToHost { run_id: RunId },
    /// Tear the context down; anything it still sends is stale.
    TerminateWorker { run_id: RunId },
}
