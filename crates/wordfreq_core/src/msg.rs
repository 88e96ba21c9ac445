use std::time::Duration;

use crate::RunId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Host replaced the contents of the input box.
    InputChanged(String),
    /// User asked for an analysis of the current input.
    AnalyzeClicked,
    /// A worker finished counting one chunk.
    ChunkCounted {
        run_id: RunId,
        chunk_index: usize,
        /// Partial frequency table as `(token, count)` pairs.
        pairs: Vec<(String, u64)>,
        /// Dispatch-to-receipt round trip.
        elapsed: Duration,
    },
    /// A worker crashed, errored, or its channel broke.
    ChunkFailed {
        run_id: RunId,
        chunk_index: usize,
        message: String,
    },
    /// Host is idle again after a yield; the run may dispatch its next chunk.
    ResumeRun { run_id: RunId },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
