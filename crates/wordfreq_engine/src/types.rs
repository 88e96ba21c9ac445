use std::time::Instant;

use thiserror::Error;
use wordfreq_core::RunId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CountError {
    #[error("empty chunk")]
    EmptyChunk,
    #[error("{0}")]
    Other(String),
}

/// Why a chunk produced no partial table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkerError {
    #[error("worker crashed: {0}")]
    Crashed(String),
    #[error("count failed: {0}")]
    Count(#[from] CountError),
    #[error("could not start worker: {0}")]
    Spawn(String),
    #[error("worker channel closed")]
    ChannelClosed,
    #[error("no worker for run {0}")]
    UnknownRun(RunId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ChunkCounted {
        run_id: RunId,
        chunk_index: usize,
        pairs: Vec<(String, u64)>,
        /// When the host handed the chunk over; receipt minus this is the
        /// round trip.
        dispatched_at: Instant,
    },
    ChunkFailed {
        run_id: RunId,
        chunk_index: usize,
        error: WorkerError,
    },
}
