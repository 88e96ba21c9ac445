//! Word-frequency engine: per-run worker threads that count chunks off the
//! host thread.
mod counter;
mod engine;
mod types;
mod worker;

pub use counter::{ChunkCounter, MapChunkCounter};
pub use engine::EngineHandle;
pub use types::{CountError, EngineEvent, WorkerError};
