use wordfreq_core::count_chunk;

use crate::CountError;

/// Work done inside a worker for one chunk.
pub trait ChunkCounter: Send + Sync {
    fn count(&self, chunk: &[String]) -> Result<Vec<(String, u64)>, CountError>;
}

/// Hash-map counter; answers with pairs in first-occurrence order.
#[derive(Debug, Default, Clone, Copy)]
pub struct MapChunkCounter;

impl ChunkCounter for MapChunkCounter {
    fn count(&self, chunk: &[String]) -> Result<Vec<(String, u64)>, CountError> {
        if chunk.is_empty() {
            return Err(CountError::EmptyChunk);
        }
        Ok(count_chunk(chunk).into_pairs())
    }
}
