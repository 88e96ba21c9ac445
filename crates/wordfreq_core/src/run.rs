use std::time::Duration;

use thiserror::Error;

use crate::{ChunkPolicy, FrequencyTable};

pub type RunId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPhase {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
}

/// One chunk handed to a worker. Owns a copy of its tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRequest {
    pub chunk_index: usize,
    pub tokens: Vec<String>,
}

/// What the scheduler wants after a chunk was merged.
#[derive(Debug, PartialEq, Eq)]
pub enum RunStep {
    /// More tokens remain; give the host a turn before the next dispatch.
    Yield,
    /// Last chunk merged. Carries the final aggregate table.
    Completed(FrequencyTable),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("chunk {chunk_index} is not in flight")]
    NotInFlight { chunk_index: usize },
    #[error("chunk {chunk_index} counted {actual} tokens, expected {expected}")]
    CountMismatch {
        chunk_index: usize,
        expected: u64,
        actual: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    chunk_index: usize,
    len: usize,
}

/// Scheduler state for one analysis of one input snapshot.
///
/// At most one chunk is in flight. The aggregate, offset and chunk size are
/// only touched here.
#[derive(Debug, Clone)]
pub struct Run {
    id: RunId,
    input: String,
    tokens: Vec<String>,
    policy: ChunkPolicy,
    phase: RunPhase,
    offset: usize,
    chunk_size: usize,
    next_chunk_index: usize,
    in_flight: Option<InFlight>,
    awaiting_resume: bool,
    aggregate: FrequencyTable,
}

impl Run {
    pub fn new(id: RunId, input: String, tokens: Vec<String>, policy: ChunkPolicy) -> Self {
        Self {
            id,
            input,
            tokens,
            policy,
            phase: RunPhase::Idle,
            offset: 0,
            chunk_size: policy.initial(),
            next_chunk_index: 0,
            in_flight: None,
            awaiting_resume: false,
            aggregate: FrequencyTable::new(),
        }
    }

    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn tokens_total(&self) -> usize {
        self.tokens.len()
    }

    pub fn tokens_processed(&self) -> usize {
        self.offset
    }

    pub fn chunks_completed(&self) -> usize {
        self.next_chunk_index - usize::from(self.in_flight.is_some())
    }

    /// Leaves `Idle`. Returns the first chunk, or `None` when there are no
    /// tokens and the run went straight to `Completed`.
    pub fn begin(&mut self) -> Option<ChunkRequest> {
        if self.phase != RunPhase::Idle {
            return None;
        }
        if self.tokens.is_empty() {
            self.phase = RunPhase::Completed;
            return None;
        }
        self.phase = RunPhase::Running;
        Some(self.take_next_chunk())
    }

    /// Merges the partial table for the chunk in flight and adapts the size.
    pub fn accept(
        &mut self,
        chunk_index: usize,
        partial: FrequencyTable,
        elapsed: Duration,
    ) -> Result<RunStep, RunError> {
        let in_flight = match self.in_flight {
            Some(f) if self.phase == RunPhase::Running && f.chunk_index == chunk_index => f,
            _ => return Err(RunError::NotInFlight { chunk_index }),
        };

        let counted = partial.total();
        if counted != in_flight.len as u64 {
            return Err(RunError::CountMismatch {
                chunk_index,
                expected: in_flight.len as u64,
                actual: counted,
            });
        }

        self.in_flight = None;
        self.aggregate.merge(partial);
        self.offset += in_flight.len;
        self.chunk_size = self.policy.next_size(self.chunk_size, elapsed);

        if self.offset >= self.tokens.len() {
            self.phase = RunPhase::Completed;
            let aggregate = std::mem::take(&mut self.aggregate);
            debug_assert_eq!(aggregate.total(), self.tokens.len() as u64);
            return Ok(RunStep::Completed(aggregate));
        }

        self.awaiting_resume = true;
        Ok(RunStep::Yield)
    }

    /// Host handed control back; dispatch the next chunk if one is due.
    pub fn resume(&mut self) -> Option<ChunkRequest> {
        if self.phase != RunPhase::Running || !self.awaiting_resume {
            return None;
        }
        self.awaiting_resume = false;
        Some(self.take_next_chunk())
    }

    /// Aborts the run. Partial results are discarded.
    pub fn fail(&mut self) {
        if self.phase == RunPhase::Running {
            self.phase = RunPhase::Failed;
            self.in_flight = None;
            self.awaiting_resume = false;
            self.aggregate = FrequencyTable::new();
        }
    }

    /// True when `chunk_index` is the chunk currently awaited.
    pub fn is_in_flight(&self, chunk_index: usize) -> bool {
        self.phase == RunPhase::Running
            && self.in_flight.is_some_and(|f| f.chunk_index == chunk_index)
    }

    fn take_next_chunk(&mut self) -> ChunkRequest {
        let end = self
            .offset
            .saturating_add(self.chunk_size)
            .min(self.tokens.len());
        let tokens = self.tokens[self.offset..end].to_vec();
        let chunk_index = self.next_chunk_index;
        self.next_chunk_index += 1;
        self.in_flight = Some(InFlight {
            chunk_index,
            len: tokens.len(),
        });
        ChunkRequest {
            chunk_index,
            tokens,
        }
    }
}
