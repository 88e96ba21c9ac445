use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_INITIAL_CHUNK: usize = 10_000;
pub const DEFAULT_MIN_CHUNK: usize = 1_000;
pub const DEFAULT_MAX_CHUNK: usize = 100_000;
/// Roughly one display frame.
pub const DEFAULT_TARGET_LATENCY: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("minimum chunk size must be at least 1")]
    ZeroMinimum,
    #[error("chunk bounds are inverted (min {min} > max {max})")]
    InvertedBounds { min: usize, max: usize },
    #[error("initial chunk size {initial} outside [{min}, {max}]")]
    InitialOutOfBounds {
        initial: usize,
        min: usize,
        max: usize,
    },
    #[error("target latency must be positive")]
    ZeroLatency,
}

/// Bounds and target for the per-run chunk-size feedback controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPolicy {
    initial: usize,
    min: usize,
    max: usize,
    target_latency: Duration,
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        Self {
            initial: DEFAULT_INITIAL_CHUNK,
            min: DEFAULT_MIN_CHUNK,
            max: DEFAULT_MAX_CHUNK,
            target_latency: DEFAULT_TARGET_LATENCY,
        }
    }
}

impl ChunkPolicy {
    pub fn new(
        initial: usize,
        min: usize,
        max: usize,
        target_latency: Duration,
    ) -> Result<Self, PolicyError> {
        if min == 0 {
            return Err(PolicyError::ZeroMinimum);
        }
        if min > max {
            return Err(PolicyError::InvertedBounds { min, max });
        }
        if initial < min || initial > max {
            return Err(PolicyError::InitialOutOfBounds { initial, min, max });
        }
        if target_latency.is_zero() {
            return Err(PolicyError::ZeroLatency);
        }
        Ok(Self {
            initial,
            min,
            max,
            target_latency,
        })
    }

    pub fn initial(&self) -> usize {
        self.initial
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn target_latency(&self) -> Duration {
        self.target_latency
    }

    /// Next chunk size after a chunk of `current` tokens took `elapsed`.
    ///
    /// Fast chunks double the size up to `max`; slow chunks halve it down to
    /// `min`. A chunk exactly on target keeps the size.
    pub fn next_size(&self, current: usize, elapsed: Duration) -> usize {
        if elapsed < self.target_latency && current < self.max {
            current.saturating_mul(2).min(self.max)
        } else if elapsed > self.target_latency && current > self.min {
            (current / 2).max(self.min)
        } else {
            current
        }
    }
}
