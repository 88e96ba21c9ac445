use std::sync::Arc;

use crate::{AnalysisResult, RunId, RunPhase, NO_WORDS_TEXT};

/// Terminal result of the latest analysis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    NoWords,
    Ready {
        result: Arc<AnalysisResult>,
        from_cache: bool,
    },
    Failed {
        message: String,
    },
}

impl Outcome {
    /// Text shown in the result panel.
    pub fn display_text(&self) -> String {
        match self {
            Outcome::NoWords => NO_WORDS_TEXT.to_owned(),
            Outcome::Ready { result, .. } => result.formatted.clone(),
            Outcome::Failed { message } => format!("Worker error: {message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: RunPhase,
    /// Spinner visibility; true exactly while a run is in progress.
    pub busy: bool,
    pub run_id: Option<RunId>,
    pub tokens_total: usize,
    pub tokens_processed: usize,
    pub chunk_size: Option<usize>,
    pub chunks_completed: usize,
    pub outcome: Option<Outcome>,
    pub dirty: bool,
}
