use std::sync::Arc;
use std::time::Duration;

use wordfreq_logging::{analytics_debug, analytics_info, analytics_warn};

use crate::view_model::{AppViewModel, Outcome};
use crate::{
    tokenize, AnalysisResult, ChunkPolicy, Effect, FrequencyTable, ResultCache, Run, RunError,
    RunId, RunPhase, RunStep,
};

/// Everything the dashboard owns: the input snapshot source, the current
/// run, the result cache and the last published outcome.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    input: String,
    policy: ChunkPolicy,
    next_run_id: RunId,
    run: Option<Run>,
    cache: ResultCache,
    outcome: Option<Outcome>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ChunkPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        let run = self.run.as_ref();
        AppViewModel {
            phase: run.map_or(RunPhase::Idle, Run::phase),
            busy: self.is_busy(),
            run_id: run.map(Run::id),
            tokens_total: run.map_or(0, Run::tokens_total),
            tokens_processed: run.map_or(0, Run::tokens_processed),
            chunk_size: run
                .filter(|r| r.phase() == RunPhase::Running)
                .map(Run::chunk_size),
            chunks_completed: run.map_or(0, Run::chunks_completed),
            outcome: self.outcome.clone(),
            dirty: self.dirty,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.run
            .as_ref()
            .is_some_and(|r| r.phase() == RunPhase::Running)
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Returns and clears the dirty flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_input(&mut self, text: String) {
        self.input = text;
    }

    pub(crate) fn request_analysis(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(run_id) = self.cancel_active_run() {
            effects.push(Effect::TerminateWorker { run_id });
        }
        self.dirty = true;

        if let Some(result) = self.cache.lookup(&self.input) {
            analytics_debug!("Cache hit for input of {} bytes", self.input.len());
            self.run = None;
            self.outcome = Some(Outcome::Ready {
                result,
                from_cache: true,
            });
            return effects;
        }

        let input = self.input.clone();
        let tokens = tokenize(&input);
        self.next_run_id += 1;
        let run_id = self.next_run_id;
        let mut run = Run::new(run_id, input, tokens, self.policy);

        match run.begin() {
            None => {
                analytics_debug!("Run {} has no tokens", run_id);
                self.outcome = Some(Outcome::NoWords);
            }
            Some(request) => {
                analytics_info!(
                    "Run {} started: {} tokens, first chunk {}",
                    run_id,
                    run.tokens_total(),
                    request.tokens.len()
                );
                self.outcome = None;
                effects.push(Effect::SpawnWorker { run_id });
                effects.push(Effect::DispatchChunk {
                    run_id,
                    chunk_index: request.chunk_index,
                    tokens: request.tokens,
                });
            }
        }
        self.run = Some(run);
        effects
    }

    pub(crate) fn apply_chunk(
        &mut self,
        run_id: RunId,
        chunk_index: usize,
        pairs: Vec<(String, u64)>,
        elapsed: Duration,
    ) -> Vec<Effect> {
        let Some(run) = self.current_run_mut(run_id) else {
            analytics_debug!("Dropping chunk {} of superseded run {}", chunk_index, run_id);
            return Vec::new();
        };

        match run.accept(chunk_index, FrequencyTable::from_pairs(pairs), elapsed) {
            Ok(RunStep::Yield) => {
                analytics_debug!(
                    "Run {} chunk {} merged in {:?}; next size {}",
                    run_id,
                    chunk_index,
                    elapsed,
                    run.chunk_size()
                );
                self.dirty = true;
                vec![Effect::YieldToHost { run_id }]
            }
            Ok(RunStep::Completed(table)) => {
                let input = run.input().to_owned();
                let result = Arc::new(AnalysisResult::from_table(table));
                analytics_info!(
                    "Run {} completed: {} distinct tokens",
                    run_id,
                    result.counts.len()
                );
                self.cache.store(input, Arc::clone(&result));
                self.outcome = Some(Outcome::Ready {
                    result,
                    from_cache: false,
                });
                self.dirty = true;
                vec![Effect::TerminateWorker { run_id }]
            }
            Err(RunError::NotInFlight { .. }) => {
                analytics_debug!("Ignoring unexpected chunk {} for run {}", chunk_index, run_id);
                Vec::new()
            }
            Err(err @ RunError::CountMismatch { .. }) => {
                self.fail_current(run_id, err.to_string())
            }
        }
    }

    pub(crate) fn apply_failure(
        &mut self,
        run_id: RunId,
        chunk_index: usize,
        message: String,
    ) -> Vec<Effect> {
        let in_flight = self
            .current_run_mut(run_id)
            .is_some_and(|run| run.is_in_flight(chunk_index));
        if !in_flight {
            analytics_debug!("Ignoring failure of chunk {} for run {}", chunk_index, run_id);
            return Vec::new();
        }
        self.fail_current(run_id, message)
    }

    pub(crate) fn resume_run(&mut self, run_id: RunId) -> Vec<Effect> {
        let Some(request) = self.current_run_mut(run_id).and_then(Run::resume) else {
            return Vec::new();
        };
        vec![Effect::DispatchChunk {
            run_id,
            chunk_index: request.chunk_index,
            tokens: request.tokens,
        }]
    }

    fn fail_current(&mut self, run_id: RunId, message: String) -> Vec<Effect> {
        if let Some(run) = self.current_run_mut(run_id) {
            run.fail();
        }
        analytics_warn!("Run {} failed: {}", run_id, message);
        self.outcome = Some(Outcome::Failed { message });
        self.dirty = true;
        vec![Effect::TerminateWorker { run_id }]
    }

    /// Stops a run that is still in progress and returns its id.
    fn cancel_active_run(&mut self) -> Option<RunId> {
        let run = self.run.take_if(|r| r.phase() == RunPhase::Running)?;
        analytics_info!(
            "Run {} superseded after {} of {} tokens",
            run.id(),
            run.tokens_processed(),
            run.tokens_total()
        );
        Some(run.id())
    }

    fn current_run_mut(&mut self, run_id: RunId) -> Option<&mut Run> {
        self.run.as_mut().filter(|r| r.id() == run_id)
    }
}
