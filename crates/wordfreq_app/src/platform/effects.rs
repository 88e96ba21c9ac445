use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use wordfreq_core::{Effect, Msg, RunId};
use wordfreq_engine::{ChunkCounter, EngineEvent, EngineHandle, MapChunkCounter};
use wordfreq_logging::{analytics_debug, analytics_warn};

use super::config::YieldMode;

const EVENT_POLL: Duration = Duration::from_millis(50);

/// Executes core effects against the engine and feeds engine events back
/// into the host's message queue.
pub struct EffectRunner {
    engine: EngineHandle,
    msg_tx: mpsc::Sender<Msg>,
    yield_mode: YieldMode,
    deferred: Vec<RunId>,
}

impl EffectRunner {
    pub fn new(msg_tx: mpsc::Sender<Msg>, yield_mode: YieldMode) -> Self {
        Self::with_counter(msg_tx, yield_mode, Arc::new(MapChunkCounter))
    }

    pub fn with_counter(
        msg_tx: mpsc::Sender<Msg>,
        yield_mode: YieldMode,
        counter: Arc<dyn ChunkCounter>,
    ) -> Self {
        let engine = EngineHandle::new(counter);
        let runner = Self {
            engine,
            msg_tx,
            yield_mode,
            deferred: Vec::new(),
        };
        runner.spawn_event_loop();
        runner
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SpawnWorker { run_id } => self.engine.start_run(run_id),
                Effect::DispatchChunk {
                    run_id,
                    chunk_index,
                    tokens,
                } => {
                    analytics_debug!(
                        "DispatchChunk run_id={} chunk={} tokens={}",
                        run_id,
                        chunk_index,
                        tokens.len()
                    );
                    self.engine.dispatch(run_id, chunk_index, tokens);
                }
                Effect::YieldToHost { run_id } => match self.yield_mode {
                    YieldMode::Idle => self.deferred.push(run_id),
                    YieldMode::Immediate => {
                        let _ = self.msg_tx.send(Msg::ResumeRun { run_id });
                    }
                },
                Effect::TerminateWorker { run_id } => {
                    self.deferred.retain(|&deferred| deferred != run_id);
                    self.engine.stop_run(run_id);
                }
            }
        }
    }

    /// Called when the host has drained its queue.
    pub fn release_deferred(&mut self) {
        for run_id in self.deferred.drain(..) {
            let _ = self.msg_tx.send(Msg::ResumeRun { run_id });
        }
    }

    pub fn has_deferred(&self) -> bool {
        !self.deferred.is_empty()
    }

    fn spawn_event_loop(&self) {
        let engine = self.engine.clone();
        let msg_tx = self.msg_tx.clone();
        thread::spawn(move || loop {
            let Some(event) = engine.recv_timeout(EVENT_POLL) else {
                continue;
            };
            if msg_tx.send(map_event(event)).is_err() {
                break;
            }
        });
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ChunkCounted {
            run_id,
            chunk_index,
            pairs,
            dispatched_at,
        } => Msg::ChunkCounted {
            run_id,
            chunk_index,
            pairs,
            elapsed: dispatched_at.elapsed(),
        },
        EngineEvent::ChunkFailed {
            run_id,
            chunk_index,
            error,
        } => {
            analytics_warn!("Run {} chunk {} failed: {}", run_id, chunk_index, error);
            Msg::ChunkFailed {
                run_id,
                chunk_index,
                message: error.to_string(),
            }
        }
    }
}
