use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Instant;

use wordfreq_core::RunId;
use wordfreq_logging::{analytics_debug, analytics_warn};

use crate::{ChunkCounter, EngineEvent, WorkerError};

pub(crate) struct ChunkJob {
    pub chunk_index: usize,
    pub tokens: Vec<String>,
    pub dispatched_at: Instant,
}

/// Execution context of one run: a dedicated thread fed over a channel.
///
/// Dropping the handle closes the channel; the thread exits after the job it
/// may be working on.
pub(crate) struct RunWorker {
    job_tx: mpsc::Sender<ChunkJob>,
}

impl RunWorker {
    pub fn spawn(
        run_id: RunId,
        counter: Arc<dyn ChunkCounter>,
        event_tx: mpsc::Sender<EngineEvent>,
    ) -> std::io::Result<Self> {
        let (job_tx, job_rx) = mpsc::channel::<ChunkJob>();
        thread::Builder::new()
            .name(format!("wordfreq-run-{run_id}"))
            .spawn(move || {
                wordfreq_logging::set_worker_run(run_id);
                analytics_debug!("Worker started");
                while let Ok(job) = job_rx.recv() {
                    let event = count_job(run_id, counter.as_ref(), job);
                    if event_tx.send(event).is_err() {
                        break;
                    }
                }
                analytics_debug!("Worker stopped");
            })?;
        Ok(Self { job_tx })
    }

    /// Hands a chunk over. Gives the job back if the thread is gone.
    pub fn send(&self, job: ChunkJob) -> Result<(), ChunkJob> {
        self.job_tx.send(job).map_err(|err| err.0)
    }
}

fn count_job(run_id: RunId, counter: &dyn ChunkCounter, job: ChunkJob) -> EngineEvent {
    let ChunkJob {
        chunk_index,
        tokens,
        dispatched_at,
    } = job;

    match panic::catch_unwind(AssertUnwindSafe(|| counter.count(&tokens))) {
        Ok(Ok(pairs)) => EngineEvent::ChunkCounted {
            run_id,
            chunk_index,
            pairs,
            dispatched_at,
        },
        Ok(Err(err)) => {
            analytics_warn!("Chunk {} failed: {}", chunk_index, err);
            EngineEvent::ChunkFailed {
                run_id,
                chunk_index,
                error: WorkerError::Count(err),
            }
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            analytics_warn!("Chunk {} crashed: {}", chunk_index, message);
            EngineEvent::ChunkFailed {
                run_id,
                chunk_index,
                error: WorkerError::Crashed(message),
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_owned()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_owned()
    }
}
