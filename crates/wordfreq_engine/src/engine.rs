use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use wordfreq_core::RunId;
use wordfreq_logging::{analytics_debug, analytics_error, analytics_info};

use crate::worker::{ChunkJob, RunWorker};
use crate::{ChunkCounter, EngineEvent, WorkerError};

enum EngineCommand {
    StartRun {
        run_id: RunId,
    },
    Dispatch {
        run_id: RunId,
        chunk_index: usize,
        tokens: Vec<String>,
        dispatched_at: Instant,
    },
    StopRun {
        run_id: RunId,
    },
}

/// Host-side handle. Commands go to a supervisor thread that owns the
/// per-run workers; results come back on one shared event channel.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(counter: Arc<dyn ChunkCounter>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let mut supervisor = Supervisor {
                counter,
                event_tx,
                workers: HashMap::new(),
            };
            while let Ok(command) = cmd_rx.recv() {
                supervisor.handle(command);
            }
            analytics_debug!("Engine supervisor stopped");
        });

        Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        }
    }

    pub fn start_run(&self, run_id: RunId) {
        let _ = self.cmd_tx.send(EngineCommand::StartRun { run_id });
    }

    pub fn dispatch(&self, run_id: RunId, chunk_index: usize, tokens: Vec<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Dispatch {
            run_id,
            chunk_index,
            tokens,
            dispatched_at: Instant::now(),
        });
    }

    pub fn stop_run(&self, run_id: RunId) {
        let _ = self.cmd_tx.send(EngineCommand::StopRun { run_id });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }
}

struct Supervisor {
    counter: Arc<dyn ChunkCounter>,
    event_tx: mpsc::Sender<EngineEvent>,
    /// `Err` keeps the spawn failure so the next dispatch can report it.
    workers: HashMap<RunId, Result<RunWorker, String>>,
}

impl Supervisor {
    fn handle(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::StartRun { run_id } => {
                let worker =
                    RunWorker::spawn(run_id, Arc::clone(&self.counter), self.event_tx.clone())
                        .map_err(|err| {
                            analytics_error!("Failed to spawn worker for run {}: {}", run_id, err);
                            err.to_string()
                        });
                if worker.is_ok() {
                    analytics_info!("Worker for run {} started", run_id);
                }
                self.workers.insert(run_id, worker);
            }
            EngineCommand::Dispatch {
                run_id,
                chunk_index,
                tokens,
                dispatched_at,
            } => {
                let job = ChunkJob {
                    chunk_index,
                    tokens,
                    dispatched_at,
                };
                let sent = match self.workers.get(&run_id) {
                    Some(Ok(worker)) => worker
                        .send(job)
                        .map_err(|_| WorkerError::ChannelClosed),
                    Some(Err(message)) => Err(WorkerError::Spawn(message.clone())),
                    None => Err(WorkerError::UnknownRun(run_id)),
                };
                let Err(error) = sent else {
                    return;
                };
                if error == WorkerError::ChannelClosed {
                    self.workers.remove(&run_id);
                }
                let _ = self.event_tx.send(EngineEvent::ChunkFailed {
                    run_id,
                    chunk_index,
                    error,
                });
            }
            EngineCommand::StopRun { run_id } => {
                if self.workers.remove(&run_id).is_some() {
                    analytics_info!("Worker for run {} terminated", run_id);
                }
            }
        }
    }
}
