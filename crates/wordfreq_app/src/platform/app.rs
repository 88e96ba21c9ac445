use std::collections::VecDeque;
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use wordfreq_core::{update, AppState, AppViewModel, Msg, Outcome};
use wordfreq_logging::{analytics_debug, analytics_info};

use super::cli::Cli;
use super::effects::EffectRunner;
use super::{config, logging, render};

/// How long the host waits for a message before posting a `Tick`.
const TICK_INTERVAL: Duration = Duration::from_millis(75);

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    logging::initialize(cli.log, cli.verbose);

    let config = config::load(cli.config.as_deref())?.with_overrides(&cli);
    let policy = config
        .chunk
        .to_policy()
        .context("invalid chunk settings")?;
    analytics_info!(
        "Chunk policy: initial {} in [{}, {}], target {:?}, yield {:?}",
        policy.initial(),
        policy.min(),
        policy.max(),
        policy.target_latency(),
        config.yield_mode
    );

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let input = if cli.interactive {
        spawn_stdin_lines(msg_tx.clone())
    } else {
        InputFeed::Batch(collect_requests(&cli)?)
    };
    let runner = EffectRunner::new(msg_tx, config.yield_mode);

    let mut host = Host::new(
        AppState::with_policy(policy),
        runner,
        input,
        io::stdout().lock(),
    );
    host.run(&msg_rx)
}

/// Where analysis requests come from.
enum InputFeed {
    /// Submitted one at a time, each waiting for the previous outcome.
    Batch(VecDeque<String>),
    /// A stdin thread posts requests as lines arrive; `closed` flips at EOF.
    Interactive { closed: Arc<AtomicBool> },
}

fn collect_requests(cli: &Cli) -> anyhow::Result<VecDeque<String>> {
    let texts = if cli.files.is_empty() {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        vec![text]
    } else {
        cli.files
            .iter()
            .map(|path| {
                fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
            })
            .collect::<anyhow::Result<Vec<_>>>()?
    };

    let repeat = cli.repeat as usize;
    Ok(texts
        .into_iter()
        .flat_map(|text| std::iter::repeat_n(text, repeat))
        .collect())
}

fn spawn_stdin_lines(msg_tx: mpsc::Sender<Msg>) -> InputFeed {
    let closed = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&closed);
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if msg_tx.send(Msg::InputChanged(line)).is_err()
                || msg_tx.send(Msg::AnalyzeClicked).is_err()
            {
                break;
            }
        }
        flag.store(true, Ordering::Release);
    });
    InputFeed::Interactive { closed }
}

/// Single owner of the dashboard state. Drains the message queue, runs the
/// resulting effects and renders when the state changed.
struct Host<W: Write> {
    state: AppState,
    runner: EffectRunner,
    input: InputFeed,
    out: W,
    awaiting_outcome: bool,
}

impl<W: Write> Host<W> {
    fn new(state: AppState, runner: EffectRunner, input: InputFeed, out: W) -> Self {
        Self {
            state,
            runner,
            input,
            out,
            awaiting_outcome: false,
        }
    }

    fn run(&mut self, msg_rx: &mpsc::Receiver<Msg>) -> anyhow::Result<()> {
        let mut inbox = Vec::new();
        loop {
            // Sampled before draining so every request sent before EOF is seen.
            let input_done = self.input_exhausted();
            self.submit_next_request()?;

            match msg_rx.recv_timeout(TICK_INTERVAL) {
                Ok(msg) => inbox.push(msg),
                Err(mpsc::RecvTimeoutError::Timeout) => inbox.push(Msg::Tick),
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
            inbox.extend(msg_rx.try_iter());
            for msg in inbox.drain(..) {
                self.dispatch_msg(msg)?;
            }

            // Queue drained: the host is idle, let yielded runs continue.
            self.runner.release_deferred();

            if input_done && !self.awaiting_outcome && !self.state.is_busy() {
                break;
            }
        }
        Ok(())
    }

    fn input_exhausted(&self) -> bool {
        match &self.input {
            InputFeed::Batch(queue) => queue.is_empty(),
            InputFeed::Interactive { closed } => closed.load(Ordering::Acquire),
        }
    }

    fn submit_next_request(&mut self) -> anyhow::Result<()> {
        if self.awaiting_outcome || self.state.is_busy() {
            return Ok(());
        }
        let InputFeed::Batch(queue) = &mut self.input else {
            return Ok(());
        };
        if let Some(text) = queue.pop_front() {
            self.dispatch_msg(Msg::InputChanged(text))?;
            self.dispatch_msg(Msg::AnalyzeClicked)?;
        }
        Ok(())
    }

    fn dispatch_msg(&mut self, msg: Msg) -> anyhow::Result<()> {
        if msg == Msg::AnalyzeClicked {
            self.awaiting_outcome = true;
        }

        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        let view = state.view();
        self.state = state;

        self.runner.enqueue(effects);
        if was_dirty {
            self.render(&view)?;
        }
        Ok(())
    }

    fn render(&mut self, view: &AppViewModel) -> io::Result<()> {
        if view.busy {
            analytics_debug!("{}", render::progress_text(view));
            return Ok(());
        }
        if !self.awaiting_outcome {
            return Ok(());
        }
        let Some(text) = render::outcome_text(view) else {
            return Ok(());
        };
        if let Some(Outcome::Ready {
            from_cache: true, ..
        }) = &view.outcome
        {
            analytics_info!("Served from cache");
        }
        writeln!(self.out, "{text}\n")?;
        self.out.flush()?;
        self.awaiting_outcome = false;
        Ok(())
    }
}
