use std::sync::Once;
use std::time::Duration;

use wordfreq_core::{
    count_chunk, update, AppState, ChunkPolicy, Effect, Msg, Outcome, RunPhase, NO_WORDS_TEXT,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(wordfreq_logging::initialize_for_tests);
}

fn analyze(state: AppState, input: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::InputChanged(input.to_string()));
    update(state, Msg::AnalyzeClicked)
}

/// Plays the host and worker for every effect until nothing is left to do.
/// Returns the final state and how many chunks were counted.
fn pump(mut state: AppState, mut effects: Vec<Effect>) -> (AppState, usize) {
    let mut counted = 0;
    while !effects.is_empty() {
        let mut next = Vec::new();
        for effect in effects {
            let msg = match effect {
                Effect::DispatchChunk {
                    run_id,
                    chunk_index,
                    tokens,
                } => {
                    counted += 1;
                    Msg::ChunkCounted {
                        run_id,
                        chunk_index,
                        pairs: count_chunk(&tokens).into_pairs(),
                        elapsed: Duration::from_millis(1),
                    }
                }
                Effect::YieldToHost { run_id } => Msg::ResumeRun { run_id },
                Effect::SpawnWorker { .. } | Effect::TerminateWorker { .. } => continue,
            };
            let (s, e) = update(state, msg);
            state = s;
            next.extend(e);
        }
        effects = next;
    }
    (state, counted)
}

fn small_chunks() -> ChunkPolicy {
    ChunkPolicy::new(2, 2, 2, Duration::from_millis(10)).unwrap()
}

fn ready_result(state: &AppState) -> (std::sync::Arc<wordfreq_core::AnalysisResult>, bool) {
    match state.view().outcome {
        Some(Outcome::Ready { result, from_cache }) => (result, from_cache),
        other => panic!("expected ready outcome, got {other:?}"),
    }
}

#[test]
fn analyze_starts_run_with_worker_and_first_chunk() {
    init_logging();
    let (state, effects) = analyze(AppState::with_policy(small_chunks()), "a b a c b a");

    let view = state.view();
    assert_eq!(view.phase, RunPhase::Running);
    assert!(view.busy);
    assert_eq!(view.tokens_total, 6);
    assert_eq!(view.outcome, None);
    assert_eq!(
        effects,
        vec![
            Effect::SpawnWorker { run_id: 1 },
            Effect::DispatchChunk {
                run_id: 1,
                chunk_index: 0,
                tokens: vec!["a".to_string(), "b".to_string()],
            },
        ]
    );
}

#[test]
fn chunk_result_yields_before_next_dispatch() {
    init_logging();
    let (state, _) = analyze(AppState::with_policy(small_chunks()), "a b a c");
    let (state, effects) = update(
        state,
        Msg::ChunkCounted {
            run_id: 1,
            chunk_index: 0,
            pairs: vec![("a".into(), 1), ("b".into(), 1)],
            elapsed: Duration::from_millis(1),
        },
    );
    assert_eq!(effects, vec![Effect::YieldToHost { run_id: 1 }]);
    assert_eq!(state.view().tokens_processed, 2);

    let (_state, effects) = update(state, Msg::ResumeRun { run_id: 1 });
    assert_eq!(
        effects,
        vec![Effect::DispatchChunk {
            run_id: 1,
            chunk_index: 1,
            tokens: vec!["a".to_string(), "c".to_string()],
        }]
    );
}

#[test]
fn completed_run_publishes_counts_and_terminates_worker() {
    init_logging();
    let (state, effects) = analyze(AppState::with_policy(small_chunks()), "a b a c b a");
    let (mut state, counted) = pump(state, effects);

    assert_eq!(counted, 3);
    let view = state.view();
    assert_eq!(view.phase, RunPhase::Completed);
    assert!(!view.busy);
    let (result, from_cache) = ready_result(&state);
    assert!(!from_cache);
    assert_eq!(result.counts.get("a"), Some(3));
    assert_eq!(result.counts.get("b"), Some(2));
    assert_eq!(result.counts.get("c"), Some(1));
    assert_eq!(result.counts.total(), 6);
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn repeated_identical_input_is_served_from_cache() {
    init_logging();
    let text = "The quick brown fox. The fox runs.";
    let (state, effects) = analyze(AppState::with_policy(small_chunks()), text);
    let (state, first_count) = pump(state, effects);
    assert!(first_count > 0);
    let (first, _) = ready_result(&state);

    let (state, effects) = analyze(state, text);
    assert!(effects.is_empty());
    let (state, second_count) = pump(state, effects);
    assert_eq!(second_count, 0);

    let (second, from_cache) = ready_result(&state);
    assert!(from_cache);
    assert_eq!(first.counts, second.counts);
    assert_eq!(first.formatted, second.formatted);
    let most = second.summary.most_frequent.as_ref().unwrap();
    assert_eq!(most.words, vec!["the".to_string(), "fox".to_string()]);
    assert_eq!(most.count, 2);
}

#[test]
fn empty_input_is_no_words_not_an_error() {
    init_logging();
    for input in ["", "   ", "?!"] {
        let (state, effects) = analyze(AppState::new(), input);
        assert!(effects.is_empty(), "input {input:?}");
        let view = state.view();
        assert_eq!(view.phase, RunPhase::Completed);
        assert_eq!(view.outcome, Some(Outcome::NoWords));
        assert_eq!(view.outcome.unwrap().display_text(), NO_WORDS_TEXT);
    }
}

#[test]
fn empty_run_keeps_previous_cache_entry() {
    init_logging();
    let (state, effects) = analyze(AppState::new(), "hello world");
    let (state, _) = pump(state, effects);
    let (state, _) = analyze(state, "   ");
    assert_eq!(state.cache().key(), Some("hello world"));

    let (state, effects) = analyze(state, "hello world");
    assert!(effects.is_empty());
    assert!(ready_result(&state).1);
}

#[test]
fn worker_failure_fails_run_and_keeps_cache() {
    init_logging();
    let (state, effects) = analyze(AppState::with_policy(small_chunks()), "x y");
    let (state, _) = pump(state, effects);

    let (state, _) = analyze(state, "a b c d");
    let (state, effects) = update(
        state,
        Msg::ChunkFailed {
            run_id: 2,
            chunk_index: 0,
            message: "worker crashed".into(),
        },
    );
    assert_eq!(effects, vec![Effect::TerminateWorker { run_id: 2 }]);
    let view = state.view();
    assert_eq!(view.phase, RunPhase::Failed);
    assert!(!view.busy);
    assert_eq!(
        view.outcome.as_ref().map(Outcome::display_text),
        Some("Worker error: worker crashed".to_string())
    );
    assert_eq!(state.cache().key(), Some("x y"));

    // Late results for the failed run change nothing.
    let (state, effects) = update(
        state,
        Msg::ChunkCounted {
            run_id: 2,
            chunk_index: 0,
            pairs: vec![("a".into(), 1), ("b".into(), 1)],
            elapsed: Duration::from_millis(1),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().phase, RunPhase::Failed);
}

#[test]
fn miscounted_chunk_fails_run() {
    init_logging();
    let (state, _) = analyze(AppState::with_policy(small_chunks()), "a b c");
    let (state, effects) = update(
        state,
        Msg::ChunkCounted {
            run_id: 1,
            chunk_index: 0,
            pairs: vec![("a".into(), 5)],
            elapsed: Duration::from_millis(1),
        },
    );
    assert_eq!(effects, vec![Effect::TerminateWorker { run_id: 1 }]);
    assert!(matches!(state.view().outcome, Some(Outcome::Failed { .. })));
}

#[test]
fn tick_and_noop_change_nothing() {
    init_logging();
    let mut state = AppState::new();
    for msg in [Msg::Tick, Msg::NoOp] {
        let (next, effects) = update(state, msg);
        assert!(effects.is_empty());
        state = next;
    }
    assert!(!state.consume_dirty());
    assert_eq!(state.view().phase, RunPhase::Idle);
}
