use std::time::Duration;

use wordfreq_core::{count_chunk, update, AppState, ChunkPolicy, Effect, Msg, Outcome, RunPhase};

fn analyze(state: AppState, input: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::InputChanged(input.to_string()));
    update(state, Msg::AnalyzeClicked)
}

fn one_token_chunks() -> ChunkPolicy {
    ChunkPolicy::new(1, 1, 1, Duration::from_millis(10)).unwrap()
}

fn counted(run_id: u64, chunk_index: usize, tokens: &[&str]) -> Msg {
    let tokens: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    Msg::ChunkCounted {
        run_id,
        chunk_index,
        pairs: count_chunk(&tokens).into_pairs(),
        elapsed: Duration::from_millis(1),
    }
}

#[test]
fn new_request_cancels_running_run() {
    let (state, _) = analyze(AppState::with_policy(one_token_chunks()), "a a a");
    let (state, _) = update(state, counted(1, 0, &["a"]));

    let (state, effects) = analyze(state, "b c");
    assert_eq!(
        effects,
        vec![
            Effect::TerminateWorker { run_id: 1 },
            Effect::SpawnWorker { run_id: 2 },
            Effect::DispatchChunk {
                run_id: 2,
                chunk_index: 0,
                tokens: vec!["b".to_string()],
            },
        ]
    );
    assert_eq!(state.view().run_id, Some(2));
}

#[test]
fn late_results_from_cancelled_run_are_discarded() {
    let (state, _) = analyze(AppState::with_policy(one_token_chunks()), "a a");
    let (state, _) = analyze(state, "b c");

    // Run 1's in-flight chunk and a pending resume arrive after run 2 started.
    let (state, effects) = update(state, counted(1, 0, &["a"]));
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::ResumeRun { run_id: 1 });
    assert!(effects.is_empty());
    let (state, effects) = update(
        state,
        Msg::ChunkFailed {
            run_id: 1,
            chunk_index: 0,
            message: "terminated".into(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().phase, RunPhase::Running);
    assert_eq!(state.view().tokens_processed, 0);

    let (state, effects) = update(state, counted(2, 0, &["b"]));
    assert_eq!(effects, vec![Effect::YieldToHost { run_id: 2 }]);
    let (state, _) = update(state, Msg::ResumeRun { run_id: 2 });
    let (state, effects) = update(state, counted(2, 1, &["c"]));
    assert_eq!(effects, vec![Effect::TerminateWorker { run_id: 2 }]);

    let Some(Outcome::Ready { result, .. }) = state.view().outcome else {
        panic!("run 2 should be ready");
    };
    assert_eq!(result.counts.get("a"), None);
    assert_eq!(result.counts.get("b"), Some(1));
    assert_eq!(result.counts.get("c"), Some(1));
    assert_eq!(state.cache().key(), Some("b c"));
}

#[test]
fn cache_hit_cancels_running_run() {
    let (state, _) = analyze(AppState::with_policy(one_token_chunks()), "z");
    let (state, _) = update(state, counted(1, 0, &["z"]));
    assert_eq!(state.cache().key(), Some("z"));

    let (state, _) = analyze(state, "p q r");
    let (state, effects) = analyze(state, "z");
    assert_eq!(effects, vec![Effect::TerminateWorker { run_id: 2 }]);

    let view = state.view();
    assert!(!view.busy);
    assert!(matches!(
        view.outcome,
        Some(Outcome::Ready {
            from_cache: true,
            ..
        })
    ));

    let (state, effects) = update(state, counted(2, 0, &["p"]));
    assert!(effects.is_empty());
    assert_eq!(state.cache().key(), Some("z"));
}

#[test]
fn input_edits_do_not_affect_running_snapshot() {
    let (state, _) = analyze(AppState::with_policy(one_token_chunks()), "a b");
    let (state, _) = update(state, Msg::InputChanged("something else".into()));
    let (state, _) = update(state, counted(1, 0, &["a"]));
    let (state, _) = update(state, Msg::ResumeRun { run_id: 1 });
    let (state, _) = update(state, counted(1, 1, &["b"]));

    assert_eq!(state.cache().key(), Some("a b"));
}
