use std::sync::Once;

use webrag_core::{
    update, Effect, IngestResult, Msg, OperationOutcome, QueryAnswer, SessionState,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(webrag_logging::initialize_for_tests);
}

fn pending_ingest(state: SessionState) -> (SessionState, u64) {
    let (state, _) = update(state, Msg::AddressesEdited("http://a.example".to_string()));
    let (state, effects) = update(state, Msg::IngestSubmitted {
        clear_existing: false,
    });
    let seq = match effects.as_slice() {
        [Effect::SubmitIngest { seq, .. }] => *seq,
        other => panic!("unexpected effects: {other:?}"),
    };
    (state, seq)
}

#[test]
fn duplicate_ingest_trigger_is_a_noop() {
    init_logging();
    let (state, _seq) = pending_ingest(SessionState::new());

    let (next, effects) = update(state.clone(), Msg::IngestSubmitted {
        clear_existing: true,
    });
    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn pending_ingest_does_not_block_query() {
    init_logging();
    let (state, _seq) = pending_ingest(SessionState::new());

    let (state, _) = update(state, Msg::QuestionEdited("What is X?".to_string()));
    let (state, effects) = update(state, Msg::QuerySubmitted);

    assert!(matches!(
        effects.as_slice(),
        [Effect::SubmitQuery { .. }]
    ));
    assert!(state.view().ingest.is_pending());
    assert!(state.view().query.is_pending());
}

#[test]
fn stale_settlement_is_discarded() {
    init_logging();
    let (state, first_seq) = pending_ingest(SessionState::new());

    // Settle the first invocation, then start a second one.
    let (state, _) = update(
        state,
        Msg::IngestSettled {
            seq: first_seq,
            result: Ok(IngestResult { chunks_stored: 1 }),
        },
    );
    let (state, effects) = update(state, Msg::IngestSubmitted {
        clear_existing: false,
    });
    let second_seq = match effects.as_slice() {
        [Effect::SubmitIngest { seq, .. }] => *seq,
        other => panic!("unexpected effects: {other:?}"),
    };
    assert!(second_seq > first_seq);

    // A late echo of the first invocation must not settle the second.
    let (state, effects) = update(
        state,
        Msg::IngestSettled {
            seq: first_seq,
            result: Ok(IngestResult { chunks_stored: 99 }),
        },
    );
    assert!(effects.is_empty());
    assert!(state.view().ingest.is_pending());
    assert_eq!(
        state.view().last_ingest,
        Some(IngestResult { chunks_stored: 1 })
    );
}

#[test]
fn retrigger_after_settlement_discards_previous_value() {
    init_logging();
    let (state, seq) = pending_ingest(SessionState::new());
    let (state, _) = update(
        state,
        Msg::IngestSettled {
            seq,
            result: Ok(IngestResult { chunks_stored: 3 }),
        },
    );
    assert!(matches!(
        state.view().ingest,
        OperationOutcome::Succeeded(_)
    ));

    // A new trigger goes straight back to Pending.
    let (state, effects) = update(state, Msg::IngestSubmitted {
        clear_existing: false,
    });
    assert!(matches!(
        effects.as_slice(),
        [Effect::SubmitIngest { .. }]
    ));
    assert!(state.view().ingest.is_pending());
    // The stored field keeps the settled value until the new call lands.
    assert_eq!(
        state.view().last_ingest,
        Some(IngestResult { chunks_stored: 3 })
    );
}

#[test]
fn query_settlement_for_unknown_seq_is_ignored_when_idle() {
    init_logging();
    let state = SessionState::new();

    let (next, effects) = update(
        state.clone(),
        Msg::QuerySettled {
            seq: 42,
            result: Ok(QueryAnswer {
                answer: "ghost".to_string(),
                sources: Vec::new(),
            }),
        },
    );
    assert_eq!(state, next);
    assert!(effects.is_empty());
}
