use std::sync::Once;

use webrag_core::{
    update, Effect, ErrorKind, IngestResult, Msg, OperationOutcome, PersistOp, QueryAnswer,
    SessionState, EMPTY_ANSWER_MESSAGE,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(webrag_logging::initialize_for_tests);
}

fn submit_addresses(state: SessionState, input: &str) -> (SessionState, Vec<Effect>) {
    let (state, _) = update(state, Msg::AddressesEdited(input.to_string()));
    update(state, Msg::IngestSubmitted {
        clear_existing: false,
    })
}

fn ask(state: SessionState, question: &str) -> (SessionState, Vec<Effect>) {
    let (state, _) = update(state, Msg::QuestionEdited(question.to_string()));
    update(state, Msg::QuerySubmitted)
}

#[test]
fn field_edits_persist_immediately() {
    init_logging();
    let state = SessionState::new();

    let (state, effects) = update(state, Msg::AddressesEdited("http://a.example\n".to_string()));
    assert_eq!(
        effects,
        vec![Effect::Persist(PersistOp::SaveAddresses(
            "http://a.example\n".to_string()
        ))]
    );

    let (state, effects) = update(state, Msg::QuestionEdited("What is X?".to_string()));
    assert_eq!(
        effects,
        vec![Effect::Persist(PersistOp::SaveQuestion(
            "What is X?".to_string()
        ))]
    );

    // An explicit clear of a field is still written as an empty string.
    let (_state, effects) = update(state, Msg::QuestionEdited(String::new()));
    assert_eq!(
        effects,
        vec![Effect::Persist(PersistOp::SaveQuestion(String::new()))]
    );
}

#[test]
fn blank_address_text_is_rejected_without_effects() {
    init_logging();
    let state = SessionState::new();

    let (next, effects) = submit_addresses(state, "   \n\n  \n");
    assert!(effects.is_empty());
    assert_eq!(next.view().ingest, OperationOutcome::Idle);
}

#[test]
fn blank_question_is_rejected_without_effects() {
    init_logging();
    let state = SessionState::new();

    let (next, effects) = ask(state, "   ");
    assert!(effects.is_empty());
    assert_eq!(next.view().query, OperationOutcome::Idle);
}

#[test]
fn ingest_filters_blank_lines_and_stores_result() {
    init_logging();
    let state = SessionState::new();

    let (state, effects) = submit_addresses(state, "http://a.example\n\nhttp://b.example");
    let seq = match effects.as_slice() {
        [Effect::SubmitIngest {
            seq,
            urls,
            clear_existing,
        }] => {
            assert_eq!(urls, &["http://a.example", "http://b.example"]);
            assert!(!clear_existing);
            *seq
        }
        other => panic!("unexpected effects: {other:?}"),
    };
    assert!(state.view().ingest.is_pending());

    let (state, effects) = update(
        state,
        Msg::IngestSettled {
            seq,
            result: Ok(IngestResult { chunks_stored: 7 }),
        },
    );
    let view = state.view();
    assert_eq!(view.last_ingest, Some(IngestResult { chunks_stored: 7 }));
    assert_eq!(
        view.ingest,
        OperationOutcome::Succeeded(IngestResult { chunks_stored: 7 })
    );
    assert_eq!(
        effects,
        vec![Effect::Persist(PersistOp::SaveIngestResult(Some(
            IngestResult { chunks_stored: 7 }
        )))]
    );
}

#[test]
fn query_success_writes_answer_and_keeps_sources_transient() {
    init_logging();
    let state = SessionState::new();

    let (state, effects) = ask(state, "What is X?");
    let seq = match effects.as_slice() {
        [Effect::SubmitQuery { seq, question }] => {
            assert_eq!(question, "What is X?");
            *seq
        }
        other => panic!("unexpected effects: {other:?}"),
    };

    let (state, effects) = update(
        state,
        Msg::QuerySettled {
            seq,
            result: Ok(QueryAnswer {
                answer: "X is a thing.".to_string(),
                sources: vec!["http://a.example".to_string()],
            }),
        },
    );
    let view = state.view();
    assert_eq!(view.answer, "X is a thing.");
    assert_eq!(
        view.query,
        OperationOutcome::Succeeded(QueryAnswer {
            answer: "X is a thing.".to_string(),
            sources: vec!["http://a.example".to_string()],
        })
    );
    // Only the answer text is mirrored to storage; sources stay transient.
    assert_eq!(
        effects,
        vec![Effect::Persist(PersistOp::SaveAnswer(
            "X is a thing.".to_string()
        ))]
    );
}

#[test]
fn empty_answer_is_reclassified_as_failure() {
    init_logging();
    let state = SessionState::new();

    let (state, effects) = ask(state, "What is X?");
    let seq = match effects.as_slice() {
        [Effect::SubmitQuery { seq, .. }] => *seq,
        other => panic!("unexpected effects: {other:?}"),
    };

    let (state, effects) = update(
        state,
        Msg::QuerySettled {
            seq,
            result: Ok(QueryAnswer {
                answer: String::new(),
                sources: Vec::new(),
            }),
        },
    );
    assert!(effects.is_empty());
    match state.view().query {
        OperationOutcome::Failed(descriptor) => {
            assert_eq!(descriptor.kind, ErrorKind::EmptyResult);
            assert_eq!(descriptor.message, EMPTY_ANSWER_MESSAGE);
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(state.view().answer, "");
}

#[test]
fn http_failure_leaves_previous_answer_untouched() {
    init_logging();
    let state = SessionState::new();
    let (state, _) = update(state, Msg::AddressesEdited("http://a.example".to_string()));

    // Seed a previous answer.
    let (state, effects) = ask(state, "first question");
    let seq = match effects.as_slice() {
        [Effect::SubmitQuery { seq, .. }] => *seq,
        other => panic!("unexpected effects: {other:?}"),
    };
    let (state, _) = update(
        state,
        Msg::QuerySettled {
            seq,
            result: Ok(QueryAnswer {
                answer: "earlier answer".to_string(),
                sources: Vec::new(),
            }),
        },
    );

    let (state, effects) = ask(state, "What is X?");
    let seq = match effects.as_slice() {
        [Effect::SubmitQuery { seq, .. }] => *seq,
        other => panic!("unexpected effects: {other:?}"),
    };
    let (state, effects) = update(
        state,
        Msg::QuerySettled {
            seq,
            result: Err(webrag_core::ApiFailure::Http { status: 500 }),
        },
    );
    assert!(effects.is_empty());
    match state.view().query {
        OperationOutcome::Failed(descriptor) => {
            assert_eq!(descriptor.kind, ErrorKind::Http);
            assert!(descriptor.message.contains("500"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(state.view().answer, "earlier answer");
}

#[test]
fn network_failure_carries_underlying_message() {
    init_logging();
    let state = SessionState::new();

    let (state, effects) = submit_addresses(state, "http://a.example");
    let seq = match effects.as_slice() {
        [Effect::SubmitIngest { seq, .. }] => *seq,
        other => panic!("unexpected effects: {other:?}"),
    };
    let (state, _) = update(
        state,
        Msg::IngestSettled {
            seq,
            result: Err(webrag_core::ApiFailure::Network(
                "connection refused".to_string(),
            )),
        },
    );
    match state.view().ingest {
        OperationOutcome::Failed(descriptor) => {
            assert_eq!(descriptor.kind, ErrorKind::Network);
            assert_eq!(descriptor.message, "connection refused");
        }
        other => panic!("expected failure, got {other:?}"),
    }
    // A failed ingest never overwrites the last stored result.
    assert_eq!(state.view().last_ingest, None);
}
