use crate::{
    ApiFailure, Effect, ErrorDescriptor, ErrorKind, Msg, OperationOutcome, PersistOp,
    SessionFields, SessionState,
};

/// The one fixed message for a structurally valid but empty answer.
pub const EMPTY_ANSWER_MESSAGE: &str = "AI returned an empty answer. Try another question.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: SessionState, msg: Msg) -> (SessionState, Vec<Effect>) {
    let effects = match msg {
        Msg::AddressesEdited(text) => {
            state.fields_mut().addresses = text.clone();
            vec![Effect::Persist(PersistOp::SaveAddresses(text))]
        }
        Msg::QuestionEdited(text) => {
            state.fields_mut().question = text.clone();
            vec![Effect::Persist(PersistOp::SaveQuestion(text))]
        }
        Msg::IngestSubmitted { clear_existing } => {
            // A trigger while the same kind is in flight is a deliberate no-op.
            if state.ingest_pending() {
                return (state, Vec::new());
            }
            let urls = parse_address_lines(&state.fields().addresses);
            if urls.is_empty() {
                // Rejected input: no transport call, no lifecycle change.
                return (state, Vec::new());
            }
            let seq = state.begin_ingest();
            vec![Effect::SubmitIngest {
                seq,
                urls,
                clear_existing,
            }]
        }
        Msg::QuerySubmitted => {
            if state.query_pending() {
                return (state, Vec::new());
            }
            if state.fields().question.trim().is_empty() {
                return (state, Vec::new());
            }
            let seq = state.begin_query();
            vec![Effect::SubmitQuery {
                seq,
                question: state.fields().question.clone(),
            }]
        }
        Msg::IngestSettled { seq, result } => {
            if !state.ingest_accepts(seq) {
                // Stale settlement from a superseded invocation.
                return (state, Vec::new());
            }
            match result {
                Ok(ingest) => {
                    state.settle_ingest(OperationOutcome::Succeeded(ingest));
                    state.fields_mut().last_ingest = Some(ingest);
                    vec![Effect::Persist(PersistOp::SaveIngestResult(Some(ingest)))]
                }
                Err(failure) => {
                    state.settle_ingest(OperationOutcome::Failed(normalize_failure(failure)));
                    Vec::new()
                }
            }
        }
        Msg::QuerySettled { seq, result } => {
            if !state.query_accepts(seq) {
                return (state, Vec::new());
            }
            match result {
                // Post-hoc reclassification: a 2xx with an empty answer is a failure.
                Ok(answer) if answer.answer.is_empty() => {
                    state.settle_query(OperationOutcome::Failed(ErrorDescriptor {
                        kind: ErrorKind::EmptyResult,
                        message: EMPTY_ANSWER_MESSAGE.to_string(),
                    }));
                    Vec::new()
                }
                Ok(answer) => {
                    state.fields_mut().answer = answer.answer.clone();
                    state.settle_query(OperationOutcome::Succeeded(answer));
                    vec![Effect::Persist(PersistOp::SaveAnswer(
                        state.fields().answer.clone(),
                    ))]
                }
                Err(failure) => {
                    state.settle_query(OperationOutcome::Failed(normalize_failure(failure)));
                    Vec::new()
                }
            }
        }
        Msg::SessionRestored(fields) => {
            // Rehydration must not echo the loaded values back into storage.
            state.restore(fields);
            Vec::new()
        }
        Msg::ResetRequested => vec![Effect::RequestResetConfirmation],
        Msg::ResetConfirmed => {
            state.restore(SessionFields::default());
            vec![Effect::Persist(PersistOp::ClearAll)]
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Split raw address text into submittable lines, dropping blanks.
pub fn parse_address_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn normalize_failure(failure: ApiFailure) -> ErrorDescriptor {
    match failure {
        ApiFailure::Network(message) => ErrorDescriptor {
            kind: ErrorKind::Network,
            message,
        },
        ApiFailure::Http { status } => ErrorDescriptor {
            kind: ErrorKind::Http,
            message: format!("service responded with status {status}"),
        },
    }
}
