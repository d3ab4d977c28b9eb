use crate::{ApiFailure, IngestResult, QueryAnswer, Seq, SessionFields};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the address text box (raw newline-delimited text).
    AddressesEdited(String),
    /// User edited the question input.
    QuestionEdited(String),
    /// User submitted the current address text for ingestion.
    IngestSubmitted { clear_existing: bool },
    /// User submitted the current question.
    QuerySubmitted,
    /// API client settled an ingest call.
    IngestSettled {
        seq: Seq,
        result: Result<IngestResult, ApiFailure>,
    },
    /// API client settled a query call.
    QuerySettled {
        seq: Seq,
        result: Result<QueryAnswer, ApiFailure>,
    },
    /// Restore persisted fields at startup. Must not re-trigger persistence.
    SessionRestored(SessionFields),
    /// User asked for a reset; only changes state once confirmed.
    ResetRequested,
    /// User confirmed the reset.
    ResetConfirmed,
    /// Fallback for placeholder wiring.
    NoOp,
}
