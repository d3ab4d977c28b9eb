use crate::{IngestResult, Seq};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Submit a batch of addresses to the ingestion endpoint.
    SubmitIngest {
        seq: Seq,
        urls: Vec<String>,
        clear_existing: bool,
    },
    /// Submit a question to the query endpoint.
    SubmitQuery { seq: Seq, question: String },
    /// Mirror one field change to durable storage.
    Persist(PersistOp),
    /// Ask the renderer to confirm the destructive reset.
    RequestResetConfirmation,
}

/// A single-field write against the persistent session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOp {
    SaveAddresses(String),
    /// `None` removes the stored key rather than writing a placeholder.
    SaveIngestResult(Option<IngestResult>),
    SaveQuestion(String),
    SaveAnswer(String),
    /// Remove every stored key.
    ClearAll,
}
