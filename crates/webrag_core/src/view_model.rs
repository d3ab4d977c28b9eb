use crate::{IngestResult, OperationOutcome, QueryAnswer};

/// Snapshot the renderer binds to; cheap clones of the current session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionViewModel {
    pub addresses: String,
    pub question: String,
    pub answer: String,
    pub last_ingest: Option<IngestResult>,
    pub ingest: OperationOutcome<IngestResult>,
    pub query: OperationOutcome<QueryAnswer>,
}
