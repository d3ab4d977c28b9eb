use crate::view_model::SessionViewModel;

/// Invocation sequence number stamped onto each `Pending` transition.
///
/// A settlement is only accepted if its number matches the latest issued
/// `Pending` for that operation kind; anything older is stale and dropped.
pub type Seq = u64;

/// Result of a completed ingestion, as reported by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestResult {
    pub chunks_stored: u64,
}

/// Answer to a question, with opaque citation labels rendered as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryAnswer {
    pub answer: String,
    pub sources: Vec<String>,
}

/// Displayable failure classification for a settled operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport could not reach the service.
    Network,
    /// Service reachable, non-success status.
    Http,
    /// Success status but a semantically empty answer (query only).
    EmptyResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDescriptor {
    pub kind: ErrorKind,
    pub message: String,
}

/// Transport-level failure handed to `update` by the API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFailure {
    Network(String),
    Http { status: u16 },
}

/// Lifecycle of one asynchronous operation kind.
///
/// Transient by design: never persisted, rebuilt on each trigger, and reset
/// to `Idle` on session restore regardless of what was in flight before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome<T> {
    Idle,
    Pending {
        seq: Seq,
    },
    Succeeded(T),
    Failed(ErrorDescriptor),
}

// Manual impl: the derive would demand `T: Default` that `Idle` never needs.
impl<T> Default for OperationOutcome<T> {
    fn default() -> Self {
        OperationOutcome::Idle
    }
}

impl<T> OperationOutcome<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, OperationOutcome::Pending { .. })
    }
}

/// The session fields that survive a restart. Everything else is transient.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionFields {
    /// Raw newline-delimited address text, not yet split into a list.
    pub addresses: String,
    pub last_ingest: Option<IngestResult>,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    fields: SessionFields,
    ingest: OperationOutcome<IngestResult>,
    query: OperationOutcome<QueryAnswer>,
    ingest_seq: Seq,
    query_seq: Seq,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> SessionViewModel {
        SessionViewModel {
            addresses: self.fields.addresses.clone(),
            question: self.fields.question.clone(),
            answer: self.fields.answer.clone(),
            last_ingest: self.fields.last_ingest,
            ingest: self.ingest.clone(),
            query: self.query.clone(),
        }
    }

    pub fn fields(&self) -> &SessionFields {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut SessionFields {
        &mut self.fields
    }

    pub(crate) fn restore(&mut self, fields: SessionFields) {
        self.fields = fields;
        self.ingest = OperationOutcome::Idle;
        self.query = OperationOutcome::Idle;
    }

    pub(crate) fn ingest_pending(&self) -> bool {
        self.ingest.is_pending()
    }

    pub(crate) fn query_pending(&self) -> bool {
        self.query.is_pending()
    }

    /// Issue the next ingest sequence number; discards any settled value.
    pub(crate) fn begin_ingest(&mut self) -> Seq {
        self.ingest_seq += 1;
        self.ingest = OperationOutcome::Pending {
            seq: self.ingest_seq,
        };
        self.ingest_seq
    }

    pub(crate) fn begin_query(&mut self) -> Seq {
        self.query_seq += 1;
        self.query = OperationOutcome::Pending {
            seq: self.query_seq,
        };
        self.query_seq
    }

    /// A settlement is accepted only while its own `Pending` is current.
    pub(crate) fn ingest_accepts(&self, seq: Seq) -> bool {
        matches!(self.ingest, OperationOutcome::Pending { seq: current } if current == seq)
    }

    pub(crate) fn query_accepts(&self, seq: Seq) -> bool {
        matches!(self.query, OperationOutcome::Pending { seq: current } if current == seq)
    }

    pub(crate) fn settle_ingest(&mut self, outcome: OperationOutcome<IngestResult>) {
        self.ingest = outcome;
    }

    pub(crate) fn settle_query(&mut self, outcome: OperationOutcome<QueryAnswer>) {
        self.query = outcome;
    }
}
