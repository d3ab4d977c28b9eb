use std::sync::mpsc;
use std::thread;

use webrag_client::{ApiError, ClientEvent, ClientHandle, ClientSettings};
use webrag_core::{ApiFailure, IngestResult, Msg, QueryAnswer, Seq};
use webrag_logging::{rag_info, rag_warn};

use super::controller::NetworkSink;

/// Production [`NetworkSink`]: forwards triggers to the client bridge and
/// pumps settlements back into the session loop as messages.
pub struct EffectRunner {
    handle: ClientHandle,
}

impl EffectRunner {
    pub fn new(msg_tx: mpsc::Sender<Msg>) -> Result<Self, ApiError> {
        let settings = ClientSettings::from_env();
        rag_info!("Using service base address {}", settings.base_url);

        let (handle, event_rx) = ClientHandle::new(settings)?;
        spawn_event_pump(event_rx, msg_tx);
        Ok(Self { handle })
    }
}

impl NetworkSink for EffectRunner {
    fn submit_ingest(&self, seq: Seq, urls: Vec<String>, clear_existing: bool) {
        rag_info!(
            "SubmitIngest seq={} urls={} clear={}",
            seq,
            urls.len(),
            clear_existing
        );
        self.handle.submit_ingest(seq, urls, clear_existing);
    }

    fn submit_query(&self, seq: Seq, question: String) {
        rag_info!("SubmitQuery seq={} question_len={}", seq, question.len());
        self.handle.submit_query(seq, question);
    }
}

fn spawn_event_pump(event_rx: mpsc::Receiver<ClientEvent>, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while let Ok(event) = event_rx.recv() {
            if msg_tx.send(map_event(event)).is_err() {
                break;
            }
        }
    });
}

fn map_event(event: ClientEvent) -> Msg {
    match event {
        ClientEvent::IngestSettled { seq, result } => Msg::IngestSettled {
            seq,
            result: result
                .map(|response| IngestResult {
                    chunks_stored: response.chunks,
                })
                .map_err(map_failure),
        },
        ClientEvent::QuerySettled { seq, result } => Msg::QuerySettled {
            seq,
            result: result
                .map(|response| QueryAnswer {
                    answer: response.answer,
                    sources: response.sources,
                })
                .map_err(map_failure),
        },
    }
}

fn map_failure(err: ApiError) -> ApiFailure {
    match err {
        ApiError::Network(message) => ApiFailure::Network(message),
        ApiError::Http { status } => ApiFailure::Http { status },
        // The session taxonomy has no decode bucket; a garbled success body
        // is reported as a transport-level failure with its parse message.
        ApiError::Decode(message) => {
            rag_warn!("Malformed success body: {}", message);
            ApiFailure::Network(format!("malformed response body: {message}"))
        }
    }
}
