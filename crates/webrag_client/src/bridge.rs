use std::sync::{mpsc, Arc};
use std::thread;

use webrag_logging::rag_debug;

use crate::{ApiClient, ApiError, ClientEvent, ClientSettings, HttpApiClient, Seq};

enum ClientCommand {
    Ingest {
        seq: Seq,
        urls: Vec<String>,
        clear_existing: bool,
    },
    Query {
        seq: Seq,
        question: String,
    },
}

/// Bridge between the synchronous session loop and the async HTTP client.
///
/// Commands are queued onto a dedicated thread owning a tokio runtime; each
/// call settles by sending a [`ClientEvent`] on the returned receiver. In-flight
/// calls for different operation kinds run concurrently.
#[derive(Clone)]
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
}

impl ClientHandle {
    /// Build an HTTP-backed handle. Fails only if the transport cannot be
    /// constructed; individual calls report their own failures as events.
    pub fn new(
        settings: ClientSettings,
    ) -> Result<(Self, mpsc::Receiver<ClientEvent>), ApiError> {
        let client = HttpApiClient::new(settings)?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Build a handle over any [`ApiClient`] implementation.
    pub fn with_client(client: Arc<dyn ApiClient>) -> (Self, mpsc::Receiver<ClientEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel::<ClientCommand>();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let client = client.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(client.as_ref(), command, event_tx).await;
                });
            }
        });

        (Self { cmd_tx }, event_rx)
    }

    pub fn submit_ingest(&self, seq: Seq, urls: Vec<String>, clear_existing: bool) {
        rag_debug!("submit_ingest seq={} urls={}", seq, urls.len());
        let _ = self.cmd_tx.send(ClientCommand::Ingest {
            seq,
            urls,
            clear_existing,
        });
    }

    pub fn submit_query(&self, seq: Seq, question: impl Into<String>) {
        rag_debug!("submit_query seq={}", seq);
        let _ = self.cmd_tx.send(ClientCommand::Query {
            seq,
            question: question.into(),
        });
    }
}

async fn handle_command(
    client: &dyn ApiClient,
    command: ClientCommand,
    event_tx: mpsc::Sender<ClientEvent>,
) {
    match command {
        ClientCommand::Ingest {
            seq,
            urls,
            clear_existing,
        } => {
            let result = client.ingest(&urls, clear_existing).await;
            let _ = event_tx.send(ClientEvent::IngestSettled { seq, result });
        }
        ClientCommand::Query { seq, question } => {
            let result = client.query(&question).await;
            let _ = event_tx.send(ClientEvent::QuerySettled { seq, result });
        }
    }
}
