//! The façade the renderer binds to: one instance per client lifetime,
//! with persistence and network access passed in rather than referenced
//! ambiently.

use webrag_core::{update, Effect, Msg, Seq, SessionState, SessionViewModel};
use webrag_logging::rag_debug;

use super::persistence::SessionStore;

/// Outbound network seam. The production implementation forwards to the
/// client bridge; tests record what would have been sent.
pub trait NetworkSink {
    fn submit_ingest(&self, seq: Seq, urls: Vec<String>, clear_existing: bool);
    fn submit_query(&self, seq: Seq, question: String);
}

/// Requests the dispatch loop cannot satisfy on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    /// The reset is destructive; the renderer must confirm it first.
    ConfirmReset,
}

pub struct SessionController {
    state: SessionState,
    store: Box<dyn SessionStore>,
    network: Box<dyn NetworkSink>,
}

impl SessionController {
    /// Rehydrates from the store exactly once, before any write. The restore
    /// dispatch emits no persist effects, so loading never echoes values
    /// back into storage.
    pub fn new(store: Box<dyn SessionStore>, network: Box<dyn NetworkSink>) -> Self {
        let mut controller = Self {
            state: SessionState::new(),
            store,
            network,
        };
        let fields = controller.store.load();
        controller.dispatch(Msg::SessionRestored(fields));
        controller
    }

    /// Run one message through the state machine and execute its effects.
    pub fn dispatch(&mut self, msg: Msg) -> Vec<UiAction> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        let mut actions = Vec::new();
        for effect in effects {
            match effect {
                Effect::Persist(op) => {
                    rag_debug!("persist {:?}", op);
                    self.store.apply(&op);
                }
                Effect::SubmitIngest {
                    seq,
                    urls,
                    clear_existing,
                } => self.network.submit_ingest(seq, urls, clear_existing),
                Effect::SubmitQuery { seq, question } => {
                    self.network.submit_query(seq, question);
                }
                Effect::RequestResetConfirmation => actions.push(UiAction::ConfirmReset),
            }
        }
        actions
    }

    pub fn set_addresses(&mut self, text: impl Into<String>) {
        self.dispatch(Msg::AddressesEdited(text.into()));
    }

    pub fn set_question(&mut self, text: impl Into<String>) {
        self.dispatch(Msg::QuestionEdited(text.into()));
    }

    pub fn trigger_ingest(&mut self, clear_existing: bool) {
        self.dispatch(Msg::IngestSubmitted { clear_existing });
    }

    pub fn trigger_query(&mut self) {
        self.dispatch(Msg::QuerySubmitted);
    }

    /// Returns true when the renderer should ask for confirmation.
    pub fn request_reset(&mut self) -> bool {
        self.dispatch(Msg::ResetRequested)
            .contains(&UiAction::ConfirmReset)
    }

    pub fn confirm_reset(&mut self) {
        self.dispatch(Msg::ResetConfirmed);
    }

    pub fn view(&self) -> SessionViewModel {
        self.state.view()
    }
}
