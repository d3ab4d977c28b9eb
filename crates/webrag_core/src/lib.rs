//! Webrag core: pure session state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, PersistOp};
pub use msg::Msg;
pub use state::{
    ApiFailure, ErrorDescriptor, ErrorKind, IngestResult, OperationOutcome, QueryAnswer, Seq,
    SessionFields, SessionState,
};
pub use update::{parse_address_lines, update, EMPTY_ANSWER_MESSAGE};
pub use view_model::SessionViewModel;
