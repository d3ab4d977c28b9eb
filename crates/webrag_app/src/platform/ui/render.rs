//! Pure string builders for the terminal renderer. All session reading goes
//! through the view model; nothing here mutates state.

use webrag_core::{IngestResult, OperationOutcome, QueryAnswer, SessionViewModel};

pub fn render_session(view: &SessionViewModel) -> String {
    let mut out = String::new();

    out.push_str("Addresses:\n");
    if view.addresses.trim().is_empty() {
        out.push_str("  (none)\n");
    } else {
        for line in view.addresses.lines().filter(|line| !line.trim().is_empty()) {
            out.push_str("  ");
            out.push_str(line.trim());
            out.push('\n');
        }
    }

    out.push_str(&render_ingest_status(view));
    out.push('\n');

    out.push_str("Question: ");
    if view.question.is_empty() {
        out.push_str("(none)\n");
    } else {
        out.push_str(&view.question);
        out.push('\n');
    }

    out.push_str(&render_query_status(view));
    out
}

pub fn render_ingest_status(view: &SessionViewModel) -> String {
    match &view.ingest {
        OperationOutcome::Pending { .. } => "Ingest: crawling...".to_string(),
        OperationOutcome::Succeeded(IngestResult { chunks_stored }) => {
            format!("Ingest: stored {chunks_stored} chunks")
        }
        OperationOutcome::Failed(descriptor) => format!("Ingest failed: {}", descriptor.message),
        OperationOutcome::Idle => match view.last_ingest {
            Some(IngestResult { chunks_stored }) => {
                format!("Ingest: {chunks_stored} chunks stored previously")
            }
            None => "Ingest: nothing stored yet".to_string(),
        },
    }
}

pub fn render_query_status(view: &SessionViewModel) -> String {
    match &view.query {
        OperationOutcome::Pending { .. } => "Answer: thinking...".to_string(),
        OperationOutcome::Succeeded(QueryAnswer { answer, sources }) => {
            let mut out = format!("Answer:\n{answer}\n");
            if !sources.is_empty() {
                out.push_str("Sources:\n");
                // Citation labels are opaque; render them exactly as received.
                for source in sources {
                    out.push_str("  - ");
                    out.push_str(source);
                    out.push('\n');
                }
            }
            out
        }
        OperationOutcome::Failed(descriptor) => format!("Query failed: {}", descriptor.message),
        OperationOutcome::Idle => {
            if view.answer.is_empty() {
                "Answer: (none)".to_string()
            } else {
                format!("Answer:\n{}\n", view.answer)
            }
        }
    }
}
