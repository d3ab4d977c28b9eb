use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Context;
use webrag_core::{Msg, SessionViewModel};
use webrag_logging::rag_info;

use super::controller::SessionController;
use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::persistence::FileSessionStore;
use super::ui::render;

pub fn run_app() -> anyhow::Result<()> {
    logging::initialize(LogDestination::File);
    rag_info!("webrag starting");

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(msg_tx).context("failed to construct the HTTP client")?;
    let store = FileSessionStore::in_current_dir();
    let mut controller = SessionController::new(Box::new(store), Box::new(runner));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("webrag session client. Type 'help' for commands.");
    println!("{}", render::render_session(&controller.view()));

    loop {
        // Settlements that arrived while the prompt was idle.
        drain_settlements(&mut controller, &msg_rx);

        print!("webrag> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let input = line.trim();

        match input {
            "" => {}
            "help" => print_help(),
            "show" => println!("{}", render::render_session(&controller.view())),
            "urls" => {
                println!("Enter one address per line; finish with an empty line.");
                let mut text = String::new();
                for entry in lines.by_ref() {
                    let entry = entry?;
                    if entry.trim().is_empty() {
                        break;
                    }
                    text.push_str(&entry);
                    text.push('\n');
                }
                controller.set_addresses(text);
            }
            "ingest" | "ingest clear" => {
                controller.trigger_ingest(input == "ingest clear");
                if controller.view().ingest.is_pending() {
                    wait_until(&mut controller, &msg_rx, |view| !view.ingest.is_pending());
                    println!("{}", render::render_ingest_status(&controller.view()));
                } else {
                    println!("Nothing to ingest: the address list is empty.");
                }
            }
            "reset" => {
                if controller.request_reset() {
                    print!("Reset all session data? [y/N] ");
                    io::stdout().flush()?;
                    let confirmed = matches!(
                        lines.next(),
                        Some(Ok(reply)) if reply.trim().eq_ignore_ascii_case("y")
                    );
                    if confirmed {
                        controller.confirm_reset();
                        println!("Session cleared.");
                    } else {
                        println!("Reset cancelled.");
                    }
                }
            }
            "quit" | "exit" => break,
            other => {
                if let Some(question) = other.strip_prefix("ask ") {
                    controller.set_question(question);
                    controller.trigger_query();
                    if controller.view().query.is_pending() {
                        wait_until(&mut controller, &msg_rx, |view| !view.query.is_pending());
                        println!("{}", render::render_query_status(&controller.view()));
                    } else {
                        println!("Ask a non-empty question.");
                    }
                } else if other == "ask" {
                    println!("Usage: ask <question>");
                } else {
                    println!("Unknown command {other:?}; type 'help'.");
                }
            }
        }
    }

    rag_info!("webrag exiting");
    Ok(())
}

fn drain_settlements(controller: &mut SessionController, msg_rx: &mpsc::Receiver<Msg>) {
    while let Ok(msg) = msg_rx.try_recv() {
        controller.dispatch(msg);
    }
}

/// Block until the view satisfies `done`, feeding settlements through the
/// controller as they arrive. The only bound on the wait is the transport's
/// own timeout; there is no cancellation.
fn wait_until(
    controller: &mut SessionController,
    msg_rx: &mpsc::Receiver<Msg>,
    done: impl Fn(&SessionViewModel) -> bool,
) {
    while !done(&controller.view()) {
        match msg_rx.recv_timeout(Duration::from_millis(200)) {
            Ok(msg) => {
                controller.dispatch(msg);
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                print!(".");
                let _ = io::stdout().flush();
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }
    println!();
}

fn print_help() {
    println!("Commands:");
    println!("  urls           enter the address list (one per line, blank line ends)");
    println!("  ingest         submit the address list for ingestion");
    println!("  ingest clear   same, but discard previously ingested content first");
    println!("  ask <question> ask a question about the ingested pages");
    println!("  show           print the current session");
    println!("  reset          clear the session and its persisted state");
    println!("  quit           exit (the session is kept for next time)");
}
