use std::io::{self, Write};
use std::path::Path;
use voxdrive_engine::dispatcher::Dispatcher;
use voxdrive_engine::error::DispatchError;

/// Run commands from a script file against a fresh session.
///
/// Request-level failures stop the run; command failures are already folded
/// into response text by the dispatcher and just get printed.
pub async fn run_file(dispatcher: &Dispatcher, path: &Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path)?;
    let session = dispatcher.start_session();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match dispatcher.send_command(session.session_id, trimmed).await {
            Ok(response) => println!("{}", response),
            Err(e) => {
                eprintln!("Error executing line '{}': {}", trimmed, e);
                dispatcher.end_session(session.session_id).await?;
                return Err(e.into());
            }
        }
    }

    dispatcher.end_session(session.session_id).await?;
    Ok(())
}

pub async fn run_repl(dispatcher: &Dispatcher) -> anyhow::Result<()> {
    let session = dispatcher.start_session();
    println!("Session {} started.", session.session_id);
    println!("Try 'help', 'ai: <question>' or 'browser: start browser headless'.");
    println!("Type 'transcript' to review the session, 'exit' or 'quit' to close.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut input = String::new();

    loop {
        print!("> ");
        stdout.flush()?;
        input.clear();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }

        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "exit" || trimmed == "quit" {
            break;
        }
        if trimmed == "transcript" {
            print_transcript(dispatcher, session.session_id)?;
            continue;
        }

        match dispatcher.send_command(session.session_id, trimmed).await {
            Ok(response) => println!("{}", response),
            Err(e) => println!("Error: {}", e),
        }
    }

    dispatcher.end_session(session.session_id).await?;
    println!("Session closed.");
    Ok(())
}

fn print_transcript(
    dispatcher: &Dispatcher,
    session_id: uuid::Uuid,
) -> Result<(), DispatchError> {
    let view = dispatcher.transcript(session_id)?;
    println!(
        "Transcript for {} ({} commands):",
        view.session_id, view.total_commands
    );
    for entry in &view.commands {
        println!(
            "  [{} | {:?} | {}ms] {} -> {}",
            entry.timestamp.format("%H:%M:%S"),
            entry.action_kind,
            entry.processing_time_ms,
            entry.command,
            entry.response
        );
    }
    Ok(())
}
