use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use rustyquery::common::Result;
use rustyquery::config::Settings;
use rustyquery::samples::Harness;
use rustyquery::storage::DataSource;
use std::io::{stdout, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const PROMPT: &str = "> ";

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rustyquery=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = Settings::load(None)?;
    let source = DataSource::load(&settings)?;
    let harness = Harness::new(source, settings);

    let names = std::env::args().skip(1).collect::<Vec<_>>();
    if !names.is_empty() {
        let mut out = stdout().lock();
        for name in &names {
            harness.run(name, &mut out)?;
            writeln!(out)?;
        }
        return Ok(());
    }

    let mut editor = DefaultEditor::new()?;
    harness.list(&mut stdout())?;
    loop {
        let command = match editor.readline(PROMPT) {
            Ok(line) => line.trim().to_string(),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };
        if command.is_empty() {
            continue;
        }
        if let Err(err) = editor.add_history_entry(command.as_str()) {
            log::debug!("history not updated: {err}");
        }
        match execute(&command, &harness) {
            Ok(true) => continue,
            Ok(false) => break,
            Err(err) => {
                log::warn!("{command}: {err}");
                println!("oops, {err}");
            }
        }
    }
    Ok(())
}

/// Executes one console command. Returns false when the session should end.
fn execute(command: &str, harness: &Harness) -> Result<bool> {
    let mut out = stdout().lock();
    match command {
        "quit" | "exit" => return Ok(false),
        "list" => harness.list(&mut out)?,
        "all" => harness.run_all(&mut out)?,
        name => harness.run(name, &mut out)?,
    }
    out.flush()?;
    Ok(true)
}
