use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

use meowdb::command::{execute, Command, ExecuteResult, MetaCommand};
use meowdb::{MeowError, Result, Table};

/// meowdb shell
#[derive(Parser, Debug)]
#[command(name = "meowdb")]
#[command(about = "A tiny single-table database")]
#[command(version)]
struct Args {
    /// Path to the data file, created if missing
    #[arg(default_value = "meow.db")]
    db_path: PathBuf,
}

/// Why a shell session ended early.
#[derive(Error, Debug)]
enum SessionError {
    /// Reading input or writing output failed; the table is still consistent
    #[error("terminal I/O error: {0}")]
    Terminal(#[from] io::Error),

    /// The storage engine failed; nothing more is written
    #[error(transparent)]
    Storage(MeowError),
}

fn main() -> ExitCode {
    // Logs go to stderr; stdout belongs to the shell
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    match run(&args.db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {}", e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(db_path: &Path) -> Result<()> {
    let mut table = Table::open(db_path)?;

    match session(&mut table) {
        Ok(()) => table.close(),
        Err(SessionError::Terminal(e)) => {
            // Rows inserted so far are intact, save them before giving up
            table.close()?;
            Err(e.into())
        }
        Err(SessionError::Storage(e)) => Err(e),
    }
}

/// Runs the read-eval-print loop until `.exit` or end of input.
fn session(table: &mut Table) -> std::result::Result<(), SessionError> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut buf = Vec::new();

    loop {
        print_prompt(&mut stdout)?;

        buf.clear();
        if stdin.lock().read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let input = line.trim();

        match Command::parse(input) {
            Ok(Command::Meta(MetaCommand::Exit)) => break,
            Ok(Command::Meta(MetaCommand::Unrecognized(command))) => {
                writeln!(stdout, "Unrecognized metacommand '{command}'")?;
            }
            Ok(Command::Statement(statement)) => {
                match execute(&statement, table).map_err(SessionError::Storage)? {
                    ExecuteResult::Inserted(_) => writeln!(stdout, "Executed.")?,
                    ExecuteResult::Rows(rows) => {
                        for row in rows {
                            writeln!(stdout, "{row}")?;
                        }
                        writeln!(stdout, "Executed.")?;
                    }
                    ExecuteResult::TableFull => writeln!(stdout, "Error: Table full.")?,
                }
            }
            Err(e) => writeln!(stdout, "{e}")?,
        }
    }

    Ok(())
}

fn print_prompt(stdout: &mut io::Stdout) -> io::Result<()> {
    write!(stdout, "meowdb > ")?;
    stdout.flush()
}
