//! Entry point. Wires config -> session -> resolver, one-shot or interactive.

mod config;
mod margin;
mod parser;
mod report;
mod resolver;
mod session;
mod types;
mod utils;

use anyhow::bail;
use chrono::Local;
use dotenvy::dotenv;
use std::future::Future;
use std::io::Write;
use tokio::sync::mpsc;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::report::OutputFormat;
use crate::session::{Outcome, Session, HELP};

const USAGE: &str = "usage: merchant-commander [--config PATH] [--json] [COMMAND ...]";

struct CliArgs {
    config: Option<String>,
    json: bool,
    command: Vec<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<Option<CliArgs>> {
    let mut out = CliArgs {
        config: None,
        json: false,
        command: Vec::new(),
    };
    let mut it = args.into_iter();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--config" | "-c" if out.command.is_empty() => match it.next() {
                Some(p) => out.config = Some(p),
                None => bail!("--config needs a path\n{USAGE}"),
            },
            "--json" if out.command.is_empty() => out.json = true,
            "--help" | "-h" if out.command.is_empty() => return Ok(None),
            _ => out.command.push(a),
        }
    }
    Ok(Some(out))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let Some(args) = parse_args(std::env::args().skip(1))? else {
        println!("{USAGE}\n\n{HELP}");
        return Ok(());
    };

    let cfg = match config::locate(args.config.as_deref()) {
        Some(path) => {
            let cfg = AppConfig::load(&path)?;
            info!("Loaded config from {}", path.display());
            cfg
        }
        None => {
            info!("No config file found, using built-in defaults");
            AppConfig::default()
        }
    };

    let mut session = Session::new(cfg);
    if args.json {
        session.set_format(OutputFormat::Json);
    }
    debug!(inputs = ?session.inputs(), "session ready");

    // One-shot: run the command given on the command line and exit.
    if !args.command.is_empty() {
        let line = args.command.join(" ");
        if let Outcome::Output(text) = session.handle_line(&line, Local::now().date_naive())? {
            print!("{text}");
        }
        return Ok(());
    }

    println!("Merchant Commander. Type 'help' for commands, Ctrl-C to leave.");
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Ctrl-C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    };
    let mut stdout = std::io::stdout();
    let end = run_interactive(&mut session, spawn_stdin_reader(), shutdown, &mut stdout).await?;
    info!(?end, "Session closed");
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum LoopEnd {
    Quit,
    Eof,
    Interrupted,
}

/// Blocking stdin lives on its own thread so the runtime never waits on it;
/// the thread dies with the process.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

async fn run_interactive<W: Write>(
    session: &mut Session,
    mut lines: mpsc::Receiver<String>,
    shutdown: impl Future<Output = ()>,
    out: &mut W,
) -> anyhow::Result<LoopEnd> {
    tokio::pin!(shutdown);
    loop {
        write!(out, "> ")?;
        out.flush()?;

        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else { return Ok(LoopEnd::Eof) };
                if line.trim().is_empty() {
                    continue;
                }
                match session.handle_line(&line, Local::now().date_naive())? {
                    Outcome::Output(text) => {
                        write!(out, "{text}")?;
                        out.flush()?;
                    }
                    Outcome::Quit => return Ok(LoopEnd::Quit),
                }
            }
            _ = &mut shutdown => {
                writeln!(out)?;
                return Ok(LoopEnd::Interrupted);
            }
        }
    }
}
