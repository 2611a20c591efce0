mod cli;
mod repl;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use memex_search::DateContext;
use repl::{Outcome, Session};
use std::io::Write;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let context = if cli.utc {
        DateContext::utc()
    } else {
        DateContext::system()
    };
    let mut session = Session::new(cli.query.unwrap_or_default(), context, cli.json);

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush().context("Failed to flush stdout")?;
        let mut line = String::new();
        if stdin.read_line(&mut line).context("Failed to read stdin")? == 0 {
            break;
        }
        // Surrounding spaces are part of the search-bar string.
        let line = line.trim_end_matches(['\r', '\n']);
        match session.run(line) {
            Ok(Outcome::Print(out)) => println!("{out}"),
            Ok(Outcome::Exit) => break,
            Err(e) => eprintln!("{e:#}"),
        }
    }
    Ok(())
}
