use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use util::repl;

use crate::session::{Limits, Session};

mod demo;
mod session;

#[derive(Parser, Debug)]
#[command(name = "lambda", about = "Normal-order reduction for the untyped lambda calculus")]
struct Cli {
    /// Step bound for `:norm` and bare expressions
    #[arg(long, default_value_t = 100)]
    max_steps: usize,

    /// Step bound for `:steps`
    #[arg(long, default_value_t = 10)]
    trace_steps: usize,

    /// Where to keep the REPL history
    #[arg(long, default_value = "/tmp/lambda.history")]
    history: PathBuf,

    /// Do not read or write the history file
    #[arg(long)]
    no_history: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the interactive session (the default)
    Repl,
    /// Walk through identity, Church encodings, conversions and the Y combinator
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let limits = Limits {
        max_steps: cli.max_steps,
        trace_steps: cli.trace_steps,
    };
    match cli.command.unwrap_or(Command::Repl) {
        Command::Repl => {
            let history = (!cli.no_history).then(|| cli.history);
            println!("Hi, this is an untyped lambda calculus REPL. :help to show help");
            println!();
            repl::start_repl(Session::new(limits, history))?;
        }
        Command::Demo => demo::run(limits),
    }
    Ok(())
}
