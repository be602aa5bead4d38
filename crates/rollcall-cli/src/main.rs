// crates/rollcall-cli/src/main.rs - CLI application entry point
//
// The binary is a thin shell around rollcall-core: parse the outer
// command-line flags with clap, set up the context (config + storage +
// loaded roster), then feed lines into the core's single entry point,
// `interpret_and_execute`, either interactively or one-shot.

use anyhow::Result;
use clap::Parser;

mod cli;
mod context;
mod services;
mod shell;

use cli::Cli;
use context::Context;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut ctx = Context::new(&cli.config, cli.data_file)?;

    match cli.command {
        Some(line) => shell::run_once(&mut ctx, &line),
        None => shell::run(&mut ctx),
    }
}
