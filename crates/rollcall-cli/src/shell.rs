// crates/rollcall-cli/src/shell.rs - Interactive read-eval-print loop
//
// One roster command per line. Results go to stdout, errors to stderr, and
// the roster is saved back to disk after every command that reports a
// mutation, so a crash never loses more than the line being typed.

use anyhow::Result;
use console::style;
use std::io::{self, BufRead, IsTerminal, Write};

use rollcall_core::interpret_and_execute;

use crate::context::Context;

pub fn run(ctx: &mut Context) -> Result<()> {
    let interactive = io::stdin().is_terminal();
    if interactive {
        println!("rollcall {} - type 'help' for commands", env!("CARGO_PKG_VERSION"));
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            print!("{}", ctx.config.output.prompt);
            io::stdout().flush()?;
        }
        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        if line.trim().is_empty() {
            continue;
        }
        let (ok, exit) = dispatch(ctx, &line)?;
        tracing::trace!(ok, exit, "command dispatched");
        if exit {
            break;
        }
    }
    Ok(())
}

/// Execute one command and exit. A rejected command is a nonzero exit code
/// so scripts can tell the difference.
pub fn run_once(ctx: &mut Context, line: &str) -> Result<()> {
    let (ok, _) = dispatch(ctx, line)?;
    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

/// Run one line against the roster. Returns (accepted, exit-requested).
/// Command rejections are reported to the user, not propagated; only
/// infrastructure failures (saving the data file) bubble up as Err.
fn dispatch(ctx: &mut Context, line: &str) -> Result<(bool, bool)> {
    match interpret_and_execute(line, &mut ctx.roster) {
        Ok(outcome) => {
            println!("{}", outcome.message);
            if outcome.mutated {
                ctx.storage.save(&ctx.roster)?;
            }
            Ok((true, outcome.should_exit))
        }
        Err(err) => {
            if use_color(ctx) {
                eprintln!("{}", style(&err).red());
            } else {
                eprintln!("{err}");
            }
            Ok((false, false))
        }
    }
}

fn use_color(ctx: &Context) -> bool {
    match ctx.config.output.color.as_str() {
        "always" => true,
        "never" => false,
        _ => io::stderr().is_terminal(),
    }
}
