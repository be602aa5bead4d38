use clap::Parser;
use std::path::PathBuf;

/// Outer command-line surface. The roster commands themselves (add,
/// assign, mark, ...) are a line-oriented language handled by
/// rollcall-core, not clap subcommands.
#[derive(Parser)]
#[command(name = "rollcall")]
#[command(about = "Track students, classes, assignments and labels with short textual commands")]
#[command(version)]
pub struct Cli {
    /// Roster data file (overrides ROLLCALL_DATA_FILE and the config file)
    #[arg(short = 'f', long)]
    pub data_file: Option<PathBuf>,

    /// Configuration file
    #[arg(long, default_value = "rollcall.toml")]
    pub config: PathBuf,

    /// Run a single command and exit instead of starting the shell
    #[arg(short = 'c', long)]
    pub command: Option<String>,
}
