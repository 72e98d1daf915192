pub mod commands;
pub mod format;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "agentmeter-server",
    version,
    about = "Serve Clawdbot agent usage and active sessions over HTTP"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file to use instead of the platform default
    #[arg(long, global = true, env = "AGENTMETER_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding one subdirectory per agent
    #[arg(long, global = true, env = "AGENTMETER_AGENTS_DIR", value_name = "DIR")]
    pub agents_dir: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve(ServeArgs),
    /// Print this month's usage ledger
    Usage {
        /// Print raw records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print active sessions ranked by context saturation
    Sessions {
        /// Maximum number of sessions to show
        #[arg(long, short = 'n')]
        limit: Option<usize>,
        /// Print raw sessions as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show resolved paths, scan diagnostics and the context limit table
    Doctor,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "AGENTMETER_BIND")]
    pub bind: Option<String>,

    /// Port to listen on
    #[arg(long, short = 'p', env = "AGENTMETER_PORT")]
    pub port: Option<u16>,

    /// Serve usage only, without /api/sessions
    #[arg(long)]
    pub no_sessions: bool,
}
