use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "resreg",
    about = "Resume registry: versioned resume storage over HTTP",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the registry server
    Serve(ServeArgs),
    /// Exercise a running server end to end
    Smoke(SmokeArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on; overrides the config file
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct SmokeArgs {
    /// Base URL of the registry API
    #[arg(long, default_value = "http://127.0.0.1:8080/api")]
    pub url: String,
    #[arg(long, default_value = "test@test.com")]
    pub email: String,
}
