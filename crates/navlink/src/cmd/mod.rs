use clap::{Args, Subcommand};
use std::path::PathBuf;

use navlink_dispatch::DispatchConfig;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod catalog;
pub mod classify;
pub mod session;
pub mod stream;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the packet catalog.
    Catalog(CatalogArgs),
    /// Resolve a packet code against the catalog.
    Classify(ClassifyArgs),
    /// Run a scripted session against a simulated device.
    Session(SessionArgs),
    /// Stream continuous output from a simulated device.
    Stream(StreamArgs),
    /// Show version information.
    Version(VersionArgs),
}

/// Settings shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct Context {
    pub format: OutputFormat,
    pub dispatch: DispatchConfig,
}

pub fn run(command: Command, ctx: Context) -> CliResult<i32> {
    match command {
        Command::Catalog(args) => catalog::run(args, ctx),
        Command::Classify(args) => classify::run(args, ctx),
        Command::Session(args) => session::run(args, ctx),
        Command::Stream(args) => stream::run(args, ctx),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Exit non-zero when the tables break the catalog rules.
    #[arg(long)]
    pub check: bool,
}

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Two ASCII characters (`z1`) or a hex code (`0x7A31`).
    pub code: String,
}

#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Settings file standing in for device flash.
    #[arg(long, value_name = "PATH", env = "NAVLINK_SETTINGS")]
    pub settings: Option<PathBuf>,
    /// Continuous output to select before the requests run.
    #[arg(long, value_name = "CODE")]
    pub select: Option<String>,
    /// Persist the --select choice.
    #[arg(long, requires = "select")]
    pub apply: bool,
    /// Request to send, as CODE or CODE:HEX. Repeatable.
    #[arg(long = "request", value_name = "CODE[:HEX]")]
    pub requests: Vec<String>,
    /// Telemetry ticks to run after the requests.
    #[arg(long, default_value = "0")]
    pub ticks: usize,
}

#[derive(Args, Debug)]
pub struct StreamArgs {
    /// Settings file standing in for device flash.
    #[arg(long, value_name = "PATH", env = "NAVLINK_SETTINGS")]
    pub settings: Option<PathBuf>,
    /// Continuous output to stream. Default: the stored packet code.
    #[arg(long, value_name = "CODE")]
    pub select: Option<String>,
    /// Ticks per second. Default: the stored packet rate.
    #[arg(long, value_name = "HZ")]
    pub rate: Option<u32>,
    /// Exit after N packets.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
