mod cmd;
mod decode;
mod exit;
mod logging;
mod output;

use clap::Parser;
use navlink_dispatch::DispatchConfig;

use crate::cmd::{Command, Context};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "navlink", version, about = "Navigation unit user packet CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "info",
        env = "NAVLINK_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    /// Make `s1` stream the `a1` payload, as older firmware did.
    #[arg(long, env = "NAVLINK_LEGACY_SCALED1", global = true)]
    legacy_scaled1: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let ctx = Context {
        format: cli.format.unwrap_or_else(OutputFormat::default_for_stdout),
        dispatch: DispatchConfig {
            legacy_scaled1_fallthrough: cli.legacy_scaled1,
        },
    };

    match cmd::run(cli.command, ctx) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_requests() {
        let cli = Cli::try_parse_from([
            "navlink",
            "session",
            "--request",
            "pG",
            "--request",
            "gP:03000000",
            "--ticks",
            "2",
        ])
        .expect("session args should parse");

        match cli.command {
            Command::Session(args) => {
                assert_eq!(args.requests, vec!["pG", "gP:03000000"]);
                assert_eq!(args.ticks, 2);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn apply_requires_select() {
        let err = Cli::try_parse_from(["navlink", "session", "--apply"])
            .expect_err("--apply without --select should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn legacy_flag_is_global() {
        let cli = Cli::try_parse_from(["navlink", "classify", "s1", "--legacy-scaled1"])
            .expect("global flag after subcommand should parse");
        assert!(cli.legacy_scaled1);
    }
}
