use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::clock::ClockKind;
use crate::logging::LogArgs;

#[derive(Debug, Parser)]
#[command(name = "guestbench", about = "Guest clock stability sampler and raw file I/O benchmark")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sample a clock source 2^18 times and write the readings to a log file
    Clock(ClockArgs),
    /// Time sequential or random fixed-size reads/writes against a data file
    Iobench(IoBenchArgs),
}

#[derive(Debug, Parser)]
pub struct ClockArgs {
    /// Clock source to sample (required here or in the config file)
    #[arg(short = 's', long, value_enum)]
    pub source: Option<ClockKind>,

    /// RTC device node used by the rtc source (default: /dev/rtc1)
    #[arg(long)]
    pub rtc_device: Option<PathBuf>,

    /// Sample log path (default: logs.txt)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Configuration file path (default: /etc/guestbench.toml)
    #[arg(long = "config")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Debug, Parser)]
pub struct IoBenchArgs {
    /// Configuration file path (default: /etc/guestbench.toml)
    #[arg(long = "config")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub log: LogArgs,

    /// Benchmark tokens, applied left to right: -seq|-rand, -read|-write, size in MiB
    #[arg(
        value_name = "TOKENS",
        num_args = 0..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub tokens: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_source_flag() {
        let cli = Cli::try_parse_from(["guestbench", "clock", "--source", "monotonic"]).unwrap();
        match cli.command {
            Command::Clock(args) => {
                assert_eq!(args.source, Some(ClockKind::Monotonic));
                assert!(args.output.is_none());
            }
            _ => panic!("expected clock subcommand"),
        }
    }

    #[test]
    fn test_clock_rejects_unknown_source() {
        assert!(Cli::try_parse_from(["guestbench", "clock", "--source", "sundial"]).is_err());
    }

    #[test]
    fn test_iobench_tokens_pass_through() {
        let cli = Cli::try_parse_from(["guestbench", "iobench", "-rand", "-read", "64"]).unwrap();
        match cli.command {
            Command::Iobench(args) => assert_eq!(args.tokens, ["-rand", "-read", "64"]),
            _ => panic!("expected iobench subcommand"),
        }
    }

    #[test]
    fn test_iobench_options_before_tokens() {
        let cli = Cli::try_parse_from([
            "guestbench",
            "iobench",
            "--log-level",
            "debug",
            "-seq",
            "-write",
        ])
        .unwrap();
        match cli.command {
            Command::Iobench(args) => {
                assert!(args.log.log_level.is_some());
                assert_eq!(args.tokens, ["-seq", "-write"]);
            }
            _ => panic!("expected iobench subcommand"),
        }
    }

    #[test]
    fn test_iobench_no_tokens() {
        let cli = Cli::try_parse_from(["guestbench", "iobench"]).unwrap();
        match cli.command {
            Command::Iobench(args) => assert!(args.tokens.is_empty()),
            _ => panic!("expected iobench subcommand"),
        }
    }
}
