mod cli;
mod clock;
mod config;
mod error;
mod iobench;
mod logging;
mod rng;
mod sampler;

use std::path::Path;
use std::process;

use clap::Parser;

use cli::{ClockArgs, Cli, Command, IoBenchArgs};
use config::{ClockConfig, Config, IoBenchConfig};

/// Exit status for any clock sampler failure.
const CLOCK_FAILURE: i32 = 1;
/// Exit status for any I/O benchmark failure.
const IOBENCH_FAILURE: i32 = -1;

/// Exit status reported when a subcommand fails.
fn exit_code(command: &Command) -> i32 {
    match command {
        Command::Clock(_) => CLOCK_FAILURE,
        Command::Iobench(_) => IOBENCH_FAILURE,
    }
}

fn load_config_or_default(config_file: Option<&Path>) -> Config {
    match config::load_config(config_file) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("{}", e);
            Config::default()
        }
    }
}

/// Build a ClockConfig by layering: defaults → TOML file → CLI overrides.
fn build_clock_config(args: &ClockArgs) -> ClockConfig {
    let mut cfg = load_config_or_default(args.config_file.as_deref()).clock;

    if let Some(v) = args.source {
        cfg.source = Some(v);
    }
    if let Some(ref v) = args.rtc_device {
        cfg.rtc_device = v.clone();
    }
    if let Some(ref v) = args.output {
        cfg.output = v.clone();
    }
    cfg
}

fn build_iobench_config(args: &IoBenchArgs) -> IoBenchConfig {
    load_config_or_default(args.config_file.as_deref()).iobench
}

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Command::Clock(args) => {
            logging::init(&args.log);
            let cfg = build_clock_config(args);
            if let Err(e) = sampler::run(&cfg) {
                log::error!(target: "guestbench::sampler", "{}", e);
                process::exit(exit_code(&cli.command));
            }
        }
        Command::Iobench(args) => {
            logging::init(&args.log);
            let cfg = build_iobench_config(args);
            if let Err(e) = iobench::run(&args.tokens, &cfg) {
                log::error!(target: "guestbench::iobench", "{}", e);
                process::exit(exit_code(&cli.command));
            }
        }
    }
}
