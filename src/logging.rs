use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::{Args, ValueEnum};
use log::{Level, LevelFilter, Log, Metadata, Record};

type SyslogLogger = syslog::Logger<syslog::LoggerBackend, syslog::Formatter3164>;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
        }
    }
}

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Log level (default: warn)
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevel>,

    /// Append log messages to a file
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,

    /// Send log messages to syslog
    #[arg(long)]
    pub syslog: bool,
}

struct GuestbenchLogger {
    log_file: Option<Mutex<File>>,
    syslog: Option<Mutex<SyslogLogger>>,
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "error",
        Level::Warn => "warning",
        Level::Info => "info",
        Level::Debug => "debug",
        Level::Trace => "debug",
    }
}

fn component_prefix(target: &str) -> &'static str {
    if target.contains("iobench") {
        "guestbench iobench"
    } else if target.contains("sampler") || target.contains("clock") {
        "guestbench sampler"
    } else {
        "guestbench"
    }
}

fn format_line(record: &Record) -> String {
    format!(
        "[{}] {}: {}",
        component_prefix(record.target()),
        level_tag(record.level()),
        record.args()
    )
}

impl Log for GuestbenchLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let msg = format_line(record);

        // Always write to stderr
        let _ = writeln!(std::io::stderr().lock(), "{}", msg);

        if let Some(ref file) = self.log_file {
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "{}", msg);
            }
        }

        if let Some(ref logger) = self.syslog {
            if let Ok(mut l) = logger.lock() {
                let text = format!("{}", record.args());
                let _ = match record.level() {
                    Level::Error => l.err(&text),
                    Level::Warn => l.warning(&text),
                    Level::Info => l.info(&text),
                    Level::Debug | Level::Trace => l.debug(&text),
                };
            }
        }
    }

    fn flush(&self) {
        if let Some(ref file) = self.log_file {
            if let Ok(mut f) = file.lock() {
                let _ = f.flush();
            }
        }
    }
}

/// Builds the logger, collecting a warning for each sink that could not be
/// set up so they can be reported once logging is live.
fn build_logger(args: &LogArgs) -> (GuestbenchLogger, Vec<String>) {
    let mut warnings = Vec::new();

    let log_file = args.log_file.as_ref().and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => Some(Mutex::new(f)),
            Err(e) => {
                warnings.push(format!("cannot open log file {}: {}", path.display(), e));
                None
            }
        }
    });

    let syslog = if args.syslog {
        match syslog::unix(syslog::Formatter3164 {
            facility: syslog::Facility::LOG_USER,
            hostname: None,
            process: "guestbench".into(),
            pid: std::process::id(),
        }) {
            Ok(l) => Some(Mutex::new(l)),
            Err(e) => {
                warnings.push(format!("cannot connect to syslog: {}", e));
                None
            }
        }
    } else {
        None
    };

    (GuestbenchLogger { log_file, syslog }, warnings)
}

pub fn init(args: &LogArgs) {
    let level = args.log_level.unwrap_or(LogLevel::Warn);

    let (logger, warnings) = build_logger(args);

    let _ = log::set_boxed_logger(Box::new(logger));
    log::set_max_level(level.to_level_filter());

    for w in warnings {
        log::warn!("{}", w);
    }
}
