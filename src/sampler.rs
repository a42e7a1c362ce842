use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::clock::{self, Clock, Sample};
use crate::config::ClockConfig;
use crate::error::Error;

/// Number of clock reads per run (2^18).
pub const SAMPLE_COUNT: usize = 1 << 18;

/// Reads `clock` exactly `count` times, stopping at the first failed read.
pub fn collect<C: Clock + ?Sized>(clock: &mut C, count: usize) -> Result<Vec<Sample>, Error> {
    let mut samples = Vec::with_capacity(count);
    for _ in 0..count {
        samples.push(clock.read()?);
    }
    Ok(samples)
}

/// Converts every sample to the value written to the log.
pub fn log_values(samples: &[Sample]) -> Result<Vec<i128>, Error> {
    samples.iter().map(Sample::log_value).collect()
}

/// Writes one decimal value per line, in sample order.
pub fn write_values(values: &[i128], out: &mut dyn Write) -> io::Result<()> {
    for value in values {
        writeln!(out, "{}", value)?;
    }
    Ok(())
}

fn write_log(values: &[i128], path: &Path) -> io::Result<()> {
    let f = File::create(path)?;
    let mut out = BufWriter::new(f);
    write_values(values, &mut out)?;
    out.flush()
}

/// Samples a clock and writes the results to `path`. The file is only
/// created once every read and conversion has succeeded.
pub fn sample_to_file<C: Clock + ?Sized>(
    clock: &mut C,
    count: usize,
    path: &Path,
) -> Result<(), Error> {
    let samples = collect(clock, count)?;
    let values = log_values(&samples)?;
    write_log(&values, path)?;
    Ok(())
}

pub fn run(config: &ClockConfig) -> Result<(), Error> {
    let kind = config.source.ok_or_else(|| {
        Error::InvalidArgs("no clock source selected (use --source rtc|monotonic|realtime)".into())
    })?;

    let mut clock = clock::open(kind, &config.rtc_device)?;

    log::info!(
        target: "guestbench::sampler",
        "sampling {} clock {} times",
        kind.name(), SAMPLE_COUNT,
    );

    sample_to_file(&mut clock, SAMPLE_COUNT, &config.output)?;

    log::info!(
        target: "guestbench::sampler",
        "wrote {} samples to {}",
        SAMPLE_COUNT, config.output.display(),
    );
    Ok(())
}
