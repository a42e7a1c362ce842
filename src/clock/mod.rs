pub mod posix;
pub mod rtc;

use std::path::Path;

use serde::Deserialize;

use crate::error::Error;

pub use posix::PosixClock;
pub use rtc::{RtcClock, RtcTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ClockKind {
    /// Hardware real-time clock read through ioctl(RTC_RD_TIME)
    Rtc,
    /// High-resolution monotonic clock (CLOCK_MONOTONIC)
    Monotonic,
    /// POSIX realtime clock (CLOCK_REALTIME)
    Realtime,
}

impl ClockKind {
    pub fn name(&self) -> &'static str {
        match self {
            ClockKind::Rtc => "rtc",
            ClockKind::Monotonic => "monotonic",
            ClockKind::Realtime => "realtime",
        }
    }
}

/// One reading of a clock source, kept in the source's native shape until
/// it is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    Rtc(RtcTime),
    Ticks(u64),
    Realtime { sec: i64, nsec: i64 },
}

impl Sample {
    /// Decimal value written to the sample log: seconds since epoch for the
    /// RTC, raw nanosecond ticks for the monotonic clock, nanoseconds since
    /// epoch for the realtime clock.
    pub fn log_value(&self) -> Result<i128, Error> {
        let value = match self {
            Sample::Rtc(t) => t.to_epoch_seconds()? as i128,
            Sample::Ticks(t) => *t as i128,
            Sample::Realtime { sec, nsec } => {
                *sec as i128 * posix::NSEC_PER_SEC as i128 + *nsec as i128
            }
        };
        Ok(value)
    }
}

/// A clock that can be read once per call. Each read blocks until the
/// underlying source answers.
pub trait Clock {
    fn read(&mut self) -> Result<Sample, Error>;
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn read(&mut self) -> Result<Sample, Error> {
        (**self).read()
    }
}

/// Opens the selected clock source. The RTC device is opened here so an
/// unavailable device fails before any sampling starts.
pub fn open(kind: ClockKind, rtc_device: &Path) -> Result<Box<dyn Clock>, Error> {
    let clock: Box<dyn Clock> = match kind {
        ClockKind::Rtc => Box::new(RtcClock::open(rtc_device)?),
        ClockKind::Monotonic => Box::new(PosixClock::monotonic()),
        ClockKind::Realtime => Box::new(PosixClock::realtime()),
    };
    Ok(clock)
}
