use crate::error::Error;

use super::{Clock, Sample};

pub const NSEC_PER_SEC: i64 = 1_000_000_000;

/// Reads `clock_id` via clock_gettime(2), returning (seconds, nanoseconds).
pub fn gettime(clock_id: libc::clockid_t) -> Result<(i64, i64), Error> {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    let ret = unsafe { libc::clock_gettime(clock_id, &mut ts) };
    if ret < 0 {
        return Err(Error::last_os("clock_gettime"));
    }
    Ok((ts.tv_sec as i64, ts.tv_nsec as i64))
}

/// Nanoseconds on `clock_id` since its epoch.
pub fn now_ns(clock_id: libc::clockid_t) -> Result<i64, Error> {
    let (sec, nsec) = gettime(clock_id)?;
    Ok(sec * NSEC_PER_SEC + nsec)
}

/// Software clock backed by clock_gettime(2).
pub struct PosixClock {
    id: libc::clockid_t,
}

impl PosixClock {
    pub fn monotonic() -> Self {
        Self {
            id: libc::CLOCK_MONOTONIC,
        }
    }

    pub fn realtime() -> Self {
        Self {
            id: libc::CLOCK_REALTIME,
        }
    }
}

impl Clock for PosixClock {
    fn read(&mut self) -> Result<Sample, Error> {
        let (sec, nsec) = gettime(self.id)
            .map_err(|e| Error::Clock(format!("clock read failed: {}", e)))?;
        if self.id == libc::CLOCK_MONOTONIC {
            Ok(Sample::Ticks((sec * NSEC_PER_SEC + nsec) as u64))
        } else {
            Ok(Sample::Realtime { sec, nsec })
        }
    }
}
