use std::fs::File;
use std::os::unix::io::AsRawFd;
use std::path::Path;

use crate::error::Error;

use super::{Clock, Sample};

/// ioctl number for RTC_RD_TIME: _IOR('p', 0x09, struct rtc_time)
const RTC_RD_TIME: libc::c_ulong = 0x80247009;

/// Broken-down time as filled in by the RTC driver:
/// ```text
/// struct rtc_time {
///     int tm_sec, tm_min, tm_hour, tm_mday, tm_mon,
///         tm_year, tm_wday, tm_yday, tm_isdst;
/// };
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RtcTime {
    pub tm_sec: libc::c_int,
    pub tm_min: libc::c_int,
    pub tm_hour: libc::c_int,
    pub tm_mday: libc::c_int,
    pub tm_mon: libc::c_int,
    pub tm_year: libc::c_int,
    pub tm_wday: libc::c_int,
    pub tm_yday: libc::c_int,
    pub tm_isdst: libc::c_int,
}

#[cfg(target_os = "android")]
unsafe fn errno_location() -> *mut libc::c_int {
    libc::__errno()
}

#[cfg(not(target_os = "android"))]
unsafe fn errno_location() -> *mut libc::c_int {
    libc::__errno_location()
}

/// mktime(3) returns -1 both for failure and for 23:59:59 on 1969-12-31;
/// only a set errno tells them apart.
fn check_mktime(secs: i64, errno: libc::c_int) -> Result<i64, Error> {
    if secs == -1 && errno != 0 {
        return Err(Error::Syscall {
            op: "mktime",
            source: std::io::Error::from_raw_os_error(errno),
        });
    }
    Ok(secs)
}

impl RtcTime {
    /// Seconds since the epoch, interpreting the fields as local time (mktime(3)).
    pub fn to_epoch_seconds(&self) -> Result<i64, Error> {
        let mut tm: libc::tm = unsafe { std::mem::zeroed() };
        tm.tm_sec = self.tm_sec;
        tm.tm_min = self.tm_min;
        tm.tm_hour = self.tm_hour;
        tm.tm_mday = self.tm_mday;
        tm.tm_mon = self.tm_mon;
        tm.tm_year = self.tm_year;
        tm.tm_wday = self.tm_wday;
        tm.tm_yday = self.tm_yday;
        tm.tm_isdst = self.tm_isdst;
        let (secs, errno) = unsafe {
            *errno_location() = 0;
            let secs = libc::mktime(&mut tm) as i64;
            (secs, *errno_location())
        };
        check_mktime(secs, errno)
    }
}

/// Hardware clock device. The descriptor is closed when the clock is dropped.
pub struct RtcClock {
    dev: File,
}

impl RtcClock {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let dev = File::open(path).map_err(|e| {
            Error::Clock(format!("RTC open failed: {}: {}", path.display(), e))
        })?;
        log::debug!(target: "guestbench::sampler", "opened RTC device {}", path.display());
        Ok(Self { dev })
    }
}

impl Clock for RtcClock {
    fn read(&mut self) -> Result<Sample, Error> {
        let mut tm = RtcTime::default();
        let ret = unsafe {
            libc::ioctl(
                self.dev.as_raw_fd(),
                RTC_RD_TIME as _,
                &mut tm as *mut RtcTime,
            )
        };
        if ret < 0 {
            return Err(Error::Clock(format!(
                "RTC read failed: {}",
                std::io::Error::last_os_error()
            )));
        }
        Ok(Sample::Rtc(tm))
    }
}
