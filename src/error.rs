use std::collections::TryReserveError;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    /// A named OS call failed; rendered the way `perror` would.
    Syscall {
        op: &'static str,
        source: io::Error,
    },
    ShortTransfer {
        op: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A working buffer could not be allocated.
    OutOfMemory {
        what: &'static str,
        source: TryReserveError,
    },
    Clock(String),
    InvalidArgs(String),
}

impl Error {
    /// Wraps the calling thread's last OS error under the given operation name.
    pub fn last_os(op: &'static str) -> Self {
        Error::Syscall {
            op,
            source: io::Error::last_os_error(),
        }
    }

    pub fn syscall(op: &'static str) -> impl FnOnce(io::Error) -> Self {
        move |source| Error::Syscall { op, source }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Syscall { op, source } => write!(f, "{}: {}", op, source),
            Error::ShortTransfer {
                op,
                expected,
                actual,
            } => write!(
                f,
                "{}: short transfer ({} of {} bytes)",
                op, actual, expected
            ),
            Error::OutOfMemory { what, source } => write!(f, "{}: {}", what, source),
            Error::Clock(msg) => write!(f, "clock error: {}", msg),
            Error::InvalidArgs(msg) => write!(f, "invalid arguments: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Syscall { source, .. } => Some(source),
            Error::OutOfMemory { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_io() {
        let err = Error::Io(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let msg = format!("{}", err);
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn test_display_syscall_names_operation() {
        let err = Error::Syscall {
            op: "fsync",
            source: io::Error::new(io::ErrorKind::Other, "disk on fire"),
        };
        assert_eq!(format!("{}", err), "fsync: disk on fire");
    }

    #[test]
    fn test_display_short_transfer() {
        let err = Error::ShortTransfer {
            op: "read",
            expected: 4096,
            actual: 100,
        };
        let msg = format!("{}", err);
        assert!(msg.starts_with("read: "));
        assert!(msg.contains("100 of 4096"));
    }

    #[test]
    fn test_display_out_of_memory() {
        let source = Vec::<u64>::new().try_reserve_exact(usize::MAX).unwrap_err();
        let err = Error::OutOfMemory {
            what: "chunk list",
            source,
        };
        assert!(format!("{}", err).starts_with("chunk list: "));
    }

    #[test]
    fn test_display_clock() {
        let err = Error::Clock("RTC open failed".into());
        let msg = format!("{}", err);
        assert!(msg.contains("clock error"));
        assert!(msg.contains("RTC open failed"));
    }

    #[test]
    fn test_display_invalid_args() {
        let err = Error::InvalidArgs("bad value".into());
        let msg = format!("{}", err);
        assert!(msg.contains("invalid arguments"));
        assert!(msg.contains("bad value"));
    }

    #[test]
    fn test_syscall_mapper() {
        let err = Error::syscall("lseek")(io::Error::from_raw_os_error(libc::EINVAL));
        match err {
            Error::Syscall { op, source } => {
                assert_eq!(op, "lseek");
                assert_eq!(source.raw_os_error(), Some(libc::EINVAL));
            }
            _ => panic!("expected Error::Syscall"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io_err.into();
        match err {
            Error::Io(e) => assert_eq!(e.kind(), io::ErrorKind::PermissionDenied),
            _ => panic!("expected Error::Io"),
        }
    }
}
