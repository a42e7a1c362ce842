pub mod args;
pub mod buffer;
pub mod plan;
pub mod report;

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::IntoRawFd;
use std::path::Path;

use rand::Rng;

use crate::clock::posix;
use crate::config::IoBenchConfig;
use crate::error::Error;
use crate::rng;

use args::{Access, BenchConfig, Direction};
use buffer::NoiseBuffer;

const FILE_MODE: u32 = 0o600;

/// Opens the data file, creating it if absent. Existing contents are kept.
fn open_data_file(path: &Path, direction: Direction) -> Result<File, Error> {
    let mut opts = OpenOptions::new();
    match direction {
        // std refuses create(true) without write access, so O_CREAT goes in raw.
        Direction::Read => opts.read(true).custom_flags(libc::O_CREAT),
        Direction::Write => opts.write(true).create(true),
    };
    opts.mode(FILE_MODE).open(path).map_err(Error::syscall("open"))
}

fn seek_to(file: &mut File, offset: u64) -> Result<(), Error> {
    let pos = file
        .seek(SeekFrom::Start(offset))
        .map_err(Error::syscall("lseek"))?;
    if pos != offset {
        return Err(Error::Syscall {
            op: "lseek",
            source: io::Error::new(
                io::ErrorKind::Other,
                format!("landed at {} instead of {}", pos, offset),
            ),
        });
    }
    Ok(())
}

/// One read or write call of exactly `len` bytes; anything short is fatal.
fn transfer(file: &mut File, buf: &mut NoiseBuffer, len: usize, direction: Direction) -> Result<(), Error> {
    let (op, n) = match direction {
        Direction::Read => ("read", file.read(buf.chunk_mut(len)).map_err(Error::syscall("read"))?),
        Direction::Write => ("write", file.write(buf.chunk(len)).map_err(Error::syscall("write"))?),
    };
    if n != len {
        return Err(Error::ShortTransfer {
            op,
            expected: len,
            actual: n,
        });
    }
    Ok(())
}

/// Closes the descriptor explicitly so a failing close(2) is reported.
fn close(file: File) -> Result<(), Error> {
    let fd = file.into_raw_fd();
    if unsafe { libc::close(fd) } < 0 {
        return Err(Error::last_os("close"));
    }
    Ok(())
}

/// Runs one benchmark pass against `path` and returns the elapsed
/// nanoseconds, measured from before the first transfer until after close.
pub fn run_bench<R: Rng + ?Sized>(cfg: &BenchConfig, path: &Path, rng: &mut R) -> Result<i64, Error> {
    let chunk_size = cfg.chunk_size();
    let chunk_count = cfg.chunk_count();
    // Sequential passes walk the file in place and need no index list.
    let order = match cfg.access {
        Access::Random => Some(plan::chunk_order(chunk_count, cfg.access, rng)?),
        Access::Sequential => None,
    };

    let mut file = open_data_file(path, cfg.direction)?;
    let mut buf = NoiseBuffer::default();
    debug_assert!(chunk_size <= buf.len());

    let start = posix::now_ns(libc::CLOCK_MONOTONIC)?;

    match order {
        Some(order) => {
            for index in order {
                seek_to(&mut file, index as u64 * chunk_size as u64)?;
                transfer(&mut file, &mut buf, chunk_size, cfg.direction)?;
            }
        }
        None => {
            for _ in 0..chunk_count {
                transfer(&mut file, &mut buf, chunk_size, cfg.direction)?;
            }
        }
    }

    if cfg.direction == Direction::Write {
        file.sync_all().map_err(Error::syscall("fsync"))?;
    }
    close(file)?;

    let end = posix::now_ns(libc::CLOCK_MONOTONIC)?;
    let elapsed_ns = end - start;

    if cfg!(debug_assertions) {
        log::debug!(target: "guestbench::iobench", "start ns {}", start);
        log::debug!(target: "guestbench::iobench", "end   ns {}", end);
        log::debug!(target: "guestbench::iobench", "megabytes: {}", cfg.file_size_mb);
        log::debug!(target: "guestbench::iobench", "time elapsed: {}ns", elapsed_ns);
        log::debug!(
            target: "guestbench::iobench",
            "time elapsed: {:.6}s",
            elapsed_ns as f64 / posix::NSEC_PER_SEC as f64,
        );
    }

    Ok(elapsed_ns)
}

pub fn run<S: AsRef<str>>(tokens: &[S], config: &IoBenchConfig) -> Result<(), Error> {
    let cfg = args::parse_tokens(tokens);
    log::info!(
        target: "guestbench::iobench",
        "{:?} {:?} of {}MB in {} chunks of {}B to {}",
        cfg.access, cfg.direction, cfg.file_size_mb, cfg.chunk_count(), cfg.chunk_size(),
        config.data_file.display(),
    );

    let mut rng = rng::for_seed(config.seed)?;
    let elapsed_ns = run_bench(&cfg, &config.data_file, &mut rng)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", report::format_throughput(cfg.file_size_mb, elapsed_ns))?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("guestbench_{}_{}.dat", name, std::process::id()));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn test_seq_write_fills_file() {
        let path = scratch("seq_write");
        let cfg = args::parse_tokens(&["-seq", "-write", "1"]);
        let elapsed = run_bench(&cfg, &path, &mut rng::seeded(0)).unwrap();
        assert!(elapsed >= 0);

        let data = std::fs::read(&path).unwrap();
        assert_eq!(data.len(), 1024 * 1024);
        assert_eq!(u32::from_ne_bytes(data[0..4].try_into().unwrap()), 1);
        assert_eq!(u32::from_ne_bytes(data[512..516].try_into().unwrap()), 513);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_rand_write_then_read() {
        let path = scratch("rand_rw");
        let write = args::parse_tokens(&["-rand", "-write", "1"]);
        run_bench(&write, &path, &mut rng::seeded(3)).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 1024 * 1024);

        // every 4K chunk holds the same leading word since each write is buffer[..4096]
        let data = std::fs::read(&path).unwrap();
        for chunk in data.chunks(4096) {
            assert_eq!(u32::from_ne_bytes(chunk[0..4].try_into().unwrap()), 1);
        }

        let read = args::parse_tokens(&["-rand", "-read", "1"]);
        run_bench(&read, &path, &mut rng::seeded(4)).unwrap();
        let seq_read = args::parse_tokens(&["-read", "1"]);
        run_bench(&seq_read, &path, &mut rng::seeded(5)).unwrap();
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_created_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let path = scratch("mode");
        let cfg = args::parse_tokens(&["0"]);
        run_bench(&cfg, &path, &mut rng::seeded(0)).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode & !0o600, 0);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_read_past_end_is_short_transfer() {
        let path = scratch("short_read");
        std::fs::write(&path, vec![7u8; 1000]).unwrap();
        let cfg = args::parse_tokens(&["-read", "1"]);
        match run_bench(&cfg, &path, &mut rng::seeded(0)) {
            Err(Error::ShortTransfer { op, expected, actual }) => {
                assert_eq!(op, "read");
                assert_eq!(expected, 256 * 1024);
                assert_eq!(actual, 1000);
            }
            other => panic!("expected short read, got {:?}", other),
        }
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_read_creates_missing_file() {
        let path = scratch("read_create");
        let cfg = args::parse_tokens(&["-read", "1"]);
        assert!(matches!(
            run_bench(&cfg, &path, &mut rng::seeded(0)),
            Err(Error::ShortTransfer { actual: 0, .. })
        ));
        assert!(path.exists());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_open_failure_names_operation() {
        let path = Path::new("/nonexistent-guestbench-dir/iobench.dat");
        let cfg = BenchConfig::default();
        match run_bench(&cfg, path, &mut rng::seeded(0)) {
            Err(e @ Error::Syscall { op: "open", .. }) => {
                assert!(format!("{}", e).starts_with("open: "));
            }
            other => panic!("expected open failure, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_random_plan_fails_before_open() {
        let path = scratch("oversized");
        let cfg = args::parse_tokens(&["-rand", "99999999999999"]);
        assert!(matches!(
            run_bench(&cfg, &path, &mut rng::seeded(0)),
            Err(Error::OutOfMemory { what: "chunk list", .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_run_with_config() {
        let config = IoBenchConfig {
            data_file: scratch("run_config"),
            seed: Some(11),
        };
        run(&["-rand", "-write", "1"], &config).unwrap();
        assert!(config.data_file.exists());
        let _ = std::fs::remove_file(&config.data_file);
    }
}
