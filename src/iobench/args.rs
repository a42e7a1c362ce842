//! Left-to-right token parser for the benchmark command line.
//!
//! ```text
//! iobench -seq -write 1024   sequentially write 1024MB
//! iobench -rand -write 1024  write 1024MB in 4K chunks in shuffled order
//! iobench -seq -read 1024    sequentially read 1024MB
//! iobench -rand -read 1024   read 1024MB in 4K chunks in shuffled order
//! ```

pub const SEQ_CHUNK_SIZE: usize = 256 * 1024;
pub const RAND_CHUNK_SIZE: usize = 4 * 1024;
pub const DEFAULT_FILE_SIZE_MB: u64 = 1024;

const MIB: u64 = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Sequential,
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchConfig {
    pub access: Access,
    pub direction: Direction,
    pub file_size_mb: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            access: Access::Sequential,
            direction: Direction::Write,
            file_size_mb: DEFAULT_FILE_SIZE_MB,
        }
    }
}

impl BenchConfig {
    pub fn chunk_size(&self) -> usize {
        match self.access {
            Access::Sequential => SEQ_CHUNK_SIZE,
            Access::Random => RAND_CHUNK_SIZE,
        }
    }

    pub fn file_size_bytes(&self) -> u64 {
        self.file_size_mb.saturating_mul(MIB)
    }

    /// Whole chunks that fit in the file; trailing remainder bytes are not visited.
    pub fn chunk_count(&self) -> usize {
        (self.file_size_bytes() / self.chunk_size() as u64) as usize
    }
}

/// Applies each token in order; later tokens override earlier ones of the
/// same kind, and anything unrecognized is read as the size in MiB.
pub fn parse_tokens<S: AsRef<str>>(tokens: &[S]) -> BenchConfig {
    let mut cfg = BenchConfig::default();
    for token in tokens {
        match token.as_ref() {
            "-rand" => cfg.access = Access::Random,
            "-seq" => cfg.access = Access::Sequential,
            "-read" => cfg.direction = Direction::Read,
            "-write" => cfg.direction = Direction::Write,
            other => cfg.file_size_mb = parse_size(other),
        }
    }
    cfg
}

/// strtoul(3)-style base-10 parse: leading digits only, 0 when there are none,
/// saturating on overflow. A leading minus sign yields 0.
fn parse_size(s: &str) -> u64 {
    let s = s.trim_start();
    let s = match s.strip_prefix('+') {
        Some(rest) => rest,
        None if s.starts_with('-') => return 0,
        None => s,
    };
    s.bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u64, |acc, d| {
            acc.saturating_mul(10).saturating_add(u64::from(d - b'0'))
        })
}
