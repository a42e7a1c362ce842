use std::fs::File;
use std::io::Read;

use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;

use crate::error::Error;

/// Seeds a ChaCha20Rng from a fixed u64, for reproducible shuffles.
pub fn seeded(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

/// Seeds a ChaCha20Rng with 32 bytes from /dev/urandom.
pub fn from_urandom() -> Result<ChaCha20Rng, Error> {
    let mut seed = [0u8; 32];
    File::open("/dev/urandom")
        .and_then(|mut f| f.read_exact(&mut seed))
        .map_err(Error::syscall("/dev/urandom"))?;
    Ok(ChaCha20Rng::from_seed(seed))
}

/// Picks the shuffle source: a fixed seed when configured, fresh OS
/// entropy otherwise.
pub fn for_seed(seed: Option<u64>) -> Result<ChaCha20Rng, Error> {
    match seed {
        Some(s) => Ok(seeded(s)),
        None => from_urandom(),
    }
}
