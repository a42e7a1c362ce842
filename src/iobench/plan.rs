use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::Error;

use super::args::Access;

/// Order in which chunks are visited. Every index in `0..chunk_count`
/// appears exactly once in either mode.
///
/// The list is reserved up front so a size too large to hold in memory is
/// reported as an error instead of aborting the process.
pub fn chunk_order<R: Rng + ?Sized>(
    chunk_count: usize,
    access: Access,
    rng: &mut R,
) -> Result<Vec<usize>, Error> {
    let mut order: Vec<usize> = Vec::new();
    order
        .try_reserve_exact(chunk_count)
        .map_err(|source| Error::OutOfMemory {
            what: "chunk list",
            source,
        })?;
    order.extend(0..chunk_count);
    if access == Access::Random {
        order.shuffle(rng);
    }
    Ok(order)
}
