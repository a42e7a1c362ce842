use super::args::SEQ_CHUNK_SIZE;

const FILL_STRIDE: usize = 512;

/// Reusable transfer buffer filled with non-zero data so written files are
/// never sparse.
///
/// At every 512-byte offset `i` the native-endian 32-bit integer `i + 1` is
/// stored; all other bytes are zero.
pub struct NoiseBuffer {
    buf: Vec<u8>,
}

impl NoiseBuffer {
    pub fn new(len: usize) -> Self {
        let mut buf = vec![0u8; len];
        for i in (0..len).step_by(FILL_STRIDE) {
            let word = (i as u32 + 1).to_ne_bytes();
            let end = (i + word.len()).min(len);
            buf[i..end].copy_from_slice(&word[..end - i]);
        }
        Self { buf }
    }

    /// First `len` bytes, as used by a single read or write call.
    pub fn chunk(&self, len: usize) -> &[u8] {
        &self.buf[..len]
    }

    pub fn chunk_mut(&mut self, len: usize) -> &mut [u8] {
        &mut self.buf[..len]
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }
}

impl Default for NoiseBuffer {
    fn default() -> Self {
        Self::new(SEQ_CHUNK_SIZE)
    }
}
