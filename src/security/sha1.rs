//! DISCLAIMER: This is a self-contained SHA-1 in pure Rust, kept here because the signer
//! must not lean on a platform hash library. SHA-1 is broken for collision resistance.
//! If you need a secure hash, use a vetted, modern library (e.g. SHA-2 or SHA-3 from RustCrypto).

use core::fmt;

use num_bigint_dig::BigUint;

/// The size of the SHA-1 digest in bytes (160 bits = 20 bytes).
pub const SHA1_OUTPUT_SIZE: usize = 20;

/// SHA-1 block size in bytes.
pub const SHA1_BLOCK_SIZE: usize = 64;

/// The initial values for (H0..H4) from FIPS 180.
static INIT_H: [u32; 5] = [0x67452301, 0xEFCDAB89, 0x98BADCFE, 0x10325476, 0xC3D2E1F0];

/// Additive constants for rounds 0-19, 20-39, 40-59, 60-79.
static K: [u32; 4] = [0x5A827999, 0x6ED9EBA1, 0x8F1BBCDC, 0xCA62C1D6];

/// An incremental SHA-1 context.
#[derive(Debug, Clone)]
pub struct Sha1 {
    /// Working registers H0..H4.
    h: [u32; 5],
    /// 64-byte block buffer
    buffer: [u8; SHA1_BLOCK_SIZE],
    /// Current buffer length
    buffer_len: usize,
    /// Total message length in bits mod 2^64
    length_bits: u64,
}

impl Default for Sha1 {
    fn default() -> Self {
        Self::new()
    }
}

impl Sha1 {
    /// Creates a fresh context seeded with the fixed IV.
    pub fn new() -> Self {
        Self {
            h: INIT_H,
            buffer: [0u8; SHA1_BLOCK_SIZE],
            buffer_len: 0,
            length_bits: 0,
        }
    }

    /// Feeds more message bytes into the context.
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.buffer[self.buffer_len] = byte;
            self.buffer_len += 1;
            self.length_bits = self.length_bits.wrapping_add(8);

            if self.buffer_len == SHA1_BLOCK_SIZE {
                let block = self.buffer;
                self.process_block(&block);
                self.buffer_len = 0;
            }
        }
    }

    /// Pads the message and returns the 20-byte digest.
    ///
    /// Padding is `0x80`, zeros, then the bit length as a 64-bit big-endian
    /// integer. When fewer than 8 bytes remain after the `0x80` the padding
    /// spills into one extra block.
    pub fn finalize(mut self) -> [u8; SHA1_OUTPUT_SIZE] {
        let length_bits = self.length_bits;

        self.buffer[self.buffer_len] = 0x80;
        self.buffer_len += 1;

        // no room for the 8-byte length in this block
        if self.buffer_len > SHA1_BLOCK_SIZE - 8 {
            self.buffer[self.buffer_len..].fill(0);
            let block = self.buffer;
            self.process_block(&block);
            self.buffer_len = 0;
        }
        self.buffer[self.buffer_len..SHA1_BLOCK_SIZE - 8].fill(0);
        self.buffer[SHA1_BLOCK_SIZE - 8..].copy_from_slice(&length_bits.to_be_bytes());

        let block = self.buffer;
        self.process_block(&block);

        let mut output = [0u8; SHA1_OUTPUT_SIZE];
        for (chunk, word) in output.chunks_exact_mut(4).zip(self.h.iter()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        output
    }

    /// Compresses one 64-byte block into the registers.
    fn process_block(&mut self, block: &[u8; SHA1_BLOCK_SIZE]) {
        let mut w = [0u32; 80];
        for (i, word) in block.chunks_exact(4).enumerate() {
            w[i] = u32::from_be_bytes(word.try_into().unwrap());
        }
        for j in 16..80 {
            w[j] = (w[j - 3] ^ w[j - 8] ^ w[j - 14] ^ w[j - 16]).rotate_left(1);
        }

        let [mut a, mut b, mut c, mut d, mut e] = self.h;

        for (j, &wj) in w.iter().enumerate() {
            let (f, k) = match j {
                0..=19 => ((b & c) | ((!b) & d), K[0]),
                20..=39 => (b ^ c ^ d, K[1]),
                40..=59 => ((b & c) | (b & d) | (c & d), K[2]),
                _ => (b ^ c ^ d, K[3]),
            };

            let temp = a
                .rotate_left(5)
                .wrapping_add(f)
                .wrapping_add(e)
                .wrapping_add(k)
                .wrapping_add(wj);
            e = d;
            d = c;
            c = b.rotate_left(30);
            b = a;
            a = temp;
        }

        for (reg, value) in self.h.iter_mut().zip([a, b, c, d, e]) {
            *reg = reg.wrapping_add(value);
        }
    }
}

/// Convenience function to compute a SHA-1 digest in a single shot.
pub fn sha1_digest(data: &[u8]) -> [u8; SHA1_OUTPUT_SIZE] {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hasher.finalize()
}

/// A 160-bit message digest, read as an unsigned big-endian integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; SHA1_OUTPUT_SIZE]);

impl Digest {
    /// Hashes `message`.
    pub fn of(message: &[u8]) -> Self {
        Digest(sha1_digest(message))
    }

    pub fn as_bytes(&self) -> &[u8; SHA1_OUTPUT_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The digest as a non-negative integer; the top bit is never a sign bit.
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.0)
    }
}

impl From<[u8; SHA1_OUTPUT_SIZE]> for Digest {
    fn from(bytes: [u8; SHA1_OUTPUT_SIZE]) -> Self {
        Digest(bytes)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_biguint())
    }
}
