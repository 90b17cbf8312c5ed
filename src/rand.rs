use std::num::Wrapping;

// Linear congruential generator parameters
const MUL: u64 = 6364136223846793005; // Knuth section 3.3.4 (p.108)
const INC: u64 = 1442695040888963407;

/// A source of uniform deviates. Everything randomized in this crate (splatter jitter, fill
/// scatter) draws through this trait so callers can substitute a seeded or scripted source.
pub trait Random {
    /// Picks a random value uniformly distributed between `0.0` (inclusive) and `1.0` (exclusive).
    fn rnd(&mut self) -> f64;

    /// Picks a random value uniformly distributed between `min` (inclusive) and `max` (exclusive).
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        self.rnd() * (max - min) + min
    }
}

impl<R: Random + ?Sized> Random for &mut R {
    fn rnd(&mut self) -> f64 {
        (**self).rnd()
    }
}

/// Seedable PCG generator. Not suitable for anything security-related.
#[derive(Debug, Clone, PartialEq)]
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Seeds the generator by hashing arbitrary bytes, so any seed length works.
    pub fn from_seed(seed: &[u8]) -> Rng {
        let lower = murmur2(seed, 1690382925).swap_bytes();
        let upper = murmur2(seed, 72970470).swap_bytes();
        let state = u64::from(lower) | (u64::from(upper) << 32);
        Rng { state }
    }

    pub fn from_u64(seed: u64) -> Rng {
        Rng::from_seed(&seed.to_le_bytes())
    }
}

impl Random for Rng {
    fn rnd(&mut self) -> f64 {
        let old_state = self.state;
        self.state = old_state.wrapping_mul(MUL).wrapping_add(INC);
        // XSH RR output function over the old state (O'Neill 2014, section 6.3.1), minus the top
        // two bits of the xorshift.
        let xorshifted = ((((old_state >> 18) & !(3 << 30)) ^ old_state) >> 27) as u32;
        let fac = xorshifted.rotate_right((old_state >> 59) as u32);
        2.0f64.powi(-32) * f64::from(fac)
    }
}

/// Replays a fixed list of deviates, wrapping around at the end. Handy for pinning down jitter in
/// tests.
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct Cycle {
    values: Vec<f64>,
    next: usize,
}

#[cfg(test)]
impl Cycle {
    pub(crate) fn new(values: &[f64]) -> Self {
        assert!(!values.is_empty(), "no values");
        Cycle {
            values: values.to_vec(),
            next: 0,
        }
    }
}

#[cfg(test)]
impl Random for Cycle {
    fn rnd(&mut self) -> f64 {
        let v = self.values[self.next];
        self.next = (self.next + 1) % self.values.len();
        v
    }
}

fn murmur2(bytes: &[u8], seed: u32) -> u32 {
    const K: usize = 16;
    const MASK: Wrapping<u32> = Wrapping(0xffff);
    const MASK_BYTE: Wrapping<u32> = Wrapping(0xff);
    const M: Wrapping<u32> = Wrapping(0x5bd1e995);

    // Multiply in two 16-bit halves so every intermediate stays inside 32 bits.
    let mix = |v: Wrapping<u32>| (v & MASK) * M + ((((v >> K) * M) & MASK) << K);
    let byte32 = |b: u8| Wrapping(u32::from(b)) & MASK_BYTE;

    let mut h = Wrapping(seed ^ (bytes.len() as u32));
    let chunks = bytes.chunks_exact(4);
    let tail = chunks.remainder();
    for chunk in chunks {
        let mut k = byte32(chunk[0])
            | (byte32(chunk[1]) << 8)
            | (byte32(chunk[2]) << 16)
            | (byte32(chunk[3]) << 24);
        k = mix(k);
        k ^= k >> 24;
        k = mix(k);
        h = mix(h) ^ k;
    }
    if tail.len() >= 3 {
        h ^= byte32(tail[2]) << K;
    }
    if tail.len() >= 2 {
        h ^= byte32(tail[1]) << 8;
    }
    if let Some(&first) = tail.first() {
        h ^= byte32(first);
        h = mix(h);
    }

    h ^= h >> 13;
    h = mix(h);
    h ^= h >> 15;

    h.0
}
