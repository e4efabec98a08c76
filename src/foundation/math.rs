use crate::foundation::error::{ScoreError, ScoreResult};

/// Seeded FNV-1a 64, used to derive stable sub-seeds.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new(seed: u64) -> Self {
        Self(Self::OFFSET_BASIS ^ seed)
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// SplitMix64 generator. Deterministic for a given seed on every platform.
#[derive(Clone, Copy, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)` with 53 bits of precision.
    pub fn next_f64_01(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }

    /// Uniform integer in `[0, n)`; `n == 0` yields 0.
    pub fn below(&mut self, n: u64) -> u64 {
        if n == 0 {
            return 0;
        }
        self.next_u64() % n
    }
}

/// Round half to even, matching banker's rounding of beat positions.
pub(crate) fn round_half_even(x: f64) -> i64 {
    x.round_ties_even() as i64
}

/// Disc radius `round(extent * ratio)` in pixels, capped at `cap`.
pub(crate) fn ratio_radius(extent: u32, ratio: f64, cap: u32, what: &str) -> ScoreResult<u32> {
    if !ratio.is_finite() || ratio < 0.0 {
        return Err(ScoreError::config(format!(
            "{what} radius ratio must be finite and >= 0, got {ratio}"
        )));
    }
    let r = round_half_even((f64::from(extent) * ratio).min(f64::from(cap)));
    u32::try_from(r).map_err(|_| ScoreError::config(format!("{what} radius {r} is out of range")))
}

/// `dy^2 + dx^2 < r^2`, exact for any offsets a `u32` canvas can produce.
pub(crate) fn inside_disc(dy: i64, dx: i64, r: i64) -> bool {
    let sq = |v: i64| i128::from(v) * i128::from(v);
    sq(dy) + sq(dx) < sq(r)
}
