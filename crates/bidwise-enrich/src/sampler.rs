use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random source for historical bid synthesis.
///
/// Implemented for every `rand::Rng`, so callers pass a seeded `StdRng` when
/// they need reproducible output.
pub trait BidSampler {
    /// Uniform integer in `[low, high]`, inclusive.
    fn sample_count(&mut self, low: usize, high: usize) -> usize;

    /// Uniform float in `[0, 1)`.
    fn unit(&mut self) -> f64;
}

impl<R: Rng + ?Sized> BidSampler for R {
    fn sample_count(&mut self, low: usize, high: usize) -> usize {
        self.gen_range(low..=high)
    }

    fn unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Draw from a triangular distribution on `[low, high]` peaking at `mode`.
pub fn triangular<S: BidSampler + ?Sized>(sampler: &mut S, low: f64, high: f64, mode: f64) -> f64 {
    if high <= low {
        return low;
    }

    let mut u = sampler.unit();
    let mut c = (mode - low) / (high - low);
    let (mut low, mut high) = (low, high);
    if u > c {
        u = 1.0 - u;
        c = 1.0 - c;
        std::mem::swap(&mut low, &mut high);
    }
    low + (high - low) * (u * c).sqrt()
}

/// Per-deal random source. With a seed, the generator depends only on the
/// seed and the deal id, so a deal's bids do not change with batch order.
pub fn deal_rng(seed: Option<u64>, deal_id: &str) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed ^ fnv1a(deal_id.as_bytes())),
        None => StdRng::from_entropy(),
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(PRIME))
}
