//! Seeded random-walk candle source.
//!
//! Produces the same series for the same `(seed, symbol, interval, limit)`
//! on every machine. Used for offline runs, sweeps and tests.

use super::provider::{CandleRequest, CandleSource, DataError, SourceKind};
use crate::domain::Candle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 2024-01-01T00:00:00Z.
pub const DEFAULT_START_TIME: i64 = 1_704_067_200;
pub const DEFAULT_START_PRICE: f64 = 50_000.0;
/// Maximum fractional close-to-close move per bar.
pub const DEFAULT_VOLATILITY: f64 = 0.004;
/// Candle count when the request does not set a limit.
pub const DEFAULT_SYNTHETIC_LEN: usize = 500;

#[derive(Debug, Clone)]
pub struct SyntheticSource {
    seed: u64,
    start_time: i64,
    start_price: f64,
    volatility: f64,
}

impl SyntheticSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            start_time: DEFAULT_START_TIME,
            start_price: DEFAULT_START_PRICE,
            volatility: DEFAULT_VOLATILITY,
        }
    }

    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = volatility;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// RNG for one request, derived from the seed, symbol and interval.
    fn rng_for(&self, request: &CandleRequest) -> StdRng {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed.to_le_bytes());
        hasher.update(request.symbol.as_bytes());
        hasher.update(request.interval.as_str().as_bytes());
        StdRng::from_seed(*hasher.finalize().as_bytes())
    }

    pub fn generate(&self, request: &CandleRequest) -> Vec<Candle> {
        let len = if request.limit == 0 {
            DEFAULT_SYNTHETIC_LEN
        } else {
            request.limit
        };
        let step = request.interval.seconds();
        let vol = self.volatility.abs().max(f64::EPSILON);
        let mut rng = self.rng_for(request);

        let mut candles = Vec::with_capacity(len);
        let mut open = self.start_price;
        for i in 0..len {
            let ret: f64 = rng.gen_range(-vol..vol);
            let close = (open * (1.0 + ret)).max(0.01);
            let wick_up: f64 = rng.gen_range(0.0..vol / 2.0);
            let wick_down: f64 = rng.gen_range(0.0..vol / 2.0);
            candles.push(Candle {
                time: self.start_time + i as i64 * step,
                open,
                high: open.max(close) * (1.0 + wick_up),
                low: open.min(close) * (1.0 - wick_down),
                close,
                volume: rng.gen_range(1.0..100.0),
            });
            open = close;
        }
        candles
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new(42)
    }
}

impl CandleSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Synthetic
    }

    fn fetch(&self, request: &CandleRequest) -> Result<Vec<Candle>, DataError> {
        Ok(self.generate(request))
    }
}
