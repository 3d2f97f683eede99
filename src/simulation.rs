//! Sources of non-determinism for the simulated gateway: latency, random declines, auth codes, time.
//! Production uses `RandomSimulator` and `SystemClock`; tests swap in the fixed variants.

use chrono::{DateTime, Utc};
use rand::Rng;
use std::time::Duration;

pub const DEFAULT_LATENCY_MIN_MS: u64 = 200;
pub const DEFAULT_LATENCY_MAX_MS: u64 = 500;

pub trait GatewaySimulator: Send + Sync {
    /// Pause applied before an operation produces its outcome.
    fn processing_delay(&self) -> Duration;

    /// Uniform draw in `0..100`.
    fn decline_roll(&self) -> u32;

    /// Uniform draw in `0..1_000_000`.
    fn authorization_code(&self) -> u32;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Default for LatencyRange {
    fn default() -> Self {
        Self {
            min_ms: DEFAULT_LATENCY_MIN_MS,
            max_ms: DEFAULT_LATENCY_MAX_MS,
        }
    }
}

impl LatencyRange {
    pub fn none() -> Self {
        Self { min_ms: 0, max_ms: 0 }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RandomSimulator {
    latency: LatencyRange,
}

impl RandomSimulator {
    pub fn new(latency: LatencyRange) -> Self {
        Self { latency }
    }
}

impl GatewaySimulator for RandomSimulator {
    fn processing_delay(&self) -> Duration {
        let LatencyRange { min_ms, max_ms } = self.latency;
        if max_ms <= min_ms {
            return Duration::from_millis(min_ms);
        }
        Duration::from_millis(rand::thread_rng().gen_range(min_ms..=max_ms))
    }

    fn decline_roll(&self) -> u32 {
        rand::thread_rng().gen_range(0..100)
    }

    fn authorization_code(&self) -> u32 {
        rand::thread_rng().gen_range(0..1_000_000)
    }
}

/// Deterministic simulator: every draw returns the configured value.
#[derive(Debug, Clone)]
pub struct FixedSimulator {
    pub delay: Duration,
    pub roll: u32,
    pub code: u32,
}

impl FixedSimulator {
    pub fn instant(roll: u32, code: u32) -> Self {
        Self {
            delay: Duration::ZERO,
            roll,
            code,
        }
    }

    /// Never randomly declines.
    pub fn approving() -> Self {
        Self::instant(99, 123_456)
    }

    /// Always takes the random-decline path.
    pub fn declining() -> Self {
        Self::instant(0, 0)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl GatewaySimulator for FixedSimulator {
    fn processing_delay(&self) -> Duration {
        self.delay
    }

    fn decline_roll(&self) -> u32 {
        self.roll
    }

    fn authorization_code(&self) -> u32 {
        self.code
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
