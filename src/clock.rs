// src/clock.rs
//! Monotonic tick clock.

use once_cell::sync::Lazy;
use std::time::Instant;

/// A monotonic counter.
pub trait TickSource {
    /// Current counter value.
    fn ticks(&self) -> u64;

    /// Counter frequency. Never zero.
    fn ticks_per_second(&self) -> u64;
}

/// Nanoseconds since the first reading in this process.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicTicks;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

static EPOCH: Lazy<Instant> = Lazy::new(Instant::now);

impl TickSource for MonotonicTicks {
    fn ticks(&self) -> u64 {
        u64::try_from(EPOCH.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    fn ticks_per_second(&self) -> u64 {
        NANOS_PER_SECOND
    }
}

/// Converts a tick count to milliseconds.
///
/// Multiplies before dividing so short deltas keep their precision.
pub fn ticks_to_ms(ticks: u64, ticks_per_second: u64) -> f64 {
    (ticks as f64 * 1000.0) / ticks_per_second as f64
}

/// Clock over a tick source, monotonic by default.
#[derive(Debug, Clone, Default)]
pub struct Clock<S: TickSource = MonotonicTicks> {
    source: S,
}

impl Clock<MonotonicTicks> {
    pub fn monotonic() -> Self {
        Clock {
            source: MonotonicTicks,
        }
    }
}

impl<S: TickSource> Clock<S> {
    pub fn with_source(source: S) -> Self {
        Clock { source }
    }

    pub fn now(&self) -> u64 {
        self.source.ticks()
    }

    pub fn ticks_per_second(&self) -> u64 {
        self.source.ticks_per_second()
    }

    /// Raw ticks elapsed since `start`.
    pub fn since(&self, start: u64) -> u64 {
        self.now().saturating_sub(start)
    }

    pub fn ms(&self, ticks: u64) -> f64 {
        ticks_to_ms(ticks, self.ticks_per_second())
    }

    pub fn elapsed_ms(&self, start: u64, end: u64) -> f64 {
        self.ms(end.saturating_sub(start))
    }

    pub fn since_ms(&self, start: u64) -> f64 {
        self.elapsed_ms(start, self.now())
    }
}
