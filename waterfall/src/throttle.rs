//! Leading-edge time-window throttle.

/// Rate limiter over caller-supplied millisecond timestamps.
///
/// The first qualifying call fires immediately; later calls fire only when
/// strictly more than `interval_ms` has elapsed since the last fire. The
/// throttle never reads a clock, callers pass `now_ms`.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Throttle {
    interval_ms: u64,
    last_fired_ms: Option<u64>,
}

impl Throttle {
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_fired_ms: None,
        }
    }

    /// True when a call at `now_ms` is allowed; a fire is recorded.
    pub fn try_fire(&mut self, now_ms: u64) -> bool {
        match self.last_fired_ms {
            Some(last) if now_ms.saturating_sub(last) <= self.interval_ms => false,
            _ => {
                self.last_fired_ms = Some(now_ms);
                true
            }
        }
    }

    /// Forgets the last fire so the next call fires immediately.
    pub fn reset(&mut self) {
        self.last_fired_ms = None;
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub(crate) fn set_interval_ms(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
    }
}
