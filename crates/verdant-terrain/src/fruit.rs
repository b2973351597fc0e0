//! Consumption state for fruit entities.
//!
//! The streaming core only creates and retracts fruit; deciding when a fruit
//! is eaten belongs to player logic. This type is the hook that logic drives.
//! Time is passed in explicitly (seconds on any monotonic clock).

/// Energy granted by eating one fruit.
pub const ENERGY_GAIN: u32 = 10;

/// Seconds before an eaten fruit becomes available again.
pub const REAPPEAR_SECONDS: f64 = 30.0;

/// Whether a fruit is available, and when it was last eaten.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FruitState {
    claimed_at: Option<f64>,
}

impl FruitState {
    /// A fresh, unclaimed fruit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Has this fruit been eaten and not yet restored?
    pub fn is_claimed(&self) -> bool {
        self.claimed_at.is_some()
    }

    /// Eat the fruit at time `now`.
    ///
    /// Returns the energy gained, or `None` if it was already claimed.
    pub fn claim(&mut self, now: f64) -> Option<u32> {
        if self.is_claimed() {
            return None;
        }
        self.claimed_at = Some(now);
        Some(ENERGY_GAIN)
    }

    /// Restore the fruit if the reappear delay has elapsed.
    ///
    /// Returns `true` if the fruit became available during this call.
    pub fn tick(&mut self, now: f64) -> bool {
        match self.claimed_at {
            Some(at) if now - at >= REAPPEAR_SECONDS => {
                self.claimed_at = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_once() {
        let mut fruit = FruitState::new();
        assert!(!fruit.is_claimed());
        assert_eq!(fruit.claim(1.0), Some(ENERGY_GAIN));
        assert!(fruit.is_claimed());
        assert_eq!(fruit.claim(2.0), None);
    }

    #[test]
    fn test_reappears_after_delay() {
        let mut fruit = FruitState::new();
        fruit.claim(10.0);

        assert!(!fruit.tick(10.0 + REAPPEAR_SECONDS - 0.5));
        assert!(fruit.is_claimed());

        assert!(fruit.tick(10.0 + REAPPEAR_SECONDS));
        assert!(!fruit.is_claimed());
        assert_eq!(fruit.claim(50.0), Some(ENERGY_GAIN));
    }

    #[test]
    fn test_tick_on_unclaimed_is_noop() {
        let mut fruit = FruitState::new();
        assert!(!fruit.tick(1_000.0));
        assert!(!fruit.is_claimed());
    }
}
