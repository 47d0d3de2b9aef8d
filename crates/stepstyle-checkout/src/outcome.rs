//! # Outcome Sources
//!
//! Every random decision the simulator makes is a uniform draw in `[0, 1)`:
//!
//! ```text
//!   draw()     success?  (< method success rate)
//!              which decline message?  (> 0.5 → network declined)
//!              delivery estimate  (3 + floor(r × 5) days)
//!
//!   id_draw()  transaction id  (PREFIX + 100000000 + floor(r × 900000000))
//!              order id        (STEP-XXXX-XXXX, 1000 + floor(r × 9000) each)
//! ```

use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::Mutex;

use rand::Rng;

pub trait OutcomeSource: Debug + Send + Sync {
    /// Draw deciding a simulated outcome.
    fn draw(&self) -> f64;

    /// Draw feeding a generated identifier.
    fn id_draw(&self) -> f64 {
        self.draw()
    }
}

/// Thread-local RNG draws.
#[derive(Debug, Clone, Copy, Default)]
pub struct RngOutcome;

impl OutcomeSource for RngOutcome {
    fn draw(&self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Replays a fixed script of outcome draws.
///
/// Once the script runs out every draw returns `fallback`. Identifier draws
/// never consume the script.
#[derive(Debug)]
pub struct ScriptedOutcome {
    script: Mutex<VecDeque<f64>>,
    fallback: f64,
    id_value: f64,
}

impl ScriptedOutcome {
    pub fn new(script: impl IntoIterator<Item = f64>) -> Self {
        ScriptedOutcome {
            script: Mutex::new(script.into_iter().collect()),
            fallback: 0.0,
            id_value: 0.5,
        }
    }

    /// Every outcome draw succeeds.
    pub fn always_succeed() -> Self {
        Self::new([]).fallback(0.0)
    }

    /// Every outcome draw fails at any success rate below 1.
    pub fn always_fail() -> Self {
        Self::new([]).fallback(0.999_999)
    }

    pub fn fallback(mut self, value: f64) -> Self {
        self.fallback = value;
        self
    }

    pub fn id_value(mut self, value: f64) -> Self {
        self.id_value = value;
        self
    }

    /// Draws left in the script.
    pub fn remaining(&self) -> usize {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl OutcomeSource for ScriptedOutcome {
    fn draw(&self) -> f64 {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or(self.fallback)
    }

    fn id_draw(&self) -> f64 {
        self.id_value
    }
}

/// Maps a draw onto `[low, low + span)`.
pub(crate) fn scale(draw: f64, low: u64, span: u64) -> u64 {
    let clamped = draw.clamp(0.0, 1.0 - f64::EPSILON);
    low + (clamped * span as f64).floor() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_then_fallback() {
        let source = ScriptedOutcome::new([0.3, 0.9]).fallback(0.1);
        assert_eq!(source.draw(), 0.3);
        assert_eq!(source.id_draw(), 0.5);
        assert_eq!(source.draw(), 0.9);
        assert_eq!(source.remaining(), 0);
        assert_eq!(source.draw(), 0.1);
    }

    #[test]
    fn test_rng_draws_in_unit_interval() {
        for _ in 0..1000 {
            let r = RngOutcome.draw();
            assert!((0.0..1.0).contains(&r));
        }
    }

    #[test]
    fn test_scale_bounds() {
        assert_eq!(scale(0.0, 100_000_000, 900_000_000), 100_000_000);
        assert_eq!(scale(1.0, 100_000_000, 900_000_000), 999_999_999);
        assert_eq!(scale(0.5, 1000, 9000), 5500);
        assert_eq!(scale(0.999, 3, 5), 7);
    }
}
