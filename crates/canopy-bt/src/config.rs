#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Knobs shared by an executor and every executor nested inside it (guards, interrupt
/// branches).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ExecutorConfig {
    /// Upper bound on how many times a dynamic priority list re-ticks one guard within a single
    /// cycle while that guard keeps reporting `Running`.
    pub long_tick_cap: u32,
    /// Seed for the random composites. Nested executors draw their seeds from their parent.
    pub seed: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            long_tick_cap: 20,
            seed: 0,
        }
    }
}

impl ExecutorConfig {
    pub fn with_long_tick_cap(mut self, cap: u32) -> Self {
        self.long_tick_cap = cap.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
