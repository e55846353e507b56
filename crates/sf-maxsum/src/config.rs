//! Reallocation cycle parameters.

use sf_core::Tick;

use crate::{MaxSumError, MaxSumResult};

/// Max-sum protocol settings, shared by every plane of a run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaxSumConfig {
    /// Length R of one reallocation cycle in ticks.
    pub cycle_ticks:     u64,
    /// Number I of belief rounds per cycle.  Also the neighbor-confirmation
    /// horizon.
    pub rounds:          u64,
    /// Weight k of the workload penalty in [`WorkloadCost`][crate::WorkloadCost]
    /// and of the per-cycle claim penalty.
    pub workload_weight: f64,
}

impl Default for MaxSumConfig {
    fn default() -> Self {
        Self { cycle_ticks: 8, rounds: 4, workload_weight: 1.0 }
    }
}

/// What a plane does at a given tick of the cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CyclePhase {
    Rebuild,
    /// Belief round, numbered from 1.
    Round(u64),
    Decide,
    Idle,
}

impl MaxSumConfig {
    pub fn validate(&self) -> MaxSumResult<()> {
        if self.rounds == 0 {
            return Err(MaxSumError::ZeroRounds);
        }
        if self.cycle_ticks < self.rounds + 2 {
            return Err(MaxSumError::CycleTooShort {
                cycle_ticks: self.cycle_ticks,
                rounds:      self.rounds,
            });
        }
        if !self.workload_weight.is_finite() || self.workload_weight < 0.0 {
            return Err(MaxSumError::InvalidWeight(self.workload_weight));
        }
        Ok(())
    }

    /// Phase of `tick`.  Assumes a validated config.
    pub fn phase(&self, tick: Tick) -> CyclePhase {
        match tick.phase(self.cycle_ticks) {
            0 => CyclePhase::Rebuild,
            n if n <= self.rounds => CyclePhase::Round(n),
            n if n == self.rounds + 1 => CyclePhase::Decide,
            _ => CyclePhase::Idle,
        }
    }

    /// Cycle number `tick` falls in.
    pub fn cycle(&self, tick: Tick) -> u64 {
        tick.0 / self.cycle_ticks
    }
}
