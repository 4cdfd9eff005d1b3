// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Statistics
//!
//! Counters over one enumeration run, reported at debug level when the run
//! finishes. Stored in a fixed array indexed by the counter enum.

use strum::EnumCount;
use strum_macros::EnumCount as EnumCountMacro;
use tracing::debug;

#[derive(EnumCountMacro, Copy, Clone, Debug)]
#[repr(u8)]
pub enum Counter {
    /// Candidate wheels produced by rule branching.
    Branched,
    /// Candidates merged away as isomorphic duplicates.
    MergedIsomorphic,
    /// Candidates whose optimistic charge cannot beat the threshold.
    PrunedByChargeBound,
    /// Candidates committing less than a rule is forced to send.
    PrunedByCommittedAmount,
    /// Candidates containing a reducible configuration.
    PrunedByConfiguration,
    /// Fully decided cartwheels emitted.
    Emitted,
}

#[derive(Debug, Default)]
pub struct Statistics {
    counts: [u64; Counter::COUNT],
}

impl Statistics {
    pub fn new() -> Self {
        Statistics::default()
    }

    pub fn increment(&mut self, counter: Counter) {
        self.counts[counter as usize] += 1;
    }

    pub fn add(&mut self, counter: Counter, n: u64) {
        self.counts[counter as usize] += n;
    }

    pub fn get(&self, counter: Counter) -> u64 {
        self.counts[counter as usize]
    }

    /// Log the whole array at debug level.
    pub fn report(&self) {
        debug!(
            branched = self.get(Counter::Branched),
            merged = self.get(Counter::MergedIsomorphic),
            pruned_by_charge = self.get(Counter::PrunedByChargeBound),
            pruned_by_committed = self.get(Counter::PrunedByCommittedAmount),
            pruned_by_configuration = self.get(Counter::PrunedByConfiguration),
            emitted = self.get(Counter::Emitted),
            "enumeration statistics"
        );
    }
}
