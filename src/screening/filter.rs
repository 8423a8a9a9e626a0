//! Threshold filtering and momentum ranking of candidate instruments.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::instrument::InstrumentSnapshot;

/// Numeric bounds a candidate must satisfy to qualify.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningRules {
    pub min_volume: u64,
    /// Candidates without a reported market cap only pass when this is zero.
    pub min_market_cap: f64,
    /// Inclusive lower bound of the momentum band, in percent.
    pub min_change_pct: f64,
    /// Inclusive upper bound of the momentum band, in percent.
    pub max_change_pct: f64,
    pub max_results: usize,
}

impl ScreeningRules {
    /// Accepts everything with a positive price, keeps the top 10.
    pub fn permissive() -> Self {
        Self {
            min_volume: 0,
            min_market_cap: 0.0,
            min_change_pct: f64::NEG_INFINITY,
            max_change_pct: f64::INFINITY,
            max_results: 10,
        }
    }

    pub fn with_min_volume(mut self, min_volume: u64) -> Self {
        self.min_volume = min_volume;
        self
    }

    pub fn with_min_market_cap(mut self, min_market_cap: f64) -> Self {
        self.min_market_cap = min_market_cap;
        self
    }

    pub fn with_change_band(mut self, low: f64, high: f64) -> Self {
        self.min_change_pct = low;
        self.max_change_pct = high;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Liquid mid/large caps with 3-15% daily momentum.
    pub fn crypto_professional() -> Self {
        Self::permissive()
            .with_min_volume(500_000)
            .with_min_market_cap(50_000_000.0)
            .with_change_band(3.0, 15.0)
    }

    pub fn accepts(&self, candidate: &InstrumentSnapshot) -> bool {
        if !(candidate.price > 0.0) || !candidate.change_pct.is_finite() {
            return false;
        }
        if candidate.volume < self.min_volume {
            return false;
        }
        let cap_ok = match candidate.market_cap {
            Some(cap) => cap >= self.min_market_cap,
            None => self.min_market_cap <= 0.0,
        };
        cap_ok
            && candidate.change_pct >= self.min_change_pct
            && candidate.change_pct <= self.max_change_pct
    }
}

impl Default for ScreeningRules {
    fn default() -> Self {
        Self::permissive()
    }
}

/// Drop candidates failing any bound, order by percent change then volume
/// (both descending), and keep at most `rules.max_results`.
///
/// The sort is stable, so exact ties on both keys keep their input order.
pub fn rank(candidates: Vec<InstrumentSnapshot>, rules: &ScreeningRules) -> Vec<InstrumentSnapshot> {
    let mut survivors: Vec<InstrumentSnapshot> =
        candidates.into_iter().filter(|c| rules.accepts(c)).collect();

    survivors.sort_by(|a, b| {
        b.change_pct
            .partial_cmp(&a.change_pct)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.volume.cmp(&a.volume))
    });
    survivors.truncate(rules.max_results);
    survivors
}
