//! Candidate screening: filtering, source fallback and enrichment.

pub mod demo;
pub mod enrichment;
pub mod filter;
pub mod orchestrator;

pub use enrichment::{Enricher, MarketContextEnricher};
pub use filter::{rank, ScreeningRules};
pub use orchestrator::FallbackOrchestrator;
