pub mod calculator;

pub mod momentum;
pub mod trend;
pub mod volatility;

pub use calculator::*;
