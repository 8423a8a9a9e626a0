//! Signal composition from screened instruments.

pub mod composer;

pub use composer::*;
