//! Small numeric helpers shared by the indicator modules.

pub mod math;
