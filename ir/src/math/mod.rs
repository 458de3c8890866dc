//! Exact integer and rational arithmetic for geometry derivation.
//!
//! Nothing here touches floating point: every size the scheduler predicts
//! must equal what the emitted integer expression computes at run time.

pub mod arith;
pub mod linear;
pub mod rational;

pub use arith::{ceil_div, clamp_to_positive, floor_div, gcd, lcm, lcm_i64};
pub use linear::LinearCoefficient;
pub use rational::RationalNumber;
