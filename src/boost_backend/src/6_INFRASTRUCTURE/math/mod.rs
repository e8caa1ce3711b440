//! Math - exact decimal helpers shared by every zone

pub mod decimal_math;

pub use decimal_math::{nat_to_decimal, clamp_non_negative, clamp_unit_interval, parse_decimal, days_to_seconds};
