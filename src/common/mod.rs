//! Format-independent helpers.

pub mod unit;
pub mod xml;
