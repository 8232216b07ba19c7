//! Services implementing rule evaluation.

pub mod filter;
