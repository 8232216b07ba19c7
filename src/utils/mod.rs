//! Utility functions shared across services.

pub mod flatten;

pub use flatten::{flatten, unflatten, FlatObject, FlattenError, PATH_SEPARATOR};
