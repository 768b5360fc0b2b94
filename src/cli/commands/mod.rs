//! Command execution functions.

pub mod deploy;
pub mod snapshot;
