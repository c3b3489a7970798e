//! Command implementations.

pub mod publish;
pub mod report;
