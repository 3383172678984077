//! CLI command implementations.

pub mod compile;
pub mod dump;
pub mod info;
pub mod run;
pub mod tables;
