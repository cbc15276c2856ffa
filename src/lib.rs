//! Shared library for `DegreeAdmin`
//! Contains the session gate, route table and notification store used by the CLI.

pub mod core;
pub mod logger;
pub mod shared;

pub use shared::*;
