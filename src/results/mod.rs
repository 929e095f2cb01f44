//! Result types shared by every provider
//!
//! Normalized search hits and the structured threat report built from them.

mod types;

pub use types::*;
