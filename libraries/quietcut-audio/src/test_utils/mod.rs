//! Test utilities for audio testing
//!
//! Provides test signal generation and analysis tools for verifying
//! silence removal and enhancement.

pub mod analysis;
pub mod signals;

pub use analysis::*;
pub use signals::*;
