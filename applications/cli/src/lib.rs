//! quietcut command-line front end
//!
//! Decodes files with Symphonia, loads layered configuration, and drives the
//! quietcut pipeline.

pub mod config;
pub mod decode;
pub mod error;
pub mod progress;
pub mod report;

pub use config::AppConfig;
pub use decode::decode_file;
pub use error::{CliError, DecodeError, Result};
pub use progress::ProgressLogger;
pub use report::{analyze, RegionReport};
