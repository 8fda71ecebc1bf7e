//! Gait Core - Foundational types for the gait animation crates
//!
//! This crate provides the error type and `Result` alias that every other
//! gait crate reports failures through.

mod error;

pub use error::{GaitError, Result};
