//! Garbage image dataset tools.
//!
//! - [`core::partition`] splits a class-labeled image folder into
//!   train/val/test copies with per-class random sampling
//! - [`core::sorting`] maps classifier output to one of four disposal bins
//!   and stores sorted images per bin

pub mod cli;
pub mod config;
pub mod core;
pub mod logging;
