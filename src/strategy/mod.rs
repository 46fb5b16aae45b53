//! Processing Strategy Module
//!
//! - Sequential: [`crate::Processor`] fills one part at a time
//! - Parallel: Rayon fan-out over many parts of one package

pub mod parallel;

pub use parallel::{replace_parts, total_report, Part, PartResult};
