//! Runs Module - paragraph text as an editable character sequence
//!
//! - Cursor: flattens a paragraph group into origin-tagged units
//! - Rebuild: turns an edited sequence back into paragraph and run elements

pub mod cursor;
pub mod rebuild;

pub use cursor::{Lookahead, Origin, RunCursor, TextUnit};
pub use rebuild::rebuild;
