//! Mbox parsing adapters: segmentation, message parsing, calendar extraction.
//!
//! These are the parsing stages of the filter pipeline. All of them degrade
//! gracefully on malformed input; only file access errors are fatal.

pub mod calendar;
pub mod parser;
pub mod segmenter;

pub use calendar::extract_meetings;
pub use parser::parse_message;
pub use segmenter::{MessageBlocks, repair_line};
