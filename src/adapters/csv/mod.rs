//! CSV output adapter. Two-stream summary writer for retained messages.

pub mod summary;

pub use summary::{FIELD_DELIMITER, LIST_SEPARATOR, SummaryWriter};
