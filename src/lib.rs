//! gmail-extract: request, download, and filter Google Apps mailbox exports.

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
