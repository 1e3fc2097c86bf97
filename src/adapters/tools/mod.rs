//! External tool adapters.

pub mod gpg;

pub use gpg::GpgDecryptor;
