//! tonescore CLI library.
//!
//! Command implementations behind the `tonescore` binary, kept in a library
//! so they can be driven from tests.

pub mod commands;
