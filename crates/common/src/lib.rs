//! Shared building blocks for the ATM service crates.
//!
//! Wire types exchanged over HTTP, logging setup and runtime checks live
//! here so the server and the demo client agree on one definition.

pub mod types;
pub mod utils;
pub mod env;
