//! HTTP surface for report compilation.
//!
//! Available with the `server` feature.

mod server;

pub use server::*;
