//! SQL generation module.
//!
//! - [`generator`] - SELECT/FROM/JOIN/GROUP BY compiler
//! - [`ident`] - identifier quoting
//! - [`validate`] - sqlparser-based syntax check

pub mod generator;
pub mod ident;
pub mod validate;

pub use generator::{GenerateError, GenerateResult, SqlGenerator};
pub use ident::quote_identifier;
pub use validate::{validate_sql, ValidationError};
