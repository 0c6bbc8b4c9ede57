//! Common types, protocol definitions, and errors shared across `encrypted-lookup` crates.

pub mod error;
pub mod protocol;

pub use error::{ServiceError, ValidationError};
