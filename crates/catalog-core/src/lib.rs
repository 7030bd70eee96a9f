//! # catalog-core
//!
//! Core crate for the content catalog. Contains the object storage
//! capability trait, configuration schemas, pagination/sorting types,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other catalog crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
