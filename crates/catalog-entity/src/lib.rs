//! # catalog-entity
//!
//! Domain entity models for the content catalog. Every struct in this crate
//! represents a database table row or a domain value object. Database
//! entities derive `sqlx::FromRow`.

pub mod folder;
pub mod media;
