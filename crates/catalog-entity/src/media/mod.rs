//! Media asset domain entities.

pub mod kind;
pub mod model;

pub use kind::MediaKind;
pub use model::{MediaAsset, MediaFilter, MediaSort, MediaSortField, NewMediaAsset, storage_key};
