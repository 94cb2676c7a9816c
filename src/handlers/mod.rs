//! HTTP handlers for entity CRUD and relationship lookups.

pub mod entity;
pub mod relations;
pub use relations::*;
