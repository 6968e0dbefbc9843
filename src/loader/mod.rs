//! Catalog loaders
//!
//! JSON catalogs of die templates, tile templates, enemies and the player
//! inventory, read synchronously or on the tokio runtime.

pub mod catalog;
pub mod catalog_async;

pub use catalog::{Catalog, Inventory};
pub use catalog_async::{load_catalog, load_catalogs};
