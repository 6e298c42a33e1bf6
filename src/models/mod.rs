// src/models/mod.rs

//! Domain models for the monitor.
//!
//! Raw source shapes, the canonical state they normalize into, the change
//! events the diff engine emits, and the application configuration.

mod config;
mod event;
mod raw;
mod state;

// Re-export all public types
pub use config::{BrandConfig, Config, HttpConfig, NotifyConfig, SnapshotConfig, StoreConfig};
pub use event::{ChangeEvent, EventKind};
pub use raw::{DetailProduct, FeedPage, FeedProduct, RawTags, RawVariant};
pub use state::{ProductState, Snapshot, VariantState};
