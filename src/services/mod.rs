//! Service layer for the monitor.
//!
//! This module contains the acquisition logic:
//! - Storefront transport seam (`Storefront`, `HttpStorefront`)
//! - Snapshot building with strategy fallback (`Acquirer`)

mod acquire;
mod storefront;

pub use acquire::{AcquireSource, AcquireStats, Acquirer};
pub use storefront::{HttpStorefront, Storefront};
