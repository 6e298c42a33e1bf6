// src/lib.rs

//! shelfwatch - storefront catalog monitor.
//!
//! Acquires the live catalog of a storefront, diffs it against the last
//! persisted snapshot, and dispatches a notification per change.

pub mod error;
pub mod filter;
pub mod models;
pub mod normalize;
pub mod notify;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
