// src/pipeline/run.rs

//! One end-to-end monitor cycle.
//!
//! Load the prior snapshot, acquire the live one, notify every change,
//! persist. Each stage absorbs its own failures; only setup errors (bad
//! base URL) propagate out of the run.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::Config;
use crate::notify::{Notifier, format};
use crate::pipeline::diff::{DiffTally, diff_snapshots};
use crate::services::{AcquireSource, Acquirer, Storefront};
use crate::storage::SnapshotStore;

/// Summary of one completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Products tracked after this run
    pub products: usize,
    /// Events emitted by the diff
    pub events: usize,
    pub tally: DiffTally,
    pub source: AcquireSource,
}

/// Execute one monitor cycle.
///
/// The snapshot is saved unconditionally at the end: the first run must
/// land on disk even though it notifies nothing, and a failed delivery
/// must not leave the old state behind to re-fire next run. A save failure
/// is logged, not returned; the notification side effects already
/// happened.
pub async fn run_monitor<S, P, N>(
    config: &Config,
    storefront: &S,
    store: &P,
    notifier: &N,
) -> Result<RunSummary>
where
    S: Storefront,
    P: SnapshotStore,
    N: Notifier + ?Sized,
{
    let started_at = Utc::now();

    let old = store.load().await;
    let acquirer = Acquirer::new(config, storefront)?;
    let (new, stats) = acquirer.acquire().await;
    let variants: usize = new.values().map(|product| product.variant_count()).sum();
    log::info!(
        "Acquired {} products ({} variants) via {:?} ({} pages, {} seen, {} skipped)",
        new.len(),
        variants,
        stats.source,
        stats.pages,
        stats.seen,
        stats.skipped
    );

    let events = diff_snapshots(&old, &new);
    let tally = DiffTally::of(&events);
    if tally.has_changes() {
        log::info!(
            "Diff: {} new products, {} new variants, {} price changes, {} restocks, {} quantity increases",
            tally.new_products,
            tally.new_variants,
            tally.price_changes,
            tally.restocks,
            tally.quantity_increases
        );
    } else {
        log::info!("No changes detected");
    }

    for event in &events {
        let product = event.product();
        log::info!(
            "[{}] {} ({})",
            event.kind().label(),
            product.title,
            product.handle
        );
        let message = format::format_event(event, &config.notify);
        if let Err(error) = notifier.send(&message).await {
            log::warn!("Notification delivery failed: {error}");
        }
    }

    if let Err(error) = store.save(&new).await {
        log::error!("Snapshot save failed: {error}");
    }

    Ok(RunSummary {
        started_at,
        finished_at: Utc::now(),
        products: new.len(),
        events: events.len(),
        tally,
        source: stats.source,
    })
}
