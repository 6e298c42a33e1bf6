// src/pipeline/diff.rs

//! Diff engine over two snapshots.
//!
//! Pure comparison: no I/O, no clock, deterministic output order. The new
//! snapshot drives iteration, so products and variants that vanished from
//! the source produce nothing and silently leave the tracked state.

use crate::models::{ChangeEvent, EventKind, Snapshot};

/// Prices closer than this count as unchanged.
const PRICE_EPSILON: f64 = 1e-6;

/// Per-kind event counts for the run summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiffTally {
    pub new_products: usize,
    pub new_variants: usize,
    pub price_changes: usize,
    pub restocks: usize,
    pub quantity_increases: usize,
}

impl DiffTally {
    /// Count the events of one diff.
    pub fn of(events: &[ChangeEvent]) -> Self {
        let mut tally = Self::default();
        for event in events {
            match event.kind() {
                EventKind::NewProduct => tally.new_products += 1,
                EventKind::NewVariant => tally.new_variants += 1,
                EventKind::PriceChange => tally.price_changes += 1,
                EventKind::Restock => tally.restocks += 1,
                EventKind::QuantityIncrease => tally.quantity_increases += 1,
            }
        }
        tally
    }

    pub fn total(&self) -> usize {
        self.new_products
            + self.new_variants
            + self.price_changes
            + self.restocks
            + self.quantity_increases
    }

    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}

/// Compute all change events between two snapshots.
///
/// Emission order per product: one `NewProduct` for a brand-new handle,
/// nothing else for it. For handles on both sides: every `NewVariant`
/// first, then per surviving variant (map order) `PriceChange`, `Restock`,
/// `QuantityIncrease`. Restock fires only on the out-of-stock to in-stock
/// edge; quantity comparisons need concrete integers on both sides.
pub fn diff_snapshots(old: &Snapshot, new: &Snapshot) -> Vec<ChangeEvent> {
    let mut events = Vec::new();

    for (handle, product) in new {
        let Some(prior) = old.get(handle) else {
            // Brand-new handle: exactly one event, led by the
            // representative variant
            if let Some(variant) = product.first_variant() {
                events.push(ChangeEvent::NewProduct {
                    product: product.clone(),
                    variant: variant.clone(),
                });
            }
            continue;
        };

        for (vid, variant) in &product.variants {
            if !prior.variants.contains_key(vid) {
                events.push(ChangeEvent::NewVariant {
                    product: product.clone(),
                    variant: variant.clone(),
                });
            }
        }

        for (vid, variant) in &product.variants {
            let Some(prior_variant) = prior.variants.get(vid) else {
                continue;
            };

            if (variant.price - prior_variant.price).abs() > PRICE_EPSILON {
                events.push(ChangeEvent::PriceChange {
                    product: product.clone(),
                    variant: variant.clone(),
                    old_price: prior_variant.price,
                    new_price: variant.price,
                });
            }

            if !prior_variant.available && variant.available {
                events.push(ChangeEvent::Restock {
                    product: product.clone(),
                    variant: variant.clone(),
                });
            }

            if let (Some(before), Some(after)) =
                (prior_variant.inventory_quantity, variant.inventory_quantity)
            {
                if after > before {
                    events.push(ChangeEvent::QuantityIncrease {
                        product: product.clone(),
                        variant: variant.clone(),
                        old_quantity: before,
                        new_quantity: after,
                    });
                }
            }
        }
    }

    events
}
