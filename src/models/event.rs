//! Typed change events emitted by the diff engine.

use crate::models::{ProductState, VariantState};

/// One semantically meaningful difference between two snapshots.
///
/// Every variant carries the product it belongs to plus the variant that
/// justifies the notification, so the dispatch layer needs no lookups.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    /// Handle present in the new snapshot only; the variant is the
    /// product's representative (first in map order).
    NewProduct {
        product: ProductState,
        variant: VariantState,
    },

    /// Handle present in both snapshots, variant id in the new one only.
    /// Carries the variant that actually appeared.
    NewVariant {
        product: ProductState,
        variant: VariantState,
    },

    /// Same variant id on both sides with a price that moved.
    PriceChange {
        product: ProductState,
        variant: VariantState,
        old_price: f64,
        new_price: f64,
    },

    /// Same variant id, out of stock before and purchasable now.
    Restock {
        product: ProductState,
        variant: VariantState,
    },

    /// Same variant id, concrete quantities on both sides, strictly more
    /// units now. Independent of `Restock`; both may fire in one run.
    QuantityIncrease {
        product: ProductState,
        variant: VariantState,
        old_quantity: i64,
        new_quantity: i64,
    },
}

impl ChangeEvent {
    /// Discriminant of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::NewProduct { .. } => EventKind::NewProduct,
            Self::NewVariant { .. } => EventKind::NewVariant,
            Self::PriceChange { .. } => EventKind::PriceChange,
            Self::Restock { .. } => EventKind::Restock,
            Self::QuantityIncrease { .. } => EventKind::QuantityIncrease,
        }
    }

    /// The product this event concerns.
    pub fn product(&self) -> &ProductState {
        match self {
            Self::NewProduct { product, .. }
            | Self::NewVariant { product, .. }
            | Self::PriceChange { product, .. }
            | Self::Restock { product, .. }
            | Self::QuantityIncrease { product, .. } => product,
        }
    }

    /// The variant that triggered this event.
    pub fn variant(&self) -> &VariantState {
        match self {
            Self::NewProduct { variant, .. }
            | Self::NewVariant { variant, .. }
            | Self::PriceChange { variant, .. }
            | Self::Restock { variant, .. }
            | Self::QuantityIncrease { variant, .. } => variant,
        }
    }

    /// Thumbnail reference handed to the notifier alongside the message.
    pub fn thumbnail(&self) -> Option<&str> {
        self.product().image.as_deref()
    }
}

/// Event discriminant, used for run summaries and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    NewProduct,
    NewVariant,
    PriceChange,
    Restock,
    QuantityIncrease,
}

impl EventKind {
    /// Short lowercase label for log lines.
    pub fn label(self) -> &'static str {
        match self {
            Self::NewProduct => "new product",
            Self::NewVariant => "new variant",
            Self::PriceChange => "price change",
            Self::Restock => "restock",
            Self::QuantityIncrease => "quantity increase",
        }
    }
}
