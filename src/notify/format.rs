// src/notify/format.rs

//! Event to message rendering.
//!
//! One change event becomes one message. Arrival events carry the full
//! per-size inventory summary; the per-variant events show only the line
//! for the variant that fired.

use crate::models::{ChangeEvent, EventKind, NotifyConfig, ProductState, VariantState};
use crate::notify::Message;

/// Render one change event as a notification message.
pub fn format_event(event: &ChangeEvent, config: &NotifyConfig) -> Message {
    let body = match event {
        ChangeEvent::NewProduct { product, variant }
        | ChangeEvent::NewVariant { product, variant } => arrival_body(product, variant, config),
        ChangeEvent::PriceChange {
            product,
            variant,
            old_price,
            new_price,
        } => price_change_body(product, variant, *old_price, *new_price, config),
        ChangeEvent::Restock { product, variant } => restock_body(product, variant, config),
        ChangeEvent::QuantityIncrease {
            product,
            variant,
            old_quantity,
            new_quantity,
        } => quantity_body(product, variant, *old_quantity, *new_quantity, config),
    };

    Message {
        title: headline(event.kind()),
        color: config.accent_color,
        body,
        thumbnail: event.thumbnail().map(str::to_string),
    }
}

fn headline(kind: EventKind) -> String {
    let text = match kind {
        EventKind::NewProduct => "New product",
        EventKind::NewVariant => "New variant",
        EventKind::PriceChange => "Price change",
        EventKind::Restock => "Restock",
        EventKind::QuantityIncrease => "Inventory increase",
    };
    format!("🔔 {text}")
}

fn arrival_body(product: &ProductState, variant: &VariantState, config: &NotifyConfig) -> String {
    format!(
        "• Name: {}\n• SKU: {}\n• Color: {}\n• Price: {}\n🧾 Inventory: {}\n\n{}",
        product.title,
        variant.sku.as_deref().unwrap_or("unknown"),
        variant.option1.as_deref().unwrap_or("unknown"),
        render_price(variant.price, config),
        inventory_summary(product),
        link_line(product),
    )
}

fn price_change_body(
    product: &ProductState,
    variant: &VariantState,
    old_price: f64,
    new_price: f64,
    config: &NotifyConfig,
) -> String {
    format!(
        "• Name: {}\n• SKU: {}\n• Color: {}\n• Price: {} {:.2} → {} {:.2}\n🧾 Inventory: {}:{}\n\n{}",
        product.title,
        variant.sku.as_deref().unwrap_or("unknown"),
        variant.option1.as_deref().unwrap_or("unknown"),
        config.currency_label,
        old_price,
        config.currency_label,
        new_price,
        variant_size(variant),
        variant_units(variant),
        link_line(product),
    )
}

fn restock_body(product: &ProductState, variant: &VariantState, config: &NotifyConfig) -> String {
    format!(
        "• Name: {}\n• SKU: {}\n• Color: {}\n• Price: {}\n🧾 Inventory: {}:{}\n\n{}",
        product.title,
        variant.sku.as_deref().unwrap_or("unknown"),
        variant.option1.as_deref().unwrap_or("unknown"),
        render_price(variant.price, config),
        variant_size(variant),
        variant_units(variant),
        link_line(product),
    )
}

fn quantity_body(
    product: &ProductState,
    variant: &VariantState,
    old_quantity: i64,
    new_quantity: i64,
    config: &NotifyConfig,
) -> String {
    format!(
        "• Name: {}\n• SKU: {}\n• Color: {}\n• Price: {}\n🧾 Inventory: {}:{} → {}\n\n{}",
        product.title,
        variant.sku.as_deref().unwrap_or("unknown"),
        variant.option1.as_deref().unwrap_or("unknown"),
        render_price(variant.price, config),
        variant_size(variant),
        old_quantity,
        new_quantity,
        link_line(product),
    )
}

/// Whole prices render without decimals, everything else with two.
fn render_price(price: f64, config: &NotifyConfig) -> String {
    if price.fract() == 0.0 {
        format!("{} {:.0}", config.currency_label, price)
    } else {
        format!("{} {:.2}", config.currency_label, price)
    }
}

fn link_line(product: &ProductState) -> String {
    format!("🔗 [Open product]({})", product.url)
}

/// Per-size unit totals across all variants, first-seen size order.
fn inventory_summary(product: &ProductState) -> String {
    let mut counts: Vec<(String, i64)> = Vec::new();
    for variant in product.variants.values() {
        let size = variant_size(variant);
        let units = variant_units(variant);
        match counts.iter_mut().find(|(known, _)| *known == size) {
            Some((_, total)) => *total += units,
            None => counts.push((size, units)),
        }
    }
    if counts.is_empty() {
        return "none".to_string();
    }
    counts
        .iter()
        .map(|(size, units)| format!("{size}:{units}"))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Size label: option2, else option1, else "N/A".
fn variant_size(variant: &VariantState) -> String {
    variant
        .option2
        .clone()
        .or_else(|| variant.option1.clone())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Obtainable units: the tracked quantity when known, otherwise 1 when
/// purchasable and 0 when not, clamped non-negative.
fn variant_units(variant: &VariantState) -> i64 {
    let units = variant
        .inventory_quantity
        .unwrap_or(if variant.available { 1 } else { 0 });
    units.max(0)
}
