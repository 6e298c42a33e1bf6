// src/utils/money.rs

//! Monetary value parsing.
//!
//! Sources render prices as strings, integers, or decimals. Everything
//! converges on a non-negative `f64` rounded to two fraction digits.

use serde_json::Value;

/// Parse a price in whatever shape the source used.
///
/// Integers above 1000 are read as minor currency units (cents) and divided
/// by 100. That heuristic cannot distinguish an item genuinely priced above
/// 1000 whole units through the integer path; the ambiguity is inherent to
/// the source data and deliberately kept.
///
/// Unparseable input yields 0.0 rather than an error.
pub fn parse_price(raw: &Value) -> f64 {
    let parsed = match raw {
        Value::Number(number) => match number.as_i64() {
            Some(int) if int > 1000 => int as f64 / 100.0,
            Some(int) => int as f64,
            None => number.as_f64().unwrap_or(0.0),
        },
        Value::String(text) => parse_price_text(text),
        _ => 0.0,
    };
    round2(parsed).max(0.0)
}

/// Round to two fraction digits.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn parse_price_text(text: &str) -> f64 {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    cleaned.parse::<f64>().unwrap_or(0.0)
}
