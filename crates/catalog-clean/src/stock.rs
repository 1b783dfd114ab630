// Stock quantity parsing and availability classification.

use catalog_model::{RowWarning, StockStatus};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// What a raw stock column turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockReading {
    pub quantity: i64,
    pub status: StockStatus,
    /// Set when the quantity was defaulted because the input was unusable.
    pub warning: Option<RowWarning>,
}

impl StockReading {
    fn known(quantity: i64) -> Self {
        Self {
            quantity,
            status: StockStatus::from_quantity(quantity),
            warning: None,
        }
    }

    fn unknown(warning: RowWarning) -> Self {
        Self {
            quantity: 0,
            status: StockStatus::OutOfStock,
            warning: Some(warning),
        }
    }
}

/// Parse `raw` as an integer quantity and classify it.
///
/// Integral decimals like `"12.00"` are accepted as-is. Empty or
/// unparseable text is treated as zero and out of stock, with a warning so
/// callers can tell "unknown" from a genuine zero. Negative quantities are
/// kept and classify as out of stock.
pub fn classify(raw: &str) -> StockReading {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return StockReading::unknown(RowWarning::MissingStock);
    }
    match parse_quantity(trimmed) {
        Some(quantity) => StockReading::known(quantity),
        None => StockReading::unknown(RowWarning::UnparseableStock {
            raw: trimmed.to_string(),
        }),
    }
}

fn parse_quantity(text: &str) -> Option<i64> {
    let text = text.strip_prefix('+').unwrap_or(text);
    if let Ok(n) = text.parse::<i64>() {
        return Some(n);
    }
    let d: Decimal = text.parse().ok()?;
    if d.fract().is_zero() {
        d.to_i64()
    } else {
        None
    }
}
