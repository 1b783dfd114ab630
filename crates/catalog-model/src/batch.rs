use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::record::{NormalizedRecord, RowWarning, StockStatus};

/// A row that could not produce a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFailure {
    /// Zero-based position of the row in the input batch.
    pub index: usize,
    /// The raw identifier, when the row carried anything at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub reason: String,
}

/// A warning raised on a row that still produced a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedWarning {
    pub index: usize,
    pub identifier: String,
    pub warning: RowWarning,
}

/// Outcome of normalizing a batch of rows.
///
/// `successes` keeps the relative input order; every input row is accounted
/// for exactly once across `successes` and `failures`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub successes: Vec<NormalizedRecord>,
    pub failures: Vec<RowFailure>,
    #[serde(default)]
    pub warnings: Vec<IndexedWarning>,
}

/// Aggregate figures over a batch, for dashboards and import reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Rows in the input (successes + failures).
    pub total_rows: usize,
    pub normalized: usize,
    pub failures: usize,
    pub warnings: usize,
    pub in_stock: usize,
    pub out_of_stock: usize,
    pub on_backorder: usize,
    pub in_stock_percentage: f64,
    pub dirty: usize,
    pub clean: usize,
    pub mean_quality_score: f64,
    /// Price stats over records with a positive price only. `total_value`
    /// saturates at `Decimal::MAX` when the sum is out of range.
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub mean_price: Decimal,
    pub total_value: Decimal,
    pub categories: BTreeMap<String, usize>,
}

impl BatchResult {
    /// Number of input rows this result accounts for.
    pub fn total(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    /// Warnings raised for the row at `index`.
    pub fn warnings_for(&self, index: usize) -> impl Iterator<Item = &RowWarning> {
        self.warnings
            .iter()
            .filter(move |w| w.index == index)
            .map(|w| &w.warning)
    }

    pub fn summary(&self) -> BatchSummary {
        let normalized = self.successes.len();
        let count_status = |status: StockStatus| {
            self.successes
                .iter()
                .filter(|r| r.stock_status == status)
                .count()
        };
        let in_stock = count_status(StockStatus::InStock);
        let dirty = self.successes.iter().filter(|r| r.dirty).count();

        let prices: Vec<Decimal> = self
            .successes
            .iter()
            .map(|r| r.price)
            .filter(|p| *p > Decimal::ZERO)
            .collect();
        let (total_value, mean_price) = price_totals(&prices);

        let mut categories = BTreeMap::new();
        for record in &self.successes {
            *categories.entry(record.category.clone()).or_insert(0) += 1;
        }

        let score_sum: u64 = self.successes.iter().map(|r| u64::from(r.quality_score)).sum();

        BatchSummary {
            total_rows: self.total(),
            normalized,
            failures: self.failures.len(),
            warnings: self.warnings.len(),
            in_stock,
            out_of_stock: count_status(StockStatus::OutOfStock),
            on_backorder: count_status(StockStatus::OnBackorder),
            in_stock_percentage: ratio(in_stock as f64, normalized as f64) * 100.0,
            dirty,
            clean: normalized - dirty,
            mean_quality_score: ratio(score_sum as f64, normalized as f64),
            min_price: prices.iter().copied().min().unwrap_or(Decimal::ZERO),
            max_price: prices.iter().copied().max().unwrap_or(Decimal::ZERO),
            mean_price,
            total_value,
            categories,
        }
        .rounded()
    }
}

impl BatchSummary {
    fn rounded(mut self) -> Self {
        self.in_stock_percentage = (self.in_stock_percentage * 10.0).round() / 10.0;
        self.mean_quality_score = (self.mean_quality_score * 10.0).round() / 10.0;
        self
    }
}

/// Sum and mean (to 2 dp) of `prices`, without overflowing on large batches.
fn price_totals(prices: &[Decimal]) -> (Decimal, Decimal) {
    if prices.is_empty() {
        return (Decimal::ZERO, Decimal::ZERO);
    }
    let count = Decimal::from(prices.len());
    let sum = prices
        .iter()
        .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(*p));

    let mean = match sum {
        Some(total) => total.checked_div(count),
        // Out of range as a sum, but each price's share of the mean is not.
        None => prices
            .iter()
            .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(p.checked_div(count)?)),
    };

    (
        sum.unwrap_or(Decimal::MAX),
        mean.unwrap_or(Decimal::MAX).round_dp(2),
    )
}

fn ratio(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole
    }
}
