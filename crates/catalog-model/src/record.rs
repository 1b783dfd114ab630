use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One row from a distribution feed, exactly as the ingestion layer parsed it.
///
/// Every field is untrusted text: it may carry double-encoded UTF-8, HTML
/// markup, stray whitespace or values that don't parse at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Catalog number, typically a 13-digit ISBN/EAN.
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    /// Long description, usually HTML.
    #[serde(default)]
    pub description: String,
    /// Decimal-like price text (e.g., "10,50", "€12.00").
    #[serde(default)]
    pub price: String,
    /// Integer-like stock quantity text.
    #[serde(default)]
    pub stock: String,
    /// Thema subject code or free-text category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<String>,
    /// Cover image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A cleaned, storefront-ready catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub identifier: String,
    pub title: String,
    pub author: String,
    /// Plain-text description with markup removed.
    pub description: String,
    /// Description cut at a word boundary for meta/excerpt use.
    pub short_description: String,
    /// "Title | Author", bounded in length.
    pub seo_title: String,
    /// URL-safe slug derived only from `seo_title`.
    pub slug: String,
    /// Never negative; unparseable input falls back to zero.
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Decimal>,
    pub stock_quantity: i64,
    pub stock_status: StockStatus,
    /// Storefront category label.
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Completeness/SEO score, 0 to 100.
    pub quality_score: u8,
    /// True when the source row needed any repair.
    pub dirty: bool,
}

impl NormalizedRecord {
    /// Whether the record can be sold right now.
    pub fn is_in_stock(&self) -> bool {
        self.stock_status == StockStatus::InStock
    }
}

/// Tri-state availability of a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    OutOfStock,
    /// Not produced by quantity classification; some destinations report it.
    OnBackorder,
}

impl StockStatus {
    /// Total mapping from a known quantity: positive is in stock, anything
    /// else is out of stock.
    pub fn from_quantity(quantity: i64) -> Self {
        if quantity > 0 {
            StockStatus::InStock
        } else {
            StockStatus::OutOfStock
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "in_stock",
            StockStatus::OutOfStock => "out_of_stock",
            StockStatus::OnBackorder => "on_backorder",
        }
    }

    /// Whether an order can be placed (in stock or backorderable).
    pub fn is_orderable(&self) -> bool {
        matches!(self, StockStatus::InStock | StockStatus::OnBackorder)
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The text fields a warning can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Author,
    Description,
    Category,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Title => "title",
            Field::Author => "author",
            Field::Description => "description",
            Field::Category => "category",
        };
        f.write_str(name)
    }
}

/// A recoverable defect found while normalizing a row.
///
/// Warnings never block a row: the field has already been repaired or
/// defaulted by the time one is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowWarning {
    #[error("{field}: repaired double-encoded UTF-8")]
    EncodingRepaired { field: Field },

    #[error("{field}: removed HTML markup")]
    MarkupStripped { field: Field },

    #[error("stock is empty, treated as 0")]
    MissingStock,

    #[error("stock '{raw}' is not an integer, treated as 0")]
    UnparseableStock { raw: String },

    #[error("price is empty, treated as 0")]
    MissingPrice,

    #[error("price '{raw}' is not a number, treated as 0")]
    UnparseablePrice { raw: String },

    #[error("price '{raw}' is negative, treated as 0")]
    NegativePrice { raw: String },

    #[error("sale price '{raw}' ignored")]
    IgnoredSalePrice { raw: String },

    #[error("SEO title truncated (author dropped: {dropped_author})")]
    SeoTitleTruncated { dropped_author: bool },

    #[error("title and author are empty, no slug generated")]
    EmptySlug,
}

impl RowWarning {
    /// Stock could not be read, as opposed to a genuine zero.
    pub fn is_unknown_stock(&self) -> bool {
        matches!(
            self,
            RowWarning::MissingStock | RowWarning::UnparseableStock { .. }
        )
    }
}
