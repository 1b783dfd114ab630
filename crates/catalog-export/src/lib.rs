// Projections of normalized records into destination schemas.
//
// Each destination is a pure, total mapping from `NormalizedRecord`; adding
// one means a new module and a new `Destination` variant, nothing upstream.

use std::fmt;
use std::str::FromStr;

use catalog_model::NormalizedRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub mod bulk_import;
pub mod storefront;

pub use bulk_import::{to_bulk_import_schema, BulkImportRow};
pub use storefront::{to_storefront_schema, StorefrontRow};

/// Where normalized records are headed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Destination {
    Storefront,
    BulkImport,
}

impl Destination {
    pub const ALL: [Destination; 2] = [Destination::Storefront, Destination::BulkImport];

    pub fn name(self) -> &'static str {
        match self {
            Destination::Storefront => "storefront",
            Destination::BulkImport => "bulk-import",
        }
    }

    /// Column headers in output order.
    pub fn headers(self) -> &'static [&'static str] {
        match self {
            Destination::Storefront => &storefront::HEADERS,
            Destination::BulkImport => &bulk_import::HEADERS,
        }
    }

    pub fn map(self, record: &NormalizedRecord) -> ExportRow {
        match self {
            Destination::Storefront => ExportRow::Storefront(to_storefront_schema(record)),
            Destination::BulkImport => ExportRow::BulkImport(to_bulk_import_schema(record)),
        }
    }

    pub fn map_all(self, records: &[NormalizedRecord]) -> Vec<ExportRow> {
        let rows: Vec<ExportRow> = records.iter().map(|r| self.map(r)).collect();
        tracing::debug!(destination = %self, rows = rows.len(), "Mapped records");
        rows
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Destination {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "storefront" => Ok(Destination::Storefront),
            "bulk-import" => Ok(Destination::BulkImport),
            other => Err(format!("unknown destination: {other}")),
        }
    }
}

/// A destination-shaped row. Serializes as a flat object keyed by the
/// destination's own column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExportRow {
    Storefront(StorefrontRow),
    BulkImport(BulkImportRow),
}

impl ExportRow {
    pub fn destination(&self) -> Destination {
        match self {
            ExportRow::Storefront(_) => Destination::Storefront,
            ExportRow::BulkImport(_) => Destination::BulkImport,
        }
    }

    /// Ordered (column, value) pairs.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            ExportRow::Storefront(row) => row.fields(),
            ExportRow::BulkImport(row) => row.fields(),
        }
    }
}

/// Last six characters of the identifier (the whole thing if shorter).
fn sku(identifier: &str) -> String {
    let chars: Vec<char> = identifier.chars().collect();
    let start = chars.len().saturating_sub(6);
    chars[start..].iter().collect()
}

/// The record's slug, or one derived from the identifier when the record
/// had no title or author to build it from.
fn export_slug(record: &NormalizedRecord) -> String {
    if !record.slug.is_empty() {
        return record.slug.clone();
    }
    let id: String = record
        .identifier
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if id.is_empty() {
        "isbn".to_string()
    } else {
        format!("isbn-{id}")
    }
}

fn decimal_field(value: Option<Decimal>) -> String {
    value.map(|d| d.to_string()).unwrap_or_default()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use catalog_model::StockStatus;

    pub(crate) fn sample_record() -> NormalizedRecord {
        NormalizedRecord {
            identifier: "9788400000001".into(),
            title: "Título con UTF-8".into(),
            author: "Autor Ejemplo".into(),
            description: "Descripción con HTML".into(),
            short_description: "Descripción con HTML".into(),
            seo_title: "Título con UTF-8 | Autor Ejemplo".into(),
            slug: "titulo-con-utf-8-autor-ejemplo".into(),
            price: Decimal::new(1050, 2),
            sale_price: None,
            stock_quantity: 5,
            stock_status: StockStatus::InStock,
            category: "Ficción Clásica".into(),
            image_url: None,
            quality_score: 70,
            dirty: true,
        }
    }

    #[test]
    fn test_sku_last_six() {
        assert_eq!(sku("9788400123456"), "123456");
        assert_eq!(sku("1234"), "1234");
    }

    #[test]
    fn test_slug_fallback_uses_identifier() {
        let mut record = sample_record();
        record.slug.clear();
        assert_eq!(export_slug(&record), "isbn-9788400000001");
        for destination in Destination::ALL {
            let fields = destination.map(&record).fields();
            assert!(fields.iter().any(|(_, v)| v == "isbn-9788400000001"));
        }
    }

    #[test]
    fn test_destination_parse_and_headers() {
        assert_eq!("bulk_import".parse::<Destination>().unwrap(), Destination::BulkImport);
        assert_eq!("Storefront".parse::<Destination>().unwrap(), Destination::Storefront);
        assert!("csv".parse::<Destination>().is_err());
        assert_eq!(Destination::Storefront.headers().len(), 18);
        assert_eq!(Destination::BulkImport.headers().len(), 26);
    }

    #[test]
    fn test_map_selects_variant() {
        let record = sample_record();
        for destination in Destination::ALL {
            let row = destination.map(&record);
            assert_eq!(row.destination(), destination);
            let names: Vec<&str> = row.fields().iter().map(|(n, _)| *n).collect();
            assert_eq!(names, destination.headers());
        }
    }

    #[test]
    fn test_sale_price_emitted() {
        let mut record = sample_record();
        record.sale_price = Some(Decimal::new(899, 2));
        let fields = Destination::BulkImport.map(&record).fields();
        assert!(fields.contains(&("_sale_price", "8.99".to_string())));
    }
}
