// Record pipeline: raw feed rows in, normalized records plus a failure
// report out.
//
// Only a missing identifier makes a row unusable. Every other defect is
// repaired or defaulted and recorded as a warning, so a batch always
// accounts for each input row exactly once.

use catalog_model::{
    BatchResult, Field, IndexedWarning, NormalizedRecord, RawRecord, RowFailure, RowWarning,
};
use rayon::prelude::*;
use thiserror::Error;

use crate::category::map_category;
use crate::config::{ConfigError, PipelineConfig};
use crate::price::{parse_price, parse_sale_price};
use crate::score::score_with;
use crate::seo::synthesize_with;
use crate::stock::classify;
use crate::text::normalize_with;

/// Defects that exclude a row from the batch output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("missing or empty identifier")]
    MissingIdentifier,
}

/// A successfully normalized row and the warnings raised along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedRow {
    pub record: NormalizedRecord,
    pub warnings: Vec<RowWarning>,
}

/// Normalizes rows under one configuration.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Normalize one row.
    pub fn process_row(&self, raw: &RawRecord) -> Result<ProcessedRow, RowError> {
        let identifier = raw.identifier.trim();
        if identifier.is_empty() {
            return Err(RowError::MissingIdentifier);
        }

        let mut row = RowCleaner {
            config: &self.config,
            identifier,
            warnings: Vec::new(),
            rewritten: false,
        };

        let title = row.text(Field::Title, &raw.title);
        let author = row.text(Field::Author, &raw.author);
        let description = row.text(Field::Description, &raw.description);
        let category_text = row.text(Field::Category, raw.category.as_deref().unwrap_or(""));

        let seo = synthesize_with(&title, &author, &description, &self.config.seo);
        if seo.was_truncated() {
            row.warn(RowWarning::SeoTitleTruncated {
                dropped_author: seo.author_dropped,
            });
        }
        if seo.slug.is_empty() {
            row.warn(RowWarning::EmptySlug);
        }

        let price = parse_price(&raw.price);
        row.warn_opt(price.warning);
        let (sale_price, sale_warning) = parse_sale_price(raw.sale_price.as_deref(), price.amount);
        row.warn_opt(sale_warning);

        let stock = classify(&raw.stock);
        row.warn_opt(stock.warning);

        let image_url = raw
            .image_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string);

        let dirty = row.rewritten || row.warnings.iter().any(counts_as_dirty);

        let mut record = NormalizedRecord {
            identifier: identifier.to_string(),
            title,
            author,
            description,
            short_description: seo.short_description,
            seo_title: seo.seo_title,
            slug: seo.slug,
            price: price.amount,
            sale_price,
            stock_quantity: stock.quantity,
            stock_status: stock.status,
            category: map_category(&category_text),
            image_url,
            quality_score: 0,
            dirty,
        };
        record.quality_score = score_with(&record, &self.config.weights);

        Ok(ProcessedRow {
            record,
            warnings: row.warnings,
        })
    }

    /// Normalize a batch. Rows are independent; with `use_parallel` they
    /// are spread over the rayon pool and collected back in input order.
    pub fn process_batch(&self, rows: &[RawRecord]) -> BatchResult {
        let outcomes: Vec<Result<ProcessedRow, RowError>> = if self.config.use_parallel {
            rows.par_iter().map(|raw| self.process_row(raw)).collect()
        } else {
            rows.iter().map(|raw| self.process_row(raw)).collect()
        };

        let mut result = BatchResult::default();
        for (index, (raw, outcome)) in rows.iter().zip(outcomes).enumerate() {
            match outcome {
                Ok(ProcessedRow { record, warnings }) => {
                    result
                        .warnings
                        .extend(warnings.into_iter().map(|warning| IndexedWarning {
                            index,
                            identifier: record.identifier.clone(),
                            warning,
                        }));
                    result.successes.push(record);
                }
                Err(err) => {
                    tracing::warn!(row = index, "Skipping row: {err}");
                    let identifier = Some(raw.identifier.trim())
                        .filter(|id| !id.is_empty())
                        .map(str::to_string);
                    result.failures.push(RowFailure {
                        index,
                        identifier,
                        reason: err.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            rows = rows.len(),
            normalized = result.successes.len(),
            failures = result.failures.len(),
            warnings = result.warnings.len(),
            "Normalized batch"
        );
        result
    }
}

/// Normalize one row with the default configuration.
pub fn process_row(raw: &RawRecord) -> Result<ProcessedRow, RowError> {
    Pipeline::default().process_row(raw)
}

/// Normalize a batch with the default configuration.
pub fn process_batch(rows: &[RawRecord]) -> BatchResult {
    Pipeline::default().process_batch(rows)
}

/// SEO truncation and a missing slug describe the output, not a defect
/// in the source row.
fn counts_as_dirty(warning: &RowWarning) -> bool {
    !matches!(
        warning,
        RowWarning::SeoTitleTruncated { .. } | RowWarning::EmptySlug
    )
}

/// Per-row state while fields are cleaned.
struct RowCleaner<'a> {
    config: &'a PipelineConfig,
    identifier: &'a str,
    warnings: Vec<RowWarning>,
    /// Some text field changed beyond trimming.
    rewritten: bool,
}

impl RowCleaner<'_> {
    fn text(&mut self, field: Field, raw: &str) -> String {
        let clean = normalize_with(raw, &self.config.repair.candidates);
        if clean.encoding_repaired {
            tracing::debug!(id = self.identifier, field = %field, "Repaired double-encoded UTF-8");
            self.warn(RowWarning::EncodingRepaired { field });
        }
        if clean.markup_stripped {
            tracing::debug!(id = self.identifier, field = %field, "Stripped HTML markup");
            self.warn(RowWarning::MarkupStripped { field });
        }
        if clean.text != raw.trim() {
            self.rewritten = true;
        }
        clean.text
    }

    fn warn(&mut self, warning: RowWarning) {
        self.warnings.push(warning);
    }

    fn warn_opt(&mut self, warning: Option<RowWarning>) {
        self.warnings.extend(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_model::StockStatus;

    fn raw(identifier: &str) -> RawRecord {
        RawRecord {
            identifier: identifier.into(),
            title: "T\u{c3}\u{ad}tulo con UTF-8 roto".into(),
            author: "Autor Ejemplo".into(),
            description: "<p>Descripci\u{c3}\u{b3}n con HTML</p>".into(),
            price: "10,50".into(),
            stock: "5".into(),
            ..RawRecord::default()
        }
    }

    #[test]
    fn test_process_row_cleans_fields() {
        let row = process_row(&raw("9788400000001")).unwrap();
        let r = &row.record;
        assert_eq!(r.title, "Título con UTF-8 roto");
        assert_eq!(r.description, "Descripción con HTML");
        assert_eq!(r.seo_title, "Título con UTF-8 roto | Autor Ejemplo");
        assert_eq!(r.slug, "titulo-con-utf-8-roto-autor-ejemplo");
        assert_eq!(r.price.to_string(), "10.50");
        assert_eq!(r.stock_quantity, 5);
        assert_eq!(r.stock_status, StockStatus::InStock);
        assert_eq!(r.category, "Sin Categoría");
        assert!(r.dirty);
        assert!(row.warnings.contains(&RowWarning::EncodingRepaired { field: Field::Title }));
        assert!(row
            .warnings
            .contains(&RowWarning::MarkupStripped { field: Field::Description }));
    }

    #[test]
    fn test_identifier_trimmed() {
        let row = process_row(&raw("  9788400000001 ")).unwrap();
        assert_eq!(row.record.identifier, "9788400000001");
    }

    #[test]
    fn test_missing_identifier_is_fatal() {
        assert_eq!(process_row(&raw("")), Err(RowError::MissingIdentifier));
        assert_eq!(process_row(&raw("   ")), Err(RowError::MissingIdentifier));
    }

    #[test]
    fn test_clean_row_not_dirty() {
        let clean = RawRecord {
            identifier: "9788400000002".into(),
            title: "Rayuela".into(),
            author: "Julio Cortázar".into(),
            description: "Novela.".into(),
            price: "19.90".into(),
            stock: "3".into(),
            category: Some("FB".into()),
            ..RawRecord::default()
        };
        let row = process_row(&clean).unwrap();
        assert!(row.warnings.is_empty(), "{:?}", row.warnings);
        assert!(!row.record.dirty);
        assert_eq!(row.record.category, "Ficción Clásica");
    }

    #[test]
    fn test_unknown_stock_and_price_degrade() {
        let mut r = raw("9788400000003");
        r.stock = "n/d".into();
        r.price = String::new();
        let row = process_row(&r).unwrap();
        assert_eq!(row.record.stock_quantity, 0);
        assert_eq!(row.record.stock_status, StockStatus::OutOfStock);
        assert!(row.record.price.is_zero());
        assert!(row.warnings.iter().any(RowWarning::is_unknown_stock));
        assert!(row.warnings.contains(&RowWarning::MissingPrice));
    }

    #[test]
    fn test_empty_title_and_author_warn_empty_slug() {
        let r = RawRecord {
            identifier: "9788400000004".into(),
            ..RawRecord::default()
        };
        let row = process_row(&r).unwrap();
        assert!(row.record.slug.is_empty());
        assert!(row.warnings.contains(&RowWarning::EmptySlug));
        assert!(row.record.quality_score <= 100);
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let rows: Vec<RawRecord> = (0..50)
            .map(|i| if i % 7 == 3 { raw("") } else { raw(&format!("97884000{i:05}")) })
            .collect();

        let parallel = Pipeline::default().process_batch(&rows);
        let config = PipelineConfig {
            use_parallel: false,
            ..PipelineConfig::default()
        };
        let sequential = Pipeline::new(config).unwrap().process_batch(&rows);
        assert_eq!(parallel, sequential);
        assert_eq!(parallel.total(), rows.len());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = PipelineConfig::default();
        config.repair.candidates.clear();
        assert!(Pipeline::new(config).is_err());
    }
}
