// Completeness/SEO quality score.
//
// Each signal is checked independently against the normalized record and
// contributes its configured weight when it holds. The total is capped at
// 100, so custom weights that overshoot still yield a valid score.

use catalog_model::NormalizedRecord;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::ScoreWeights;

/// One independently checkable quality signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    TitlePresent,
    /// Title length within the SEO-friendly range.
    TitleLength,
    /// Description at least the configured minimum length.
    Description,
    Author,
    /// Price is positive.
    Price,
    /// Slug non-empty without stray hyphens.
    Slug,
    InStock,
}

impl Signal {
    pub const ALL: [Signal; 7] = [
        Signal::TitlePresent,
        Signal::TitleLength,
        Signal::Description,
        Signal::Author,
        Signal::Price,
        Signal::Slug,
        Signal::InStock,
    ];

    pub fn weight(self, weights: &ScoreWeights) -> u8 {
        match self {
            Signal::TitlePresent => weights.title_present,
            Signal::TitleLength => weights.title_length,
            Signal::Description => weights.description,
            Signal::Author => weights.author,
            Signal::Price => weights.price,
            Signal::Slug => weights.slug,
            Signal::InStock => weights.in_stock,
        }
    }

    /// Whether this signal holds for `record`.
    pub fn holds(self, record: &NormalizedRecord, weights: &ScoreWeights) -> bool {
        match self {
            Signal::TitlePresent => !record.title.is_empty(),
            Signal::TitleLength => {
                let len = record.title.chars().count();
                (weights.title_min_chars..=weights.title_max_chars).contains(&len)
            }
            Signal::Description => {
                !record.description.is_empty()
                    && record.description.chars().count() >= weights.description_min_chars
            }
            Signal::Author => !record.author.is_empty(),
            Signal::Price => record.price > Decimal::ZERO,
            Signal::Slug => is_clean_slug(&record.slug),
            Signal::InStock => record.is_in_stock(),
        }
    }
}

fn is_clean_slug(slug: &str) -> bool {
    !slug.is_empty() && !slug.starts_with('-') && !slug.ends_with('-') && !slug.contains("--")
}

/// Score with the default weights.
pub fn score(record: &NormalizedRecord) -> u8 {
    score_with(record, &ScoreWeights::default())
}

pub fn score_with(record: &NormalizedRecord, weights: &ScoreWeights) -> u8 {
    let total: u32 = signals(record, weights)
        .into_iter()
        .map(|s| u32::from(s.weight(weights)))
        .sum();
    u8::try_from(total.min(100)).unwrap_or(100)
}

/// The signals that hold for `record`, in declaration order.
pub fn signals(record: &NormalizedRecord, weights: &ScoreWeights) -> Vec<Signal> {
    Signal::ALL
        .into_iter()
        .filter(|s| s.holds(record, weights))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_model::StockStatus;

    fn empty_record() -> NormalizedRecord {
        NormalizedRecord {
            identifier: "9788400000001".into(),
            title: String::new(),
            author: String::new(),
            description: String::new(),
            short_description: String::new(),
            seo_title: String::new(),
            slug: String::new(),
            price: Decimal::ZERO,
            sale_price: None,
            stock_quantity: 0,
            stock_status: StockStatus::OutOfStock,
            category: String::new(),
            image_url: None,
            quality_score: 0,
            dirty: false,
        }
    }

    fn complete_record() -> NormalizedRecord {
        NormalizedRecord {
            title: "Cien años de soledad, edición conmemorativa".into(),
            author: "Gabriel García Márquez".into(),
            description: "x ".repeat(80),
            slug: "cien-anos-de-soledad-edicion-conmemorativa".into(),
            price: Decimal::new(2195, 2),
            stock_quantity: 4,
            stock_status: StockStatus::InStock,
            ..empty_record()
        }
    }

    #[test]
    fn test_empty_record_scores_zero() {
        assert_eq!(score(&empty_record()), 0);
        assert!(signals(&empty_record(), &ScoreWeights::default()).is_empty());
    }

    #[test]
    fn test_complete_record_scores_100() {
        assert_eq!(score(&complete_record()), 100);
    }

    #[test]
    fn test_each_signal_contributes_its_weight() {
        let weights = ScoreWeights::default();
        let full = complete_record();

        let mut no_author = full.clone();
        no_author.author.clear();
        assert_eq!(score(&no_author), 100 - weights.author);

        let mut out_of_stock = full.clone();
        out_of_stock.stock_status = StockStatus::OutOfStock;
        assert_eq!(score(&out_of_stock), 100 - weights.in_stock);

        let mut free = full.clone();
        free.price = Decimal::ZERO;
        assert_eq!(score(&free), 100 - weights.price);

        let mut short_title = full;
        short_title.title = "Corto".into();
        assert_eq!(score(&short_title), 100 - weights.title_length);
    }

    #[test]
    fn test_slug_artifacts_lose_weight() {
        for slug in ["-abc", "abc-", "a--b", ""] {
            let mut r = complete_record();
            r.slug = slug.into();
            assert_eq!(score(&r), 100 - ScoreWeights::default().slug, "{slug:?}");
        }
    }

    #[test]
    fn test_backorder_is_not_in_stock() {
        let mut r = complete_record();
        r.stock_status = StockStatus::OnBackorder;
        assert!(!signals(&r, &ScoreWeights::default()).contains(&Signal::InStock));
    }

    #[test]
    fn test_score_capped_with_oversized_weights() {
        let weights = ScoreWeights {
            title_present: 90,
            author: 90,
            ..ScoreWeights::default()
        };
        assert_eq!(score_with(&complete_record(), &weights), 100);
    }

    #[test]
    fn test_score_is_pure() {
        let r = complete_record();
        assert_eq!(score(&r), score(&r));
    }
}
