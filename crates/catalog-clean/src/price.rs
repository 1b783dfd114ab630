// Price parsing.
//
// Feeds mix European and US conventions ("10,50", "1.234,56", "1,234.56")
// and sometimes carry a currency symbol. Amounts come out as two-place
// decimals; anything unusable becomes zero with a warning.

use catalog_model::RowWarning;
use rust_decimal::{Decimal, RoundingStrategy};

/// What a raw price column turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceReading {
    /// Never negative, always two decimal places.
    pub amount: Decimal,
    pub warning: Option<RowWarning>,
}

const CURRENCY_MARKERS: &[&str] = &["€", "$", "£", "EUR", "USD", "GBP"];

/// Parse a price. Empty, unparseable and negative input all yield 0.00.
pub fn parse_price(raw: &str) -> PriceReading {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return PriceReading {
            amount: money(Decimal::ZERO),
            warning: Some(RowWarning::MissingPrice),
        };
    }

    let Some(value) = parse_amount(trimmed) else {
        return PriceReading {
            amount: money(Decimal::ZERO),
            warning: Some(RowWarning::UnparseablePrice {
                raw: trimmed.to_string(),
            }),
        };
    };

    if value.is_sign_negative() && !value.is_zero() {
        return PriceReading {
            amount: money(Decimal::ZERO),
            warning: Some(RowWarning::NegativePrice {
                raw: trimmed.to_string(),
            }),
        };
    }

    PriceReading {
        amount: money(value),
        warning: None,
    }
}

/// Parse an optional sale price against the regular price.
///
/// A sale price is only kept when it is positive and strictly below the
/// regular price; otherwise it is dropped with a warning.
pub fn parse_sale_price(raw: Option<&str>, price: Decimal) -> (Option<Decimal>, Option<RowWarning>) {
    let Some(trimmed) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return (None, None);
    };
    match parse_amount(trimmed).map(money) {
        Some(sale) if sale > Decimal::ZERO && sale < price => (Some(sale), None),
        _ => (
            None,
            Some(RowWarning::IgnoredSalePrice {
                raw: trimmed.to_string(),
            }),
        ),
    }
}

/// Parse a decimal amount in either separator convention.
///
/// With both '.' and ',' present, whichever comes last is the decimal
/// separator. A lone ',' is decimal; a repeated separator is grouping.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let mut s = text.to_string();
    for marker in CURRENCY_MARKERS {
        s = s.replace(marker, "");
    }
    let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if s.is_empty() {
        return None;
    }

    let dots = s.matches('.').count();
    let commas = s.matches(',').count();
    let canonical = match (dots, commas) {
        (0, 0) => s,
        (_, 0) if dots > 1 => s.replace('.', ""),
        (_, 0) => s,
        (0, 1) => s.replace(',', "."),
        (0, _) => s.replace(',', ""),
        _ => {
            let last_dot = s.rfind('.');
            let last_comma = s.rfind(',');
            if last_comma > last_dot {
                s.replace('.', "").replace(',', ".")
            } else {
                s.replace(',', "")
            }
        }
    };

    canonical.parse::<Decimal>().ok()
}

/// Round half away from zero to cents and fix the scale at two places.
fn money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(raw: &str) -> String {
        parse_price(raw).amount.to_string()
    }

    #[test]
    fn test_separator_conventions() {
        assert_eq!(amount("10,50"), "10.50");
        assert_eq!(amount("10.5"), "10.50");
        assert_eq!(amount("1.234,56"), "1234.56");
        assert_eq!(amount("1,234.56"), "1234.56");
        assert_eq!(amount("1.234.567"), "1234567.00");
        assert_eq!(amount("1,234,567"), "1234567.00");
        assert_eq!(amount("15"), "15.00");
    }

    #[test]
    fn test_currency_markers() {
        assert_eq!(amount("€12.00"), "12.00");
        assert_eq!(amount("12,00 €"), "12.00");
        assert_eq!(amount("EUR 9,95"), "9.95");
        assert_eq!(amount("$ 3.5"), "3.50");
    }

    #[test]
    fn test_rounds_half_up() {
        assert_eq!(amount("10.555"), "10.56");
        assert_eq!(amount("2.345"), "2.35");
        assert_eq!(amount("2.344"), "2.34");
    }

    #[test]
    fn test_missing_price() {
        let r = parse_price("   ");
        assert_eq!(r.amount.to_string(), "0.00");
        assert_eq!(r.warning, Some(RowWarning::MissingPrice));
    }

    #[test]
    fn test_unparseable_price() {
        let r = parse_price("consultar");
        assert!(r.amount.is_zero());
        assert!(matches!(r.warning, Some(RowWarning::UnparseablePrice { .. })));
        assert!(parse_price("€").warning.is_some());
    }

    #[test]
    fn test_negative_price_clamped() {
        let r = parse_price("-5,00");
        assert!(r.amount.is_zero());
        assert!(matches!(r.warning, Some(RowWarning::NegativePrice { .. })));
    }

    #[test]
    fn test_zero_price_has_no_warning() {
        let r = parse_price("0");
        assert!(r.amount.is_zero());
        assert!(r.warning.is_none());
    }

    #[test]
    fn test_sale_price_kept_below_price() {
        let price = parse_price("20,00").amount;
        let (sale, warning) = parse_sale_price(Some("15,50"), price);
        assert_eq!(sale.map(|d| d.to_string()), Some("15.50".to_string()));
        assert!(warning.is_none());
    }

    #[test]
    fn test_sale_price_ignored() {
        let price = parse_price("20,00").amount;
        for raw in ["25", "20", "0", "-1", "gratis"] {
            let (sale, warning) = parse_sale_price(Some(raw), price);
            assert!(sale.is_none(), "{raw}");
            assert!(matches!(warning, Some(RowWarning::IgnoredSalePrice { .. })));
        }
        assert_eq!(parse_sale_price(None, price), (None, None));
        assert_eq!(parse_sale_price(Some("  "), price), (None, None));
    }
}
