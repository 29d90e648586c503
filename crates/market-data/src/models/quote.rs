use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Canonical stock quote returned to API callers.
///
/// Base fields default to zero when the provider omits them. The extended
/// fields are not supplied by the quote endpoint and serialize as `null`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,

    /// Display name. The quote endpoint carries no company name, so this
    /// is the symbol.
    pub name: String,

    pub price: Decimal,
    pub change: Decimal,

    /// Percentage without the `%` sign, e.g. `1.2345` for `"1.2345%"`.
    pub change_percent: Decimal,

    pub volume: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub open: Decimal,
    pub previous_close: Decimal,

    // Extended fields
    pub market_cap: Option<Decimal>,
    pub pe_ratio: Option<Decimal>,
    pub eps: Option<Decimal>,
    pub dividend_yield: Option<Decimal>,
    pub week52_high: Option<Decimal>,
    pub week52_low: Option<Decimal>,
    pub avg_volume: Option<Decimal>,
    pub beta: Option<Decimal>,

    /// Latest trading day (`YYYY-MM-DD`) or the time the quote was built.
    pub last_updated: String,
}

impl Quote {
    /// A quote with every numeric field zeroed.
    pub fn empty(symbol: impl Into<String>, last_updated: impl Into<String>) -> Self {
        let symbol = symbol.into();
        Self {
            name: symbol.clone(),
            symbol,
            price: Decimal::ZERO,
            change: Decimal::ZERO,
            change_percent: Decimal::ZERO,
            volume: Decimal::ZERO,
            high: Decimal::ZERO,
            low: Decimal::ZERO,
            open: Decimal::ZERO,
            previous_close: Decimal::ZERO,
            market_cap: None,
            pe_ratio: None,
            eps: None,
            dividend_yield: None,
            week52_high: None,
            week52_low: None,
            avg_volume: None,
            beta: None,
            last_updated: last_updated.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_quote_serializes_camel_case_with_null_extended_fields() {
        let mut quote = Quote::empty("AAPL", "2024-01-15");
        quote.price = dec!(185.5);
        quote.change_percent = dec!(-0.25);

        let value = serde_json::to_value(&quote).unwrap();
        assert_eq!(value["symbol"], json!("AAPL"));
        assert_eq!(value["name"], json!("AAPL"));
        assert_eq!(value["price"], json!(185.5));
        assert_eq!(value["changePercent"], json!(-0.25));
        assert_eq!(value["previousClose"], json!(0.0));
        assert_eq!(value["lastUpdated"], json!("2024-01-15"));

        for field in [
            "marketCap",
            "peRatio",
            "eps",
            "dividendYield",
            "week52High",
            "week52Low",
            "avgVolume",
            "beta",
        ] {
            assert!(value[field].is_null(), "{} should be null", field);
            assert!(value.as_object().unwrap().contains_key(field));
        }
    }
}
