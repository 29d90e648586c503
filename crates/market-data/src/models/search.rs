//! Search result models for symbol lookup.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A provider match for a keyword search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Symbol/ticker (e.g., "AAPL", "TSCO.LON")
    pub symbol: String,

    /// Company or fund name (e.g., "Apple Inc")
    pub name: String,

    /// Instrument type (e.g., "Equity", "ETF")
    #[serde(rename = "type")]
    pub asset_type: String,

    pub region: String,
    pub market_open: String,
    pub market_close: String,
    pub timezone: String,
    pub currency: String,

    /// Relevance score from the provider, 0 to 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<Decimal>,
}

/// Summary record returned by stock search. Prices are not part of a search
/// response and are always zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub symbol: String,
    pub name: String,
    pub price: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
}

impl From<SearchResult> for Stock {
    fn from(result: SearchResult) -> Self {
        Self {
            symbol: result.symbol,
            name: result.name,
            price: Decimal::ZERO,
            change: Decimal::ZERO,
            change_percent: Decimal::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn sample() -> SearchResult {
        SearchResult {
            symbol: "TSCO.LON".to_string(),
            name: "Tesco PLC".to_string(),
            asset_type: "Equity".to_string(),
            region: "United Kingdom".to_string(),
            market_open: "08:00".to_string(),
            market_close: "16:30".to_string(),
            timezone: "UTC+01".to_string(),
            currency: "GBX".to_string(),
            match_score: Some(dec!(0.7273)),
        }
    }

    #[test]
    fn test_search_result_serializes_type_field() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["type"], json!("Equity"));
        assert_eq!(value["marketOpen"], json!("08:00"));
        assert!(value.get("assetType").is_none());
    }

    #[test]
    fn test_stock_from_search_result_zeroes_prices() {
        let stock = Stock::from(sample());
        assert_eq!(stock.symbol, "TSCO.LON");
        assert_eq!(stock.name, "Tesco PLC");
        assert_eq!(stock.price, Decimal::ZERO);
        assert_eq!(stock.change, Decimal::ZERO);
        assert_eq!(stock.change_percent, Decimal::ZERO);
    }
}
