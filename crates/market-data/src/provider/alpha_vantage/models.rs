//! Alpha Vantage SYMBOL_SEARCH response models.
//!
//! GLOBAL_QUOTE payloads are handed to callers untouched and live in
//! [`crate::models::RawQuoteResponse`]. Search matches are converted here.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::SearchResult;

/// SYMBOL_SEARCH response body
#[derive(Debug, Deserialize)]
pub(super) struct SymbolSearchResponse {
    #[serde(rename = "bestMatches", default)]
    pub best_matches: Option<Vec<SearchMatch>>,
    #[serde(rename = "Error Message")]
    pub error_message: Option<String>,
    #[serde(rename = "Note")]
    pub note: Option<String>,
    #[serde(rename = "Information")]
    pub information: Option<String>,
}

/// One entry of `bestMatches`. Keys are numbered by the provider.
#[derive(Debug, Deserialize)]
pub(super) struct SearchMatch {
    #[serde(rename = "1. symbol", default)]
    pub symbol: String,
    #[serde(rename = "2. name", default)]
    pub name: String,
    #[serde(rename = "3. type", default)]
    pub asset_type: String,
    #[serde(rename = "4. region", default)]
    pub region: String,
    #[serde(rename = "5. marketOpen", default)]
    pub market_open: String,
    #[serde(rename = "6. marketClose", default)]
    pub market_close: String,
    #[serde(rename = "7. timezone", default)]
    pub timezone: String,
    #[serde(rename = "8. currency", default)]
    pub currency: String,
    #[serde(rename = "9. matchScore")]
    pub match_score: Option<String>,
}

impl From<SearchMatch> for SearchResult {
    fn from(m: SearchMatch) -> Self {
        SearchResult {
            symbol: m.symbol,
            name: m.name,
            asset_type: m.asset_type,
            region: m.region,
            market_open: m.market_open,
            market_close: m.market_close,
            timezone: m.timezone,
            currency: m.currency,
            match_score: m
                .match_score
                .as_deref()
                .and_then(|s| Decimal::from_str(s.trim()).ok()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_symbol_search_parsing() {
        let json = r#"{
            "bestMatches": [
                {
                    "1. symbol": "TSCO.LON",
                    "2. name": "Tesco PLC",
                    "3. type": "Equity",
                    "4. region": "United Kingdom",
                    "5. marketOpen": "08:00",
                    "6. marketClose": "16:30",
                    "7. timezone": "UTC+01",
                    "8. currency": "GBX",
                    "9. matchScore": "0.7273"
                }
            ]
        }"#;

        let response: SymbolSearchResponse = serde_json::from_str(json).unwrap();
        let matches = response.best_matches.unwrap();
        assert_eq!(matches.len(), 1);

        let result = SearchResult::from(matches.into_iter().next().unwrap());
        assert_eq!(result.symbol, "TSCO.LON");
        assert_eq!(result.name, "Tesco PLC");
        assert_eq!(result.asset_type, "Equity");
        assert_eq!(result.currency, "GBX");
        assert_eq!(result.match_score, Some(dec!(0.7273)));
    }

    #[test]
    fn test_symbol_search_missing_best_matches() {
        let response: SymbolSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.best_matches.is_none());
    }

    #[test]
    fn test_search_match_with_bad_score() {
        let json = r#"{"1. symbol": "X", "9. matchScore": "n/a"}"#;
        let m: SearchMatch = serde_json::from_str(json).unwrap();
        let result = SearchResult::from(m);
        assert_eq!(result.symbol, "X");
        assert_eq!(result.name, "");
        assert!(result.match_score.is_none());
    }
}
