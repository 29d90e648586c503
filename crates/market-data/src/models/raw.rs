//! Quote payload as returned by the provider's GLOBAL_QUOTE function.

use serde::{Deserialize, Serialize};

/// GLOBAL_QUOTE response body.
///
/// `global_quote` is `None` when the section is absent and
/// `Some(GlobalQuote::default())` when it is present but `{}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawQuoteResponse {
    #[serde(
        rename = "Global Quote",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub global_quote: Option<GlobalQuote>,

    #[serde(
        rename = "Error Message",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub error_message: Option<String>,

    #[serde(rename = "Note", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    #[serde(
        rename = "Information",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub information: Option<String>,
}

/// The `"Global Quote"` section. Every value arrives as a string.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalQuote {
    #[serde(rename = "01. symbol", default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(rename = "02. open", default, skip_serializing_if = "Option::is_none")]
    pub open: Option<String>,
    #[serde(rename = "03. high", default, skip_serializing_if = "Option::is_none")]
    pub high: Option<String>,
    #[serde(rename = "04. low", default, skip_serializing_if = "Option::is_none")]
    pub low: Option<String>,
    #[serde(rename = "05. price", default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(rename = "06. volume", default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(
        rename = "07. latest trading day",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub latest_trading_day: Option<String>,
    #[serde(
        rename = "08. previous close",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub previous_close: Option<String>,
    #[serde(rename = "09. change", default, skip_serializing_if = "Option::is_none")]
    pub change: Option<String>,
    #[serde(
        rename = "10. change percent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub change_percent: Option<String>,
}

impl GlobalQuote {
    /// True when the section carried no fields at all (`{}`).
    pub fn is_empty(&self) -> bool {
        *self == GlobalQuote::default()
    }
}
