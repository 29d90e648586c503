//! Ticker symbol validation.
//!
//! A ticker is 1 to 5 ASCII letters. Input is trimmed and upper-cased before
//! use, so `" aapl "` and `"AAPL"` name the same symbol. Every entry point in
//! this module goes through [`TickerSymbol::parse`], which keeps the message
//! producing validator and the boolean check in agreement.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Longest accepted ticker, in characters.
pub const MAX_TICKER_LEN: usize = 5;

/// Reasons a raw string is not a usable ticker.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerError {
    /// Input was empty or whitespace only.
    #[error("Ticker symbol is required")]
    Empty,

    /// More than [`MAX_TICKER_LEN`] characters after trimming.
    #[error("Ticker symbol must be 5 characters or less")]
    TooLong,

    /// Something other than an ASCII letter is present.
    #[error("Ticker symbol must contain only letters")]
    InvalidCharacters,
}

/// A validated, normalized ticker symbol such as `AAPL`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TickerSymbol(String);

impl TickerSymbol {
    /// Parse and normalize a raw ticker.
    ///
    /// Checks run on the trimmed input in this order: emptiness, length,
    /// character set. Lowercase letters are accepted and upper-cased.
    pub fn parse(raw: &str) -> Result<Self, TickerError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(TickerError::Empty);
        }

        if trimmed.chars().count() > MAX_TICKER_LEN {
            return Err(TickerError::TooLong);
        }

        if !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(TickerError::InvalidCharacters);
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TickerSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TickerSymbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for TickerSymbol {
    type Err = TickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<TickerSymbol> for String {
    fn from(symbol: TickerSymbol) -> Self {
        symbol.0
    }
}

/// Trim and upper-case a raw ticker without validating it.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Validate a raw ticker, returning the normalized symbol or the first failed rule.
pub fn validate(raw: &str) -> Result<TickerSymbol, TickerError> {
    TickerSymbol::parse(raw)
}

/// Returns `true` when `raw` normalizes to 1-5 uppercase ASCII letters.
pub fn is_valid_ticker(raw: &str) -> bool {
    validate(raw).is_ok()
}
