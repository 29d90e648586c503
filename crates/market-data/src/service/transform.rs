//! Raw GLOBAL_QUOTE payload to canonical [`Quote`].

use std::str::FromStr;

use chrono::{SecondsFormat, Utc};
use log::debug;
use rust_decimal::Decimal;

use crate::errors::ApiError;
use crate::models::{Quote, RawQuoteResponse};

/// Build a [`Quote`] from a provider payload.
///
/// A missing `"Global Quote"` section is an error. An empty one is not: it
/// yields a zeroed quote named after `symbol`.
pub(crate) fn to_quote(response: RawQuoteResponse, symbol: &str) -> Result<Quote, ApiError> {
    let raw = response.global_quote.ok_or_else(|| {
        ApiError::invalid_symbol(format!("No quote data found for symbol: {}", symbol))
    })?;

    let resolved_symbol = non_empty(raw.symbol).unwrap_or_else(|| symbol.to_string());
    let last_updated = non_empty(raw.latest_trading_day).unwrap_or_else(now_rfc3339);

    let mut quote = Quote::empty(resolved_symbol, last_updated);
    quote.price = parse_decimal(raw.price.as_deref());
    quote.change = parse_decimal(raw.change.as_deref());
    quote.change_percent = parse_decimal(
        raw.change_percent
            .as_deref()
            .map(|v| v.trim().strip_suffix('%').unwrap_or(v.trim())),
    );
    quote.volume = parse_decimal(raw.volume.as_deref());
    quote.high = parse_decimal(raw.high.as_deref());
    quote.low = parse_decimal(raw.low.as_deref());
    quote.open = parse_decimal(raw.open.as_deref());
    quote.previous_close = parse_decimal(raw.previous_close.as_deref());

    Ok(quote)
}

/// Parse a provider number from its leading numeric text, so `"12abc"` is 12.
/// Missing, `""`, `"null"`, `"None"` and text without a leading number become zero.
pub(crate) fn parse_decimal(value: Option<&str>) -> Decimal {
    let Some(raw) = value.map(str::trim) else {
        return Decimal::ZERO;
    };

    if raw.is_empty() || raw == "null" || raw == "None" {
        return Decimal::ZERO;
    }

    if let Ok(parsed) = Decimal::from_str(raw) {
        return parsed;
    }

    let parsed = numeric_prefix(raw).and_then(|(number, scientific)| {
        if scientific {
            Decimal::from_scientific(&number).ok()
        } else {
            Decimal::from_str(&number).ok()
        }
    });

    parsed.unwrap_or_else(|| {
        debug!("Invalid numeric value received from API: {}", raw);
        Decimal::ZERO
    })
}

/// Longest prefix of `raw` shaped like `[+-]digits[.digits][e[+-]digits]`.
///
/// Returns the prefix rewritten without a leading `+` or a bare `.`, and
/// whether it carries an exponent. `None` when no digit leads the text.
fn numeric_prefix(raw: &str) -> Option<(String, bool)> {
    let bytes = raw.as_bytes();
    let mut pos = 0;
    let mut number = String::new();

    if let Some(&sign) = bytes.first() {
        if sign == b'-' || sign == b'+' {
            if sign == b'-' {
                number.push('-');
            }
            pos += 1;
        }
    }

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_digits = &raw[int_start..pos];

    let mut frac_digits = "";
    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        frac_digits = &raw[frac_start..end];
        pos = end;
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    number.push_str(if int_digits.is_empty() { "0" } else { int_digits });
    if !frac_digits.is_empty() {
        number.push('.');
        number.push_str(frac_digits);
    }

    // Exponent counts only when at least one digit follows it
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut end = pos + 1;
        let mut exponent = String::from("e");
        if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
            if bytes[end] == b'-' {
                exponent.push('-');
            }
            end += 1;
        }
        let digits_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end > digits_start {
            exponent.push_str(&raw[digits_start..end]);
            number.push_str(&exponent);
            return Some((number, true));
        }
    }

    Some((number, false))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
