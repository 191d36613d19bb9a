//! Price response parser.
//!
//! Converts free text from the prompt gateway into `PriceRecord`s using a
//! prioritized chain of independent matchers. The first tier to produce at
//! least one record wins; a total miss is an empty list (the caller keeps
//! the raw text for display), never an error.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::types::{contains_estimated, today_placeholder, PriceRecord, PriceReport};

/// "Market: Price" with an optional trailing "(date)" group.
static LINE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?):\s*(.+?)(?:\s*\((.+?)\))?$").expect("line pattern"));

/// A bare price token: a number prefixed by "₹"/"Rs."/"INR", or a number
/// followed by "rupees"/"INR"/"Rs.".
static PRICE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(₹\s*\d+(?:[,.]\d+)?|\b(?:Rs\.?|INR)\s*\d+(?:[,.]\d+)?|\b\d+(?:[,.]\d+)?\s*(?:rupees|INR|Rs\.?))",
    )
    .expect("price token pattern")
});

/// One stage of the layered extraction attempt sequence.
///
/// `attempt` returns `Some` with at least one record when the tier applies,
/// `None` when the next tier should be tried.
pub trait PriceMatcher: Send + Sync {
    fn attempt(&self, text: &str, crop: &str) -> Option<Vec<PriceRecord>>;

    /// Tier name for logging.
    fn name(&self) -> &'static str;
}

// ---------------------------------------------------------------------------
// Tier 1: line-structured extraction
// ---------------------------------------------------------------------------

/// Extracts "Market: Price" / "Market: Price (Date)" lines. Lines matching
/// neither shape are dropped silently.
pub struct LineMatcher;

impl LineMatcher {
    fn parse_line(line: &str, crop: &str) -> Option<PriceRecord> {
        if let Some(caps) = LINE_PATTERN.captures(line) {
            let market = caps.get(1)?.as_str().trim();
            let price = caps.get(2)?.as_str().trim();
            let date = caps
                .get(3)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_else(today_placeholder);
            return Some(PriceRecord {
                crop: crop.to_string(),
                market: market.to_string(),
                price: price.to_string(),
                date,
            });
        }

        // Fallback: a line with exactly one colon splits into market/price.
        let parts: Vec<&str> = line.split(':').collect();
        if parts.len() == 2 {
            return Some(PriceRecord {
                crop: crop.to_string(),
                market: parts[0].trim().to_string(),
                price: parts[1].trim().to_string(),
                date: today_placeholder(),
            });
        }

        None
    }
}

impl PriceMatcher for LineMatcher {
    fn attempt(&self, text: &str, crop: &str) -> Option<Vec<PriceRecord>> {
        let records: Vec<PriceRecord> = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| Self::parse_line(line, crop))
            .collect();

        if records.is_empty() {
            None
        } else {
            Some(records)
        }
    }

    fn name(&self) -> &'static str {
        "line"
    }
}

// ---------------------------------------------------------------------------
// Tier 2: bare price token extraction
// ---------------------------------------------------------------------------

/// Scans the whole text for price-shaped tokens when no line structure was
/// found. Markets are labelled "Market <n>" in order of appearance.
pub struct TokenMatcher;

impl PriceMatcher for TokenMatcher {
    fn attempt(&self, text: &str, crop: &str) -> Option<Vec<PriceRecord>> {
        let records: Vec<PriceRecord> = PRICE_TOKEN
            .find_iter(text)
            .enumerate()
            .map(|(i, m)| PriceRecord {
                crop: crop.to_string(),
                market: format!("Market {}", i + 1),
                price: m.as_str().to_string(),
                date: today_placeholder(),
            })
            .collect();

        if records.is_empty() {
            None
        } else {
            Some(records)
        }
    }

    fn name(&self) -> &'static str {
        "token"
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// The default tier chain. Tiers run in order; the first success wins.
fn default_tiers() -> Vec<Box<dyn PriceMatcher>> {
    vec![Box::new(LineMatcher), Box::new(TokenMatcher)]
}

/// Parse gateway free text into price records.
///
/// `crop` is the original crop token, used only as a record label.
pub fn parse_prices(raw: &str, crop: &str) -> Vec<PriceRecord> {
    for tier in default_tiers() {
        if let Some(records) = tier.attempt(raw, crop) {
            debug!(tier = tier.name(), count = records.len(), "Price extraction matched");
            return records;
        }
    }
    debug!("No price data found in response text");
    Vec::new()
}

/// Parse gateway free text into a full report, including the estimated
/// flag (computed over the whole raw text, independent of which tier
/// matched) and the retained raw text.
pub fn parse_report(raw: &str, crop: &str) -> PriceReport {
    PriceReport {
        records: parse_prices(raw, crop),
        estimated: contains_estimated(raw),
        raw: raw.to_string(),
        corrected_query: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
