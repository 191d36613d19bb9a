//! Shared types for the KISAN MITRA service.
//!
//! These types form the data model used across all modules. Everything
//! here is request-scoped: a value is created for one user query and
//! discarded when the response is rendered. Nothing is persisted.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Price records
// ---------------------------------------------------------------------------

/// A single market/price quote extracted from gateway free text.
///
/// Prices are kept as literal strings exactly as returned — the source text
/// mixes currencies, units ("/quintal", "/ton") and approximate ranges that
/// cannot be losslessly reduced to a numeric type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// The crop the user asked about (label only, first token of the query).
    pub crop: String,
    pub market: String,
    pub price: String,
    /// Literal date text from the response, or today's date as a placeholder.
    pub date: String,
}

impl fmt::Display for PriceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}: {} ({})", self.crop, self.market, self.price, self.date)
    }
}

/// The full result of one price query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceReport {
    pub records: Vec<PriceRecord>,
    /// True if the raw text contained the marker token "estimated"
    /// (any case). Presentation-only: governs the disclaimer label,
    /// never the parsing logic or record content.
    pub estimated: bool,
    /// The untouched gateway text, retained so a total parse miss can
    /// still show the model's answer to the user.
    pub raw: String,
    /// Set when the spelling normalizer changed the query, so the caller
    /// can tell the user what was actually searched.
    pub corrected_query: Option<String>,
}

impl PriceReport {
    /// A parse miss: no records, raw text kept for display.
    pub fn miss(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            records: Vec::new(),
            estimated: contains_estimated(&raw),
            raw,
            corrected_query: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Case-insensitive substring search for the "estimated" marker.
pub fn contains_estimated(text: &str) -> bool {
    text.to_lowercase().contains("estimated")
}

/// Today's date as the placeholder used when a response line carries no
/// date of its own. Not a claim that the quoted market data is current.
pub fn today_placeholder() -> String {
    Local::now().format("%d/%m/%Y").to_string()
}

// ---------------------------------------------------------------------------
// Crop suggestions
// ---------------------------------------------------------------------------

/// One suggested crop. All fields are free-text strings from the gateway
/// (yield and value include units/currency in the text itself).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropSuggestion {
    pub name: String,
    #[serde(rename = "yieldEstimate", alias = "yield_estimate")]
    pub yield_estimate: String,
    #[serde(rename = "growthDuration", alias = "growth_duration")]
    pub growth_duration: String,
    #[serde(rename = "marketValue", alias = "market_value")]
    pub market_value: String,
}

impl fmt::Display for CropSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}, {})",
            self.name, self.yield_estimate, self.growth_duration, self.market_value,
        )
    }
}

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

/// Current conditions for a location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weather {
    pub temperature_celsius: f64,
    pub rainfall_mm: f64,
    pub humidity_percent: f64,
    pub condition: String,
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1}°C, {:.1}mm rain, {:.0}% humidity, {}",
            self.temperature_celsius, self.rainfall_mm, self.humidity_percent, self.condition,
        )
    }
}

/// Forecast for a single calendar day, subsampled from the 3-hourly series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Weekday name, e.g. "Monday".
    pub day: String,
    pub temperature_celsius: f64,
    pub rainfall_mm: f64,
    pub humidity_percent: f64,
    pub condition: String,
}

impl fmt::Display for DailyForecast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.1}°C, {:.1}mm rain, {:.0}% humidity, {}",
            self.day, self.temperature_celsius, self.rainfall_mm, self.humidity_percent,
            self.condition,
        )
    }
}

// ---------------------------------------------------------------------------
// Seasons
// ---------------------------------------------------------------------------

/// Coarse season buckets used when deriving crop suggestions from the
/// current date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Season for a 1-based calendar month.
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    /// Season for a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::from_month(date.month())
    }

    /// The current season, from the local clock.
    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Season::Spring => write!(f, "Spring"),
            Season::Summer => write!(f, "Summer"),
            Season::Autumn => write!(f, "Autumn"),
            Season::Winter => write!(f, "Winter"),
        }
    }
}

// ---------------------------------------------------------------------------
// Flow inputs
// ---------------------------------------------------------------------------

/// Input for the farming-advice flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviceRequest {
    pub crop_type: String,
    pub region: String,
    pub query: String,
}

/// Input for the government-schemes flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemesRequest {
    pub location: String,
    pub query: String,
}

/// Input for the crop-suggestion flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionRequest {
    pub soil_type: String,
    pub location: String,
    pub season: String,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for KISAN MITRA.
///
/// A total parse miss is deliberately NOT represented here: it is an empty
/// record list with the raw text retained, not a failure.
#[derive(Debug, thiserror::Error)]
pub enum MitraError {
    /// Missing credential or bad config — detected before any network call.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport failure or non-success HTTP status from the gateway.
    #[error("Gateway error ({model}): {message}")]
    Gateway { model: String, message: String },

    /// Weather endpoint failure that couldn't be degraded to empty data.
    #[error("Weather error: {0}")]
    Weather(String),

    /// The gateway answered but the expected field was empty or missing.
    #[error("No data returned: {0}")]
    EmptyResult(String),

    /// The user's input failed validation before any call was made.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl MitraError {
    /// Whether this error should be shown with suggested alternative
    /// queries rather than a plain failure message.
    pub fn wants_suggestions(&self) -> bool {
        matches!(self, MitraError::EmptyResult(_) | MitraError::InvalidInput(_))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
