//! Weather data client.
//!
//! Two read-only OpenWeatherMap calls keyed by free-text city and country
//! names: current conditions and the 3-hourly forecast, subsampled to one
//! entry per calendar day. Failures degrade to `None`/empty inside
//! `fetch_both` — a weather outage never fails a request.
//!
//! API: `https://api.openweathermap.org/data/2.5/{weather,forecast}`
//! Auth: API key query parameter.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::warn;

use crate::types::{DailyForecast, Weather};

const API_BASE: &str = "https://api.openweathermap.org/data/2.5";

/// The forecast endpoint returns 3-hour steps; every 8th entry lands on a
/// new calendar day.
const STEPS_PER_DAY: usize = 8;

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Source of weather data for a free-text location.
///
/// `current` and `forecast` report transport failures as errors so a
/// double can script them; `fetch_both` owns the degrade policy and is
/// what callers use.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current conditions, or `Ok(None)` when the endpoint has no data
    /// for the location (missing key, non-success status).
    async fn current(&self, city: &str, country: &str) -> Result<Option<Weather>>;

    /// Daily forecast; `Ok(empty)` when the endpoint has no data.
    async fn forecast(&self, city: &str, country: &str) -> Result<Vec<DailyForecast>>;

    /// Fetch current conditions and the forecast concurrently. The two
    /// calls are independent: one side failing degrades to `None`/empty
    /// and never blocks or empties the other.
    async fn fetch_both(
        &self,
        city: &str,
        country: &str,
    ) -> (Option<Weather>, Vec<DailyForecast>) {
        let (current, forecast) =
            futures::join!(self.current(city, country), self.forecast(city, country));

        let current = match current {
            Ok(weather) => weather,
            Err(e) => {
                warn!(city, country, error = %e, "Current-weather fetch failed");
                None
            }
        };
        let forecast = match forecast {
            Ok(days) => days,
            Err(e) => {
                warn!(city, country, error = %e, "Forecast fetch failed");
                Vec::new()
            }
        };
        (current, forecast)
    }
}

// ---------------------------------------------------------------------------
// OpenWeatherMap response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    #[serde(default)]
    main: Option<MainData>,
    #[serde(default)]
    rain: Option<RainData>,
    #[serde(default)]
    weather: Vec<ConditionData>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    #[serde(default)]
    dt: i64,
    #[serde(default)]
    main: Option<MainData>,
    #[serde(default)]
    rain: Option<RainData>,
    #[serde(default)]
    weather: Vec<ConditionData>,
}

#[derive(Debug, Deserialize)]
struct MainData {
    #[serde(default)]
    temp: Option<f64>,
    #[serde(default)]
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RainData {
    #[serde(rename = "1h", default)]
    one_hour: Option<f64>,
    #[serde(rename = "3h", default)]
    three_hours: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ConditionData {
    #[serde(default)]
    description: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct WeatherClient {
    http: Client,
    api_key: Option<SecretString>,
    units: String,
}

impl WeatherClient {
    pub fn new(api_key: Option<SecretString>, units: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .user_agent("kisan-mitra/0.1.0")
            .build()
            .context("Failed to build weather HTTP client")?;
        Ok(Self {
            http,
            api_key,
            units: units.to_string(),
        })
    }

    fn location_url(&self, endpoint: &str, city: &str, country: &str, key: &SecretString) -> String {
        format!(
            "{API_BASE}/{endpoint}?q={},{}&appid={}&units={}",
            urlencoding::encode(city),
            urlencoding::encode(country),
            key.expose_secret(),
            self.units,
        )
    }

    fn map_current(data: &CurrentResponse) -> Weather {
        Weather {
            temperature_celsius: data.main.as_ref().and_then(|m| m.temp).unwrap_or(0.0),
            rainfall_mm: data.rain.as_ref().and_then(|r| r.one_hour).unwrap_or(0.0),
            humidity_percent: data.main.as_ref().and_then(|m| m.humidity).unwrap_or(0.0),
            condition: data
                .weather
                .first()
                .and_then(|w| w.description.clone())
                .unwrap_or_default(),
        }
    }

    /// Subsample one entry per calendar day from the 3-hourly series and
    /// map it into the `DailyForecast` shape.
    fn map_forecast(data: &ForecastResponse) -> Vec<DailyForecast> {
        data.list
            .iter()
            .step_by(STEPS_PER_DAY)
            .map(|entry| DailyForecast {
                day: DateTime::from_timestamp(entry.dt, 0)
                    .map(|dt| dt.format("%A").to_string())
                    .unwrap_or_else(|| "?".to_string()),
                temperature_celsius: entry.main.as_ref().and_then(|m| m.temp).unwrap_or(0.0),
                rainfall_mm: entry.rain.as_ref().and_then(|r| r.three_hours).unwrap_or(0.0),
                humidity_percent: entry.main.as_ref().and_then(|m| m.humidity).unwrap_or(0.0),
                condition: entry
                    .weather
                    .first()
                    .and_then(|w| w.description.clone())
                    .unwrap_or_default(),
            })
            .collect()
    }
}

#[async_trait]
impl WeatherProvider for WeatherClient {
    async fn current(&self, city: &str, country: &str) -> Result<Option<Weather>> {
        let Some(key) = &self.api_key else {
            warn!("Weather API key not configured");
            return Ok(None);
        };

        let url = self.location_url("weather", city, country, key);
        let resp = self.http.get(&url).send().await.context("weather request failed")?;
        if !resp.status().is_success() {
            warn!(status = %resp.status(), city, "Weather endpoint returned non-success");
            return Ok(None);
        }

        let data: CurrentResponse = resp.json().await.context("failed to parse weather response")?;
        Ok(Some(Self::map_current(&data)))
    }

    async fn forecast(&self, city: &str, country: &str) -> Result<Vec<DailyForecast>> {
        let Some(key) = &self.api_key else {
            warn!("Weather API key not configured");
            return Ok(Vec::new());
        };

        let url = self.location_url("forecast", city, country, key);
        let resp = self.http.get(&url).send().await.context("forecast request failed")?;
        if !resp.status().is_success() {
            warn!(status = %resp.status(), city, "Forecast endpoint returned non-success");
            return Ok(Vec::new());
        }

        let data: ForecastResponse = resp.json().await.context("failed to parse forecast response")?;
        Ok(Self::map_forecast(&data))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
