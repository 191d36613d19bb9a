//! API route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<ServerState>`.
//! Price lookups are fenced with a monotonic request ticket so a slow
//! older lookup can never overwrite the stored result of a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::flows::{Assistant, SAMPLE_QUERIES};
use crate::types::{CropSuggestion, DailyForecast, MitraError, PriceRecord, PriceReport, Weather};
use crate::weather::{WeatherClient, WeatherProvider};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct ServerState {
    pub assistant: Assistant,
    pub weather: WeatherClient,
    pub assistant_name: String,
    /// Most recent completed price report, for the dashboard page.
    latest_report: RwLock<Option<PriceReport>>,
    /// Monotonic lookup ticket. The stored report only updates when the
    /// finishing lookup still holds the newest ticket.
    ticket: AtomicU64,
}

impl ServerState {
    pub fn new(assistant: Assistant, weather: WeatherClient, assistant_name: String) -> Self {
        Self {
            assistant,
            weather,
            assistant_name,
            latest_report: RwLock::new(None),
            ticket: AtomicU64::new(0),
        }
    }

    /// Issue the next lookup ticket.
    fn next_ticket(&self) -> u64 {
        self.ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Store a finished report unless a newer lookup has started since.
    async fn store_if_current(&self, ticket: u64, report: &PriceReport) {
        if self.ticket.load(Ordering::SeqCst) == ticket {
            *self.latest_report.write().await = Some(report.clone());
        } else {
            debug!(ticket, "Discarding stale price report");
        }
    }

    pub async fn latest_report(&self) -> Option<PriceReport> {
        self.latest_report.read().await.clone()
    }
}

pub type AppState = Arc<ServerState>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PricesBody {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct PricesResponse {
    pub records: Vec<PriceRecord>,
    pub estimated: bool,
    pub raw: String,
    #[serde(rename = "correctedQuery", skip_serializing_if = "Option::is_none")]
    pub corrected_query: Option<String>,
}

impl From<PriceReport> for PricesResponse {
    fn from(report: PriceReport) -> Self {
        Self {
            records: report.records,
            estimated: report.estimated,
            raw: report.raw,
            corrected_query: report.corrected_query,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdviceResponse {
    pub advice: String,
}

#[derive(Debug, Serialize)]
pub struct SchemesResponse {
    pub schemes: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub crops: Vec<CropSuggestion>,
}

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub city: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "India".to_string()
}

#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    pub current: Option<Weather>,
    pub forecast: Vec<DailyForecast>,
    pub crops: Vec<CropSuggestion>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub assistant: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<&'static str>>,
}

/// Map a domain error to a status code and a readable JSON body.
/// Empty-result and invalid-input errors carry sample queries the user
/// can try instead.
fn error_response(err: MitraError) -> (StatusCode, Json<ErrorBody>) {
    let status = match &err {
        MitraError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        MitraError::EmptyResult(_) => StatusCode::NOT_FOUND,
        MitraError::Gateway { .. } | MitraError::Weather(_) => StatusCode::BAD_GATEWAY,
        MitraError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let suggestions = err.wants_suggestions().then(|| SAMPLE_QUERIES.to_vec());
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
            suggestions,
        }),
    )
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// POST /api/prices
pub async fn post_prices(
    State(state): State<AppState>,
    Json(body): Json<PricesBody>,
) -> Result<Json<PricesResponse>, (StatusCode, Json<ErrorBody>)> {
    let ticket = state.next_ticket();
    let report = state
        .assistant
        .crop_prices(&body.query)
        .await
        .map_err(error_response)?;
    state.store_if_current(ticket, &report).await;
    Ok(Json(report.into()))
}

/// POST /api/advice
pub async fn post_advice(
    State(state): State<AppState>,
    Json(req): Json<crate::types::AdviceRequest>,
) -> Result<Json<AdviceResponse>, (StatusCode, Json<ErrorBody>)> {
    let advice = state
        .assistant
        .farming_advice(&req)
        .await
        .map_err(error_response)?;
    Ok(Json(AdviceResponse { advice }))
}

/// POST /api/schemes
pub async fn post_schemes(
    State(state): State<AppState>,
    Json(req): Json<crate::types::SchemesRequest>,
) -> Result<Json<SchemesResponse>, (StatusCode, Json<ErrorBody>)> {
    let schemes = state
        .assistant
        .government_schemes(&req)
        .await
        .map_err(error_response)?;
    Ok(Json(SchemesResponse { schemes }))
}

/// POST /api/suggestions
pub async fn post_suggestions(
    State(state): State<AppState>,
    Json(req): Json<crate::types::SuggestionRequest>,
) -> Result<Json<SuggestionsResponse>, (StatusCode, Json<ErrorBody>)> {
    let crops = state
        .assistant
        .crop_suggestions(&req)
        .await
        .map_err(error_response)?;
    Ok(Json(SuggestionsResponse { crops }))
}

/// GET /api/weather?city=...&country=...
///
/// Current conditions and forecast fetched concurrently; when current
/// conditions are available, weather-driven crop suggestions are added.
/// A suggestion failure degrades to an empty list, not an error.
pub async fn get_weather(
    State(state): State<AppState>,
    Query(q): Query<WeatherQuery>,
) -> Result<Json<WeatherResponse>, (StatusCode, Json<ErrorBody>)> {
    if q.city.trim().is_empty() {
        return Err(error_response(MitraError::InvalidInput(
            "Please enter a city name".to_string(),
        )));
    }

    let (current, forecast) = state.weather.fetch_both(&q.city, &q.country).await;
    if current.is_none() && forecast.is_empty() {
        return Err(error_response(MitraError::Weather(format!(
            "Could not retrieve weather data for {}, {}",
            q.city, q.country
        ))));
    }

    let crops = if current.is_some() {
        match state.assistant.suggestions_for_weather(&q.city, &q.country).await {
            Ok(crops) => crops,
            Err(e) => {
                warn!(error = %e, "Weather-driven crop suggestions failed");
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    Ok(Json(WeatherResponse {
        current,
        forecast,
        crops,
    }))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        assistant: state.assistant_name.clone(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
