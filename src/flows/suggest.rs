//! Crop-suggestion flow.
//!
//! The one flow with structured output: the gateway is asked for a JSON
//! array of crop objects, which is tolerant-parsed here (models wrap
//! JSON in markdown fences or an object envelope often enough that both
//! shapes are accepted).

use serde::Deserialize;
use tracing::{info, warn};

use crate::llm::{build_suggestion_prompt, suggestion_instruction};
use crate::types::{CropSuggestion, MitraError, Season, SuggestionRequest};

use super::Assistant;

/// Soil type assumed when suggestions are driven by a weather lookup
/// rather than an explicit form.
const DEFAULT_SOIL_TYPE: &str = "loam";

/// Object-envelope shape some completions use instead of a bare array.
#[derive(Deserialize)]
struct SuggestionEnvelope {
    crops: Vec<CropSuggestion>,
}

impl Assistant {
    /// Suggest crops for a soil type, location and season.
    pub async fn crop_suggestions(
        &self,
        req: &SuggestionRequest,
    ) -> Result<Vec<CropSuggestion>, MitraError> {
        if req.location.trim().is_empty() {
            return Err(MitraError::InvalidInput(
                "Please enter a location for crop suggestions".to_string(),
            ));
        }

        let text = self
            .complete(suggestion_instruction(), &build_suggestion_prompt(req))
            .await?;
        let crops = parse_suggestions(&text)?;
        info!(location = %req.location, count = crops.len(), "Crop suggestions generated");
        Ok(crops)
    }

    /// Suggest crops for a location using the current season and a
    /// default soil type. Used after a successful weather lookup.
    pub async fn suggestions_for_weather(
        &self,
        city: &str,
        country: &str,
    ) -> Result<Vec<CropSuggestion>, MitraError> {
        let req = SuggestionRequest {
            soil_type: DEFAULT_SOIL_TYPE.to_string(),
            location: format!("{city}, {country}"),
            season: Season::current().to_string(),
        };
        self.crop_suggestions(&req).await
    }
}

/// Extract a `CropSuggestion` list from gateway text. Accepts a bare
/// JSON array, a `{"crops": [...]}` envelope, and either form inside
/// markdown code fences.
fn parse_suggestions(text: &str) -> Result<Vec<CropSuggestion>, MitraError> {
    let body = strip_fences(text);

    if let Ok(crops) = serde_json::from_str::<Vec<CropSuggestion>>(body) {
        return Ok(crops);
    }
    if let Ok(envelope) = serde_json::from_str::<SuggestionEnvelope>(body) {
        return Ok(envelope.crops);
    }

    // Last resort: the outermost bracketed slice, for answers with prose
    // around the JSON.
    if let (Some(start), Some(end)) = (body.find('['), body.rfind(']')) {
        if start < end {
            if let Ok(crops) = serde_json::from_str::<Vec<CropSuggestion>>(&body[start..=end]) {
                return Ok(crops);
            }
        }
    }

    warn!("Suggestion response was not parseable JSON");
    Err(MitraError::EmptyResult(
        "The assistant returned no usable crop suggestions".to_string(),
    ))
}

/// Drop a surrounding markdown code fence, with or without a language
/// tag, leaving other text untouched.
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_start_matches(['\r', '\n'])
        .strip_suffix("```")
        .map(str::trim_end)
        .unwrap_or(trimmed)
}
