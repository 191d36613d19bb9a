//! LLM prompt gateway.
//!
//! Defines the `PromptGateway` trait, the per-flow instruction templates,
//! and a Google Gemini implementation.

pub mod gemini;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{AdviceRequest, SchemesRequest, SuggestionRequest};

/// Abstraction over the external completion service.
///
/// Implementors send a schema-constrained instruction plus the user's
/// structured input and return the model's free text. One attempt per
/// call; no retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PromptGateway: Send + Sync {
    /// Run one completion: `system` carries the flow instruction template,
    /// `user` the formatted request fields.
    async fn generate(&self, system: &str, user: &str) -> Result<String>;

    /// Model identifier string.
    fn model_name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Prompt templates
// ---------------------------------------------------------------------------

/// Instruction for the crop-prices flow. The response format example and
/// the estimated fallback block are part of the contract the parser
/// understands.
pub fn prices_instruction() -> &'static str {
    "You are an expert AI agricultural assistant providing information on \
     crop prices in India.\n\n\
     Search for crop price information based on the query and directly \
     return what you find, without additional text or explanations.\n\n\
     Instructions:\n\
     1. Even if the information is incomplete or not the most recent, still \
        provide whatever price data you can find.\n\
     2. Format your response as:\n\
        Market: Price\n\n\
        Example:\n\
        Delhi Market: ₹1500/quintal\n\
        Mumbai Market: ₹1450/quintal\n\n\
     3. If you can't find exact prices but find any price range or \
        approximate prices, provide those instead.\n\
     4. If you absolutely cannot find any data, respond with:\n\
        \"Delhi Market: ₹2200/quintal (estimated)\n\
        Mumbai Market: ₹2100/quintal (estimated)\n\
        Local Mandi: ₹2000/quintal (estimated)\"\n\
     5. Do not apologise for the lack of information. Directly state the \
        available information or lack thereof."
}

/// Instruction for the farming-advice flow.
pub fn advice_instruction() -> &'static str {
    "You are an expert AI agricultural assistant providing farming advice. \
     Provide detailed and practical advice to the farmer, considering the \
     crop type, region, and specific query."
}

/// Instruction for the government-schemes flow.
pub fn schemes_instruction() -> &'static str {
    "You are an expert AI agricultural assistant providing information on \
     government schemes. Find government schemes related to agriculture and \
     farming in the specified location, considering the specific query, and \
     provide detailed information to the farmer."
}

/// Instruction for the crop-suggestion flow. The JSON contract mirrors the
/// `CropSuggestion` field names.
pub fn suggestion_instruction() -> &'static str {
    "You are an expert AI agricultural assistant helping a farmer choose \
     the best crops to grow. Suggest 3 crops that are well-suited to the \
     given soil type, location and season. For each crop include:\n\
     - a yield estimate (specify units like tons/acre or kg/hectare)\n\
     - the typical growth duration (ALWAYS include units like \"3-4 weeks\" \
       or \"2-3 months\")\n\
     - the current market value (specify the currency like INR)\n\n\
     Some crops have short growth periods, such as radish (3-4 weeks), \
     while others like rice take several months (3-4 months). Always \
     provide the appropriate time unit.\n\n\
     Respond ONLY with a JSON array of objects with the fields \"name\", \
     \"yieldEstimate\", \"growthDuration\" and \"marketValue\"."
}

/// User message for the prices flow. " mandi price" keeps the query
/// pointed at wholesale market data.
pub fn build_prices_prompt(query: &str) -> String {
    format!("For this query \"{query} mandi price\", return crop price information.")
}

pub fn build_advice_prompt(req: &AdviceRequest) -> String {
    format!(
        "Given the following information:\n\
         - Crop Type: {}\n\
         - Region: {}\n\
         - Query: {}\n",
        req.crop_type, req.region, req.query,
    )
}

pub fn build_schemes_prompt(req: &SchemesRequest) -> String {
    format!(
        "Given the following information:\n\
         - Location: {}\n\
         - Query: {}\n",
        req.location, req.query,
    )
}

pub fn build_suggestion_prompt(req: &SuggestionRequest) -> String {
    format!(
        "Given the following information:\n\
         - Soil Type: {}\n\
         - Location: {}\n\
         - Season: {}\n",
        req.soil_type, req.location, req.season,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
