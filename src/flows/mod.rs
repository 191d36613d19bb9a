//! Assistant flows — one per user-facing capability.
//!
//! Each flow formats the user's structured input, runs one completion
//! through the prompt gateway, and shapes the answer for the caller.
//! Only the prices flow has a degraded-output policy; the others
//! surface gateway failures as errors.

pub mod advice;
pub mod prices;
pub mod schemes;
pub mod suggest;

use std::sync::Arc;

use tracing::warn;

use crate::fallback::{FallbackPolicy, CONFIG_ERROR_MESSAGE};
use crate::llm::PromptGateway;
use crate::normalize::Normalizer;
use crate::types::MitraError;

/// Sample queries offered to the user when a price lookup comes back
/// empty or invalid.
pub const SAMPLE_QUERIES: [&str; 9] = [
    "Rice price in Andhra Pradesh",
    "Wheat price in Punjab",
    "Tomato price in Karnataka",
    "Onion price in Maharashtra",
    "Potato price in Uttar Pradesh",
    "Soybean price in Madhya Pradesh",
    "Cotton price in Gujarat",
    "Sugarcane price in Tamil Nadu",
    "Maize price in Bihar",
];

/// The assistant: holds the gateway (absent when no API key was
/// configured), the query normalizer and the price fallback policy.
pub struct Assistant {
    gateway: Option<Arc<dyn PromptGateway>>,
    normalizer: Normalizer,
    fallback: FallbackPolicy,
}

impl Assistant {
    pub fn new(gateway: Option<Arc<dyn PromptGateway>>, normalizer: Normalizer) -> Self {
        Self {
            gateway,
            normalizer,
            fallback: FallbackPolicy,
        }
    }

    /// Run one completion, translating gateway absence and transport
    /// failure into domain errors. Used by every flow except prices,
    /// which degrades instead of erroring.
    async fn complete(&self, system: &str, user: &str) -> Result<String, MitraError> {
        let gateway = self
            .gateway
            .as_ref()
            .ok_or_else(|| MitraError::Config(CONFIG_ERROR_MESSAGE.to_string()))?;

        gateway.generate(system, user).await.map_err(|e| {
            warn!(model = gateway.model_name(), error = %e, "Gateway call failed");
            MitraError::Gateway {
                model: gateway.model_name().to_string(),
                message: e.to_string(),
            }
        })
    }
}
