//! Farming-advice flow.

use tracing::info;

use crate::llm::{advice_instruction, build_advice_prompt};
use crate::types::{AdviceRequest, MitraError};

use super::Assistant;

impl Assistant {
    /// Free-text farming advice for a crop, region and question.
    ///
    /// Gateway failures propagate as errors; an answer that comes back
    /// blank is reported as an empty result rather than silently shown.
    pub async fn farming_advice(&self, req: &AdviceRequest) -> Result<String, MitraError> {
        if req.query.trim().is_empty() {
            return Err(MitraError::InvalidInput(
                "Please describe what you would like advice on".to_string(),
            ));
        }

        let text = self
            .complete(advice_instruction(), &build_advice_prompt(req))
            .await?;
        if text.trim().is_empty() {
            return Err(MitraError::EmptyResult(
                "The assistant returned no advice for this query".to_string(),
            ));
        }

        info!(crop = %req.crop_type, region = %req.region, "Advice generated");
        Ok(text)
    }
}
