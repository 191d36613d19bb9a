//! Government-schemes flow.

use tracing::info;

use crate::llm::{build_schemes_prompt, schemes_instruction};
use crate::types::{MitraError, SchemesRequest};

use super::Assistant;

impl Assistant {
    /// Agricultural scheme information for a location and question.
    pub async fn government_schemes(&self, req: &SchemesRequest) -> Result<String, MitraError> {
        if req.location.trim().is_empty() {
            return Err(MitraError::InvalidInput(
                "Please enter a location to search schemes for".to_string(),
            ));
        }

        let text = self
            .complete(schemes_instruction(), &build_schemes_prompt(req))
            .await?;
        if text.trim().is_empty() {
            return Err(MitraError::EmptyResult(
                "No scheme information was returned for this location".to_string(),
            ));
        }

        info!(location = %req.location, "Scheme information generated");
        Ok(text)
    }
}
