//! Crop-prices flow.
//!
//! The one flow with a degraded-output contract: the caller always gets
//! a `PriceReport` back unless the input itself was invalid. A missing
//! gateway yields the config-error text, a failed or empty completion
//! yields the canned estimated table, and a completion that parses to
//! nothing yields an empty report with the raw text retained.

use tracing::{debug, info, warn};

use crate::fallback::CONFIG_ERROR_MESSAGE;
use crate::llm::{build_prices_prompt, prices_instruction};
use crate::parser::parse_report;
use crate::types::{MitraError, PriceReport};

use super::Assistant;

impl Assistant {
    /// Look up prices for a free-text crop query.
    ///
    /// The query is spelling-normalized before it reaches the gateway;
    /// when that changes the text, the corrected form is echoed back on
    /// the report so the caller can tell the user what was searched.
    pub async fn crop_prices(&self, query: &str) -> Result<PriceReport, MitraError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(MitraError::InvalidInput(
                "Please enter a crop name or price query".to_string(),
            ));
        }

        let normalized = self.normalizer.normalize(trimmed);
        let corrected = self
            .normalizer
            .was_corrected(trimmed, &normalized)
            .then(|| normalized.clone());
        if let Some(c) = &corrected {
            debug!(original = trimmed, corrected = %c, "Query spelling corrected");
        }

        let Some(gateway) = &self.gateway else {
            warn!("Price lookup attempted with no gateway configured");
            return Ok(PriceReport {
                corrected_query: corrected,
                ..PriceReport::miss(CONFIG_ERROR_MESSAGE)
            });
        };

        let prompt = build_prices_prompt(&normalized);
        let outcome = gateway.generate(prices_instruction(), &prompt).await;
        let text = self.fallback.resolve(outcome);

        let mut report = parse_report(&text, &normalized);
        report.corrected_query = corrected;
        info!(
            query = %normalized,
            records = report.records.len(),
            estimated = report.estimated,
            "Price lookup complete"
        );
        Ok(report)
    }
}
