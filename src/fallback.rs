//! Fallback policy for the price flow.
//!
//! When the gateway call fails or returns an empty price field, the flow
//! substitutes a fixed canned response instead of an empty result or a
//! hard failure. The payload is visibly labelled "(estimated)" so the
//! presentation layer can attach its disclaimer.

/// The exact canned payload: three named markets, each with a literal
/// "(estimated)" suffix.
const CANNED_PRICES: &str = "Delhi Market: ₹2200/quintal (estimated)\n\
                             Mumbai Market: ₹2100/quintal (estimated)\n\
                             Local Mandi: ₹2000/quintal (estimated)";

/// Static message returned when the gateway credential is missing.
/// Surfaced before any network call is attempted.
pub const CONFIG_ERROR_MESSAGE: &str = "API configuration error. Please contact support.";

/// Explicit fallback contract for the price flow. Kept as a policy object
/// rather than inline literals so tests can assert on the exact payload
/// without depending on call-site duplication.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackPolicy;

impl FallbackPolicy {
    /// The canned three-line price text.
    pub fn canned_prices(&self) -> &'static str {
        CANNED_PRICES
    }

    /// Resolve a gateway outcome to non-empty text: a successful,
    /// non-empty response passes through untouched; a failure or an
    /// empty/whitespace response becomes the canned payload.
    pub fn resolve(&self, outcome: Result<String, anyhow::Error>) -> String {
        match outcome {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                tracing::warn!("Gateway returned empty price text, using canned fallback");
                CANNED_PRICES.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Gateway price call failed, using canned fallback");
                CANNED_PRICES.to_string()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
