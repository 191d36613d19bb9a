//! Query spelling normalizer.
//!
//! Rewrites free-text queries using a fixed misspelling→canonical table of
//! Indian state names, applied as case-insensitive whole-word replacements
//! in declaration order. Total over all inputs and idempotent: normalizing
//! an already-normalized query yields the same string.

use regex::Regex;
use std::sync::LazyLock;

/// Misspelled (or abbreviated) region token → canonical spelling.
/// Declaration order is significant: later rules may match text produced
/// by earlier ones, and "M.P." must stay a distinct token from "MP".
const CORRECTIONS: &[(&str, &str)] = &[
    ("andra pradesh", "andhra pradesh"),
    ("andrha", "andhra"),
    ("tamilnadu", "tamil nadu"),
    ("telegana", "telangana"),
    ("telengana", "telangana"),
    ("karnatka", "karnataka"),
    ("karnata", "karnataka"),
    ("kerela", "kerala"),
    ("chatisgarh", "chhattisgarh"),
    ("chattisgarh", "chhattisgarh"),
    ("maharastra", "maharashtra"),
    ("gujrat", "gujarat"),
    ("uttarpradesh", "uttar pradesh"),
    ("u.p.", "uttar pradesh"),
    ("up", "uttar pradesh"),
    ("madhyapradesh", "madhya pradesh"),
    ("m.p.", "madhya pradesh"),
    ("mp", "madhya pradesh"),
    ("jammu kashmir", "jammu and kashmir"),
];

struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    CORRECTIONS
        .iter()
        .map(|(key, replacement)| Rule {
            pattern: Regex::new(&word_pattern(key)).expect("static correction pattern"),
            replacement,
        })
        .collect()
});

/// Whole-word pattern for a correction key. The trailing boundary is
/// omitted when the key ends in a non-word character: `\b` after a literal
/// dot can never match at end of input, and "m.p." must still be matched
/// when it closes the query.
fn word_pattern(key: &str) -> String {
    let mut p = String::from(r"(?i)\b");
    p.push_str(&regex::escape(key));
    if key.chars().last().is_some_and(|c| c.is_alphanumeric()) {
        p.push_str(r"\b");
    }
    p
}

/// How rewrite rules are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteMode {
    /// One left-to-right pass over the table; each rule is applied exactly
    /// once and the output is never re-scanned.
    SinglePass,
    /// Re-apply the whole table until the text stops changing, bounded by
    /// `max_passes` to guarantee termination.
    FixedPoint { max_passes: u32 },
}

impl Default for RewriteMode {
    fn default() -> Self {
        RewriteMode::SinglePass
    }
}

/// The spelling normalizer. Cheap to construct; the rule table is shared.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    mode: RewriteMode,
}

impl Normalizer {
    pub fn new(mode: RewriteMode) -> Self {
        Self { mode }
    }

    /// Rewrite all known misspelled region tokens to their canonical form.
    /// The result is lowercase; the input is never mutated.
    pub fn normalize(&self, input: &str) -> String {
        let mut text = input.to_lowercase();
        match self.mode {
            RewriteMode::SinglePass => {
                text = Self::apply_table(&text);
            }
            RewriteMode::FixedPoint { max_passes } => {
                for _ in 0..max_passes.max(1) {
                    let next = Self::apply_table(&text);
                    if next == text {
                        break;
                    }
                    text = next;
                }
            }
        }
        text
    }

    /// Whether normalization changed the query beyond case folding. The
    /// input is lowercased the same way `normalize` lowercases, so
    /// non-ASCII uppercase never counts as a correction.
    pub fn was_corrected(&self, input: &str, normalized: &str) -> bool {
        input.trim().to_lowercase() != normalized
    }

    fn apply_table(text: &str) -> String {
        let mut out = text.to_string();
        for rule in RULES.iter() {
            out = rule.pattern.replace_all(&out, rule.replacement).into_owned();
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
