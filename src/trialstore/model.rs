use qdrant_client::qdrant::ScoredPoint;
use qdrant_client::qdrant::value::Kind;

/// Placeholder for trials whose registry id is missing from the index.
pub const PLACEHOLDER_NCT_ID: &str = "N/A";

/// Placeholder for trials indexed without a title.
pub const PLACEHOLDER_TITLE: &str = "Untitled";

/// Placeholder for trials indexed without a phase.
pub const PLACEHOLDER_PHASE: &str = "N/A";

/// Placeholder for trials indexed without a registry URL.
pub const PLACEHOLDER_URL: &str = "#";

/// One retrieved clinical-trial record, in retrieval-rank order.
///
/// Read-only downstream of the store; the audit stages never mutate it.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialDocument {
    /// ClinicalTrials.gov registry id (e.g. `NCT01234567`).
    pub nct_id: String,
    /// Brief trial title.
    pub title: String,
    /// Trial phase label.
    pub phase: String,
    /// Registry URL.
    pub url: String,
    /// Raw eligibility criteria text.
    pub eligibility_text: String,
    /// Whether the trial recruits domestically. Sole field used for filtering.
    pub is_domestic: bool,
    /// Similarity score reported by the index.
    pub score: f32,
}

impl TrialDocument {
    /// Builds a document from a Qdrant scored point, falling back to fixed
    /// placeholders for any missing metadata.
    pub fn from_scored_point(point: ScoredPoint) -> Self {
        let payload = point.payload;

        let string_field = |key: &str, fallback: &str| -> String {
            payload
                .get(key)
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| fallback.to_string())
        };

        let is_domestic = payload
            .get("is_domestic_trial")
            .and_then(|v| match &v.kind {
                Some(Kind::BoolValue(b)) => Some(*b),
                _ => None,
            })
            .unwrap_or(false);

        Self {
            nct_id: string_field("nct_id", PLACEHOLDER_NCT_ID),
            title: string_field("title", PLACEHOLDER_TITLE),
            phase: string_field("phase", PLACEHOLDER_PHASE),
            url: string_field("url", PLACEHOLDER_URL),
            eligibility_text: string_field("eligibility_text", ""),
            is_domestic,
            score: point.score,
        }
    }
}
