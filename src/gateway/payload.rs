use serde::{Deserialize, Serialize};

use crate::audit::AuditOutcome;

/// Body of `POST /match`.
#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    /// Free-text patient case. Required, non-empty.
    pub summary: String,
}

/// One candidate trial in the response, in retrieval-rank order.
#[derive(Debug, Serialize)]
pub struct MatchEntry {
    pub nct_id: String,
    pub title: String,
    pub phase: String,
    pub url: String,
    pub analysis: String,
}

impl From<AuditOutcome> for MatchEntry {
    fn from(outcome: AuditOutcome) -> Self {
        Self {
            nct_id: outcome.nct_id,
            title: outcome.title,
            phase: outcome.phase,
            url: outcome.url,
            analysis: outcome.verdict,
        }
    }
}

/// Response body of `POST /match`.
#[derive(Debug, Serialize)]
pub struct MatchResponseBody {
    pub matches: Vec<MatchEntry>,
}
