use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{info, instrument, warn};

use crate::audit::AuditClient;
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{MatchEntry, MatchRequest, MatchResponseBody};
use crate::gateway::state::HandlerState;
use crate::pipeline::PipelineError;
use crate::trialstore::TrialStore;

/// `POST /match`: screens one patient case against the trial corpus.
///
/// Per-candidate audit failures are not HTTP errors; they come back as
/// ordinary array entries whose `analysis` carries the error marker. Only a
/// missing store or malformed input fails the whole request.
#[instrument(skip(state, request), fields(summary_chars = tracing::field::Empty))]
pub async fn match_handler<S, C>(
    State(state): State<HandlerState<S, C>>,
    Json(request): Json<MatchRequest>,
) -> Result<Response, GatewayError>
where
    S: TrialStore + 'static,
    C: AuditClient + 'static,
{
    let summary = request.summary.trim();
    if summary.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "`summary` must be non-empty".to_string(),
        ));
    }
    tracing::Span::current().record("summary_chars", summary.chars().count());

    let response = state
        .pipeline
        .match_patient(summary)
        .await
        .map_err(|e| match e {
            PipelineError::StoreUnavailable => {
                warn!("match request rejected: trial store unavailable");
                GatewayError::StoreUnavailable
            }
            PipelineError::RetrievalFailed { source } => {
                GatewayError::RetrievalFailed(source.to_string())
            }
        })?;

    info!(matches = response.matches.len(), "match request completed");

    let body = MatchResponseBody {
        matches: response.matches.into_iter().map(MatchEntry::from).collect(),
    };

    Ok((StatusCode::OK, Json(body)).into_response())
}
