use crate::trialstore::TrialDocument;

/// Cap on eligibility text included in a prompt, in characters.
///
/// Eligibility sections on the registry can run to tens of thousands of
/// characters; the cap bounds request size without losing the inclusion
/// criteria, which lead the section.
pub const MAX_ELIGIBILITY_CHARS: usize = 2500;

/// One audit request: a patient case paired with a candidate trial.
///
/// Created per candidate, consumed by a single reasoning-service call chain,
/// then discarded.
#[derive(Debug, Clone)]
pub struct AuditRequest {
    /// Free-text patient case, passed through unparsed.
    pub patient_summary: String,
    /// The candidate under audit.
    pub trial: TrialDocument,
    /// Eligibility text capped at [`MAX_ELIGIBILITY_CHARS`].
    pub truncated_eligibility: String,
}

impl AuditRequest {
    pub fn new(patient_summary: &str, trial: TrialDocument) -> Self {
        let truncated_eligibility =
            truncate_chars(&trial.eligibility_text, MAX_ELIGIBILITY_CHARS).to_string();

        Self {
            patient_summary: patient_summary.to_string(),
            trial,
            truncated_eligibility,
        }
    }

    /// Renders the prompt sent to the reasoning service.
    pub fn prompt(&self) -> String {
        format!(
            "Act as a clinical trial auditor.\n\
             Patient: {}\n\
             Trial phase: {}\n\
             Criteria: {}\n\n\
             Is the patient eligible for this trial? Begin your answer with \
             ELIGIBLE, NOT-ELIGIBLE, or UNCERTAIN, then explain why.",
            self.patient_summary, self.trial.phase, self.truncated_eligibility,
        )
    }
}

/// Truncates `text` to at most `max_chars` characters, never splitting a
/// code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Terminal result of auditing one candidate.
///
/// A failed audit is represented here as data, never as an error that could
/// unwind across the pipeline join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditOutcome {
    /// Registry id of the audited trial.
    pub nct_id: String,
    /// Trial title.
    pub title: String,
    /// Trial phase label.
    pub phase: String,
    /// Registry URL.
    pub url: String,
    /// Raw reasoning-service verdict, or a marked error description.
    pub verdict: String,
    /// `true` when the verdict is a synthesized failure message.
    pub failed: bool,
}

/// Prefix on the verdict of a failed audit.
pub const AUDIT_ERROR_MARKER: &str = "\u{26a0}\u{fe0f} audit error";

impl AuditOutcome {
    /// Outcome for a completed audit.
    pub fn success(trial: &TrialDocument, verdict: String) -> Self {
        Self {
            nct_id: trial.nct_id.clone(),
            title: trial.title.clone(),
            phase: trial.phase.clone(),
            url: trial.url.clone(),
            verdict,
            failed: false,
        }
    }

    /// Synthesized outcome for an audit that could not be completed.
    pub fn failure(trial: &TrialDocument, description: &str) -> Self {
        Self {
            nct_id: trial.nct_id.clone(),
            title: trial.title.clone(),
            phase: trial.phase.clone(),
            url: trial.url.clone(),
            verdict: format!("{}: {}", AUDIT_ERROR_MARKER, description),
            failed: true,
        }
    }
}
