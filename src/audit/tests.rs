use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use super::auditor::Auditor;
use super::client::classify_provider_error;
use super::error::AuditError;
use super::mock::MockAuditClient;
use super::request::{
    AUDIT_ERROR_MARKER, AuditRequest, MAX_ELIGIBILITY_CHARS, truncate_chars,
};
use super::retry::RetryPolicy;
use crate::trialstore::TrialDocument;

fn test_trial(nct_id: &str, eligibility: &str) -> TrialDocument {
    TrialDocument {
        nct_id: nct_id.to_string(),
        title: format!("Study {}", nct_id),
        phase: "Phase 2".to_string(),
        url: format!("https://clinicaltrials.gov/study/{}", nct_id),
        eligibility_text: eligibility.to_string(),
        is_domestic: true,
        score: 0.8,
    }
}

mod truncation {
    use super::*;

    #[test]
    fn test_short_text_passes_through() {
        assert_eq!(truncate_chars("short", 2500), "short");
    }

    #[test]
    fn test_exact_length_passes_through() {
        let text = "x".repeat(10);
        assert_eq!(truncate_chars(&text, 10), text.as_str());
    }

    #[test]
    fn test_long_text_is_capped_in_chars() {
        let text = "a".repeat(3000);
        assert_eq!(truncate_chars(&text, 2500).chars().count(), 2500);
    }

    #[test]
    fn test_truncation_never_splits_a_code_point() {
        // Multibyte characters: a byte-indexed cut would panic.
        let text = "é".repeat(3000);
        let truncated = truncate_chars(&text, 2500);
        assert_eq!(truncated.chars().count(), 2500);
        assert!(truncated.chars().all(|c| c == 'é'));
    }
}

mod request {
    use super::*;

    #[test]
    fn test_prompt_includes_case_phase_and_criteria() {
        let trial = test_trial("NCT1", "Adults 18-45, confirmed diagnosis.");
        let request = AuditRequest::new("35F with pelvic pain", trial);
        let prompt = request.prompt();

        assert!(prompt.contains("35F with pelvic pain"));
        assert!(prompt.contains("Phase 2"));
        assert!(prompt.contains("Adults 18-45, confirmed diagnosis."));
    }

    #[test]
    fn test_prompt_carries_verdict_instruction() {
        let request = AuditRequest::new("case", test_trial("NCT1", "criteria"));
        let prompt = request.prompt();

        assert!(prompt.contains("ELIGIBLE"));
        assert!(prompt.contains("NOT-ELIGIBLE"));
        assert!(prompt.contains("UNCERTAIN"));
    }

    #[test]
    fn test_eligibility_is_truncated_at_construction() {
        let long = "c".repeat(MAX_ELIGIBILITY_CHARS + 500);
        let request = AuditRequest::new("case", test_trial("NCT1", &long));

        assert_eq!(
            request.truncated_eligibility.chars().count(),
            MAX_ELIGIBILITY_CHARS
        );
        // The original document is untouched.
        assert_eq!(
            request.trial.eligibility_text.chars().count(),
            MAX_ELIGIBILITY_CHARS + 500
        );
    }
}

mod classification {
    use super::*;

    #[test]
    fn test_rate_limit_and_quota_are_transient() {
        assert!(classify_provider_error("429 Too Many Requests").is_transient());
        assert!(classify_provider_error("RESOURCE_EXHAUSTED: quota exceeded").is_transient());
        assert!(classify_provider_error("model is overloaded").is_transient());
        assert!(classify_provider_error("503 Service Unavailable").is_transient());
        assert!(classify_provider_error("request timed out").is_transient());
    }

    #[test]
    fn test_bad_request_and_auth_are_permanent() {
        assert!(!classify_provider_error("400 Bad Request: invalid payload").is_transient());
        assert!(!classify_provider_error("401 Unauthorized: invalid API key").is_transient());
        assert!(!classify_provider_error("model not found").is_transient());
    }
}

mod retry_policy {
    use super::*;

    #[test]
    fn test_default_wait_curve() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.wait_before(2), Duration::from_secs(2));
        assert_eq!(policy.wait_before(3), Duration::from_secs(4));
        assert_eq!(policy.wait_before(4), Duration::from_secs(8));
        // 16s exponential value clamps to the 10s ceiling.
        assert_eq!(policy.wait_before(5), Duration::from_secs(10));
    }

    #[test]
    fn test_waits_are_non_decreasing_and_bounded() {
        let policy = RetryPolicy::default();
        let mut previous = Duration::ZERO;

        for attempt in 2..=12 {
            let wait = policy.wait_before(attempt);
            assert!(wait >= previous);
            assert!(wait >= policy.min_wait);
            assert!(wait <= policy.max_wait);
            previous = wait;
        }
    }

    #[tokio::test]
    async fn test_transient_exhaustion_uses_exact_attempt_budget() {
        let policy = RetryPolicy::fast();
        let calls = AtomicU32::new(0);

        let result = policy
            .run(|| {
                let calls = &calls;
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<String, _>(AuditError::transient("503 unavailable"))
                }
            })
            .await;

        assert!(matches!(result, Err(AuditError::Transient { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), policy.max_attempts);
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let policy = RetryPolicy::fast();
        let calls = AtomicU32::new(0);

        let result = policy
            .run(|| {
                let calls = &calls;
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<String, _>(AuditError::permanent("401 unauthorized"))
                }
            })
            .await;

        assert!(matches!(result, Err(AuditError::Permanent { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recovery_after_transient_failures() {
        let policy = RetryPolicy::fast();
        let calls = AtomicU32::new(0);

        let result = policy
            .run(|| {
                let calls = &calls;
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    if n < 2 {
                        Err(AuditError::transient("429"))
                    } else {
                        Ok("ELIGIBLE. Criteria satisfied.".to_string())
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "ELIGIBLE. Criteria satisfied.");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}

mod auditor {
    use super::*;

    #[tokio::test]
    async fn test_successful_audit_carries_verdict() {
        let client = MockAuditClient::new();
        client.respond_with("NCT1", "ELIGIBLE. Age and diagnosis match.");
        let auditor = Auditor::new(client, RetryPolicy::fast());

        let outcome = auditor
            .audit("35F with pelvic pain", test_trial("NCT1", "criteria"))
            .await;

        assert!(!outcome.failed);
        assert_eq!(outcome.verdict, "ELIGIBLE. Age and diagnosis match.");
        assert_eq!(outcome.nct_id, "NCT1");
    }

    #[tokio::test]
    async fn test_permanent_failure_becomes_marked_outcome() {
        let client = MockAuditClient::new();
        client.fail_with("NCT1", AuditError::permanent("400 bad request"));
        let auditor = Auditor::new(client.clone(), RetryPolicy::fast());

        let outcome = auditor.audit("case", test_trial("NCT1", "criteria")).await;

        assert!(outcome.failed);
        assert!(outcome.verdict.starts_with(AUDIT_ERROR_MARKER));
        assert!(outcome.verdict.contains("400 bad request"));
        assert_eq!(client.call_count("NCT1"), 1);
    }

    #[tokio::test]
    async fn test_exhausted_retries_become_marked_outcome() {
        let client = MockAuditClient::new();
        client.fail_with("NCT1", AuditError::transient("quota exceeded"));
        let auditor = Auditor::new(client.clone(), RetryPolicy::fast());

        let outcome = auditor.audit("case", test_trial("NCT1", "criteria")).await;

        assert!(outcome.failed);
        assert!(outcome.verdict.starts_with(AUDIT_ERROR_MARKER));
        assert_eq!(client.call_count("NCT1"), 5);
    }

    #[tokio::test]
    async fn test_transient_blip_recovers_within_budget() {
        let client = MockAuditClient::new();
        client.fail_then_succeed(
            "NCT1",
            vec![AuditError::transient("429"), AuditError::transient("429")],
            "NOT-ELIGIBLE. Prior surgery excludes.",
        );
        let auditor = Auditor::new(client.clone(), RetryPolicy::fast());

        let outcome = auditor.audit("case", test_trial("NCT1", "criteria")).await;

        assert!(!outcome.failed);
        assert_eq!(outcome.verdict, "NOT-ELIGIBLE. Prior surgery excludes.");
        assert_eq!(client.call_count("NCT1"), 3);
    }

    #[tokio::test]
    async fn test_repeat_audits_issue_independent_calls() {
        let client = MockAuditClient::new();
        client.respond_with("NCT1", "UNCERTAIN. Missing staging data.");
        let auditor = Auditor::new(client.clone(), RetryPolicy::fast());

        let first = auditor.audit("case", test_trial("NCT1", "criteria")).await;
        let second = auditor.audit("case", test_trial("NCT1", "criteria")).await;

        assert_eq!(first, second);
        assert_eq!(client.call_count("NCT1"), 2);
    }

    #[tokio::test]
    async fn test_unscripted_trial_gets_uncertain_default() {
        let client = MockAuditClient::new();
        let auditor = Auditor::new(client, RetryPolicy::fast());

        let outcome = auditor.audit("case", test_trial("NCT9", "criteria")).await;

        assert!(!outcome.failed);
        assert!(outcome.verdict.starts_with("UNCERTAIN"));
    }
}
