//! Retry-protected eligibility audits against the external reasoning service.

pub mod auditor;
pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod request;
pub mod retry;

#[cfg(test)]
mod tests;

pub use auditor::Auditor;
pub use client::{AuditClient, GenaiAuditClient};
pub use error::AuditError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockAuditClient;
pub use request::{
    AUDIT_ERROR_MARKER, AuditOutcome, AuditRequest, MAX_ELIGIBILITY_CHARS, truncate_chars,
};
pub use retry::RetryPolicy;
