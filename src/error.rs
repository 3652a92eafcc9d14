//! Error types for the aggregation layer

use std::time::Duration;
use thiserror::Error;

/// Failure of a single upstream provider call.
///
/// Errors of this type are always absorbed at the aggregation layer: the
/// affected quantity is replaced with synthetic data and the failure is
/// recorded in the provider health counters. They never reach snapshot
/// consumers.
#[derive(Error, Debug, Clone)]
pub enum UpstreamError {
    /// Transport-level failure or unexpected HTTP status
    #[error("network failure: {0}")]
    Network(String),

    /// Credentials rejected by the upstream
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// Call exceeded the per-provider deadline
    #[error("request deadline of {0:?} exceeded")]
    Timeout(Duration),

    /// Response arrived but could not be decoded into the expected shape
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl UpstreamError {
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network(message.into())
    }

    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::Malformed(message.into())
    }

    /// Classify a transport error against the deadline configured for the
    /// client that produced it. Deadline expiry is indistinguishable from
    /// any other network failure for callers; both end in fallback.
    pub fn from_reqwest(err: reqwest::Error, deadline: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(deadline)
        } else if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }

    /// Classify a non-success HTTP status.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        match status.as_u16() {
            401 | 403 => Self::Auth(format!("upstream returned {status}: {body}")),
            _ => Self::Network(format!("upstream returned {status}: {body}")),
        }
    }
}

/// Defect in merge or compute logic during snapshot construction.
///
/// Fatal to the current aggregation cycle only; the previously published
/// snapshot remains the last known good until the next cycle attempt.
/// Upstream unavailability is never reported through this type.
#[derive(Error, Debug)]
pub enum AggregationError {
    #[error("internal invariant violated: {0}")]
    InvariantViolated(String),
}

impl AggregationError {
    pub fn invariant<S: Into<String>>(message: S) -> Self {
        Self::InvariantViolated(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let net = UpstreamError::network("connection refused");
        assert!(matches!(net, UpstreamError::Network(_)));

        let bad = UpstreamError::malformed("unexpected field type");
        assert!(matches!(bad, UpstreamError::Malformed(_)));

        let agg = AggregationError::invariant("forecast arity");
        assert!(matches!(agg, AggregationError::InvariantViolated(_)));
    }

    #[test]
    fn test_status_classification() {
        let auth = UpstreamError::from_status(reqwest::StatusCode::UNAUTHORIZED, "bad key");
        assert!(matches!(auth, UpstreamError::Auth(_)));

        let auth = UpstreamError::from_status(reqwest::StatusCode::FORBIDDEN, "");
        assert!(matches!(auth, UpstreamError::Auth(_)));

        let net = UpstreamError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(matches!(net, UpstreamError::Network(_)));
    }

    #[test]
    fn test_messages_name_the_failure() {
        let timeout = UpstreamError::Timeout(Duration::from_secs(10));
        assert!(timeout.to_string().contains("deadline"));

        let auth = UpstreamError::from_status(reqwest::StatusCode::UNAUTHORIZED, "expired");
        assert!(auth.to_string().contains("authentication"));
        assert!(auth.to_string().contains("expired"));
    }
}
