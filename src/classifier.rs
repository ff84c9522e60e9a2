//! Remote classifier client.
//!
//! Sends the telemetry payload to the statistical classification service
//! and parses its response into a [`Verdict`]. The [`RemoteClassifier`]
//! defaults to the local service endpoint at `http://127.0.0.1:5000/predict`
//! and can be customized via [`RemoteClassifier::with_endpoint`].
//!
//! Parsing is strict: a response that reaches us but lacks any required
//! verdict field is a [`ClassifyError::Malformed`], handled exactly like a
//! transport failure. Defaulting the missing fields would fabricate an
//! `isBot` signal the service never produced.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::telemetry::TelemetryPayload;
use crate::verdict::{Verdict, CONFIDENCE_MAX, CONFIDENCE_MIN};

const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/predict";

/// Classification failure, surfaced to the user as a recoverable advisory.
/// The pipeline returns to idle; the user may resubmit.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// Connection refused/unreachable, or the request never completed.
    #[error("classifier service unreachable; ensure the classification service is running")]
    Transport(#[source] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("classifier service returned HTTP {status}")]
    Status { status: reqwest::StatusCode },

    /// The body was not a well-formed verdict (non-JSON, missing required
    /// fields, or an out-of-range confidence score).
    #[error("classifier response was not a valid verdict: {reason}")]
    Malformed { reason: String },
}

/// A classification backend: one request per non-short-circuited submission.
///
/// Requests are not idempotent (the service may log or otherwise record
/// each call), so implementations must not retry internally.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, payload: &TelemetryPayload) -> Result<Verdict, ClassifyError>;
}

/// HTTP client for the classification service.
pub struct RemoteClassifier {
    endpoint: String,
    client: reqwest::Client,
}

impl Default for RemoteClassifier {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

impl RemoteClassifier {
    /// Create a client against the default local endpoint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client against a custom endpoint.
    pub fn with_endpoint(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Opt into a per-request timeout.
    ///
    /// The default is the original unbounded wait: a hung request holds the
    /// pipeline busy until the network layer resolves or errors. An elapsed
    /// timeout surfaces as [`ClassifyError::Transport`]; no failure verdict
    /// is fabricated.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("client with timeout");
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Strictly parse a classifier response body into a verdict.
///
/// Rejects non-JSON bodies, bodies missing required fields, and confidence
/// scores outside [0, 100] (accepting one would violate the verdict
/// invariant; clamping would modify the response).
pub(crate) fn parse_verdict(body: &str) -> Result<Verdict, ClassifyError> {
    let verdict: Verdict =
        serde_json::from_str(body).map_err(|e| ClassifyError::Malformed {
            reason: e.to_string(),
        })?;

    let score = verdict.confidence_score;
    if !score.is_finite() || !(CONFIDENCE_MIN..=CONFIDENCE_MAX).contains(&score) {
        return Err(ClassifyError::Malformed {
            reason: format!("confidenceScore {} outside [0, 100]", score),
        });
    }

    Ok(verdict)
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn classify(&self, payload: &TelemetryPayload) -> Result<Verdict, ClassifyError> {
        debug!(endpoint = %self.endpoint, "sending telemetry payload for classification");

        let resp = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(ClassifyError::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClassifyError::Status { status });
        }

        let body = resp.text().await.map_err(ClassifyError::Transport)?;
        let verdict = parse_verdict(&body)?;

        debug!(
            is_bot = verdict.is_bot,
            confidence = verdict.confidence_score,
            note = %verdict.features_calculated.note,
            "classifier verdict received"
        );

        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_verdict() {
        let body = r#"{
            "isBot": false,
            "confidenceScore": 12.5,
            "featuresCalculated": { "efficiency": 0.8, "note": "mlp-v2" }
        }"#;
        let v = parse_verdict(body).unwrap();
        assert!(!v.is_bot);
        assert_eq!(v.confidence_score, 12.5);
    }

    #[test]
    fn test_parse_non_json_body_is_malformed() {
        let err = parse_verdict("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, ClassifyError::Malformed { .. }));
    }

    #[test]
    fn test_parse_missing_fields_is_malformed() {
        // Parses as JSON but lacks required verdict fields; must not be
        // defaulted into a fabricated verdict.
        let err = parse_verdict(r#"{"isBot": true}"#).unwrap_err();
        assert!(matches!(err, ClassifyError::Malformed { .. }));

        let err = parse_verdict(r#"{"status": "ok"}"#).unwrap_err();
        assert!(matches!(err, ClassifyError::Malformed { .. }));
    }

    #[test]
    fn test_parse_out_of_range_confidence_is_malformed() {
        let body = r#"{
            "isBot": true,
            "confidenceScore": 250.0,
            "featuresCalculated": { "note": "x" }
        }"#;
        let err = parse_verdict(body).unwrap_err();
        assert!(matches!(err, ClassifyError::Malformed { .. }));

        let negative = r#"{
            "isBot": true,
            "confidenceScore": -1.0,
            "featuresCalculated": { "note": "x" }
        }"#;
        assert!(parse_verdict(negative).is_err());
    }

    #[test]
    fn test_endpoint_configuration() {
        assert_eq!(
            RemoteClassifier::new().endpoint(),
            "http://127.0.0.1:5000/predict"
        );
        assert_eq!(
            RemoteClassifier::with_endpoint("http://10.0.0.2:9000/classify").endpoint(),
            "http://10.0.0.2:9000/classify"
        );
    }

    #[test]
    fn test_error_display_is_advisory() {
        let err = ClassifyError::Malformed {
            reason: "missing field `isBot`".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("not a valid verdict"));
    }
}
