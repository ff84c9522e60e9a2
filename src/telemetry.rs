//! Telemetry Collector boundary.
//!
//! The behavioral collector (mouse/keyboard/timing capture) is an external
//! collaborator; this module only fixes its output contract. The payload is
//! opaque to the pipeline and is serialized verbatim as the classifier
//! request body.

use serde::{Deserialize, Serialize};

/// Snapshot of behavioral features for one submission: a mapping of feature
/// name to numeric/categorical value. The pipeline never inspects it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct TelemetryPayload(pub serde_json::Map<String, serde_json::Value>);

/// Source of telemetry payloads.
///
/// `snapshot` must be cheap and non-blocking; the pipeline calls it at most
/// once per submission, and only after every local check has passed; a
/// short-circuited submission never pays for payload assembly.
pub trait TelemetrySource {
    fn snapshot(&self) -> TelemetryPayload;
}

impl TelemetryPayload {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
