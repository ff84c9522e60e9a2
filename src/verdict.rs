//! Verdict data structures for login-attempt classification.
//!
//! This module defines the single output entity of the detection pipeline:
//! the [`Verdict`], its contributing-feature report, and the destination
//! routing contract consumed by the host application.
//!
//! The wire shape matches the remote classifier's JSON response exactly:
//! `{ "isBot": bool, "confidenceScore": number, "featuresCalculated":
//! { ...named numeric features, "note": string } }`. Internally every
//! verdict also carries a [`VerdictSource`] discriminant so callers can
//! tell real model-computed features from the local-check sentinel; the
//! discriminant never appears on the wire.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Inclusive bounds for [`Verdict::confidence_score`].
pub const CONFIDENCE_MIN: f64 = 0.0;
pub const CONFIDENCE_MAX: f64 = 100.0;

/// Confidence assigned to deterministic local-check verdicts.
pub const LOCAL_CHECK_CONFIDENCE: f64 = CONFIDENCE_MAX;

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Which stage of the pipeline produced a verdict.
///
/// `Local` verdicts carry the sentinel feature report, not real computed
/// features; `Remote` verdicts come back from the statistical classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerdictSource {
    /// A deterministic local check tripped; the classifier was never called.
    Local,
    /// The remote statistical classifier scored the telemetry payload.
    #[default]
    Remote,
}

/// Classification result for a single submission attempt.
///
/// Created fresh on every submission, never cached across attempts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub is_bot: bool,
    /// Range [0, 100]; 100 denotes deterministic local-check certainty.
    pub confidence_score: f64,
    pub features_calculated: FeatureReport,
    /// Internal provenance tag; deserialized verdicts are remote by
    /// construction.
    #[serde(skip, default)]
    pub source: VerdictSource,
}

impl Verdict {
    /// Build the fixed synthetic verdict a tripped local check emits:
    /// bot, maximum confidence, sentinel features, the check's note.
    pub fn local_bot(note: &str) -> Self {
        Self {
            is_bot: true,
            confidence_score: LOCAL_CHECK_CONFIDENCE,
            features_calculated: FeatureReport::sentinel(note),
            source: VerdictSource::Local,
        }
    }

    /// Destination tag for the verdict consumer, derived from `is_bot`
    /// alone. Confidence-based nuance is the consumer's concern.
    pub fn destination(&self) -> Destination {
        if self.is_bot {
            Destination::Challenge
        } else {
            Destination::Proceed
        }
    }
}

// ---------------------------------------------------------------------------
// Feature report
// ---------------------------------------------------------------------------

/// Named signal values that contributed to a verdict, plus a free-text
/// `note` naming the rule or model that produced it.
///
/// On the wire the named features and `note` are siblings inside
/// `featuresCalculated`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureReport {
    #[serde(flatten)]
    pub features: BTreeMap<String, f64>,
    pub note: String,
}

impl FeatureReport {
    /// The fixed placeholder report attached to local-check verdicts.
    ///
    /// `efficiency = 1.0, curvature = 0.0` signals "bypassed, not scored":
    /// these are not computed behavioral features.
    pub fn sentinel(note: &str) -> Self {
        let mut features = BTreeMap::new();
        features.insert("efficiency".to_string(), 1.0);
        features.insert("curvature".to_string(), 0.0);
        Self {
            features,
            note: note.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Destination routing
// ---------------------------------------------------------------------------

/// The two destination tags the verdict consumer may redirect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    /// Human path: grant access.
    Proceed,
    /// Bot/uncertain path: challenge with a captcha.
    Challenge,
}

impl Destination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Proceed => "proceed",
            Self::Challenge => "challenge",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_bot_verdict_shape() {
        let v = Verdict::local_bot("Honeypot Trap Triggered");
        assert!(v.is_bot);
        assert_eq!(v.confidence_score, 100.0);
        assert_eq!(v.source, VerdictSource::Local);
        assert_eq!(v.features_calculated.note, "Honeypot Trap Triggered");
        assert_eq!(v.features_calculated.features["efficiency"], 1.0);
        assert_eq!(v.features_calculated.features["curvature"], 0.0);
    }

    #[test]
    fn test_wire_shape_round_trip() {
        let json = r#"{
            "isBot": false,
            "confidenceScore": 12.5,
            "featuresCalculated": {
                "efficiency": 0.73,
                "curvature": 0.41,
                "note": "mlp-v2"
            }
        }"#;

        let v: Verdict = serde_json::from_str(json).unwrap();
        assert!(!v.is_bot);
        assert_eq!(v.confidence_score, 12.5);
        assert_eq!(v.source, VerdictSource::Remote);
        assert_eq!(v.features_calculated.features["curvature"], 0.41);
        assert_eq!(v.features_calculated.note, "mlp-v2");

        // Features and note serialize as siblings inside featuresCalculated
        let out: serde_json::Value = serde_json::to_value(&v).unwrap();
        assert_eq!(out["featuresCalculated"]["efficiency"], 0.73);
        assert_eq!(out["featuresCalculated"]["note"], "mlp-v2");
        assert_eq!(out["isBot"], false);
        assert!(out.get("source").is_none(), "source must not hit the wire");
    }

    #[test]
    fn test_missing_required_fields_fail_to_parse() {
        let missing_is_bot = r#"{"confidenceScore": 1.0, "featuresCalculated": {"note": "x"}}"#;
        assert!(serde_json::from_str::<Verdict>(missing_is_bot).is_err());

        let missing_score = r#"{"isBot": true, "featuresCalculated": {"note": "x"}}"#;
        assert!(serde_json::from_str::<Verdict>(missing_score).is_err());

        let missing_note = r#"{"isBot": true, "confidenceScore": 1.0, "featuresCalculated": {}}"#;
        assert!(serde_json::from_str::<Verdict>(missing_note).is_err());

        let missing_features = r#"{"isBot": true, "confidenceScore": 1.0}"#;
        assert!(serde_json::from_str::<Verdict>(missing_features).is_err());
    }

    #[test]
    fn test_destination_from_is_bot_only() {
        let mut v = Verdict::local_bot("x");
        assert_eq!(v.destination(), Destination::Challenge);
        assert_eq!(v.destination().as_str(), "challenge");

        v.is_bot = false;
        v.confidence_score = 99.9; // confidence must not influence routing
        assert_eq!(v.destination(), Destination::Proceed);
        assert_eq!(v.destination().as_str(), "proceed");
    }
}
