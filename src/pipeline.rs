//! Verdict Pipeline Controller.
//!
//! [`LoginGate::evaluate`] orchestrates one submission attempt: gate
//! re-entry with the busy flag, run the local check battery in order, and
//! only when every check passes take a telemetry snapshot and issue the
//! single remote classification request. Exactly one [`Verdict`] exists per
//! completed submission cycle; none while one is in flight.
//!
//! The busy flag is cleared unconditionally on every exit path (success,
//! local short-circuit, or classification failure) via a drop guard around
//! the suspension points.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, warn};

use crate::checks::{run_local_checks, EnvironmentProbe, FormState};
use crate::classifier::{Classifier, ClassifyError};
use crate::telemetry::TelemetrySource;
use crate::verdict::Verdict;

/// Delay applied before emitting a local-check verdict, so a short-circuited
/// attempt is indistinguishable from one that went through real analysis.
pub const DEFAULT_LOCAL_VERDICT_DELAY: Duration = Duration::from_millis(500);

/// Pipeline tuning knobs.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Artificial delay on the local-trip path. Deliberate: an instant
    /// verdict would reveal that detection never left the client.
    pub local_verdict_delay: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            local_verdict_delay: DEFAULT_LOCAL_VERDICT_DELAY,
        }
    }
}

/// Pipeline failure, surfaced to the host. Every variant is recoverable by
/// resubmission; nothing here is fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// A classification is already in flight for this form instance.
    #[error("a submission is already being evaluated")]
    Busy,

    /// The remote classifier was unreachable or returned unusable data.
    /// No verdict was produced; the pipeline has returned to idle.
    #[error(transparent)]
    Classification(#[from] ClassifyError),
}

/// The verdict pipeline for one login form instance.
///
/// Generic over the ambient [`EnvironmentProbe`], the external
/// [`TelemetrySource`], and the [`Classifier`] backend so hosts wire in
/// their embedding and tests substitute deterministic fakes.
pub struct LoginGate<P, T, C> {
    probe: P,
    telemetry: T,
    classifier: C,
    config: GateConfig,
    busy: AtomicBool,
}

/// Clears the busy flag when the evaluation region is left on any path.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<P, T, C> LoginGate<P, T, C>
where
    P: EnvironmentProbe,
    T: TelemetrySource,
    C: Classifier,
{
    pub fn new(probe: P, telemetry: T, classifier: C) -> Self {
        Self::with_config(probe, telemetry, classifier, GateConfig::default())
    }

    pub fn with_config(probe: P, telemetry: T, classifier: C, config: GateConfig) -> Self {
        Self {
            probe,
            telemetry,
            classifier,
            config,
            busy: AtomicBool::new(false),
        }
    }

    /// True while a submission is being evaluated. Hosts use this to
    /// disable duplicate submits.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Evaluate one submission attempt.
    ///
    /// Local checks run synchronously in fixed order; the first trip emits
    /// that check's verdict after [`GateConfig::local_verdict_delay`] and no
    /// classifier request is issued. Otherwise the telemetry payload is read
    /// exactly once and classified with exactly one remote request, whose
    /// parsed response is returned unmodified.
    ///
    /// At most one evaluation may be in flight per gate; a call while busy
    /// is rejected with [`GateError::Busy`] without touching the checks or
    /// the classifier.
    pub async fn evaluate(&self, form: &FormState) -> Result<Verdict, GateError> {
        if self.busy.swap(true, Ordering::AcqRel) {
            warn!("submission rejected: evaluation already in flight");
            return Err(GateError::Busy);
        }
        let _busy = BusyGuard(&self.busy);

        if let Some(verdict) = run_local_checks(form, &self.probe) {
            // Disguise the instantaneous local path as real analysis.
            tokio::time::sleep(self.config.local_verdict_delay).await;
            return Ok(verdict);
        }

        let payload = self.telemetry.snapshot();
        debug!("local checks passed, deferring to remote classifier");

        let verdict = self.classifier.classify(&payload).await?;
        Ok(verdict)
    }
}
