//! BotGate: layered bot detection for login flows.
//!
//! Classifies each submitted login attempt as human or automated:
//! - **Local checks**: a fixed ordered battery of deterministic automation
//!   signatures (honeypot bait field, zero-dimension "ghost" window,
//!   hidden-document "vampire" submission). The first trip is terminal and
//!   yields a confidence-100 bot verdict without any network cost.
//! - **Remote classification**: when every local check passes, the
//!   behavioral telemetry payload is sent to the statistical classifier
//!   service and its response becomes the verdict, unmodified.
//!
//! The resulting [`Verdict`] routes the attempt to one of exactly two
//! destinations: `proceed` (human path) or `challenge` (captcha).
//!
//! Uses structured logging via [`tracing`]; every tripped local check emits
//! a distinguishing warning. Set `RUST_LOG` in the host to control
//! verbosity (e.g., `RUST_LOG=botgate=debug`).

pub mod checks;
pub mod classifier;
pub mod pipeline;
pub mod telemetry;
pub mod verdict;

pub use checks::{
    run_local_checks, EnvironmentProbe, FormState, LocalCheck, StaticProbe, VisibilityState,
};
pub use classifier::{Classifier, ClassifyError, RemoteClassifier};
pub use pipeline::{GateConfig, GateError, LoginGate, DEFAULT_LOCAL_VERDICT_DELAY};
pub use telemetry::{TelemetryPayload, TelemetrySource};
pub use verdict::{Destination, FeatureReport, Verdict, VerdictSource};
