//! Local Signal Evaluator: deterministic automation signatures.
//!
//! Three cheap checks run against the submitted form and the ambient
//! browser environment before the pipeline commits to the expensive remote
//! classification path. Each check is an independent predicate mapped to a
//! fixed synthetic [`Verdict`]; they are evaluated strictly in
//! [`LocalCheck::ORDER`] and the first trip is terminal: later checks
//! never execute and no classifier request is issued.
//!
//! Environment state (window dimensions, document visibility) is read
//! through the [`EnvironmentProbe`] capability so hosts can wire in their
//! embedding and tests can substitute deterministic fakes.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::verdict::Verdict;

// ---------------------------------------------------------------------------
// Submission inputs
// ---------------------------------------------------------------------------

/// Field values captured from the login form at submission time.
///
/// Identity fields are carried opaquely; only `bait` participates in
/// detection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormState {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub aadhaar: String,
    /// The honeypot field. Rendered in markup as an innocuous optional
    /// input (zero size, off-screen stacking, out of tab order, autofill
    /// disabled) so no human ever reaches it. Any content here means
    /// automation filled every field indiscriminately.
    #[serde(default)]
    pub bait: String,
}

/// Document visibility at the moment of submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityState {
    Visible,
    Hidden,
}

// ---------------------------------------------------------------------------
// Environment probe
// ---------------------------------------------------------------------------

/// Ambient browser/session state, read synchronously once per check per
/// submission. Implementations must not block.
pub trait EnvironmentProbe {
    /// Outer width of the browser window as reported by the environment.
    fn outer_width(&self) -> u32;
    /// Outer height of the browser window as reported by the environment.
    fn outer_height(&self) -> u32;
    /// Document visibility state at the moment of submission.
    fn visibility(&self) -> VisibilityState;
}

/// Fixed-value probe for hosts with snapshot semantics and for tests.
#[derive(Debug, Clone, Copy)]
pub struct StaticProbe {
    pub outer_width: u32,
    pub outer_height: u32,
    pub visibility: VisibilityState,
}

impl StaticProbe {
    /// A plausible interactive-browser environment.
    pub fn interactive() -> Self {
        Self {
            outer_width: 1280,
            outer_height: 800,
            visibility: VisibilityState::Visible,
        }
    }
}

impl EnvironmentProbe for StaticProbe {
    fn outer_width(&self) -> u32 {
        self.outer_width
    }

    fn outer_height(&self) -> u32 {
        self.outer_height
    }

    fn visibility(&self) -> VisibilityState {
        self.visibility
    }
}

// ---------------------------------------------------------------------------
// The check battery
// ---------------------------------------------------------------------------

/// The ordered battery of deterministic checks. Immutable: each check maps
/// to one fixed synthetic verdict and checks are never combined or scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalCheck {
    /// Honeypot: the invisible bait field came back non-empty.
    BaitField,
    /// Ghost window: the environment reports a zero outer dimension.
    GhostWindow,
    /// Vampire: the document was hidden at the moment of submission.
    HiddenDocument,
}

impl LocalCheck {
    /// Evaluation order. Precedence matters: when several conditions hold
    /// at once the emitted verdict must name the first check in this list.
    pub const ORDER: [LocalCheck; 3] = [
        LocalCheck::BaitField,
        LocalCheck::GhostWindow,
        LocalCheck::HiddenDocument,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::BaitField => "honeypot",
            Self::GhostWindow => "ghost_window",
            Self::HiddenDocument => "vampire",
        }
    }

    /// The free-text note carried by this check's verdict.
    pub fn note(self) -> &'static str {
        match self {
            Self::BaitField => "Honeypot Trap Triggered",
            Self::GhostWindow => "Headless Browser (Ghost Window)",
            Self::HiddenDocument => "Background Script (Vampire)",
        }
    }

    /// One live environment read, no debouncing.
    fn tripped(self, form: &FormState, probe: &dyn EnvironmentProbe) -> bool {
        match self {
            Self::BaitField => !form.bait.is_empty(),
            Self::GhostWindow => probe.outer_width() == 0 || probe.outer_height() == 0,
            Self::HiddenDocument => probe.visibility() == VisibilityState::Hidden,
        }
    }

    /// The fixed synthetic verdict this check emits when tripped.
    pub fn verdict(self) -> Verdict {
        Verdict::local_bot(self.note())
    }
}

/// Run the battery in fixed order against live state.
///
/// Returns the first tripped check's verdict, or `None` when every check
/// passes and the submission should continue to remote classification.
/// A trip is terminal: subsequent checks are not evaluated.
pub fn run_local_checks(form: &FormState, probe: &dyn EnvironmentProbe) -> Option<Verdict> {
    for check in LocalCheck::ORDER {
        if check.tripped(form, probe) {
            warn!(
                check = check.name(),
                note = check.note(),
                "local check tripped, classifying as bot without remote call"
            );
            return Some(check.verdict());
        }
    }
    None
}
