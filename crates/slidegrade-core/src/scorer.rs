//! Score computation from a detection outcome.

use serde::{Deserialize, Serialize};

use crate::results::{Credit, Detection, Outcome};

/// Credit awarded for a `PresentButUnverifiable` outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnverifiableCredit {
    /// Plausible is not correct.
    #[default]
    None,
    /// Plausible earns the full weight.
    Full,
}

/// Achieved score for `detection` out of `total`.
///
/// Always within `[0, total]`; a negative or non-finite total counts as 0.
pub fn score(detection: &Detection, total: f64, policy: UnverifiableCredit) -> f64 {
    let total = clamp_total(total);
    let raw = match (detection.outcome, detection.credit) {
        (_, Credit::Partial { of: 0, .. }) => 0.0,
        (Outcome::Matched | Outcome::NotMatched, Credit::Partial { matched, of }) => {
            total * matched.min(of) as f64 / of as f64
        }
        (Outcome::Matched, Credit::Binary) => total,
        (Outcome::PresentButUnverifiable, _) => match policy {
            UnverifiableCredit::Full => total,
            UnverifiableCredit::None => 0.0,
        },
        (Outcome::NotMatched | Outcome::Errored, _) => 0.0,
    };
    raw.clamp(0.0, total)
}

/// Score weights are non-negative and finite.
pub fn clamp_total(total: f64) -> f64 {
    if total.is_finite() && total > 0.0 {
        total
    } else {
        0.0
    }
}
