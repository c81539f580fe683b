//! Dialogue state machine — which question the visitor is answering.

use serde::{Deserialize, Serialize};

use super::prompts::STEPS;

/// The steps of the lead-collection dialogue.
///
/// Progresses linearly in the order of [`STEPS`]: LookingFor → Name → Email →
/// Company → Role → Details → Complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    LookingFor,
    Name,
    Email,
    Company,
    Role,
    Details,
    Complete,
}

impl Step {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: Step) -> bool {
        !self.is_terminal() && self.next() == target
    }

    /// Whether the dialogue has finished collecting fields.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// The following row of the question table. `Complete` loops onto itself.
    pub fn next(&self) -> Step {
        STEPS
            .iter()
            .position(|spec| spec.step == *self)
            .and_then(|i| STEPS.get(i + 1))
            .map_or(Step::Complete, |spec| spec.step)
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::LookingFor => "looking_for",
            Self::Name => "name",
            Self::Email => "email",
            Self::Company => "company",
            Self::Role => "role",
            Self::Details => "details",
            Self::Complete => "complete",
        };
        write!(f, "{s}")
    }
}
