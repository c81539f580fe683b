//! The ordered question table that drives the dialogue.

use super::state::Step;

/// Literal a visitor types to pass on an optional question.
pub const SKIP_KEYWORD: &str = "skip";

/// Stored value for a skipped question.
pub const SKIPPED: &str = "N/A";

/// Whether a question expects a real answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    Optional,
}

/// One row of the question table.
#[derive(Debug, Clone, Copy)]
pub struct StepSpec {
    pub step: Step,
    /// Relay field the answer is written to. Empty for `Complete`.
    pub field: &'static str,
    pub prompt: &'static str,
    pub requirement: Requirement,
}

/// Single source of truth for step order, field binding and prompt text.
pub static STEPS: [StepSpec; 7] = [
    StepSpec {
        step: Step::LookingFor,
        field: "lookingFor",
        prompt: "👋 Hi! I'm the site assistant. Before we start, what brings you here today?",
        requirement: Requirement::Required,
    },
    StepSpec {
        step: Step::Name,
        field: "name",
        prompt: "Understood. May I know your name?",
        requirement: Requirement::Required,
    },
    StepSpec {
        step: Step::Email,
        field: "email",
        prompt: "Great! And your email address?",
        requirement: Requirement::Required,
    },
    StepSpec {
        step: Step::Company,
        field: "company",
        prompt: "Which company do you work for? (or type 'skip')",
        requirement: Requirement::Optional,
    },
    StepSpec {
        step: Step::Role,
        field: "role",
        prompt: "What is your role there? (or type 'skip')",
        requirement: Requirement::Optional,
    },
    StepSpec {
        step: Step::Details,
        field: "details",
        prompt: "Any other context you'd like to provide? (or type 'skip')",
        requirement: Requirement::Optional,
    },
    StepSpec {
        step: Step::Complete,
        field: "",
        prompt: "Thank you! I've recorded your details. Feel free to ask me anything else \
                 about the work shown here.",
        requirement: Requirement::Optional,
    },
];

/// Table row for a step.
pub fn spec_for(step: Step) -> &'static StepSpec {
    // Rows are declared in `Step` discriminant order.
    &STEPS[step as usize]
}

/// Every step, in dialogue order.
pub fn step_order() -> impl Iterator<Item = Step> {
    STEPS.iter().map(|spec| spec.step)
}

/// Relay field written at `step`. `None` once the dialogue is complete.
pub fn field_for(step: Step) -> Option<&'static str> {
    Some(spec_for(step).field).filter(|field| !field.is_empty())
}

/// Prompt bound to a step.
pub fn prompt_for(step: Step) -> &'static str {
    spec_for(step).prompt
}

/// Map a trimmed answer to the stored value. `skip` in any casing becomes `N/A`.
pub fn normalize_answer(trimmed: &str) -> String {
    if trimmed.eq_ignore_ascii_case(SKIP_KEYWORD) {
        SKIPPED.to_string()
    } else {
        trimmed.to_string()
    }
}
