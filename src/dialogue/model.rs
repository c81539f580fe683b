//! Session, answer and transcript types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::Step;

/// Who wrote a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Bot,
    User,
}

/// One transcript line. Display only; never read back into the dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub origin: Origin,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            origin: Origin::Bot,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            origin: Origin::User,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }
}

/// The six collected fields, in relay wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answers {
    pub looking_for: String,
    pub name: String,
    pub email: String,
    pub company: String,
    pub role: String,
    pub details: String,
}

impl Answers {
    fn slot_mut(&mut self, step: Step) -> Option<&mut String> {
        match step {
            Step::LookingFor => Some(&mut self.looking_for),
            Step::Name => Some(&mut self.name),
            Step::Email => Some(&mut self.email),
            Step::Company => Some(&mut self.company),
            Step::Role => Some(&mut self.role),
            Step::Details => Some(&mut self.details),
            Step::Complete => None,
        }
    }

    /// Write the answer for `step`. Returns false for `Complete`, which has no field.
    pub fn set(&mut self, step: Step, value: String) -> bool {
        match self.slot_mut(step) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Read the answer for `step`.
    pub fn get(&self, step: Step) -> Option<&str> {
        let value = match step {
            Step::LookingFor => &self.looking_for,
            Step::Name => &self.name,
            Step::Email => &self.email,
            Step::Company => &self.company,
            Step::Role => &self.role,
            Step::Details => &self.details,
            Step::Complete => return None,
        };
        Some(value.as_str())
    }
}

/// State of one open dialogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub current_step: Step,
    pub answers: Answers,
    pub transcript: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            current_step: Step::default(),
            answers: Answers::default(),
            transcript: Vec::new(),
            created_at: now,
            last_active_at: now,
        }
    }

    /// Whether every field has been collected.
    pub fn is_complete(&self) -> bool {
        self.current_step.is_terminal()
    }

    pub(crate) fn touch(&mut self) {
        self.last_active_at = Utc::now();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
