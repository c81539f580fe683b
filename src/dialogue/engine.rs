//! Pure dialogue transitions.
//!
//! `start`, `submit` and `reset` mutate a `Session` and return the effects the
//! caller must carry out. Nothing here performs I/O, so the whole flow runs in
//! plain unit tests.

use super::model::{Answers, Message, Session};
use super::prompts::{normalize_answer, prompt_for};
use super::state::Step;

/// Something the caller must act on (or may render) after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// A line was appended to the transcript.
    Appended(Message),
    /// The dialogue just completed; forward these answers to the relay once.
    RelayRequested(Answers),
    /// Input arrived after completion and needs a free-form reply.
    FreeForm(String),
}

/// Greet the visitor. A session that already has a transcript is left alone.
pub fn start(session: &mut Session) -> Vec<Effect> {
    if !session.transcript.is_empty() {
        return Vec::new();
    }
    vec![append(session, Message::bot(prompt_for(session.current_step)))]
}

/// Accept one visitor line.
pub fn submit(session: &mut Session, raw: &str) -> Vec<Effect> {
    let text = raw.trim();
    if text.is_empty() {
        return Vec::new();
    }
    session.touch();

    let mut effects = vec![append(session, Message::user(text))];

    let step = session.current_step;
    if step.is_terminal() {
        effects.push(Effect::FreeForm(text.to_string()));
        return effects;
    }

    session.answers.set(step, normalize_answer(text));

    let next = step.next();
    debug_assert!(step.can_transition_to(next));
    session.current_step = next;

    if next.is_terminal() {
        effects.push(Effect::RelayRequested(session.answers.clone()));
    }
    effects.push(append(session, Message::bot(prompt_for(next))));
    effects
}

/// Throw away all progress and greet again.
pub fn reset(session: &mut Session) -> Vec<Effect> {
    session.current_step = Step::default();
    session.answers = Answers::default();
    session.transcript.clear();
    session.touch();
    start(session)
}

fn append(session: &mut Session, message: Message) -> Effect {
    session.transcript.push(message.clone());
    Effect::Appended(message)
}
