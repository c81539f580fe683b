//! Lead dialogue — the chat widget's scripted question-and-answer flow.
//!
//! The widget walks a visitor through a fixed list of questions, one at a
//! time. Each answer fills one field; after the last one the collected answers
//! are handed to the mail relay exactly once and the dialogue switches to
//! free-form replies.

pub mod engine;
pub mod manager;
pub mod model;
pub mod prompts;
pub mod routes;
pub mod state;

pub use engine::Effect;
pub use manager::{
    CannedResponder, DialogueManager, FreeFormResponder, SessionSnapshot, SubmitReply,
    spawn_idle_sweep,
};
pub use model::{Answers, Message, Origin, Session};
pub use routes::{ChatRouteState, chat_routes};
pub use state::Step;
