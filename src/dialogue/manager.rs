//! DialogueManager — owns open sessions and carries out engine effects.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::engine::{self, Effect};
use super::model::{Answers, Message, Session};
use super::state::Step;
use crate::error::DialogueError;
use crate::relay::LeadRelay;

/// Produces replies for questions asked after the lead is complete.
pub trait FreeFormResponder: Send + Sync {
    fn respond(&self, question: &str, answers: &Answers) -> String;
}

/// Always answers with the same text.
pub struct CannedResponder {
    reply: String,
}

impl CannedResponder {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

impl FreeFormResponder for CannedResponder {
    fn respond(&self, _question: &str, _answers: &Answers) -> String {
        self.reply.clone()
    }
}

/// Session state returned to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub current_step: Step,
    pub complete: bool,
    pub transcript: Vec<Message>,
}

impl From<&Session> for SessionSnapshot {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id,
            current_step: session.current_step,
            complete: session.is_complete(),
            transcript: session.transcript.clone(),
        }
    }
}

/// Result of one `submit` call.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitReply {
    #[serde(flatten)]
    pub session: SessionSnapshot,
    /// Lines appended by this call, in order.
    pub appended: Vec<Message>,
}

/// Coordinates every open dialogue.
///
/// Each session sits behind its own mutex, so overlapping `submit` calls for
/// one session queue up and each step's field is written exactly once.
pub struct DialogueManager {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>,
    relay: Arc<dyn LeadRelay>,
    responder: Arc<dyn FreeFormResponder>,
}

impl DialogueManager {
    pub fn new(relay: Arc<dyn LeadRelay>, responder: Arc<dyn FreeFormResponder>) -> Arc<Self> {
        Arc::new(Self {
            sessions: RwLock::new(HashMap::new()),
            relay,
            responder,
        })
    }

    /// Open a new session and greet the visitor.
    pub async fn open(&self) -> SessionSnapshot {
        let mut session = Session::new();
        engine::start(&mut session);
        let snapshot = SessionSnapshot::from(&session);

        info!(session_id = %session.id, "Dialogue opened");
        self.sessions
            .write()
            .await
            .insert(session.id, Arc::new(Mutex::new(session)));
        snapshot
    }

    /// Feed one visitor line into a session.
    pub async fn submit(&self, id: Uuid, text: &str) -> Result<SubmitReply, DialogueError> {
        let handle = self.session(id).await?;
        let mut session = handle.lock().await;

        let effects = engine::submit(&mut session, text);
        let mut appended = Vec::new();

        for effect in effects {
            match effect {
                Effect::Appended(message) => appended.push(message),
                Effect::RelayRequested(answers) => self.dispatch_relay(id, answers),
                Effect::FreeForm(question) => {
                    let reply = Message::bot(self.responder.respond(&question, &session.answers));
                    session.transcript.push(reply.clone());
                    appended.push(reply);
                }
            }
        }

        if !appended.is_empty() {
            debug!(session_id = %id, step = %session.current_step, "Dialogue advanced");
        }

        Ok(SubmitReply {
            session: SessionSnapshot::from(&*session),
            appended,
        })
    }

    /// Start the session over from the first question.
    pub async fn reset(&self, id: Uuid) -> Result<SessionSnapshot, DialogueError> {
        let handle = self.session(id).await?;
        let mut session = handle.lock().await;
        engine::reset(&mut session);
        info!(session_id = %id, "Dialogue reset");
        Ok(SessionSnapshot::from(&*session))
    }

    /// Discard a session. Returns false if it was not open.
    pub async fn close(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!(session_id = %id, "Dialogue closed");
        }
        removed
    }

    pub async fn snapshot(&self, id: Uuid) -> Result<SessionSnapshot, DialogueError> {
        let handle = self.session(id).await?;
        let session = handle.lock().await;
        Ok(SessionSnapshot::from(&*session))
    }

    /// Number of open sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop sessions with no activity for longer than `max_idle`.
    pub async fn sweep_idle(&self, max_idle: Duration) -> usize {
        let Some(cutoff) = chrono::Duration::from_std(max_idle)
            .ok()
            .and_then(|idle| Utc::now().checked_sub_signed(idle))
        else {
            return 0;
        };
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        // A locked session is mid-submit, so it is active.
        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(session) => session.last_active_at >= cutoff,
            Err(_) => true,
        });

        let removed = before - sessions.len();
        if removed > 0 {
            info!(removed, remaining = sessions.len(), "Swept idle dialogues");
        }
        removed
    }

    async fn session(&self, id: Uuid) -> Result<Arc<Mutex<Session>>, DialogueError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(DialogueError::SessionNotFound { id })
    }

    /// Hand the answers to the relay without waiting for the outcome.
    fn dispatch_relay(&self, session_id: Uuid, answers: Answers) {
        let relay = Arc::clone(&self.relay);
        info!(session_id = %session_id, "Dialogue complete, forwarding lead");
        tokio::spawn(async move {
            match relay.submit(&answers).await {
                Ok(response) => {
                    info!(session_id = %session_id, message = %response.message, "Relay accepted lead");
                }
                Err(e) => {
                    warn!(session_id = %session_id, error = %e, "Relay submission failed");
                }
            }
        });
    }
}

/// Periodically discard idle sessions.
pub fn spawn_idle_sweep(
    manager: Arc<DialogueManager>,
    max_idle: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            manager.sweep_idle(max_idle).await;
        }
    })
}
