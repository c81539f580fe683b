//! Contact form — a one-shot submission through the same relay.
//!
//! Unlike the chat dialogue, the form waits for the relay and shows its
//! verdict to the visitor.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use crate::dialogue::Answers;
use crate::error::RelayError;
use crate::relay::routes::relay_status;
use crate::relay::{LeadRelay, RelayResponse};

/// Intent recorded for leads that arrive through the form.
pub const CONTACT_INTENT: &str = "Contact form";

/// Shown to the visitor when the relay accepts the message.
pub const CONTACT_SENT: &str = "Your message has been sent successfully. Thank you!";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

impl ContactForm {
    fn to_answers(&self) -> Answers {
        Answers {
            looking_for: CONTACT_INTENT.to_string(),
            name: self.name.clone(),
            email: self.email.clone(),
            company: "N/A".to_string(),
            role: "N/A".to_string(),
            details: self.message.clone(),
        }
    }
}

/// Send the form and wait for the relay's answer.
pub async fn submit_contact(relay: &dyn LeadRelay, form: &ContactForm) -> Result<String, RelayError> {
    let response = relay.submit(&form.to_answers()).await.inspect_err(|e| {
        tracing::warn!(error = %e, "Contact form submission failed");
    })?;
    tracing::info!(message = %response.message, "Contact form delivered");
    Ok(CONTACT_SENT.to_string())
}

#[derive(Clone)]
pub struct ContactRouteState {
    pub relay: Arc<dyn LeadRelay>,
}

/// POST /api/contact
async fn post_contact(
    State(state): State<ContactRouteState>,
    Json(form): Json<ContactForm>,
) -> impl IntoResponse {
    match submit_contact(state.relay.as_ref(), &form).await {
        Ok(message) => (axum::http::StatusCode::OK, Json(RelayResponse::ok(message))),
        Err(e) => (relay_status(&e), Json(RelayResponse::rejected(e.user_message()))),
    }
}

pub fn contact_routes(state: ContactRouteState) -> Router {
    Router::new()
        .route("/api/contact", post(post_contact))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    struct FixedRelay {
        outcome: Result<RelayResponse, RelayError>,
        seen: Mutex<Vec<Answers>>,
    }

    #[async_trait]
    impl LeadRelay for FixedRelay {
        async fn submit(&self, answers: &Answers) -> Result<RelayResponse, RelayError> {
            self.seen.lock().unwrap().push(answers.clone());
            match &self.outcome {
                Ok(r) => Ok(r.clone()),
                Err(RelayError::Rejected { status, message }) => Err(RelayError::Rejected {
                    status: *status,
                    message: message.clone(),
                }),
                Err(e) => Err(RelayError::Transport(e.to_string())),
            }
        }
    }

    fn form() -> ContactForm {
        ContactForm {
            name: "Jane".into(),
            email: "jane@example.com".into(),
            message: "Let's talk".into(),
        }
    }

    #[tokio::test]
    async fn accepted_form_maps_message_to_details() {
        let relay = FixedRelay {
            outcome: Ok(RelayResponse::ok("Lead captured and email sent.")),
            seen: Mutex::new(Vec::new()),
        };
        let message = submit_contact(&relay, &form()).await.unwrap();
        assert_eq!(message, CONTACT_SENT);

        let seen = relay.seen.lock().unwrap();
        assert_eq!(seen[0].looking_for, CONTACT_INTENT);
        assert_eq!(seen[0].details, "Let's talk");
        assert_eq!(seen[0].company, "N/A");
    }

    #[tokio::test]
    async fn rejection_surfaces_relay_message() {
        let relay = FixedRelay {
            outcome: Err(RelayError::Rejected {
                status: 400,
                message: "Invalid name or email.".into(),
            }),
            seen: Mutex::new(Vec::new()),
        };
        let err = submit_contact(&relay, &form()).await.unwrap_err();
        assert_eq!(err.user_message(), "Invalid name or email.");
        assert_eq!(relay_status(&err), axum::http::StatusCode::BAD_REQUEST);
    }
}
