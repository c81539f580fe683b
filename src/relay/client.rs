//! The relay capability the dialogue hands its answers to.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::dialogue::Answers;
use crate::error::RelayError;

/// The relay's JSON reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub success: bool,
    pub message: String,
}

impl RelayResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Forwards a completed set of answers to the mail relay.
#[async_trait]
pub trait LeadRelay: Send + Sync {
    async fn submit(&self, answers: &Answers) -> Result<RelayResponse, RelayError>;
}

/// Relay reached over HTTP.
pub struct HttpRelay {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRelay {
    /// `timeout` bounds the whole request, from connect to the last body byte.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl LeadRelay for HttpRelay {
    async fn submit(&self, answers: &Answers) -> Result<RelayResponse, RelayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(answers)
            .send()
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        let status = response.status();
        let body: RelayResponse = response
            .json()
            .await
            .map_err(|e| RelayError::InvalidResponse(format!("HTTP {status}: {e}")))?;

        if !status.is_success() || !body.success {
            return Err(RelayError::Rejected {
                status: status.as_u16(),
                message: body.message,
            });
        }

        tracing::debug!(endpoint = %self.endpoint, "Relay accepted submission");
        Ok(body)
    }
}
