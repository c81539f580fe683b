//! LeadDesk — the relay itself: validate, record, notify.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::client::{LeadRelay, RelayResponse};
use super::mailer::{Mailer, compose_acknowledgment, compose_admin_notice};
use super::store::{LeadRecord, LeadStore};
use super::validate::LeadSubmission;
use crate::config::OwnerConfig;
use crate::dialogue::Answers;
use crate::error::RelayError;

/// Message returned for every accepted submission.
pub const CAPTURED: &str = "Lead captured and email sent.";

/// Receives lead submissions, stores them, and mails both parties.
pub struct LeadDesk {
    store: Arc<LeadStore>,
    mailer: Arc<dyn Mailer>,
    owner: OwnerConfig,
}

impl LeadDesk {
    pub fn new(store: Arc<LeadStore>, mailer: Arc<dyn Mailer>, owner: OwnerConfig) -> Self {
        Self {
            store,
            mailer,
            owner,
        }
    }

    pub fn store(&self) -> &LeadStore {
        &self.store
    }

    /// Handle one submission.
    ///
    /// Only validation decides the outcome. Storage and delivery failures are
    /// logged and the submission still counts as captured.
    pub async fn capture(&self, submission: LeadSubmission) -> Result<RelayResponse, RelayError> {
        let lead = submission.validate().inspect_err(|e| {
            info!(error = %e, "Lead submission rejected");
        })?;
        let record = LeadRecord::new(lead);

        if let Err(e) = self.store.append(&record).await {
            error!(lead_id = %record.id, error = %e, "Failed to record lead");
        }

        let notice = compose_admin_notice(&record, &self.owner);
        if let Err(e) = self.mailer.send(notice).await {
            warn!(lead_id = %record.id, error = %e, "Owner notification not sent");
        }

        let ack = compose_acknowledgment(&record, &self.owner);
        if let Err(e) = self.mailer.send(ack).await {
            warn!(lead_id = %record.id, error = %e, "Visitor acknowledgment not sent");
        }

        info!(lead_id = %record.id, "Lead captured");
        Ok(RelayResponse::ok(CAPTURED))
    }
}

#[async_trait]
impl LeadRelay for LeadDesk {
    async fn submit(&self, answers: &Answers) -> Result<RelayResponse, RelayError> {
        self.capture(LeadSubmission::from(answers)).await
    }
}
