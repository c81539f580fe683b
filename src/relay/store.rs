//! Append-only JSON file of captured leads.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use super::validate::ValidLead;
use crate::error::StoreError;

/// Format of `LeadRecord::date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One stored lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: String,
    /// UTC capture time, `YYYY-MM-DD HH:MM:SS`.
    pub date: String,
    pub name: String,
    pub email: String,
    pub company: String,
    pub role: String,
    /// What the visitor is looking for.
    pub intent: String,
    pub details: String,
}

impl LeadRecord {
    /// Tag a validated lead with a fresh id and the current time.
    pub fn new(lead: ValidLead) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date: Utc::now().format(DATE_FORMAT).to_string(),
            name: lead.name,
            email: lead.email,
            company: lead.company,
            role: lead.role,
            intent: lead.looking_for,
            details: lead.details,
        }
    }
}

/// Lead records kept as one pretty-printed JSON array on disk.
pub struct LeadStore {
    path: PathBuf,
    // Held across read-modify-write so concurrent captures never drop a record.
    write_lock: Mutex<()>,
}

impl LeadStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record.
    pub async fn append(&self, record: &LeadRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.read_records().await?;
        records.push(record.clone());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_string_pretty(&records)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| self.io_error(e))?;

        info!(lead_id = %record.id, total = records.len(), "Lead recorded");
        Ok(())
    }

    /// Every stored record, oldest first.
    pub async fn all(&self) -> Result<Vec<LeadRecord>, StoreError> {
        let _guard = self.write_lock.lock().await;
        self.read_records().await
    }

    async fn read_records(&self) -> Result<Vec<LeadRecord>, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        // A file we can't parse is left untouched rather than overwritten.
        serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}
