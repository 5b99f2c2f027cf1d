//! Persisted audit log entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: i32,
    pub user_id: i32,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Entry waiting in the audit queue
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditEntry {
    pub user_id: i32,
    pub action: String,
    pub entity: Option<String>,
    pub entity_id: Option<i32>,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}
