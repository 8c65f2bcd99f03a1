use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub action: String,
    pub resource: String,
    pub resource_id: Option<String>,
    pub actor_id: Option<String>,
    pub details: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub action: String,
    pub resource: String,
    pub resource_id: Option<String>,
    pub actor_id: Option<String>,
    pub details: serde_json::Value,
}
