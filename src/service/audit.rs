use crate::domain::audit::NewAuditEntry;
use crate::store::AuditLog;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuditLogger {
    pub log: Arc<dyn AuditLog>,
}

impl AuditLogger {
    // An append failure must never undo a financial operation that already
    // happened at the gateway, so it is logged and swallowed here.
    pub async fn record(
        &self,
        action: &str,
        resource: &str,
        resource_id: Option<String>,
        actor_id: Option<String>,
        details: serde_json::Value,
    ) {
        let entry = NewAuditEntry {
            action: action.to_string(),
            resource: resource.to_string(),
            resource_id,
            actor_id,
            details,
        };

        if let Err(err) = self.log.append(entry).await {
            tracing::error!("audit append failed for action {}: {}", action, err);
        }
    }
}
