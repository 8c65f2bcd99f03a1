use crate::domain::audit::{AuditEntry, NewAuditEntry};
use crate::store::AuditLog;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct AuditLogRepo {
    pub pool: PgPool,
}

#[async_trait]
impl AuditLog for AuditLogRepo {
    async fn append(&self, entry: NewAuditEntry) -> anyhow::Result<AuditEntry> {
        let stored = AuditEntry {
            id: Uuid::new_v4(),
            action: entry.action,
            resource: entry.resource,
            resource_id: entry.resource_id,
            actor_id: entry.actor_id,
            details: entry.details,
            recorded_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO audit_log (id, action, resource, resource_id, actor_id, details, recorded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(stored.id)
        .bind(stored.action.clone())
        .bind(stored.resource.clone())
        .bind(stored.resource_id.clone())
        .bind(stored.actor_id.clone())
        .bind(stored.details.clone())
        .bind(stored.recorded_at)
        .execute(&self.pool)
        .await?;

        Ok(stored)
    }

    async fn recent(&self, limit: i64) -> anyhow::Result<Vec<AuditEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, action, resource, resource_id, actor_id, details, recorded_at
            FROM audit_log
            ORDER BY recorded_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| AuditEntry {
                id: row.get("id"),
                action: row.get("action"),
                resource: row.get("resource"),
                resource_id: row.get("resource_id"),
                actor_id: row.get("actor_id"),
                details: row.get("details"),
                recorded_at: row.get("recorded_at"),
            })
            .collect())
    }
}
