use crate::domain::payment::{Payment, PaymentStatus, PaymentType};
use crate::store::PaymentStore;
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct PaymentsRepo {
    pub pool: PgPool,
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, amount, currency, status, payment_method, payment_type, gateway_id,
           customer_id, booking_id, reference_id, payment_details, refund_details,
           note, created_at, updated_at
    FROM payments
"#;

fn row_to_payment(row: &PgRow) -> anyhow::Result<Payment> {
    Ok(Payment {
        id: row.get("id"),
        amount: row.get("amount"),
        currency: row.get("currency"),
        status: PaymentStatus::parse(row.get("status"))?,
        payment_method: row.get("payment_method"),
        payment_type: PaymentType::parse(row.get("payment_type"))?,
        gateway_id: row.get("gateway_id"),
        customer_id: row.get("customer_id"),
        booking_id: row.get("booking_id"),
        reference_id: row.get("reference_id"),
        payment_details: row.get("payment_details"),
        refund_details: row.get("refund_details"),
        note: row.get("note"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl PaymentStore for PaymentsRepo {
    async fn insert(&self, payment: &Payment) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, amount, currency, status, payment_method, payment_type, gateway_id,
                customer_id, booking_id, reference_id, payment_details, refund_details,
                note, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7,
                $8, $9, $10, $11, $12,
                $13, $14, $15
            )
            "#,
        )
        .bind(payment.id)
        .bind(payment.amount)
        .bind(payment.currency.clone())
        .bind(payment.status.as_str())
        .bind(payment.payment_method.clone())
        .bind(payment.payment_type.as_str())
        .bind(payment.gateway_id.clone())
        .bind(payment.customer_id.clone())
        .bind(payment.booking_id)
        .bind(payment.reference_id.clone())
        .bind(payment.payment_details.clone())
        .bind(payment.refund_details.clone())
        .bind(payment.note.clone())
        .bind(payment.created_at)
        .bind(payment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Payment>> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_payment).transpose()
    }

    async fn find_by_reference(&self, reference_id: &str) -> anyhow::Result<Option<Payment>> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE reference_id = $1"))
            .bind(reference_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_payment).transpose()
    }

    async fn mark_completed(
        &self,
        id: Uuid,
        gateway_id: &str,
        payment_method: Option<&str>,
        payment_details: &serde_json::Value,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE payments
            SET status = 'completed', gateway_id = $2, payment_method = $3,
                payment_details = $4, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(gateway_id)
        .bind(payment_method)
        .bind(payment_details.clone())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_pending(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM payments WHERE id = $1 AND status = 'pending'")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn apply_refund(
        &self,
        id: Uuid,
        status: PaymentStatus,
        refund_details: &serde_json::Value,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE payments
            SET status = $2, refund_details = $3, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(refund_details.clone())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
