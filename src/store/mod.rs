use crate::domain::audit::{AuditEntry, NewAuditEntry};
use crate::domain::booking::Booking;
use crate::domain::payment::{Payment, PaymentStatus};
use async_trait::async_trait;
use uuid::Uuid;

pub mod memory;

#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn gateway_customer_id(&self, customer_id: &str) -> anyhow::Result<Option<String>>;
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn insert(&self, payment: &Payment) -> anyhow::Result<()>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Payment>>;

    async fn find_by_reference(&self, reference_id: &str) -> anyhow::Result<Option<Payment>>;

    async fn mark_completed(
        &self,
        id: Uuid,
        gateway_id: &str,
        payment_method: Option<&str>,
        payment_details: &serde_json::Value,
    ) -> anyhow::Result<()>;

    async fn remove_pending(&self, id: Uuid) -> anyhow::Result<()>;

    async fn apply_refund(
        &self,
        id: Uuid,
        status: PaymentStatus,
        refund_details: &serde_json::Value,
    ) -> anyhow::Result<()>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert(&self, booking: &Booking) -> anyhow::Result<()>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Booking>>;

    async fn set_gateway_booking_id(&self, id: Uuid, gateway_booking_id: &str) -> anyhow::Result<()>;
}

#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn append(&self, entry: NewAuditEntry) -> anyhow::Result<AuditEntry>;

    async fn recent(&self, limit: i64) -> anyhow::Result<Vec<AuditEntry>>;
}
