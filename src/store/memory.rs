use crate::domain::audit::{AuditEntry, NewAuditEntry};
use crate::domain::booking::Booking;
use crate::domain::payment::{Payment, PaymentStatus};
use crate::store::{AuditLog, BookingStore, CustomerDirectory, PaymentStore};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryCustomerDirectory {
    customers: Mutex<HashMap<String, String>>,
}

impl MemoryCustomerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn link(&self, customer_id: &str, gateway_customer_id: &str) {
        self.customers
            .lock()
            .await
            .insert(customer_id.to_string(), gateway_customer_id.to_string());
    }
}

#[async_trait]
impl CustomerDirectory for MemoryCustomerDirectory {
    async fn gateway_customer_id(&self, customer_id: &str) -> anyhow::Result<Option<String>> {
        Ok(self.customers.lock().await.get(customer_id).cloned())
    }
}

#[derive(Default)]
pub struct MemoryPaymentStore {
    rows: Mutex<HashMap<Uuid, Payment>>,
}

impl MemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<Payment> {
        self.rows.lock().await.values().cloned().collect()
    }
}

#[async_trait]
impl PaymentStore for MemoryPaymentStore {
    async fn insert(&self, payment: &Payment) -> anyhow::Result<()> {
        let mut rows = self.rows.lock().await;
        if rows.contains_key(&payment.id) {
            anyhow::bail!("payment {} already exists", payment.id);
        }
        if rows.values().any(|p| p.reference_id == payment.reference_id) {
            anyhow::bail!("reference {} already exists", payment.reference_id);
        }
        rows.insert(payment.id, payment.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Payment>> {
        Ok(self.rows.lock().await.get(&id).cloned())
    }

    async fn find_by_reference(&self, reference_id: &str) -> anyhow::Result<Option<Payment>> {
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .find(|p| p.reference_id == reference_id)
            .cloned())
    }

    async fn mark_completed(
        &self,
        id: Uuid,
        gateway_id: &str,
        payment_method: Option<&str>,
        payment_details: &serde_json::Value,
    ) -> anyhow::Result<()> {
        let mut rows = self.rows.lock().await;
        let row = rows
            .get_mut(&id)
            .ok_or_else(|| anyhow::anyhow!("payment {id} not found"))?;
        row.status = PaymentStatus::Completed;
        row.gateway_id = Some(gateway_id.to_string());
        row.payment_method = payment_method.map(ToString::to_string);
        row.payment_details = Some(payment_details.clone());
        row.updated_at = Utc::now();
        Ok(())
    }

    async fn remove_pending(&self, id: Uuid) -> anyhow::Result<()> {
        let mut rows = self.rows.lock().await;
        if rows.get(&id).map(|p| p.status) == Some(PaymentStatus::Pending) {
            rows.remove(&id);
        }
        Ok(())
    }

    async fn apply_refund(
        &self,
        id: Uuid,
        status: PaymentStatus,
        refund_details: &serde_json::Value,
    ) -> anyhow::Result<()> {
        let mut rows = self.rows.lock().await;
        let row = rows
            .get_mut(&id)
            .ok_or_else(|| anyhow::anyhow!("payment {id} not found"))?;
        row.status = status;
        row.refund_details = Some(refund_details.clone());
        row.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryBookingStore {
    rows: Mutex<HashMap<Uuid, Booking>>,
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<Booking> {
        self.rows.lock().await.values().cloned().collect()
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn insert(&self, booking: &Booking) -> anyhow::Result<()> {
        let mut rows = self.rows.lock().await;
        if rows.contains_key(&booking.id) {
            anyhow::bail!("booking {} already exists", booking.id);
        }
        rows.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Booking>> {
        Ok(self.rows.lock().await.get(&id).cloned())
    }

    async fn set_gateway_booking_id(&self, id: Uuid, gateway_booking_id: &str) -> anyhow::Result<()> {
        let mut rows = self.rows.lock().await;
        let row = rows
            .get_mut(&id)
            .ok_or_else(|| anyhow::anyhow!("booking {id} not found"))?;
        row.gateway_booking_id = Some(gateway_booking_id.to_string());
        row.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
    failing: AtomicBool,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().await.clone()
    }

    pub async fn entries_with_action(&self, action: &str) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .await
            .iter()
            .filter(|e| e.action == action)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AuditLog for MemoryAuditLog {
    async fn append(&self, entry: NewAuditEntry) -> anyhow::Result<AuditEntry> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("audit log unavailable");
        }
        let stored = AuditEntry {
            id: Uuid::new_v4(),
            action: entry.action,
            resource: entry.resource,
            resource_id: entry.resource_id,
            actor_id: entry.actor_id,
            details: entry.details,
            recorded_at: Utc::now(),
        };
        self.entries.lock().await.push(stored.clone());
        Ok(stored)
    }

    async fn recent(&self, limit: i64) -> anyhow::Result<Vec<AuditEntry>> {
        let entries = self.entries.lock().await;
        Ok(entries.iter().rev().take(limit.max(0) as usize).cloned().collect())
    }
}
