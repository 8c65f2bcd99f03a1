use crate::domain::booking::Booking;
use crate::error::PaymentError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod mock;
pub mod square;

#[derive(Debug, Clone)]
pub struct ChargeRequest {
    pub source_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub gateway_customer_id: String,
    pub idempotency_key: String,
    pub reference_id: String,
    pub note: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RefundRequest {
    pub gateway_payment_id: String,
    pub amount_minor: Option<i64>,
    pub currency: Option<String>,
    pub reason: Option<String>,
    pub idempotency_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayCharge {
    pub id: String,
    pub status: String,
    pub amount_minor: i64,
    pub currency: String,
    pub source_type: Option<String>,
    pub raw: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayRefund {
    pub id: String,
    pub status: String,
    pub amount_minor: Option<i64>,
    pub currency: Option<String>,
    pub raw: serde_json::Value,
}

#[derive(Debug, Clone, Default)]
pub struct ListPaymentsQuery {
    pub begin_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct PaymentPage {
    pub payments: Vec<GatewayCharge>,
    pub cursor: Option<String>,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    fn name(&self) -> &'static str;

    async fn charge(&self, request: ChargeRequest) -> Result<GatewayCharge, PaymentError>;

    async fn refund(&self, request: RefundRequest) -> Result<GatewayRefund, PaymentError>;

    async fn get_payment(&self, gateway_payment_id: &str) -> Result<GatewayCharge, PaymentError>;

    async fn list_payments(&self, query: ListPaymentsQuery) -> Result<PaymentPage, PaymentError>;
}

#[async_trait]
pub trait BookingMirror: Send + Sync {
    async fn mirror_booking(&self, booking: &Booking) -> Result<String, PaymentError>;
}
