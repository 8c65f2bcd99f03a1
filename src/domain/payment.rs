use crate::domain::booking::{Booking, BookingRequest};
use crate::error::GatewayErrorDetail;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Refunded,
    PartiallyRefunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::PartiallyRefunded => "partially_refunded",
        }
    }

    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "completed" => Ok(PaymentStatus::Completed),
            "refunded" => Ok(PaymentStatus::Refunded),
            "partially_refunded" => Ok(PaymentStatus::PartiallyRefunded),
            other => anyhow::bail!("unknown payment status {other}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    Consultation,
    DrawingConsultation,
    TattooDeposit,
    TattooFinal,
    Other,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Consultation => "consultation",
            PaymentType::DrawingConsultation => "drawing_consultation",
            PaymentType::TattooDeposit => "tattoo_deposit",
            PaymentType::TattooFinal => "tattoo_final",
            PaymentType::Other => "other",
        }
    }

    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "consultation" => Ok(PaymentType::Consultation),
            "drawing_consultation" => Ok(PaymentType::DrawingConsultation),
            "tattoo_deposit" => Ok(PaymentType::TattooDeposit),
            "tattoo_final" => Ok(PaymentType::TattooFinal),
            "other" => Ok(PaymentType::Other),
            other => anyhow::bail!("unknown payment type {other}"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Payment {
    pub id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub status: PaymentStatus,
    pub payment_method: Option<String>,
    pub payment_type: PaymentType,
    pub gateway_id: Option<String>,
    pub customer_id: String,
    pub booking_id: Option<Uuid>,
    pub reference_id: String,
    pub payment_details: Option<serde_json::Value>,
    pub refund_details: Option<serde_json::Value>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProcessPaymentRequest {
    pub source_id: String,
    pub amount: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub customer_id: String,
    pub payment_type: PaymentType,
    #[serde(default)]
    pub booking_id: Option<Uuid>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub session: Option<BookingRequest>,
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentOutcome {
    pub success: bool,
    pub payment: Payment,
    pub booking: Option<Booking>,
    pub gateway_response: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<GatewayErrorDetail>,
}

pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    if amount.round_dp(2) != amount {
        return None;
    }
    (amount * Decimal::from(100)).round_dp(0).to_i64()
}
