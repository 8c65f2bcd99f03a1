use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Scheduled,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Scheduled => "scheduled",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "scheduled" => Ok(BookingStatus::Scheduled),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => anyhow::bail!("unknown booking status {other}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingType {
    Consultation,
    DrawingConsultation,
    Tattoo,
}

impl BookingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingType::Consultation => "consultation",
            BookingType::DrawingConsultation => "drawing_consultation",
            BookingType::Tattoo => "tattoo",
        }
    }

    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "consultation" => Ok(BookingType::Consultation),
            "drawing_consultation" => Ok(BookingType::DrawingConsultation),
            "tattoo" => Ok(BookingType::Tattoo),
            other => anyhow::bail!("unknown booking type {other}"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Booking {
    pub id: Uuid,
    pub start_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub status: BookingStatus,
    pub customer_id: String,
    pub artist_id: Option<String>,
    pub booking_type: BookingType,
    pub price_quote: Option<Decimal>,
    pub note: Option<String>,
    pub gateway_booking_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BookingRequest {
    pub start_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub customer_id: String,
    pub booking_type: BookingType,
    #[serde(default)]
    pub artist_id: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub price_quote: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingOutcome {
    pub success: bool,
    pub booking: Booking,
}
