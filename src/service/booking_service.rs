use crate::domain::booking::{Booking, BookingRequest, BookingStatus};
use crate::error::PaymentError;
use crate::gateways::BookingMirror;
use crate::store::BookingStore;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct BookingService {
    pub bookings: Arc<dyn BookingStore>,
    pub mirror: Arc<dyn BookingMirror>,
}

impl BookingService {
    pub async fn create(&self, req: BookingRequest) -> Result<Booking, PaymentError> {
        if req.duration_minutes <= 0 {
            return Err(PaymentError::Validation(
                "booking duration must be positive".to_string(),
            ));
        }
        if req.start_at <= Utc::now() {
            return Err(PaymentError::Validation(
                "booking start time must be in the future".to_string(),
            ));
        }

        let now = Utc::now();
        let mut booking = Booking {
            id: Uuid::new_v4(),
            start_at: req.start_at,
            duration_minutes: req.duration_minutes,
            status: BookingStatus::Scheduled,
            customer_id: req.customer_id,
            artist_id: req.artist_id,
            booking_type: req.booking_type,
            price_quote: req.price_quote,
            note: req.note,
            gateway_booking_id: None,
            created_at: now,
            updated_at: now,
        };

        self.bookings.insert(&booking).await?;

        // The mirror call is allowed to fail: the local row is authoritative
        // and a later sync job backfills the external id.
        match self.mirror.mirror_booking(&booking).await {
            Ok(external_id) => {
                self.bookings
                    .set_gateway_booking_id(booking.id, &external_id)
                    .await?;
                booking.gateway_booking_id = Some(external_id);
            }
            Err(err) => {
                tracing::warn!("booking {} not mirrored to scheduling gateway: {}", booking.id, err);
            }
        }

        Ok(booking)
    }

    pub async fn get(&self, id: Uuid) -> Result<Booking, PaymentError> {
        self.bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| PaymentError::NotFound(format!("booking {id} not found")))
    }
}
