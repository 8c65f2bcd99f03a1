use crate::domain::booking::{Booking, BookingStatus, BookingType};
use crate::store::BookingStore;
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct BookingsRepo {
    pub pool: PgPool,
}

fn row_to_booking(row: &PgRow) -> anyhow::Result<Booking> {
    Ok(Booking {
        id: row.get("id"),
        start_at: row.get("start_at"),
        duration_minutes: row.get("duration_minutes"),
        status: BookingStatus::parse(row.get("status"))?,
        customer_id: row.get("customer_id"),
        artist_id: row.get("artist_id"),
        booking_type: BookingType::parse(row.get("booking_type"))?,
        price_quote: row.get("price_quote"),
        note: row.get("note"),
        gateway_booking_id: row.get("gateway_booking_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl BookingStore for BookingsRepo {
    async fn insert(&self, booking: &Booking) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, start_at, duration_minutes, status, customer_id, artist_id,
                booking_type, price_quote, note, gateway_booking_id, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(booking.id)
        .bind(booking.start_at)
        .bind(booking.duration_minutes)
        .bind(booking.status.as_str())
        .bind(booking.customer_id.clone())
        .bind(booking.artist_id.clone())
        .bind(booking.booking_type.as_str())
        .bind(booking.price_quote)
        .bind(booking.note.clone())
        .bind(booking.gateway_booking_id.clone())
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Booking>> {
        let row = sqlx::query(
            r#"
            SELECT id, start_at, duration_minutes, status, customer_id, artist_id,
                   booking_type, price_quote, note, gateway_booking_id, created_at, updated_at
            FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_booking).transpose()
    }

    async fn set_gateway_booking_id(&self, id: Uuid, gateway_booking_id: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE bookings
            SET gateway_booking_id = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(gateway_booking_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
