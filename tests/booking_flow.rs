mod common;

use chrono::Utc;
use common::{booking_request, harness, harness_with_mirror, payment_request};
use rust_decimal::Decimal;
use studio_payments::domain::booking::BookingStatus;
use studio_payments::error::PaymentError;
use studio_payments::gateways::mock::MockBehavior;
use studio_payments::store::BookingStore;

#[tokio::test]
async fn booking_without_payment_persists_and_mirrors() {
    let h = harness(MockBehavior::AlwaysSucceed);

    let booking = h
        .booking_service
        .create(booking_request("c1"))
        .await
        .unwrap();

    assert_eq!(booking.status, BookingStatus::Scheduled);
    let external = booking.gateway_booking_id.clone().unwrap();
    assert!(external.starts_with("ext_"));

    let stored = h.bookings.find_by_id(booking.id).await.unwrap().unwrap();
    assert_eq!(stored.gateway_booking_id, Some(external));
    assert!(h.payments.all().await.is_empty());
}

#[tokio::test]
async fn mirror_failure_keeps_the_local_booking() {
    let h = harness_with_mirror(MockBehavior::AlwaysSucceed, true);

    let booking = h
        .booking_service
        .create(booking_request("c1"))
        .await
        .unwrap();

    assert_eq!(booking.gateway_booking_id, None);
    let stored = h.bookings.find_by_id(booking.id).await.unwrap().unwrap();
    assert_eq!(stored.gateway_booking_id, None);
    assert_eq!(stored.status, BookingStatus::Scheduled);
}

#[tokio::test]
async fn rejects_a_start_time_in_the_past() {
    let h = harness(MockBehavior::AlwaysSucceed);

    let mut req = booking_request("c1");
    req.start_at = Utc::now() - chrono::Duration::hours(1);

    let err = h.booking_service.create(req).await.unwrap_err();
    assert!(matches!(err, PaymentError::Validation(_)));
    assert!(h.bookings.all().await.is_empty());
}

#[tokio::test]
async fn rejects_a_nonpositive_duration() {
    let h = harness(MockBehavior::AlwaysSucceed);

    let mut req = booking_request("c1");
    req.duration_minutes = 0;

    let err = h.booking_service.create(req).await.unwrap_err();
    assert!(matches!(err, PaymentError::Validation(_)));
}

#[tokio::test]
async fn charge_failure_leaves_the_booking_reserved() {
    let h = harness(MockBehavior::DeclineCharges);
    h.customers.link("c1", "gw_cust_c1").await;

    let mut req = payment_request("c1", Decimal::from(100));
    req.session = Some(booking_request("c1"));

    let err = h.payment_service.process(req).await.unwrap_err();
    assert!(matches!(err, PaymentError::Gateway { .. }));

    assert_eq!(h.bookings.all().await.len(), 1);
    assert!(h.payments.all().await.is_empty());
}
