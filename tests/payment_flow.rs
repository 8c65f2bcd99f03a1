mod common;

use chrono::Utc;
use common::{booking_request, harness, payment_request};
use rust_decimal::Decimal;
use studio_payments::domain::payment::{Payment, PaymentStatus, PaymentType};
use studio_payments::error::PaymentError;
use studio_payments::gateways::mock::MockBehavior;
use studio_payments::gateways::{ListPaymentsQuery, PaymentGateway};
use studio_payments::store::{AuditLog, BookingStore, PaymentStore};
use uuid::Uuid;

#[tokio::test]
async fn completed_payment_has_gateway_id_and_one_audit_entry() {
    let h = harness(MockBehavior::AlwaysSucceed);
    h.customers.link("c1", "gw_cust_c1").await;

    let outcome = h
        .payment_service
        .process(payment_request("c1", Decimal::from(50)))
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.payment.status, PaymentStatus::Completed);
    assert_eq!(outcome.payment.amount, Decimal::from(50));
    assert_eq!(outcome.payment.payment_type, PaymentType::Consultation);
    assert!(outcome.payment.gateway_id.is_some());
    assert_eq!(
        outcome.payment.payment_details.as_ref(),
        Some(&outcome.gateway_response)
    );

    let stored = h
        .payments
        .find_by_id(outcome.payment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, PaymentStatus::Completed);
    assert_eq!(stored.gateway_id, outcome.payment.gateway_id);

    let processed = h.audit_log.entries_with_action("payment_processed").await;
    assert_eq!(processed.len(), 1);
    assert_eq!(processed[0].resource, "payment");
    assert_eq!(h.audit_log.entries().await.len(), 1);
}

#[tokio::test]
async fn failed_charge_leaves_no_payment_row() {
    let h = harness(MockBehavior::DeclineCharges);
    h.customers.link("c1", "gw_cust_c1").await;

    let err = h
        .payment_service
        .process(payment_request("c1", Decimal::from(50)))
        .await
        .unwrap_err();

    assert!(matches!(err, PaymentError::Gateway { .. }));
    assert_eq!(
        err.first_gateway_error().and_then(|g| g.code.clone()),
        Some("CARD_DECLINED".to_string())
    );

    assert!(h.payments.all().await.is_empty());

    let failed = h.audit_log.entries_with_action("payment_failed").await;
    assert_eq!(failed.len(), 1);
    assert!(failed[0].details["error"]
        .as_str()
        .unwrap()
        .contains("declined"));
    assert_eq!(h.audit_log.entries().await.len(), 1);
}

#[tokio::test]
async fn unknown_customer_is_rejected_before_the_gateway() {
    let h = harness(MockBehavior::AlwaysSucceed);

    let err = h
        .payment_service
        .process(payment_request("ghost", Decimal::from(50)))
        .await
        .unwrap_err();

    assert!(matches!(err, PaymentError::Validation(_)));
    assert_eq!(h.gateway.charge_count().await, 0);
    assert!(h.payments.all().await.is_empty());
    assert_eq!(
        h.audit_log.entries_with_action("payment_failed").await.len(),
        1
    );
}

#[tokio::test]
async fn reused_booking_reference_never_charges_twice() {
    let h = harness(MockBehavior::AlwaysSucceed);
    h.customers.link("c1", "gw_cust_c1").await;

    let booking = h
        .booking_service
        .create(booking_request("c1"))
        .await
        .unwrap();
    let mut req = payment_request("c1", Decimal::from(50));
    req.booking_id = Some(booking.id);

    let first = h.payment_service.process(req.clone()).await.unwrap();
    let second = h.payment_service.process(req).await.unwrap();

    assert_eq!(first.payment.id, second.payment.id);
    assert_eq!(first.payment.gateway_id, second.payment.gateway_id);
    assert_eq!(h.gateway.charge_count().await, 1);
    assert_eq!(h.gateway.transaction_ids().await.len(), 1);
    assert_eq!(
        h.audit_log
            .entries_with_action("payment_processed")
            .await
            .len(),
        1
    );
}

#[tokio::test]
async fn leftover_pending_row_is_retried_under_the_same_key() {
    let h = harness(MockBehavior::AlwaysSucceed);
    h.customers.link("c1", "gw_cust_c1").await;

    let booking = h
        .booking_service
        .create(booking_request("c1"))
        .await
        .unwrap();

    // an interrupted attempt leaves a pending row behind
    let now = Utc::now();
    let pending = Payment {
        id: Uuid::new_v4(),
        amount: Decimal::from(50),
        currency: "USD".to_string(),
        status: PaymentStatus::Pending,
        payment_method: None,
        payment_type: PaymentType::Consultation,
        gateway_id: None,
        customer_id: "c1".to_string(),
        booking_id: Some(booking.id),
        reference_id: booking.id.to_string(),
        payment_details: None,
        refund_details: None,
        note: None,
        created_at: now,
        updated_at: now,
    };
    h.payments.insert(&pending).await.unwrap();

    let survivor = h
        .payments
        .find_by_reference(&booking.id.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(survivor.id, pending.id);
    assert_eq!(survivor.status, PaymentStatus::Pending);

    let mut req = payment_request("c1", Decimal::from(50));
    req.booking_id = Some(booking.id);
    let outcome = h.payment_service.process(req).await.unwrap();

    assert_eq!(outcome.payment.id, pending.id);
    assert_eq!(outcome.payment.status, PaymentStatus::Completed);
    assert_eq!(h.gateway.charge_count().await, 1);
    assert_eq!(h.payments.all().await.len(), 1);

    let stored = h.payments.find_by_id(pending.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PaymentStatus::Completed);
    assert!(stored.gateway_id.is_some());
}

#[tokio::test]
async fn unknown_booking_id_is_rejected_before_the_gateway() {
    let h = harness(MockBehavior::AlwaysSucceed);
    h.customers.link("c1", "gw_cust_c1").await;

    let mut req = payment_request("c1", Decimal::from(50));
    req.booking_id = Some(Uuid::new_v4());

    let err = h.payment_service.process(req).await.unwrap_err();

    assert!(matches!(err, PaymentError::NotFound(_)));
    assert_eq!(h.gateway.charge_count().await, 0);
    assert!(h.payments.all().await.is_empty());
    assert_eq!(
        h.audit_log.entries_with_action("payment_failed").await.len(),
        1
    );
}

#[tokio::test]
async fn session_request_books_before_charging() {
    let h = harness(MockBehavior::AlwaysSucceed);
    h.customers.link("c1", "gw_cust_c1").await;

    let mut req = payment_request("c1", Decimal::from(100));
    req.session = Some(booking_request("c1"));

    let outcome = h.payment_service.process(req).await.unwrap();

    let booking = outcome.booking.expect("booking should be created");
    assert_eq!(outcome.payment.booking_id, Some(booking.id));
    assert_eq!(outcome.payment.reference_id, booking.id.to_string());
    assert!(h.bookings.find_by_id(booking.id).await.unwrap().is_some());
    assert_eq!(h.mirror.mirrored().await, vec![booking.id]);
}

#[tokio::test]
async fn gateway_lookup_finds_the_recorded_charge() {
    let h = harness(MockBehavior::AlwaysSucceed);
    h.customers.link("c1", "gw_cust_c1").await;

    let outcome = h
        .payment_service
        .process(payment_request("c1", Decimal::from(50)))
        .await
        .unwrap();
    let gateway_id = outcome.payment.gateway_id.unwrap();

    let charge = h.gateway.get_payment(&gateway_id).await.unwrap();
    assert_eq!(charge.id, gateway_id);
    assert_eq!(charge.amount_minor, 5000);

    let page = h
        .gateway
        .list_payments(ListPaymentsQuery::default())
        .await
        .unwrap();
    assert_eq!(page.payments.len(), 1);
}

#[tokio::test]
async fn recent_audit_entries_come_back_newest_first() {
    let h = harness(MockBehavior::AlwaysSucceed);
    h.customers.link("c1", "gw_cust_c1").await;

    h.payment_service
        .process(payment_request("c1", Decimal::from(50)))
        .await
        .unwrap();
    h.payment_service
        .process(payment_request("ghost", Decimal::from(10)))
        .await
        .unwrap_err();

    let recent = h.audit_log.recent(10).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].action, "payment_failed");
    assert_eq!(recent[1].action, "payment_processed");
}

#[tokio::test]
async fn audit_outage_does_not_fail_the_payment() {
    let h = harness(MockBehavior::AlwaysSucceed);
    h.customers.link("c1", "gw_cust_c1").await;
    h.audit_log.set_failing(true);

    let outcome = h
        .payment_service
        .process(payment_request("c1", Decimal::from(50)))
        .await
        .unwrap();

    assert_eq!(outcome.payment.status, PaymentStatus::Completed);
    assert!(h.audit_log.entries().await.is_empty());
}
