mod common;

use chrono::Utc;
use common::{harness, payment_request};
use rust_decimal::Decimal;
use studio_payments::domain::payment::{Payment, PaymentStatus, PaymentType};
use studio_payments::error::PaymentError;
use studio_payments::gateways::mock::MockBehavior;
use studio_payments::store::PaymentStore;
use uuid::Uuid;

#[tokio::test]
async fn partial_refund_marks_payment_partially_refunded() {
    let h = harness(MockBehavior::AlwaysSucceed);
    h.customers.link("c1", "gw_cust_c1").await;

    let payment = h
        .payment_service
        .process(payment_request("c1", Decimal::from(50)))
        .await
        .unwrap()
        .payment;

    let outcome = h
        .refund_service
        .refund(payment.id, Some(Decimal::from(25)), Some("customer request".to_string()))
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.payment.status, PaymentStatus::PartiallyRefunded);

    let stored = h.payments.find_by_id(payment.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PaymentStatus::PartiallyRefunded);
    assert!(stored.refund_details.is_some());

    let requests = h.gateway.refund_requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].amount_minor, Some(2500));
    assert_eq!(requests[0].currency.as_deref(), Some("USD"));

    assert_eq!(
        h.audit_log
            .entries_with_action("payment_refunded")
            .await
            .len(),
        1
    );
}

#[tokio::test]
async fn full_refund_sends_no_amount_to_the_gateway() {
    let h = harness(MockBehavior::AlwaysSucceed);
    h.customers.link("c1", "gw_cust_c1").await;

    let payment = h
        .payment_service
        .process(payment_request("c1", Decimal::from(50)))
        .await
        .unwrap()
        .payment;

    let outcome = h
        .refund_service
        .refund(payment.id, None, Some("no longer needed".to_string()))
        .await
        .unwrap();

    assert_eq!(outcome.payment.status, PaymentStatus::Refunded);

    let requests = h.gateway.refund_requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].amount_minor, None);
    assert_eq!(requests[0].currency, None);

    let stored = h.payments.find_by_id(payment.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PaymentStatus::Refunded);
}

#[tokio::test]
async fn missing_payment_raises_not_found_with_one_audit_entry() {
    let h = harness(MockBehavior::AlwaysSucceed);

    let err = h
        .refund_service
        .refund(Uuid::new_v4(), None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, PaymentError::NotFound(_)));
    let failed = h.audit_log.entries_with_action("refund_failed").await;
    assert_eq!(failed.len(), 1);
    assert_eq!(h.audit_log.entries().await.len(), 1);
}

#[tokio::test]
async fn payment_without_gateway_id_cannot_be_refunded() {
    let h = harness(MockBehavior::AlwaysSucceed);
    let now = Utc::now();
    let pending = Payment {
        id: Uuid::new_v4(),
        amount: Decimal::from(50),
        currency: "USD".to_string(),
        status: PaymentStatus::Pending,
        payment_method: None,
        payment_type: PaymentType::TattooDeposit,
        gateway_id: None,
        customer_id: "c1".to_string(),
        booking_id: None,
        reference_id: Uuid::new_v4().to_string(),
        payment_details: None,
        refund_details: None,
        note: None,
        created_at: now,
        updated_at: now,
    };
    h.payments.insert(&pending).await.unwrap();

    let err = h
        .refund_service
        .refund(pending.id, None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, PaymentError::NotFound(_)));
    assert_eq!(h.gateway.refund_requests().await.len(), 0);
}

#[tokio::test]
async fn declined_refund_reraises_the_gateway_error() {
    let h = harness(MockBehavior::DeclineRefunds);
    h.customers.link("c1", "gw_cust_c1").await;

    let payment = h
        .payment_service
        .process(payment_request("c1", Decimal::from(50)))
        .await
        .unwrap()
        .payment;

    let err = h
        .refund_service
        .refund(payment.id, Some(Decimal::from(10)), None)
        .await
        .unwrap_err();

    assert!(matches!(err, PaymentError::Gateway { .. }));
    assert_eq!(
        err.first_gateway_error().and_then(|g| g.code.clone()),
        Some("REFUND_DECLINED".to_string())
    );

    let stored = h.payments.find_by_id(payment.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PaymentStatus::Completed);

    let failed = h.audit_log.entries_with_action("refund_failed").await;
    assert_eq!(failed.len(), 1);
    assert_eq!(
        failed[0].details["error_code"].as_str(),
        Some("REFUND_DECLINED")
    );
}
