#![allow(dead_code)]

use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use studio_payments::domain::booking::{BookingRequest, BookingType};
use studio_payments::domain::payment::{PaymentType, ProcessPaymentRequest};
use studio_payments::gateways::mock::{MockBehavior, MockGateway, MockMirror};
use studio_payments::service::audit::AuditLogger;
use studio_payments::service::booking_service::BookingService;
use studio_payments::service::payment_service::PaymentService;
use studio_payments::service::refund_service::RefundService;
use studio_payments::store::memory::{
    MemoryAuditLog, MemoryBookingStore, MemoryCustomerDirectory, MemoryPaymentStore,
};

pub struct Harness {
    pub gateway: Arc<MockGateway>,
    pub mirror: Arc<MockMirror>,
    pub customers: Arc<MemoryCustomerDirectory>,
    pub payments: Arc<MemoryPaymentStore>,
    pub bookings: Arc<MemoryBookingStore>,
    pub audit_log: Arc<MemoryAuditLog>,
    pub payment_service: PaymentService,
    pub refund_service: RefundService,
    pub booking_service: BookingService,
}

pub fn harness(behavior: MockBehavior) -> Harness {
    harness_with_mirror(behavior, false)
}

pub fn harness_with_mirror(behavior: MockBehavior, mirror_fails: bool) -> Harness {
    let gateway = Arc::new(MockGateway::new(behavior));
    let mirror = Arc::new(MockMirror::new(mirror_fails));
    let customers = Arc::new(MemoryCustomerDirectory::new());
    let payments = Arc::new(MemoryPaymentStore::new());
    let bookings = Arc::new(MemoryBookingStore::new());
    let audit_log = Arc::new(MemoryAuditLog::new());
    let audit = AuditLogger {
        log: audit_log.clone(),
    };

    let booking_service = BookingService {
        bookings: bookings.clone(),
        mirror: mirror.clone(),
    };
    let payment_service = PaymentService {
        gateway: gateway.clone(),
        customers: customers.clone(),
        payments: payments.clone(),
        bookings: booking_service.clone(),
        audit: audit.clone(),
    };
    let refund_service = RefundService {
        gateway: gateway.clone(),
        payments: payments.clone(),
        audit,
    };

    Harness {
        gateway,
        mirror,
        customers,
        payments,
        bookings,
        audit_log,
        payment_service,
        refund_service,
        booking_service,
    }
}

pub fn payment_request(customer_id: &str, amount: Decimal) -> ProcessPaymentRequest {
    ProcessPaymentRequest {
        source_id: "src_1".to_string(),
        amount,
        currency: "USD".to_string(),
        customer_id: customer_id.to_string(),
        payment_type: PaymentType::Consultation,
        booking_id: None,
        note: None,
        session: None,
    }
}

pub fn booking_request(customer_id: &str) -> BookingRequest {
    BookingRequest {
        start_at: Utc::now() + chrono::Duration::days(7),
        duration_minutes: 60,
        customer_id: customer_id.to_string(),
        booking_type: BookingType::Consultation,
        artist_id: None,
        note: None,
        price_quote: None,
    }
}
