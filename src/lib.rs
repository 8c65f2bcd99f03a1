pub mod config;
pub mod domain {
    pub mod audit;
    pub mod booking;
    pub mod payment;
}
pub mod error;
pub mod gateways;
pub mod http {
    pub mod handlers {
        pub mod audit;
        pub mod bookings;
        pub mod payments;
        pub mod refunds;
    }
    pub mod middleware {
        pub mod rate_limit;
    }
}
pub mod ratelimit;
pub mod repo {
    pub mod audit_log_repo;
    pub mod bookings_repo;
    pub mod customers_repo;
    pub mod payments_repo;
}
pub mod service {
    pub mod audit;
    pub mod booking_service;
    pub mod payment_service;
    pub mod refund_service;
}
pub mod store;

#[derive(Clone)]
pub struct AppState {
    pub payment_service: service::payment_service::PaymentService,
    pub refund_service: service::refund_service::RefundService,
    pub booking_service: service::booking_service::BookingService,
    pub audit_log: std::sync::Arc<dyn store::AuditLog>,
}
