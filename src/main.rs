use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use studio_payments::config::AppConfig;
use studio_payments::gateways::square::SquareGateway;
use studio_payments::gateways::{BookingMirror, PaymentGateway};
use studio_payments::http::middleware::rate_limit::RateLimitState;
use studio_payments::ratelimit::store_memory::MemoryRateLimitStore;
use studio_payments::ratelimit::store_redis::RedisRateLimitStore;
use studio_payments::ratelimit::{OperationClass, RateLimitStore, RateLimiter};
use studio_payments::repo::audit_log_repo::AuditLogRepo;
use studio_payments::repo::bookings_repo::BookingsRepo;
use studio_payments::repo::customers_repo::CustomersRepo;
use studio_payments::repo::payments_repo::PaymentsRepo;
use studio_payments::service::audit::AuditLogger;
use studio_payments::service::booking_service::BookingService;
use studio_payments::service::payment_service::PaymentService;
use studio_payments::service::refund_service::RefundService;
use studio_payments::store::{AuditLog, BookingStore, CustomerDirectory, PaymentStore};
use studio_payments::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let square = Arc::new(SquareGateway {
        base_url: cfg.gateway_base_url.clone(),
        access_token: cfg.gateway_access_token.clone(),
        timeout_ms: cfg.gateway_timeout_ms,
        client: reqwest::Client::new(),
    });
    let gateway: Arc<dyn PaymentGateway> = square.clone();
    let mirror: Arc<dyn BookingMirror> = square;

    let rate_store: Arc<dyn RateLimitStore> = match &cfg.rate_limit_redis_url {
        Some(url) => Arc::new(RedisRateLimitStore {
            client: redis::Client::open(url.clone())?,
        }),
        None => Arc::new(MemoryRateLimitStore::new()),
    };
    let limiter = RateLimiter {
        store: rate_store.clone(),
    };
    studio_payments::ratelimit::spawn_sweeper(rate_store, std::time::Duration::from_secs(300));

    let payments: Arc<dyn PaymentStore> = Arc::new(PaymentsRepo { pool: pool.clone() });
    let bookings: Arc<dyn BookingStore> = Arc::new(BookingsRepo { pool: pool.clone() });
    let customers: Arc<dyn CustomerDirectory> = Arc::new(CustomersRepo { pool: pool.clone() });
    let audit_log: Arc<dyn AuditLog> = Arc::new(AuditLogRepo { pool: pool.clone() });
    let audit = AuditLogger {
        log: audit_log.clone(),
    };

    let booking_service = BookingService { bookings, mirror };
    let payment_service = PaymentService {
        gateway: gateway.clone(),
        customers,
        payments: payments.clone(),
        bookings: booking_service.clone(),
        audit: audit.clone(),
    };
    let refund_service = RefundService {
        gateway,
        payments,
        audit,
    };

    let state = AppState {
        payment_service,
        refund_service,
        booking_service,
        audit_log,
    };

    let payment_routes = Router::new()
        .route(
            "/payments",
            post(studio_payments::http::handlers::payments::create_payment),
        )
        .layer(from_fn_with_state(
            RateLimitState {
                limiter: limiter.clone(),
                class: OperationClass::Payment,
            },
            studio_payments::http::middleware::rate_limit::enforce,
        ));

    let refund_routes = Router::new()
        .route(
            "/payments/:payment_id/refund",
            post(studio_payments::http::handlers::refunds::refund_payment),
        )
        .layer(from_fn_with_state(
            RateLimitState {
                limiter: limiter.clone(),
                class: OperationClass::Refund,
            },
            studio_payments::http::middleware::rate_limit::enforce,
        ));

    let general_routes = Router::new()
        .route("/health", get(studio_payments::http::handlers::payments::health))
        .route(
            "/payments/:payment_id",
            get(studio_payments::http::handlers::payments::get_payment),
        )
        .route(
            "/bookings",
            post(studio_payments::http::handlers::bookings::create_booking),
        )
        .route(
            "/bookings/:booking_id",
            get(studio_payments::http::handlers::bookings::get_booking),
        )
        .route(
            "/audit",
            get(studio_payments::http::handlers::audit::recent_entries),
        )
        .layer(from_fn_with_state(
            RateLimitState {
                limiter,
                class: OperationClass::General,
            },
            studio_payments::http::middleware::rate_limit::enforce,
        ));

    let app = Router::new()
        .merge(payment_routes)
        .merge(refund_routes)
        .merge(general_routes)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
