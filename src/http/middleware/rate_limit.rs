use crate::ratelimit::{OperationClass, Quota, RateLimiter};
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: RateLimiter,
    pub class: OperationClass,
}

pub async fn enforce(
    State(state): State<RateLimitState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let identity = caller_identity(request.headers());

    let decision = match state.limiter.check(&identity, state.class).await {
        Ok(decision) => decision,
        Err(err) => {
            // fail open: a broken limiter store must not block payments
            tracing::error!("rate limit check failed: {}", err);
            return next.run(request).await;
        }
    };

    if !decision.allowed {
        let retry_after =
            (decision.quota.reset_epoch_seconds - chrono::Utc::now().timestamp()).max(0);
        let mut response = Response::builder()
            .status(StatusCode::TOO_MANY_REQUESTS)
            .body(Body::from("rate limit exceeded"))
            .unwrap_or_else(|_| Response::new(Body::from("rate limit exceeded")));
        set_quota_headers(response.headers_mut(), &decision.quota);
        if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
            response.headers_mut().insert("Retry-After", value);
        }
        return response;
    }

    let mut response = next.run(request).await;
    set_quota_headers(response.headers_mut(), &decision.quota);
    response
}

fn caller_identity(headers: &HeaderMap) -> String {
    if let Some(actor) = headers.get("x-actor-id").and_then(|v| v.to_str().ok()) {
        if !actor.is_empty() {
            return actor.to_string();
        }
    }

    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .split(',')
        .next()
        .unwrap_or("unknown")
        .trim()
        .to_string()
}

fn set_quota_headers(headers: &mut HeaderMap, quota: &Quota) {
    let pairs = [
        ("X-RateLimit-Limit", quota.limit.to_string()),
        ("X-RateLimit-Remaining", quota.remaining.to_string()),
        ("X-RateLimit-Reset", quota.reset_epoch_seconds.to_string()),
    ];
    for (name, value) in pairs {
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(name, value);
        }
    }
}
