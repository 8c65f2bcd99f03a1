use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Serialize)]
pub struct GatewayErrorDetail {
    pub category: Option<String>,
    pub code: Option<String>,
    pub detail: Option<String>,
}

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("gateway rejected the request: {message}")]
    Gateway {
        message: String,
        errors: Vec<GatewayErrorDetail>,
        raw: Value,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PaymentError {
    pub fn first_gateway_error(&self) -> Option<&GatewayErrorDetail> {
        match self {
            PaymentError::Gateway { errors, .. } => errors.first(),
            _ => None,
        }
    }
}
