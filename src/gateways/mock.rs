use crate::domain::booking::Booking;
use crate::error::{GatewayErrorDetail, PaymentError};
use crate::gateways::{
    BookingMirror, ChargeRequest, GatewayCharge, GatewayRefund, ListPaymentsQuery, PaymentGateway,
    PaymentPage, RefundRequest,
};
use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    AlwaysSucceed,
    DeclineCharges,
    DeclineRefunds,
}

pub struct MockGateway {
    behavior: MockBehavior,
    charges: Mutex<HashMap<String, GatewayCharge>>,
    refund_requests: Mutex<Vec<RefundRequest>>,
}

impl MockGateway {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            charges: Mutex::new(HashMap::new()),
            refund_requests: Mutex::new(Vec::new()),
        }
    }

    pub async fn charge_count(&self) -> usize {
        self.charges.lock().await.len()
    }

    pub async fn transaction_ids(&self) -> Vec<String> {
        self.charges.lock().await.values().map(|c| c.id.clone()).collect()
    }

    pub async fn refund_requests(&self) -> Vec<RefundRequest> {
        self.refund_requests.lock().await.clone()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn charge(&self, request: ChargeRequest) -> Result<GatewayCharge, PaymentError> {
        if self.behavior == MockBehavior::DeclineCharges {
            return Err(decline("PAYMENT_METHOD_ERROR", "CARD_DECLINED", "card was declined"));
        }

        let mut charges = self.charges.lock().await;
        if let Some(existing) = charges.get(&request.idempotency_key) {
            return Ok(existing.clone());
        }

        let id = format!("mock_txn_{}", Uuid::new_v4());
        let raw = json!({
            "payment": {
                "id": id,
                "status": "COMPLETED",
                "amount_money": { "amount": request.amount_minor, "currency": request.currency },
                "source_type": "CARD",
                "customer_id": request.gateway_customer_id,
                "reference_id": request.reference_id,
            }
        });
        let charge = GatewayCharge {
            id: id.clone(),
            status: "COMPLETED".to_string(),
            amount_minor: request.amount_minor,
            currency: request.currency.clone(),
            source_type: Some("CARD".to_string()),
            raw,
        };
        charges.insert(request.idempotency_key.clone(), charge.clone());
        Ok(charge)
    }

    async fn refund(&self, request: RefundRequest) -> Result<GatewayRefund, PaymentError> {
        self.refund_requests.lock().await.push(request.clone());

        if self.behavior == MockBehavior::DeclineRefunds {
            return Err(decline("REFUND_ERROR", "REFUND_DECLINED", "refund rejected by processor"));
        }

        let id = format!("mock_ref_{}", Uuid::new_v4());
        let mut refund_body = json!({
            "id": id,
            "status": "COMPLETED",
            "payment_id": request.gateway_payment_id,
        });
        if let (Some(amount), Some(currency)) = (request.amount_minor, &request.currency) {
            refund_body["amount_money"] = json!({ "amount": amount, "currency": currency });
        }

        Ok(GatewayRefund {
            id,
            status: "COMPLETED".to_string(),
            amount_minor: request.amount_minor,
            currency: request.currency.clone(),
            raw: json!({ "refund": refund_body }),
        })
    }

    async fn get_payment(&self, gateway_payment_id: &str) -> Result<GatewayCharge, PaymentError> {
        self.charges
            .lock()
            .await
            .values()
            .find(|c| c.id == gateway_payment_id)
            .cloned()
            .ok_or_else(|| PaymentError::NotFound(format!("gateway payment {gateway_payment_id} not found")))
    }

    async fn list_payments(&self, query: ListPaymentsQuery) -> Result<PaymentPage, PaymentError> {
        let charges = self.charges.lock().await;
        let limit = query.limit.unwrap_or(u32::MAX) as usize;
        Ok(PaymentPage {
            payments: charges.values().take(limit).cloned().collect(),
            cursor: None,
        })
    }
}

fn decline(category: &str, code: &str, detail: &str) -> PaymentError {
    PaymentError::Gateway {
        message: detail.to_string(),
        errors: vec![GatewayErrorDetail {
            category: Some(category.to_string()),
            code: Some(code.to_string()),
            detail: Some(detail.to_string()),
        }],
        raw: json!({ "errors": [{ "category": category, "code": code, "detail": detail }] }),
    }
}

pub struct MockMirror {
    pub fail: bool,
    mirrored: Mutex<Vec<Uuid>>,
}

impl MockMirror {
    pub fn new(fail: bool) -> Self {
        Self {
            fail,
            mirrored: Mutex::new(Vec::new()),
        }
    }

    pub async fn mirrored(&self) -> Vec<Uuid> {
        self.mirrored.lock().await.clone()
    }
}

#[async_trait]
impl BookingMirror for MockMirror {
    async fn mirror_booking(&self, booking: &Booking) -> Result<String, PaymentError> {
        if self.fail {
            return Err(PaymentError::Other(anyhow!("scheduling gateway unavailable")));
        }
        self.mirrored.lock().await.push(booking.id);
        Ok(format!("ext_{}", booking.id))
    }
}
