use crate::domain::payment::{to_minor_units, Payment, PaymentStatus};
use crate::error::PaymentError;
use crate::gateways::{GatewayRefund, PaymentGateway, RefundRequest};
use crate::service::audit::AuditLogger;
use crate::store::PaymentStore;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct RefundOutcome {
    pub success: bool,
    pub payment: Payment,
    pub refund: GatewayRefund,
}

#[derive(Clone)]
pub struct RefundService {
    pub gateway: Arc<dyn PaymentGateway>,
    pub payments: Arc<dyn PaymentStore>,
    pub audit: AuditLogger,
}

impl RefundService {
    pub async fn refund(
        &self,
        payment_id: Uuid,
        amount: Option<Decimal>,
        reason: Option<String>,
    ) -> Result<RefundOutcome, PaymentError> {
        match self.attempt(payment_id, amount, reason.clone()).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                let error_code = err.first_gateway_error().and_then(|g| g.code.clone());
                self.audit
                    .record(
                        "refund_failed",
                        "payment",
                        Some(payment_id.to_string()),
                        None,
                        json!({
                            "payment_id": payment_id,
                            "amount": amount,
                            "reason": reason,
                            "error": err.to_string(),
                            "error_code": error_code,
                        }),
                    )
                    .await;
                Err(err)
            }
        }
    }

    async fn attempt(
        &self,
        payment_id: Uuid,
        amount: Option<Decimal>,
        reason: Option<String>,
    ) -> Result<RefundOutcome, PaymentError> {
        let target = self
            .payments
            .find_by_id(payment_id)
            .await?
            .and_then(|p| p.gateway_id.clone().map(|gateway_id| (p, gateway_id)));

        let Some((payment, gateway_payment_id)) = target else {
            return Err(PaymentError::NotFound(format!(
                "payment {payment_id} not found or missing gateway id"
            )));
        };

        let amount_minor = match amount {
            Some(a) => {
                if a <= Decimal::ZERO {
                    return Err(PaymentError::Validation(
                        "refund amount must be positive".to_string(),
                    ));
                }
                Some(to_minor_units(a).ok_or_else(|| {
                    PaymentError::Validation(
                        "refund amount must have at most two decimal places".to_string(),
                    )
                })?)
            }
            None => None,
        };

        // A full refund carries no amount on the wire; the gateway refunds
        // the remaining balance and enforces the over-refund check.
        let request = RefundRequest {
            gateway_payment_id,
            amount_minor,
            currency: amount.map(|_| payment.currency.clone()),
            reason: reason.clone(),
            idempotency_key: Uuid::new_v4().to_string(),
        };

        let refund = self.gateway.refund(request).await?;

        let status = if amount.is_some() {
            PaymentStatus::PartiallyRefunded
        } else {
            PaymentStatus::Refunded
        };
        self.payments
            .apply_refund(payment.id, status, &refund.raw)
            .await?;

        self.audit
            .record(
                "payment_refunded",
                "payment",
                Some(payment.id.to_string()),
                None,
                json!({
                    "payment_id": payment.id,
                    "amount": amount,
                    "reason": reason,
                    "refund_id": refund.id,
                }),
            )
            .await;

        let mut updated = payment;
        updated.status = status;
        updated.refund_details = Some(refund.raw.clone());
        updated.updated_at = Utc::now();

        Ok(RefundOutcome {
            success: true,
            payment: updated,
            refund,
        })
    }
}
