use crate::domain::payment::{
    to_minor_units, Payment, PaymentOutcome, PaymentStatus, ProcessPaymentRequest,
};
use crate::error::PaymentError;
use crate::gateways::{ChargeRequest, PaymentGateway};
use crate::service::audit::AuditLogger;
use crate::service::booking_service::BookingService;
use crate::store::{CustomerDirectory, PaymentStore};
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct PaymentService {
    pub gateway: Arc<dyn PaymentGateway>,
    pub customers: Arc<dyn CustomerDirectory>,
    pub payments: Arc<dyn PaymentStore>,
    pub bookings: BookingService,
    pub audit: AuditLogger,
}

impl PaymentService {
    pub async fn process(&self, req: ProcessPaymentRequest) -> Result<PaymentOutcome, PaymentError> {
        match self.attempt(&req).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                let error_code = err.first_gateway_error().and_then(|g| g.code.clone());
                self.audit
                    .record(
                        "payment_failed",
                        "payment",
                        None,
                        Some(req.customer_id.clone()),
                        json!({
                            "payment_type": req.payment_type,
                            "amount": req.amount,
                            "currency": req.currency,
                            "customer_id": req.customer_id,
                            "error": err.to_string(),
                            "error_code": error_code,
                        }),
                    )
                    .await;
                Err(err)
            }
        }
    }

    async fn attempt(&self, req: &ProcessPaymentRequest) -> Result<PaymentOutcome, PaymentError> {
        if req.amount <= Decimal::ZERO {
            return Err(PaymentError::Validation("amount must be positive".to_string()));
        }
        let amount_minor = to_minor_units(req.amount).ok_or_else(|| {
            PaymentError::Validation("amount must have at most two decimal places".to_string())
        })?;

        let gateway_customer_id = self
            .customers
            .gateway_customer_id(&req.customer_id)
            .await?
            .ok_or_else(|| {
                PaymentError::Validation(format!(
                    "customer {} not found or not linked to the payment gateway",
                    req.customer_id
                ))
            })?;

        let booking = match &req.session {
            Some(session) => Some(self.bookings.create(session.clone()).await?),
            None => match req.booking_id {
                Some(id) => Some(self.bookings.get(id).await?),
                None => None,
            },
        };
        let booking_id = booking.as_ref().map(|b| b.id);

        // The reference doubles as the gateway idempotency key, so a retried
        // request for the same booking can never charge twice.
        let reference_id = booking_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let pending = match self.payments.find_by_reference(&reference_id).await? {
            Some(existing) if existing.status != PaymentStatus::Pending => {
                let gateway_response = existing
                    .payment_details
                    .clone()
                    .unwrap_or(serde_json::Value::Null);
                return Ok(PaymentOutcome {
                    success: true,
                    payment: existing,
                    booking,
                    gateway_response,
                });
            }
            // A leftover pending row from an interrupted attempt: retry the
            // charge under the same idempotency key.
            Some(existing) => existing,
            None => {
                let now = Utc::now();
                let row = Payment {
                    id: Uuid::new_v4(),
                    amount: req.amount,
                    currency: req.currency.clone(),
                    status: PaymentStatus::Pending,
                    payment_method: None,
                    payment_type: req.payment_type,
                    gateway_id: None,
                    customer_id: req.customer_id.clone(),
                    booking_id,
                    reference_id: reference_id.clone(),
                    payment_details: None,
                    refund_details: None,
                    note: req.note.clone(),
                    created_at: now,
                    updated_at: now,
                };
                self.payments.insert(&row).await?;
                row
            }
        };

        let charge_request = ChargeRequest {
            source_id: req.source_id.clone(),
            amount_minor,
            currency: req.currency.clone(),
            gateway_customer_id,
            idempotency_key: reference_id.clone(),
            reference_id,
            note: req.note.clone(),
        };

        match self.gateway.charge(charge_request).await {
            Ok(charge) => {
                self.payments
                    .mark_completed(pending.id, &charge.id, charge.source_type.as_deref(), &charge.raw)
                    .await?;

                self.audit
                    .record(
                        "payment_processed",
                        "payment",
                        Some(pending.id.to_string()),
                        Some(req.customer_id.clone()),
                        json!({
                            "payment_type": req.payment_type,
                            "amount": req.amount,
                            "currency": req.currency,
                            "customer_id": req.customer_id,
                            "gateway_id": charge.id,
                        }),
                    )
                    .await;

                let mut payment = pending;
                payment.status = PaymentStatus::Completed;
                payment.gateway_id = Some(charge.id.clone());
                payment.payment_method = charge.source_type.clone();
                payment.payment_details = Some(charge.raw.clone());
                payment.updated_at = Utc::now();

                Ok(PaymentOutcome {
                    success: true,
                    payment,
                    booking,
                    gateway_response: charge.raw,
                })
            }
            Err(err) => {
                // A declined charge leaves no payment row behind; the booking,
                // if one was created, stays reserved.
                if let Err(cleanup) = self.payments.remove_pending(pending.id).await {
                    tracing::error!(
                        "failed to remove pending payment {} after gateway error: {}",
                        pending.id,
                        cleanup
                    );
                }
                Err(err)
            }
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Payment, PaymentError> {
        self.payments
            .find_by_id(id)
            .await?
            .ok_or_else(|| PaymentError::NotFound(format!("payment {id} not found")))
    }
}
