use crate::domain::booking::Booking;
use crate::error::{GatewayErrorDetail, PaymentError};
use crate::gateways::{
    BookingMirror, ChargeRequest, GatewayCharge, GatewayRefund, ListPaymentsQuery, PaymentGateway,
    PaymentPage, RefundRequest,
};
use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::{json, Value};

pub struct SquareGateway {
    pub base_url: String,
    pub access_token: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

impl SquareGateway {
    async fn post_json(&self, path: &str, body: Value) -> Result<Value, PaymentError> {
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.access_token)
            .json(&body)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .map_err(|e| PaymentError::Other(anyhow!("gateway request failed: {e}")))?;

        Self::read_json(resp).await
    }

    async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value, PaymentError> {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.access_token)
            .query(query)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .map_err(|e| PaymentError::Other(anyhow!("gateway request failed: {e}")))?;

        Self::read_json(resp).await
    }

    async fn read_json(resp: reqwest::Response) -> Result<Value, PaymentError> {
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(Value::Null);

        if status.is_success() {
            return Ok(body);
        }

        let errors = extract_errors(&body);
        let message = errors
            .first()
            .and_then(|e| e.detail.clone())
            .unwrap_or_else(|| format!("gateway returned HTTP {}", status.as_u16()));

        Err(PaymentError::Gateway {
            message,
            errors,
            raw: body,
        })
    }
}

#[async_trait]
impl PaymentGateway for SquareGateway {
    fn name(&self) -> &'static str {
        "square"
    }

    async fn charge(&self, request: ChargeRequest) -> Result<GatewayCharge, PaymentError> {
        let mut body = json!({
            "idempotency_key": request.idempotency_key,
            "source_id": request.source_id,
            "amount_money": { "amount": request.amount_minor, "currency": request.currency },
            "customer_id": request.gateway_customer_id,
            "reference_id": request.reference_id,
            "autocomplete": true,
        });
        if let Some(note) = &request.note {
            body["note"] = json!(note);
        }

        let resp = self.post_json("/v2/payments", body).await?;
        parse_charge(&resp)
    }

    async fn refund(&self, request: RefundRequest) -> Result<GatewayRefund, PaymentError> {
        let mut body = json!({
            "idempotency_key": request.idempotency_key,
            "payment_id": request.gateway_payment_id,
        });
        if let (Some(amount), Some(currency)) = (request.amount_minor, &request.currency) {
            body["amount_money"] = json!({ "amount": amount, "currency": currency });
        }
        if let Some(reason) = &request.reason {
            body["reason"] = json!(reason);
        }

        let resp = self.post_json("/v2/refunds", body).await?;
        parse_refund(&resp)
    }

    async fn get_payment(&self, gateway_payment_id: &str) -> Result<GatewayCharge, PaymentError> {
        let resp = self
            .get_json(&format!("/v2/payments/{gateway_payment_id}"), &[])
            .await?;
        parse_charge(&resp)
    }

    async fn list_payments(&self, query: ListPaymentsQuery) -> Result<PaymentPage, PaymentError> {
        let mut params = Vec::new();
        if let Some(begin) = query.begin_time {
            params.push(("begin_time".to_string(), begin.to_rfc3339()));
        }
        if let Some(end) = query.end_time {
            params.push(("end_time".to_string(), end.to_rfc3339()));
        }
        if let Some(cursor) = query.cursor {
            params.push(("cursor".to_string(), cursor));
        }
        if let Some(limit) = query.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        let resp = self.get_json("/v2/payments", &params).await?;
        let payments = resp
            .get("payments")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(parse_charge).collect::<Result<Vec<_>, _>>())
            .transpose()?
            .unwrap_or_default();

        Ok(PaymentPage {
            payments,
            cursor: resp.get("cursor").and_then(Value::as_str).map(ToString::to_string),
        })
    }
}

#[async_trait]
impl BookingMirror for SquareGateway {
    async fn mirror_booking(&self, booking: &Booking) -> Result<String, PaymentError> {
        let body = json!({
            "idempotency_key": booking.id,
            "booking": {
                "start_at": booking.start_at.to_rfc3339(),
                "customer_id": booking.customer_id,
                "customer_note": booking.note,
                "appointment_segments": [{
                    "duration_minutes": booking.duration_minutes,
                    "team_member_id": booking.artist_id,
                }],
            },
        });

        let resp = self.post_json("/v2/bookings", body).await?;
        resp.pointer("/booking/id")
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .ok_or_else(|| PaymentError::Other(anyhow!("gateway response missing booking id")))
    }
}

fn extract_errors(body: &Value) -> Vec<GatewayErrorDetail> {
    body.get("errors")
        .and_then(Value::as_array)
        .map(|errs| {
            errs.iter()
                .map(|e| GatewayErrorDetail {
                    category: e.get("category").and_then(Value::as_str).map(ToString::to_string),
                    code: e.get("code").and_then(Value::as_str).map(ToString::to_string),
                    detail: e.get("detail").and_then(Value::as_str).map(ToString::to_string),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn parse_charge(body: &Value) -> Result<GatewayCharge, PaymentError> {
    let payment = body.get("payment").unwrap_or(body);
    let id = payment
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| PaymentError::Other(anyhow!("gateway response missing payment id")))?;

    Ok(GatewayCharge {
        id: id.to_string(),
        status: payment
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("COMPLETED")
            .to_string(),
        amount_minor: payment
            .pointer("/amount_money/amount")
            .and_then(Value::as_i64)
            .unwrap_or(0),
        currency: payment
            .pointer("/amount_money/currency")
            .and_then(Value::as_str)
            .unwrap_or("USD")
            .to_string(),
        source_type: payment
            .get("source_type")
            .and_then(Value::as_str)
            .map(ToString::to_string),
        raw: body.clone(),
    })
}

fn parse_refund(body: &Value) -> Result<GatewayRefund, PaymentError> {
    let refund = body.get("refund").unwrap_or(body);
    let id = refund
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| PaymentError::Other(anyhow!("gateway response missing refund id")))?;

    Ok(GatewayRefund {
        id: id.to_string(),
        status: refund
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("COMPLETED")
            .to_string(),
        amount_minor: refund.pointer("/amount_money/amount").and_then(Value::as_i64),
        currency: refund
            .pointer("/amount_money/currency")
            .and_then(Value::as_str)
            .map(ToString::to_string),
        raw: body.clone(),
    })
}
