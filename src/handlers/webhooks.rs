use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use super::blocking;
use crate::domain::order::StatusChange;
use crate::errors::AppError;
use crate::payment::PaymentNotification;
use crate::state::AppState;

pub const SIGNATURE_HEADER: &str = "X-Signature";

#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookAck {
    /// `applied`, `unchanged` or `ignored`
    pub result: String,
    pub status: String,
}

/// POST /webhooks/payment
///
/// Payment processor callback. The body is logged, its signature checked
/// against the merchant secret, and the embedded order reference moved to
/// the status the gateway reports.
#[utoipa::path(
    post,
    path = "/webhooks/payment",
    request_body(content = String, description = "Gateway JSON payload", content_type = "application/json"),
    params(("X-Signature" = Option<String>, Header, description = "Hex HMAC-SHA256 of the body")),
    responses(
        (status = 200, description = "Notification acknowledged", body = WebhookAck),
        (status = 400, description = "Malformed payload"),
        (status = 401, description = "Missing or invalid signature"),
        (status = 404, description = "Unknown order reference"),
    ),
    tag = "payments"
)]
pub async fn payment_webhook(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    log::info!(
        "Payment webhook received: {}",
        String::from_utf8_lossy(&body)
    );

    if state.gateway.verifies_webhooks() {
        let signature = req
            .headers()
            .get(SIGNATURE_HEADER)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing signature".to_string()))?;
        if !state.gateway.verify(&body, signature)? {
            log::warn!("Rejected payment webhook with invalid signature");
            return Err(AppError::Unauthorized("invalid signature".to_string()));
        }
    }

    let notification = PaymentNotification::parse(&body)?;
    let change = blocking(move || state.orders.apply_payment_notification(&notification)).await?;

    let ack = match change {
        StatusChange::Applied { to, .. } => WebhookAck {
            result: "applied".to_string(),
            status: to.to_string(),
        },
        StatusChange::Unchanged(current) => WebhookAck {
            result: "unchanged".to_string(),
            status: current.to_string(),
        },
        StatusChange::Rejected { current, .. } => WebhookAck {
            result: "ignored".to_string(),
            status: current.to_string(),
        },
    };
    Ok(HttpResponse::Ok().json(ack))
}
