//! Signed redirects to the hosted payment page.
//!
//! The payload is serialized once; the signature is a lowercase hex
//! HMAC-SHA256 over exactly those bytes, keyed with the merchant secret.
//! Webhook callbacks are verified with the same key over the raw body.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use bigdecimal::BigDecimal;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use url::Url;

use crate::config::PaymentConfig;
use crate::domain::errors::DomainError;

type HmacSha256 = Hmac<Sha256>;

/// What checkout hands to the gateway for one order.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub order_reference: String,
    pub amount: BigDecimal,
    pub customer_email: String,
    pub customer_phone: String,
    pub description: String,
}

/// Field order is part of the signed bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPayload {
    pub merchant_id: String,
    pub merchant_reference: String,
    pub amount: String,
    pub currency: String,
    pub description: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub success_url: String,
    pub failure_url: String,
    pub notify_url: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone)]
pub struct SignedPaymentRequest {
    pub payload: PaymentPayload,
    pub body: Vec<u8>,
    pub signature: String,
}

#[derive(Debug, Clone)]
pub struct PaymentGateway {
    config: PaymentConfig,
    base_url: Url,
}

/// Amount with exactly two decimals, e.g. `1500.00`.
pub fn format_amount(amount: &BigDecimal) -> String {
    amount.round(2).with_scale(2).to_string()
}

impl PaymentGateway {
    pub fn new(config: PaymentConfig, base_url: Url) -> Self {
        Self { config, base_url }
    }

    pub fn verifies_webhooks(&self) -> bool {
        self.config.verify_webhooks
    }

    pub fn merchant_id(&self) -> &str {
        &self.config.merchant_id
    }

    fn mac(&self) -> Result<HmacSha256, DomainError> {
        HmacSha256::new_from_slice(self.config.secret_key.as_bytes())
            .map_err(|e| DomainError::Internal(format!("payment signing key: {e}")))
    }

    pub fn sign_bytes(&self, bytes: &[u8]) -> Result<String, DomainError> {
        let mut mac = self.mac()?;
        mac.update(bytes);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Constant-time check of a hex signature over `bytes`.
    /// Malformed hex is a mismatch, not an error.
    pub fn verify(&self, bytes: &[u8], signature_hex: &str) -> Result<bool, DomainError> {
        let Ok(expected) = hex::decode(signature_hex.trim()) else {
            return Ok(false);
        };
        let mut mac = self.mac()?;
        mac.update(bytes);
        Ok(mac.verify_slice(&expected).is_ok())
    }

    fn callback_url(&self, path: &str, reference: &str) -> Result<String, DomainError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| DomainError::Internal(format!("invalid callback url: {e}")))?;
        if !reference.is_empty() {
            url.query_pairs_mut().append_pair("reference", reference);
        }
        Ok(url.to_string())
    }

    pub fn build_payload(
        &self,
        request: &PaymentRequest,
        timestamp: i64,
    ) -> Result<PaymentPayload, DomainError> {
        Ok(PaymentPayload {
            merchant_id: self.config.merchant_id.clone(),
            merchant_reference: format!("{}:{}", self.config.merchant_id, request.order_reference),
            amount: format_amount(&request.amount),
            currency: self.config.currency.clone(),
            description: request.description.clone(),
            customer_email: request.customer_email.clone(),
            customer_phone: request.customer_phone.clone(),
            success_url: self.callback_url("/checkout/success", &request.order_reference)?,
            failure_url: self.callback_url("/checkout/failure", &request.order_reference)?,
            notify_url: self.callback_url("/webhooks/payment", "")?,
            timestamp,
        })
    }

    pub fn sign(&self, payload: PaymentPayload) -> Result<SignedPaymentRequest, DomainError> {
        let body = serde_json::to_vec(&payload)
            .map_err(|e| DomainError::Internal(format!("payment payload: {e}")))?;
        let signature = self.sign_bytes(&body)?;
        Ok(SignedPaymentRequest {
            payload,
            body,
            signature,
        })
    }

    pub fn redirect_url(&self, signed: &SignedPaymentRequest) -> Url {
        let mut url = self.config.hosted_page_url.clone();
        url.query_pairs_mut()
            .append_pair("payload", &URL_SAFE_NO_PAD.encode(&signed.body))
            .append_pair("signature", &signed.signature);
        url
    }

    /// Builds, signs and returns the hosted page URL for `request`.
    pub fn checkout_redirect(
        &self,
        request: &PaymentRequest,
        timestamp: i64,
    ) -> Result<Url, DomainError> {
        let payload = self.build_payload(request, timestamp)?;
        let signed = self.sign(payload)?;
        log::debug!(
            "Signed payment request for {} ({} {})",
            signed.payload.merchant_reference,
            signed.payload.amount,
            signed.payload.currency
        );
        Ok(self.redirect_url(&signed))
    }
}
