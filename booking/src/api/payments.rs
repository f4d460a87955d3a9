//! Payment, boleto and receipt endpoints.

use super::{ApiClient, ApiError};
use crate::types::{Boleto, EventId, Payment, PaymentDraft, PaymentId, PaymentStatus, Receipt};
use reqwest::{header, Method};

impl ApiClient {
    /// Payments towards one event
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn payments_by_event(&self, event_id: EventId) -> Result<Vec<Payment>, ApiError> {
        self.get(&format!("payments/event/{event_id}")).await
    }

    /// Record a payment
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn create_payment(&self, draft: &PaymentDraft) -> Result<Payment, ApiError> {
        self.post("payments", draft).await
    }

    /// Replace a payment
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn update_payment(
        &self,
        payment_id: PaymentId,
        draft: &PaymentDraft,
    ) -> Result<Payment, ApiError> {
        self.put(&format!("payments/{payment_id}"), draft).await
    }

    /// Change only a payment's status, keeping its other fields
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn update_payment_status(
        &self,
        payment: &Payment,
        status: PaymentStatus,
    ) -> Result<Payment, ApiError> {
        let draft = PaymentDraft {
            event_id: payment.event_id,
            amount: payment.amount,
            method: payment.method,
            status,
            due_date: payment.due_date,
        };
        self.update_payment(payment.id, &draft).await
    }

    /// Boleto already issued for a payment
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if none was issued.
    pub async fn boleto(&self, payment_id: PaymentId) -> Result<Boleto, ApiError> {
        self.get(&format!("payments/{payment_id}/boleto")).await
    }

    /// Ask the backend to issue a boleto for a payment
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn generate_boleto(&self, payment_id: PaymentId) -> Result<Boleto, ApiError> {
        self.post(&format!("payments/{payment_id}/boleto"), &serde_json::json!({}))
            .await
    }

    /// Attach a receipt file to a payment; returns the updated payment
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn upload_receipt(
        &self,
        payment_id: PaymentId,
        receipt: Receipt,
    ) -> Result<Payment, ApiError> {
        let Receipt {
            file_name,
            content_type,
            bytes,
        } = receipt;
        let disposition = format!("attachment; filename=\"{}\"", file_name.replace('"', ""));

        let response = self
            .execute(Method::POST, &format!("payments/{payment_id}/receipt"), |request| {
                request
                    .header(header::CONTENT_TYPE, content_type)
                    .header(header::CONTENT_DISPOSITION, disposition)
                    .body(bytes)
            })
            .await?;

        response
            .json::<Payment>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Download the receipt attached to a payment
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the payment has no receipt.
    pub async fn download_receipt(&self, payment_id: PaymentId) -> Result<Receipt, ApiError> {
        let response = self
            .execute(Method::GET, &format!("payments/{payment_id}/receipt"), |request| request)
            .await?;

        let headers = response.headers();
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let file_name = headers
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(disposition_file_name)
            .unwrap_or_else(|| format!("receipt-{payment_id}"));

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Receipt {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}

/// `attachment; filename="x.pdf"` → `x.pdf`
fn disposition_file_name(disposition: &str) -> Option<String> {
    disposition
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    #[test]
    fn file_name_is_read_from_disposition() {
        assert_eq!(
            disposition_file_name("attachment; filename=\"pix-0312.pdf\""),
            Some("pix-0312.pdf".to_string())
        );
        assert_eq!(disposition_file_name("inline"), None);
        assert_eq!(disposition_file_name("attachment; filename=\"\""), None);
    }
}
