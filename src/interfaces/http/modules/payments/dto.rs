//! Payment DTOs

use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::PaymentRecord;
use crate::domain::PaymentStatus;

/// What the provider reported for one reservation.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    #[validate(length(min = 1, message = "reservationId is required"))]
    pub reservation_id: String,
    #[schema(value_type = String, example = "25.00")]
    pub amount: Decimal,
    #[schema(example = "EUR")]
    pub currency: String,
    /// Defaults to `pending`
    pub status: Option<PaymentStatus>,
    #[serde(default)]
    pub provider_reference: String,
}

impl From<RecordPaymentRequest> for PaymentRecord {
    fn from(r: RecordPaymentRequest) -> Self {
        Self {
            reservation_id: r.reservation_id,
            amount: r.amount,
            currency: r.currency,
            status: r.status.unwrap_or(PaymentStatus::Pending),
            provider_reference: r.provider_reference,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePaymentStatusRequest {
    pub status: PaymentStatus,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListPaymentsParams {
    pub reservation_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_pending() {
        let req: RecordPaymentRequest = serde_json::from_str(
            r#"{"reservationId":"1700000000000","amount":"25.00","currency":"eur"}"#,
        )
        .unwrap();
        let record = PaymentRecord::from(req);
        assert_eq!(record.status, PaymentStatus::Pending);
        assert_eq!(record.amount.to_string(), "25.00");
    }
}
