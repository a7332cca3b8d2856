//! Payment recording service
//!
//! The payment provider is opaque: this service only records what the provider
//! reported and mirrors the latest status onto the reservation.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::application::access::Actor;
use crate::domain::reservation::PaymentInfo;
use crate::domain::{
    DomainError, DomainResult, NewPayment, Payment, PaymentStatus, RepositoryProvider, Reservation,
    ReservationPatch,
};

/// Provider-reported payment for one reservation.
#[derive(Debug, Clone)]
pub struct PaymentRecord {
    pub reservation_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: PaymentStatus,
    pub provider_reference: String,
}

pub struct PaymentService {
    repos: Arc<dyn RepositoryProvider>,
}

/// Mirroring payment fields never moves a booking, so there is nothing to check.
fn payment_only(_: &Reservation, _: &[Reservation]) -> DomainResult<()> {
    Ok(())
}

impl PaymentService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn record(&self, actor: &Actor, record: PaymentRecord) -> DomainResult<Payment> {
        actor.require_admin()?;
        if record.amount <= Decimal::ZERO {
            return Err(DomainError::Validation("amount must be positive".into()));
        }
        let currency = record.currency.trim().to_ascii_uppercase();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::Validation(format!(
                "Invalid currency '{}', expected an ISO 4217 code",
                record.currency
            )));
        }

        let reservation = self
            .repos
            .reservations()
            .find_by_id(&record.reservation_id)
            .await
            .ok_or_else(|| DomainError::not_found("Reservation", &record.reservation_id))?;

        let payment = self
            .repos
            .payments()
            .create(NewPayment {
                reservation_id: reservation.id.clone(),
                member_id: reservation.member_id().map(str::to_string),
                amount: record.amount,
                currency,
                status: record.status,
                provider_reference: record.provider_reference,
            })
            .await?;
        info!(
            payment_id = %payment.id,
            reservation_id = %payment.reservation_id,
            status = %payment.status,
            "Payment recorded"
        );

        self.mirror(&payment).await?;
        Ok(payment)
    }

    pub async fn update_status(&self, actor: &Actor, id: &str, status: PaymentStatus) -> DomainResult<Payment> {
        actor.require_admin()?;
        let updated = self.repos.payments().update_status(id, status).await?;
        if updated.before.status != updated.after.status {
            info!(payment_id = %id, from = %updated.before.status, to = %updated.after.status, "Payment status changed");
        }
        self.mirror(&updated.after).await?;
        Ok(updated.after)
    }

    pub async fn list(&self, actor: &Actor, reservation_id: Option<&str>) -> DomainResult<Vec<Payment>> {
        actor.require_admin()?;
        Ok(self.repos.payments().find_all(reservation_id).await)
    }

    async fn mirror(&self, payment: &Payment) -> DomainResult<()> {
        let patch = ReservationPatch {
            payment: Some(PaymentInfo {
                payment_id: payment.id.clone(),
                status: payment.status.to_string(),
                amount: payment.amount,
            }),
            ..ReservationPatch::default()
        };
        self.repos
            .reservations()
            .update(&payment.reservation_id, patch, &payment_only)
            .await
            .map(|_| ())
            .map_err(|e| {
                warn!(payment_id = %payment.id, error = %e, "Failed to mirror payment onto reservation");
                e
            })
    }
}
