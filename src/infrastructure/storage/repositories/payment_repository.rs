//! JSON-file implementation of PaymentRepository

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use uuid::Uuid;

use crate::domain::payment::{NewPayment, Payment, PaymentRepository, PaymentStatus};
use crate::domain::{DomainError, DomainResult, Updated};
use crate::infrastructure::storage::{JsonFileStore, LockOptions};

pub const PAYMENTS_FILE: &str = "payments.json";

pub struct JsonPaymentRepository {
    store: JsonFileStore<Payment>,
}

impl JsonPaymentRepository {
    pub fn new(data_dir: &Path, options: LockOptions) -> Self {
        Self {
            store: JsonFileStore::new(data_dir.join(PAYMENTS_FILE), options),
        }
    }
}

#[async_trait]
impl PaymentRepository for JsonPaymentRepository {
    async fn find_all(&self, reservation_id: Option<&str>) -> Vec<Payment> {
        self.store
            .read_all()
            .await
            .into_iter()
            .filter(|p| reservation_id.map_or(true, |r| p.reservation_id == r))
            .collect()
    }

    async fn find_by_id(&self, id: &str) -> Option<Payment> {
        self.store.read_all().await.into_iter().find(|p| p.id == id)
    }

    async fn create(&self, draft: NewPayment) -> DomainResult<Payment> {
        self.store
            .mutate(|records: &mut Vec<Payment>| {
                let now = Utc::now();
                let payment = Payment {
                    id: Uuid::new_v4().to_string(),
                    reservation_id: draft.reservation_id,
                    member_id: draft.member_id,
                    amount: draft.amount,
                    currency: draft.currency,
                    status: draft.status,
                    provider_reference: draft.provider_reference,
                    created_at: now,
                    last_modified: now,
                };
                debug!(
                    "Recording payment {} for reservation {}",
                    payment.id, payment.reservation_id
                );
                records.push(payment.clone());
                Ok(payment)
            })
            .await
    }

    async fn update_status(&self, id: &str, status: PaymentStatus) -> DomainResult<Updated<Payment>> {
        self.store
            .mutate(|records: &mut Vec<Payment>| {
                let payment = records
                    .iter_mut()
                    .find(|p| p.id == id)
                    .ok_or_else(|| DomainError::not_found("Payment", id))?;
                let before = payment.clone();
                payment.status = status;
                payment.last_modified = Utc::now();
                Ok(Updated {
                    before,
                    after: payment.clone(),
                })
            })
            .await
    }
}
