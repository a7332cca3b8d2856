//! Payment repository interface

use async_trait::async_trait;

use super::model::{NewPayment, Payment, PaymentStatus};
use crate::domain::{DomainResult, Updated};

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// All payments, optionally only those for one reservation.
    async fn find_all(&self, reservation_id: Option<&str>) -> Vec<Payment>;

    async fn find_by_id(&self, id: &str) -> Option<Payment>;

    async fn create(&self, draft: NewPayment) -> DomainResult<Payment>;

    async fn update_status(&self, id: &str, status: PaymentStatus) -> DomainResult<Updated<Payment>>;
}
