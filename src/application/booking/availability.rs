//! Per-court free/busy grid for one date, cache-first.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{OpeningHours, RepositoryProvider, ReservationFilter, ReservationStatus};
use crate::infrastructure::TtlCache;

pub type AvailabilityCache = TtlCache<DayAvailability>;

const KEY_PREFIX: &str = "availability:";

/// Cache key for one date, `availability:YYYY-MM-DD`.
pub fn availability_key(date: NaiveDate) -> String {
    format!("{}{}", KEY_PREFIX, date.format("%Y-%m-%d"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotAvailability {
    #[schema(example = "10:00")]
    pub start: String,
    #[schema(example = "11:00")]
    pub end: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourtAvailability {
    pub court_id: String,
    pub court_name: String,
    pub court_type: String,
    pub slots: Vec<SlotAvailability>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub availability: Vec<CourtAvailability>,
}

pub struct AvailabilityService {
    repos: Arc<dyn RepositoryProvider>,
    cache: Arc<AvailabilityCache>,
    hours: OpeningHours,
}

impl AvailabilityService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, cache: Arc<AvailabilityCache>, hours: OpeningHours) -> Self {
        Self { repos, cache, hours }
    }

    pub async fn for_date(&self, date: NaiveDate) -> DayAvailability {
        let key = availability_key(date);
        if let Some(hit) = self.cache.get(&key) {
            metrics::counter!("availability_cache_hits_total").increment(1);
            return hit;
        }
        metrics::counter!("availability_cache_misses_total").increment(1);

        let generation = self.cache.generation();
        let day = self.compute(date).await;
        if !self.cache.set_if_generation(key, day.clone(), None, generation) {
            debug!(%date, "Availability changed while computing; result not cached");
        }
        day
    }

    async fn compute(&self, date: NaiveDate) -> DayAvailability {
        let courts = self.repos.courts().find_all().await;
        let filter = ReservationFilter {
            status: Some(ReservationStatus::Confirmed),
            ..ReservationFilter::for_date(date)
        };
        let booked = self.repos.reservations().find_all(&filter).await;
        let grid = self.hours.grid();

        debug!(%date, courts = courts.len(), booked = booked.len(), "Computing availability");

        let availability = courts
            .into_iter()
            .filter(|court| court.is_active)
            .map(|court| {
                let slots = grid
                    .iter()
                    .map(|slot| SlotAvailability {
                        start: slot.start.to_string(),
                        end: slot.end.to_string(),
                        available: !booked.iter().any(|r| r.blocks(&court.id, date, slot)),
                    })
                    .collect();
                CourtAvailability {
                    court_id: court.id,
                    court_name: court.name,
                    court_type: court.court_type,
                    slots,
                }
            })
            .collect();

        DayAvailability { date, availability }
    }
}
