//! Reservation domain entity

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::time_slot::{ClockTime, TimeSlot};
use crate::domain::{DomainError, DomainResult};

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Confirmed,
    /// Soft-deleted. The record is kept but no longer blocks the court.
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "confirmed" => Some(Self::Confirmed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who holds the court: a member, or a guest identified by contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Occupant {
    #[serde(rename_all = "camelCase")]
    Member { member_id: String },
    #[serde(rename_all = "camelCase")]
    Guest {
        guest_name: String,
        guest_email: String,
        guest_phone: String,
    },
}

impl Occupant {
    /// Build the occupant from loose request fields.
    ///
    /// Exactly one of `member_id` or the complete guest triple must be given.
    pub fn resolve(
        member_id: Option<String>,
        guest_name: Option<String>,
        guest_email: Option<String>,
        guest_phone: Option<String>,
    ) -> DomainResult<Self> {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        let any_guest = !blank(&guest_name) || !blank(&guest_email) || !blank(&guest_phone);

        match (member_id, any_guest) {
            (Some(member_id), false) if !member_id.trim().is_empty() => Ok(Self::Member {
                member_id: member_id.trim().to_string(),
            }),
            (Some(_), true) => Err(DomainError::Validation(
                "Provide either memberId or guest details, not both".into(),
            )),
            (_, true) => {
                if blank(&guest_name) || blank(&guest_email) || blank(&guest_phone) {
                    return Err(DomainError::Validation(
                        "Guest bookings require guestName, guestEmail and guestPhone".into(),
                    ));
                }
                let guest_email = guest_email.unwrap_or_default().trim().to_string();
                if !is_plausible_email(&guest_email) {
                    return Err(DomainError::Validation(format!(
                        "Invalid guest email '{}'",
                        guest_email
                    )));
                }
                Ok(Self::Guest {
                    guest_name: guest_name.unwrap_or_default().trim().to_string(),
                    guest_email,
                    guest_phone: guest_phone.unwrap_or_default().trim().to_string(),
                })
            }
            _ => Err(DomainError::Validation(
                "Either memberId or guest details are required".into(),
            )),
        }
    }

    pub fn member_id(&self) -> Option<&str> {
        match self {
            Self::Member { member_id } => Some(member_id),
            Self::Guest { .. } => None,
        }
    }
}

/// `local@domain.tld`, no whitespace.
pub fn is_plausible_email(raw: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
        .is_match(raw)
}

/// Court reservation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    /// Creation-ordered identifier
    pub id: String,
    pub court_id: String,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    #[serde(flatten)]
    pub occupant: Occupant,
    pub status: ReservationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub payment_amount: Option<Decimal>,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl Reservation {
    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Confirmed
    }

    pub fn member_id(&self) -> Option<&str> {
        self.occupant.member_id()
    }

    /// Whether this reservation occupies `court_id` on `date` at any point of `slot`.
    pub fn blocks(&self, court_id: &str, date: NaiveDate, slot: &TimeSlot) -> bool {
        self.is_active()
            && self.court_id == court_id
            && self.date == date
            && self.time_slot.overlaps(slot)
    }
}

/// Everything needed to create a reservation; the repository assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub court_id: String,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub occupant: Occupant,
    pub notes: String,
}

/// Partial update. `None` leaves the field unchanged; the id is never patchable.
#[derive(Debug, Clone, Default)]
pub struct ReservationPatch {
    pub court_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub start: Option<ClockTime>,
    pub end: Option<ClockTime>,
    pub notes: Option<String>,
    pub status: Option<ReservationStatus>,
    pub payment: Option<PaymentInfo>,
}

impl ReservationPatch {
    pub fn cancel() -> Self {
        Self {
            status: Some(ReservationStatus::Cancelled),
            ..Self::default()
        }
    }

    pub fn changes_schedule(&self) -> bool {
        self.court_id.is_some() || self.date.is_some() || self.start.is_some() || self.end.is_some()
    }

    /// Merge into `target`. Start and end are set independently, so the
    /// resulting slot must be re-validated by the caller.
    pub fn apply(&self, target: &mut Reservation) {
        if let Some(court_id) = &self.court_id {
            target.court_id = court_id.clone();
        }
        if let Some(date) = self.date {
            target.date = date;
        }
        if let Some(start) = self.start {
            target.time_slot.start = start;
        }
        if let Some(end) = self.end {
            target.time_slot.end = end;
        }
        if let Some(notes) = &self.notes {
            target.notes = notes.clone();
        }
        if let Some(status) = self.status {
            target.status = status;
        }
        if let Some(payment) = &self.payment {
            target.payment_id = Some(payment.payment_id.clone());
            target.payment_status = Some(payment.status.clone());
            target.payment_amount = Some(payment.amount);
        }
    }
}

/// Payment fields mirrored onto a reservation.
#[derive(Debug, Clone)]
pub struct PaymentInfo {
    pub payment_id: String,
    pub status: String,
    pub amount: Decimal,
}

/// In-memory filter for reservation listings.
#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    pub date: Option<NaiveDate>,
    pub court_id: Option<String>,
    pub member_id: Option<String>,
    pub status: Option<ReservationStatus>,
}

impl ReservationFilter {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    pub fn matches(&self, r: &Reservation) -> bool {
        self.date.map_or(true, |d| r.date == d)
            && self.court_id.as_deref().map_or(true, |c| r.court_id == c)
            && self
                .member_id
                .as_deref()
                .map_or(true, |m| r.member_id() == Some(m))
            && self.status.map_or(true, |s| r.status == s)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_reservation() -> Reservation {
        Reservation {
            id: "1769940000000".into(),
            court_id: "1".into(),
            date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            time_slot: TimeSlot::parse("10:00", "11:00").unwrap(),
            occupant: Occupant::Member {
                member_id: "m-1".into(),
            },
            status: ReservationStatus::Confirmed,
            payment_id: None,
            payment_status: None,
            payment_amount: None,
            notes: String::new(),
            created_at: Utc::now(),
            last_modified: Utc::now(),
        }
    }

    #[test]
    fn member_reservation_serializes_flat() {
        let json = serde_json::to_value(sample_reservation()).unwrap();
        assert_eq!(json["memberId"], "m-1");
        assert_eq!(json["courtId"], "1");
        assert_eq!(json["date"], "2026-02-01");
        assert_eq!(json["timeSlot"]["start"], "10:00");
        assert_eq!(json["status"], "confirmed");
        assert!(json.get("guestEmail").is_none());
        assert!(json.get("paymentId").is_none());
    }

    #[test]
    fn guest_reservation_roundtrips_occupant() {
        let mut r = sample_reservation();
        r.occupant = Occupant::Guest {
            guest_name: "Ann".into(),
            guest_email: "ann@example.com".into(),
            guest_phone: "555-0100".into(),
        };
        let back: Reservation = serde_json::from_value(serde_json::to_value(&r).unwrap()).unwrap();
        assert_eq!(back.occupant, r.occupant);
        assert_eq!(back.member_id(), None);
    }

    #[test]
    fn cancelled_reservations_do_not_block() {
        let mut r = sample_reservation();
        let slot = TimeSlot::parse("10:30", "11:30").unwrap();
        assert!(r.blocks("1", r.date, &slot));
        assert!(!r.blocks("2", r.date, &slot));
        r.status = ReservationStatus::Cancelled;
        assert!(!r.blocks("1", r.date, &slot));
    }

    #[test]
    fn patch_leaves_unset_fields_alone() {
        let mut r = sample_reservation();
        let patch = ReservationPatch {
            notes: Some("bring balls".into()),
            ..ReservationPatch::default()
        };
        patch.apply(&mut r);
        assert_eq!(r.notes, "bring balls");
        assert_eq!(r.court_id, "1");
        assert_eq!(r.status, ReservationStatus::Confirmed);

        ReservationPatch::cancel().apply(&mut r);
        assert_eq!(r.status, ReservationStatus::Cancelled);
    }

    #[test]
    fn filter_matches_on_every_set_field() {
        let r = sample_reservation();
        assert!(ReservationFilter::default().matches(&r));
        assert!(ReservationFilter::for_date(r.date).matches(&r));
        let other_member = ReservationFilter {
            member_id: Some("m-2".into()),
            ..ReservationFilter::default()
        };
        assert!(!other_member.matches(&r));
        let cancelled = ReservationFilter {
            status: Some(ReservationStatus::Cancelled),
            ..ReservationFilter::default()
        };
        assert!(!cancelled.matches(&r));
    }

    #[test]
    fn patch_can_move_only_the_end_time() {
        let mut r = sample_reservation();
        let patch = ReservationPatch {
            end: Some(ClockTime::parse("12:00").unwrap()),
            ..ReservationPatch::default()
        };
        assert!(patch.changes_schedule());
        patch.apply(&mut r);
        assert_eq!(r.time_slot.to_string(), "10:00-12:00");
        assert!(!ReservationPatch::cancel().changes_schedule());
    }

    #[test]
    fn occupant_requires_exactly_one_kind() {
        let member = Occupant::resolve(Some("m-1".into()), None, None, None).unwrap();
        assert_eq!(member.member_id(), Some("m-1"));

        let guest = Occupant::resolve(
            None,
            Some("Ann".into()),
            Some("ann@example.com".into()),
            Some("555-0100".into()),
        )
        .unwrap();
        assert_eq!(guest.member_id(), None);

        assert!(Occupant::resolve(None, None, None, None).is_err());
        assert!(Occupant::resolve(Some("m-1".into()), Some("Ann".into()), None, None).is_err());
        assert!(Occupant::resolve(None, Some("Ann".into()), Some("ann@example.com".into()), None).is_err());
        assert!(Occupant::resolve(Some("  ".into()), None, None, None).is_err());
    }

    #[test]
    fn guest_email_must_look_like_an_address() {
        for bad in ["ann", "ann@", "ann@example", "a n@example.com"] {
            let result = Occupant::resolve(None, Some("Ann".into()), Some(bad.into()), Some("1".into()));
            assert!(matches!(result, Err(DomainError::Validation(_))), "{bad}");
        }
        assert!(is_plausible_email("ann.lee+tennis@example.co.uk"));
    }

    #[test]
    fn status_parse_roundtrip() {
        for status in [ReservationStatus::Confirmed, ReservationStatus::Cancelled] {
            assert_eq!(ReservationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ReservationStatus::parse("expired"), None);
    }
}
