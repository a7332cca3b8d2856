//! Overlap detection between a candidate booking and the stored list.

use super::model::Reservation;
use crate::domain::{DomainError, DomainResult};

/// First active reservation, other than `candidate` itself, that occupies the
/// same court on the same date during an overlapping time.
pub fn find_conflict<'a>(candidate: &Reservation, existing: &'a [Reservation]) -> Option<&'a Reservation> {
    if !candidate.is_active() {
        return None;
    }
    existing.iter().find(|other| {
        other.id != candidate.id
            && other.blocks(&candidate.court_id, candidate.date, &candidate.time_slot)
    })
}

/// `Err(Conflict)` naming the colliding reservation, if any.
pub fn ensure_no_conflict(candidate: &Reservation, existing: &[Reservation]) -> DomainResult<()> {
    match find_conflict(candidate, existing) {
        Some(other) => Err(DomainError::Conflict {
            reservation_id: other.id.clone(),
            start: other.time_slot.start.to_string(),
            end: other.time_slot.end.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::domain::reservation::{Occupant, ReservationStatus, TimeSlot};

    fn reservation(id: &str, court: &str, day: u32, start: &str, end: &str) -> Reservation {
        Reservation {
            id: id.into(),
            court_id: court.into(),
            date: NaiveDate::from_ymd_opt(2026, 2, day).unwrap(),
            time_slot: TimeSlot::parse(start, end).unwrap(),
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
    fn overlapping_slot_on_same_court_conflicts() {
        let existing = vec![reservation("1", "1", 1, "10:00", "11:00")];
        let candidate = reservation("2", "1", 1, "10:30", "11:30");

        match ensure_no_conflict(&candidate, &existing) {
            Err(DomainError::Conflict {
                reservation_id,
                start,
                end,
            }) => {
                assert_eq!(reservation_id, "1");
                assert_eq!(start, "10:00");
                assert_eq!(end, "11:00");
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn adjacent_slot_is_allowed() {
        let existing = vec![reservation("1", "1", 1, "10:00", "11:00")];
        let candidate = reservation("2", "1", 1, "11:00", "12:00");
        assert!(ensure_no_conflict(&candidate, &existing).is_ok());
    }

    #[test]
    fn other_court_or_date_is_allowed() {
        let existing = vec![reservation("1", "1", 1, "10:00", "11:00")];
        assert!(ensure_no_conflict(&reservation("2", "2", 1, "10:00", "11:00"), &existing).is_ok());
        assert!(ensure_no_conflict(&reservation("2", "1", 2, "10:00", "11:00"), &existing).is_ok());
    }

    #[test]
    fn cancelled_reservations_are_ignored() {
        let mut cancelled = reservation("1", "1", 1, "10:00", "11:00");
        cancelled.status = ReservationStatus::Cancelled;
        let candidate = reservation("2", "1", 1, "10:00", "11:00");
        assert!(ensure_no_conflict(&candidate, &[cancelled]).is_ok());
    }

    #[test]
    fn a_reservation_never_conflicts_with_itself() {
        let stored = reservation("1", "1", 1, "10:00", "11:00");
        let mut moved = stored.clone();
        moved.time_slot = TimeSlot::parse("10:30", "11:30").unwrap();
        assert!(ensure_no_conflict(&moved, &[stored]).is_ok());
    }

    #[test]
    fn cancelled_candidate_never_conflicts() {
        let existing = vec![reservation("1", "1", 1, "10:00", "11:00")];
        let mut candidate = reservation("2", "1", 1, "10:00", "11:00");
        candidate.status = ReservationStatus::Cancelled;
        assert!(find_conflict(&candidate, &existing).is_none());
    }

    #[test]
    fn conflict_detection_is_symmetric() {
        let slots = [
            ("09:00", "10:00"),
            ("09:30", "10:30"),
            ("10:00", "11:00"),
            ("10:15", "10:45"),
            ("11:00", "12:00"),
            ("08:00", "12:00"),
        ];
        for (s1, e1) in slots {
            for (s2, e2) in slots {
                let a = reservation("a", "1", 1, s1, e1);
                let b = reservation("b", "1", 1, s2, e2);
                assert_eq!(
                    find_conflict(&a, std::slice::from_ref(&b)).is_some(),
                    find_conflict(&b, std::slice::from_ref(&a)).is_some(),
                    "{s1}-{e1} vs {s2}-{e2}"
                );
            }
        }
    }
}
