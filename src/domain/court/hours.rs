//! Facility opening hours and the fixed slot grid

use crate::domain::reservation::{ClockTime, TimeSlot};
use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningHours {
    pub open: ClockTime,
    pub close: ClockTime,
    /// Width of one bookable grid slot
    pub slot_minutes: u16,
}

impl OpeningHours {
    pub fn new(open: ClockTime, close: ClockTime, slot_minutes: u16) -> DomainResult<Self> {
        if open >= close {
            return Err(DomainError::Validation(format!(
                "Opening time {} must be before closing time {}",
                open, close
            )));
        }
        if slot_minutes == 0 {
            return Err(DomainError::Validation("Slot length must be positive".into()));
        }
        Ok(Self {
            open,
            close,
            slot_minutes,
        })
    }

    pub fn ensure_contains(&self, slot: &TimeSlot) -> DomainResult<()> {
        if slot.within(self.open, self.close) {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "Time slot {} is outside opening hours {}-{}",
                slot, self.open, self.close
            )))
        }
    }

    /// Consecutive slots from opening time. A trailing remainder shorter than
    /// one slot is not offered.
    pub fn grid(&self) -> Vec<TimeSlot> {
        let step = self.slot_minutes;
        let close = self.close.minutes();
        let mut slots = Vec::new();
        let mut start = self.open.minutes();
        while start + step <= close {
            slots.push(TimeSlot {
                start: ClockTime::from_minutes(start).unwrap_or(self.open),
                end: ClockTime::from_minutes(start + step).unwrap_or(self.close),
            });
            start += step;
        }
        slots
    }
}
