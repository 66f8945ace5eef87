use crate::error::BookingError;
use crate::types::{BookingRow, SlotAvailability, SlotConfig, SlotStatus};
use chrono::{DateTime, Datelike, Local, NaiveDate, Weekday};

/// The booking admission rule and the derived per-day availability view.
/// Both are pure over the wall clock and the existing bookings; the
/// uniqueness and capacity checks live in the storage backend where they
/// can be enforced atomically with the insert.
#[derive(Debug, Clone)]
pub struct BookingPolicy {
    slots: Vec<SlotConfig>,
    allowed_weekdays: Vec<Weekday>,
}

impl BookingPolicy {
    pub fn new(slots: Vec<SlotConfig>, allowed_weekdays: Vec<Weekday>) -> Self {
        Self {
            slots,
            allowed_weekdays,
        }
    }

    pub fn slot(&self, name: &str) -> Option<&SlotConfig> {
        self.slots.iter().find(|slot| slot.name == name)
    }

    pub fn day_allowed(&self, date: NaiveDate) -> bool {
        self.allowed_weekdays.contains(&date.weekday())
    }

    /// Runs the pre-storage admission checks in order: slot resolution,
    /// weekday eligibility, temporal cutoff. The first failure wins.
    /// Past dates count as expired; future dates are never cut off.
    pub fn validate(
        &self,
        date: NaiveDate,
        slot_name: &str,
        now: DateTime<Local>,
    ) -> Result<&SlotConfig, BookingError> {
        let slot = self.slot(slot_name).ok_or(BookingError::UnknownSlot)?;
        if !self.day_allowed(date) {
            return Err(BookingError::IneligibleDay);
        }
        let today = now.date_naive();
        if date < today {
            return Err(BookingError::SlotExpired);
        }
        if date == today && slot.start <= now.time() {
            return Err(BookingError::SlotExpired);
        }
        Ok(slot)
    }

    /// Derives the state of every configured slot for `date` from that day's
    /// bookings. A slot at capacity is `Booked` with the holders' display
    /// names; an open slot whose start has elapsed (today, or any past date)
    /// is `Closed`; anything else is `Free`.
    pub fn availability(
        &self,
        date: NaiveDate,
        now: DateTime<Local>,
        bookings: &[BookingRow],
    ) -> Vec<SlotAvailability> {
        let today = now.date_naive();
        self.slots
            .iter()
            .map(|slot| {
                let students: Vec<String> = bookings
                    .iter()
                    .filter(|row| row.slot == slot.name)
                    .map(BookingRow::display_name)
                    .collect();
                let full = slot.capacity != 0 && students.len() as u32 >= slot.capacity;
                let elapsed = date < today || (date == today && slot.start <= now.time());
                let status = if full {
                    SlotStatus::Booked { students }
                } else if elapsed {
                    SlotStatus::Closed
                } else {
                    SlotStatus::Free
                };
                SlotAvailability {
                    slot: slot.name.clone(),
                    start: slot.start,
                    status,
                }
            })
            .collect()
    }
}
