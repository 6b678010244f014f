use std::collections::HashMap;

use chrono::Utc;

use crate::models::{Booking, Slot};

/// In-memory record of booked slots. Lives for one session only.
///
/// `is_available` and `book` are separate calls, so a check result is only a
/// snapshot; callers sharing a registry across tasks must hold one lock around
/// both.
#[derive(Debug, Default)]
pub struct SlotRegistry {
    bookings: HashMap<Slot, Booking>,
}

impl SlotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_available(&self, slot: &Slot) -> bool {
        !self.bookings.contains_key(slot)
    }

    /// Records the slot as booked, replacing any earlier booking for it.
    pub fn book(&mut self, slot: Slot) -> &Booking {
        let booking = Booking {
            id: uuid::Uuid::new_v4().to_string(),
            slot: slot.clone(),
            booked_at: Utc::now().naive_utc(),
        };
        if self.bookings.contains_key(&slot) {
            tracing::debug!(doctor = %slot.doctor_name, date = %slot.date, time = %slot.time, "overwriting existing booking");
        }
        self.bookings.insert(slot.clone(), booking);
        &self.bookings[&slot]
    }

    pub fn bookings(&self) -> impl Iterator<Item = &Booking> {
        self.bookings.values()
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn smith() -> Slot {
        Slot::new("Dr. Smith", "2024-06-02", "15:00")
    }

    #[test]
    fn test_empty_registry_everything_available() {
        let registry = SlotRegistry::new();
        assert!(registry.is_available(&smith()));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_book_marks_slot_taken() {
        let mut registry = SlotRegistry::new();
        let booking = registry.book(smith());
        assert_eq!(booking.slot, smith());
        assert!(!registry.is_available(&smith()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_book_twice_is_idempotent() {
        let mut registry = SlotRegistry::new();
        registry.book(smith());
        registry.book(smith());
        assert!(!registry.is_available(&smith()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_bookings_lists_each_slot_once() {
        let mut registry = SlotRegistry::new();
        registry.book(smith());
        registry.book(smith());
        registry.book(Slot::new("Dr. Jones", "2024-06-02", "09:00"));

        let mut doctors: Vec<&str> = registry
            .bookings()
            .map(|b| b.slot.doctor_name.as_str())
            .collect();
        doctors.sort();
        assert_eq!(doctors, vec!["Dr. Jones", "Dr. Smith"]);
    }

    #[test]
    fn test_neighbouring_slots_stay_free() {
        let mut registry = SlotRegistry::new();
        registry.book(smith());
        assert!(registry.is_available(&Slot::new("Dr. Jones", "2024-06-02", "15:00")));
        assert!(registry.is_available(&Slot::new("Dr. Smith", "2024-06-03", "15:00")));
        assert!(registry.is_available(&Slot::new("Dr. Smith", "2024-06-02", "15:30")));
    }

    #[test]
    fn test_separator_in_fields_does_not_collide() {
        // Joined with a space these two would be the same key.
        let mut registry = SlotRegistry::new();
        registry.book(Slot::new("Dr. Smith 2024-06-02", "15:00", ""));
        assert!(registry.is_available(&Slot::new("Dr. Smith", "2024-06-02", "15:00")));
    }

    proptest! {
        #[test]
        fn prop_booking_only_affects_its_own_slot(
            doctor in ".{0,12}",
            date in ".{0,10}",
            time in ".{0,5}",
            other in ".{0,12}",
        ) {
            let mut registry = SlotRegistry::new();
            let slot = Slot::new(doctor.clone(), date.clone(), time.clone());
            prop_assert!(registry.is_available(&slot));

            registry.book(slot.clone());
            prop_assert!(!registry.is_available(&slot));

            let neighbour = Slot::new(other.clone(), date, time);
            prop_assert_eq!(registry.is_available(&neighbour), other != doctor);
        }
    }
}
