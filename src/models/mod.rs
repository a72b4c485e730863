//! Pure domain data for timetabling. No business logic lives here.

pub mod day;
pub mod restricted;
pub mod timetable;

pub use day::Day;
pub use restricted::RestrictedPeriod;
pub use timetable::{
    ActiveSlot, Assignment, AvailabilityOverride, ClassInfo, NewSlot, Schedule, Slot, SlotPosition,
};
