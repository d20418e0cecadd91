//! Canonical-to-display timeslot translation.
//!
//! The engine addresses everything by canonical `{TERM}-{DAY}-{PERIOD}`
//! keys; the calling environment wants the short grid labels instead. This
//! translation runs uniformly over every section and occupancy map as the
//! last step before results leave the engine. Reservation tags (LUNCH, PLC,
//! BLOCKED) pass through untouched.

use std::collections::BTreeMap;

use crate::models::{Day, Term, Timeslot};
use crate::tracker::ResourceTracker;

/// Display id for a canonical slot.
///
/// Full-year: the bare period (`FY-ALL-4` → `4`). Alternating days:
/// `A-4`/`B-4`. Semesters and trimesters keep their term prefix:
/// `S1-4`, `T2-4`.
pub fn display_id(slot: &Timeslot) -> String {
    match (slot.term, slot.day) {
        (Term::Fy, Day::All) => slot.period.to_string(),
        (_, Day::A) => format!("A-{}", slot.period),
        (_, Day::B) => format!("B-{}", slot.period),
        (term, Day::All) => format!("{}-{}", term, slot.period),
    }
}

/// The teacher occupancy map in display form, with deterministic ordering.
pub fn teacher_schedule_view(
    tracker: &ResourceTracker,
) -> BTreeMap<String, BTreeMap<String, String>> {
    tracker
        .teacher_schedule
        .iter()
        .map(|(teacher_id, slots)| {
            let view = slots
                .iter()
                .map(|(slot, occupant)| (display_id(slot), occupant.label()))
                .collect();
            (teacher_id.clone(), view)
        })
        .collect()
}

/// The room occupancy map in display form, with deterministic ordering.
pub fn room_schedule_view(
    tracker: &ResourceTracker,
) -> BTreeMap<String, BTreeMap<String, String>> {
    tracker
        .room_schedule
        .iter()
        .map(|(room_id, slots)| {
            let view = slots
                .iter()
                .map(|(slot, section_id)| (display_id(slot), section_id.clone()))
                .collect();
            (room_id.clone(), view)
        })
        .collect()
}
