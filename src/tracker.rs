//! Resource occupancy ledger.
//!
//! One tracker instance is exclusively owned by one scheduling run. It
//! records which section or reservation holds every teacher and room at
//! every canonical timeslot, plus per-term teaching loads and home-room
//! ownership. Strategies consult availability before committing; the
//! committing mutator re-checks and refuses to double-book rather than
//! silently overwriting.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Room, Section, Teacher, Term, Timeslot};

/// A non-teaching hold on a teacher's timeslot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Reservation {
    Lunch,
    Plc,
    Plan,
    Blocked,
}

impl fmt::Display for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Reservation::Lunch => "LUNCH",
            Reservation::Plc => "PLC",
            Reservation::Plan => "PLAN",
            Reservation::Blocked => "BLOCKED",
        })
    }
}

/// What holds a teacher's timeslot: a section or a reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Occupant {
    Section(String),
    Reserved(Reservation),
}

impl Occupant {
    /// Whether this cell holds actual teaching.
    #[inline]
    pub fn is_section(&self) -> bool {
        matches!(self, Occupant::Section(_))
    }

    /// Display label: the section id, or the reservation tag.
    pub fn label(&self) -> String {
        match self {
            Occupant::Section(id) => id.clone(),
            Occupant::Reserved(r) => r.to_string(),
        }
    }
}

/// Refusal to commit a placement onto an occupied or unknown resource.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("teacher {teacher} is already occupied at {slot}")]
    TeacherBusy { teacher: String, slot: Timeslot },
    #[error("room {room} is already occupied at {slot}")]
    RoomBusy { room: String, slot: Timeslot },
    #[error("unknown teacher {0}")]
    UnknownTeacher(String),
}

/// The occupancy ledger for one scheduling run.
#[derive(Debug)]
pub struct ResourceTracker {
    /// teacher id → timeslot → occupant.
    pub teacher_schedule: HashMap<String, HashMap<Timeslot, Occupant>>,
    /// room id → timeslot → section id.
    pub room_schedule: HashMap<String, HashMap<Timeslot, String>>,
    /// teacher id → term → sections placed this run.
    pub teacher_load: HashMap<String, HashMap<Term, u32>>,
    /// room id → owning teacher id.
    pub room_owners: HashMap<String, String>,
    /// Per-term teaching cap.
    pub max_load: u32,
}

impl ResourceTracker {
    /// Creates an empty ledger for the given staff and rooms.
    pub fn new(teachers: &[Teacher], rooms: &[Room], max_load: u32) -> Self {
        let mut teacher_schedule = HashMap::new();
        let mut teacher_load = HashMap::new();
        for t in teachers {
            teacher_schedule.insert(t.id.clone(), HashMap::new());
            teacher_load.insert(
                t.id.clone(),
                Term::ALL.iter().map(|&term| (term, 0)).collect(),
            );
        }
        let room_schedule = rooms
            .iter()
            .map(|r| (r.id.clone(), HashMap::new()))
            .collect();
        Self {
            teacher_schedule,
            room_schedule,
            teacher_load,
            room_owners: HashMap::new(),
            max_load,
        }
    }

    /// Records a home-room relationship.
    pub fn set_room_owner(&mut self, room_id: impl Into<String>, teacher_id: impl Into<String>) {
        self.room_owners.insert(room_id.into(), teacher_id.into());
    }

    /// The owner of a room, if any.
    pub fn owner_of(&self, room_id: &str) -> Option<&str> {
        self.room_owners.get(room_id).map(String::as_str)
    }

    /// Reserves a teacher's slot without a section. Unknown teachers are
    /// ignored (the caller may carry availability rows for departed staff),
    /// and a slot already holding a committed section keeps it: overlays
    /// never override a locked placement.
    pub fn block_teacher(&mut self, teacher_id: &str, slot: Timeslot, reservation: Reservation) {
        if let Some(schedule) = self.teacher_schedule.get_mut(teacher_id) {
            if schedule.get(&slot).is_some_and(Occupant::is_section) {
                return;
            }
            schedule.insert(slot, Occupant::Reserved(reservation));
        }
    }

    /// Whether the teacher is free at the slot. Unknown teachers are never
    /// available.
    pub fn is_teacher_available(&self, teacher_id: &str, slot: &Timeslot) -> bool {
        self.teacher_schedule
            .get(teacher_id)
            .is_some_and(|schedule| !schedule.contains_key(slot))
    }

    /// Whether the room is free at the slot. Unknown rooms are never
    /// available.
    pub fn is_room_available(&self, room_id: &str, slot: &Timeslot) -> bool {
        self.room_schedule
            .get(room_id)
            .is_some_and(|schedule| !schedule.contains_key(slot))
    }

    /// Sections placed on this teacher in the given term so far this run.
    pub fn teacher_load(&self, teacher_id: &str, term: Term) -> u32 {
        self.teacher_load
            .get(teacher_id)
            .and_then(|loads| loads.get(&term))
            .copied()
            .unwrap_or(0)
    }

    /// Commits a placement: occupies the teacher (and co-teacher), occupies
    /// the room, bumps term loads, and stamps the section's slot and term.
    ///
    /// Every involved resource must be free; on refusal the ledger and the
    /// section are left untouched.
    pub fn assign_placement(
        &mut self,
        section: &mut Section,
        slot: Timeslot,
        term: Term,
    ) -> Result<(), PlacementError> {
        let teacher = section.teacher.clone();
        let co_teacher = section.co_teacher.clone();
        let room = section.room.clone();

        for id in teacher.iter().chain(co_teacher.iter()) {
            if !self.teacher_schedule.contains_key(id) {
                return Err(PlacementError::UnknownTeacher(id.clone()));
            }
            if !self.is_teacher_available(id, &slot) {
                return Err(PlacementError::TeacherBusy {
                    teacher: id.clone(),
                    slot,
                });
            }
        }
        if let Some(room_id) = room.as_deref() {
            if self.room_schedule.contains_key(room_id) && !self.is_room_available(room_id, &slot) {
                return Err(PlacementError::RoomBusy {
                    room: room_id.to_string(),
                    slot,
                });
            }
        }

        for id in teacher.iter().chain(co_teacher.iter()) {
            if let Some(schedule) = self.teacher_schedule.get_mut(id) {
                schedule.insert(slot, Occupant::Section(section.id.clone()));
            }
            if let Some(loads) = self.teacher_load.get_mut(id) {
                *loads.entry(term).or_insert(0) += 1;
            }
        }
        if let Some(room_id) = room {
            if let Some(schedule) = self.room_schedule.get_mut(&room_id) {
                schedule.insert(slot, section.id.clone());
            }
        }

        section.timeslot = Some(slot);
        section.term = Some(term);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, PeriodId, RoomType};

    fn teachers() -> Vec<Teacher> {
        vec![
            Teacher::new("t1", "Rivera").with_department("math"),
            Teacher::new("t2", "Okafor").with_department("math"),
        ]
    }

    fn rooms() -> Vec<Room> {
        vec![Room::of_type("r1", "101", RoomType::Regular)]
    }

    fn section(teacher: Option<&str>, room: Option<&str>) -> Section {
        let course = Course::required("MATH1", "Algebra I", "math");
        let mut s = Section::derived(&course, 1, 30, 30);
        s.teacher = teacher.map(String::from);
        s.room = room.map(String::from);
        s
    }

    #[test]
    fn test_block_and_availability() {
        let mut tracker = ResourceTracker::new(&teachers(), &rooms(), 5);
        let slot = Timeslot::full_year(PeriodId::Nth(4));

        assert!(tracker.is_teacher_available("t1", &slot));
        tracker.block_teacher("t1", slot, Reservation::Lunch);
        assert!(!tracker.is_teacher_available("t1", &slot));
        // Unknown teachers are never available.
        assert!(!tracker.is_teacher_available("ghost", &slot));
        // Blocking an unknown teacher is a no-op.
        tracker.block_teacher("ghost", slot, Reservation::Blocked);
        assert!(!tracker.teacher_schedule.contains_key("ghost"));
    }

    #[test]
    fn test_block_never_overrides_section() {
        let mut tracker = ResourceTracker::new(&teachers(), &rooms(), 5);
        let slot = Timeslot::full_year(PeriodId::Nth(4));
        let mut s = section(Some("t1"), None);
        tracker.assign_placement(&mut s, slot, Term::Fy).unwrap();

        tracker.block_teacher("t1", slot, Reservation::Lunch);
        assert_eq!(
            tracker.teacher_schedule["t1"][&slot],
            Occupant::Section("MATH1-S1".into())
        );
    }

    #[test]
    fn test_assign_placement_stamps_section() {
        let mut tracker = ResourceTracker::new(&teachers(), &rooms(), 5);
        let slot = Timeslot::full_year(PeriodId::Nth(2));
        let mut s = section(Some("t1"), Some("r1"));

        tracker.assign_placement(&mut s, slot, Term::Fy).unwrap();
        assert_eq!(s.timeslot, Some(slot));
        assert_eq!(s.term, Some(Term::Fy));
        assert!(!tracker.is_teacher_available("t1", &slot));
        assert!(!tracker.is_room_available("r1", &slot));
        assert_eq!(tracker.teacher_load("t1", Term::Fy), 1);
        assert_eq!(tracker.teacher_load("t1", Term::S1), 0);
    }

    #[test]
    fn test_assign_refuses_double_booking() {
        let mut tracker = ResourceTracker::new(&teachers(), &rooms(), 5);
        let slot = Timeslot::full_year(PeriodId::Nth(2));

        let mut first = section(Some("t1"), None);
        tracker.assign_placement(&mut first, slot, Term::Fy).unwrap();

        let mut second = section(Some("t1"), None);
        let err = tracker
            .assign_placement(&mut second, slot, Term::Fy)
            .unwrap_err();
        assert_eq!(
            err,
            PlacementError::TeacherBusy {
                teacher: "t1".into(),
                slot,
            }
        );
        // Refusal leaves the section untouched.
        assert_eq!(second.timeslot, None);
        assert_eq!(tracker.teacher_load("t1", Term::Fy), 1);
    }

    #[test]
    fn test_assign_refuses_occupied_room() {
        let mut tracker = ResourceTracker::new(&teachers(), &rooms(), 5);
        let slot = Timeslot::full_year(PeriodId::Nth(3));

        let mut first = section(Some("t1"), Some("r1"));
        tracker.assign_placement(&mut first, slot, Term::Fy).unwrap();

        let mut second = section(Some("t2"), Some("r1"));
        let err = tracker
            .assign_placement(&mut second, slot, Term::Fy)
            .unwrap_err();
        assert!(matches!(err, PlacementError::RoomBusy { .. }));
    }

    #[test]
    fn test_co_teacher_charged() {
        let mut tracker = ResourceTracker::new(&teachers(), &rooms(), 5);
        let slot = Timeslot::full_year(PeriodId::Nth(1));
        let mut s = section(Some("t1"), None);
        s.co_teacher = Some("t2".into());

        tracker.assign_placement(&mut s, slot, Term::Fy).unwrap();
        assert!(!tracker.is_teacher_available("t2", &slot));
        assert_eq!(tracker.teacher_load("t2", Term::Fy), 1);
    }

    #[test]
    fn test_per_term_loads_are_independent() {
        let mut tracker = ResourceTracker::new(&teachers(), &rooms(), 5);
        let a = Term::A.slot(PeriodId::Nth(1));
        let b = Term::B.slot(PeriodId::Nth(1));

        let mut s1 = section(Some("t1"), None);
        let mut s2 = section(Some("t1"), None);
        tracker.assign_placement(&mut s1, a, Term::A).unwrap();
        tracker.assign_placement(&mut s2, b, Term::B).unwrap();

        assert_eq!(tracker.teacher_load("t1", Term::A), 1);
        assert_eq!(tracker.teacher_load("t1", Term::B), 1);
        assert_eq!(tracker.teacher_load("t1", Term::Fy), 0);
    }

    #[test]
    fn test_room_owner() {
        let mut tracker = ResourceTracker::new(&teachers(), &rooms(), 5);
        tracker.set_room_owner("r1", "t1");
        assert_eq!(tracker.owner_of("r1"), Some("t1"));
        assert_eq!(tracker.owner_of("r9"), None);
    }
}
