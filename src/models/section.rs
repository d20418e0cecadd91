//! Section model.
//!
//! A section is one class meeting of a course: the unit the placement
//! strategies assign to a timeslot, a teacher, and a room. Sections are
//! created once per run by the section factory; only the active strategy
//! and the post-processor mutate them, and a finished run never mutates
//! them again (a regenerate is a fresh run seeded with any locked ones).

use serde::{Deserialize, Serialize};

use super::{Course, RoomType, Term, Timeslot};

/// One class meeting of a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Unique section identifier (`{course}-S{n}`).
    pub id: String,
    /// Parent course identifier.
    pub course_id: String,
    /// Parent course display name (carried for diagnostics).
    pub course_name: String,
    /// 1-based sequence number within the course.
    pub section_num: u32,
    /// Students enrolled.
    pub enrollment: u32,
    /// Seat cap.
    pub max_size: u32,
    /// Owning department.
    pub department: String,
    /// Room type this section must meet in.
    pub room_type: RoomType,
    /// Required (core) course sections are placed before electives.
    pub is_core: bool,
    /// Assigned teacher id.
    pub teacher: Option<String>,
    /// Optional co-teacher id.
    pub co_teacher: Option<String>,
    /// Assigned room id.
    pub room: Option<String>,
    /// Canonical slot while the engine runs; translated to `period` on exit.
    #[serde(skip)]
    pub timeslot: Option<Timeslot>,
    /// Display period id, populated by the codec when the run completes.
    pub period: Option<String>,
    /// Term the placement landed in.
    pub term: Option<Term>,
    /// Locked sections are committed before any strategy runs and are never
    /// moved by one.
    #[serde(default)]
    pub locked: bool,
    /// Set when no feasible placement exists (or no teacher matched).
    #[serde(default)]
    pub has_conflict: bool,
    /// Why the section could not be placed.
    pub conflict_reason: Option<String>,
    /// Lunch wave number (split-lunch schedules only).
    pub lunch_wave: Option<u32>,
}

impl Section {
    /// Creates the `n`-th section of a course.
    pub fn derived(course: &Course, section_num: u32, enrollment: u32, max_size: u32) -> Self {
        Self {
            id: format!("{}-S{}", course.id, section_num),
            course_id: course.id.clone(),
            course_name: course.name.clone(),
            section_num,
            enrollment,
            max_size,
            department: course.department.clone(),
            room_type: course.room_type,
            is_core: course.required,
            teacher: None,
            co_teacher: None,
            room: None,
            timeslot: None,
            period: None,
            term: None,
            locked: false,
            has_conflict: false,
            conflict_reason: None,
            lunch_wave: None,
        }
    }

    /// Flags the section as unplaceable.
    pub fn mark_conflict(&mut self, reason: impl Into<String>) {
        self.has_conflict = true;
        self.conflict_reason = Some(reason.into());
    }

    /// Whether the section holds a committed placement.
    #[inline]
    pub fn is_placed(&self) -> bool {
        self.timeslot.is_some() && !self.has_conflict
    }

    /// Whether the section sits in the given slot (and is not conflicted).
    #[inline]
    pub fn occupies(&self, slot: &Timeslot) -> bool {
        !self.has_conflict && self.timeslot.as_ref() == Some(slot)
    }
}
