//! Section derivation and preliminary assignment.
//!
//! Derives sections from the course catalog (counts from declared values or
//! enrollment math), seeds home-room ownership, and hands each section a
//! preliminary teacher before any strategy touches the grid. Teacher choice
//! balances an "intended load" counter so one teacher never soaks up a whole
//! department's sections.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{LoadModel, ScheduleConfig};
use crate::models::{Course, Room, RoomType, Section, Teacher};
use crate::tracker::ResourceTracker;

/// PE electives meet in the gym and run larger than classroom sections.
const PE_SECTION_SIZE: u32 = 50;

fn is_science_dept(teacher: &Teacher) -> bool {
    teacher
        .departments
        .iter()
        .any(|d| d.to_lowercase().contains("science"))
}

fn is_pe_dept(name: &str) -> bool {
    name.to_lowercase().contains("pe")
}

/// Seeds home-room ownership before placement.
///
/// Science teachers claim lab rooms round-robin (and are seeded first so
/// labs don't leak to general staff), PE teachers share the first gym, and
/// everyone else consumes regular rooms in order until they run out.
/// Floaters never own a room.
pub fn seed_room_owners(teachers: &[Teacher], rooms: &[Room], tracker: &mut ResourceTracker) {
    let labs: Vec<&Room> = rooms.iter().filter(|r| r.room_type == RoomType::Lab).collect();
    let gyms: Vec<&Room> = rooms.iter().filter(|r| r.room_type == RoomType::Gym).collect();
    let regular: Vec<&Room> = rooms
        .iter()
        .filter(|r| r.room_type == RoomType::Regular)
        .collect();

    let mut ordered: Vec<&Teacher> = teachers.iter().collect();
    ordered.sort_by_key(|t| !is_science_dept(t));

    let mut lab_idx = 0;
    let mut regular_idx = 0;
    for teacher in ordered {
        if teacher.is_floater {
            continue;
        }
        let is_gym = teacher.departments.iter().any(|d| is_pe_dept(d));

        let assigned = if is_science_dept(teacher) && !labs.is_empty() {
            let room = labs[lab_idx % labs.len()];
            lab_idx += 1;
            Some(&room.id)
        } else if is_gym && !gyms.is_empty() {
            Some(&gyms[0].id)
        } else if regular_idx < regular.len() {
            let room = regular[regular_idx];
            regular_idx += 1;
            Some(&room.id)
        } else {
            None
        };

        if let Some(room_id) = assigned {
            tracker.set_room_owner(room_id.clone(), teacher.id.clone());
        }
    }
}

/// Derives every section of the run from the course catalog.
///
/// Required courses: section count from the declared value, else
/// `ceil(students / seat cap)`; enrollment spread evenly and capped.
/// Electives: declared count, else a proportional share of total elective
/// demand (`students × free elective slots per day`).
pub fn derive_sections(
    courses: &[Course],
    config: &ScheduleConfig,
    load: &LoadModel,
) -> Vec<Section> {
    let students = config.student_count;
    let global_cap = config.max_class_size;
    let mut sections = Vec::new();

    let core_courses: Vec<&Course> = courses.iter().filter(|c| c.required).collect();
    let elective_courses: Vec<&Course> = courses.iter().filter(|c| !c.required).collect();

    for course in &core_courses {
        let cap = course.max_size.unwrap_or(global_cap).max(1);
        let count = course.sections.unwrap_or_else(|| students.div_ceil(cap));
        if count == 0 {
            continue;
        }
        let enrollment = students.div_ceil(count).min(cap);
        for n in 1..=count {
            sections.push(Section::derived(course, n, enrollment, cap));
        }
    }

    let elective_slots = load
        .effective_slots
        .saturating_sub(core_courses.len() as u32);
    let total_demand = students * elective_slots;
    let declared_total: u32 = elective_courses.iter().filter_map(|c| c.sections).sum();

    for course in &elective_courses {
        let cap = if is_pe_dept(&course.department) {
            PE_SECTION_SIZE
        } else {
            course.max_size.unwrap_or(global_cap).max(1)
        };
        let count = course.sections.unwrap_or_else(|| {
            let share = total_demand / elective_courses.len() as u32;
            share.div_ceil(cap).max(1)
        });
        if count == 0 {
            continue;
        }
        let spread = if declared_total > 0 {
            declared_total
        } else {
            count * elective_courses.len() as u32
        };
        let enrollment = total_demand.div_ceil(spread.max(1)).min(cap);
        for n in 1..=count {
            sections.push(Section::derived(course, n, enrollment, cap));
        }
    }

    sections
}

/// Assigns each section a preliminary teacher and preferred room.
///
/// Sections are visited in randomized order; each takes the least-intended
/// teacher from its department (any teacher when the department has none).
/// A teacher who owns a home room passes it along as the section's
/// preferred room. With no staff at all the section is conflicted out
/// before placement begins.
pub fn assign_teachers<R: Rng>(
    sections: &mut [Section],
    teachers: &[Teacher],
    rooms: &[Room],
    tracker: &ResourceTracker,
    rng: &mut R,
) {
    let mut intended: HashMap<&str, u32> =
        teachers.iter().map(|t| (t.id.as_str(), 0)).collect();

    let mut order: Vec<usize> = (0..sections.len()).collect();
    order.shuffle(rng);

    for idx in order {
        let section = &mut sections[idx];
        let department = section.department.clone();

        let mut pool: Vec<&Teacher> = teachers.iter().filter(|t| t.covers(&department)).collect();
        if pool.is_empty() {
            pool = teachers.iter().collect();
        }

        let Some(choice) = pool
            .iter()
            .min_by_key(|t| intended.get(t.id.as_str()).copied().unwrap_or(0))
        else {
            section.mark_conflict("No Teacher");
            continue;
        };

        section.teacher = Some(choice.id.clone());
        *intended.entry(choice.id.as_str()).or_insert(0) += 1;

        if let Some(room) = rooms
            .iter()
            .find(|r| tracker.owner_of(&r.id) == Some(choice.id.as_str()))
        {
            section.room = Some(room.id.clone());
        }
    }
}
