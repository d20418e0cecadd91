//! Pre-placement reservations.
//!
//! Before any strategy runs, the tracker is seeded with every non-teaching
//! hold: lunch duty, PLC common time, per-teacher blocked periods, and
//! legacy unavailability constraints. Each reservation expands to one slot
//! per term of the active topology so it constrains A/B, semester, and
//! trimester candidates just like full-year ones.

use crate::config::{ConstraintSpec, LunchStyle, ScheduleConfig};
use crate::logging::RunLog;
use crate::models::{Period, PeriodRole, PlcGroup, Teacher};
use crate::tracker::{Reservation, ResourceTracker};

/// Primary departments in staff order, deduplicated.
fn primary_departments(teachers: &[Teacher]) -> Vec<String> {
    let mut departments: Vec<String> = Vec::new();
    for t in teachers {
        let dept = t.primary_department().to_string();
        if !departments.contains(&dept) {
            departments.push(dept);
        }
    }
    departments
}

/// Reserves lunch time on every teacher's schedule.
///
/// Unit lunch blocks everyone at the lunch period. Multi-period lunch
/// spreads each department's teachers round-robin across the lunch periods.
/// Split lunch blocks no one: classes run through the period and the
/// post-processor assigns waves instead.
pub fn apply_lunch_blocks(
    config: &ScheduleConfig,
    teachers: &[Teacher],
    tracker: &mut ResourceTracker,
    log: &mut RunLog,
) {
    let lunch = &config.lunch_config;
    match lunch.style {
        LunchStyle::Unit => {
            let Some(period) = lunch.lunch_period else {
                return;
            };
            for teacher in teachers {
                for slot in config.schedule_type.slots_for_period(period) {
                    tracker.block_teacher(&teacher.id, slot, Reservation::Lunch);
                }
            }
        }
        LunchStyle::MultiPeriod => {
            if lunch.lunch_periods.is_empty() {
                return;
            }
            for dept in primary_departments(teachers) {
                let members = teachers.iter().filter(|t| t.primary_department() == dept);
                for (i, teacher) in members.enumerate() {
                    let period = lunch.lunch_periods[i % lunch.lunch_periods.len()];
                    for slot in config.schedule_type.slots_for_period(period) {
                        tracker.block_teacher(&teacher.id, slot, Reservation::Lunch);
                    }
                }
            }
            log.info(format!(
                "Distributed teachers across lunch periods: {}",
                lunch
                    .lunch_periods
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
        LunchStyle::Split => {}
    }
}

/// Resolves PLC groups and reserves their common periods.
///
/// Caller-defined groups are used verbatim whenever at least one of them
/// has members. Otherwise one group per primary department is generated,
/// rotating round-robin through the periods eligible for common time
/// (ordinary class periods and the split-lunch period).
pub fn resolve_plc_groups(
    config: &ScheduleConfig,
    teachers: &[Teacher],
    periods: &[Period],
    tracker: &mut ResourceTracker,
    log: &mut RunLog,
) -> Vec<PlcGroup> {
    if !config.plc_enabled {
        return Vec::new();
    }

    let has_custom = config
        .plc_groups
        .iter()
        .any(|g| !g.teacher_ids.is_empty());

    if has_custom {
        log.info("Applying caller-defined PLC blocks");
        let groups = config.plc_groups.clone();
        for group in &groups {
            for teacher_id in &group.teacher_ids {
                for slot in config.schedule_type.slots_for_period(group.period) {
                    tracker.block_teacher(teacher_id, slot, Reservation::Plc);
                }
            }
        }
        return groups;
    }

    log.info("Setting up departmental PLC blocks");
    let eligible: Vec<_> = periods
        .iter()
        .filter(|p| matches!(p.role, PeriodRole::Class | PeriodRole::SplitLunch))
        .map(|p| p.id)
        .collect();
    if eligible.is_empty() {
        return Vec::new();
    }

    let mut groups = Vec::new();
    for (index, dept) in primary_departments(teachers).into_iter().enumerate() {
        let period = eligible[index % eligible.len()];
        let members: Vec<&Teacher> = teachers
            .iter()
            .filter(|t| t.primary_department() == dept)
            .collect();

        let mut group = PlcGroup::new(
            format!("plc-{dept}-{index}"),
            format!("{dept} PLC"),
            period,
        );
        for teacher in &members {
            group.teacher_ids.push(teacher.id.clone());
            for slot in config.schedule_type.slots_for_period(period) {
                tracker.block_teacher(&teacher.id, slot, Reservation::Plc);
            }
        }
        log.info(format!(
            "Assigned period {period} as common PLC for {dept} ({} teachers)",
            members.len()
        ));
        groups.push(group);
    }
    groups
}

/// Applies per-teacher blocked periods and legacy unavailability
/// constraints as BLOCKED reservations.
pub fn apply_availability(
    config: &ScheduleConfig,
    tracker: &mut ResourceTracker,
    log: &mut RunLog,
) {
    for row in &config.teacher_availability {
        for &period in &row.blocked_periods {
            for slot in config.schedule_type.slots_for_period(period) {
                tracker.block_teacher(&row.teacher_id, slot, Reservation::Blocked);
            }
        }
    }
    if !config.teacher_availability.is_empty() {
        log.info(format!(
            "Applied availability blocks for {} teachers",
            config.teacher_availability.len()
        ));
    }

    for constraint in &config.constraints {
        if let ConstraintSpec::TeacherUnavailable { teacher_id, period } = constraint {
            for slot in config.schedule_type.slots_for_period(*period) {
                tracker.block_teacher(teacher_id, slot, Reservation::Blocked);
            }
        }
    }
}
