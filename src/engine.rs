//! Schedule generation engine.
//!
//! One synchronous pass from configuration to result record: build the
//! timeline, seed the tracker with reservations and locked placements,
//! derive and pre-assign sections, run the topology's placement strategy,
//! then post-process (waves, analytics, plan checks) and translate every
//! canonical slot to display form. A regenerate is simply a fresh call;
//! the tracker never outlives its run.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::codec;
use crate::config::{ConstraintSpec, LunchStyle, ScheduleConfig, SectionSeed};
use crate::logging::{LogEntry, PlacementRecord, RunLog};
use crate::models::{Conflict, Period, PlcGroup, Section, Term};
use crate::postprocess::{self, PeriodAnalytics};
use crate::reservations;
use crate::sections;
use crate::strategy::{place_sections, strategy_for};
use crate::timeline::TimelineBuilder;
use crate::tracker::ResourceTracker;

/// Headline numbers for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStats {
    pub total_sections: u32,
    pub scheduled_count: u32,
    pub conflict_count: u32,
    pub teacher_count: u32,
    pub room_count: u32,
    pub total_students: u32,
}

/// The complete result record of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    /// Every derived section, placements translated to display ids.
    pub sections: Vec<Section>,
    /// The classified bell timeline.
    pub period_list: Vec<Period>,
    /// teacher id → display period id → section id or reservation tag.
    pub teacher_schedule: BTreeMap<String, BTreeMap<String, String>>,
    /// room id → display period id → section id.
    pub room_schedule: BTreeMap<String, BTreeMap<String, String>>,
    /// The PLC groups in effect (caller-defined or generated).
    pub plc_groups: Vec<PlcGroup>,
    /// Everything that went wrong, as data.
    pub conflicts: Vec<Conflict>,
    /// The run's structured narrative.
    pub logs: Vec<LogEntry>,
    /// Per-section candidate evaluations, success and failure both.
    pub placement_history: Vec<PlacementRecord>,
    /// Per-period coverage numbers.
    pub period_analytics: Vec<PeriodAnalytics>,
    /// Headline numbers.
    pub stats: ScheduleStats,
}

/// Runs the engine over one configuration and returns the result record.
pub fn generate_schedule(config: &ScheduleConfig) -> ScheduleResult {
    let mut log = RunLog::new();
    let mut conflicts: Vec<Conflict> = Vec::new();
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    log.info_with(
        "Starting schedule generation",
        json!({
            "mode": serde_json::to_value(config.schedule_mode).unwrap_or_default(),
            "scheduleType": serde_json::to_value(config.schedule_type).unwrap_or_default(),
        }),
    );

    let (periods, timeline_conflicts) = TimelineBuilder::new(config).build();
    conflicts.extend(timeline_conflicts);

    let load = config.load_model(&periods);
    log.info_with(
        format!("Calculated max load: {}", load.max_load),
        json!({
            "effectiveSlots": load.effective_slots,
            "planPeriods": load.plan_periods,
            "plcEnabled": load.plc_enabled,
        }),
    );

    let mut tracker = ResourceTracker::new(&config.teachers, &config.rooms, load.max_load);
    sections::seed_room_owners(&config.teachers, &config.rooms, &mut tracker);

    let mut all_sections = sections::derive_sections(&config.courses, config, &load);
    sections::assign_teachers(
        &mut all_sections,
        &config.teachers,
        &config.rooms,
        &tracker,
        &mut rng,
    );

    commit_locks(config, &mut all_sections, &mut tracker, &mut log, &mut conflicts);

    reservations::apply_lunch_blocks(config, &config.teachers, &mut tracker, &mut log);
    let plc_groups =
        reservations::resolve_plc_groups(config, &config.teachers, &periods, &mut tracker, &mut log);
    reservations::apply_availability(config, &mut tracker, &mut log);

    let strategy = strategy_for(config.schedule_type);
    log.info(format!("Engaging {} strategy", strategy.name()));
    conflicts.extend(place_sections(
        strategy.as_ref(),
        &mut all_sections,
        &periods,
        &config.rooms,
        &mut tracker,
        &mut log,
        &mut rng,
    ));

    if config.lunch_config.style == LunchStyle::Split {
        if let Some(lunch_period) = config.lunch_config.lunch_period {
            postprocess::assign_lunch_waves(
                &mut all_sections,
                lunch_period,
                config.lunch_config.num_waves,
            );
        }
    }

    let (period_analytics, coverage) =
        postprocess::period_analytics(&all_sections, &periods, config);
    conflicts.extend(coverage);
    conflicts.extend(postprocess::check_plan_time(
        &config.teachers,
        &tracker,
        &load,
        config.schedule_type,
    ));

    for section in &mut all_sections {
        section.period = section.timeslot.map(|slot| codec::display_id(&slot));
    }
    let teacher_schedule = codec::teacher_schedule_view(&tracker);
    let room_schedule = codec::room_schedule_view(&tracker);

    let scheduled_count = all_sections.iter().filter(|s| s.is_placed()).count() as u32;
    let stats = ScheduleStats {
        total_sections: all_sections.len() as u32,
        scheduled_count,
        conflict_count: conflicts.len() as u32,
        teacher_count: config.teachers.len() as u32,
        room_count: config.rooms.len() as u32,
        total_students: config.student_count,
    };

    ScheduleResult {
        sections: all_sections,
        period_list: periods,
        teacher_schedule,
        room_schedule,
        plc_groups,
        conflicts,
        logs: log.entries,
        placement_history: log.placements,
        period_analytics,
        stats,
    }
}

/// Pins and commits locked placements before any reservation or strategy
/// touches the grid: legacy `lock_period` constraints (always full-year),
/// then locked/manual seeds from a previous run.
///
/// A lock the ledger refuses (its teacher or room already taken by an
/// earlier lock) becomes an unscheduled conflict instead of a silent
/// overwrite.
fn commit_locks(
    config: &ScheduleConfig,
    all_sections: &mut [Section],
    tracker: &mut ResourceTracker,
    log: &mut RunLog,
    conflicts: &mut Vec<Conflict>,
) {
    let mut targets: Vec<(usize, Term)> = Vec::new();

    for constraint in &config.constraints {
        let ConstraintSpec::LockPeriod { section_id, period } = constraint else {
            continue;
        };
        match all_sections.iter().position(|s| s.id == *section_id) {
            Some(idx) => {
                let section = &mut all_sections[idx];
                section.locked = true;
                section.timeslot = Some(Term::Fy.slot(*period));
                targets.push((idx, Term::Fy));
            }
            None => log.warn(format!("lock_period references unknown section {section_id}")),
        }
    }

    let seeds = config.locked_sections.iter().chain(&config.manual_sections);
    for seed in seeds {
        let SectionSeed {
            section_id,
            period,
            term,
            teacher,
            co_teacher,
            room,
        } = seed;
        let Some(idx) = all_sections.iter().position(|s| s.id == *section_id) else {
            log.warn(format!("seed references unknown section {section_id}"));
            continue;
        };
        let section = &mut all_sections[idx];
        if let Some(teacher) = teacher {
            section.teacher = Some(teacher.clone());
        }
        if let Some(co_teacher) = co_teacher {
            section.co_teacher = Some(co_teacher.clone());
        }
        if let Some(room) = room {
            section.room = Some(room.clone());
        }
        let term = term.unwrap_or(config.schedule_type.terms()[0]);
        section.locked = true;
        section.timeslot = Some(term.slot(*period));
        targets.push((idx, term));
    }

    for (idx, term) in targets {
        let Some(slot) = all_sections[idx].timeslot else {
            continue;
        };
        if let Err(err) = tracker.assign_placement(&mut all_sections[idx], slot, term) {
            let section = &mut all_sections[idx];
            log.warn(format!("locked placement rejected for {}: {err}", section.id));
            section.mark_conflict("Lock collision");
            section.timeslot = None;
            conflicts.push(Conflict::unscheduled(
                format!(
                    "{} S{}: locked placement rejected ({err})",
                    section.course_name, section.section_num
                ),
                section.id.clone(),
            ));
        }
    }
}
