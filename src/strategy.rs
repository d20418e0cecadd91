//! Greedy placement strategies.
//!
//! All four calendar topologies share one scan loop: for each section, every
//! candidate slot is scored and the cheapest wins. A slot where the teacher
//! (or co-teacher) is already taken is infeasible outright; everything else
//! accumulates soft penalties. The four variants differ only in their
//! candidate universe (terms × periods) and their term-balancing penalty.
//!
//! Candidate order is shuffled per section through the run's seedable RNG,
//! so equal-cost slots are explored rather than always filled front-first.
//!
//! # Penalty ordering
//!
//! The magnitudes are tunable; their relative order is the contract:
//! infeasible > overloaded teacher > preferred room taken > elective overlap
//! > term imbalance > slot density.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::ScheduleType;
use crate::logging::{RunLog, SlotEvaluation};
use crate::models::{Conflict, Period, Room, RoomType, Section, Term, Timeslot};
use crate::tracker::ResourceTracker;

/// Teacher already at or above the per-term load cap.
pub const OVERLOAD_PENALTY: u32 = 500;
/// Section's preferred room is taken at this slot.
pub const ROOM_CONFLICT_PENALTY: u32 = 100;
/// Another section of the same elective already sits in this slot.
pub const ELECTIVE_OVERLAP_PENALTY: u32 = 200;
/// This term already holds more of the course's sections than its peers.
pub const TERM_IMBALANCE_PENALTY: u32 = 150;
/// Per section already placed into this slot this run.
pub const SLOT_DENSITY_PENALTY: u32 = 10;

/// One calendar topology's placement behavior.
///
/// Variants supply the candidate universe and the term-balancing penalty;
/// the scan loop in [`place_sections`] does everything else.
pub trait PlacementStrategy {
    /// Display name for run logs.
    fn name(&self) -> &'static str;

    /// The topology whose terms span the candidate universe.
    fn schedule_type(&self) -> ScheduleType;

    /// Penalty for adding one more of `course_id`'s sections to `term`,
    /// given the placements committed so far.
    fn balance_penalty(&self, _sections: &[Section], _course_id: &str, _term: Term) -> u32 {
        0
    }

    /// Reason stamped on sections this strategy cannot place.
    fn gridlock_reason(&self) -> &'static str;

    /// Message tail for the unscheduled conflict record.
    fn no_slot_message(&self) -> &'static str;
}

fn placed_in_term(sections: &[Section], course_id: &str, term: Term) -> u32 {
    sections
        .iter()
        .filter(|s| s.course_id == course_id && s.term == Some(term))
        .count() as u32
}

/// Single daily cycle; every section is full-year.
pub struct StandardStrategy;

impl PlacementStrategy for StandardStrategy {
    fn name(&self) -> &'static str {
        "Standard"
    }

    fn schedule_type(&self) -> ScheduleType {
        ScheduleType::Traditional
    }

    fn gridlock_reason(&self) -> &'static str {
        "Scheduling Gridlock"
    }

    fn no_slot_message(&self) -> &'static str {
        "No valid period found"
    }
}

/// Alternating A/B days; sections land on one day or the other.
pub struct AbStrategy;

impl PlacementStrategy for AbStrategy {
    fn name(&self) -> &'static str {
        "A/B Block"
    }

    fn schedule_type(&self) -> ScheduleType {
        ScheduleType::AbBlock
    }

    fn balance_penalty(&self, sections: &[Section], course_id: &str, term: Term) -> u32 {
        let a = placed_in_term(sections, course_id, Term::A);
        let b = placed_in_term(sections, course_id, Term::B);
        let lopsided = match term {
            Term::A => a > b,
            Term::B => b > a,
            _ => false,
        };
        if lopsided {
            TERM_IMBALANCE_PENALTY
        } else {
            0
        }
    }

    fn gridlock_reason(&self) -> &'static str {
        "A/B Scheduling Gridlock"
    }

    fn no_slot_message(&self) -> &'static str {
        "No valid A/B slot found"
    }
}

/// 4x4 semester block; fall and spring carry separate loads.
pub struct Block4x4Strategy;

impl PlacementStrategy for Block4x4Strategy {
    fn name(&self) -> &'static str {
        "4x4 Semester Block"
    }

    fn schedule_type(&self) -> ScheduleType {
        ScheduleType::Block4x4
    }

    fn balance_penalty(&self, sections: &[Section], course_id: &str, term: Term) -> u32 {
        let s1 = placed_in_term(sections, course_id, Term::S1);
        let s2 = placed_in_term(sections, course_id, Term::S2);
        let lopsided = match term {
            Term::S1 => s1 > s2,
            Term::S2 => s2 > s1,
            _ => false,
        };
        if lopsided {
            TERM_IMBALANCE_PENALTY
        } else {
            0
        }
    }

    fn gridlock_reason(&self) -> &'static str {
        "Semester Block Gridlock"
    }

    fn no_slot_message(&self) -> &'static str {
        "No valid S1/S2 slot found"
    }
}

/// Trimester rotation; a term is penalized once it outweighs the average of
/// the other two.
pub struct TrimesterStrategy;

impl PlacementStrategy for TrimesterStrategy {
    fn name(&self) -> &'static str {
        "Trimester"
    }

    fn schedule_type(&self) -> ScheduleType {
        ScheduleType::Trimester
    }

    fn balance_penalty(&self, sections: &[Section], course_id: &str, term: Term) -> u32 {
        let t1 = placed_in_term(sections, course_id, Term::T1) as f64;
        let t2 = placed_in_term(sections, course_id, Term::T2) as f64;
        let t3 = placed_in_term(sections, course_id, Term::T3) as f64;
        let lopsided = match term {
            Term::T1 => t1 > (t2 + t3) / 2.0,
            Term::T2 => t2 > (t1 + t3) / 2.0,
            Term::T3 => t3 > (t1 + t2) / 2.0,
            _ => false,
        };
        if lopsided {
            TERM_IMBALANCE_PENALTY
        } else {
            0
        }
    }

    fn gridlock_reason(&self) -> &'static str {
        "Trimester Gridlock"
    }

    fn no_slot_message(&self) -> &'static str {
        "No valid trimester slot found"
    }
}

/// Selects the strategy for a topology.
pub fn strategy_for(schedule_type: ScheduleType) -> Box<dyn PlacementStrategy> {
    match schedule_type {
        ScheduleType::Traditional => Box::new(StandardStrategy),
        ScheduleType::AbBlock => Box::new(AbStrategy),
        ScheduleType::Block4x4 => Box::new(Block4x4Strategy),
        ScheduleType::Trimester => Box::new(TrimesterStrategy),
    }
}

/// The candidate universe: every term of the topology crossed with every
/// teachable period. WIN periods never take sections.
fn candidate_slots(schedule_type: ScheduleType, periods: &[Period]) -> Vec<Timeslot> {
    let mut slots = Vec::new();
    for period in periods {
        if !period.is_teachable() || period.id.is_win() {
            continue;
        }
        for term in schedule_type.terms() {
            slots.push(term.slot(period.id));
        }
    }
    slots
}

/// Places every unlocked, unconflicted section, core courses first.
///
/// Sections are final after this pass: a section that scores no feasible
/// slot is conflicted out and never retried (no backtracking).
pub fn place_sections<R: Rng>(
    strategy: &dyn PlacementStrategy,
    sections: &mut [Section],
    periods: &[Period],
    rooms: &[Room],
    tracker: &mut ResourceTracker,
    log: &mut RunLog,
    rng: &mut R,
) -> Vec<Conflict> {
    let base_slots = candidate_slots(strategy.schedule_type(), periods);
    let mut density: HashMap<Timeslot, u32> =
        base_slots.iter().map(|&slot| (slot, 0)).collect();
    let mut conflicts = Vec::new();

    let mut order: Vec<usize> = (0..sections.len())
        .filter(|&i| !sections[i].locked && !sections[i].has_conflict)
        .collect();
    order.sort_by_key(|&i| !sections[i].is_core);

    for idx in order {
        let (course_id, teacher, co_teacher, preferred_room, is_core, room_type) = {
            let s = &sections[idx];
            (
                s.course_id.clone(),
                s.teacher.clone(),
                s.co_teacher.clone(),
                s.room.clone(),
                s.is_core,
                s.room_type,
            )
        };

        let mut shuffled = base_slots.clone();
        shuffled.shuffle(rng);

        let mut evaluations = Vec::with_capacity(shuffled.len());
        let mut best: Option<(Timeslot, u32)> = None;

        for slot in shuffled {
            let term = slot.load_term();

            let mut hard_fails = Vec::new();
            let teacher_free = teacher
                .as_deref()
                .is_some_and(|t| tracker.is_teacher_available(t, &slot));
            if !teacher_free {
                hard_fails.push("Teacher booked".to_string());
            }
            if let Some(co) = co_teacher.as_deref() {
                if !tracker.is_teacher_available(co, &slot) {
                    hard_fails.push("Co-teacher booked".to_string());
                }
            }
            if !hard_fails.is_empty() {
                evaluations.push(SlotEvaluation {
                    slot: slot.to_string(),
                    cost: None,
                    reasons: hard_fails,
                });
                continue;
            }

            let mut cost = 0;
            let mut reasons = Vec::new();

            if let Some(t) = teacher.as_deref() {
                if tracker.teacher_load(t, term) >= tracker.max_load {
                    cost += OVERLOAD_PENALTY;
                    reasons.push(format!("Exceeds {term} target load"));
                }
            }
            if let Some(room) = preferred_room.as_deref() {
                if !tracker.is_room_available(room, &slot) {
                    cost += ROOM_CONFLICT_PENALTY;
                    reasons.push("Preferred room occupied".to_string());
                }
            }
            if !is_core {
                let siblings = sections
                    .iter()
                    .filter(|s| s.course_id == course_id && s.occupies(&slot))
                    .count();
                if siblings > 0 {
                    cost += ELECTIVE_OVERLAP_PENALTY;
                    reasons.push("Elective overlap".to_string());
                }
            }
            cost += strategy.balance_penalty(sections, &course_id, term);
            cost += density.get(&slot).copied().unwrap_or(0) * SLOT_DENSITY_PENALTY;

            evaluations.push(SlotEvaluation {
                slot: slot.to_string(),
                cost: Some(cost),
                reasons,
            });

            if best.map_or(true, |(_, min)| cost < min) {
                best = Some((slot, cost));
            }
        }

        match best {
            Some((slot, cost)) => {
                *density.entry(slot).or_insert(0) += 1;
                sections[idx].room =
                    resolve_room(preferred_room, room_type, &slot, rooms, tracker);

                let term = slot.load_term();
                if let Err(err) = tracker.assign_placement(&mut sections[idx], slot, term) {
                    log.error(format!("Placement refused for {}: {err}", sections[idx].id));
                    sections[idx].mark_conflict(strategy.gridlock_reason());
                    conflicts.push(Conflict::unscheduled(
                        err.to_string(),
                        sections[idx].id.clone(),
                    ));
                    log.log_failure(&sections[idx], evaluations);
                    continue;
                }
                log.log_placement(&sections[idx], &slot, cost, evaluations);
            }
            None => {
                let section = &mut sections[idx];
                section.mark_conflict(strategy.gridlock_reason());
                conflicts.push(Conflict::unscheduled(
                    format!(
                        "{} S{}: {}",
                        section.course_name,
                        section.section_num,
                        strategy.no_slot_message()
                    ),
                    section.id.clone(),
                ));
                log.log_failure(section, evaluations);
            }
        }
    }

    conflicts
}

/// Finalizes the room for a committed slot: the preferred room if still
/// free, else an available room of the required type, rooms without a
/// recorded owner first (owned rooms stay free for their owners' sections).
fn resolve_room(
    preferred: Option<String>,
    room_type: RoomType,
    slot: &Timeslot,
    rooms: &[Room],
    tracker: &ResourceTracker,
) -> Option<String> {
    if let Some(room) = preferred {
        if tracker.is_room_available(&room, slot) {
            return Some(room);
        }
    }
    let mut candidates: Vec<&Room> = rooms
        .iter()
        .filter(|r| r.room_type == room_type && tracker.is_room_available(&r.id, slot))
        .collect();
    candidates.sort_by_key(|r| tracker.owner_of(&r.id).is_some());
    candidates.first().map(|r| r.id.clone())
}
