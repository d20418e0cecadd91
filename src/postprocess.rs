//! Post-placement analytics and balancing.
//!
//! Once the strategy has committed every section it could, this pass
//! balances split-lunch waves, totals per-period coverage, and verifies
//! each teacher kept their plan/PLC time. Shortfalls are reported as
//! conflicts, never as errors.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::{LoadModel, LunchStyle, ScheduleConfig, ScheduleType};
use crate::models::{Conflict, Period, PeriodId, PeriodRole, Section, Teacher};
use crate::tracker::ResourceTracker;

/// Students a period may leave unaccounted before a coverage conflict.
const UNACCOUNTED_LIMIT: u32 = 50;

/// Assigns lunch waves for a split-lunch schedule.
///
/// Sections sitting in the lunch period are grouped by department; groups
/// are laid into waves largest-first, each going to the wave carrying the
/// fewest students so far (greedy bin balancing). Departments stay together
/// so hall supervision stays simple.
pub fn assign_lunch_waves(sections: &mut [Section], lunch_period: PeriodId, num_waves: u32) {
    if num_waves == 0 {
        return;
    }

    let at_lunch: Vec<usize> = (0..sections.len())
        .filter(|&i| {
            !sections[i].has_conflict
                && sections[i]
                    .timeslot
                    .is_some_and(|slot| slot.period == lunch_period)
        })
        .collect();

    let mut departments: Vec<String> = Vec::new();
    for &i in &at_lunch {
        if !departments.contains(&sections[i].department) {
            departments.push(sections[i].department.clone());
        }
    }

    let section_count = |dept: &str| {
        at_lunch
            .iter()
            .filter(|&&i| sections[i].department == dept)
            .count()
    };
    departments.sort_by_key(|d| std::cmp::Reverse(section_count(d)));

    let mut wave_loads = vec![0u32; num_waves as usize];
    for dept in departments {
        let students: u32 = at_lunch
            .iter()
            .filter(|&&i| sections[i].department == dept)
            .map(|&i| sections[i].enrollment)
            .sum();

        let best = wave_loads
            .iter()
            .enumerate()
            .min_by_key(|(_, &load)| load)
            .map(|(w, _)| w)
            .unwrap_or(0);
        wave_loads[best] += students;

        for &i in &at_lunch {
            if sections[i].department == dept {
                sections[i].lunch_wave = Some(best as u32 + 1);
            }
        }
    }
}

/// Where a period's students are at lunch time: a head count, or the
/// symbolic waves marker for split lunch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LunchAttendance {
    Count(u32),
    Waves,
}

impl Serialize for LunchAttendance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LunchAttendance::Count(n) => serializer.serialize_u32(*n),
            LunchAttendance::Waves => serializer.serialize_str("Waves"),
        }
    }
}

impl<'de> Deserialize<'de> for LunchAttendance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AttendanceVisitor;

        impl Visitor<'_> for AttendanceVisitor {
            type Value = LunchAttendance;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a head count or the string \"Waves\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<LunchAttendance, E> {
                Ok(LunchAttendance::Count(v as u32))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<LunchAttendance, E> {
                if v == "Waves" {
                    Ok(LunchAttendance::Waves)
                } else {
                    Err(E::custom(format!("invalid lunch attendance '{v}'")))
                }
            }
        }

        deserializer.deserialize_any(AttendanceVisitor)
    }
}

/// Per-period coverage numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodAnalytics {
    /// The period.
    pub period: PeriodId,
    /// Students seated in class (averaged across parallel terms).
    pub seats_in_class: u32,
    /// Students at lunch during this period.
    pub at_lunch: LunchAttendance,
    /// Students neither seated nor at lunch.
    pub unaccounted: u32,
    /// Sections meeting in this period across all terms.
    pub section_count: u32,
}

/// Computes per-period coverage and emits conflicts where too many
/// students go unaccounted for.
///
/// Seats are averaged across the topology's parallel terms (a student sits
/// in only one semester's section of a period at a time), so the numbers
/// reflect a typical day rather than a year's total.
pub fn period_analytics(
    sections: &[Section],
    periods: &[Period],
    config: &ScheduleConfig,
) -> (Vec<PeriodAnalytics>, Vec<Conflict>) {
    let students = config.student_count;
    let lunch = &config.lunch_config;
    let terms = config.schedule_type.terms();

    let mut analytics = Vec::with_capacity(periods.len());
    let mut conflicts = Vec::new();

    for period in periods {
        let per_term: Vec<u32> = terms
            .iter()
            .map(|t| {
                let slot = t.slot(period.id);
                sections
                    .iter()
                    .filter(|s| s.occupies(&slot))
                    .map(|s| s.enrollment)
                    .sum()
            })
            .collect();
        let seats =
            (per_term.iter().sum::<u32>() as f64 / terms.len() as f64).round() as u32;

        let mut unaccounted = students.saturating_sub(seats);
        let mut at_lunch = LunchAttendance::Count(0);

        if lunch.style == LunchStyle::Unit && Some(period.id) == lunch.lunch_period {
            unaccounted = 0;
            at_lunch = LunchAttendance::Count(students);
        } else if lunch.style == LunchStyle::Split && Some(period.id) == lunch.lunch_period {
            at_lunch = LunchAttendance::Waves;
        } else if lunch.style == LunchStyle::MultiPeriod
            && lunch.lunch_periods.contains(&period.id)
        {
            let share = students / lunch.lunch_periods.len().max(1) as u32;
            at_lunch = LunchAttendance::Count(share);
            unaccounted = students.saturating_sub(seats).saturating_sub(share);
        } else if period.id.is_win() {
            unaccounted = 0;
        }

        let section_count = sections
            .iter()
            .filter(|s| {
                !s.has_conflict && s.timeslot.is_some_and(|slot| slot.period == period.id)
            })
            .count() as u32;

        if unaccounted > UNACCOUNTED_LIMIT
            && period.role != PeriodRole::UnitLunch
            && period.role != PeriodRole::Win
        {
            conflicts.push(Conflict::coverage(format!(
                "Period {}: {} students unaccounted for on average",
                period.id, unaccounted
            )));
        }

        analytics.push(PeriodAnalytics {
            period: period.id,
            seats_in_class: seats,
            at_lunch,
            unaccounted,
            section_count,
        });
    }

    (analytics, conflicts)
}

/// Verifies every teacher kept their plan/PLC allotment.
///
/// A teacher's busiest day is their per-term maximum of teaching slots;
/// whatever remains of the effective day is free time, and falling short of
/// the plan+PLC allotment is a plan violation.
pub fn check_plan_time(
    teachers: &[Teacher],
    tracker: &ResourceTracker,
    load: &LoadModel,
    schedule_type: ScheduleType,
) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    let expected = load.expected_free() as i64;

    for teacher in teachers {
        let Some(schedule) = tracker.teacher_schedule.get(&teacher.id) else {
            continue;
        };
        let teaching_on_busiest_day = schedule_type
            .terms()
            .iter()
            .map(|&term| {
                schedule
                    .iter()
                    .filter(|(slot, occupant)| {
                        occupant.is_section() && slot.load_term() == term
                    })
                    .count() as i64
            })
            .max()
            .unwrap_or(0);

        let free = load.effective_slots as i64 - teaching_on_busiest_day;
        if free < expected {
            conflicts.push(Conflict::plan_violation(format!(
                "{} has {} free periods (needs {} for Plan/PLC)",
                teacher.name, free, expected
            )));
        }
    }
    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, Term, Timeslot};

    fn placed_section(
        course_id: &str,
        dept: &str,
        n: u32,
        enrollment: u32,
        slot: Timeslot,
    ) -> Section {
        let course = Course::required(course_id, course_id, dept);
        let mut s = Section::derived(&course, n, enrollment, 50);
        s.timeslot = Some(slot);
        s.term = Some(slot.load_term());
        s
    }

    fn class_period(n: u32, role: PeriodRole) -> Period {
        Period {
            id: PeriodId::Nth(n),
            label: format!("Period {n}"),
            role,
            start_min: 0,
            end_min: 50,
            duration: 50,
            start_time: String::new(),
            end_time: String::new(),
        }
    }

    #[test]
    fn test_lunch_waves_balance_by_enrollment() {
        let lunch = Timeslot::full_year(PeriodId::Nth(4));
        let mut sections = vec![
            placed_section("MATH1", "math", 1, 30, lunch),
            placed_section("MATH2", "math", 1, 30, lunch),
            placed_section("ENG1", "english", 1, 25, lunch),
            placed_section("ART1", "art", 1, 20, lunch),
        ];

        assign_lunch_waves(&mut sections, PeriodId::Nth(4), 3);

        // Largest department (math, 2 sections) claims wave 1; both of its
        // sections share it.
        assert_eq!(sections[0].lunch_wave, Some(1));
        assert_eq!(sections[1].lunch_wave, Some(1));
        // The others fill the emptier waves.
        assert_eq!(sections[2].lunch_wave, Some(2));
        assert_eq!(sections[3].lunch_wave, Some(3));
    }

    #[test]
    fn test_lunch_waves_skip_conflicted_and_elsewhere() {
        let lunch = Timeslot::full_year(PeriodId::Nth(4));
        let other = Timeslot::full_year(PeriodId::Nth(2));
        let mut sections = vec![
            placed_section("MATH1", "math", 1, 30, lunch),
            placed_section("ENG1", "english", 1, 25, other),
        ];
        sections[0].has_conflict = true;

        assign_lunch_waves(&mut sections, PeriodId::Nth(4), 2);
        assert_eq!(sections[0].lunch_wave, None);
        assert_eq!(sections[1].lunch_wave, None);
    }

    #[test]
    fn test_analytics_unit_lunch() {
        let mut config = ScheduleConfig::default();
        config.student_count = 600;
        config.lunch_config.style = LunchStyle::Unit;
        config.lunch_config.lunch_period = Some(PeriodId::Nth(2));

        let periods = vec![
            class_period(1, PeriodRole::Class),
            class_period(2, PeriodRole::UnitLunch),
        ];
        let sections = vec![placed_section(
            "MATH1",
            "math",
            1,
            600,
            Timeslot::full_year(PeriodId::Nth(1)),
        )];

        let (analytics, conflicts) = period_analytics(&sections, &periods, &config);
        assert!(conflicts.is_empty());
        assert_eq!(analytics[0].seats_in_class, 600);
        assert_eq!(analytics[0].unaccounted, 0);
        assert_eq!(analytics[1].at_lunch, LunchAttendance::Count(600));
        assert_eq!(analytics[1].unaccounted, 0);
    }

    #[test]
    fn test_analytics_emits_coverage_conflict() {
        let mut config = ScheduleConfig::default();
        config.student_count = 500;
        let periods = vec![class_period(1, PeriodRole::Class)];
        let sections = vec![placed_section(
            "MATH1",
            "math",
            1,
            100,
            Timeslot::full_year(PeriodId::Nth(1)),
        )];

        let (analytics, conflicts) = period_analytics(&sections, &periods, &config);
        assert_eq!(analytics[0].unaccounted, 400);
        assert_eq!(conflicts.len(), 1);
        assert!(conflicts[0].message.contains("Period 1"));
    }

    #[test]
    fn test_analytics_averages_ab_terms() {
        let mut config = ScheduleConfig::default();
        config.schedule_type = ScheduleType::AbBlock;
        config.student_count = 100;
        let periods = vec![class_period(1, PeriodRole::Class)];
        let sections = vec![
            placed_section("MATH1", "math", 1, 60, Term::A.slot(PeriodId::Nth(1))),
            placed_section("ENG1", "english", 1, 40, Term::B.slot(PeriodId::Nth(1))),
        ];

        let (analytics, conflicts) = period_analytics(&sections, &periods, &config);
        // (60 + 40) / 2 = 50 seats on a typical day.
        assert_eq!(analytics[0].seats_in_class, 50);
        assert_eq!(analytics[0].unaccounted, 50);
        assert!(conflicts.is_empty()); // 50 is at the limit, not over it.
        assert_eq!(analytics[0].section_count, 2);
    }

    #[test]
    fn test_analytics_multi_lunch_share() {
        let mut config = ScheduleConfig::default();
        config.student_count = 300;
        config.lunch_config.style = LunchStyle::MultiPeriod;
        config.lunch_config.lunch_periods = vec![PeriodId::Nth(1), PeriodId::Nth(2)];
        let periods = vec![
            class_period(1, PeriodRole::MultiLunch),
            class_period(2, PeriodRole::MultiLunch),
        ];
        let sections = vec![placed_section(
            "MATH1",
            "math",
            1,
            150,
            Timeslot::full_year(PeriodId::Nth(1)),
        )];

        let (analytics, _) = period_analytics(&sections, &periods, &config);
        assert_eq!(analytics[0].at_lunch, LunchAttendance::Count(150));
        assert_eq!(analytics[0].unaccounted, 0); // 300 - 150 seats - 150 at lunch.
        assert_eq!(analytics[1].unaccounted, 150); // nobody seated in period 2.
    }

    #[test]
    fn test_plan_time_violation() {
        use crate::models::{Room, Teacher};
        let teachers = vec![Teacher::new("t1", "Adams").with_department("math")];
        let mut tracker = ResourceTracker::new(&teachers, &[] as &[Room], 5);
        let load = LoadModel {
            effective_slots: 6,
            plan_periods: 1,
            plc_enabled: true,
            max_load: 4,
        };

        // Teach 5 of 6 effective slots → 1 free < 2 expected.
        for n in 1..=5 {
            let course = Course::required(&format!("C{n}"), "Course", "math");
            let mut s = Section::derived(&course, 1, 25, 30);
            s.teacher = Some("t1".into());
            tracker
                .assign_placement(&mut s, Timeslot::full_year(PeriodId::Nth(n)), Term::Fy)
                .unwrap();
        }

        let conflicts = check_plan_time(&teachers, &tracker, &load, ScheduleType::Traditional);
        assert_eq!(conflicts.len(), 1);
        assert!(conflicts[0].message.contains("Adams"));
        assert!(conflicts[0].message.contains("needs 2"));
    }

    #[test]
    fn test_plan_time_ok_counts_per_term() {
        use crate::models::{Room, Teacher};
        let teachers = vec![Teacher::new("t1", "Adams").with_department("math")];
        let mut tracker = ResourceTracker::new(&teachers, &[] as &[Room], 5);
        let load = LoadModel {
            effective_slots: 4,
            plan_periods: 1,
            plc_enabled: false,
            max_load: 3,
        };

        // Three A-day and three B-day slots: busiest day teaches 3 of 4.
        for n in 1..=3 {
            for term in [Term::A, Term::B] {
                let course = Course::required(&format!("C{n}{term}"), "Course", "math");
                let mut s = Section::derived(&course, 1, 25, 30);
                s.teacher = Some("t1".into());
                tracker
                    .assign_placement(&mut s, term.slot(PeriodId::Nth(n)), term)
                    .unwrap();
            }
        }

        let conflicts = check_plan_time(&teachers, &tracker, &load, ScheduleType::AbBlock);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_lunch_attendance_serde() {
        assert_eq!(
            serde_json::to_string(&LunchAttendance::Count(250)).unwrap(),
            "250"
        );
        assert_eq!(
            serde_json::to_string(&LunchAttendance::Waves).unwrap(),
            "\"Waves\""
        );
        let back: LunchAttendance = serde_json::from_str("\"Waves\"").unwrap();
        assert_eq!(back, LunchAttendance::Waves);
    }
}
