//! Run configuration.
//!
//! One record enumerating every field the engine recognizes. Defaults are
//! applied in a single place (the `Default` impl, which serde falls back to
//! field-by-field), so the rest of the engine never reaches for fallback
//! values. The calling environment supplies this record as camelCase JSON.

use serde::{Deserialize, Serialize};

use crate::models::{Course, Period, PeriodId, PlcGroup, Room, Teacher, Term, Timeslot};

/// How period lengths are determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleMode {
    /// Fixed period length; the school day ends wherever the last period does.
    #[default]
    PeriodLength,
    /// Divide the school day evenly across the period count (minus passing
    /// time), flooring to whole minutes.
    TimeFrame,
}

/// Calendar topology of the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleType {
    /// One daily cycle, full-year sections.
    #[default]
    Traditional,
    /// Alternating A/B days.
    AbBlock,
    /// Semester block (fall/spring).
    #[serde(rename = "4x4_block")]
    Block4x4,
    /// Three trimesters.
    Trimester,
}

impl ScheduleType {
    /// The terms sections of this topology are placed into.
    pub fn terms(&self) -> &'static [Term] {
        match self {
            ScheduleType::Traditional => &[Term::Fy],
            ScheduleType::AbBlock => &[Term::A, Term::B],
            ScheduleType::Block4x4 => &[Term::S1, Term::S2],
            ScheduleType::Trimester => &[Term::T1, Term::T2, Term::T3],
        }
    }

    /// One slot per term of this topology for the given period.
    ///
    /// Reservations (lunch, PLC, blocked time) expand through this so they
    /// constrain every term's candidates, not just the full-year ones.
    pub fn slots_for_period(&self, period: PeriodId) -> Vec<Timeslot> {
        self.terms().iter().map(|t| t.slot(period)).collect()
    }
}

/// Lunch scheduling style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LunchStyle {
    /// Everyone eats at once in a dedicated period.
    #[default]
    Unit,
    /// One long period hosts classes plus rotating lunch waves.
    Split,
    /// Several ordinary periods share lunch duty.
    MultiPeriod,
}

/// Lunch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LunchConfig {
    /// Lunch style.
    pub style: LunchStyle,
    /// The lunch period (unit and split styles).
    pub lunch_period: Option<PeriodId>,
    /// The lunch periods (multi-period style).
    pub lunch_periods: Vec<PeriodId>,
    /// Minutes each wave spends eating.
    pub lunch_duration: u32,
    /// Number of split-lunch waves.
    pub num_waves: u32,
    /// Minimum instructional minutes a split-lunch period must retain.
    pub min_class_time: u32,
}

impl Default for LunchConfig {
    fn default() -> Self {
        Self {
            style: LunchStyle::Unit,
            lunch_period: None,
            lunch_periods: Vec::new(),
            lunch_duration: 30,
            num_waves: 3,
            min_class_time: 30,
        }
    }
}

/// How WIN time is carved out of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinModel {
    /// An existing period is relabeled as WIN.
    #[default]
    UsesPeriod,
    /// A standalone block is spliced in after a designated period.
    Separate,
}

/// WIN ("What I Need") block configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WinConfig {
    /// Whether WIN time exists at all.
    pub enabled: bool,
    /// Which period becomes WIN (`uses_period` model).
    pub win_period: Option<PeriodId>,
    /// Carve-out model.
    pub model: WinModel,
    /// The period a separate WIN block follows.
    pub after_period: Option<PeriodId>,
    /// Separate-block length in minutes.
    pub win_duration: u32,
}

impl Default for WinConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            win_period: None,
            model: WinModel::UsesPeriod,
            after_period: None,
            win_duration: 30,
        }
    }
}

/// Per-teacher blocked periods (part-time staff, itinerant specialists).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherAvailability {
    pub teacher_id: String,
    #[serde(default)]
    pub blocked_periods: Vec<PeriodId>,
}

/// Legacy constraint records, kept for callers predating the structured
/// availability and lock fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConstraintSpec {
    /// Teacher cannot teach the given period.
    #[serde(rename_all = "camelCase")]
    TeacherUnavailable { teacher_id: String, period: PeriodId },
    /// Section is pinned to the given period before placement runs.
    #[serde(rename_all = "camelCase")]
    LockPeriod { section_id: String, period: PeriodId },
}

/// A caller-supplied placement seed: a section from a previous run that must
/// keep its slot (locked or manually dragged into place).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSeed {
    /// Section to pin (matched against derived section ids).
    pub section_id: String,
    /// The period it must keep.
    pub period: PeriodId,
    /// The term it must keep; the topology's first term when absent.
    #[serde(default)]
    pub term: Option<Term>,
    /// Teacher override.
    #[serde(default)]
    pub teacher: Option<String>,
    /// Co-teacher override.
    #[serde(default)]
    pub co_teacher: Option<String>,
    /// Room override.
    #[serde(default)]
    pub room: Option<String>,
}

/// A caller-supplied bell period, bypassing timeline computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSpec {
    pub id: PeriodId,
    #[serde(default)]
    pub label: Option<String>,
    pub start_min: u32,
    pub end_min: u32,
}

/// The complete engine configuration.
///
/// Every field is optional on the wire; absent fields take the defaults
/// below rather than being rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleConfig {
    /// First bell, `HH:MM`.
    pub school_start: String,
    /// Last bell, `HH:MM`.
    pub school_end: String,
    /// Number of bell periods.
    pub periods_count: u32,
    /// Nominal period length in minutes (`period_length` mode).
    pub period_length: u32,
    /// Minutes between periods.
    pub passing_time: u32,
    /// How period lengths are determined.
    pub schedule_mode: ScheduleMode,
    /// Calendar topology.
    pub schedule_type: ScheduleType,
    /// Explicit bell timeline; computed from the fields above when empty.
    pub periods: Vec<PeriodSpec>,
    /// Lunch configuration.
    pub lunch_config: LunchConfig,
    /// WIN configuration.
    pub win_config: WinConfig,
    /// Plan periods each teacher keeps per day.
    pub plan_periods_per_day: u32,
    /// Whether PLC common time is reserved.
    pub plc_enabled: bool,
    /// Caller-defined PLC groups; auto-generated per department when empty.
    pub plc_groups: Vec<PlcGroup>,
    /// Per-teacher blocked periods.
    pub teacher_availability: Vec<TeacherAvailability>,
    /// Teaching staff.
    pub teachers: Vec<Teacher>,
    /// Course catalog.
    pub courses: Vec<Course>,
    /// Rooms.
    pub rooms: Vec<Room>,
    /// Legacy constraints.
    pub constraints: Vec<ConstraintSpec>,
    /// Locked sections from a previous run.
    pub locked_sections: Vec<SectionSeed>,
    /// Manually placed sections from a previous run (treated as locked).
    pub manual_sections: Vec<SectionSeed>,
    /// Student body size.
    pub student_count: u32,
    /// Global per-section seat cap.
    pub max_class_size: u32,
    /// Seed for the placement RNG; OS entropy when absent.
    pub seed: Option<u64>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            school_start: "08:00".into(),
            school_end: "15:00".into(),
            periods_count: 7,
            period_length: 50,
            passing_time: 5,
            schedule_mode: ScheduleMode::PeriodLength,
            schedule_type: ScheduleType::Traditional,
            periods: Vec::new(),
            lunch_config: LunchConfig::default(),
            win_config: WinConfig::default(),
            plan_periods_per_day: 1,
            plc_enabled: false,
            plc_groups: Vec::new(),
            teacher_availability: Vec::new(),
            teachers: Vec::new(),
            courses: Vec::new(),
            rooms: Vec::new(),
            constraints: Vec::new(),
            locked_sections: Vec::new(),
            manual_sections: Vec::new(),
            student_count: 800,
            max_class_size: 30,
            seed: None,
        }
    }
}

/// Load parameters derived once the timeline is known.
#[derive(Debug, Clone, Copy)]
pub struct LoadModel {
    /// Periods a teacher could conceivably teach per day.
    pub effective_slots: u32,
    /// Plan periods reserved per day.
    pub plan_periods: u32,
    /// Whether one PLC period is reserved per day.
    pub plc_enabled: bool,
    /// Per-term teaching cap.
    pub max_load: u32,
}

impl LoadModel {
    /// Non-teaching periods each teacher is owed per day.
    pub fn expected_free(&self) -> u32 {
        self.plan_periods + u32::from(self.plc_enabled)
    }
}

impl ScheduleConfig {
    /// Derives the load model from the built timeline.
    ///
    /// A split-lunch period still hosts classes, so it stays in the
    /// effective-slot count; any other lunch arrangement removes one slot
    /// from every teacher's day.
    pub fn load_model(&self, periods: &[Period]) -> LoadModel {
        let count = periods.len() as u32;
        let effective_slots = if self.lunch_config.style == LunchStyle::Split {
            count
        } else {
            count.saturating_sub(1)
        };
        let max_load = effective_slots
            .saturating_sub(self.plan_periods_per_day)
            .saturating_sub(u32::from(self.plc_enabled))
            .max(1);
        LoadModel {
            effective_slots,
            plan_periods: self.plan_periods_per_day,
            plc_enabled: self.plc_enabled,
            max_load,
        }
    }
}
