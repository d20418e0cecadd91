//! Bell timeline construction.
//!
//! Turns bell-schedule parameters into an ordered, classified period list:
//! computes start/end times in either sizing mode, splices in a standalone
//! WIN block, and classifies lunch periods. The resulting timeline is
//! immutable for the rest of the run.

use chrono::{NaiveTime, Timelike};

use crate::config::{LunchStyle, ScheduleConfig, ScheduleMode, WinModel};
use crate::models::{Conflict, Period, PeriodId, PeriodRole};

/// Fallbacks when a clock string fails to parse.
const DEFAULT_START_MIN: u32 = 480;
const DEFAULT_END_MIN: u32 = 900;

/// Split-lunch durations within this many minutes of the requirement pass.
const SPLIT_LUNCH_TOLERANCE_MIN: u32 = 2;

/// Parses an `HH:MM` clock string into minutes from midnight.
pub(crate) fn parse_clock(raw: &str) -> Option<u32> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .ok()
        .map(|t| t.hour() * 60 + t.minute())
}

/// Renders minutes from midnight as a 12-hour clock string ("8:00 AM").
pub(crate) fn format_clock(minutes: u32) -> String {
    let time = NaiveTime::from_hms_opt((minutes / 60) % 24, minutes % 60, 0)
        .unwrap_or(NaiveTime::MIN);
    time.format("%-I:%M %p").to_string()
}

/// Builds the bell timeline for one run.
pub struct TimelineBuilder<'a> {
    config: &'a ScheduleConfig,
}

impl<'a> TimelineBuilder<'a> {
    /// Creates a builder over the run configuration.
    pub fn new(config: &'a ScheduleConfig) -> Self {
        Self { config }
    }

    /// Produces the ordered, classified period list plus any timeline-level
    /// conflicts (currently: a split-lunch period too short for its waves).
    pub fn build(&self) -> (Vec<Period>, Vec<Conflict>) {
        let mut periods = self.base_periods();
        self.splice_win(&mut periods);

        let mut conflicts = Vec::new();
        self.classify(&mut periods, &mut conflicts);
        (periods, conflicts)
    }

    /// The unclassified timeline: either the caller's explicit periods or
    /// one computed from the clock parameters.
    fn base_periods(&self) -> Vec<Period> {
        if !self.config.periods.is_empty() {
            return self
                .config
                .periods
                .iter()
                .map(|spec| Period {
                    id: spec.id,
                    label: spec
                        .label
                        .clone()
                        .unwrap_or_else(|| format!("Period {}", spec.id)),
                    role: PeriodRole::Class,
                    start_min: spec.start_min,
                    end_min: spec.end_min,
                    duration: spec.end_min.saturating_sub(spec.start_min),
                    start_time: format_clock(spec.start_min),
                    end_time: format_clock(spec.end_min),
                })
                .collect();
        }

        let count = self.config.periods_count;
        if count == 0 {
            return Vec::new();
        }

        let start_min = parse_clock(&self.config.school_start).unwrap_or(DEFAULT_START_MIN);
        let length = match self.config.schedule_mode {
            ScheduleMode::PeriodLength => self.config.period_length,
            ScheduleMode::TimeFrame => {
                let end_min = parse_clock(&self.config.school_end).unwrap_or(DEFAULT_END_MIN);
                let total = end_min.saturating_sub(start_min);
                let total_passing = (count - 1) * self.config.passing_time;
                total.saturating_sub(total_passing) / count
            }
        };

        let mut current = start_min;
        (1..=count)
            .map(|n| {
                let period = Period {
                    id: PeriodId::Nth(n),
                    label: format!("Period {n}"),
                    role: PeriodRole::Class,
                    start_min: current,
                    end_min: current + length,
                    duration: length,
                    start_time: format_clock(current),
                    end_time: format_clock(current + length),
                };
                current += length + self.config.passing_time;
                period
            })
            .collect()
    }

    /// Splices a standalone WIN block in after its designated period and
    /// shifts everything behind it forward by the block plus passing time.
    fn splice_win(&self, periods: &mut Vec<Period>) {
        let win = &self.config.win_config;
        if !win.enabled || win.model != WinModel::Separate {
            return;
        }
        let Some(after) = win.after_period else {
            return;
        };
        let Some(index) = periods.iter().position(|p| p.id == after) else {
            return;
        };

        let passing = self.config.passing_time;
        let win_start = periods[index].end_min + passing;
        let win_end = win_start + win.win_duration;

        let mut current = win_end + passing;
        for p in periods.iter_mut().skip(index + 1) {
            p.start_min = current;
            p.end_min = current + p.duration;
            p.start_time = format_clock(p.start_min);
            p.end_time = format_clock(p.end_min);
            current += p.duration + passing;
        }

        periods.insert(
            index + 1,
            Period {
                id: PeriodId::Win,
                label: "WIN".into(),
                role: PeriodRole::Win,
                start_min: win_start,
                end_min: win_end,
                duration: win.win_duration,
                start_time: format_clock(win_start),
                end_time: format_clock(win_end),
            },
        );
    }

    /// Classifies lunch and embedded-WIN periods. Lunch wins over WIN when
    /// both designate the same period.
    fn classify(&self, periods: &mut [Period], conflicts: &mut Vec<Conflict>) {
        let lunch = &self.config.lunch_config;
        let win = &self.config.win_config;
        let embedded_win = (win.enabled && win.model == WinModel::UsesPeriod)
            .then_some(win.win_period)
            .flatten();

        for p in periods.iter_mut() {
            if lunch.style == LunchStyle::Split && Some(p.id) == lunch.lunch_period {
                p.role = PeriodRole::SplitLunch;
                let cafeteria = lunch.lunch_duration * lunch.num_waves;
                let pedagogical = lunch.min_class_time + lunch.lunch_duration;
                let required = cafeteria.max(pedagogical);
                if p.duration + SPLIT_LUNCH_TOLERANCE_MIN < required {
                    conflicts.push(Conflict::coverage(format!(
                        "Period {} is {}m; needs {}m to fit {} lunch waves plus class time",
                        p.id, p.duration, required, lunch.num_waves
                    )));
                }
            } else if lunch.style == LunchStyle::Unit && Some(p.id) == lunch.lunch_period {
                p.role = PeriodRole::UnitLunch;
            } else if lunch.style == LunchStyle::MultiPeriod && lunch.lunch_periods.contains(&p.id)
            {
                p.role = PeriodRole::MultiLunch;
            } else if Some(p.id) == embedded_win {
                p.role = PeriodRole::Win;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PeriodSpec;
    use crate::models::ConflictKind;

    fn base_config() -> ScheduleConfig {
        ScheduleConfig::default()
    }

    #[test]
    fn test_clock_parsing() {
        assert_eq!(parse_clock("08:00"), Some(480));
        assert_eq!(parse_clock("15:30"), Some(930));
        assert_eq!(parse_clock("not a time"), None);
    }

    #[test]
    fn test_clock_formatting() {
        assert_eq!(format_clock(480), "8:00 AM");
        assert_eq!(format_clock(750), "12:30 PM");
        assert_eq!(format_clock(915), "3:15 PM");
        assert_eq!(format_clock(0), "12:00 AM");
    }

    #[test]
    fn test_period_length_mode() {
        let cfg = base_config();
        let (periods, conflicts) = TimelineBuilder::new(&cfg).build();
        assert!(conflicts.is_empty());
        assert_eq!(periods.len(), 7);
        assert_eq!(periods[0].start_min, 480);
        assert_eq!(periods[0].end_min, 530);
        // Next period starts after passing time.
        assert_eq!(periods[1].start_min, 535);
        assert_eq!(periods[0].start_time, "8:00 AM");
        assert!(periods.iter().all(|p| p.duration == 50));
    }

    #[test]
    fn test_time_frame_mode_divides_evenly() {
        let mut cfg = base_config();
        cfg.schedule_mode = ScheduleMode::TimeFrame;
        // 08:00–15:00 = 420 minutes; minus 6 × 5 passing = 390; / 7 = 55 (floor).
        let (periods, _) = TimelineBuilder::new(&cfg).build();
        assert_eq!(periods.len(), 7);
        assert!(periods.iter().all(|p| p.duration == 55));
        assert_eq!(periods[0].start_min, 480);
    }

    #[test]
    fn test_time_frame_floors() {
        let mut cfg = base_config();
        cfg.schedule_mode = ScheduleMode::TimeFrame;
        cfg.periods_count = 6;
        cfg.school_end = "14:00".into();
        // 360 - 25 passing = 335; / 6 = 55 remainder 5 → floor 55.
        let (periods, _) = TimelineBuilder::new(&cfg).build();
        assert!(periods.iter().all(|p| p.duration == 55));
    }

    #[test]
    fn test_win_splice_shifts_later_periods() {
        let mut cfg = base_config();
        cfg.win_config.enabled = true;
        cfg.win_config.model = WinModel::Separate;
        cfg.win_config.after_period = Some(PeriodId::Nth(3));
        cfg.win_config.win_duration = 30;

        let (periods, _) = TimelineBuilder::new(&cfg).build();
        assert_eq!(periods.len(), 8);
        assert_eq!(periods[3].id, PeriodId::Win);
        assert_eq!(periods[3].role, PeriodRole::Win);

        // Period 3 ends at 480 + 3*50 + 2*5 = 640; WIN runs 645–675.
        assert_eq!(periods[3].start_min, 645);
        assert_eq!(periods[3].end_min, 675);
        // Period 4 now starts after WIN plus passing.
        assert_eq!(periods[4].id, PeriodId::Nth(4));
        assert_eq!(periods[4].start_min, 680);
        // Every later period keeps its duration.
        assert!(periods[4..].iter().all(|p| p.duration == 50));
    }

    #[test]
    fn test_unit_lunch_classification() {
        let mut cfg = base_config();
        cfg.lunch_config.style = LunchStyle::Unit;
        cfg.lunch_config.lunch_period = Some(PeriodId::Nth(4));
        let (periods, conflicts) = TimelineBuilder::new(&cfg).build();
        assert!(conflicts.is_empty());
        assert_eq!(periods[3].role, PeriodRole::UnitLunch);
        assert_eq!(periods[2].role, PeriodRole::Class);
    }

    #[test]
    fn test_split_lunch_too_short_emits_coverage() {
        let mut cfg = base_config();
        cfg.lunch_config.style = LunchStyle::Split;
        cfg.lunch_config.lunch_period = Some(PeriodId::Nth(4));
        cfg.lunch_config.num_waves = 3;
        cfg.lunch_config.lunch_duration = 30;
        cfg.lunch_config.min_class_time = 45;
        cfg.period_length = 75; // required = max(90, 75) = 90; 75 + 2 < 90.

        let (periods, conflicts) = TimelineBuilder::new(&cfg).build();
        assert_eq!(periods[3].role, PeriodRole::SplitLunch);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::Coverage);
        assert!(conflicts[0].message.contains("Period 4"));
    }

    #[test]
    fn test_split_lunch_within_tolerance_passes() {
        let mut cfg = base_config();
        cfg.lunch_config.style = LunchStyle::Split;
        cfg.lunch_config.lunch_period = Some(PeriodId::Nth(4));
        cfg.lunch_config.num_waves = 3;
        cfg.lunch_config.lunch_duration = 30;
        cfg.lunch_config.min_class_time = 30;
        cfg.period_length = 88; // required 90, tolerance 2 → passes.

        let (_, conflicts) = TimelineBuilder::new(&cfg).build();
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_multi_lunch_classification() {
        let mut cfg = base_config();
        cfg.lunch_config.style = LunchStyle::MultiPeriod;
        cfg.lunch_config.lunch_periods = vec![PeriodId::Nth(4), PeriodId::Nth(5)];
        let (periods, _) = TimelineBuilder::new(&cfg).build();
        assert_eq!(periods[3].role, PeriodRole::MultiLunch);
        assert_eq!(periods[4].role, PeriodRole::MultiLunch);
        assert_eq!(periods[5].role, PeriodRole::Class);
    }

    #[test]
    fn test_embedded_win_relabels_period() {
        let mut cfg = base_config();
        cfg.win_config.enabled = true;
        cfg.win_config.model = WinModel::UsesPeriod;
        cfg.win_config.win_period = Some(PeriodId::Nth(6));
        let (periods, _) = TimelineBuilder::new(&cfg).build();
        assert_eq!(periods.len(), 7); // No splice.
        assert_eq!(periods[5].role, PeriodRole::Win);
    }

    #[test]
    fn test_caller_supplied_periods() {
        let mut cfg = base_config();
        cfg.periods = vec![
            PeriodSpec {
                id: PeriodId::Nth(1),
                label: None,
                start_min: 500,
                end_min: 545,
            },
            PeriodSpec {
                id: PeriodId::Nth(2),
                label: Some("Block B".into()),
                start_min: 550,
                end_min: 595,
            },
        ];
        let (periods, _) = TimelineBuilder::new(&cfg).build();
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].label, "Period 1");
        assert_eq!(periods[0].duration, 45);
        assert_eq!(periods[1].label, "Block B");
    }
}
