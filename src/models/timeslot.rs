//! Canonical timeslot addressing.
//!
//! A timeslot is the sole addressable unit of occupancy: one bell period on
//! one term/day combination, written canonically as `{TERM}-{DAY}-{PERIOD}`
//! (e.g. `FY-ALL-4`, `FY-A-2`, `S2-ALL-1`). Every occupancy map in the
//! tracker is keyed by it; the codec translates it to display form only when
//! a run's results leave the engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::PeriodId;

/// A scheduling horizon segment.
///
/// FY spans the whole year; S1/S2 are semesters, T1–T3 trimesters, and A/B
/// the two halves of an alternating-day cycle. Teacher load is counted per
/// term, so all eight values act as load-counter keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    /// Full year.
    #[serde(rename = "FY")]
    Fy,
    S1,
    S2,
    T1,
    T2,
    T3,
    A,
    B,
}

impl Term {
    /// All load-counter keys.
    pub const ALL: [Term; 8] = [
        Term::Fy,
        Term::S1,
        Term::S2,
        Term::T1,
        Term::T2,
        Term::T3,
        Term::A,
        Term::B,
    ];

    /// The canonical slot this term occupies for a given period.
    ///
    /// A/B are day-level terms: their slots live in the full-year segment
    /// with the day component set. Every other term owns its own segment.
    pub fn slot(self, period: super::PeriodId) -> Timeslot {
        match self {
            Term::A => Timeslot::new(Term::Fy, Day::A, period),
            Term::B => Timeslot::new(Term::Fy, Day::B, period),
            term => Timeslot::new(term, Day::All, period),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Term::Fy => "FY",
            Term::S1 => "S1",
            Term::S2 => "S2",
            Term::T1 => "T1",
            Term::T2 => "T2",
            Term::T3 => "T3",
            Term::A => "A",
            Term::B => "B",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day component of a timeslot.
///
/// ALL for single-cycle topologies; A/B for alternating days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Day {
    All,
    A,
    B,
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Day::All => "ALL",
            Day::A => "A",
            Day::B => "B",
        })
    }
}

/// Canonical timeslot: one period on one term/day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timeslot {
    pub term: Term,
    pub day: Day,
    pub period: PeriodId,
}

impl Timeslot {
    /// Creates a timeslot.
    pub fn new(term: Term, day: Day, period: PeriodId) -> Self {
        Self { term, day, period }
    }

    /// Full-year, every-day slot for a period (the standard topology).
    pub fn full_year(period: PeriodId) -> Self {
        Self::new(Term::Fy, Day::All, period)
    }

    /// The term whose load counter a placement into this slot charges.
    ///
    /// Alternating-day slots charge Term::A / Term::B; everything else
    /// charges the slot's own term.
    pub fn load_term(&self) -> Term {
        match self.day {
            Day::A => Term::A,
            Day::B => Term::B,
            Day::All => self.term,
        }
    }
}

impl fmt::Display for Timeslot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.term, self.day, self.period)
    }
}

impl FromStr for Timeslot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '-');
        let term = match parts.next() {
            Some("FY") => Term::Fy,
            Some("S1") => Term::S1,
            Some("S2") => Term::S2,
            Some("T1") => Term::T1,
            Some("T2") => Term::T2,
            Some("T3") => Term::T3,
            Some("A") => Term::A,
            Some("B") => Term::B,
            other => return Err(format!("invalid term in timeslot '{s}': {other:?}")),
        };
        let day = match parts.next() {
            Some("ALL") => Day::All,
            Some("A") => Day::A,
            Some("B") => Day::B,
            other => return Err(format!("invalid day in timeslot '{s}': {other:?}")),
        };
        let period = match parts.next() {
            Some("WIN") => PeriodId::Win,
            Some(raw) => raw
                .parse::<u32>()
                .map(PeriodId::Nth)
                .map_err(|_| format!("invalid period in timeslot '{s}'"))?,
            None => return Err(format!("truncated timeslot '{s}'")),
        };
        Ok(Timeslot { term, day, period })
    }
}

// Timeslots serialize as their canonical string form.
impl Serialize for Timeslot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timeslot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_form() {
        let slot = Timeslot::full_year(PeriodId::Nth(4));
        assert_eq!(slot.to_string(), "FY-ALL-4");

        let ab = Timeslot::new(Term::Fy, Day::A, PeriodId::Nth(2));
        assert_eq!(ab.to_string(), "FY-A-2");

        let s2 = Timeslot::new(Term::S2, Day::All, PeriodId::Nth(1));
        assert_eq!(s2.to_string(), "S2-ALL-1");
    }

    #[test]
    fn test_round_trip_parse() {
        for raw in ["FY-ALL-7", "FY-B-3", "T2-ALL-1", "FY-ALL-WIN"] {
            let slot: Timeslot = raw.parse().unwrap();
            assert_eq!(slot.to_string(), raw);
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("FY-ALL".parse::<Timeslot>().is_err());
        assert!("Q9-ALL-1".parse::<Timeslot>().is_err());
        assert!("FY-C-1".parse::<Timeslot>().is_err());
        assert!("FY-ALL-x".parse::<Timeslot>().is_err());
    }

    #[test]
    fn test_load_term() {
        assert_eq!(
            Timeslot::new(Term::Fy, Day::A, PeriodId::Nth(1)).load_term(),
            Term::A
        );
        assert_eq!(
            Timeslot::new(Term::Fy, Day::B, PeriodId::Nth(1)).load_term(),
            Term::B
        );
        assert_eq!(
            Timeslot::new(Term::S2, Day::All, PeriodId::Nth(1)).load_term(),
            Term::S2
        );
        assert_eq!(Timeslot::full_year(PeriodId::Nth(1)).load_term(), Term::Fy);
    }

    #[test]
    fn test_serde_as_string() {
        let slot = Timeslot::new(Term::T3, Day::All, PeriodId::Nth(5));
        let json = serde_json::to_string(&slot).unwrap();
        assert_eq!(json, "\"T3-ALL-5\"");
        let back: Timeslot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, slot);
    }
}
