//! Bell-schedule period model.
//!
//! A period is one slot of the daily bell schedule. Periods are built once
//! per run by the timeline builder and are immutable afterwards; every other
//! stage addresses them by id.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a bell period.
///
/// Ordinary periods are numbered from 1; a standalone WIN ("What I Need")
/// block spliced into the day carries the literal id `WIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PeriodId {
    /// Numbered teaching period.
    Nth(u32),
    /// Standalone WIN block.
    Win,
}

impl PeriodId {
    /// Whether this is the WIN block id.
    #[inline]
    pub fn is_win(&self) -> bool {
        matches!(self, PeriodId::Win)
    }
}

impl fmt::Display for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodId::Nth(n) => write!(f, "{n}"),
            PeriodId::Win => write!(f, "WIN"),
        }
    }
}

// Period ids cross the boundary as plain numbers, except the WIN block
// which the calling environment knows as the string "WIN".
impl Serialize for PeriodId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PeriodId::Nth(n) => serializer.serialize_u32(*n),
            PeriodId::Win => serializer.serialize_str("WIN"),
        }
    }
}

impl<'de> Deserialize<'de> for PeriodId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = PeriodId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a period number or the string \"WIN\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<PeriodId, E> {
                Ok(PeriodId::Nth(v as u32))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<PeriodId, E> {
                if v < 0 {
                    return Err(E::custom("period id must be non-negative"));
                }
                Ok(PeriodId::Nth(v as u32))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<PeriodId, E> {
                if v == "WIN" {
                    return Ok(PeriodId::Win);
                }
                v.parse::<u32>()
                    .map(PeriodId::Nth)
                    .map_err(|_| E::custom(format!("invalid period id '{v}'")))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// Role a period plays in the school day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodRole {
    /// Ordinary teaching period.
    Class,
    /// The whole student body eats at once; nothing is taught.
    UnitLunch,
    /// Classes run while lunch waves rotate through the cafeteria.
    SplitLunch,
    /// One of several periods sharing lunch duty.
    MultiLunch,
    /// WIN / flex block; excluded from placement.
    Win,
}

/// One slot of the bell schedule.
///
/// Start/end offsets are minutes from midnight; the display strings are the
/// 12-hour renderings the calling environment shows on the grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    /// Period identifier.
    pub id: PeriodId,
    /// Display label (e.g. "Period 3", "WIN").
    pub label: String,
    /// Role classification.
    #[serde(rename = "type")]
    pub role: PeriodRole,
    /// Start offset, minutes from midnight.
    pub start_min: u32,
    /// End offset, minutes from midnight.
    pub end_min: u32,
    /// Length in minutes.
    pub duration: u32,
    /// 12-hour display of the start (e.g. "8:00 AM").
    pub start_time: String,
    /// 12-hour display of the end.
    pub end_time: String,
}

impl Period {
    /// Whether sections may be placed into this period.
    #[inline]
    pub fn is_teachable(&self) -> bool {
        self.role != PeriodRole::Win
    }
}
