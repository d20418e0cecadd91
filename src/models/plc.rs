//! PLC (professional learning community) group model.

use serde::{Deserialize, Serialize};

use super::PeriodId;

/// A group of teachers sharing a common collaboration period.
///
/// Supplied by the caller, or auto-generated per department when the caller
/// enables PLC time without defining groups. Every member is reserved (tag
/// PLC) at the group's period before placement begins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlcGroup {
    /// Unique group identifier.
    pub id: String,
    /// Display name (e.g. "science PLC").
    pub name: String,
    /// The common period reserved for this group.
    pub period: PeriodId,
    /// Member teacher ids.
    #[serde(default)]
    pub teacher_ids: Vec<String>,
}

impl PlcGroup {
    /// Creates a group.
    pub fn new(id: impl Into<String>, name: impl Into<String>, period: PeriodId) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            period,
            teacher_ids: Vec::new(),
        }
    }

    /// Adds a member.
    pub fn with_member(mut self, teacher_id: impl Into<String>) -> Self {
        self.teacher_ids.push(teacher_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plc_group() {
        let g = PlcGroup::new("plc-math-0", "math PLC", PeriodId::Nth(2))
            .with_member("t1")
            .with_member("t2");
        assert_eq!(g.teacher_ids.len(), 2);
        assert_eq!(g.period, PeriodId::Nth(2));
    }
}
