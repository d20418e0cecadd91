//! Conflict records.
//!
//! Expected scheduling failures are reported as data, never as errors: a
//! section that cannot be placed, a lunch period too short for its waves,
//! a teacher short on plan time. Conflicts accumulate across the run and
//! ship with the result record.

use serde::{Deserialize, Serialize};

/// Classification of scheduling conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// No feasible slot existed for a section.
    Unscheduled,
    /// Students unaccounted for, or a lunch period too short to cover them.
    Coverage,
    /// A teacher is short on required non-teaching time.
    PlanViolation,
}

/// A scheduling conflict.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    /// Conflict classification.
    #[serde(rename = "type")]
    pub kind: ConflictKind,
    /// Human-readable description.
    pub message: String,
    /// The affected section, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
}

impl Conflict {
    /// A section with no feasible slot.
    pub fn unscheduled(message: impl Into<String>, section_id: impl Into<String>) -> Self {
        Self {
            kind: ConflictKind::Unscheduled,
            message: message.into(),
            section_id: Some(section_id.into()),
        }
    }

    /// A coverage shortfall (lunch capacity or unaccounted students).
    pub fn coverage(message: impl Into<String>) -> Self {
        Self {
            kind: ConflictKind::Coverage,
            message: message.into(),
            section_id: None,
        }
    }

    /// A teacher short on plan/PLC time.
    pub fn plan_violation(message: impl Into<String>) -> Self {
        Self {
            kind: ConflictKind::PlanViolation,
            message: message.into(),
            section_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_factories() {
        let c = Conflict::unscheduled("Algebra I S2: no valid period", "MATH1-S2");
        assert_eq!(c.kind, ConflictKind::Unscheduled);
        assert_eq!(c.section_id.as_deref(), Some("MATH1-S2"));

        let c = Conflict::coverage("Period 3: 120 students unaccounted for");
        assert_eq!(c.kind, ConflictKind::Coverage);
        assert!(c.section_id.is_none());

        let c = Conflict::plan_violation("Rivera has 0 free periods");
        assert_eq!(c.kind, ConflictKind::PlanViolation);
    }

    #[test]
    fn test_kind_tag() {
        let json = serde_json::to_string(&ConflictKind::PlanViolation).unwrap();
        assert_eq!(json, "\"plan_violation\"");
    }
}
