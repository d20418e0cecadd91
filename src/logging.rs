//! Structured run log and placement audit trail.
//!
//! Every run narrates itself twice: through the `log` facade for whatever
//! the host wires up, and into an in-record log that ships with the result
//! so the calling environment can show *why* a section landed where it did.
//! Entries carry no wall-clock timestamps; identical runs produce identical
//! records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Section, Timeslot};

/// Log severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// One structured log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Optional structured payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// How one candidate slot scored for one section.
///
/// `cost: None` means the slot was hard-rejected (teacher or co-teacher
/// unavailable); otherwise the accumulated soft cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotEvaluation {
    /// Canonical slot id.
    pub slot: String,
    /// Soft cost, or `None` when infeasible.
    pub cost: Option<u32>,
    /// Hard-reject or soft-penalty reasons.
    pub reasons: Vec<String>,
}

/// Outcome of a placement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlacementStatus {
    Success,
    Failed,
}

/// The full audit record of one section's placement attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRecord {
    pub section_id: String,
    /// Course display name.
    pub course: String,
    /// Winning canonical slot, absent on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_slot: Option<String>,
    /// Winning cost, absent on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<u32>,
    /// Every candidate evaluation, in scan order.
    pub evaluations: Vec<SlotEvaluation>,
    pub status: PlacementStatus,
}

/// Collects log entries and placement records for one run.
#[derive(Debug, Default)]
pub struct RunLog {
    pub entries: Vec<LogEntry>,
    pub placements: Vec<PlacementRecord>,
}

impl RunLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an INFO entry.
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Info, message.into(), None);
    }

    /// Records an INFO entry with a structured payload.
    pub fn info_with(&mut self, message: impl Into<String>, data: Value) {
        self.push(LogLevel::Info, message.into(), Some(data));
    }

    /// Records a WARN entry.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Warn, message.into(), None);
    }

    /// Records an ERROR entry.
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Error, message.into(), None);
    }

    fn push(&mut self, level: LogLevel, message: String, data: Option<Value>) {
        match level {
            LogLevel::Info => log::info!("{message}"),
            LogLevel::Warn => log::warn!("{message}"),
            LogLevel::Error => log::error!("{message}"),
        }
        self.entries.push(LogEntry {
            level,
            message,
            data,
        });
    }

    /// Records a successful placement.
    pub fn log_placement(
        &mut self,
        section: &Section,
        slot: &Timeslot,
        cost: u32,
        evaluations: Vec<SlotEvaluation>,
    ) {
        self.placements.push(PlacementRecord {
            section_id: section.id.clone(),
            course: section.course_name.clone(),
            assigned_slot: Some(slot.to_string()),
            cost: Some(cost),
            evaluations,
            status: PlacementStatus::Success,
        });
    }

    /// Records a failed placement attempt.
    pub fn log_failure(&mut self, section: &Section, evaluations: Vec<SlotEvaluation>) {
        self.placements.push(PlacementRecord {
            section_id: section.id.clone(),
            course: section.course_name.clone(),
            assigned_slot: None,
            cost: None,
            evaluations,
            status: PlacementStatus::Failed,
        });
        self.error(format!(
            "Gridlock: failed to place {} S{}",
            section.course_name, section.section_num
        ));
    }
}
