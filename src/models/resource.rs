//! Teacher and room models.
//!
//! Teachers and rooms are the two resources the placement ledger tracks.
//! A teacher may "float" (no home room of their own, teaching in rooms
//! vacated by their owners' plan or PLC time).

use serde::{Deserialize, Serialize};

/// A teacher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    /// Unique teacher identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Departments this teacher can cover; the first is their primary.
    #[serde(default)]
    pub departments: Vec<String>,
    /// Floaters are never seeded as room owners.
    #[serde(default)]
    pub is_floater: bool,
}

impl Teacher {
    /// Creates a teacher.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            departments: Vec::new(),
            is_floater: false,
        }
    }

    /// Adds a department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.departments.push(department.into());
        self
    }

    /// Marks the teacher as a floater.
    pub fn floater(mut self) -> Self {
        self.is_floater = true;
        self
    }

    /// Primary department ("General" when none is listed).
    pub fn primary_department(&self) -> &str {
        self.departments.first().map(String::as_str).unwrap_or("General")
    }

    /// Whether this teacher covers the given department.
    pub fn covers(&self, department: &str) -> bool {
        self.departments.iter().any(|d| d == department)
    }
}

/// Room classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    #[default]
    Regular,
    Lab,
    Gym,
}

/// A room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Room classification.
    #[serde(rename = "type", default)]
    pub room_type: RoomType,
}

impl Room {
    /// Creates a regular room.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            room_type: RoomType::Regular,
        }
    }

    /// Creates a room of the given type.
    pub fn of_type(id: impl Into<String>, name: impl Into<String>, room_type: RoomType) -> Self {
        Self {
            room_type,
            ..Self::new(id, name)
        }
    }
}
