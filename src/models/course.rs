//! Course model.
//!
//! A course is the catalog entry sections are derived from. Required courses
//! must reach the whole student body; electives share a proportional slice
//! of elective demand.

use serde::{Deserialize, Serialize};

use super::RoomType;

/// A catalog course.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Unique course identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Owning department (drives teacher matching and PLC grouping).
    pub department: String,
    /// Whether every student takes this course.
    #[serde(default)]
    pub required: bool,
    /// Room type the course must meet in.
    #[serde(default)]
    pub room_type: RoomType,
    /// Declared section count; derived from demand when absent.
    #[serde(default)]
    pub sections: Option<u32>,
    /// Per-section seat cap; the global cap applies when absent.
    #[serde(default)]
    pub max_size: Option<u32>,
}

impl Course {
    /// Creates a required course.
    pub fn required(id: impl Into<String>, name: impl Into<String>, department: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            department: department.into(),
            required: true,
            room_type: RoomType::Regular,
            sections: None,
            max_size: None,
        }
    }

    /// Creates an elective course.
    pub fn elective(id: impl Into<String>, name: impl Into<String>, department: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(id, name, department)
        }
    }

    /// Sets a declared section count.
    pub fn with_sections(mut self, sections: u32) -> Self {
        self.sections = Some(sections);
        self
    }

    /// Sets the per-section seat cap.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = Some(max_size);
        self
    }

    /// Sets the required room type.
    pub fn with_room_type(mut self, room_type: RoomType) -> Self {
        self.room_type = room_type;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_builder() {
        let c = Course::required("MATH1", "Algebra I", "math")
            .with_sections(4)
            .with_max_size(28);
        assert!(c.required);
        assert_eq!(c.sections, Some(4));
        assert_eq!(c.max_size, Some(28));
        assert_eq!(c.room_type, RoomType::Regular);

        let e = Course::elective("ART1", "Studio Art", "art").with_room_type(RoomType::Lab);
        assert!(!e.required);
        assert_eq!(e.room_type, RoomType::Lab);
    }

    #[test]
    fn test_course_deserialize_defaults() {
        let c: Course = serde_json::from_str(
            r#"{"id":"SCI1","name":"Biology","department":"science","required":true}"#,
        )
        .unwrap();
        assert_eq!(c.sections, None);
        assert_eq!(c.max_size, None);
        assert_eq!(c.room_type, RoomType::Regular);
    }
}
