//! Scheduling domain models.
//!
//! Provides the core data types for representing a master-schedule run:
//! the bell timeline, the resources it allocates, the sections it places,
//! and the records it reports back.
//!
//! # Vocabulary
//!
//! | master-sched | School front office |
//! |--------------|---------------------|
//! | Period | One slot of the bell schedule |
//! | Timeslot | A period on a specific term/day (the unit of occupancy) |
//! | Section | One class meeting of a course |
//! | Term | FY, a semester, a trimester, or an A/B day |
//! | PLC group | Teachers sharing a common collaboration period |

mod conflict;
mod course;
mod period;
mod plc;
mod resource;
mod section;
mod timeslot;

pub use conflict::{Conflict, ConflictKind};
pub use course::Course;
pub use period::{Period, PeriodId, PeriodRole};
pub use plc::PlcGroup;
pub use resource::{Room, RoomType, Teacher};
pub use section::Section;
pub use timeslot::{Day, Term, Timeslot};
