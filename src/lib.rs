//! Master schedule engine for K-12 schools.
//!
//! Allocates course sections to bell periods, teachers, and rooms under a
//! mix of hard and soft constraints, across four calendar topologies
//! (traditional daily cycle, alternating A/B days, 4x4 semester block,
//! trimester). One synchronous call takes a configuration record and
//! returns a complete schedule record; expected failures travel as
//! conflict data, not errors.
//!
//! # Modules
//!
//! - **`config`**: every recognized configuration field, defaulted in one place
//! - **`models`**: domain types — `Period`, `Timeslot`, `Course`, `Section`,
//!   `Teacher`, `Room`, `Conflict`, `PlcGroup`
//! - **`timeline`**: bell timeline construction and lunch/WIN classification
//! - **`tracker`**: the per-run occupancy ledger
//! - **`sections`**: section derivation and preliminary assignments
//! - **`reservations`**: lunch/PLC/availability holds applied before placement
//! - **`strategy`**: the four greedy placement strategies
//! - **`postprocess`**: lunch waves, coverage analytics, plan-time checks
//! - **`codec`**: canonical → display timeslot translation
//! - **`engine`**: the orchestrating entry point
//!
//! # Example
//!
//! ```
//! use master_sched::config::ScheduleConfig;
//! use master_sched::generate_schedule;
//! use master_sched::models::{Course, Room, Teacher};
//!
//! let config = ScheduleConfig {
//!     teachers: vec![Teacher::new("t1", "Rivera").with_department("math")],
//!     rooms: vec![Room::new("r1", "101")],
//!     courses: vec![Course::required("MATH1", "Algebra I", "math").with_sections(2)],
//!     student_count: 60,
//!     seed: Some(42),
//!     ..ScheduleConfig::default()
//! };
//!
//! let result = generate_schedule(&config);
//! assert_eq!(result.stats.total_sections, 2);
//! ```

pub mod codec;
pub mod config;
pub mod engine;
pub mod logging;
pub mod models;
pub mod postprocess;
pub mod reservations;
pub mod sections;
pub mod strategy;
pub mod timeline;
pub mod tracker;

pub use config::ScheduleConfig;
pub use engine::{generate_schedule, ScheduleResult, ScheduleStats};
