//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (PayloadResolver, Prompter)
//! but are themselves concrete structs, not traits.

mod course_builder;

pub use course_builder::{Change, CourseBuilderService};
