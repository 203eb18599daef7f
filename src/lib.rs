//! coursetree: course builder tree with drag-and-drop reordering
//!
//! Layers:
//! - `domain`: the immutable course tree, its mutations and the reorder engine
//! - `application`: the service driving mutations plus drafts and view state
//! - `infrastructure`: payload resolution, prompting and wiring
//! - `cli`: argument parsing, the shell and rendering

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
