//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod draft;
pub mod droppable;
pub mod entities;
pub mod error;
pub mod ids;
pub mod reorder;
pub mod store;
pub mod tree;
pub mod view;

pub use draft::{DraftBuffer, DraftPayload, DraftUpdate, ResourceDraft};
pub use droppable::Container;
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use ids::{IdGenerator, IdStrategy, NodeId};
pub use reorder::{splice_move, DragEvent, DropLocation};
pub use store::Removal;
pub use tree::{CourseTree, NoOpReason, NodePath, NodeRef, Outcome, TreeIndex};
pub use view::ViewState;
