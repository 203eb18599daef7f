//! Immutable course tree snapshot and its derived id index.
//!
//! Every mutating operation takes `&self` and hands back a new snapshot.
//! The index is rebuilt from the course list on each commit and is never
//! consulted as a source of truth for the nodes themselves.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::domain::entities::{Course, Module, NodeKind, Resource};
use crate::domain::ids::NodeId;

/// Position of a node inside the course sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodePath {
    Course {
        course: usize,
    },
    Module {
        course: usize,
        module: usize,
    },
    Resource {
        course: usize,
        module: usize,
        resource: usize,
    },
}

/// Borrowed view of a located node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    Course(&'a Course),
    Module(&'a Module),
    Resource(&'a Resource),
}

impl NodeRef<'_> {
    pub fn id(&self) -> NodeId {
        match self {
            NodeRef::Course(c) => c.id,
            NodeRef::Module(m) => m.id,
            NodeRef::Resource(r) => r.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            NodeRef::Course(c) => &c.title,
            NodeRef::Module(m) => &m.title,
            NodeRef::Resource(r) => &r.title,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Course(_) => NodeKind::Course,
            NodeRef::Module(_) => NodeKind::Module,
            NodeRef::Resource(_) => NodeKind::Resource,
        }
    }
}

/// Lookup table from `(kind, id)` to the node's path.
#[derive(Debug, Clone, Default)]
pub struct TreeIndex {
    paths: HashMap<(NodeKind, NodeId), NodePath>,
    owners: HashMap<NodeId, NodeKind>,
}

impl TreeIndex {
    /// Builds the index for the given course sequence.
    ///
    /// # Panics
    /// When the same id appears twice anywhere in the tree. Ids come from a
    /// single generator, so a duplicate is a defect in the caller.
    pub fn build(courses: &[Course]) -> Self {
        let mut index = Self::default();
        for (ci, course) in courses.iter().enumerate() {
            index.insert(NodeKind::Course, course.id, NodePath::Course { course: ci });
            for (mi, module) in course.modules.iter().enumerate() {
                index.insert(
                    NodeKind::Module,
                    module.id,
                    NodePath::Module {
                        course: ci,
                        module: mi,
                    },
                );
                for (ri, resource) in module.resources.iter().enumerate() {
                    index.insert(
                        NodeKind::Resource,
                        resource.id,
                        NodePath::Resource {
                            course: ci,
                            module: mi,
                            resource: ri,
                        },
                    );
                }
            }
        }
        index
    }

    fn insert(&mut self, kind: NodeKind, id: NodeId, path: NodePath) {
        if let Some(existing) = self.owners.insert(id, kind) {
            panic!("identifier collision: {id} used by both a {existing} and a {kind}");
        }
        self.paths.insert((kind, id), path);
    }

    pub fn get(&self, kind: NodeKind, id: NodeId) -> Option<NodePath> {
        self.paths.get(&(kind, id)).copied()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Why an operation left the tree untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    /// The drag ended outside any droppable container.
    DragCancelled,
    /// The rename prompt was dismissed.
    RenameCancelled,
    /// Nothing with that id and kind exists.
    AbsentNode,
    /// A drag named a course or module that does not resolve.
    UnresolvedContainer,
    /// The drag source index is past the end of its sequence.
    EmptySource,
}

impl fmt::Display for NoOpReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            NoOpReason::DragCancelled => "drag cancelled",
            NoOpReason::RenameCancelled => "rename cancelled",
            NoOpReason::AbsentNode => "no such node",
            NoOpReason::UnresolvedContainer => "drop container not found",
            NoOpReason::EmptySource => "nothing at drag source",
        };
        write!(f, "{text}")
    }
}

/// Result of an operation that may legitimately do nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Unchanged(NoOpReason),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// One consistent view of the whole course hierarchy.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CourseTree {
    revision: u64,
    courses: Vec<Course>,
    #[serde(skip)]
    index: TreeIndex,
}

impl PartialEq for CourseTree {
    fn eq(&self, other: &Self) -> bool {
        self.revision == other.revision && self.courses == other.courses
    }
}

impl Eq for CourseTree {}

impl CourseTree {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of applied mutations that led to this snapshot.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn index(&self) -> &TreeIndex {
        &self.index
    }

    pub fn locate(&self, kind: NodeKind, id: NodeId) -> Option<NodePath> {
        self.index.get(kind, id)
    }

    pub fn find(&self, kind: NodeKind, id: NodeId) -> Option<NodeRef<'_>> {
        let node = match self.locate(kind, id)? {
            NodePath::Course { course } => NodeRef::Course(&self.courses[course]),
            NodePath::Module { course, module } => {
                NodeRef::Module(&self.courses[course].modules[module])
            }
            NodePath::Resource {
                course,
                module,
                resource,
            } => NodeRef::Resource(&self.courses[course].modules[module].resources[resource]),
        };
        Some(node)
    }

    pub fn course(&self, id: NodeId) -> Option<&Course> {
        match self.locate(NodeKind::Course, id)? {
            NodePath::Course { course } => self.courses.get(course),
            _ => None,
        }
    }

    pub fn module(&self, id: NodeId) -> Option<&Module> {
        match self.find(NodeKind::Module, id)? {
            NodeRef::Module(module) => Some(module),
            _ => None,
        }
    }

    pub fn resource(&self, id: NodeId) -> Option<&Resource> {
        match self.find(NodeKind::Resource, id)? {
            NodeRef::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    /// Id of the course that currently owns the module.
    pub fn course_of_module(&self, module_id: NodeId) -> Option<NodeId> {
        match self.locate(NodeKind::Module, module_id)? {
            NodePath::Module { course, .. } => Some(self.courses[course].id),
            _ => None,
        }
    }

    /// Produces the successor snapshot for an applied mutation.
    pub(crate) fn commit(&self, courses: Vec<Course>) -> Self {
        let index = TreeIndex::build(&courses);
        Self {
            revision: self.revision.wrapping_add(1),
            courses,
            index,
        }
    }
}
