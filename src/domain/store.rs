//! Tree store operations: create, rename and delete nodes.
//!
//! Each operation is atomic: it either returns a fully updated successor
//! snapshot or leaves the receiver as the current state.

use tracing::{debug, instrument};

use crate::domain::entities::{Course, Module, NewResource, NodeKind, Resource};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::ids::{IdGenerator, NodeId};
use crate::domain::tree::{CourseTree, NoOpReason, NodePath, Outcome};

/// Nodes removed by a delete, cascades included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Removal {
    pub courses: Vec<NodeId>,
    pub modules: Vec<NodeId>,
    pub resources: Vec<Resource>,
}

impl Removal {
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty() && self.modules.is_empty() && self.resources.is_empty()
    }

    fn record_module(&mut self, module: Module) {
        self.modules.push(module.id);
        self.resources.extend(module.resources);
    }

    fn record_course(&mut self, course: Course) {
        self.courses.push(course.id);
        for module in course.modules {
            self.record_module(module);
        }
    }
}

impl CourseTree {
    /// Appends a new, empty course.
    #[instrument(level = "debug", skip(self, ids))]
    pub fn create_course(
        &self,
        ids: &mut IdGenerator,
        title: &str,
        description: &str,
    ) -> (Self, Course) {
        let course = Course {
            id: ids.next_id(),
            title: title.to_string(),
            description: description.to_string(),
            modules: Vec::new(),
        };
        let mut courses = self.courses().to_vec();
        courses.push(course.clone());
        debug!("create_course: id={}", course.id);
        (self.commit(courses), course)
    }

    /// Appends a new, empty module to the end of a course.
    #[instrument(level = "debug", skip(self, ids))]
    pub fn add_module(
        &self,
        ids: &mut IdGenerator,
        course_id: NodeId,
        title: &str,
    ) -> DomainResult<(Self, Module)> {
        let ci = self.course_position(course_id)?;
        let module = Module {
            id: ids.next_id(),
            title: title.to_string(),
            resources: Vec::new(),
        };
        let mut courses = self.courses().to_vec();
        courses[ci].modules.push(module.clone());
        debug!("add_module: course={} id={}", course_id, module.id);
        Ok((self.commit(courses), module))
    }

    /// Appends a resource to a module of the given course.
    ///
    /// The payload is stored as given; resolving files into references is
    /// the caller's job.
    #[instrument(level = "debug", skip(self, ids, new))]
    pub fn add_resource(
        &self,
        ids: &mut IdGenerator,
        course_id: NodeId,
        module_id: NodeId,
        new: NewResource,
    ) -> DomainResult<(Self, Resource)> {
        let (ci, mi) = self.module_position(course_id, module_id)?;
        let resource = Resource {
            id: ids.next_id(),
            title: new.title,
            kind: new.kind,
            payload: new.payload,
        };
        let mut courses = self.courses().to_vec();
        courses[ci].modules[mi].resources.push(resource.clone());
        debug!(
            "add_resource: course={} module={} id={} kind={}",
            course_id, module_id, resource.id, resource.kind
        );
        Ok((self.commit(courses), resource))
    }

    /// Sets the title of a node, leaving id, kind, position and parent as is.
    ///
    /// `None` is a cancelled prompt and never clears the title.
    #[instrument(level = "debug", skip(self))]
    pub fn rename(
        &self,
        kind: NodeKind,
        id: NodeId,
        new_title: Option<&str>,
    ) -> DomainResult<(Self, Outcome)> {
        let Some(new_title) = new_title else {
            return Ok((self.clone(), Outcome::Unchanged(NoOpReason::RenameCancelled)));
        };
        let path = self
            .locate(kind, id)
            .ok_or(DomainError::NotFound { kind, id })?;

        let mut courses = self.courses().to_vec();
        let title = match path {
            NodePath::Course { course } => &mut courses[course].title,
            NodePath::Module { course, module } => &mut courses[course].modules[module].title,
            NodePath::Resource {
                course,
                module,
                resource,
            } => &mut courses[course].modules[module].resources[resource].title,
        };
        *title = new_title.to_string();
        debug!("rename: {} {} -> {:?}", kind, id, new_title);
        Ok((self.commit(courses), Outcome::Applied))
    }

    /// Removes the node of the given kind with this id, wherever it lives.
    ///
    /// Courses take their modules and resources with them, modules take
    /// their resources. Only nodes of `kind` are matched. An absent id
    /// returns an unchanged snapshot and an empty removal.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&self, kind: NodeKind, id: NodeId) -> (Self, Removal) {
        let mut removal = Removal::default();
        let Some(path) = self.locate(kind, id) else {
            debug!("delete: {} {} absent", kind, id);
            return (self.clone(), removal);
        };

        let mut courses = self.courses().to_vec();
        match path {
            NodePath::Course { course } => {
                removal.record_course(courses.remove(course));
            }
            NodePath::Module { course, module } => {
                removal.record_module(courses[course].modules.remove(module));
            }
            NodePath::Resource {
                course,
                module,
                resource,
            } => {
                removal
                    .resources
                    .push(courses[course].modules[module].resources.remove(resource));
            }
        }
        debug!(
            "delete: {} {} removed {} modules, {} resources",
            kind,
            id,
            removal.modules.len(),
            removal.resources.len()
        );
        (self.commit(courses), removal)
    }

    pub(crate) fn course_position(&self, course_id: NodeId) -> DomainResult<usize> {
        match self.locate(NodeKind::Course, course_id) {
            Some(NodePath::Course { course }) => Ok(course),
            _ => Err(DomainError::NotFound {
                kind: NodeKind::Course,
                id: course_id,
            }),
        }
    }

    pub(crate) fn module_position(
        &self,
        course_id: NodeId,
        module_id: NodeId,
    ) -> DomainResult<(usize, usize)> {
        let ci = self.course_position(course_id)?;
        match self.locate(NodeKind::Module, module_id) {
            Some(NodePath::Module { course, module }) if course == ci => Ok((ci, module)),
            Some(_) => Err(DomainError::ModuleNotInCourse {
                course: course_id,
                module: module_id,
            }),
            None => Err(DomainError::NotFound {
                kind: NodeKind::Module,
                id: module_id,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ResourceKind;

    fn link(title: &str) -> NewResource {
        NewResource::new(title, ResourceKind::Link, format!("https://example.com/{title}"))
    }

    #[test]
    fn given_courses_when_creating_then_appended_in_call_order_with_distinct_ids() {
        let mut ids = IdGenerator::default();
        let (tree, a) = CourseTree::empty().create_course(&mut ids, "A", "first");
        let (tree, b) = tree.create_course(&mut ids, "B", "second");
        let (tree, c) = tree.create_course(&mut ids, "C", "third");

        let order: Vec<NodeId> = tree.courses().iter().map(|c| c.id).collect();
        assert_eq!(order, vec![a.id, b.id, c.id]);
        assert!(a.id != b.id && b.id != c.id && a.id != c.id);
        assert!(tree.courses().iter().all(|c| c.modules.is_empty()));
        assert_eq!(tree.revision(), 3);
    }

    #[test]
    fn given_missing_course_when_adding_module_then_not_found_and_tree_kept() {
        let mut ids = IdGenerator::default();
        let (tree, _) = CourseTree::empty().create_course(&mut ids, "A", "");

        let err = tree.add_module(&mut ids, NodeId::new(999), "M").unwrap_err();

        assert_eq!(
            err,
            DomainError::NotFound {
                kind: NodeKind::Course,
                id: NodeId::new(999)
            }
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn given_module_of_other_course_when_adding_resource_then_rejected() {
        let mut ids = IdGenerator::default();
        let (tree, a) = CourseTree::empty().create_course(&mut ids, "A", "");
        let (tree, b) = tree.create_course(&mut ids, "B", "");
        let (tree, m) = tree.add_module(&mut ids, a.id, "M").unwrap();

        let err = tree
            .add_resource(&mut ids, b.id, m.id, link("r"))
            .unwrap_err();

        assert_eq!(
            err,
            DomainError::ModuleNotInCourse {
                course: b.id,
                module: m.id
            }
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn given_previous_snapshot_when_mutating_then_previous_is_untouched() {
        let mut ids = IdGenerator::default();
        let (before, c) = CourseTree::empty().create_course(&mut ids, "A", "");
        let (after, _) = before.add_module(&mut ids, c.id, "M").unwrap();

        assert!(before.courses()[0].modules.is_empty());
        assert_eq!(after.courses()[0].modules.len(), 1);
    }

    #[test]
    fn given_resource_when_renaming_then_only_title_changes() {
        let mut ids = IdGenerator::default();
        let (tree, c) = CourseTree::empty().create_course(&mut ids, "A", "");
        let (tree, m) = tree.add_module(&mut ids, c.id, "M").unwrap();
        let (tree, r1) = tree.add_resource(&mut ids, c.id, m.id, link("r1")).unwrap();
        let (tree, r2) = tree.add_resource(&mut ids, c.id, m.id, link("r2")).unwrap();

        let (renamed, outcome) = tree
            .rename(NodeKind::Resource, r1.id, Some("intro"))
            .unwrap();

        assert_eq!(outcome, Outcome::Applied);
        let resources = &renamed.courses()[0].modules[0].resources;
        assert_eq!(resources[0].id, r1.id);
        assert_eq!(resources[0].title, "intro");
        assert_eq!(resources[0].kind, r1.kind);
        assert_eq!(resources[0].payload, r1.payload);
        assert_eq!(resources[1], r2);
    }

    #[test]
    fn given_id_of_wrong_kind_when_renaming_then_not_found() {
        let mut ids = IdGenerator::default();
        let (tree, c) = CourseTree::empty().create_course(&mut ids, "A", "");

        let err = tree.rename(NodeKind::Module, c.id, Some("x")).unwrap_err();

        assert_eq!(
            err,
            DomainError::NotFound {
                kind: NodeKind::Module,
                id: c.id
            }
        );
    }

    #[test]
    fn given_absent_id_when_deleting_then_unchanged() {
        let mut ids = IdGenerator::default();
        let (tree, _) = CourseTree::empty().create_course(&mut ids, "A", "");

        let (after, removal) = tree.delete(NodeKind::Resource, NodeId::new(77));

        assert!(removal.is_empty());
        assert_eq!(after, tree);
    }

    #[test]
    fn given_module_with_resources_when_deleting_module_then_resources_go_too() {
        let mut ids = IdGenerator::default();
        let (tree, c) = CourseTree::empty().create_course(&mut ids, "A", "");
        let (tree, m) = tree.add_module(&mut ids, c.id, "M").unwrap();
        let (tree, r) = tree.add_resource(&mut ids, c.id, m.id, link("r")).unwrap();

        let (after, removal) = tree.delete(NodeKind::Module, m.id);

        assert_eq!(removal.modules, vec![m.id]);
        assert_eq!(removal.resources, vec![r.clone()]);
        assert!(after.resource(r.id).is_none());
        assert!(after.course(c.id).unwrap().modules.is_empty());
    }
}
