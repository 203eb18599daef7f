//! Course builder service
//!
//! The operation API the presentation layer calls. Owns the current tree
//! snapshot and the state that surrounds it (id generator, drafts, view).

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    Course, CourseTree, DomainError, DraftBuffer, DraftPayload, DraftUpdate, DragEvent,
    IdGenerator, IdStrategy, Module, NewResource, NoOpReason, NodeId, NodeKind, Outcome,
    Removal, Resource, ResourceDraft, ResourceKind, ViewState,
};
use crate::infrastructure::traits::PayloadResolver;

/// Snapshot after an operation together with what the operation produced.
#[derive(Debug, Clone)]
pub struct Change<T> {
    pub tree: Arc<CourseTree>,
    pub value: T,
}

/// Service driving every mutation of the course tree.
///
/// Single writer: each call reads the current snapshot, builds the next one
/// and swaps it in before returning.
pub struct CourseBuilderService {
    tree: Arc<CourseTree>,
    ids: IdGenerator,
    drafts: DraftBuffer,
    view: ViewState,
    resolver: Arc<dyn PayloadResolver>,
}

impl CourseBuilderService {
    /// Create a service over an empty tree.
    pub fn new(resolver: Arc<dyn PayloadResolver>, strategy: IdStrategy) -> Self {
        Self {
            tree: Arc::new(CourseTree::empty()),
            ids: IdGenerator::new(strategy),
            drafts: DraftBuffer::new(),
            view: ViewState::new(),
            resolver,
        }
    }

    /// Current tree snapshot.
    pub fn snapshot(&self) -> Arc<CourseTree> {
        Arc::clone(&self.tree)
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn drafts(&self) -> &DraftBuffer {
        &self.drafts
    }

    fn replace(&mut self, tree: CourseTree) -> Arc<CourseTree> {
        self.tree = Arc::new(tree);
        self.snapshot()
    }

    fn change<T>(&self, value: T) -> Change<T> {
        Change {
            tree: self.snapshot(),
            value,
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn create_course(&mut self, title: &str, description: &str) -> Change<Course> {
        let (tree, course) = self.tree.create_course(&mut self.ids, title, description);
        info!("created course {} '{}'", course.id, course.title);
        let tree = self.replace(tree);
        Change {
            tree,
            value: course,
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn add_module(&mut self, course_id: NodeId, title: &str) -> ApplicationResult<Change<Module>> {
        let (tree, module) = self
            .tree
            .add_module(&mut self.ids, course_id, title)
            .inspect_err(|e| warn!("add_module: {}", e))?;
        info!("added module {} to course {}", module.id, course_id);
        let tree = self.replace(tree);
        Ok(Change {
            tree,
            value: module,
        })
    }

    /// Merge one field into the draft of an existing module.
    #[instrument(level = "debug", skip(self))]
    pub fn set_draft(
        &mut self,
        module_id: NodeId,
        update: DraftUpdate,
    ) -> ApplicationResult<ResourceDraft> {
        if self.tree.module(module_id).is_none() {
            return Err(DomainError::NotFound {
                kind: NodeKind::Module,
                id: module_id,
            }
            .into());
        }
        Ok(self.drafts.set(module_id, update).clone())
    }

    /// Commit the module's draft as a new resource, then reset the draft.
    ///
    /// File payloads of image and PDF drafts are resolved into references
    /// first. A failed commit keeps the draft and releases any reference
    /// created for it.
    #[instrument(level = "debug", skip(self))]
    pub fn add_resource(
        &mut self,
        course_id: NodeId,
        module_id: NodeId,
    ) -> ApplicationResult<Change<Resource>> {
        self.tree
            .module_position(course_id, module_id)
            .inspect_err(|e| warn!("add_resource: {}", e))?;

        let draft = self.drafts.peek(module_id);
        let (payload, resolved) = self.resolve_payload(&draft)?;
        let new = NewResource::new(draft.title, draft.kind, payload.clone());

        match self
            .tree
            .add_resource(&mut self.ids, course_id, module_id, new)
        {
            Ok((tree, resource)) => {
                self.drafts.consume_and_clear(module_id);
                info!(
                    "added {} resource {} to module {}",
                    resource.kind, resource.id, module_id
                );
                let tree = self.replace(tree);
                Ok(Change {
                    tree,
                    value: resource,
                })
            }
            Err(e) => {
                if resolved {
                    self.resolver.release(&payload);
                }
                Err(e.into())
            }
        }
    }

    /// Returns the payload to store and whether it was freshly resolved.
    fn resolve_payload(&self, draft: &ResourceDraft) -> ApplicationResult<(String, bool)> {
        match (&draft.kind, &draft.payload) {
            (ResourceKind::Link, DraftPayload::File(path)) => Err(ApplicationError::InvalidDraft(
                format!("link resources take a URL, not a file: {}", path.display()),
            )),
            (_, DraftPayload::Text(text)) => Ok((text.clone(), false)),
            (_, DraftPayload::File(path)) => {
                let reference = self
                    .resolver
                    .resolve(path)
                    .with_path_context("resolve payload", path)?;
                debug!("resolved {} -> {}", path.display(), reference);
                Ok((reference, true))
            }
        }
    }

    /// Rename a node. `None` means the prompt was cancelled.
    #[instrument(level = "debug", skip(self))]
    pub fn rename(
        &mut self,
        kind: NodeKind,
        id: NodeId,
        new_title: Option<&str>,
    ) -> ApplicationResult<Change<Outcome>> {
        let (tree, outcome) = self
            .tree
            .rename(kind, id, new_title)
            .inspect_err(|e| warn!("rename: {}", e))?;
        if outcome.is_applied() {
            self.replace(tree);
        }
        Ok(self.change(outcome))
    }

    /// Delete a node and everything below it.
    ///
    /// Releases payload references of removed image/PDF resources and
    /// drops drafts of removed modules.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, kind: NodeKind, id: NodeId) -> Change<Removal> {
        let (tree, removal) = self.tree.delete(kind, id);
        if removal.is_empty() {
            debug!("delete: nothing to remove for {} {}", kind, id);
            return self.change(removal);
        }

        for resource in removal.resources.iter().filter(|r| r.kind.is_file_backed()) {
            if !self.resolver.release(&resource.payload) {
                debug!("payload of {} was not a live reference", resource.id);
            }
        }
        self.drafts.discard(&removal.modules);
        info!(
            "deleted {} {} ({} modules, {} resources)",
            kind,
            id,
            removal.modules.len(),
            removal.resources.len()
        );
        self.replace(tree);
        self.change(removal)
    }

    /// Apply a drag-end event.
    #[instrument(level = "debug", skip(self))]
    pub fn resolve_drag(&mut self, event: &DragEvent) -> ApplicationResult<Change<Outcome>> {
        let (tree, outcome) = self
            .tree
            .resolve_drag(event)
            .inspect_err(|e| warn!("resolve_drag: {}", e))?;
        match outcome {
            Outcome::Applied => {
                self.replace(tree);
            }
            Outcome::Unchanged(NoOpReason::DragCancelled) => {}
            Outcome::Unchanged(reason) => debug!("resolve_drag: {}", reason),
        }
        Ok(self.change(outcome))
    }

    pub fn toggle_course(&mut self, id: NodeId) -> Change<Option<NodeId>> {
        let open = self.view.toggle_course(id);
        self.change(open)
    }

    pub fn toggle_module(&mut self, id: NodeId) -> Change<Option<NodeId>> {
        let open = self.view.toggle_module(id);
        self.change(open)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::Path;

    struct RefusingResolver;

    impl PayloadResolver for RefusingResolver {
        fn resolve(&self, file: &Path) -> io::Result<String> {
            Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("refused {}", file.display()),
            ))
        }

        fn release(&self, _reference: &str) -> bool {
            false
        }
    }

    fn service() -> CourseBuilderService {
        CourseBuilderService::new(Arc::new(RefusingResolver), IdStrategy::Counter)
    }

    #[test]
    fn given_failing_resolver_when_adding_image_then_draft_is_kept() {
        let mut svc = service();
        let course = svc.create_course("C", "").value;
        let module = svc.add_module(course.id, "M").unwrap().value;
        svc.set_draft(module.id, DraftUpdate::Kind(ResourceKind::Image))
            .unwrap();
        svc.set_draft(module.id, DraftUpdate::File("/tmp/x.png".into()))
            .unwrap();

        let err = svc.add_resource(course.id, module.id).unwrap_err();

        assert!(matches!(err, ApplicationError::OperationFailed { .. }));
        assert_eq!(svc.drafts().peek(module.id).kind, ResourceKind::Image);
        assert!(svc.snapshot().courses()[0].modules[0].resources.is_empty());
    }

    #[test]
    fn given_link_draft_with_file_when_adding_then_invalid_draft() {
        let mut svc = service();
        let course = svc.create_course("C", "").value;
        let module = svc.add_module(course.id, "M").unwrap().value;
        svc.set_draft(module.id, DraftUpdate::File("/tmp/x.pdf".into()))
            .unwrap();

        let err = svc.add_resource(course.id, module.id).unwrap_err();

        assert!(matches!(err, ApplicationError::InvalidDraft(_)));
    }

    #[test]
    fn given_unknown_module_when_setting_draft_then_not_found() {
        let mut svc = service();
        let err = svc
            .set_draft(NodeId::new(9), DraftUpdate::Title("x".into()))
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(svc.drafts().is_empty());
    }

    #[test]
    fn given_cancelled_rename_when_applied_then_snapshot_is_the_same_arc() {
        let mut svc = service();
        let course = svc.create_course("C", "").value;
        let before = svc.snapshot();

        let change = svc.rename(NodeKind::Course, course.id, None).unwrap();

        assert_eq!(
            change.value,
            Outcome::Unchanged(NoOpReason::RenameCancelled)
        );
        assert!(Arc::ptr_eq(&before, &change.tree));
    }
}
