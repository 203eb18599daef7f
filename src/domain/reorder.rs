//! Drag-end resolution: turns a drop gesture into a list splice.

use tracing::{debug, instrument};

use crate::domain::droppable::Container;
use crate::domain::entities::{Course, Module, NodeKind, Resource};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::ids::NodeId;
use crate::domain::tree::{CourseTree, NoOpReason, NodePath, Outcome};

/// A container plus a zero-based position inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropLocation {
    pub container: Container,
    pub index: usize,
}

impl DropLocation {
    pub fn new(container: Container, index: usize) -> Self {
        Self { container, index }
    }

    /// Builds a location from a droppable id such as `module-3-7`.
    pub fn parse(droppable_id: &str, index: usize) -> DomainResult<Self> {
        Ok(Self::new(droppable_id.parse()?, index))
    }
}

/// What the view reports when a drag ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragEvent {
    pub kind: NodeKind,
    pub source: DropLocation,
    /// `None` when the item was dropped outside every container.
    pub destination: Option<DropLocation>,
}

impl DragEvent {
    pub fn new(kind: NodeKind, source: DropLocation, destination: Option<DropLocation>) -> Self {
        Self {
            kind,
            source,
            destination,
        }
    }
}

/// Moves the item at `from` to position `to`.
///
/// With `destination` set the item lands in that list, otherwise it is
/// reinserted into `source`. `to` is clamped to the length of the target
/// list after removal. Returns `false` when there is nothing at `from`.
pub fn splice_move<T>(
    source: &mut Vec<T>,
    from: usize,
    destination: Option<&mut Vec<T>>,
    to: usize,
) -> bool {
    if from >= source.len() {
        return false;
    }
    let item = source.remove(from);
    let target = match destination {
        Some(list) => list,
        None => source,
    };
    let to = to.min(target.len());
    target.insert(to, item);
    true
}

fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

/// Runs [`splice_move`] between the child sequences of two parents.
fn move_between<P, T>(
    parents: &mut [P],
    src: usize,
    dst: usize,
    from: usize,
    to: usize,
    sequence: fn(&mut P) -> &mut Vec<T>,
) -> bool {
    if src == dst {
        splice_move(sequence(&mut parents[src]), from, None, to)
    } else {
        let (source, destination) = pair_mut(parents, src, dst);
        splice_move(sequence(source), from, Some(sequence(destination)), to)
    }
}

fn modules_of(course: &mut Course) -> &mut Vec<Module> {
    &mut course.modules
}

fn resources_of(module: &mut Module) -> &mut Vec<Resource> {
    &mut module.resources
}

impl CourseTree {
    /// Applies a drag-end event.
    ///
    /// Module drags may cross courses. Resource drags may cross modules of
    /// the same course only. Unknown containers, an empty source slot and a
    /// missing destination leave the snapshot unchanged.
    #[instrument(level = "debug", skip(self))]
    pub fn resolve_drag(&self, event: &DragEvent) -> DomainResult<(Self, Outcome)> {
        let Some(destination) = event.destination else {
            return Ok(self.unchanged(NoOpReason::DragCancelled));
        };
        for location in [&event.source, &destination] {
            if location.container.holds() != event.kind {
                return Err(DomainError::ContainerMismatch {
                    kind: event.kind,
                    container: location.container.to_string(),
                });
            }
        }

        match (event.source.container, destination.container) {
            (Container::Course(from_course), Container::Course(to_course)) => Ok(self
                .move_module(
                    from_course,
                    event.source.index,
                    to_course,
                    destination.index,
                )),
            (
                Container::Module {
                    course,
                    module: from_module,
                },
                Container::Module {
                    course: to_course,
                    module: to_module,
                },
            ) => {
                if to_course != course {
                    return Err(DomainError::CrossCourseMove {
                        from: course,
                        to: to_course,
                    });
                }
                Ok(self.move_resource(
                    course,
                    from_module,
                    event.source.index,
                    to_module,
                    destination.index,
                ))
            }
            _ => Err(DomainError::ContainerMismatch {
                kind: event.kind,
                container: destination.container.to_string(),
            }),
        }
    }

    fn move_module(
        &self,
        from_course: NodeId,
        from: usize,
        to_course: NodeId,
        to: usize,
    ) -> (Self, Outcome) {
        let (Ok(src), Ok(dst)) = (
            self.course_position(from_course),
            self.course_position(to_course),
        ) else {
            return self.unchanged(NoOpReason::UnresolvedContainer);
        };

        let mut courses = self.courses().to_vec();
        if !move_between(&mut courses, src, dst, from, to, modules_of) {
            return self.unchanged(NoOpReason::EmptySource);
        }
        debug!(
            "move_module: course-{}[{}] -> course-{}[{}]",
            from_course, from, to_course, to
        );
        (self.commit(courses), Outcome::Applied)
    }

    fn move_resource(
        &self,
        course_id: NodeId,
        from_module: NodeId,
        from: usize,
        to_module: NodeId,
        to: usize,
    ) -> (Self, Outcome) {
        let Ok(ci) = self.course_position(course_id) else {
            return self.unchanged(NoOpReason::UnresolvedContainer);
        };
        let module_in_course = |module_id| match self.locate(NodeKind::Module, module_id) {
            Some(NodePath::Module { course, module }) if course == ci => Some(module),
            _ => None,
        };
        let (Some(src), Some(dst)) = (module_in_course(from_module), module_in_course(to_module))
        else {
            return self.unchanged(NoOpReason::UnresolvedContainer);
        };

        let mut courses = self.courses().to_vec();
        if !move_between(&mut courses[ci].modules, src, dst, from, to, resources_of) {
            return self.unchanged(NoOpReason::EmptySource);
        }
        debug!(
            "move_resource: module-{}-{}[{}] -> module-{}-{}[{}]",
            course_id, from_module, from, course_id, to_module, to
        );
        (self.commit(courses), Outcome::Applied)
    }

    fn unchanged(&self, reason: NoOpReason) -> (Self, Outcome) {
        debug!("drag left tree unchanged: {}", reason);
        (self.clone(), Outcome::Unchanged(reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(vec!['a', 'b', 'c'], 0, 2, vec!['b', 'c', 'a'])]
    #[case(vec!['a', 'b', 'c'], 2, 0, vec!['c', 'a', 'b'])]
    #[case(vec!['a', 'b', 'c'], 1, 1, vec!['a', 'b', 'c'])]
    #[case(vec!['a', 'b', 'c'], 0, 99, vec!['b', 'c', 'a'])]
    fn given_single_list_when_splicing_then_reorders(
        #[case] list: Vec<char>,
        #[case] from: usize,
        #[case] to: usize,
        #[case] expected: Vec<char>,
    ) {
        let mut list = list;
        assert!(splice_move(&mut list, from, None, to));
        assert_eq!(list, expected);
    }

    #[test]
    fn given_two_lists_when_splicing_then_item_changes_list() {
        let mut source = vec![1, 2];
        let mut destination = vec![3];

        assert!(splice_move(&mut source, 0, Some(&mut destination), 1));

        assert_eq!(source, vec![2]);
        assert_eq!(destination, vec![3, 1]);
    }

    #[test]
    fn given_index_past_end_when_splicing_then_nothing_moves() {
        let mut list = vec![1, 2];
        assert!(!splice_move(&mut list, 2, None, 0));
        assert_eq!(list, vec![1, 2]);
    }

    #[test]
    fn given_reversed_indices_when_pairing_then_order_follows_arguments() {
        let mut items = vec![10, 20, 30];
        let (a, b) = pair_mut(&mut items, 2, 0);
        assert_eq!((*a, *b), (30, 10));
    }
}
