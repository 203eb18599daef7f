//! Expansion state for the presentation layer.
//!
//! Independent of the tree: toggling never touches course data, and ids
//! that no longer exist simply never match.

use crate::domain::ids::NodeId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewState {
    open_course: Option<NodeId>,
    open_module: Option<NodeId>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the course, or closes it when it is already open.
    pub fn toggle_course(&mut self, id: NodeId) -> Option<NodeId> {
        self.open_course = toggle(self.open_course, id);
        self.open_course
    }

    /// Opens the module, or closes it when it is already open.
    pub fn toggle_module(&mut self, id: NodeId) -> Option<NodeId> {
        self.open_module = toggle(self.open_module, id);
        self.open_module
    }

    pub fn open_course(&self) -> Option<NodeId> {
        self.open_course
    }

    pub fn open_module(&self) -> Option<NodeId> {
        self.open_module
    }

    pub fn is_course_open(&self, id: NodeId) -> bool {
        self.open_course == Some(id)
    }

    pub fn is_module_open(&self, id: NodeId) -> bool {
        self.open_module == Some(id)
    }
}

fn toggle(current: Option<NodeId>, id: NodeId) -> Option<NodeId> {
    if current == Some(id) {
        None
    } else {
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_closed_course_when_toggled_twice_then_closed_again() {
        let mut view = ViewState::new();
        assert_eq!(view.toggle_course(NodeId::new(1)), Some(NodeId::new(1)));
        assert!(view.is_course_open(NodeId::new(1)));
        assert_eq!(view.toggle_course(NodeId::new(1)), None);
        assert!(!view.is_course_open(NodeId::new(1)));
    }

    #[test]
    fn given_open_course_when_other_toggled_then_switches() {
        let mut view = ViewState::new();
        view.toggle_course(NodeId::new(1));
        view.toggle_course(NodeId::new(2));
        assert_eq!(view.open_course(), Some(NodeId::new(2)));
    }

    #[test]
    fn given_course_and_module_when_toggling_then_selections_are_independent() {
        let mut view = ViewState::new();
        view.toggle_course(NodeId::new(1));
        view.toggle_module(NodeId::new(5));
        view.toggle_course(NodeId::new(1));

        assert_eq!(view.open_course(), None);
        assert_eq!(view.open_module(), Some(NodeId::new(5)));
    }
}
