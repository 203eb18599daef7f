//! Tree rendering for the shell
//!
//! Only the open course and the open module are expanded unless the caller
//! asks for everything.

use termtree::Tree;

use crate::domain::{Container, Course, CourseTree, Module, Resource, ViewState};

fn marker(open: bool) -> &'static str {
    if open {
        "[-]"
    } else {
        "[+]"
    }
}

fn resource_node(resource: &Resource) -> Tree<String> {
    Tree::new(format!(
        "{} #{} [{}] {}",
        resource.title, resource.id, resource.kind, resource.payload
    ))
}

fn module_node(course: &Course, module: &Module, open: bool) -> Tree<String> {
    let container = Container::Module {
        course: course.id,
        module: module.id,
    };
    let label = format!("{} {} ({})", marker(open), module.title, container);
    let node = Tree::new(label);
    if open {
        node.with_leaves(module.resources.iter().map(resource_node))
    } else {
        node
    }
}

fn course_node(course: &Course, view: &ViewState, expand_all: bool) -> Tree<String> {
    let open = expand_all || view.is_course_open(course.id);
    let mut label = format!(
        "{} {} ({})",
        marker(open),
        course.title,
        Container::Course(course.id)
    );
    if !course.description.is_empty() {
        label.push_str(": ");
        label.push_str(&course.description);
    }
    let node = Tree::new(label);
    if !open {
        return node;
    }
    node.with_leaves(
        course
            .modules
            .iter()
            .map(|m| module_node(course, m, expand_all || view.is_module_open(m.id))),
    )
}

/// Render the tree as text.
pub fn render_tree(tree: &CourseTree, view: &ViewState, expand_all: bool) -> String {
    let root = Tree::new(format!("courses (revision {})", tree.revision()));
    root.with_leaves(
        tree.courses()
            .iter()
            .map(|c| course_node(c, view, expand_all)),
    )
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IdGenerator, NewResource, ResourceKind};

    fn sample() -> (CourseTree, ViewState) {
        let mut ids = IdGenerator::default();
        let (tree, c) = CourseTree::empty().create_course(&mut ids, "Rust", "systems");
        let (tree, m) = tree.add_module(&mut ids, c.id, "Ownership").unwrap();
        let (tree, _) = tree
            .add_resource(
                &mut ids,
                c.id,
                m.id,
                NewResource::new("Book", ResourceKind::Link, "https://doc.rust-lang.org"),
            )
            .unwrap();
        (tree, ViewState::new())
    }

    #[test]
    fn given_collapsed_view_when_rendering_then_modules_hidden() {
        let (tree, view) = sample();
        let text = render_tree(&tree, &view, false);

        assert!(text.contains("[+] Rust (course-1): systems"));
        assert!(!text.contains("Ownership"));
    }

    #[test]
    fn given_open_course_when_rendering_then_modules_shown_but_collapsed() {
        let (tree, mut view) = sample();
        view.toggle_course(tree.courses()[0].id);

        let text = render_tree(&tree, &view, false);

        assert!(text.contains("[-] Rust (course-1)"));
        assert!(text.contains("[+] Ownership (module-1-2)"));
        assert!(!text.contains("Book"));
    }

    #[test]
    fn given_expand_all_when_rendering_then_resources_shown() {
        let (tree, view) = sample();
        let text = render_tree(&tree, &view, true);
        assert!(text.contains("Book #3 [link] https://doc.rust-lang.org"));
    }
}
