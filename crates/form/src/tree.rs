//! Element tree walked by an area on each render pass.

use crate::element::{ElementKind, ElementRef, contains};

/// A node of the host's rendered subtree.
#[derive(Debug, Clone)]
pub enum Node {
    /// A concrete element, possibly with children of its own.
    Element {
        element: ElementRef,
        children: Vec<Node>,
    },
    /// A transparent grouping with no element of its own.
    Fragment(Vec<Node>),
    /// A non-interactive container such as a `div`.
    Container { tag: String, children: Vec<Node> },
    /// Text content.
    Text(String),
}

impl Node {
    pub fn element(element: ElementRef) -> Self {
        Self::Element {
            element,
            children: Vec::new(),
        }
    }

    pub fn element_with_children(element: ElementRef, children: Vec<Node>) -> Self {
        Self::Element { element, children }
    }

    pub fn fragment(children: Vec<Node>) -> Self {
        Self::Fragment(children)
    }

    pub fn container(tag: impl Into<String>, children: Vec<Node>) -> Self {
        Self::Container {
            tag: tag.into(),
            children,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

/// Flattens a subtree into its interactive elements, in document order.
///
/// Descends through fragments, containers and element children, except into
/// a select's own children: its options are not independently interactive.
/// An element reachable twice is tracked once.
pub fn collect_elements(root: &Node) -> Vec<ElementRef> {
    let mut found = Vec::new();
    walk(root, &mut found);
    found
}

fn walk(node: &Node, found: &mut Vec<ElementRef>) {
    match node {
        Node::Element { element, children } => {
            if element.capabilities().validatable && !contains(found, element) {
                found.push(element.clone());
            }
            if element.kind() != ElementKind::Select {
                for child in children {
                    walk(child, found);
                }
            }
        }
        Node::Fragment(children) | Node::Container { children, .. } => {
            for child in children {
                walk(child, found);
            }
        }
        Node::Text(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    #[test]
    fn indexes_nested_inputs() {
        let tree = Node::fragment(vec![
            Node::fragment(vec![Node::element(Element::input().shared())]),
            Node::container(
                "div",
                vec![
                    Node::element(Element::input().shared()),
                    Node::element(Element::input().shared()),
                    Node::fragment(vec![Node::element(Element::input().shared())]),
                ],
            ),
        ]);

        assert_eq!(collect_elements(&tree).len(), 4);
    }

    #[test]
    fn skips_non_interactive_elements() {
        let tree = Node::fragment(vec![
            Node::element(Element::new(ElementKind::Other).shared()),
            Node::text("label"),
            Node::element(Element::canvas().shared()),
        ]);

        let found = collect_elements(&tree);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind(), ElementKind::Canvas);
    }

    #[test]
    fn does_not_descend_into_select() {
        let option = Element::input().shared();
        let select = Element::select().shared();
        let tree = Node::element_with_children(select.clone(), vec![Node::element(option)]);

        let found = collect_elements(&tree);
        assert_eq!(found.len(), 1);
        assert!(std::sync::Arc::ptr_eq(&found[0], &select));
    }

    #[test]
    fn tracks_shared_element_once() {
        let input = Element::input().shared();
        let tree = Node::fragment(vec![Node::element(input.clone()), Node::element(input)]);

        assert_eq!(collect_elements(&tree).len(), 1);
    }
}
