//! Minimal tree-node view used for sibling walks, so parsers do not depend
//! on a concrete HTML library.

use scraper::ElementRef;

/// The node operations a forward sibling scan needs.
pub trait TreeNode: Sized {
    /// Lowercase tag name, e.g. `"h3"` or `"p"`.
    fn tag_name(&self) -> String;

    /// Concatenated text content of the node and its descendants.
    fn text(&self) -> String;

    /// The next element sibling, skipping text and comment nodes.
    fn next_sibling(&self) -> Option<Self>;
}

impl TreeNode for ElementRef<'_> {
    fn tag_name(&self) -> String {
        self.value().name().to_ascii_lowercase()
    }

    fn text(&self) -> String {
        ElementRef::text(self).collect()
    }

    fn next_sibling(&self) -> Option<Self> {
        self.next_siblings().find_map(ElementRef::wrap)
    }
}

/// Whether `tag` is one of `h1`..`h6`.
#[must_use]
pub fn is_heading_tag(tag: &str) -> bool {
    matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// Walks the siblings after `start`, at most `limit` of them, stopping early
/// at a node for which `is_boundary` holds. Returns the first value `visit`
/// produces.
pub fn scan_forward<N, T>(
    start: &N,
    limit: usize,
    is_boundary: impl Fn(&N) -> bool,
    mut visit: impl FnMut(&N) -> Option<T>,
) -> Option<T>
where
    N: TreeNode,
{
    let mut current = start.next_sibling();
    let mut seen = 0usize;

    while let Some(node) = current {
        if seen >= limit || is_boundary(&node) {
            break;
        }
        if let Some(found) = visit(&node) {
            return Some(found);
        }
        seen += 1;
        current = node.next_sibling();
    }

    None
}

#[cfg(test)]
pub(crate) mod fake {
    use super::TreeNode;
    use std::rc::Rc;

    /// A flat list of sibling nodes for exercising sibling walks.
    #[derive(Clone)]
    pub(crate) struct FakeNode {
        nodes: Rc<Vec<(String, String)>>,
        index: usize,
    }

    impl FakeNode {
        /// Builds a sibling list and returns its first node.
        pub(crate) fn siblings(nodes: &[(&str, &str)]) -> Self {
            Self {
                nodes: Rc::new(
                    nodes
                        .iter()
                        .map(|(tag, text)| ((*tag).to_owned(), (*text).to_owned()))
                        .collect(),
                ),
                index: 0,
            }
        }
    }

    impl TreeNode for FakeNode {
        fn tag_name(&self) -> String {
            self.nodes[self.index].0.clone()
        }

        fn text(&self) -> String {
            self.nodes[self.index].1.clone()
        }

        fn next_sibling(&self) -> Option<Self> {
            (self.index + 1 < self.nodes.len()).then(|| Self {
                nodes: Rc::clone(&self.nodes),
                index: self.index + 1,
            })
        }
    }
}
