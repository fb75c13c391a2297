//! Structural path selection over an [`Element`] tree.
//!
//! Only the handful of steps the house-file extractors use are supported:
//! `Tag`, `*`, `.`, an empty step (from `//`, descendant-or-self), and a
//! terminal `@attr` or `text()` when selecting a leaf value.

use super::Element;

pub fn select<'a>(root: &'a Element, path: &str) -> Vec<&'a Element> {
    let path = path.strip_prefix("./").unwrap_or(path);
    if path.is_empty() || path == "." {
        return vec![root];
    }

    let mut current: Vec<&'a Element> = vec![root];
    for step in path.split('/') {
        let mut next: Vec<&'a Element> = Vec::new();
        for node in current {
            match step {
                "" => collect_descendants_or_self(node, &mut next),
                "." => next.push(node),
                "*" => next.extend(node.children()),
                tag => next.extend(node.children().filter(|child| child.tag() == tag)),
            }
        }
        current = dedup(next);
        if current.is_empty() {
            break;
        }
    }
    current
}

/// Select the first leaf value at `path`. A path ending in `@name` yields the
/// attribute, `text()` the element text, anything else the element text.
pub fn select_value(root: &Element, path: &str) -> Option<String> {
    let (parent, leaf) = match path.rsplit_once('/') {
        Some((parent, leaf)) => (parent, leaf),
        None => ("", path),
    };

    if let Some(attribute) = leaf.strip_prefix('@') {
        return select(root, parent)
            .into_iter()
            .find_map(|node| node.attribute(attribute).map(str::to_string));
    }
    if leaf == "text()" {
        return select(root, parent).into_iter().find_map(Element::text);
    }
    select(root, path).into_iter().find_map(Element::text)
}

fn collect_descendants_or_self<'a>(node: &'a Element, out: &mut Vec<&'a Element>) {
    out.push(node);
    for child in node.children() {
        collect_descendants_or_self(child, out);
    }
}

fn dedup(nodes: Vec<&Element>) -> Vec<&Element> {
    let mut out: Vec<&Element> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if !out.iter().any(|seen| std::ptr::eq(*seen, node)) {
            out.push(node);
        }
    }
    out
}
