//! Text and position utilities for tree-sitter nodes.

use tree_sitter::Node;

/// Literal nodes whose inner whitespace is significant.
const VERBATIM_KINDS: &[&str] = &["interpreted_string_literal", "raw_string_literal", "rune_literal"];

pub fn node_text<'a>(
    node: Node<'_>,
    source: &'a str,
) -> &'a str {
    source.get(node.byte_range()).unwrap_or_default()
}

/// 1-based (line, column) of the node start.
pub fn position(node: Node<'_>) -> (usize, usize) {
    let point = node.start_position();
    (point.row + 1, point.column + 1)
}

/// Every node bound to `field` on `node`, in source order.
pub fn field_nodes<'t>(
    node: Node<'t>,
    field: &str,
) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(field, &mut cursor).collect()
}

/// Named children, skipping comments.
pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).filter(|child| child.kind() != "comment").collect()
}

/// Source tokens of `node` with comments dropped and inter-token whitespace
/// collapsed to a single space. Statements in a list are separated by `;`
/// whether or not the source spelled one out. String and rune literals are
/// copied verbatim.
pub fn compact_text(
    node: Node<'_>,
    source: &str,
) -> String {
    let mut out = String::new();
    let mut prev_end = None;
    push_compact(node, source, &mut out, &mut prev_end);
    out
}

fn push_compact(
    node: Node<'_>,
    source: &str,
    out: &mut String,
    prev_end: &mut Option<usize>,
) {
    if node.kind() == "comment" {
        return;
    }

    if node.kind() == "statement_list" {
        let mut first = true;
        for statement in named_children(node) {
            if !first && !out.ends_with(';') {
                out.push(';');
            }
            first = false;
            push_compact(statement, source, out, prev_end);
        }
        return;
    }

    if node.child_count() > 0 && !VERBATIM_KINDS.contains(&node.kind()) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            push_compact(child, source, out, prev_end);
        }
        return;
    }

    let range = node.byte_range();
    if range.is_empty() {
        return;
    }
    let token = node_text(node, source);
    let separated = out.ends_with(';') || prev_end.is_some_and(|end| end < range.start);
    if separated && !out.is_empty() && token != ";" {
        out.push(' ');
    }
    out.push_str(token);
    *prev_end = Some(range.end);
}
