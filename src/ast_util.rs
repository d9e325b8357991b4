//! Tree-sitter node helpers shared by every language parser (C1).
//!
//! Grounded on the teacher's `parsing/parser.rs`: the recursion guard and the
//! byte-safe substring helpers exist because a hostile or merely huge source
//! file can otherwise blow the traversal stack or panic mid-UTF8-character
//! when a node's text is truncated for a signature preview.

use crate::types::SourceLocation;
use tree_sitter::Node;

/// Depth past which `traverse_node` stops descending into a subtree rather
/// than risk a stack overflow on pathological input.
pub const MAX_AST_DEPTH: usize = 512;

/// Returns `Some(())` when traversal may continue, `None` once the guard
/// has tripped for this subtree.
pub fn check_recursion_depth(depth: usize) -> Option<()> {
    if depth >= MAX_AST_DEPTH {
        None
    } else {
        Some(())
    }
}

/// First direct child whose kind matches `kind`.
pub fn find_child_by_type<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).find(|c| c.kind() == kind)
}

/// All direct children whose kind matches `kind`, in source order.
pub fn find_children_by_type<'a>(node: Node<'a>, kind: &str) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|c| c.kind() == kind)
        .collect()
}

/// Pre-order, depth-first traversal with a recursion guard. `callback`
/// returns `false` to stop descending into a given node's children (but
/// sibling traversal continues).
pub fn traverse_node<'a, F>(node: Node<'a>, callback: &mut F)
where
    F: FnMut(Node<'a>) -> bool,
{
    traverse_node_depth(node, 0, callback);
}

fn traverse_node_depth<'a, F>(node: Node<'a>, depth: usize, callback: &mut F)
where
    F: FnMut(Node<'a>) -> bool,
{
    if check_recursion_depth(depth).is_none() {
        return;
    }
    let descend = callback(node);
    if !descend {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        traverse_node_depth(child, depth + 1, callback);
    }
}

/// A node's 1-based location with `file_path` left blank — the parser
/// driver back-fills it once the whole tree for a file is built.
pub fn node_location(node: Node) -> SourceLocation {
    let start = node.start_position();
    let end = node.end_position();
    SourceLocation::new(
        start.row as u32 + 1,
        start.column as u32 + 1,
        end.row as u32 + 1,
        end.column as u32 + 1,
    )
}

/// Reconstructs a type node's full textual form, including generics and
/// array/nullable suffixes, by reading the node's source span verbatim
/// rather than trying to reassemble it from sub-node kinds.
pub fn extract_full_type_name(node: Node, source: &str) -> String {
    safe_node_text(node, source).trim().to_string()
}

/// Byte-safe slice of `source` covered by `node`. Tree-sitter byte offsets
/// always land on char boundaries for well-formed UTF-8 input, but we guard
/// anyway since callers may hand us a node from a tree built over text that
/// was mutated after parsing.
pub fn safe_node_text<'a>(node: Node, source: &'a str) -> &'a str {
    let start = node.start_byte().min(source.len());
    let end = node.end_byte().min(source.len());
    if start >= end {
        return "";
    }
    safe_substring_window(source, start, end)
}

/// Slices `source[start..end]`, widening `start` backward and `end` forward
/// to the nearest char boundary rather than panicking on a misaligned index.
pub fn safe_substring_window(source: &str, start: usize, end: usize) -> &str {
    let mut start = start.min(source.len());
    let mut end = end.min(source.len());
    while start > 0 && !source.is_char_boundary(start) {
        start -= 1;
    }
    while end < source.len() && !source.is_char_boundary(end) {
        end += 1;
    }
    if start >= end {
        return "";
    }
    &source[start..end]
}

/// Truncates `s` to at most `max_chars` characters without splitting a
/// multi-byte character, appending `…` when truncation occurred.
pub fn safe_truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars).collect();
    out.push('…');
    out
}

/// Short single-line preview of a node's text, for diagnostics/logging.
pub fn truncate_for_display(node: Node, source: &str, max_chars: usize) -> String {
    let text = safe_node_text(node, source).replace('\n', " ");
    safe_truncate_str(&text, max_chars)
}
