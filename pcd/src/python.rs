//! Thin wrapper over the tree-sitter Python grammar.
//!
//! The grammar recovers from syntax errors, which suits scanning arbitrary
//! project code for imports.

use crate::error::{Error, Result};
use check_deps_core::Location;
use tree_sitter::{Node, Parser, Tree};

/// Parse Python source into a syntax tree.
///
/// The tree may contain error nodes; use [`first_error_line`] to check.
pub fn parse_source(source: &str, location: &Location) -> Result<Tree> {
    let language: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| Error::Grammar(e.to_string()))?;
    parser
        .parse(source, None)
        .ok_or_else(|| Error::NoTree(Box::new(location.clone())))
}

/// 1-indexed line of the first syntax error in the tree, if any
pub fn first_error_line(tree: &Tree) -> Option<usize> {
    let root = tree.root_node();
    if !root.has_error() {
        return None;
    }
    find_error(root).map(|node| node.start_position().row + 1)
}

fn find_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    named_and_anonymous_children(node)
        .into_iter()
        .filter(Node::has_error)
        .find_map(find_error)
        .or(Some(node))
}

fn named_and_anonymous_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

/// Source text covered by a node
pub fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    &source[node.byte_range()]
}

/// Named children of a node, without comments
pub fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}
