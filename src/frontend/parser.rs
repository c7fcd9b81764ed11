//! Tree-sitter parser integration for Go
//!
//! Provides parsing using the tree-sitter Go grammar.

use crate::errors::{Error, Result};
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser, Tree};

/// A parsed Go source file.
pub struct GoSource {
    pub tree: Tree,
    pub path: PathBuf,
    pub source: String,
}

impl std::fmt::Debug for GoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoSource").field("path", &self.path).finish()
    }
}

/// Parse Go source code into a tree-sitter AST
pub fn parse_source(content: &str, path: &Path) -> Result<GoSource> {
    let mut parser = Parser::new();

    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|e| Error::parse(path, 0, 0, format!("failed to set tree-sitter language: {e}")))?;

    let tree = parser
        .parse(content, None)
        .ok_or_else(|| Error::parse(path, 0, 0, "failed to parse source code"))?;

    if let Some(node) = first_error(&tree.root_node()) {
        return Err(Error::parse(
            path,
            node_line(&node),
            node_column(&node),
            "syntax error",
        ));
    }

    Ok(GoSource {
        tree,
        path: path.to_path_buf(),
        source: content.to_string(),
    })
}

fn first_error<'a>(node: &Node<'a>) -> Option<Node<'a>> {
    if !node.has_error() {
        return None;
    }
    if node.is_error() || node.is_missing() {
        return Some(*node);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children
        .iter()
        .find_map(|child| first_error(child))
        .or(Some(*node))
}

/// Get text for a tree-sitter node
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// Get the line number for a tree-sitter node (1-indexed)
pub fn node_line(node: &Node) -> usize {
    node.start_position().row + 1
}

/// Get the column number for a tree-sitter node (1-indexed)
pub fn node_column(node: &Node) -> usize {
    node.start_position().column + 1
}

/// Named children of `node`, collected so callers can iterate freely.
pub fn named_children<'a>(node: &Node<'a>) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// The `package` clause name of a parsed file.
pub fn package_name(file: &GoSource) -> Option<String> {
    named_children(&file.tree.root_node())
        .into_iter()
        .find(|n| n.kind() == "package_clause")
        .and_then(|clause| {
            named_children(&clause)
                .into_iter()
                .find(|n| n.kind() == "package_identifier")
        })
        .map(|ident| node_text(&ident, &file.source).to_string())
}
