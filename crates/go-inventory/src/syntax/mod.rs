//! Go parsing on top of `tree-sitter-go`.
//!
//! [`SyntaxTree::parse`] is the only entry point: it either hands back a
//! complete tree (comments included) or a [`ParseError`] pointing at the first
//! broken construct. Error-recovered trees are never handed to the extractor.
//!
//! The grammar's `source_file` is looser than Go: it accepts statements at
//! file level and a missing or misplaced `package` clause. Those files are
//! rejected here the way `go/parser` rejects them.

pub mod helpers;

use std::{
    fmt::{Display, Formatter},
    str::Utf8Error,
    sync::Arc,
};

use tree_sitter::{Node, Parser, Tree};

/// Immutable parse of one Go source file.
#[derive(Clone)]
pub struct SyntaxTree {
    tree: Tree,
    source: Arc<str>,
}

impl SyntaxTree {
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|error| ParseError::language(error.to_string()))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ParseError::language("parser returned no tree".to_string()))?;

        if let Some(error) = first_error(tree.root_node(), source) {
            return Err(error);
        }
        check_file_layout(tree.root_node(), source)?;

        Ok(Self {
            tree,
            source: Arc::from(source),
        })
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Syntax error reported for a file that does not parse cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line, 0 when the failure has no position.
    pub line: usize,
    /// 1-based byte column, 0 when the failure has no position.
    pub column: usize,
    pub message: String,
}

impl ParseError {
    fn language(message: String) -> Self {
        Self {
            line: 0,
            column: 0,
            message: format!("go grammar unavailable: {message}"),
        }
    }

    /// Source bytes that are not UTF-8, positioned at the first bad byte.
    pub fn invalid_utf8(
        bytes: &[u8],
        error: &Utf8Error,
    ) -> Self {
        let valid = &bytes[..error.valid_up_to()];
        let line_start = valid.iter().rposition(|&b| b == b'\n').map_or(0, |newline| newline + 1);
        Self {
            line: valid.iter().filter(|&&b| b == b'\n').count() + 1,
            column: valid.len() - line_start + 1,
            message: "illegal UTF-8 encoding".to_string(),
        }
    }

    fn at(
        node: Node<'_>,
        message: String,
    ) -> Self {
        let (line, column) = helpers::position(node);
        Self {
            line,
            column,
            message,
        }
    }
}

impl Display for ParseError {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        if self.line == 0 {
            return f.write_str(&self.message);
        }
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

impl std::error::Error for ParseError {}

const SNIPPET_MAX_CHARS: usize = 32;

/// Depth-first search for the first `ERROR` or `MISSING` node in document order.
fn first_error(
    node: Node<'_>,
    source: &str,
) -> Option<ParseError> {
    if node.is_missing() {
        return Some(ParseError::at(node, format!("missing {:?}", node.kind())));
    }
    if node.is_error() {
        let snippet = snippet(node, source);
        let message = if snippet.is_empty() {
            "syntax error".to_string()
        } else {
            format!("syntax error near {snippet:?}")
        };
        return Some(ParseError::at(node, message));
    }
    if !node.has_error() {
        return None;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(error) = first_error(child, source) {
            return Some(error);
        }
    }
    None
}

/// Top-level kinds allowed after the `package` clause.
const FILE_LEVEL_DECLARATIONS: &[&str] = &[
    "import_declaration",
    "const_declaration",
    "var_declaration",
    "type_declaration",
    "function_declaration",
    "method_declaration",
];

/// A file is one `package` clause, then imports, then other declarations.
fn check_file_layout(
    root: Node<'_>,
    source: &str,
) -> Result<(), ParseError> {
    let mut children = helpers::named_children(root).into_iter();

    match children.next() {
        Some(first) if first.kind() == "package_clause" => {},
        Some(first) => {
            return Err(ParseError::at(first, format!("expected 'package', found {:?}", snippet(first, source))));
        },
        None => return Err(ParseError::at(root, "expected 'package', found EOF".to_string())),
    }

    let mut past_imports = false;
    for node in children {
        let kind = node.kind();
        if !FILE_LEVEL_DECLARATIONS.contains(&kind) {
            return Err(ParseError::at(node, format!("expected declaration, found {:?}", snippet(node, source))));
        }
        if kind == "import_declaration" {
            if past_imports {
                return Err(ParseError::at(node, "imports must appear before other declarations".to_string()));
            }
        } else {
            past_imports = true;
        }
    }
    Ok(())
}

/// First line of the node text, trimmed and capped for messages.
fn snippet(
    node: Node<'_>,
    source: &str,
) -> String {
    helpers::node_text(node, source)
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .chars()
        .take(SNIPPET_MAX_CHARS)
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src/syntax/parse_tests.rs"]
mod tests;
