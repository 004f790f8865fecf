use std::{collections::VecDeque, vec};

use tree_sitter::Node;

use crate::decl::types::{Declaration, FunctionDecl, RecordDecl, VariableDecl};
use crate::syntax::SyntaxTree;
use crate::syntax::helpers::{compact_text, field_nodes, named_children, node_text};

/// Collect every top-level declaration of interest in source order.
pub fn extract_declarations(tree: &SyntaxTree) -> Vec<Declaration> {
    Declarations::new(tree).collect()
}

/// Lazy walk over top-level functions, struct types and `var` specs in
/// source order.
///
/// Only direct children of the file are inspected, so constants, imports and
/// anything declared inside a function body are never yielded.
pub struct Declarations<'t> {
    source: &'t str,
    nodes: vec::IntoIter<Node<'t>>,
    pending: VecDeque<Declaration>,
}

impl<'t> Declarations<'t> {
    pub fn new(tree: &'t SyntaxTree) -> Self {
        Self {
            source: tree.source(),
            nodes: named_children(tree.root()).into_iter(),
            pending: VecDeque::new(),
        }
    }

    /// Queue the declarations one top-level node contributes.
    fn expand(
        &mut self,
        node: Node<'t>,
    ) {
        let source = self.source;
        match node.kind() {
            "function_declaration" | "method_declaration" => {
                self.pending.extend(function_decl(node, source).map(Declaration::Function));
            },
            "type_declaration" => {
                self.pending.extend(
                    type_specs(node).into_iter().filter_map(|spec| record_decl(spec, source)).map(Declaration::Record),
                );
            },
            "var_declaration" => {
                self.pending
                    .extend(var_specs(node).into_iter().map(|spec| Declaration::Variable(variable_decl(spec, source))));
            },
            _ => {},
        }
    }
}

impl Iterator for Declarations<'_> {
    type Item = Declaration;

    fn next(&mut self) -> Option<Declaration> {
        loop {
            if let Some(decl) = self.pending.pop_front() {
                return Some(decl);
            }
            let node = self.nodes.next()?;
            self.expand(node);
        }
    }
}

fn function_decl(
    node: Node<'_>,
    source: &str,
) -> Option<FunctionDecl> {
    let name = node_text(node.child_by_field_name("name")?, source).to_string();

    let params = node
        .child_by_field_name("parameters")
        .map(|list| parameter_names(list, source))
        .unwrap_or_default();

    let results = node
        .child_by_field_name("result")
        .map(|result| result_names(result, source))
        .unwrap_or_default();

    Some(FunctionDecl {
        name,
        params,
        results,
    })
}

fn parameter_names(
    list: Node<'_>,
    source: &str,
) -> Vec<String> {
    named_children(list)
        .into_iter()
        .filter(|param| is_parameter(*param))
        .flat_map(|param| field_nodes(param, "name"))
        .map(|name| node_text(name, source).to_string())
        .collect()
}

/// One entry per result field whose type is a bare identifier such as `int`
/// or `error`. Qualified, pointer, slice and generic types are skipped.
fn result_names(
    result: Node<'_>,
    source: &str,
) -> Vec<String> {
    if result.kind() != "parameter_list" {
        return identifier_type(result, source).into_iter().collect();
    }

    named_children(result)
        .into_iter()
        .filter(|field| is_parameter(*field))
        .filter_map(|field| field.child_by_field_name("type"))
        .filter_map(|ty| identifier_type(ty, source))
        .collect()
}

fn identifier_type(
    ty: Node<'_>,
    source: &str,
) -> Option<String> {
    (ty.kind() == "type_identifier").then(|| node_text(ty, source).to_string())
}

fn is_parameter(node: Node<'_>) -> bool {
    matches!(node.kind(), "parameter_declaration" | "variadic_parameter_declaration")
}

fn type_specs(decl: Node<'_>) -> Vec<Node<'_>> {
    named_children(decl)
        .into_iter()
        .filter(|spec| matches!(spec.kind(), "type_spec" | "type_alias"))
        .collect()
}

fn record_decl(
    spec: Node<'_>,
    source: &str,
) -> Option<RecordDecl> {
    let ty = spec.child_by_field_name("type")?;
    if ty.kind() != "struct_type" {
        return None;
    }
    let name = node_text(spec.child_by_field_name("name")?, source).to_string();

    let fields = named_children(ty)
        .into_iter()
        .filter(|child| child.kind() == "field_declaration_list")
        .flat_map(named_children)
        .filter(|field| field.kind() == "field_declaration")
        .flat_map(|field| field_nodes(field, "name"))
        .map(|field_name| node_text(field_name, source).to_string())
        .collect();

    Some(RecordDecl {
        name,
        fields,
    })
}

/// `var` specs of one declaration, looking through a parenthesized group.
fn var_specs(decl: Node<'_>) -> Vec<Node<'_>> {
    let mut specs = Vec::new();
    for child in named_children(decl) {
        match child.kind() {
            "var_spec" => specs.push(child),
            "var_spec_list" => {
                specs.extend(named_children(child).into_iter().filter(|spec| spec.kind() == "var_spec"));
            },
            _ => {},
        }
    }
    specs
}

fn variable_decl(
    spec: Node<'_>,
    source: &str,
) -> VariableDecl {
    let names = field_nodes(spec, "name").into_iter().map(|name| node_text(name, source).to_string()).collect();

    let type_text = spec.child_by_field_name("type").map(|ty| compact_text(ty, source));

    let values = match spec.child_by_field_name("value") {
        Some(list) if list.kind() == "expression_list" => {
            named_children(list).into_iter().map(|expr| compact_text(expr, source)).collect()
        },
        Some(expr) => vec![compact_text(expr, source)],
        None => Vec::new(),
    };

    VariableDecl {
        names,
        type_text,
        values,
    }
}

#[cfg(test)]
#[path = "../../tests/src/decl/extractor_tests.rs"]
mod tests;
