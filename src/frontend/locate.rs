//! Locating a contract inside a parsed package and lowering its method list.

use super::package::GoPackage;
use super::parser::{named_children, node_line, node_text};
use crate::spec::{ContractDecl, FieldDecl, MethodDecl, RawType};
use tree_sitter::Node;

/// A contract found in a package: which file declares it, and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractSite {
    pub file_index: usize,
    pub line: usize,
}

fn significant_children<'a>(node: &Node<'a>) -> Vec<Node<'a>> {
    named_children(node)
        .into_iter()
        .filter(|n| n.kind() != "comment")
        .collect()
}

/// Top-level `type_spec` and `type_alias` nodes of a file.
pub(crate) fn type_specs<'a>(root: &Node<'a>) -> Vec<Node<'a>> {
    significant_children(root)
        .into_iter()
        .filter(|n| n.kind() == "type_declaration")
        .flat_map(|decl| significant_children(&decl))
        .filter(|n| matches!(n.kind(), "type_spec" | "type_alias"))
        .collect()
}

fn interface_body<'a>(spec: &Node<'a>, source: &str, name: &str) -> Option<Node<'a>> {
    if spec.kind() != "type_spec" {
        return None;
    }
    let ident = spec.child_by_field_name("name")?;
    if node_text(&ident, source) != name {
        return None;
    }
    spec.child_by_field_name("type")
        .filter(|ty| ty.kind() == "interface_type")
}

/// Find the interface named `name` in `package`, first file first.
pub fn find_contract(package: &GoPackage, name: &str) -> Option<ContractSite> {
    package.files.iter().enumerate().find_map(|(file_index, file)| {
        let root = file.tree.root_node();
        type_specs(&root).into_iter().find_map(|spec| {
            interface_body(&spec, &file.source, name).map(|_| ContractSite {
                file_index,
                line: node_line(&spec),
            })
        })
    })
}

/// Lower the contract at `site` into a front-end neutral declaration.
pub fn lower_contract(package: &GoPackage, name: &str, site: ContractSite) -> Option<ContractDecl> {
    let file = package.files.get(site.file_index)?;
    let root = file.tree.root_node();
    let body = type_specs(&root)
        .into_iter()
        .find_map(|spec| interface_body(&spec, &file.source, name))?;

    let methods = significant_children(&body)
        .iter()
        .map(|elem| lower_method(elem, &file.source))
        .collect();

    Some(ContractDecl {
        name: name.to_string(),
        module_path: package.import_path.clone(),
        module_name: package.name.clone(),
        file: file.path.clone(),
        line: site.line,
        methods,
    })
}

fn lower_method(elem: &Node, source: &str) -> MethodDecl {
    match elem.kind() {
        "method_elem" | "method_spec" => {
            let Some(name) = elem.child_by_field_name("name") else {
                return MethodDecl::embedded();
            };
            let params = elem
                .child_by_field_name("parameters")
                .map(|list| lower_parameter_list(&list, source))
                .unwrap_or_default();
            let results = elem
                .child_by_field_name("result")
                .map(|result| {
                    if result.kind() == "parameter_list" {
                        lower_parameter_list(&result, source)
                    } else {
                        vec![FieldDecl::unnamed(lower_type(&result, source))]
                    }
                })
                .unwrap_or_default();
            MethodDecl::named(node_text(&name, source), params, results)
        }
        // embedded contracts, type unions and constraint terms
        _ => MethodDecl::embedded(),
    }
}

/// Lower a parameter list, expanding grouped names into one field each.
pub fn lower_parameter_list(list: &Node, source: &str) -> Vec<FieldDecl> {
    let mut fields = Vec::new();
    for decl in significant_children(list) {
        let Some(ty_node) = decl.child_by_field_name("type") else {
            continue;
        };
        let mut ty = lower_type(&ty_node, source);
        if decl.kind() == "variadic_parameter_declaration" {
            ty = RawType::Variadic(Box::new(ty));
        }

        let mut cursor = decl.walk();
        let names: Vec<String> = decl
            .children_by_field_name("name", &mut cursor)
            .map(|n| node_text(&n, source).to_string())
            .collect();

        if names.is_empty() {
            fields.push(FieldDecl::unnamed(ty));
        } else {
            fields.extend(names.into_iter().map(|n| FieldDecl::new(n, ty.clone())));
        }
    }
    fields
}

fn first_type_child<'a>(node: &Node<'a>) -> Option<Node<'a>> {
    significant_children(node).into_iter().next()
}

/// Lower a Go type node into a raw type tree.
pub fn lower_type(node: &Node, source: &str) -> RawType {
    let text = || node_text(node, source).to_string();
    let field = |name: &str| node.child_by_field_name(name).map(|n| lower_type(&n, source));

    match node.kind() {
        "type_identifier" => RawType::Ident(text()),
        "qualified_type" => {
            match (node.child_by_field_name("package"), node.child_by_field_name("name")) {
                (Some(pkg), Some(name)) => {
                    RawType::qualified(node_text(&pkg, source), node_text(&name, source))
                }
                _ => RawType::Other(text()),
            }
        }
        "pointer_type" => match first_type_child(node) {
            Some(inner) => RawType::pointer(lower_type(&inner, source)),
            None => RawType::Other(text()),
        },
        "parenthesized_type" => match first_type_child(node) {
            Some(inner) => lower_type(&inner, source),
            None => RawType::Other(text()),
        },
        "slice_type" => match field("element") {
            Some(elem) => RawType::slice(elem),
            None => RawType::Other(text()),
        },
        "array_type" | "implicit_length_array_type" => match field("element") {
            Some(elem) => RawType::Array {
                len: node
                    .child_by_field_name("length")
                    .map(|n| node_text(&n, source).to_string())
                    .unwrap_or_else(|| "...".to_string()),
                elem: Box::new(elem),
            },
            None => RawType::Other(text()),
        },
        "map_type" => match (field("key"), field("value")) {
            (Some(key), Some(value)) => RawType::map(key, value),
            _ => RawType::Other(text()),
        },
        "channel_type" => match field("value") {
            Some(value) => RawType::Chan(Box::new(value)),
            None => RawType::Other(text()),
        },
        "generic_type" => match (field("type"), node.child_by_field_name("type_arguments")) {
            (Some(base), Some(args)) => RawType::Generic {
                base: Box::new(base),
                args: node_text(&args, source)
                    .trim_start_matches('[')
                    .trim_end_matches(']')
                    .to_string(),
            },
            _ => RawType::Other(text()),
        },
        "function_type" => RawType::Func(text()),
        "struct_type" => RawType::Struct(text()),
        "interface_type" => RawType::Interface(text()),
        _ => RawType::Other(text()),
    }
}
