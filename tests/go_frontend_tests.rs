use fnspec::{extract, Error, ExtractOptions, ParamDescriptor};
use indoc::indoc;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A module with a contract referencing two packages both named `packmain`.
fn fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    write(root, "go.mod", "module example.com/fnt\n\ngo 1.22\n");
    write(
        root,
        "internal/contract.go",
        indoc! {r#"
            package internal

            import (
                "context"

                "example.com/fnt/packone/packmain"
                p2 "example.com/fnt/packtwo/packmain"
            )

            type TestInterface interface {
                PerformRequest(ctx context.Context, req Request, val1 int, val2 string) (Response, error)
                InterfaceParam(ctx context.Context, perf performer)
                Alias(ctx context.Context, pack1 packmain.PackItem, pack2 p2.PackItem) (packmain.PackItem, p2.PackItem)
                Pointers(req *Request, id *int) *Response
                Arrays(reqsPoint []*Request, reqs []Request, numbers []int) []int
                Lookup(m map[p2.PackItem]*Request)
            }
        "#},
    );
    write(
        root,
        "internal/types.go",
        indoc! {r#"
            package internal

            type Request struct{}

            type Response struct{}

            type performer interface {
                DoSomething()
            }
        "#},
    );
    write(
        root,
        "internal/contract_test.go",
        "package internal\n\nfunc broken( {\n",
    );
    write(
        root,
        "packone/packmain/item.go",
        "package packmain\n\ntype PackItem struct{}\n",
    );
    write(
        root,
        "packtwo/packmain/item.go",
        "package packmain\n\ntype PackItem struct{}\n",
    );
    tmp
}

#[test]
fn test_extracts_contract_from_go_module() {
    let tmp = fixture();
    let out = extract(&ExtractOptions::new(tmp.path(), "TestInterface")).unwrap();
    let spec = &out.specification;

    assert_eq!(spec.name, "TestInterface");
    assert_eq!(spec.target_name, "internal");
    assert_eq!(spec.origin.module_path, "example.com/fnt/internal");
    assert_eq!(spec.origin.line, 10);
    assert!(spec.origin.file.ends_with("internal/contract.go"));

    let names: Vec<_> = spec.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["PerformRequest", "InterfaceParam", "Alias", "Pointers", "Arrays", "Lookup"]
    );

    let perform = &spec.functions[0];
    assert_eq!(
        perform.params,
        vec![
            ParamDescriptor::new("Context", "context"),
            ParamDescriptor::local("Request"),
            ParamDescriptor::local("int"),
            ParamDescriptor::local("string"),
        ]
    );
    assert_eq!(
        perform.returns,
        vec![ParamDescriptor::local("Response"), ParamDescriptor::local("error")]
    );

    let alias = &spec.functions[2];
    assert_eq!(
        alias.params,
        vec![
            ParamDescriptor::new("Context", "context"),
            ParamDescriptor::new("PackItem", "packmain"),
            ParamDescriptor::new("PackItem", "packmain_1"),
        ]
    );
    assert_eq!(
        alias.returns,
        vec![
            ParamDescriptor::new("PackItem", "packmain"),
            ParamDescriptor::new("PackItem", "packmain_1"),
        ]
    );

    assert_eq!(
        spec.functions[3].params,
        vec![ParamDescriptor::local("*Request"), ParamDescriptor::local("*int")]
    );
    assert_eq!(spec.functions[4].params[0], ParamDescriptor::local("[]*Request"));
    assert_eq!(
        spec.functions[5].params[0],
        ParamDescriptor::local("map[packmain_1.PackItem]*Request")
    );

    let imports: Vec<_> = out
        .imports
        .iter()
        .map(|e| (e.module_path.as_str(), e.short_name.as_str(), e.alias.as_str()))
        .collect();
    assert_eq!(
        imports,
        vec![
            ("context", "context", "context"),
            ("example.com/fnt/packone/packmain", "packmain", "packmain"),
            ("example.com/fnt/packtwo/packmain", "packmain", "packmain_1"),
        ]
    );
}

#[test]
fn test_target_name_override() {
    let tmp = fixture();
    let mut options = ExtractOptions::new(tmp.path(), "TestInterface");
    options.target_name = Some("mocks".into());
    let out = extract(&options).unwrap();
    assert_eq!(out.specification.target_name, "mocks");
}

#[test]
fn test_missing_contract_is_unresolved() {
    let tmp = fixture();
    let err = extract(&ExtractOptions::new(tmp.path(), "Nope")).unwrap_err();
    assert!(matches!(err, Error::UnresolvedContract { ref name, .. } if name == "Nope"));
}

#[test]
fn test_non_interface_type_is_unresolved() {
    let tmp = fixture();
    let err = extract(&ExtractOptions::new(tmp.path(), "Request")).unwrap_err();
    assert!(matches!(err, Error::UnresolvedContract { .. }));
}

#[test]
fn test_function_parameter_fails_extraction() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "go.mod", "module example.com/cb\n");
    write(
        tmp.path(),
        "cb.go",
        indoc! {r#"
            package cb

            type Handler interface {
                Handle(name string, next func() error) error
            }
        "#},
    );
    let err = extract(&ExtractOptions::new(tmp.path(), "Handler")).unwrap_err();
    match err {
        Error::UnsupportedTypeExpression { site, .. } => {
            assert_eq!(site.method, "Handle");
            assert_eq!(site.position, 1);
            assert_eq!(site.name.as_deref(), Some("next"));
        }
        other => panic!("expected UnsupportedTypeExpression, got {other:?}"),
    }
}

#[test]
fn test_embedded_interface_is_skipped() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "go.mod", "module example.com/rw\n");
    write(
        tmp.path(),
        "rw.go",
        indoc! {r#"
            package rw

            import "io"

            type ReadCloser interface {
                io.Reader
                Close() error
            }
        "#},
    );
    let out = extract(&ExtractOptions::new(tmp.path(), "ReadCloser")).unwrap();
    assert_eq!(out.specification.functions.len(), 1);
    assert_eq!(out.specification.functions[0].name, "Close");
    assert!(out.imports.is_empty());
}

#[test]
fn test_configured_module_path_without_go_mod() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "svc/svc.go",
        indoc! {r#"
            package svc

            type Req struct{}

            type Service interface {
                Do(r Req) error
            }
        "#},
    );

    let mut options = ExtractOptions::new(tmp.path(), "Service");
    options.module_path = Some("example.com/cfg".into());
    let out = extract(&options).unwrap();
    assert_eq!(out.specification.origin.module_path, "example.com/cfg/svc");
    assert_eq!(out.specification.functions[0].params[0], ParamDescriptor::local("Req"));
}

#[test]
fn test_undeclared_identifier_is_oracle_failure() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "go.mod", "module example.com/u\n");
    write(
        tmp.path(),
        "u.go",
        "package u\n\ntype U interface {\n\tDo(x Missing)\n}\n",
    );
    let err = extract(&ExtractOptions::new(tmp.path(), "U")).unwrap_err();
    assert!(matches!(err, Error::TypeOracleFailure { ref identifier, .. } if identifier == "Missing"));
}
