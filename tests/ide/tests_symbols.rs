//! Workspace symbols, type hierarchy and signature help through the host.

use luna::ide::AnalysisHost;
use rstest::rstest;
use tokio_util::sync::CancellationToken;

use crate::helpers::source_fixtures::*;

fn host() -> AnalysisHost {
    let host = AnalysisHost::default();
    host.update_document("account.lua", CLASS_WITH_METHODS);
    host.update_document(
        "shapes.lua",
        "---@class Shape\n---@field area number\n\n---@class Circle: Shape\n\n---@class Square: Shape\nlocal x",
    );
    host
}

#[rstest]
#[case("acc", &["Account"])]
#[case("AREA", &["area"])]
#[case("sq", &["Square"])]
#[case("zzz", &[])]
fn test_workspace_symbol_queries(#[case] query: &str, #[case] expected: &[&str]) {
    let host = host();
    let names: Vec<String> = host
        .analysis()
        .workspace_symbols(query, &CancellationToken::new())
        .into_iter()
        .map(|symbol| symbol.name.to_string())
        .collect();
    assert_eq!(names, expected);
}

#[test]
fn test_methods_are_symbols_of_their_class() {
    let host = host();
    let symbols = host
        .analysis()
        .workspace_symbols("deposit", &CancellationToken::new());
    assert_eq!(symbols.len(), 1);
    assert_eq!(symbols[0].container.as_deref(), Some("Account"));
}

#[test]
fn test_token_cancelled_before_search_returns_nothing() {
    let host = host();
    let cancel = CancellationToken::new();
    let child = cancel.child_token();
    cancel.cancel();
    assert!(host.analysis().workspace_symbols("", &child).is_empty());
}

#[test]
fn test_hierarchy_through_host() {
    let host = host();
    let analysis = host.analysis();
    let children: Vec<String> = analysis
        .subtypes("Shape")
        .into_iter()
        .map(|item| item.name.to_string())
        .collect();
    assert_eq!(children, vec!["Circle", "Square"]);
    assert_eq!(analysis.supertypes("Square")[0].name, "Shape");
    assert!(analysis.supertypes("Shape").is_empty());
}

#[test]
fn test_signature_help_for_colon_call() {
    let source = format!("{CLASS_WITH_METHODS}acct:deposit(5)\n");
    let host = AnalysisHost::default();
    let id = host.update_document("main.lua", &source);
    let line = source.lines().count() as u32 - 1;

    let help = host.analysis().signature_help(id, line, 13).unwrap();
    assert_eq!(help.label, "deposit(amount: number): boolean");
    assert_eq!(help.active_parameter, Some(0));
}
