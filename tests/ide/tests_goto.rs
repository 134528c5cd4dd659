//! Go-to-definition through the analysis host.

use luna::Span;
use luna::hir::{CompilationConfig, DeclKind};
use luna::ide::AnalysisHost;

use crate::helpers::analysis_helpers::*;
use crate::helpers::source_fixtures::*;

#[test]
fn test_goto_field_through_typed_local() {
    let (host, id) = host_from_source(CLASS_WITH_METHODS);
    let (line, col) = position_of(CLASS_WITH_METHODS, "owner)", 0);

    let analysis = host.analysis();
    let result = analysis.goto_definition(id, line, col);
    assert_eq!(result.targets.len(), 1);
    let target = &result.targets[0];
    assert_eq!(target.name, "owner");
    assert_eq!(target.kind, DeclKind::Member);
    assert_eq!(target.span, Span::from_coords(1, 10, 1, 15));
}

#[test]
fn test_goto_self_member_in_method() {
    let (host, id) = host_from_source(CLASS_WITH_METHODS);
    let (line, col) = position_of(CLASS_WITH_METHODS, "owner\n", 0);

    let analysis = host.analysis();
    let result = analysis.goto_definition(id, line, col);
    assert_eq!(result.targets.len(), 1);
    assert_eq!(result.targets[0].span.start.line, 1);
}

#[test]
fn test_goto_across_required_module() {
    let host = AnalysisHost::new(CompilationConfig::with_root("/ws"));
    let util = host.update_document("/ws/lib/util.lua", MODULE_UTIL);
    let main = host.update_document("/ws/main.lua", MODULE_USER);
    let (line, col) = position_of(MODULE_USER, "trim", 0);

    let analysis = host.analysis();
    let result = analysis.goto_definition(main, line, col);
    assert_eq!(result.targets.len(), 1);
    let target = &result.targets[0];
    assert_eq!(target.document, util);
    assert_eq!(target.name, "trim");
    assert_eq!(target.span.start.line, 4);
}

#[test]
fn test_goto_unresolved_global_is_empty() {
    let (host, id) = host_from_source("print(missing)");
    assert!(host.analysis().goto_definition(id, 0, 8).is_empty());
}
