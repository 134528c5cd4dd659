//! Find-references through the analysis host.

use luna::hir::CompilationConfig;
use luna::ide::AnalysisHost;

use crate::helpers::analysis_helpers::*;
use crate::helpers::source_fixtures::*;

#[test]
fn test_field_references_include_doc_site() {
    let (host, id) = host_from_source(CLASS_WITH_METHODS);
    let (line, col) = position_of(CLASS_WITH_METHODS, "owner)", 0);

    let analysis = host.analysis();
    let result = analysis.find_references(id, line, col, true);
    // `---@field owner`, `self.owner`, `acct.owner`
    assert_eq!(result.len(), 3);
    assert!(result.references[0].is_definition);
    assert_eq!(result.references[0].span.start.line, 1);

    let uses = analysis.find_references(id, line, col, false);
    assert_eq!(uses.len(), 2);
}

#[test]
fn test_module_member_references_span_documents() {
    let host = AnalysisHost::new(CompilationConfig::with_root("/ws"));
    let util = host.update_document("/ws/lib/util.lua", MODULE_UTIL);
    let main = host.update_document("/ws/main.lua", MODULE_USER);
    let (line, col) = position_of(MODULE_USER, "trim", 0);

    let analysis = host.analysis();
    let result = analysis.find_references(main, line, col, true);
    let documents: Vec<_> = result.references.iter().map(|r| r.document).collect();
    assert_eq!(documents, vec![util, main]);
}

#[test]
fn test_references_follow_edits() {
    let (host, id) = host_from_source("local n = 1\nprint(n)");
    assert_eq!(host.analysis().find_references(id, 1, 6, true).len(), 2);

    host.update_document("main.lua", "local n = 1\nprint(n)\nprint(n)");
    assert_eq!(host.analysis().find_references(id, 1, 6, true).len(), 3);
}

#[test]
fn test_references_on_whitespace_are_empty() {
    let (host, id) = host_from_source("local n = 1\n\nprint(n)");
    assert!(host.analysis().find_references(id, 1, 0, true).is_empty());
}
