//! Helpers for setting up compilations and analysis hosts.

use luna::DocumentId;
use luna::hir::{Compilation, DeclId, LuaType};
use luna::ide::AnalysisHost;
use luna::parser::{AstNode, Expr, SyntaxNode};

/// Compiles a single document named `main.lua`, asserting it parses cleanly.
pub fn compile(source: &str) -> (Compilation, DocumentId) {
    let mut compilation = Compilation::default();
    let id = compilation.update_document("main.lua", source);
    let errors = compilation.document(id).unwrap().tree().errors().to_vec();
    assert!(errors.is_empty(), "Parse errors in main.lua: {:?}", errors);
    (compilation, id)
}

/// Compiles several documents in order.
pub fn compile_all(files: &[(&str, &str)]) -> Compilation {
    let mut compilation = Compilation::default();
    for (path, source) in files {
        compilation.update_document(*path, source);
    }
    compilation
}

/// Creates an AnalysisHost with a single document.
pub fn host_from_source(source: &str) -> (AnalysisHost, DocumentId) {
    let host = AnalysisHost::default();
    let id = host.update_document("main.lua", source);
    (host, id)
}

/// Zero-based (line, column) of the `nth` occurrence of `needle`.
pub fn position_of(source: &str, needle: &str, nth: usize) -> (u32, u32) {
    let offset = source
        .match_indices(needle)
        .nth(nth)
        .map(|(offset, _)| offset)
        .unwrap_or_else(|| panic!("occurrence {} of {:?} not found", nth, needle));
    let before = &source[..offset];
    let line = before.matches('\n').count() as u32;
    let col = before.rfind('\n').map_or(offset, |nl| offset - nl - 1) as u32;
    (line, col)
}

/// The name node at the `nth` occurrence of `needle`.
pub fn name_node(compilation: &Compilation, id: DocumentId, needle: &str, nth: usize) -> SyntaxNode {
    let source = compilation.document(id).unwrap().text().to_string();
    let (line, col) = position_of(&source, needle, nth);
    compilation
        .document(id)
        .unwrap()
        .tree()
        .name_node_at(line, col)
        .unwrap_or_else(|| panic!("no name at occurrence {} of {:?}", nth, needle))
}

/// Declaration the `nth` occurrence of `needle` resolves to.
pub fn resolve(compilation: &Compilation, id: DocumentId, needle: &str, nth: usize) -> Option<DeclId> {
    let node = name_node(compilation, id, needle, nth);
    compilation.search().find_declaration(id, &node)
}

/// Declaration introduced at the `nth` occurrence of `needle`.
pub fn declared_at(compilation: &Compilation, id: DocumentId, needle: &str, nth: usize) -> DeclId {
    let source = compilation.document(id).unwrap().text().to_string();
    let offset = source.match_indices(needle).nth(nth).unwrap().0 as u32;
    compilation
        .symbols(id)
        .unwrap()
        .declarations()
        .iter()
        .find(|decl| u32::from(decl.position) == offset)
        .map(|decl| decl.id)
        .unwrap_or_else(|| panic!("nothing declared at occurrence {} of {:?}", nth, needle))
}

/// Inferred type of the expression whose name sits at the `nth`
/// occurrence of `needle`.
pub fn type_at(compilation: &Compilation, id: DocumentId, needle: &str, nth: usize) -> LuaType {
    let node = name_node(compilation, id, needle, nth);
    let expr = Expr::cast(node).expect("name is not an expression");
    compilation.search().infer(id, &expr)
}
