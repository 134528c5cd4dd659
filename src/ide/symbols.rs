//! Workspace symbol search.

use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::base::{DocumentId, Span};
use crate::hir::{Compilation, DeclId, DeclKind, MemberOwner};

/// A symbol for the workspace symbol list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolInfo {
    pub name: SmolStr,
    pub kind: DeclKind,
    /// Owning type or global table, for members
    pub container: Option<SmolStr>,
    pub document: DocumentId,
    pub span: Span,
}

/// Globals, named types and named members whose name starts with `query`,
/// ignoring case. An empty query matches everything.
///
/// The token is polled once per candidate; on cancellation the symbols
/// found so far are returned.
///
/// # Returns
/// Matching symbols sorted by name, then document and position.
pub fn workspace_symbols(compilation: &Compilation, query: &str, cancel: &CancellationToken) -> Vec<SymbolInfo> {
    collect_symbols(compilation, query, cancel, |_| {})
}

/// `on_scanned` is called with the number of candidates scanned so far.
fn collect_symbols(
    compilation: &Compilation,
    query: &str,
    cancel: &CancellationToken,
    mut on_scanned: impl FnMut(usize),
) -> Vec<SymbolInfo> {
    let query = query.to_lowercase();
    let matches = |name: &str| name.to_lowercase().starts_with(&query);
    let stub = compilation.stub();

    let candidates = stub
        .globals
        .iter()
        .map(|(_, _, id)| *id)
        .chain(stub.named_types.iter().map(|(_, _, def)| def.decl))
        .chain(stub.members.iter().map(|(_, _, id)| *id));

    let mut results = Vec::new();
    for (scanned, id) in candidates.enumerate() {
        if cancel.is_cancelled() {
            debug!(scanned, found = results.len(), "workspace symbol search cancelled");
            break;
        }
        if let Some(symbol) = symbol_info(compilation, id) {
            if matches(&symbol.name) {
                results.push(symbol);
            }
        }
        on_scanned(scanned + 1);
    }
    results.sort_by(|a, b| {
        (a.name.as_str(), a.document, a.span.start).cmp(&(b.name.as_str(), b.document, b.span.start))
    });
    results
}

fn symbol_info(compilation: &Compilation, id: DeclId) -> Option<SymbolInfo> {
    let decl = compilation.declaration(id)?;
    let container = match &decl.member {
        Some(member) => match &member.owner {
            MemberOwner::Type(name) | MemberOwner::Global(name) => Some(name.clone()),
            // members of anonymous tables are not workspace symbols
            MemberOwner::Element(_) => return None,
        },
        None => None,
    };
    let document = compilation.document(decl.document())?;
    Some(SymbolInfo {
        name: decl.name.clone(),
        kind: decl.kind,
        container,
        document: decl.document(),
        span: document.tree().span(decl.range),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compilation() -> Compilation {
        let mut compilation = Compilation::default();
        compilation.update_document(
            "a.lua",
            "---@class Config\n---@field name string\nlocal x\nconfigure = function() end",
        );
        compilation.update_document("b.lua", "local hidden = { conf = 1 }\nConfigDefaults = {}");
        compilation
    }

    #[test]
    fn test_prefix_match_ignores_case() {
        let compilation = compilation();
        let names: Vec<SmolStr> = workspace_symbols(&compilation, "conf", &CancellationToken::new())
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Config", "ConfigDefaults", "configure"]);
    }

    #[test]
    fn test_members_carry_their_container() {
        let compilation = compilation();
        let symbols = workspace_symbols(&compilation, "name", &CancellationToken::new());
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].container.as_deref(), Some("Config"));
        assert_eq!(symbols[0].kind, DeclKind::Member);
    }

    #[test]
    fn test_cancelled_before_start_returns_nothing() {
        let compilation = compilation();
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(workspace_symbols(&compilation, "", &cancel).is_empty());
    }

    #[test]
    fn test_cancelled_mid_search_returns_partial_results() {
        let compilation = compilation();
        let everything = workspace_symbols(&compilation, "", &CancellationToken::new());

        let cancel = CancellationToken::new();
        let partial = collect_symbols(&compilation, "", &cancel, |scanned| {
            if scanned == 2 {
                cancel.cancel();
            }
        });
        // globals are scanned first: `configure` and `ConfigDefaults`
        let names: Vec<SmolStr> = partial.iter().map(|s| s.name.clone()).collect();
        assert_eq!(names, vec!["ConfigDefaults", "configure"]);
        assert!(everything.len() > partial.len());
        assert!(partial.iter().all(|symbol| everything.contains(symbol)));
    }
}
