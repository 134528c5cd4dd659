//! Incremental update tests: a document's Stub contribution must be removed
//! and reinserted exactly, with nothing else rescanned.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use luna::DocumentId;
use luna::hir::{Compilation, DeclId, Match, MemberOwner};
use rstest::rstest;

use crate::helpers::analysis_helpers::*;
use crate::helpers::source_fixtures::*;

/// Entry counts of every Stub index
fn stub_counts(compilation: &Compilation) -> Vec<usize> {
    let stub = compilation.stub();
    vec![
        stub.members.len(),
        stub.named_types.len(),
        stub.globals.len(),
        stub.type_operators.len(),
        stub.supers.len(),
        stub.generic_params.len(),
        stub.methods.len(),
        stub.main_block_returns.len(),
        stub.type_from_id.len(),
        stub.global_owners.len(),
        stub.names.len(),
    ]
}

/// Per index, every key mapped to the sorted values stored under it
type StubSnapshot = BTreeMap<(&'static str, String), Vec<String>>;

fn stub_snapshot(compilation: &Compilation) -> StubSnapshot {
    fn collect<'a, K: fmt::Debug + 'a, V: 'a>(
        snapshot: &mut StubSnapshot,
        index: &'static str,
        entries: impl Iterator<Item = (&'a K, DocumentId, &'a V)>,
        render: impl Fn(DocumentId, &V) -> String,
    ) {
        for (key, document, value) in entries {
            snapshot
                .entry((index, format!("{key:?}")))
                .or_default()
                .push(render(document, value));
        }
    }

    fn debug(document: DocumentId, value: &dyn fmt::Debug) -> String {
        format!("{document:?} {value:?}")
    }

    let stub = compilation.stub();
    let decl = |_: DocumentId, id: &DeclId| {
        let decl = compilation.declaration(*id).unwrap();
        format!("{} {:?} {:?}@{:?}", decl.name, decl.kind, decl.document(), decl.range)
    };

    let mut snapshot = StubSnapshot::new();
    collect(&mut snapshot, "members", stub.members.iter(), decl);
    collect(&mut snapshot, "named_types", stub.named_types.iter(), |d, v| debug(d, v));
    collect(&mut snapshot, "globals", stub.globals.iter(), decl);
    collect(&mut snapshot, "type_operators", stub.type_operators.iter(), |d, v| debug(d, v));
    collect(&mut snapshot, "supers", stub.supers.iter(), |d, v| debug(d, v));
    collect(&mut snapshot, "generic_params", stub.generic_params.iter(), decl);
    collect(&mut snapshot, "methods", stub.methods.iter(), |d, v| debug(d, v));
    collect(&mut snapshot, "main_block_returns", stub.main_block_returns.iter(), |d, v| debug(d, v));
    collect(&mut snapshot, "type_from_id", stub.type_from_id.iter(), |d, v| debug(d, v));
    collect(&mut snapshot, "global_owners", stub.global_owners.iter(), |d, v| debug(d, v));
    collect(&mut snapshot, "names", stub.names.iter(), |d, v| debug(d, v));
    for values in snapshot.values_mut() {
        values.sort();
    }
    snapshot
}

/// Shares keys with the fixtures: the `Account` owner, `print`, `string`
const NEIGHBOUR: &str = "---@class Account\n---@field extra string\nlocal y\n\nShared = {}\nfunction Shared.go() end\nprint(Shared)";

#[rstest]
#[case(CLASS_WITH_METHODS)]
#[case(MODULE_UTIL)]
#[case(GENERIC_FUNCTIONS)]
fn test_remove_and_reindex_restores_stub(#[case] source: &str, #[values(false, true)] neighbour: bool) {
    let mut compilation = Compilation::default();
    compilation.update_document("main.lua", source);
    if neighbour {
        compilation.update_document("neighbour.lua", NEIGHBOUR);
    }
    let before = stub_snapshot(&compilation);

    compilation.update_document("main.lua", "local unrelated = 1");
    assert_ne!(stub_snapshot(&compilation), before);

    // main.lua now re-appends after neighbour.lua's entries
    compilation.update_document("main.lua", source);
    assert_eq!(stub_snapshot(&compilation), before);
}

#[test]
fn test_reindex_keeps_shared_keys_of_other_documents() {
    let mut compilation = compile_all(&[("main.lua", CLASS_WITH_METHODS), ("neighbour.lua", NEIGHBOUR)]);
    let account_members = |compilation: &Compilation| {
        let mut names: Vec<String> = compilation
            .stub()
            .members
            .get(&MemberOwner::Type("Account".into()), Match::All)
            .filter_map(|id| compilation.declaration(*id))
            .map(|decl| decl.name.to_string())
            .collect();
        names.sort();
        // `self.balance = ...` adds a second `balance` site
        names.dedup();
        names
    };
    assert_eq!(account_members(&compilation), vec!["balance", "deposit", "extra", "owner", "report"]);

    compilation.update_document("main.lua", "local unrelated = 1");
    assert_eq!(account_members(&compilation), vec!["extra"]);

    compilation.update_document("main.lua", CLASS_WITH_METHODS);
    assert_eq!(account_members(&compilation), vec!["balance", "deposit", "extra", "owner", "report"]);
}

#[test]
fn test_other_documents_untouched_by_update() {
    let mut compilation = compile_all(&[("a.lua", "Shared = {}"), ("b.lua", "Other = 1")]);
    let a_global = *compilation.stub().globals.first("Shared").unwrap();

    compilation.update_document("b.lua", "Other = 2\nMore = 3");
    assert_eq!(compilation.stub().globals.first("Shared"), Some(&a_global));
    assert_eq!(compilation.stub().globals.get("More", Match::All).count(), 1);
}

#[test]
fn test_reference_count_stable_across_edits() {
    let source = "local hits = 0\nhits = hits + 1\nprint(hits)";
    let (mut compilation, id) = compile(source);
    let count = |compilation: &Compilation| {
        let decl = declared_at(compilation, id, "hits", 0);
        compilation.search().find_references(decl).len()
    };
    let first = count(&compilation);
    assert_eq!(first, 4);

    for _ in 0..3 {
        compilation.update_document("main.lua", source);
        assert_eq!(count(&compilation), first);
    }
}

#[test]
fn test_close_and_reopen_round_trip() {
    let mut compilation = Compilation::default();
    let id = compilation.update_document("lib/util.lua", MODULE_UTIL);
    let before = stub_counts(&compilation);
    assert_eq!(compilation.module_document("lib.util"), Some(id));

    assert_eq!(compilation.remove_document(Path::new("lib/util.lua")), Some(id));
    assert!(compilation.is_empty());
    assert!(compilation.module_document("lib.util").is_none());
    assert!(stub_counts(&compilation).iter().all(|count| *count == 0));

    let reopened = compilation.update_document("lib/util.lua", MODULE_UTIL);
    assert_eq!(reopened, id);
    assert_eq!(compilation.document(id).unwrap().version(), 1);
    assert_eq!(stub_counts(&compilation), before);
}

#[test]
fn test_stale_entries_are_not_found() {
    let mut compilation = compile_all(&[("a.lua", "---@class Point\n---@field x number\nlocal p"), ("b.lua", "---@type Point\nlocal q\nprint(q.x)")]);
    let b = compilation.document_id(Path::new("b.lua")).unwrap();
    assert!(resolve(&compilation, b, "x)", 0).is_some());

    compilation.remove_document(Path::new("a.lua"));
    assert!(resolve(&compilation, b, "x)", 0).is_none());
}
