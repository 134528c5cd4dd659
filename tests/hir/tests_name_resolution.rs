//! Name resolution tests for the HIR layer.
//!
//! These tests verify that names resolve through the scope tree the way Lua
//! scoping works, including the statement-level special cases.

use std::path::Path;

use crate::helpers::analysis_helpers::*;

// =============================================================================
// LOCAL STATEMENTS
// =============================================================================

#[test]
fn test_local_initializer_sees_previous_binding() {
    let source = "local x = 1\nlocal x = x\nprint(x)";
    let (compilation, id) = compile(source);

    let outer = declared_at(&compilation, id, "x", 0);
    let inner = declared_at(&compilation, id, "x", 1);
    assert_eq!(resolve(&compilation, id, "x", 2), Some(outer));
    assert_eq!(resolve(&compilation, id, "x", 3), Some(inner));
}

#[test]
fn test_later_local_is_not_visible_earlier() {
    let source = "print(late)\nlocal late = 1";
    let (compilation, id) = compile(source);
    assert_eq!(resolve(&compilation, id, "late", 0), None);
}

#[test]
fn test_block_locals_do_not_leak() {
    let source = "do\n  local inner = 1\nend\nprint(inner)";
    let (compilation, id) = compile(source);
    assert_eq!(resolve(&compilation, id, "inner", 1), None);
}

#[test]
fn test_parameter_shadows_outer_local() {
    let source = "local v = 1\nlocal function f(v)\n  return v\nend";
    let (compilation, id) = compile(source);
    let param = declared_at(&compilation, id, "v", 1);
    assert_eq!(resolve(&compilation, id, "v", 2), Some(param));
}

#[test]
fn test_local_function_resolves_recursively() {
    let source = "local function walk(node)\n  return walk(node)\nend";
    let (compilation, id) = compile(source);
    let walk = declared_at(&compilation, id, "walk", 0);
    assert_eq!(resolve(&compilation, id, "walk", 1), Some(walk));
}

// =============================================================================
// LOOPS
// =============================================================================

#[test]
fn test_repeat_condition_sees_body_locals() {
    let source = "local y = 0\nrepeat\n  local y = 1\nuntil y == 1";
    let (compilation, id) = compile(source);
    let body = declared_at(&compilation, id, "y", 1);
    assert_eq!(resolve(&compilation, id, "y", 2), Some(body));
}

#[test]
fn test_for_header_does_not_see_loop_variable() {
    let source = "local k = 10\nfor k = 1, k do\n  print(k)\nend";
    let (compilation, id) = compile(source);
    let outer = declared_at(&compilation, id, "k", 0);
    let loop_var = declared_at(&compilation, id, "k", 1);
    assert_eq!(resolve(&compilation, id, "k", 2), Some(outer));
    assert_eq!(resolve(&compilation, id, "k", 3), Some(loop_var));
}

#[test]
fn test_for_in_variables_visible_in_body() {
    let source = "local t = {}\nfor key, val in pairs(t) do\n  print(key, val)\nend";
    let (compilation, id) = compile(source);
    let key = declared_at(&compilation, id, "key", 0);
    let val = declared_at(&compilation, id, "val", 0);
    assert_eq!(resolve(&compilation, id, "key", 1), Some(key));
    assert_eq!(resolve(&compilation, id, "val", 1), Some(val));
}

// =============================================================================
// SELF AND UPVALUES
// =============================================================================

#[test]
fn test_self_resolves_to_method_owner() {
    let source = "local Obj = {}\nfunction Obj:get()\n  return self\nend";
    let (compilation, id) = compile(source);
    let obj = declared_at(&compilation, id, "Obj", 0);
    assert_eq!(resolve(&compilation, id, "self", 0), Some(obj));
}

#[test]
fn test_self_outside_method_is_unresolved() {
    let source = "local function f()\n  return self\nend";
    let (compilation, id) = compile(source);
    assert_eq!(resolve(&compilation, id, "self", 0), None);
}

#[test]
fn test_upvalue_only_inside_later_closure() {
    let source = "local count = 0\nlocal function inc()\n  count = count + 1\nend\nprint(count)";
    let (compilation, id) = compile(source);
    let decl = declared_at(&compilation, id, "count", 0);
    let mut search = compilation.search();

    let captured = name_node(&compilation, id, "count", 2);
    assert!(search.is_upvalue(id, &captured, decl));
    let plain = name_node(&compilation, id, "count", 3);
    assert!(!search.is_upvalue(id, &plain, decl));
}

// =============================================================================
// GLOBALS
// =============================================================================

#[test]
fn test_globals_visible_across_documents() {
    let mut compilation = compile_all(&[("a.lua", "Settings = {}"), ("b.lua", "print(Settings)")]);
    let a = compilation.document_id(Path::new("a.lua")).unwrap();
    let b = compilation.document_id(Path::new("b.lua")).unwrap();
    let decl = resolve(&compilation, b, "Settings", 0).unwrap();
    assert_eq!(decl.document, a);

    // closing the defining document makes the reference unresolved
    compilation.remove_document(Path::new("a.lua"));
    assert_eq!(resolve(&compilation, b, "Settings", 0), None);
}

#[test]
fn test_first_assignment_declares_global() {
    let source = "total = 1\ntotal = 2\nprint(total)";
    let (compilation, id) = compile(source);
    let first = declared_at(&compilation, id, "total", 0);
    assert_eq!(resolve(&compilation, id, "total", 1), Some(first));
    assert_eq!(resolve(&compilation, id, "total", 2), Some(first));
}
