//! Type inference and type system tests.

use luna::hir::{Compilation, CompilationConfig, LuaType};
use rstest::rstest;

use crate::helpers::analysis_helpers::*;
use crate::helpers::source_fixtures::*;

fn named(name: &str) -> LuaType {
    LuaType::named(name)
}

// =============================================================================
// UNION MERGE
// =============================================================================

#[test]
fn test_union_merge_order_and_identity() {
    let ab = named("A").union(named("B"));
    let merged = ab.clone().union(named("B").union(named("C")));
    assert_eq!(merged.to_string(), "A|B|C");

    // merging a present member changes nothing
    assert_eq!(merged.clone().union(named("A")), merged);
    // unknown is the identity on both sides
    assert_eq!(LuaType::Unknown.union(ab.clone()), ab);
    assert_eq!(ab.clone().union(LuaType::Unknown), ab);
    // a single member is not wrapped
    assert_eq!(named("A").union(named("A")), named("A"));
}

#[test]
fn test_union_equality_ignores_order() {
    let ab = named("A").union(named("B"));
    let ba = named("B").union(named("A"));
    assert_eq!(ab, ba);
    assert_ne!(ab.to_string(), ba.to_string());
}

// =============================================================================
// EXPRESSIONS
// =============================================================================

#[rstest]
#[case("local v = nil", "nil")]
#[case("local v = true", "boolean")]
#[case("local v = 42", "integer")]
#[case("local v = 4.2", "number")]
#[case("local v = 'a' .. 'b'", "string")]
#[case("local v = 1 < 2", "boolean")]
#[case("local v = #'abc'", "integer")]
#[case("local v = not nil", "boolean")]
#[case("local v = 1 + 2", "number")]
#[case("local v = 1 & 2", "integer")]
#[case("local v = 1 or 'x'", "integer|string")]
#[case("local v = nil and 'x'", "string")]
#[case("local v = (42)", "integer")]
#[case("local v = {}", "table")]
fn test_expression_types(#[case] source: &str, #[case] expected: &str) {
    let source = format!("{source}\nprint(v)");
    let (compilation, id) = compile(&source);
    assert_eq!(type_at(&compilation, id, "v)", 0).to_string(), expected);
}

#[test]
fn test_multiple_returns_assign_by_position() {
    let source = "---@return string, integer\nlocal function pair() end\nlocal s, n = pair()\nprint(s, n)";
    let (compilation, id) = compile(source);
    assert_eq!(type_at(&compilation, id, "s, n)", 0), named("string"));
    assert_eq!(type_at(&compilation, id, "n)", 0), named("integer"));
}

#[test]
fn test_undocumented_function_returns_are_inferred() {
    let source = "local function pick(flag)\n  if flag then\n    return 1\n  end\n  return 'none'\nend\nlocal r = pick(true)\nprint(r)";
    let (compilation, id) = compile(source);
    assert_eq!(type_at(&compilation, id, "r)", 0).to_string(), "integer|string");
}

// =============================================================================
// MEMBERS
// =============================================================================

#[test]
fn test_class_fields_and_methods() {
    let (compilation, id) = compile(CLASS_WITH_METHODS);
    assert_eq!(type_at(&compilation, id, "owner)", 0), named("string"));
    assert_eq!(type_at(&compilation, id, "acct", 1), named("Account"));
}

#[test]
fn test_array_index_yields_element_type() {
    let source = "---@type string[]\nlocal items = {}\nlocal item = items[1]\nprint(item)";
    let (compilation, id) = compile(source);
    assert_eq!(type_at(&compilation, id, "item)", 0), named("string"));
}

#[test]
fn test_generic_class_member_substitution() {
    let source = "---@class Box<T>\n---@field value T\nlocal x\n\n---@type Box<integer>\nlocal b\nlocal inner = b.value\nprint(inner)";
    let (compilation, id) = compile(source);
    assert_eq!(type_at(&compilation, id, "inner)", 0), named("integer"));
}

// =============================================================================
// GENERICS, ALIASES, OPERATORS
// =============================================================================

#[test]
fn test_generic_call_substitution() {
    let (compilation, id) = compile(GENERIC_FUNCTIONS);
    assert_eq!(type_at(&compilation, id, "head)", 0), named("string"));
}

#[test]
fn test_generic_binding_through_table_type() {
    let source = format!(
        "{GENERIC_FUNCTIONS}\n---@type table<string, integer>\nlocal scores = {{}}\nlocal got = get(scores, 'a')\nprint(got)"
    );
    let (compilation, id) = compile(&source);
    assert_eq!(type_at(&compilation, id, "got)", 0), named("integer"));
}

#[test]
fn test_alias_cycle_terminates() {
    let source = "---@alias A B\n\n---@alias B A\n\n---@type A\nlocal v\nprint(v.field)";
    let (compilation, id) = compile(source);
    assert_eq!(type_at(&compilation, id, "v.", 0), named("A"));
    assert!(type_at(&compilation, id, "field", 0).is_unknown());
}

#[test]
fn test_alias_expands_for_member_lookup() {
    let source = "---@class Point\n---@field x number\nlocal p\n\n---@alias Location Point\n\n---@type Location\nlocal here\nprint(here.x)";
    let (compilation, id) = compile(source);
    assert_eq!(type_at(&compilation, id, "x)", 0), named("number"));
}

#[test]
fn test_operator_overloads() {
    let source = "---@class Vec\n---@operator add(Vec): Vec\n---@operator unm: Vec\nlocal Vec = {}\n\n---@type Vec\nlocal a\nlocal sum = a + a\nlocal neg = -a\nprint(sum, neg)";
    let (compilation, id) = compile(source);
    assert_eq!(type_at(&compilation, id, "sum,", 0), named("Vec"));
    assert_eq!(type_at(&compilation, id, "neg)", 0), named("Vec"));
}

// =============================================================================
// REQUIRE
// =============================================================================

#[test]
fn test_require_returns_module_value() {
    let mut compilation = Compilation::new(CompilationConfig::with_root("/ws"));
    compilation.update_document("/ws/lib/util.lua", MODULE_UTIL);
    let main = compilation.update_document("/ws/main.lua", MODULE_USER);
    assert_eq!(type_at(&compilation, main, "out)", 0), named("string"));
}

#[test]
fn test_shadowed_require_is_not_module_lookup() {
    let mut compilation = compile_all(&[("lib/util.lua", MODULE_UTIL)]);
    let main = compilation.update_document(
        "main.lua",
        "local function require(name) return 1 end\nlocal m = require('lib.util')\nprint(m)",
    );
    assert_eq!(type_at(&compilation, main, "m)", 0), named("integer"));
}
