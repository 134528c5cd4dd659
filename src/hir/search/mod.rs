//! Per-query search context.
//!
//! A [`SearchContext`] borrows the compilation for the duration of one query
//! and memoizes declaration lookups and inferred types. It also carries the
//! recursion guards that keep inference and alias expansion finite on cyclic
//! definitions, and the generic environment stack used by substitution.
//!
//! The query surface is split by concern:
//!
//! - [`declarations`]: `find_declaration`, name lookup, `self`, upvalues
//! - [`infer`]: expression types
//! - [`members`]: member lookup and subtyping
//! - [`references`]: `find_references`

mod declarations;
mod infer;
mod members;
mod references;

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use crate::base::DocumentId;
use crate::parser::SyntaxNode;
use crate::syntax::ElementId;

use super::compilation::Compilation;
use super::declaration::{DeclId, DeclType, Declaration};
use super::stub::{NamedTypeKind, Stub};
use super::symbols::DocumentSymbols;
use super::types::{LuaMethod, LuaType, MethodParam};

/// Generic parameter bindings
pub type GenericEnv = FxHashMap<SmolStr, LuaType>;

/// Switches for one search context
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchFeatures {
    /// Memoize declarations and inferred types for the context's lifetime
    pub cache: bool,
}

impl Default for SearchFeatures {
    fn default() -> Self {
        Self { cache: true }
    }
}

pub struct SearchContext<'a> {
    compilation: &'a Compilation,
    features: SearchFeatures,
    roots: FxHashMap<DocumentId, SyntaxNode>,
    declaration_cache: FxHashMap<ElementId, Option<DeclId>>,
    infer_cache: FxHashMap<ElementId, LuaType>,
    infer_guard: FxHashSet<ElementId>,
    substitute_guard: FxHashSet<SmolStr>,
    env_stack: Vec<GenericEnv>,
}

impl<'a> SearchContext<'a> {
    pub fn new(compilation: &'a Compilation, features: SearchFeatures) -> Self {
        Self {
            compilation,
            features,
            roots: FxHashMap::default(),
            declaration_cache: FxHashMap::default(),
            infer_cache: FxHashMap::default(),
            infer_guard: FxHashSet::default(),
            substitute_guard: FxHashSet::default(),
            env_stack: Vec::new(),
        }
    }

    pub fn compilation(&self) -> &'a Compilation {
        self.compilation
    }

    pub fn features(&self) -> SearchFeatures {
        self.features
    }

    pub fn stub(&self) -> &'a Stub {
        self.compilation.stub()
    }

    pub fn declaration(&self, id: DeclId) -> Option<&'a Declaration> {
        self.compilation.declaration(id)
    }

    pub fn symbols(&self, document: DocumentId) -> Option<&'a DocumentSymbols> {
        self.compilation.symbols(document)
    }

    /// Root node of `document`, built once per context
    pub fn root(&mut self, document: DocumentId) -> Option<SyntaxNode> {
        if let Some(root) = self.roots.get(&document) {
            return Some(root.clone());
        }
        let root = self.compilation.document(document)?.tree().root();
        self.roots.insert(document, root.clone());
        Some(root)
    }

    /// The node an element id points at; `None` if its document is gone
    pub fn node(&mut self, element: ElementId) -> Option<SyntaxNode> {
        let root = self.root(element.document)?;
        element.syntax.to_node(&root)
    }

    /// Declared or inferred type of a declaration
    pub fn decl_type(&mut self, id: DeclId) -> LuaType {
        let Some(decl) = self.declaration(id) else {
            return LuaType::Unknown;
        };
        match &decl.ty {
            DeclType::Unknown => LuaType::Unknown,
            DeclType::Explicit(ty) => ty.clone(),
            DeclType::Expr { expr, index: 0 } => self.infer_element(*expr),
            DeclType::Expr { expr, index } => self
                .infer_element_returns(*expr)
                .get(*index)
                .cloned()
                .unwrap_or(LuaType::Unknown),
        }
    }

    // ========================================================================
    // Substitution
    // ========================================================================

    /// One round of specialization: generic parameters bound in the
    /// environment stack are replaced and aliases are expanded.
    pub fn substitute(&mut self, ty: &LuaType) -> LuaType {
        match ty {
            LuaType::GenericParam(name) => self
                .env_stack
                .iter()
                .rev()
                .find_map(|env| env.get(name))
                .cloned()
                .unwrap_or_else(|| ty.clone()),
            LuaType::Named(name) => {
                let Some(def) = self.stub().named_types.first(name.as_str()) else {
                    return ty.clone();
                };
                match (&def.kind, &def.target) {
                    (NamedTypeKind::Alias, Some(target)) if def.generics.is_empty() => {
                        if !self.substitute_guard.insert(name.clone()) {
                            return ty.clone();
                        }
                        let expanded = self.substitute(target);
                        self.substitute_guard.remove(name);
                        expanded
                    }
                    _ => ty.clone(),
                }
            }
            LuaType::Generic { name, args } => {
                let args: Vec<LuaType> = args.iter().map(|arg| self.substitute(arg)).collect();
                let alias = self
                    .stub()
                    .named_types
                    .first(name.as_str())
                    .filter(|def| def.kind == NamedTypeKind::Alias);
                match alias.and_then(|def| def.target.as_ref().map(|t| (def, t))) {
                    Some((def, target)) => {
                        if !self.substitute_guard.insert(name.clone()) {
                            return ty.clone();
                        }
                        let env = bind_params(&def.generics, &args);
                        let expanded = self.substitute_with(target, env);
                        self.substitute_guard.remove(name);
                        expanded
                    }
                    None => LuaType::Generic {
                        name: name.clone(),
                        args: args.into(),
                    },
                }
            }
            LuaType::Array(element) => LuaType::array(self.substitute(element)),
            LuaType::Union(union) => {
                let members: Vec<LuaType> = union.iter().map(|m| self.substitute(m)).collect();
                LuaType::union_all(members)
            }
            LuaType::Method(method) => {
                if method.params.is_empty() && method.returns.is_empty() {
                    return ty.clone();
                }
                let params = method
                    .params
                    .iter()
                    .map(|param| MethodParam {
                        name: param.name.clone(),
                        ty: self.substitute(&param.ty),
                        nullable: param.nullable,
                    })
                    .collect();
                let returns = method.returns.iter().map(|r| self.substitute(r)).collect();
                LuaType::Method(std::sync::Arc::new(LuaMethod {
                    params,
                    returns,
                    returns_declared: method.returns_declared,
                    generics: method.generics.clone(),
                    colon_define: method.colon_define,
                }))
            }
            LuaType::Unknown | LuaType::Nil | LuaType::TableLiteral(_) => ty.clone(),
        }
    }

    /// Substitute with `env` pushed on top of the environment stack
    pub fn substitute_with(&mut self, ty: &LuaType, env: GenericEnv) -> LuaType {
        self.env_stack.push(env);
        let result = self.substitute(ty);
        self.env_stack.pop();
        result
    }

    /// Depth of the generic environment stack
    pub fn env_depth(&self) -> usize {
        self.env_stack.len()
    }
}

/// Pair declared generic names with arguments
pub(crate) fn bind_params(names: &[SmolStr], args: &[LuaType]) -> GenericEnv {
    names.iter().cloned().zip(args.iter().cloned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(text: &str) -> Compilation {
        let mut compilation = Compilation::default();
        compilation.update_document("main.lua", text);
        compilation
    }

    #[test]
    fn test_alias_expansion() {
        let compilation = compile("---@alias Id integer|string\nlocal x");
        let mut search = compilation.search();
        let expanded = search.substitute(&LuaType::named("Id"));
        assert_eq!(expanded.to_string(), "integer|string");
    }

    #[test]
    fn test_alias_cycle_terminates() {
        let compilation = compile("---@alias A B\n\n---@alias B A\nlocal x");
        let mut search = compilation.search();
        let expanded = search.substitute(&LuaType::named("A"));
        assert_eq!(expanded, LuaType::named("A"));
        assert_eq!(search.env_depth(), 0);
    }

    #[test]
    fn test_generic_alias_instantiation() {
        let compilation = compile("---@alias Pair<T> { first: T, second: T }\n---@alias List<T> T[]\nlocal x");
        let mut search = compilation.search();
        let list = LuaType::Generic {
            name: "List".into(),
            args: vec![LuaType::named("string")].into(),
        };
        assert_eq!(search.substitute(&list).to_string(), "string[]");
        assert_eq!(search.env_depth(), 0);
    }

    #[test]
    fn test_substitute_with_binds_params() {
        let compilation = compile("local x");
        let mut search = compilation.search();
        let env = bind_params(&["T".into()], &[LuaType::named("number")]);
        let ty = LuaType::array(LuaType::GenericParam("T".into()));
        assert_eq!(search.substitute_with(&ty, env).to_string(), "number[]");
        // unbound parameters stay as they are
        let unbound = search.substitute(&LuaType::GenericParam("U".into()));
        assert_eq!(unbound, LuaType::GenericParam("U".into()));
    }
}
