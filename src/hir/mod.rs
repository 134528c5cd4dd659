//! High-level IR (HIR): the semantic model.
//!
//! Each document is indexed once per version into a [`DocumentSymbols`]
//! table (declarations and scope tree) plus entries in the workspace-wide
//! [`Stub`]. Queries then run on a short-lived [`SearchContext`], which
//! resolves names and infers types lazily on top of those tables.
//!
//! ## Layers
//!
//! ```text
//! update_document(path, text)  ← INPUT: full document text
//!     │
//!     ▼
//! LuaSyntaxTree::parse         ← lossless CST (per document)
//!     │
//!     ▼
//! index_document               ← declarations, scopes, Stub entries
//!     │
//!     ▼
//! SearchContext                ← find_declaration, infer, find_member,
//!                                find_references (per query, cached)
//! ```

mod compilation;
mod declaration;
mod index;
mod scope;
mod search;
mod stub;
mod symbols;
mod types;

pub use compilation::{Compilation, CompilationConfig, Document};
pub use declaration::{DeclId, DeclKind, DeclType, Declaration, MemberInfo, SymbolFeature};
pub use index::index_document;
pub use scope::{ScopeChild, ScopeId, ScopeKind, ScopeTree};
pub use search::{GenericEnv, SearchContext, SearchFeatures};
pub use stub::{
    Match, MemberOwner, NamedTypeDef, NamedTypeKind, Stub, StubIndex, TypeOperator,
};
pub use symbols::DocumentSymbols;
pub use types::{IndexKey, LuaMethod, LuaType, LuaUnion, MethodParam};
