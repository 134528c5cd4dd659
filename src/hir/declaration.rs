//! Declarations: named, positioned bindings produced by the indexer.

use smol_str::SmolStr;

use crate::base::{DocumentId, TextRange, TextSize};
use crate::syntax::{ElementId, SyntaxId};

use super::scope::ScopeId;
use super::stub::MemberOwner;
use super::types::{IndexKey, LuaType};

/// Identifier of a declaration: its document and its index in that document's
/// declaration table. Stable for one version of the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeclId {
    pub document: DocumentId,
    pub index: u32,
}

impl DeclId {
    pub fn new(document: DocumentId, index: u32) -> Self {
        Self { document, index }
    }
}

/// What introduced a declaration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Local,
    Global,
    Parameter,
    Member,
    TypeDef,
    GenericParam,
}

/// Symbol feature used by name lookup. Parameters look like locals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolFeature {
    Local,
    Global,
    Member,
    Type,
}

impl DeclKind {
    pub fn feature(self) -> SymbolFeature {
        match self {
            DeclKind::Local | DeclKind::Parameter => SymbolFeature::Local,
            DeclKind::Global => SymbolFeature::Global,
            DeclKind::Member => SymbolFeature::Member,
            DeclKind::TypeDef | DeclKind::GenericParam => SymbolFeature::Type,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeclKind::Local => "local",
            DeclKind::Global => "global",
            DeclKind::Parameter => "parameter",
            DeclKind::Member => "member",
            DeclKind::TypeDef => "type",
            DeclKind::GenericParam => "generic",
        }
    }
}

/// How a declaration's type is obtained.
///
/// Expression-backed types are evaluated lazily by the search context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclType {
    Unknown,
    Explicit(LuaType),
    /// The `index`-th value produced by `expr`
    Expr { expr: ElementId, index: usize },
}

/// Owner and key of a member declaration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberInfo {
    pub owner: MemberOwner,
    pub key: IndexKey,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub id: DeclId,
    pub name: SmolStr,
    pub kind: DeclKind,
    /// Offset of the name token
    pub position: TextSize,
    /// Range of the name (or of the whole site when it has no name token)
    pub range: TextRange,
    /// The node that introduced the declaration
    pub site: SyntaxId,
    /// Enclosing scope; `None` for declarations that live only in doc comments
    pub scope: Option<ScopeId>,
    pub ty: DeclType,
    pub member: Option<MemberInfo>,
    /// `---@field private x` style visibility
    pub visibility: Option<SmolStr>,
}

impl Declaration {
    pub fn document(&self) -> DocumentId {
        self.id.document
    }

    pub fn feature(&self) -> SymbolFeature {
        self.kind.feature()
    }

    pub fn element(&self) -> ElementId {
        ElementId {
            document: self.id.document,
            syntax: self.site,
        }
    }

    pub fn is_member(&self) -> bool {
        self.kind == DeclKind::Member
    }
}
