//! Document indexing: one pass over a parsed document that builds its scope
//! tree and declarations and appends its entries to the Stub.
//!
//! Doc comments are processed in block order, before the statement they
//! document, and leave a [`DocInfo`] behind for that statement. Member owners
//! of `a.b = ...` assignments are resolved here, from what was declared
//! earlier in the same document; anything left unresolved becomes a
//! `Global` owner so other documents can still contribute to it.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::base::{DocumentId, TextRange};
use crate::parser::{
    AssignStat, AstNode, ClosureExpr, DocComment, DocFieldKey, DocGenericDecl, DocTag,
    DocTagField, DocType, Expr, ForRangeStat, ForStat, FuncStat, IndexExpr, IndexKeySyntax,
    LiteralKind, LocalFuncStat, LocalStat, RepeatStat, SourceFile, SyntaxKind, SyntaxNode,
    SyntaxToken, TableField,
};
use crate::syntax::{ElementId, LuaSyntaxTree, SyntaxId, name_text};

use super::declaration::{DeclId, DeclKind, DeclType, Declaration, MemberInfo};
use super::scope::{ScopeId, ScopeKind};
use super::stub::{MemberOwner, NamedTypeDef, NamedTypeKind, Stub, TypeOperator};
use super::symbols::DocumentSymbols;
use super::types::{IndexKey, LuaMethod, LuaType, MethodParam};

/// Index `tree` as `document`, appending its Stub entries to `stub`.
pub fn index_document(document: DocumentId, tree: &LuaSyntaxTree, stub: &mut Stub) -> DocumentSymbols {
    let root = tree.root();
    let mut indexer = Indexer::new(document, stub, &root);
    indexer.index(&root);
    indexer.symbols
}

/// What a doc comment says about the statement or field it documents
#[derive(Debug, Default)]
struct DocInfo {
    class: Option<SmolStr>,
    types: Vec<LuaType>,
    params: FxHashMap<SmolStr, (LuaType, bool)>,
    returns: Vec<LuaType>,
    has_returns: bool,
    generics: Vec<SmolStr>,
}

impl DocInfo {
    /// Type the documented binding at `index` is declared with
    fn declared_type(&self, index: usize) -> Option<LuaType> {
        if index == 0 {
            if let Some(class) = &self.class {
                return Some(LuaType::Named(class.clone()));
            }
        }
        self.types.get(index).cloned()
    }
}

/// Declaration payload before it gets an id
struct NewDecl {
    name: SmolStr,
    range: TextRange,
    kind: DeclKind,
    ty: DeclType,
    member: Option<MemberInfo>,
    visibility: Option<SmolStr>,
}

struct Indexer<'a> {
    document: DocumentId,
    stub: &'a mut Stub,
    symbols: DocumentSymbols,
    scope: ScopeId,
    /// Owner `self` stands for, per enclosing closure
    self_owners: Vec<Option<MemberOwner>>,
    pending_docs: FxHashMap<SyntaxId, DocInfo>,
    bound_classes: FxHashMap<SyntaxId, SmolStr>,
    decl_owners: FxHashMap<DeclId, MemberOwner>,
    member_owners: FxHashMap<(MemberOwner, SmolStr), MemberOwner>,
    globals_seen: FxHashMap<SmolStr, DeclId>,
}

impl<'a> Indexer<'a> {
    fn new(document: DocumentId, stub: &'a mut Stub, root: &SyntaxNode) -> Self {
        let symbols = DocumentSymbols::new(document, root.text_range().start());
        let scope = symbols.scopes.root();
        Self {
            document,
            stub,
            symbols,
            scope,
            self_owners: Vec::new(),
            pending_docs: FxHashMap::default(),
            bound_classes: FxHashMap::default(),
            decl_owners: FxHashMap::default(),
            member_owners: FxHashMap::default(),
            globals_seen: FxHashMap::default(),
        }
    }

    fn index(&mut self, root: &SyntaxNode) {
        let block = SourceFile::cast(root.clone()).and_then(|file| file.block());
        for child in root.children() {
            if block.as_ref().is_some_and(|b| b.syntax() == &child) {
                // the chunk's block is the root scope itself
                let root_scope = self.symbols.scopes.root();
                self.symbols.scope_by_node.insert(SyntaxId::new(&child), root_scope);
                self.visit_children(&child);
            } else {
                self.visit_node(&child);
            }
        }
        if let Some(ret) = block.and_then(|b| b.return_stat()) {
            let exprs = ret.exprs().map(|e| self.element(e.syntax())).collect();
            self.stub.main_block_returns.add(self.document, self.document, exprs);
        }
        self.index_names(root);
    }

    /// Every name-bearing node is a reference candidate
    fn index_names(&mut self, root: &SyntaxNode) {
        for node in root.descendants() {
            if let Some(name) = name_text(&node) {
                let element = self.element(&node);
                self.stub.names.add(self.document, SmolStr::new(name), element);
            }
        }
    }

    fn element(&self, node: &SyntaxNode) -> ElementId {
        ElementId::new(self.document, node)
    }

    // ========================================================================
    // Declarations and scopes
    // ========================================================================

    fn declare(&mut self, site: &SyntaxNode, new: NewDecl, in_scope: bool) -> DeclId {
        let id = DeclId::new(self.document, self.symbols.declarations.len() as u32);
        let position = new.range.start();
        let scope = in_scope.then_some(self.scope);
        self.symbols.declarations.push(Declaration {
            id,
            name: new.name,
            kind: new.kind,
            position,
            range: new.range,
            site: SyntaxId::new(site),
            scope,
            ty: new.ty,
            member: new.member,
            visibility: new.visibility,
        });
        self.symbols.decl_by_site.insert(SyntaxId::new(site), id);
        if let Some(scope) = scope {
            self.symbols.scopes.add_declaration(scope, id, position);
        }
        id
    }

    /// Declare a binding named by `token`, visible by name lookup
    fn declare_binding(
        &mut self,
        site: &SyntaxNode,
        token: &SyntaxToken,
        kind: DeclKind,
        ty: DeclType,
    ) -> DeclId {
        let new = NewDecl {
            name: SmolStr::new(token.text()),
            range: token.text_range(),
            kind,
            ty,
            member: None,
            visibility: None,
        };
        self.declare(site, new, true)
    }

    fn declare_member(
        &mut self,
        site: &SyntaxNode,
        range: TextRange,
        owner: MemberOwner,
        key: IndexKey,
        ty: DeclType,
        visibility: Option<SmolStr>,
    ) -> DeclId {
        let new = NewDecl {
            name: SmolStr::new(key.to_string()),
            range,
            kind: DeclKind::Member,
            ty,
            member: Some(MemberInfo {
                owner: owner.clone(),
                key,
            }),
            visibility,
        };
        let id = self.declare(site, new, false);
        self.stub.members.add(self.document, owner, id);
        id
    }

    fn push_scope(&mut self, kind: ScopeKind, node: &SyntaxNode) -> ScopeId {
        let scope = self
            .symbols
            .scopes
            .add_scope(self.scope, kind, node.text_range().start());
        self.symbols.scope_by_node.insert(SyntaxId::new(node), scope);
        std::mem::replace(&mut self.scope, scope)
    }

    fn pop_scope(&mut self, previous: ScopeId) {
        self.scope = previous;
    }

    /// Name lookup against what has been declared so far
    fn resolve_name(&self, name: &str, node: &SyntaxNode) -> Option<DeclId> {
        self.symbols
            .find_name(self.scope, node.text_range().start(), name)
    }

    fn take_doc(&mut self, node: &SyntaxNode) -> DocInfo {
        self.pending_docs.remove(&SyntaxId::new(node)).unwrap_or_default()
    }

    // ========================================================================
    // Member owners
    // ========================================================================

    fn bind_class(&mut self, table: &SyntaxNode, class: &SmolStr) {
        self.bound_classes.insert(SyntaxId::new(table), class.clone());
        let element = self.element(table);
        self.stub.type_from_id.add(self.document, element, class.clone());
    }

    fn table_owner(&self, table: &SyntaxNode) -> MemberOwner {
        match self.bound_classes.get(&SyntaxId::new(table)) {
            Some(class) => MemberOwner::Type(class.clone()),
            None => MemberOwner::Element(self.element(table)),
        }
    }

    /// Owner implied for a binding by its doc type or its initial value
    fn owner_hint(&self, declared: Option<&LuaType>, value: Option<&Expr>) -> Option<MemberOwner> {
        if let Some(name) = declared.and_then(|ty| ty.without_nil().type_name().cloned()) {
            return Some(MemberOwner::Type(name));
        }
        match value {
            Some(Expr::Table(table)) => Some(self.table_owner(table.syntax())),
            _ => None,
        }
    }

    /// Owner of the table an expression evaluates to, as far as the indexer
    /// can tell.
    fn owner_of(&self, expr: &Expr) -> Option<MemberOwner> {
        match expr {
            Expr::Name(name) => {
                let token = name.name_token()?;
                let text = token.text();
                if text == "self" {
                    return self.self_owners.last().cloned().flatten();
                }
                match self.resolve_name(text, name.syntax()) {
                    Some(id) => {
                        let decl = self.symbols.declaration(id)?;
                        if decl.kind == DeclKind::Global {
                            Some(MemberOwner::Global(decl.name.clone()))
                        } else {
                            self.decl_owners.get(&id).cloned()
                        }
                    }
                    None => Some(MemberOwner::Global(SmolStr::new(text))),
                }
            }
            Expr::Index(index) => {
                let owner = self.owner_of(&index.prefix()?)?;
                let key = index.name_token()?;
                self.member_owners
                    .get(&(owner, SmolStr::new(key.text())))
                    .cloned()
            }
            Expr::Paren(paren) => self.owner_of(&paren.inner()?),
            _ => None,
        }
    }

    fn index_key(&self, index: &IndexExpr) -> Option<(IndexKey, TextRange)> {
        match index.key()? {
            IndexKeySyntax::Name(token) => {
                Some((IndexKey::String(SmolStr::new(token.text())), token.text_range()))
            }
            IndexKeySyntax::Expr(expr) => {
                literal_key(&expr).map(|key| (key, expr.syntax().text_range()))
            }
        }
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    fn visit_children(&mut self, node: &SyntaxNode) {
        for child in node.children() {
            self.visit_node(&child);
        }
    }

    fn visit_node(&mut self, node: &SyntaxNode) {
        match node.kind() {
            SyntaxKind::BLOCK => self.visit_block(node),
            SyntaxKind::DOC_COMMENT => self.visit_doc_comment(node),
            SyntaxKind::LOCAL_STAT => self.visit_local_stat(node),
            SyntaxKind::LOCAL_FUNC_STAT => self.visit_local_func_stat(node),
            SyntaxKind::FUNC_STAT => self.visit_func_stat(node),
            SyntaxKind::ASSIGN_STAT => self.visit_assign_stat(node),
            SyntaxKind::FOR_STAT => self.visit_for_stat(node),
            SyntaxKind::FOR_RANGE_STAT => self.visit_for_range_stat(node),
            SyntaxKind::REPEAT_STAT => self.visit_repeat_stat(node),
            SyntaxKind::CLOSURE_EXPR => self.visit_closure(node, None, &DocInfo::default(), false),
            SyntaxKind::TABLE_EXPR => self.visit_table(node),
            _ => self.visit_children(node),
        }
    }

    fn visit_block(&mut self, node: &SyntaxNode) {
        let previous = self.push_scope(ScopeKind::Block, node);
        self.visit_children(node);
        self.pop_scope(previous);
    }

    /// Visit a value, handing the documenting comment to a closure
    fn visit_value(&mut self, value: &Expr, doc: &DocInfo) {
        match value {
            Expr::Closure(closure) => self.visit_closure(closure.syntax(), None, doc, false),
            other => self.visit_node(other.syntax()),
        }
    }

    fn visit_local_stat(&mut self, node: &SyntaxNode) {
        let Some(stat) = LocalStat::cast(node.clone()) else {
            return;
        };
        let doc = self.take_doc(node);
        let values = stat.values();
        if let (Some(class), Some(Expr::Table(table))) = (&doc.class, values.first()) {
            self.bind_class(table.syntax(), class);
        }

        let previous = self.push_scope(ScopeKind::LocalStat, node);
        for (i, name) in stat.local_names().enumerate() {
            let Some(token) = name.name_token() else {
                continue;
            };
            let declared = doc.declared_type(i);
            let ty = match &declared {
                Some(ty) => DeclType::Explicit(ty.clone()),
                None => value_type(&values, i, self.document),
            };
            let id = self.declare_binding(name.syntax(), &token, DeclKind::Local, ty);
            if let Some(owner) = self.owner_hint(declared.as_ref(), values.get(i)) {
                self.decl_owners.insert(id, owner);
            }
        }
        for (i, value) in values.iter().enumerate() {
            if i == 0 {
                self.visit_value(value, &doc);
            } else {
                self.visit_node(value.syntax());
            }
        }
        self.pop_scope(previous);
    }

    fn visit_local_func_stat(&mut self, node: &SyntaxNode) {
        let Some(stat) = LocalFuncStat::cast(node.clone()) else {
            return;
        };
        let doc = self.take_doc(node);
        let closure = stat.closure();
        // declared before the body so recursion resolves
        if let Some((name, token)) = stat
            .local_name()
            .and_then(|name| name.name_token().map(|token| (name, token)))
        {
            let ty = closure_type(closure.as_ref(), self.document);
            self.declare_binding(name.syntax(), &token, DeclKind::Local, ty);
        }
        if let Some(closure) = closure {
            self.visit_closure(closure.syntax(), None, &doc, false);
        }
    }

    fn visit_func_stat(&mut self, node: &SyntaxNode) {
        let Some(stat) = FuncStat::cast(node.clone()) else {
            return;
        };
        let doc = self.take_doc(node);
        let closure = stat.closure();
        let ty = closure_type(closure.as_ref(), self.document);
        let mut self_owner = None;
        match stat.name() {
            Some(Expr::Name(name)) => {
                if let Some(token) = name.name_token() {
                    self.assign_global(name.syntax(), &token, ty, None);
                }
            }
            Some(Expr::Index(index)) => {
                let owner = index.prefix().and_then(|prefix| self.owner_of(&prefix));
                if index.is_colon() {
                    self_owner = owner.clone();
                }
                if let (Some(owner), Some((key, range))) = (owner, self.index_key(&index)) {
                    self.declare_member(index.syntax(), range, owner, key, ty, None);
                }
            }
            _ => {}
        }
        if let Some(closure) = closure {
            self.visit_closure(closure.syntax(), self_owner, &doc, stat.is_method());
        }
    }

    /// Assignment to a plain name: the first assignment to a name that does
    /// not resolve declares a global; later ones are references.
    fn assign_global(
        &mut self,
        site: &SyntaxNode,
        token: &SyntaxToken,
        ty: DeclType,
        owner: Option<MemberOwner>,
    ) {
        let name = SmolStr::new(token.text());
        let resolved = self.resolve_name(&name, site);
        let is_global = match resolved {
            Some(id) => self
                .symbols
                .declaration(id)
                .is_some_and(|decl| decl.kind == DeclKind::Global),
            None => true,
        };
        if !is_global {
            return;
        }
        if let Some(owner) = owner {
            self.stub.global_owners.add(self.document, owner, name.clone());
        }
        if resolved.is_some() || self.globals_seen.contains_key(&name) {
            return;
        }
        let id = self.declare_binding(site, token, DeclKind::Global, ty);
        self.stub.globals.add(self.document, name.clone(), id);
        self.globals_seen.insert(name, id);
    }

    fn visit_assign_stat(&mut self, node: &SyntaxNode) {
        let Some(stat) = AssignStat::cast(node.clone()) else {
            return;
        };
        let doc = self.take_doc(node);
        let targets = stat.targets();
        let values = stat.values();
        if let (Some(class), Some(Expr::Table(table))) = (&doc.class, values.first()) {
            self.bind_class(table.syntax(), class);
        }

        for (i, target) in targets.iter().enumerate() {
            let declared = doc.declared_type(i);
            let ty = match &declared {
                Some(ty) => DeclType::Explicit(ty.clone()),
                None => value_type(&values, i, self.document),
            };
            let hint = self.owner_hint(declared.as_ref(), values.get(i));
            match target {
                Expr::Name(name) => {
                    if let Some(token) = name.name_token() {
                        self.assign_global(name.syntax(), &token, ty, hint);
                    }
                }
                Expr::Index(index) => {
                    let owner = index.prefix().and_then(|prefix| self.owner_of(&prefix));
                    if let (Some(owner), Some((key, range))) = (owner, self.index_key(index)) {
                        if let (IndexKey::String(name), Some(hint)) = (&key, hint) {
                            self.member_owners.insert((owner.clone(), name.clone()), hint);
                        }
                        self.declare_member(index.syntax(), range, owner, key, ty, None);
                    }
                    self.visit_children(index.syntax());
                }
                other => self.visit_node(other.syntax()),
            }
        }
        for (i, value) in values.iter().enumerate() {
            if i == 0 {
                self.visit_value(value, &doc);
            } else {
                self.visit_node(value.syntax());
            }
        }
    }

    fn visit_for_stat(&mut self, node: &SyntaxNode) {
        let Some(stat) = ForStat::cast(node.clone()) else {
            return;
        };
        let previous = self.push_scope(ScopeKind::ForRange, node);
        let exprs = stat.exprs();
        if let Some((var, token)) = stat.var().and_then(|v| v.name_token().map(|t| (v, t))) {
            let ty = value_type(&exprs, 0, self.document);
            self.declare_binding(var.syntax(), &token, DeclKind::Local, ty);
        }
        for expr in &exprs {
            self.visit_node(expr.syntax());
        }
        if let Some(block) = stat.block() {
            self.visit_block(block.syntax());
        }
        self.pop_scope(previous);
    }

    fn visit_for_range_stat(&mut self, node: &SyntaxNode) {
        let Some(stat) = ForRangeStat::cast(node.clone()) else {
            return;
        };
        let previous = self.push_scope(ScopeKind::ForRange, node);
        for var in stat.vars() {
            if let Some(token) = var.name_token() {
                self.declare_binding(var.syntax(), &token, DeclKind::Local, DeclType::Unknown);
            }
        }
        for expr in stat.exprs() {
            self.visit_node(expr.syntax());
        }
        if let Some(block) = stat.block() {
            self.visit_block(block.syntax());
        }
        self.pop_scope(previous);
    }

    fn visit_repeat_stat(&mut self, node: &SyntaxNode) {
        let Some(stat) = RepeatStat::cast(node.clone()) else {
            return;
        };
        let previous = self.push_scope(ScopeKind::Repeat, node);
        // the body must be the first child scope
        if let Some(block) = stat.block() {
            self.visit_block(block.syntax());
        }
        if let Some(condition) = stat.condition() {
            self.visit_node(condition.syntax());
        }
        self.pop_scope(previous);
    }

    fn visit_closure(
        &mut self,
        node: &SyntaxNode,
        self_owner: Option<MemberOwner>,
        doc: &DocInfo,
        colon_define: bool,
    ) {
        let Some(closure) = ClosureExpr::cast(node.clone()) else {
            return;
        };
        let previous = self.push_scope(ScopeKind::Block, node);
        self.self_owners.push(self_owner);

        let mut params = Vec::new();
        for param in closure.params() {
            let Some(token) = param.name_token() else {
                continue;
            };
            let name = SmolStr::new(token.text());
            let (ty, nullable) = doc
                .params
                .get(&name)
                .cloned()
                .unwrap_or((LuaType::Unknown, false));
            let decl_ty = if ty.is_unknown() {
                DeclType::Unknown
            } else {
                DeclType::Explicit(ty.clone())
            };
            self.declare_binding(param.syntax(), &token, DeclKind::Parameter, decl_ty);
            params.push(MethodParam { name, ty, nullable });
        }
        let method = LuaMethod {
            params,
            returns: doc.returns.clone(),
            returns_declared: doc.has_returns,
            generics: doc.generics.clone(),
            colon_define,
        };
        let element = self.element(node);
        self.stub.methods.add(self.document, element, Arc::new(method));

        if let Some(block) = closure.block() {
            self.visit_block(block.syntax());
        }
        self.self_owners.pop();
        self.pop_scope(previous);
    }

    fn visit_table(&mut self, node: &SyntaxNode) {
        let owner = self.table_owner(node);
        let mut positional = 0;
        for child in node.children() {
            match child.kind() {
                SyntaxKind::TABLE_FIELD => self.visit_table_field(&child, &owner, &mut positional),
                _ => self.visit_node(&child),
            }
        }
    }

    fn visit_table_field(&mut self, node: &SyntaxNode, owner: &MemberOwner, positional: &mut i64) {
        let Some(field) = TableField::cast(node.clone()) else {
            return;
        };
        let doc = self.take_doc(node);
        let value = field.value();
        if let (Some(class), Some(Expr::Table(table))) = (&doc.class, &value) {
            self.bind_class(table.syntax(), class);
        }

        let key = if let Some(token) = field.name_token() {
            Some((IndexKey::String(SmolStr::new(token.text())), token.text_range()))
        } else if field.is_positional() {
            *positional += 1;
            let range = value
                .as_ref()
                .map_or(node.text_range(), |v| v.syntax().text_range());
            Some((IndexKey::Integer(*positional), range))
        } else {
            field
                .key_expr()
                .and_then(|expr| literal_key(&expr).map(|key| (key, expr.syntax().text_range())))
        };

        if let Some((key, range)) = key {
            let declared = doc.declared_type(0);
            let ty = match (&declared, &value) {
                (Some(ty), _) => DeclType::Explicit(ty.clone()),
                (None, Some(value)) => DeclType::Expr {
                    expr: self.element(value.syntax()),
                    index: 0,
                },
                (None, None) => DeclType::Unknown,
            };
            if let (IndexKey::String(name), Some(hint)) =
                (&key, self.owner_hint(declared.as_ref(), value.as_ref()))
            {
                self.member_owners.insert((owner.clone(), name.clone()), hint);
            }
            self.declare_member(node, range, owner.clone(), key, ty, None);
        }

        if let Some(key_expr) = field.key_expr() {
            self.visit_node(key_expr.syntax());
        }
        if let Some(value) = value {
            self.visit_value(&value, &doc);
        }
    }

    // ========================================================================
    // Doc comments
    // ========================================================================

    fn visit_doc_comment(&mut self, node: &SyntaxNode) {
        let Some(comment) = DocComment::cast(node.clone()) else {
            return;
        };
        // generic names declared anywhere in the comment are in scope for
        // every type in it
        let generics: Vec<SmolStr> = node
            .descendants()
            .filter_map(DocGenericDecl::cast)
            .filter_map(|decl| decl.name_token())
            .map(|token| SmolStr::new(token.text()))
            .collect();

        let mut info = DocInfo::default();
        let mut current_class: Option<SmolStr> = None;
        for tag in comment.tags() {
            match tag {
                DocTag::Class(class) => {
                    let supers = class.supers();
                    current_class = self.define_type(
                        class.syntax(),
                        class.name_token(),
                        NamedTypeKind::Class,
                        class.generic_decls(),
                        &supers,
                        None,
                        &generics,
                    );
                    info.class = current_class.clone();
                }
                DocTag::Interface(interface) => {
                    let supers = interface.supers();
                    current_class = self.define_type(
                        interface.syntax(),
                        interface.name_token(),
                        NamedTypeKind::Interface,
                        interface.generic_decls(),
                        &supers,
                        None,
                        &generics,
                    );
                    info.class = current_class.clone();
                }
                DocTag::Enum(enumeration) => {
                    current_class = self.define_type(
                        enumeration.syntax(),
                        enumeration.name_token(),
                        NamedTypeKind::Enum,
                        Vec::new(),
                        &[],
                        None,
                        &generics,
                    );
                    info.class = current_class.clone();
                }
                DocTag::Alias(alias) => {
                    let target = alias.ty().map(|ty| self.doc_type(&ty, &generics));
                    self.define_type(
                        alias.syntax(),
                        alias.name_token(),
                        NamedTypeKind::Alias,
                        alias.generic_decls(),
                        &[],
                        target,
                        &generics,
                    );
                }
                DocTag::Field(field) => {
                    if let Some(class) = current_class.clone() {
                        self.doc_field(&field, class, &generics);
                    }
                }
                DocTag::Type(ty) => {
                    for doc_ty in ty.types() {
                        let converted = self.doc_type(&doc_ty, &generics);
                        info.types.push(converted);
                    }
                }
                DocTag::Param(param) => {
                    if let Some(token) = param.name_token() {
                        let ty = param
                            .ty()
                            .map_or(LuaType::Unknown, |ty| self.doc_type(&ty, &generics));
                        info.params
                            .insert(SmolStr::new(token.text()), (ty, param.is_nullable()));
                    }
                }
                DocTag::Return(ret) => {
                    info.has_returns = true;
                    for doc_ty in ret.types() {
                        let converted = self.doc_type(&doc_ty, &generics);
                        info.returns.push(converted);
                    }
                }
                DocTag::Generic(generic) => {
                    for decl in generic.decls() {
                        if let Some(token) = decl.name_token() {
                            let name = SmolStr::new(token.text());
                            self.declare_generic(decl.syntax(), &token);
                            info.generics.push(name);
                        }
                    }
                }
                DocTag::Operator(operator) => {
                    let (Some(class), Some(token)) = (&current_class, operator.name_token()) else {
                        continue;
                    };
                    let operand = operator.operand().map(|ty| self.doc_type(&ty, &generics));
                    let result = operator
                        .result()
                        .map_or(LuaType::Unknown, |ty| self.doc_type(&ty, &generics));
                    let entry = TypeOperator {
                        op: SmolStr::new(token.text()),
                        operand,
                        result,
                    };
                    self.stub.type_operators.add(self.document, class.clone(), entry);
                }
                DocTag::Other(_) => {}
            }
        }
        if let Some(owner) = comment.owner() {
            self.pending_docs.insert(SyntaxId::new(&owner), info);
        }
    }

    fn declare_generic(&mut self, site: &SyntaxNode, token: &SyntaxToken) -> DeclId {
        let name = SmolStr::new(token.text());
        let new = NewDecl {
            name: name.clone(),
            range: token.text_range(),
            kind: DeclKind::GenericParam,
            ty: DeclType::Explicit(LuaType::GenericParam(name)),
            member: None,
            visibility: None,
        };
        self.declare(site, new, false)
    }

    #[allow(clippy::too_many_arguments)]
    fn define_type(
        &mut self,
        site: &SyntaxNode,
        token: Option<SyntaxToken>,
        kind: NamedTypeKind,
        generic_decls: Vec<DocGenericDecl>,
        supers: &[DocType],
        target: Option<LuaType>,
        generics: &[SmolStr],
    ) -> Option<SmolStr> {
        let token = token?;
        let name = SmolStr::new(token.text());
        let new = NewDecl {
            name: name.clone(),
            range: token.text_range(),
            kind: DeclKind::TypeDef,
            ty: DeclType::Explicit(LuaType::Named(name.clone())),
            member: None,
            visibility: None,
        };
        let decl = self.declare(site, new, false);

        let mut params = Vec::new();
        for generic in generic_decls {
            if let Some(param) = generic.name_token() {
                let id = self.declare_generic(generic.syntax(), &param);
                self.stub.generic_params.add(self.document, name.clone(), id);
                params.push(SmolStr::new(param.text()));
            }
        }
        for super_ty in supers {
            let converted = self.doc_type(super_ty, generics);
            self.stub.supers.add(self.document, name.clone(), converted);
        }
        let def = NamedTypeDef {
            name: name.clone(),
            kind,
            decl,
            generics: params,
            target,
        };
        self.stub.named_types.add(self.document, name.clone(), def);
        Some(name)
    }

    fn doc_field(&mut self, field: &DocTagField, class: SmolStr, generics: &[SmolStr]) {
        let (key, range) = match field.key() {
            Some(DocFieldKey::Name(token)) => {
                (IndexKey::String(SmolStr::new(token.text())), token.text_range())
            }
            Some(DocFieldKey::Type(ty)) => {
                let range = ty.syntax().text_range();
                (IndexKey::Ty(self.doc_type(&ty, generics)), range)
            }
            None => return,
        };
        let mut ty = field
            .ty()
            .map_or(LuaType::Unknown, |ty| self.doc_type(&ty, generics));
        if field.is_nullable() {
            ty = ty.union(LuaType::Nil);
        }
        let owner = MemberOwner::Type(class);
        if let (IndexKey::String(name), Some(type_name)) = (&key, ty.without_nil().type_name()) {
            self.member_owners.insert(
                (owner.clone(), name.clone()),
                MemberOwner::Type(type_name.clone()),
            );
        }
        let visibility = field.visibility().map(SmolStr::from);
        self.declare_member(
            field.syntax(),
            range,
            owner,
            key,
            DeclType::Explicit(ty),
            visibility,
        );
    }

    /// Convert an annotation type. Doc table types register their fields as
    /// members of the table type.
    fn doc_type(&mut self, ty: &DocType, generics: &[SmolStr]) -> LuaType {
        match ty {
            DocType::Name(name) => {
                let Some(token) = name.name_token() else {
                    return LuaType::Unknown;
                };
                let text = SmolStr::new(token.text());
                if generics.contains(&text) {
                    LuaType::GenericParam(text)
                } else if text == "nil" {
                    LuaType::Nil
                } else {
                    LuaType::Named(text)
                }
            }
            DocType::Generic(generic) => {
                let Some(token) = generic.name_token() else {
                    return LuaType::Unknown;
                };
                let args: Vec<LuaType> = generic
                    .args()
                    .map(|arg| self.doc_type(&arg, generics))
                    .collect();
                LuaType::Generic {
                    name: SmolStr::new(token.text()),
                    args: args.into(),
                }
            }
            DocType::Array(array) => {
                let element = array
                    .element()
                    .map_or(LuaType::Unknown, |e| self.doc_type(&e, generics));
                LuaType::array(element)
            }
            DocType::Union(union) => {
                let members: Vec<LuaType> = union
                    .members()
                    .map(|member| self.doc_type(&member, generics))
                    .collect();
                LuaType::union_all(members)
            }
            DocType::Nullable(nullable) => nullable
                .inner()
                .map_or(LuaType::Unknown, |inner| self.doc_type(&inner, generics))
                .union(LuaType::Nil),
            DocType::Func(func) => {
                let mut params = Vec::new();
                for param in func.params() {
                    let name = param
                        .name_token()
                        .map_or_else(|| SmolStr::new_static("_"), |t| SmolStr::new(t.text()));
                    let ty = param
                        .ty()
                        .map_or(LuaType::Unknown, |ty| self.doc_type(&ty, generics));
                    params.push(MethodParam {
                        name,
                        ty,
                        nullable: param.is_nullable(),
                    });
                }
                let returns = func
                    .returns()
                    .iter()
                    .map(|ret| self.doc_type(ret, generics))
                    .collect();
                LuaType::Method(Arc::new(LuaMethod {
                    params,
                    returns,
                    returns_declared: true,
                    generics: Vec::new(),
                    colon_define: false,
                }))
            }
            DocType::Table(table) => {
                let element = self.element(table.syntax());
                let owner = MemberOwner::Element(element);
                for field in table.fields() {
                    let (key, range) = match field.key() {
                        Some(DocFieldKey::Name(token)) => {
                            (IndexKey::String(SmolStr::new(token.text())), token.text_range())
                        }
                        Some(DocFieldKey::Type(key_ty)) => {
                            let range = key_ty.syntax().text_range();
                            (IndexKey::Ty(self.doc_type(&key_ty, generics)), range)
                        }
                        None => continue,
                    };
                    let mut field_ty = field
                        .ty()
                        .map_or(LuaType::Unknown, |ty| self.doc_type(&ty, generics));
                    if field.is_nullable() {
                        field_ty = field_ty.union(LuaType::Nil);
                    }
                    self.declare_member(
                        field.syntax(),
                        range,
                        owner.clone(),
                        key,
                        DeclType::Explicit(field_ty),
                        None,
                    );
                }
                LuaType::TableLiteral(element)
            }
            DocType::Paren(paren) => paren
                .inner()
                .map_or(LuaType::Unknown, |inner| self.doc_type(&inner, generics)),
            DocType::Literal(literal) => match literal.token().map(|t| t.kind()) {
                Some(SyntaxKind::DOC_STRING) => LuaType::named("string"),
                Some(SyntaxKind::DOC_INTEGER) => LuaType::named("integer"),
                _ => LuaType::Unknown,
            },
        }
    }
}

/// Type of the `index`-th binding of a multiple assignment. A trailing call
/// spreads its returns over the remaining bindings.
fn value_type(values: &[Expr], index: usize, document: DocumentId) -> DeclType {
    let Some(last) = values.len().checked_sub(1) else {
        return DeclType::Unknown;
    };
    if index <= last {
        return DeclType::Expr {
            expr: ElementId::new(document, values[index].syntax()),
            index: 0,
        };
    }
    match &values[last] {
        Expr::Call(call) => DeclType::Expr {
            expr: ElementId::new(document, call.syntax()),
            index: index - last,
        },
        _ => DeclType::Unknown,
    }
}

fn closure_type(closure: Option<&ClosureExpr>, document: DocumentId) -> DeclType {
    match closure {
        Some(closure) => DeclType::Expr {
            expr: ElementId::new(document, closure.syntax()),
            index: 0,
        },
        None => DeclType::Unknown,
    }
}

/// Member key written as a string or integer literal
fn literal_key(expr: &Expr) -> Option<IndexKey> {
    let Expr::Literal(literal) = expr else {
        return None;
    };
    match literal.kind()? {
        LiteralKind::String(text) => Some(IndexKey::String(SmolStr::new(text))),
        LiteralKind::Integer(value) => Some(IndexKey::Integer(value)),
        _ => None,
    }
}
