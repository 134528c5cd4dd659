//! Declaration lookup for every name-bearing syntax category.

use crate::base::DocumentId;
use crate::parser::{
    AstNode, DocComment, DocFieldKey, DocGenericDecl, DocTableField, DocTag, DocTagField,
    DocTagParam, Expr, FuncStat, IndexExpr, IndexKeySyntax, LiteralKind, SyntaxKind, SyntaxNode,
    TableField,
};
use crate::syntax::{ElementId, SyntaxId, name_text};

use super::SearchContext;
use crate::hir::declaration::{DeclId, DeclKind};
use crate::hir::types::{IndexKey, LuaType};

impl SearchContext<'_> {
    /// Declaration the node refers to or introduces.
    pub fn find_declaration(&mut self, document: DocumentId, node: &SyntaxNode) -> Option<DeclId> {
        if !self.features.cache {
            return self.find_declaration_uncached(document, node);
        }
        let element = ElementId::new(document, node);
        if let Some(cached) = self.declaration_cache.get(&element) {
            return *cached;
        }
        let found = self.find_declaration_uncached(document, node);
        self.declaration_cache.insert(element, found);
        found
    }

    fn find_declaration_uncached(&mut self, document: DocumentId, node: &SyntaxNode) -> Option<DeclId> {
        match node.kind() {
            SyntaxKind::NAME_EXPR => self.find_name_declaration(document, node),
            SyntaxKind::INDEX_EXPR => self.find_index_declaration(document, node),
            SyntaxKind::TABLE_FIELD => self.find_table_field_declaration(document, node),
            SyntaxKind::DOC_NAME_TYPE
            | SyntaxKind::DOC_GENERIC_TYPE
            | SyntaxKind::DOC_TAG_CLASS
            | SyntaxKind::DOC_TAG_INTERFACE
            | SyntaxKind::DOC_TAG_ALIAS
            | SyntaxKind::DOC_TAG_ENUM => self.find_type_declaration(document, node),
            SyntaxKind::DOC_TAG_FIELD => self.find_doc_field_declaration(document, node),
            SyntaxKind::DOC_TABLE_FIELD => self.find_doc_table_field_declaration(document, node),
            SyntaxKind::DOC_TAG_PARAM => self.find_doc_param_declaration(document, node),
            SyntaxKind::LOCAL_NAME | SyntaxKind::PARAM_DEF | SyntaxKind::DOC_GENERIC_DECL => self
                .symbols(document)?
                .declaration_at_site(&SyntaxId::new(node)),
            _ => None,
        }
    }

    /// Resolve a plain name reference.
    ///
    /// `self` follows the enclosing method definition; a node that itself
    /// declares a global resolves to that declaration; otherwise the scope
    /// chain is walked and the first global of that name is the fallback.
    pub fn find_name_declaration(&mut self, document: DocumentId, node: &SyntaxNode) -> Option<DeclId> {
        let name = name_text(node)?;
        if name == "self" {
            return self.find_self_declaration(document, node);
        }
        let symbols = self.symbols(document)?;
        if let Some(id) = symbols.declaration_at_site(&SyntaxId::new(node)) {
            return Some(id);
        }
        if let Some(id) = symbols.find_name_from(node, &name) {
            return Some(id);
        }
        self.stub().globals.first(name.as_str()).copied()
    }

    /// `self` inside `function obj:method()` stands for `obj`.
    fn find_self_declaration(&mut self, document: DocumentId, node: &SyntaxNode) -> Option<DeclId> {
        let closure = node
            .ancestors()
            .find(|ancestor| ancestor.kind() == SyntaxKind::CLOSURE_EXPR)?;
        let stat = FuncStat::cast(closure.parent()?)?;
        if !stat.is_method() {
            return None;
        }
        let Some(Expr::Index(index)) = stat.name() else {
            return None;
        };
        let prefix = index.prefix()?;
        self.find_declaration(document, prefix.syntax())
    }

    fn find_index_declaration(&mut self, document: DocumentId, node: &SyntaxNode) -> Option<DeclId> {
        let index = IndexExpr::cast(node.clone())?;
        let found = match (index.prefix(), self.index_key(document, &index)) {
            (Some(prefix), Some(key)) => {
                let prefix_ty = self.infer(document, &prefix);
                let member = self.find_member(&prefix_ty, &key).into_iter().next();
                match (&prefix, member) {
                    (_, Some(member)) => Some(member),
                    // a global table whose value is opaque still owns what is
                    // assigned into it
                    (Expr::Name(name), None) if prefix_ty.is_unknown() => {
                        let text = name_text(name.syntax())?;
                        let is_local = self
                            .find_declaration(document, name.syntax())
                            .and_then(|id| self.declaration(id))
                            .is_some_and(|decl| decl.kind != DeclKind::Global);
                        if is_local {
                            None
                        } else {
                            self.find_global_member(&text, &key).into_iter().next()
                        }
                    }
                    _ => None,
                }
            }
            _ => None,
        };
        // a member definition the prefix type does not reach still names itself
        found.or_else(|| {
            self.symbols(document)?
                .declaration_at_site(&SyntaxId::new(node))
        })
    }

    /// Key an index expression looks up
    pub fn index_key(&mut self, document: DocumentId, index: &IndexExpr) -> Option<IndexKey> {
        match index.key()? {
            IndexKeySyntax::Name(token) => Some(IndexKey::String(token.text().into())),
            IndexKeySyntax::Expr(expr) => Some(self.expr_key(document, &expr)),
        }
    }

    fn expr_key(&mut self, document: DocumentId, expr: &Expr) -> IndexKey {
        if let Expr::Literal(literal) = expr {
            match literal.kind() {
                Some(LiteralKind::String(text)) => return IndexKey::String(text.into()),
                Some(LiteralKind::Integer(value)) => return IndexKey::Integer(value),
                _ => {}
            }
        }
        IndexKey::Ty(self.infer(document, expr))
    }

    fn find_table_field_declaration(&mut self, document: DocumentId, node: &SyntaxNode) -> Option<DeclId> {
        let field = TableField::cast(node.clone())?;
        let table = node.parent()?;
        let key = match (field.name_token(), field.key_expr()) {
            (Some(token), _) => IndexKey::String(token.text().into()),
            (None, Some(expr)) => self.expr_key(document, &expr),
            (None, None) => {
                // positional fields are only found through their own site
                return self
                    .symbols(document)?
                    .declaration_at_site(&SyntaxId::new(node));
            }
        };
        let element = ElementId::new(document, &table);
        let owner_ty = match self.stub().type_from_id.first(&element) {
            Some(class) => LuaType::Named(class.clone()),
            None => LuaType::TableLiteral(element),
        };
        self.find_member(&owner_ty, &key).into_iter().next()
    }

    /// Doc type names resolve to a generic parameter declared in the same
    /// comment, else to the first named type definition.
    fn find_type_declaration(&mut self, document: DocumentId, node: &SyntaxNode) -> Option<DeclId> {
        let name = name_text(node)?;
        if let Some(comment) = node.ancestors().find_map(DocComment::cast) {
            let generic = comment
                .syntax()
                .descendants()
                .filter_map(DocGenericDecl::cast)
                .find(|decl| decl.name_token().is_some_and(|t| t.text() == name));
            if let Some(generic) = generic {
                return self
                    .symbols(document)?
                    .declaration_at_site(&SyntaxId::new(generic.syntax()));
            }
        }
        self.stub()
            .named_types
            .first(name.as_str())
            .map(|def| def.decl)
    }

    fn find_doc_field_declaration(&mut self, document: DocumentId, node: &SyntaxNode) -> Option<DeclId> {
        let field = DocTagField::cast(node.clone())?;
        let comment = node.ancestors().find_map(DocComment::cast)?;
        // the class tag closest before the field owns it
        let class = comment
            .tags()
            .take_while(|tag| tag.syntax() != node)
            .filter_map(|tag| match tag {
                DocTag::Class(class) => class.name_token(),
                DocTag::Interface(interface) => interface.name_token(),
                DocTag::Enum(enumeration) => enumeration.name_token(),
                _ => None,
            })
            .last()?;
        let key = match field.key()? {
            DocFieldKey::Name(token) => IndexKey::String(token.text().into()),
            DocFieldKey::Type(_) => {
                return self
                    .symbols(document)?
                    .declaration_at_site(&SyntaxId::new(node));
            }
        };
        let owner = LuaType::Named(class.text().into());
        self.find_member(&owner, &key).into_iter().next()
    }

    fn find_doc_table_field_declaration(&mut self, document: DocumentId, node: &SyntaxNode) -> Option<DeclId> {
        let field = DocTableField::cast(node.clone())?;
        let table = node.parent()?;
        let key = match field.key()? {
            DocFieldKey::Name(token) => IndexKey::String(token.text().into()),
            DocFieldKey::Type(_) => {
                return self
                    .symbols(document)?
                    .declaration_at_site(&SyntaxId::new(node));
            }
        };
        let owner = LuaType::TableLiteral(ElementId::new(document, &table));
        self.find_member(&owner, &key).into_iter().next()
    }

    /// `---@param x` names a parameter of the documented function
    fn find_doc_param_declaration(&mut self, document: DocumentId, node: &SyntaxNode) -> Option<DeclId> {
        let param = DocTagParam::cast(node.clone())?;
        let name = param.name_token()?;
        let comment = node.ancestors().find_map(DocComment::cast)?;
        let owner = comment.owner()?;
        let closure = owner
            .descendants()
            .find(|n| n.kind() == SyntaxKind::CLOSURE_EXPR)?;
        let symbols = self.symbols(document)?;
        closure
            .children()
            .filter(|n| n.kind() == SyntaxKind::PARAM_LIST)
            .flat_map(|list| list.children())
            .find(|p| name_text(p).as_deref() == Some(name.text()))
            .and_then(|p| symbols.declaration_at_site(&SyntaxId::new(&p)))
    }

    /// Whether `name_ref` reaches `decl` from inside a closure opened after
    /// the declaration.
    pub fn is_upvalue(&mut self, document: DocumentId, name_ref: &SyntaxNode, decl: DeclId) -> bool {
        let Some(declaration) = self.declaration(decl) else {
            return false;
        };
        if declaration.document() != document || name_text(name_ref).as_deref() == Some("self") {
            return false;
        }
        name_ref
            .ancestors()
            .find(|ancestor| ancestor.kind() == SyntaxKind::CLOSURE_EXPR)
            .is_some_and(|closure| closure.text_range().start() > declaration.position)
    }
}
