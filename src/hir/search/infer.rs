//! Expression type inference.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::base::DocumentId;
use crate::parser::{
    AstNode, BinaryExpr, CallExpr, ClosureExpr, Expr, IndexExpr, LiteralKind, ReturnStat,
    SyntaxKind, UnaryExpr,
};
use crate::syntax::ElementId;

use super::{GenericEnv, SearchContext, bind_params};
use crate::hir::stub::Match;
use crate::hir::types::{IndexKey, LuaMethod, LuaType};

impl SearchContext<'_> {
    /// Type of `expr` in `document`; `Unknown` when nothing is known.
    pub fn infer(&mut self, document: DocumentId, expr: &Expr) -> LuaType {
        let element = ElementId::new(document, expr.syntax());
        if self.features.cache {
            if let Some(ty) = self.infer_cache.get(&element) {
                return ty.clone();
            }
        }
        if !self.infer_guard.insert(element) {
            return LuaType::Unknown;
        }
        let ty = self.infer_uncached(document, expr);
        self.infer_guard.remove(&element);
        if self.features.cache {
            self.infer_cache.insert(element, ty.clone());
        }
        ty
    }

    pub fn infer_element(&mut self, element: ElementId) -> LuaType {
        match self.node(element).and_then(Expr::cast) {
            Some(expr) => self.infer(element.document, &expr),
            None => LuaType::Unknown,
        }
    }

    /// Every value an expression produces: all returns for a call, the
    /// single value otherwise.
    pub fn infer_element_returns(&mut self, element: ElementId) -> Vec<LuaType> {
        match self.node(element).and_then(Expr::cast) {
            Some(Expr::Call(call)) => self.infer_call_returns(element.document, &call),
            Some(expr) => vec![self.infer(element.document, &expr)],
            None => Vec::new(),
        }
    }

    fn infer_uncached(&mut self, document: DocumentId, expr: &Expr) -> LuaType {
        match expr {
            Expr::Literal(literal) => match literal.kind() {
                Some(LiteralKind::Nil) => LuaType::Nil,
                Some(LiteralKind::Bool) => LuaType::named("boolean"),
                Some(LiteralKind::Integer(_)) => LuaType::named("integer"),
                Some(LiteralKind::Float) => LuaType::named("number"),
                Some(LiteralKind::String(_)) => LuaType::named("string"),
                Some(LiteralKind::VarArgs) | None => LuaType::Unknown,
            },
            Expr::Table(table) => {
                let element = ElementId::new(document, table.syntax());
                match self.stub().type_from_id.first(&element) {
                    Some(class) => LuaType::Named(class.clone()),
                    None => LuaType::TableLiteral(element),
                }
            }
            Expr::Closure(closure) => self.closure_type(document, closure),
            Expr::Name(name) => match self.find_declaration(document, name.syntax()) {
                Some(decl) => self.decl_type(decl),
                None => LuaType::Unknown,
            },
            Expr::Index(index) => self.infer_index(document, index),
            Expr::Call(call) => self
                .infer_call_returns(document, call)
                .into_iter()
                .next()
                .unwrap_or(LuaType::Unknown),
            Expr::Paren(paren) => match paren.inner() {
                Some(inner) => self.infer(document, &inner),
                None => LuaType::Unknown,
            },
            Expr::Binary(binary) => self.infer_binary(document, binary),
            Expr::Unary(unary) => self.infer_unary(document, unary),
        }
    }

    fn closure_type(&mut self, document: DocumentId, closure: &ClosureExpr) -> LuaType {
        let element = ElementId::new(document, closure.syntax());
        let Some(method) = self.stub().methods.first(&element) else {
            return LuaType::Unknown;
        };
        if method.returns_declared {
            return LuaType::Method(method.clone());
        }
        let returns = self.closure_returns(document, closure);
        LuaType::Method(Arc::new(LuaMethod {
            returns,
            ..(**method).clone()
        }))
    }

    /// Returns of an undocumented function, merged per position over every
    /// `return` that belongs to it.
    fn closure_returns(&mut self, document: DocumentId, closure: &ClosureExpr) -> Vec<LuaType> {
        let own_returns: Vec<ReturnStat> = closure
            .syntax()
            .descendants()
            .filter_map(ReturnStat::cast)
            .filter(|ret| {
                ret.syntax()
                    .ancestors()
                    .find(|a| a.kind() == SyntaxKind::CLOSURE_EXPR)
                    .is_some_and(|a| &a == closure.syntax())
            })
            .collect();
        let mut returns: Vec<LuaType> = Vec::new();
        for ret in own_returns {
            for (i, expr) in ret.exprs().enumerate() {
                let ty = self.infer(document, &expr);
                match returns.get_mut(i) {
                    Some(slot) => *slot = std::mem::replace(slot, LuaType::Unknown).union(ty),
                    None => returns.push(ty),
                }
            }
        }
        returns
    }

    fn infer_index(&mut self, document: DocumentId, index: &IndexExpr) -> LuaType {
        let Some(prefix) = index.prefix() else {
            return LuaType::Unknown;
        };
        let Some(key) = self.index_key(document, index) else {
            return LuaType::Unknown;
        };
        let prefix_ty = self.infer(document, &prefix);
        self.member_type(&prefix_ty, &key)
    }

    /// Type of member `key` of a value of type `ty`
    pub fn member_type(&mut self, ty: &LuaType, key: &IndexKey) -> LuaType {
        let ty = self.substitute(ty);
        match &ty {
            LuaType::Array(element) if is_integer_key(key) => element.as_ref().clone(),
            LuaType::Union(union) => {
                let members: Vec<LuaType> = union
                    .iter()
                    .filter(|member| !matches!(member, LuaType::Nil))
                    .cloned()
                    .collect();
                let types: Vec<LuaType> = members.iter().map(|m| self.member_type(m, key)).collect();
                LuaType::union_all(types)
            }
            LuaType::Generic { name, args } => {
                let Some(decl) = self.find_member(&ty, key).into_iter().next() else {
                    return LuaType::Unknown;
                };
                let member_ty = self.decl_type(decl);
                let params = self
                    .stub()
                    .named_types
                    .first(name.as_str())
                    .map(|def| def.generics.clone())
                    .unwrap_or_default();
                let env = bind_params(&params, args);
                self.substitute_with(&member_ty, env)
            }
            _ => match self.find_member(&ty, key).into_iter().next() {
                Some(decl) => self.decl_type(decl),
                None => LuaType::Unknown,
            },
        }
    }

    /// All values a call produces
    pub fn infer_call_returns(&mut self, document: DocumentId, call: &CallExpr) -> Vec<LuaType> {
        let Some(callee) = call.callee() else {
            return Vec::new();
        };
        if let Some(returns) = self.infer_require(document, &callee, call) {
            return returns;
        }
        let callee_ty = self.infer(document, &callee);
        let Some(method) = callee_ty.members().into_iter().find_map(|member| match member {
            LuaType::Method(method) => Some(method),
            _ => None,
        }) else {
            return Vec::new();
        };
        if method.generics.is_empty() {
            return method.returns.clone();
        }

        let mut arg_types: Vec<LuaType> = call
            .args()
            .iter()
            .map(|arg| self.infer(document, arg))
            .collect();
        let colon_call = call.is_colon_call();
        if colon_call && !method.colon_define {
            // the receiver is the first argument
            if let Expr::Index(index) = &callee {
                let receiver = index
                    .prefix()
                    .map_or(LuaType::Unknown, |prefix| self.infer(document, &prefix));
                arg_types.insert(0, receiver);
            }
        } else if !colon_call && method.colon_define && !arg_types.is_empty() {
            arg_types.remove(0);
        }

        let mut env = GenericEnv::default();
        let generics: FxHashSet<SmolStr> = method.generics.iter().cloned().collect();
        for (param, arg) in method.params.iter().zip(arg_types.iter()) {
            bind_generic(&param.ty, arg, &generics, &mut env);
        }
        let returns = method.returns.clone();
        returns
            .iter()
            .map(|ret| self.substitute_with(ret, env.clone()))
            .collect()
    }

    /// `require("a.b")` yields what module `a.b` returns from its main chunk,
    /// unless `require` is shadowed by a local.
    fn infer_require(&mut self, document: DocumentId, callee: &Expr, call: &CallExpr) -> Option<Vec<LuaType>> {
        let Expr::Name(name) = callee else {
            return None;
        };
        if name.name_token()?.text() != "require" {
            return None;
        }
        let local = self
            .symbols(document)
            .and_then(|symbols| symbols.find_name_from(name.syntax(), "require"));
        if local.is_some() {
            return None;
        }
        let Some(Expr::Literal(literal)) = call.args().into_iter().next() else {
            return None;
        };
        let Some(LiteralKind::String(module)) = literal.kind() else {
            return None;
        };
        let target = self.compilation.module_document(&module)?;
        let first = self
            .stub()
            .main_block_returns
            .first(&target)
            .and_then(|exprs| exprs.first().copied());
        Some(match first {
            Some(expr) => vec![self.infer_element(expr)],
            None => Vec::new(),
        })
    }

    fn infer_binary(&mut self, document: DocumentId, binary: &BinaryExpr) -> LuaType {
        let Some(op) = binary.op() else {
            return LuaType::Unknown;
        };
        let lhs = binary.lhs();
        let rhs = binary.rhs();
        let infer_side = |search: &mut Self, side: Option<Expr>| {
            side.map_or(LuaType::Unknown, |expr| search.infer(document, &expr))
        };
        match op {
            SyntaxKind::DOT_DOT => LuaType::named("string"),
            SyntaxKind::EQ_EQ
            | SyntaxKind::TILDE_EQ
            | SyntaxKind::LT
            | SyntaxKind::LT_EQ
            | SyntaxKind::GT
            | SyntaxKind::GT_EQ => LuaType::named("boolean"),
            SyntaxKind::AND_KW => infer_side(self, rhs),
            SyntaxKind::OR_KW => {
                let left = infer_side(self, lhs);
                let right = infer_side(self, rhs);
                left.union(right)
            }
            _ => {
                let left = infer_side(self, lhs);
                let right = infer_side(self, rhs);
                if let Some(result) = operator_name(op).and_then(|name| self.operator_result(&left, name, &right)) {
                    return result;
                }
                match op {
                    SyntaxKind::AMP
                    | SyntaxKind::PIPE
                    | SyntaxKind::TILDE
                    | SyntaxKind::LT_LT
                    | SyntaxKind::GT_GT => LuaType::named("integer"),
                    _ => LuaType::named("number"),
                }
            }
        }
    }

    fn infer_unary(&mut self, document: DocumentId, unary: &UnaryExpr) -> LuaType {
        match unary.op() {
            Some(SyntaxKind::NOT_KW) => LuaType::named("boolean"),
            Some(SyntaxKind::HASH) => LuaType::named("integer"),
            Some(SyntaxKind::TILDE) => LuaType::named("integer"),
            Some(SyntaxKind::MINUS) => {
                let operand = unary
                    .operand()
                    .map_or(LuaType::Unknown, |expr| self.infer(document, &expr));
                self.operator_result(&operand, "unm", &LuaType::Unknown)
                    .unwrap_or_else(|| LuaType::named("number"))
            }
            _ => LuaType::Unknown,
        }
    }

    /// Result of a `---@operator` overload declared on the left operand's type
    fn operator_result(&mut self, left: &LuaType, op: &str, right: &LuaType) -> Option<LuaType> {
        let name = left.type_name()?;
        let mut fallback = None;
        for overload in self.stub().type_operators.get(name.as_str(), Match::All) {
            if overload.op != op {
                continue;
            }
            match &overload.operand {
                Some(operand) if self.sub_type_of(right, operand) => {
                    return Some(overload.result.clone());
                }
                Some(_) => {
                    fallback.get_or_insert_with(|| overload.result.clone());
                }
                None => return Some(overload.result.clone()),
            }
        }
        fallback
    }
}

fn is_integer_key(key: &IndexKey) -> bool {
    match key {
        IndexKey::Integer(_) => true,
        IndexKey::Ty(ty) => matches!(ty.type_name().map(SmolStr::as_str), Some("integer" | "number")),
        IndexKey::String(_) => false,
    }
}

/// Operator overload name of a binary operator
fn operator_name(op: SyntaxKind) -> Option<&'static str> {
    Some(match op {
        SyntaxKind::PLUS => "add",
        SyntaxKind::MINUS => "sub",
        SyntaxKind::STAR => "mul",
        SyntaxKind::SLASH => "div",
        SyntaxKind::SLASH_SLASH => "idiv",
        SyntaxKind::PERCENT => "mod",
        SyntaxKind::CARET => "pow",
        SyntaxKind::AMP => "band",
        SyntaxKind::PIPE => "bor",
        SyntaxKind::TILDE => "bxor",
        SyntaxKind::LT_LT => "shl",
        SyntaxKind::GT_GT => "shr",
        _ => return None,
    })
}

/// Bind generic parameters occurring in `param` from the argument type
fn bind_generic(param: &LuaType, arg: &LuaType, generics: &FxHashSet<SmolStr>, env: &mut GenericEnv) {
    if arg.is_unknown() {
        return;
    }
    match (param, arg) {
        (LuaType::GenericParam(name), _) if generics.contains(name) => {
            env.entry(name.clone()).or_insert_with(|| arg.clone());
        }
        (LuaType::Array(param_elem), LuaType::Array(arg_elem)) => {
            bind_generic(param_elem, arg_elem, generics, env);
        }
        (
            LuaType::Generic { name, args: params },
            LuaType::Generic { name: arg_name, args },
        ) if name == arg_name => {
            for (p, a) in params.iter().zip(args.iter()) {
                bind_generic(p, a, generics, env);
            }
        }
        (LuaType::Method(param_fn), LuaType::Method(arg_fn)) => {
            for (p, a) in param_fn.returns.iter().zip(arg_fn.returns.iter()) {
                bind_generic(p, a, generics, env);
            }
        }
        (LuaType::Union(union), _) => {
            // `T|nil` binds T to the argument
            for member in union.iter() {
                if !matches!(member, LuaType::Nil) {
                    bind_generic(member, arg, generics, env);
                }
            }
        }
        _ => {}
    }
}
