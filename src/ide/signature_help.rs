//! Signature help for the call surrounding the cursor.

use crate::base::DocumentId;
use crate::hir::{Compilation, LuaType};
use crate::parser::{AstNode, CallExpr, Expr, SyntaxKind};
use crate::syntax::{LuaSyntaxTree, name_text};

/// Signature of the innermost call whose argument list holds the cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureHelp {
    /// e.g. `greet(name: string, times?: integer): string`
    pub label: String,
    pub parameters: Vec<String>,
    /// Index into `parameters`; `None` past the last parameter
    pub active_parameter: Option<usize>,
}

pub fn signature_help(compilation: &Compilation, document: DocumentId, line: u32, col: u32) -> Option<SignatureHelp> {
    let tree = compilation.document(document)?.tree();
    let offset = tree.offset_at(line, col)?;
    let root = tree.root();
    let token = LuaSyntaxTree::token_at(&root, offset)?;

    let (call, args) = token.parent_ancestors().find_map(|node| {
        let call = CallExpr::cast(node)?;
        let args = call
            .syntax()
            .children()
            .find(|n| n.kind() == SyntaxKind::CALL_ARG_LIST)?;
        // strictly inside the parentheses
        let range = args.text_range();
        (range.start() < offset && offset <= range.end()).then_some((call, args))
    })?;

    let callee = call.callee()?;
    let mut search = compilation.search();
    let method = search
        .infer(document, &callee)
        .members()
        .into_iter()
        .find_map(|member| match member {
            LuaType::Method(method) => Some(method),
            _ => None,
        })?;

    let mut active = args
        .children_with_tokens()
        .filter(|element| element.kind() == SyntaxKind::COMMA && element.text_range().end() <= offset)
        .count();
    match (call.is_colon_call(), method.colon_define) {
        // `obj.method(obj, ...)` on a `:` definition passes self explicitly
        (false, true) => active = active.checked_sub(1)?,
        // `obj:method(...)` on a `.` definition consumes the first parameter
        (true, false) => active += 1,
        _ => {}
    }

    let name = match &callee {
        Expr::Name(_) | Expr::Index(_) => name_text(callee.syntax()).unwrap_or_default(),
        _ => String::new(),
    };
    let parameters: Vec<String> = method.params.iter().map(ToString::to_string).collect();
    let active_parameter = (active < parameters.len()).then_some(active);
    Some(SignatureHelp {
        label: method.signature(if name.is_empty() { "fun" } else { &name }),
        parameters,
        active_parameter,
    })
}
