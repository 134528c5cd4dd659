//! Lexical scope tree of one document.
//!
//! Scopes are stored in an arena. Each scope keeps its children
//! (declarations and nested scopes) ordered by position, so a lookup anchored
//! at a reference only considers what was declared before it.

use crate::base::TextSize;

use super::declaration::DeclId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Walk behavior of a scope.
///
/// - `Block`: ordinary lexical block, function bodies included.
/// - `LocalStat`: one `local` statement. References inside it (its
///   initializers) are resolved from the statement's own position in the
///   parent, so they never see the names being declared. Later siblings do.
/// - `Repeat`: a `repeat ... until cond` loop. The condition sees the body's
///   locals.
/// - `ForRange`: a numeric or generic `for`. The header expressions do not see
///   the loop variables; the body does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Block,
    LocalStat,
    Repeat,
    ForRange,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeChild {
    Declaration { id: DeclId, position: TextSize },
    Scope(ScopeId),
}

#[derive(Clone, Debug)]
struct Scope {
    kind: ScopeKind,
    position: TextSize,
    parent: Option<ScopeId>,
    children: Vec<ScopeChild>,
}

#[derive(Clone, Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    /// A tree with a single root `Block` scope starting at `position`
    pub fn new(position: TextSize) -> Self {
        Self {
            scopes: vec![Scope {
                kind: ScopeKind::Block,
                position,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn kind(&self, scope: ScopeId) -> ScopeKind {
        self.scopes[scope.index()].kind
    }

    pub fn position(&self, scope: ScopeId) -> TextSize {
        self.scopes[scope.index()].position
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope.index()].parent
    }

    pub fn children(&self, scope: ScopeId) -> &[ScopeChild] {
        &self.scopes[scope.index()].children
    }

    /// Open a nested scope under `parent`
    pub fn add_scope(&mut self, parent: ScopeId, kind: ScopeKind, position: TextSize) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            kind,
            position,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.insert_child(parent, ScopeChild::Scope(id), position);
        id
    }

    pub fn add_declaration(&mut self, scope: ScopeId, id: DeclId, position: TextSize) {
        self.insert_child(scope, ScopeChild::Declaration { id, position }, position);
    }

    fn insert_child(&mut self, scope: ScopeId, child: ScopeChild, position: TextSize) {
        let at = self.children(scope).partition_point(|c| self.child_position(c) <= position);
        self.scopes[scope.index()].children.insert(at, child);
    }

    fn child_position(&self, child: &ScopeChild) -> TextSize {
        match child {
            ScopeChild::Declaration { position, .. } => *position,
            ScopeChild::Scope(scope) => self.position(*scope),
        }
    }

    /// Offer every declaration visible from `position` inside `scope` to
    /// `process`, nearest first, until it returns `true`.
    ///
    /// Returns whether `process` accepted a declaration.
    pub fn walk_up(
        &self,
        scope: ScopeId,
        position: TextSize,
        process: &mut dyn FnMut(DeclId) -> bool,
    ) -> bool {
        self.walk_up_at(scope, position, 0, process)
    }

    fn walk_up_at(
        &self,
        scope: ScopeId,
        position: TextSize,
        level: usize,
        process: &mut dyn FnMut(DeclId) -> bool,
    ) -> bool {
        match self.kind(scope) {
            ScopeKind::LocalStat => {
                let anchor = self.position(scope);
                match self.parent(scope) {
                    Some(parent) => self.walk_up_at(parent, anchor, level, process),
                    None => false,
                }
            }
            ScopeKind::Repeat if level == 0 => match self.children(scope).first() {
                Some(ScopeChild::Scope(body)) => self.walk_up_at(*body, position, level, process),
                _ => self.walk_up_block(scope, position, level, process),
            },
            ScopeKind::ForRange if level == 0 => match self.parent(scope) {
                Some(parent) => self.walk_up_at(parent, position, level, process),
                None => false,
            },
            _ => self.walk_up_block(scope, position, level, process),
        }
    }

    fn walk_up_block(
        &self,
        scope: ScopeId,
        position: TextSize,
        level: usize,
        process: &mut dyn FnMut(DeclId) -> bool,
    ) -> bool {
        let children = self.children(scope);
        let end = children.partition_point(|c| self.child_position(c) < position);
        for child in children[..end].iter().rev() {
            let found = match child {
                ScopeChild::Declaration { id, .. } => process(*id),
                ScopeChild::Scope(nested) => self.walk_over(*nested, process),
            };
            if found {
                return true;
            }
        }
        match self.parent(scope) {
            Some(parent) => self.walk_up_at(parent, position, level + 1, process),
            None => false,
        }
    }

    /// Declarations a finished sibling scope leaves visible after it.
    /// Only `local` statements export names.
    fn walk_over(&self, scope: ScopeId, process: &mut dyn FnMut(DeclId) -> bool) -> bool {
        if self.kind(scope) != ScopeKind::LocalStat {
            return false;
        }
        self.children(scope).iter().rev().any(|child| match child {
            ScopeChild::Declaration { id, .. } => process(*id),
            ScopeChild::Scope(_) => false,
        })
    }

    /// Every declaration directly in `scope`, in source order
    pub fn declarations(&self, scope: ScopeId) -> impl Iterator<Item = DeclId> + '_ {
        self.children(scope).iter().filter_map(|child| match child {
            ScopeChild::Declaration { id, .. } => Some(*id),
            ScopeChild::Scope(_) => None,
        })
    }
}
