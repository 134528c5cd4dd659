//! Member lookup and the subtype relation.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::SearchContext;
use crate::hir::declaration::DeclId;
use crate::hir::stub::{Match, MemberOwner};
use crate::hir::types::{IndexKey, LuaType};

impl SearchContext<'_> {
    /// Every member declaration reachable from `ty`, own members before
    /// inherited ones.
    pub fn members_of(&mut self, ty: &LuaType) -> Vec<DeclId> {
        let mut owners = Vec::new();
        let mut visited = FxHashSet::default();
        self.collect_owners(ty, &mut owners, &mut visited);

        let stub = self.stub();
        let mut seen = FxHashSet::default();
        owners
            .iter()
            .flat_map(|owner| stub.members.get(owner, Match::All))
            .copied()
            .filter(|id| seen.insert(*id))
            .collect()
    }

    fn collect_owners(
        &mut self,
        ty: &LuaType,
        owners: &mut Vec<MemberOwner>,
        visited: &mut FxHashSet<SmolStr>,
    ) {
        let ty = self.substitute(ty);
        match &ty {
            LuaType::Named(name) | LuaType::Generic { name, .. } => {
                if !visited.insert(name.clone()) {
                    return;
                }
                self.push_owner(MemberOwner::Type(name.clone()), owners);
                let supers: Vec<LuaType> = self
                    .stub()
                    .supers
                    .get(name.as_str(), Match::All)
                    .cloned()
                    .collect();
                for parent in &supers {
                    self.collect_owners(parent, owners, visited);
                }
            }
            LuaType::TableLiteral(element) => {
                self.push_owner(MemberOwner::Element(*element), owners);
            }
            LuaType::Union(union) => {
                for member in union.iter() {
                    self.collect_owners(member, owners, visited);
                }
            }
            _ => {}
        }
    }

    /// Adds `owner` and the globals it was assigned to
    fn push_owner(&self, owner: MemberOwner, owners: &mut Vec<MemberOwner>) {
        let globals = self.stub().global_owners.get(&owner, Match::All);
        let aliases: Vec<MemberOwner> = globals
            .map(|global| MemberOwner::Global(global.clone()))
            .collect();
        for owner in std::iter::once(owner).chain(aliases) {
            if !owners.contains(&owner) {
                owners.push(owner);
            }
        }
    }

    /// Members of `ty` whose key accepts `key`. A `[T]` member accepts any
    /// key whose type is a subtype of `T`.
    pub fn find_member(&mut self, ty: &LuaType, key: &IndexKey) -> Vec<DeclId> {
        let candidates = self.members_of(ty);
        let key_ty = match key {
            IndexKey::Ty(ty) => Some(ty.clone()),
            literal => literal.literal_type(),
        };
        let mut found = Vec::new();
        for id in candidates {
            let Some(member) = self.declaration(id).and_then(|decl| decl.member.as_ref()) else {
                continue;
            };
            let accepted = member.key.matches(key)
                || match (&member.key, &key_ty) {
                    (IndexKey::Ty(member_ty), Some(key_ty)) => self.sub_type_of(key_ty, member_ty),
                    _ => false,
                };
            if accepted {
                found.push(id);
            }
        }
        found
    }

    /// Members of the global table `name`, for globals whose value type
    /// is not known.
    pub fn find_global_member(&self, name: &str, key: &IndexKey) -> Vec<DeclId> {
        let owner = MemberOwner::Global(SmolStr::new(name));
        self.stub()
            .members
            .get(&owner, Match::All)
            .copied()
            .filter(|id| {
                self.declaration(*id)
                    .and_then(|decl| decl.member.as_ref())
                    .is_some_and(|member| member.key.matches(key))
            })
            .collect()
    }

    pub fn sub_type_of(&mut self, a: &LuaType, b: &LuaType) -> bool {
        let mut visited = FxHashSet::default();
        self.sub_type_of_guarded(a, b, &mut visited)
    }

    fn sub_type_of_guarded(&mut self, a: &LuaType, b: &LuaType, visited: &mut FxHashSet<SmolStr>) -> bool {
        if a == b {
            return true;
        }
        let a = self.substitute(a);
        let b = self.substitute(b);
        if a == b {
            return true;
        }
        match (&a, &b) {
            (LuaType::Unknown, _) | (_, LuaType::Unknown) => false,
            (LuaType::Union(members), _) => members
                .iter()
                .all(|member| self.sub_type_of_guarded(member, &b, visited)),
            (_, LuaType::Union(members)) => members
                .iter()
                .any(|member| self.sub_type_of_guarded(&a, member, visited)),
            (LuaType::Named(x), LuaType::Named(y)) if x == "integer" && y == "number" => true,
            (LuaType::Array(x), LuaType::Array(y)) => self.sub_type_of_guarded(x, y, visited),
            (LuaType::Named(name), _) | (LuaType::Generic { name, .. }, _) => {
                // `visited` holds the current super chain only
                if !visited.insert(name.clone()) {
                    return false;
                }
                let supers: Vec<LuaType> = self
                    .stub()
                    .supers
                    .get(name.as_str(), Match::All)
                    .cloned()
                    .collect();
                let found = supers
                    .iter()
                    .any(|parent| self.sub_type_of_guarded(parent, &b, visited));
                visited.remove(name);
                found
            }
            _ => false,
        }
    }

    /// Direct supertypes of the named type
    pub fn supertypes(&self, name: &str) -> Vec<LuaType> {
        self.stub().supers.get(name, Match::All).cloned().collect()
    }

    /// Named types listing `name` as a direct supertype, sorted by name
    pub fn subtypes(&self, name: &str) -> Vec<SmolStr> {
        let mut found: Vec<SmolStr> = self
            .stub()
            .supers
            .iter()
            .filter(|(_, _, parent)| parent.type_name().is_some_and(|n| n == name))
            .map(|(child, _, _)| child.clone())
            .collect();
        found.sort();
        found.dedup();
        found
    }
}
