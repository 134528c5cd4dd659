//! Structural type values.
//!
//! Types are plain values: cloning is cheap (`Arc` inside the composite
//! variants) and no type is ever mutated after it has been shared. Lookups
//! that need the Stub (supertypes, alias expansion, members) live on the
//! search context, not here.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexSet;
use rustc_hash::FxHasher;
use smol_str::SmolStr;

use crate::syntax::ElementId;

/// A type in the Lua type system
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LuaType {
    /// Bottom marker: nothing is known
    Unknown,
    Nil,
    /// A class, interface, enum, alias or builtin referenced by name
    Named(SmolStr),
    /// A named type applied to arguments, `List<string>`
    Generic { name: SmolStr, args: Arc<[LuaType]> },
    Array(Arc<LuaType>),
    /// The shape of one table constructor or doc table type
    TableLiteral(ElementId),
    Union(LuaUnion),
    Method(Arc<LuaMethod>),
    GenericParam(SmolStr),
}

impl LuaType {
    pub fn named(name: impl Into<SmolStr>) -> Self {
        Self::Named(name.into())
    }

    pub fn array(element: LuaType) -> Self {
        Self::Array(Arc::new(element))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// `nil` is nullable; a union is nullable iff one of its members is.
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Nil => true,
            Self::Union(union) => union.iter().any(LuaType::is_nullable),
            _ => false,
        }
    }

    /// The name a nominal type is known by.
    pub fn type_name(&self) -> Option<&SmolStr> {
        match self {
            Self::Named(name) | Self::Generic { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Merge two types into a union.
    ///
    /// `Unknown` yields the other operand untouched; a union operand absorbs
    /// the other (sharing its storage when nothing new is added); otherwise a
    /// fresh union is built. A union of a single member is that member.
    pub fn union(self, other: LuaType) -> LuaType {
        match (self, other) {
            (LuaType::Unknown, other) => other,
            (this, LuaType::Unknown) => this,
            (this, other) if this == other => this,
            (LuaType::Union(union), other) => union.absorb(other),
            (this, LuaType::Union(union)) => union.absorb(this),
            (this, other) => {
                let mut members = IndexSet::with_capacity(2);
                members.insert(this);
                members.insert(other);
                LuaType::Union(LuaUnion(Arc::new(members)))
            }
        }
    }

    /// Union of all types in `types`; `Unknown` for none.
    pub fn union_all(types: impl IntoIterator<Item = LuaType>) -> LuaType {
        types.into_iter().fold(LuaType::Unknown, LuaType::union)
    }

    /// The type with `nil` removed from unions.
    pub fn without_nil(&self) -> LuaType {
        match self {
            Self::Union(union) => {
                LuaType::union_all(union.iter().filter(|t| !matches!(t, LuaType::Nil)).cloned())
            }
            Self::Nil => Self::Unknown,
            other => other.clone(),
        }
    }

    /// Members of a union, or the type itself.
    pub fn members(&self) -> Vec<LuaType> {
        match self {
            Self::Union(union) => union.iter().cloned().collect(),
            Self::Unknown => Vec::new(),
            other => vec![other.clone()],
        }
    }
}

/// De-duplicated, insertion-ordered member set of a union type
#[derive(Clone, Debug)]
pub struct LuaUnion(Arc<IndexSet<LuaType>>);

impl LuaUnion {
    pub fn iter(&self) -> impl Iterator<Item = &LuaType> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, ty: &LuaType) -> bool {
        self.0.contains(ty)
    }

    /// Whether two unions share storage
    pub fn ptr_eq(&self, other: &LuaUnion) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn absorb(mut self, other: LuaType) -> LuaType {
        let incoming = match other {
            LuaType::Union(union) => union.iter().cloned().collect::<Vec<_>>(),
            LuaType::Unknown => Vec::new(),
            single => vec![single],
        };
        if incoming.iter().all(|t| self.0.contains(t)) {
            return self.into_type();
        }
        let members = Arc::make_mut(&mut self.0);
        members.extend(incoming);
        self.into_type()
    }

    fn into_type(self) -> LuaType {
        if self.0.len() == 1 {
            if let Some(single) = self.0.first() {
                return single.clone();
            }
        }
        LuaType::Union(self)
    }
}

impl PartialEq for LuaUnion {
    fn eq(&self, other: &Self) -> bool {
        // IndexSet equality ignores order
        self.ptr_eq(other) || *self.0 == *other.0
    }
}

impl Eq for LuaUnion {}

impl Hash for LuaUnion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Order-independent so equal unions hash equally
        let mut combined: u64 = 0;
        for member in self.0.iter() {
            let mut hasher = FxHasher::default();
            member.hash(&mut hasher);
            combined = combined.wrapping_add(hasher.finish());
        }
        self.0.len().hash(state);
        combined.hash(state);
    }
}

/// Signature of a function value
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LuaMethod {
    pub params: Vec<MethodParam>,
    pub returns: Vec<LuaType>,
    /// Returns come from `---@return`; otherwise they are inferred on demand
    pub returns_declared: bool,
    pub generics: Vec<SmolStr>,
    /// Defined with `:`; `self` is implicit
    pub colon_define: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodParam {
    pub name: SmolStr,
    pub ty: LuaType,
    pub nullable: bool,
}

impl LuaMethod {
    /// Type of the first return value
    pub fn first_return(&self) -> LuaType {
        self.returns.first().cloned().unwrap_or(LuaType::Unknown)
    }

    /// Format as a signature label, `name(a: T, b: U): R`
    pub fn signature(&self, name: &str) -> String {
        let params = self
            .params
            .iter()
            .map(MethodParam::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let mut label = format!("{name}({params})");
        if !self.returns.is_empty() {
            let returns = self
                .returns
                .iter()
                .map(LuaType::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            label.push_str(": ");
            label.push_str(&returns);
        }
        label
    }
}

impl fmt::Display for MethodParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let optional = if self.nullable { "?" } else { "" };
        if self.ty.is_unknown() {
            write!(f, "{}{}", self.name, optional)
        } else {
            write!(f, "{}{}: {}", self.name, optional, self.ty)
        }
    }
}

impl fmt::Display for LuaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LuaType::Unknown => f.write_str("unknown"),
            LuaType::Nil => f.write_str("nil"),
            LuaType::Named(name) | LuaType::GenericParam(name) => f.write_str(name),
            LuaType::Generic { name, args } => {
                write!(f, "{name}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            LuaType::Array(element) => match element.as_ref() {
                LuaType::Union(_) | LuaType::Method(_) => write!(f, "({element})[]"),
                _ => write!(f, "{element}[]"),
            },
            LuaType::TableLiteral(_) => f.write_str("table"),
            LuaType::Union(union) => {
                for (i, member) in union.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
            LuaType::Method(method) => f.write_str(&method.signature("fun")),
        }
    }
}

/// Key addressing a structural member
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IndexKey {
    Integer(i64),
    String(SmolStr),
    Ty(LuaType),
}

impl IndexKey {
    /// Keys match only within the same variant.
    pub fn matches(&self, other: &IndexKey) -> bool {
        match (self, other) {
            (IndexKey::Integer(a), IndexKey::Integer(b)) => a == b,
            (IndexKey::String(a), IndexKey::String(b)) => a == b,
            (IndexKey::Ty(a), IndexKey::Ty(b)) => a == b,
            _ => false,
        }
    }

    /// The builtin type a literal key belongs to, for `[integer]`-style members
    pub fn literal_type(&self) -> Option<LuaType> {
        match self {
            IndexKey::Integer(_) => Some(LuaType::named("integer")),
            IndexKey::String(_) => Some(LuaType::named("string")),
            IndexKey::Ty(_) => None,
        }
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKey::Integer(i) => write!(f, "[{i}]"),
            IndexKey::String(name) => f.write_str(name),
            IndexKey::Ty(ty) => write!(f, "[{ty}]"),
        }
    }
}
