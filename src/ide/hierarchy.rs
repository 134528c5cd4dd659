//! Type hierarchy: direct supertypes and subtypes of a named type.

use smol_str::SmolStr;

use crate::hir::{Compilation, LuaType};

use super::NavigationTarget;

/// One entry of a type hierarchy view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeHierarchyItem {
    pub name: SmolStr,
    /// Written form, e.g. `List<string>` for a generic supertype
    pub detail: String,
    /// Where the type is defined; `None` for builtins and unknown names
    pub target: Option<NavigationTarget>,
}

impl TypeHierarchyItem {
    fn new(compilation: &Compilation, name: SmolStr, detail: String) -> Self {
        let target = compilation
            .stub()
            .named_types
            .first(name.as_str())
            .and_then(|def| compilation.declaration(def.decl))
            .and_then(|decl| NavigationTarget::from_declaration(compilation, decl));
        Self {
            name,
            detail,
            target,
        }
    }
}

/// Types `name` directly extends, in declaration order.
pub fn supertypes(compilation: &Compilation, name: &str) -> Vec<TypeHierarchyItem> {
    compilation
        .search()
        .supertypes(name)
        .into_iter()
        .filter_map(|ty: LuaType| {
            let parent = ty.type_name()?.clone();
            Some(TypeHierarchyItem::new(compilation, parent, ty.to_string()))
        })
        .collect()
}

/// Types directly extending `name`, sorted by name.
pub fn subtypes(compilation: &Compilation, name: &str) -> Vec<TypeHierarchyItem> {
    compilation
        .search()
        .subtypes(name)
        .into_iter()
        .map(|child| {
            let detail = child.to_string();
            TypeHierarchyItem::new(compilation, child, detail)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hierarchy_both_directions() {
        let mut compilation = Compilation::default();
        compilation.update_document(
            "shapes.lua",
            "---@class Shape\n\n---@class Circle: Shape\n\n---@class Square: Shape\nlocal x",
        );
        let parents = supertypes(&compilation, "Circle");
        assert_eq!(parents.len(), 1);
        assert_eq!(parents[0].name, "Shape");
        assert!(parents[0].target.is_some());

        let children: Vec<SmolStr> = subtypes(&compilation, "Shape").into_iter().map(|i| i.name).collect();
        assert_eq!(children, vec!["Circle", "Square"]);
    }

    #[test]
    fn test_builtin_supertype_has_no_target() {
        let mut compilation = Compilation::default();
        compilation.update_document("main.lua", "---@class Text: string\nlocal x");
        let parents = supertypes(&compilation, "Text");
        assert_eq!(parents[0].name, "string");
        assert!(parents[0].target.is_none());
    }
}
