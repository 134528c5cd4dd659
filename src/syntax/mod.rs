// Document-level syntax: parsed trees, node identity and position queries
pub mod file;
pub mod id;
pub mod name;

pub use file::LuaSyntaxTree;
pub use id::{ElementId, SyntaxId};
pub use name::{name_text, name_token};

// Re-export Position and Span from base for convenience
pub use crate::base::{Position, Span};
