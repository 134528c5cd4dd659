//! Project management: module paths and workspace loading.

mod error;
pub mod module_index;
pub mod workspace_loader;

pub use error::LoadError;
pub use module_index::{ModuleIndex, module_name};
pub use workspace_loader::WorkspaceLoader;
