//! Foundation types for the Luna toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`DocumentId`] - Opaque document identifiers
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//! - [`Position`], [`Span`] - Line/column positions for editor-facing results
//!
//! This module has NO dependencies on other luna modules.

mod document_id;
mod position;
mod span;

pub use document_id::DocumentId;
pub use position::{Position, Span};
pub use span::{LineCol, LineIndex, TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
