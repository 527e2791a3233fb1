//! Shared primitive types used across segmentation, assembly and evaluation

pub mod span;

pub use span::{Position, SourceMap, Span, Spanned};
