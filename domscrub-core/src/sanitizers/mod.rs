//! Text-level sanitizers.
//!
//! * `compiler` turns `sanitization` rule records into compiled text rules,
//!   partitioned into tree-scoped and global halves.
//! * `text_rules` applies both halves: the scoped half to the tree, the global
//!   half to the serialized string.
//! * `spacing` collapses runs of spaces in text nodes.

pub mod compiler;
pub mod spacing;
pub mod text_rules;
