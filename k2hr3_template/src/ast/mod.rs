//! Template tree: node kinds and their arena
//!
//! Nodes live in an [`Arena`] and refer to each other by [`NodeId`]. The
//! `parent` link is non-owning; `next` and the kind-specific links
//! (`child`, `left`, `right`, `init`, `aux`, subscript index) each point at
//! a node owned by exactly one holder.

pub mod arena;
pub mod nodes;

pub use arena::{Arena, ArenaError, Checkpoint, Slot};
pub use nodes::{
    CalcOp, CondOp, Node, NodeId, NodeKind, NodeType, Subscript, SubscriptKind, SyntaxKind,
    SyntaxNode, VariableNode,
};
