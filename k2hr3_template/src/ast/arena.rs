//! Node storage with journaled link changes for backtracking

use super::nodes::{Node, NodeId, NodeKind, NodeType, Subscript, VariableNode};
use crate::utils::Span;
use std::ops::Index;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArenaError {
    #[error("Node {node} ({node_type}) has no {slot:?} link")]
    InvalidSlot {
        node: NodeId,
        node_type: NodeType,
        slot: Slot,
    },

    #[error("Node {0} does not exist")]
    UnknownNode(NodeId),
}

/// Link fields a node may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Parent,
    Next,
    Child,
    Left,
    Right,
    Init,
    Aux,
}

#[derive(Debug, Clone)]
enum JournalEntry {
    Link {
        node: NodeId,
        slot: Slot,
        previous: Option<NodeId>,
    },
    Subscript {
        node: NodeId,
        previous: Option<Subscript>,
    },
    Assembled {
        node: NodeId,
        previous: bool,
    },
    Span {
        node: NodeId,
        previous: Span,
    },
}

/// Arena state to roll back to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    nodes: usize,
    journal: usize,
}

/// All nodes of one loaded template.
///
/// Every mutation of an existing node goes through the journal so that a
/// failed assembly attempt can be undone by [`Arena::restore`], including
/// links it rewired on nodes created before the attempt started.
#[derive(Debug, Clone, Default)]
pub struct Arena {
    nodes: Vec<Node>,
    journal: Vec<JournalEntry>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind, span));
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            nodes: self.nodes.len(),
            journal: self.journal.len(),
        }
    }

    /// Undo every change made since `checkpoint`
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        while self.journal.len() > checkpoint.journal {
            let Some(entry) = self.journal.pop() else {
                break;
            };
            match entry {
                JournalEntry::Link {
                    node,
                    slot,
                    previous,
                } => {
                    if let Some(link) = self.slot_mut(node, slot) {
                        *link = previous;
                    }
                }
                JournalEntry::Subscript { node, previous } => {
                    if let Some(index) = self.subscript_mut(node) {
                        *index = previous;
                    }
                }
                JournalEntry::Assembled { node, previous } => {
                    if let Some(target) = self.nodes.get_mut(node.0) {
                        target.assembled = previous;
                    }
                }
                JournalEntry::Span { node, previous } => {
                    if let Some(target) = self.nodes.get_mut(node.0) {
                        target.span = previous;
                    }
                }
            }
        }
        self.nodes.truncate(checkpoint.nodes);
    }

    /// Forget the journal once no checkpoint can be restored any more
    pub fn commit(&mut self) {
        self.journal.clear();
    }

    pub fn slot(&self, node: NodeId, slot: Slot) -> Option<NodeId> {
        let target = self.nodes.get(node.0)?;
        match slot {
            Slot::Parent => target.parent,
            Slot::Next => target.next,
            _ => match &target.kind {
                NodeKind::Print { child } if slot == Slot::Child => *child,
                NodeKind::Calculate { left, right, .. } | NodeKind::Condition { left, right, .. } => {
                    match slot {
                        Slot::Left => *left,
                        Slot::Right => *right,
                        _ => None,
                    }
                }
                NodeKind::Syntax(syntax) => match slot {
                    Slot::Left => syntax.left,
                    Slot::Right => syntax.right,
                    Slot::Child => syntax.child,
                    Slot::Init => syntax.init,
                    Slot::Aux => syntax.aux,
                    _ => None,
                },
                _ => None,
            },
        }
    }

    /// Set a link, recording the old value
    pub fn link(&mut self, node: NodeId, slot: Slot, target: Option<NodeId>) -> Result<(), ArenaError> {
        let node_type = self
            .nodes
            .get(node.0)
            .map(Node::node_type)
            .ok_or(ArenaError::UnknownNode(node))?;

        let link = self.slot_mut(node, slot).ok_or(ArenaError::InvalidSlot {
            node,
            node_type,
            slot,
        })?;
        let previous = std::mem::replace(link, target);
        self.journal.push(JournalEntry::Link {
            node,
            slot,
            previous,
        });
        Ok(())
    }

    /// Link `child` under `owner` and point its parent back at `owner`
    pub fn adopt(&mut self, owner: NodeId, slot: Slot, child: NodeId) -> Result<(), ArenaError> {
        self.link(owner, slot, Some(child))?;
        self.link(child, Slot::Parent, Some(owner))
    }

    pub fn set_subscript(&mut self, node: NodeId, subscript: Subscript) -> Result<(), ArenaError> {
        let index = self.subscript_mut(node).ok_or(ArenaError::UnknownNode(node))?;
        let previous = index.replace(subscript);
        self.journal.push(JournalEntry::Subscript { node, previous });
        self.link(subscript.expr, Slot::Parent, Some(node))
    }

    pub fn mark_assembled(&mut self, node: NodeId) -> Result<(), ArenaError> {
        let target = self
            .nodes
            .get_mut(node.0)
            .ok_or(ArenaError::UnknownNode(node))?;
        let previous = std::mem::replace(&mut target.assembled, true);
        self.journal.push(JournalEntry::Assembled { node, previous });
        Ok(())
    }

    pub fn set_span(&mut self, node: NodeId, span: Span) -> Result<(), ArenaError> {
        let target = self
            .nodes
            .get_mut(node.0)
            .ok_or(ArenaError::UnknownNode(node))?;
        let previous = std::mem::replace(&mut target.span, span);
        self.journal.push(JournalEntry::Span { node, previous });
        Ok(())
    }

    /// Walk the parent chain starting at `from` (inclusive)
    pub fn ancestors(&self, from: Option<NodeId>) -> Ancestors<'_> {
        Ancestors {
            arena: self,
            current: from,
        }
    }

    /// `node` and every node reachable through owned links and `next`
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut visited = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };
            visited.push(id);
            if let Some(next) = node.next {
                stack.push(next);
            }
            stack.extend(node.kind.children().into_iter().rev());
        }
        visited
    }

    fn slot_mut(&mut self, node: NodeId, slot: Slot) -> Option<&mut Option<NodeId>> {
        let target = self.nodes.get_mut(node.0)?;
        match slot {
            Slot::Parent => Some(&mut target.parent),
            Slot::Next => Some(&mut target.next),
            _ => match &mut target.kind {
                NodeKind::Print { child } if slot == Slot::Child => Some(child),
                NodeKind::Calculate { left, right, .. } | NodeKind::Condition { left, right, .. } => {
                    match slot {
                        Slot::Left => Some(left),
                        Slot::Right => Some(right),
                        _ => None,
                    }
                }
                NodeKind::Syntax(syntax) => match slot {
                    Slot::Left => Some(&mut syntax.left),
                    Slot::Right => Some(&mut syntax.right),
                    Slot::Child => Some(&mut syntax.child),
                    Slot::Init => Some(&mut syntax.init),
                    Slot::Aux => Some(&mut syntax.aux),
                    _ => None,
                },
                _ => None,
            },
        }
    }

    fn subscript_mut(&mut self, node: NodeId) -> Option<&mut Option<Subscript>> {
        match &mut self.nodes.get_mut(node.0)?.kind {
            NodeKind::Variable(VariableNode::Named { index, .. }) => Some(index),
            _ => None,
        }
    }
}

impl Index<NodeId> for Arena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

pub struct Ancestors<'a> {
    arena: &'a Arena,
    current: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.arena.get(id).and_then(|node| node.parent);
        Some(id)
    }
}
