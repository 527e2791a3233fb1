//! Node kinds of the assembled template tree

use crate::evaluator::Value;
use crate::utils::Span;
use serde::Serialize;
use std::fmt;

/// Index of a node inside an [`super::Arena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Arithmetic, assignment and bitwise operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CalcOp {
    Not,
    Inc,
    Dec,
    Set,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    Lshift,
    Rshift,
}

impl CalcOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CalcOp::Not => "!",
            CalcOp::Inc => "++",
            CalcOp::Dec => "--",
            CalcOp::Set => "=",
            CalcOp::Add => "+",
            CalcOp::Sub => "-",
            CalcOp::Mul => "*",
            CalcOp::Div => "/",
            CalcOp::Rem => "%",
            CalcOp::BitAnd => "&",
            CalcOp::BitOr => "|",
            CalcOp::Lshift => "<<",
            CalcOp::Rshift => ">>",
        }
    }

    pub fn from_unit(unit: &str) -> Option<CalcOp> {
        Some(match unit {
            "!" => CalcOp::Not,
            "++" => CalcOp::Inc,
            "--" => CalcOp::Dec,
            "=" => CalcOp::Set,
            "+" => CalcOp::Add,
            "-" => CalcOp::Sub,
            "*" => CalcOp::Mul,
            "/" => CalcOp::Div,
            "%" => CalcOp::Rem,
            "&" => CalcOp::BitAnd,
            "|" => CalcOp::BitOr,
            "<<" => CalcOp::Lshift,
            ">>" => CalcOp::Rshift,
            _ => return None,
        })
    }

    /// Operators that may start an expression
    pub fn is_prefix(&self) -> bool {
        matches!(self, CalcOp::Not | CalcOp::Sub | CalcOp::Inc | CalcOp::Dec)
    }
}

/// Logical and relational operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CondOp {
    And,
    Or,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
}

impl CondOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CondOp::And => "&&",
            CondOp::Or => "||",
            CondOp::Lt => "<",
            CondOp::Gt => ">",
            CondOp::Le => "<=",
            CondOp::Ge => ">=",
            CondOp::Eq => "==",
            CondOp::Ne => "!=",
        }
    }

    pub fn from_unit(unit: &str) -> Option<CondOp> {
        Some(match unit {
            "&&" => CondOp::And,
            "||" => CondOp::Or,
            "<" => CondOp::Lt,
            ">" => CondOp::Gt,
            "<=" => CondOp::Le,
            ">=" => CondOp::Ge,
            "==" => CondOp::Eq,
            "!=" => CondOp::Ne,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SyntaxKind {
    If,
    Elif,
    Else,
    EndIf,
    While,
    Do,
    Done,
    For,
    Foreach,
    In,
    Break,
    Continue,
}

impl SyntaxKind {
    pub fn is_loop(&self) -> bool {
        matches!(
            self,
            SyntaxKind::While | SyntaxKind::Do | SyntaxKind::For | SyntaxKind::Foreach
        )
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            SyntaxKind::If => "if",
            SyntaxKind::Elif => "elif",
            SyntaxKind::Else => "else",
            SyntaxKind::EndIf => "endif",
            SyntaxKind::While => "while",
            SyntaxKind::Do => "do",
            SyntaxKind::Done => "done",
            SyntaxKind::For => "for",
            SyntaxKind::Foreach => "foreach",
            SyntaxKind::In => "in",
            SyntaxKind::Break => "break",
            SyntaxKind::Continue => "continue",
        }
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubscriptKind {
    /// `[expr]`
    Array,
    /// `{expr}`
    Object,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Subscript {
    pub kind: SubscriptKind,
    pub expr: NodeId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum VariableNode {
    Named {
        name: String,
        index: Option<Subscript>,
    },
    Literal(Value),
}

/// Control construct. `left` holds the condition or bound variable,
/// `child` the body, `right` the next link of the construct chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntaxNode {
    pub kind: SyntaxKind,
    pub left: Option<NodeId>,
    pub child: Option<NodeId>,
    pub init: Option<NodeId>,
    pub aux: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl SyntaxNode {
    pub fn new(kind: SyntaxKind) -> Self {
        Self {
            kind,
            left: None,
            child: None,
            init: None,
            aux: None,
            right: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NodeKind {
    StaticText(String),
    Comment(String),
    Print {
        child: Option<NodeId>,
    },
    Variable(VariableNode),
    Calculate {
        op: CalcOp,
        left: Option<NodeId>,
        right: Option<NodeId>,
    },
    Condition {
        op: CondOp,
        left: Option<NodeId>,
        right: Option<NodeId>,
    },
    Syntax(SyntaxNode),
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::StaticText(_) => NodeType::Static,
            NodeKind::Comment(_) => NodeType::Comment,
            NodeKind::Print { .. } => NodeType::Print,
            NodeKind::Variable(_) => NodeType::Variable,
            NodeKind::Calculate { .. } => NodeType::Calculate,
            NodeKind::Condition { .. } => NodeType::Condition,
            NodeKind::Syntax(_) => NodeType::Syntax,
        }
    }

    pub fn syntax_kind(&self) -> Option<SyntaxKind> {
        match self {
            NodeKind::Syntax(syntax) => Some(syntax.kind),
            _ => None,
        }
    }

    pub fn as_syntax(&self) -> Option<&SyntaxNode> {
        match self {
            NodeKind::Syntax(syntax) => Some(syntax),
            _ => None,
        }
    }

    pub fn variable_name(&self) -> Option<&str> {
        match self {
            NodeKind::Variable(VariableNode::Named { name, .. }) => Some(name),
            _ => None,
        }
    }

    /// Owned links in evaluation order, `next` excluded
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::StaticText(_) | NodeKind::Comment(_) => Vec::new(),
            NodeKind::Print { child } => child.iter().copied().collect(),
            NodeKind::Variable(VariableNode::Named { index, .. }) => {
                index.iter().map(|subscript| subscript.expr).collect()
            }
            NodeKind::Variable(VariableNode::Literal(_)) => Vec::new(),
            NodeKind::Calculate { left, right, .. } | NodeKind::Condition { left, right, .. } => {
                left.iter().chain(right.iter()).copied().collect()
            }
            NodeKind::Syntax(syntax) => [
                syntax.init,
                syntax.left,
                syntax.aux,
                syntax.child,
                syntax.right,
            ]
            .into_iter()
            .flatten()
            .collect(),
        }
    }
}

/// Node kinds in the order the assembler tries them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeType {
    Static,
    Comment,
    Print,
    Syntax,
    Condition,
    Calculate,
    Variable,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Static => "static",
            NodeType::Comment => "comment",
            NodeType::Print => "print",
            NodeType::Syntax => "syntax",
            NodeType::Condition => "condition",
            NodeType::Calculate => "calculate",
            NodeType::Variable => "variable",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    /// Structural parent, `None` for top-level statements
    pub parent: Option<NodeId>,
    /// Statement executed after this one
    pub next: Option<NodeId>,
    pub span: Span,
    /// Set once every required link is in place
    pub assembled: bool,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self {
            kind,
            parent: None,
            next: None,
            span,
            assembled: false,
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// One-line rendering used by tree dumps
    pub fn label(&self) -> String {
        match &self.kind {
            NodeKind::StaticText(text) => format!("static {:?}", text),
            NodeKind::Comment(text) => format!("comment {:?}", text),
            NodeKind::Print { .. } => "print".to_string(),
            NodeKind::Variable(VariableNode::Named { name, index }) => match index {
                Some(Subscript {
                    kind: SubscriptKind::Array,
                    ..
                }) => format!("variable %{}%[]", name),
                Some(Subscript {
                    kind: SubscriptKind::Object,
                    ..
                }) => format!("variable %{}%{{}}", name),
                None => format!("variable %{}%", name),
            },
            NodeKind::Variable(VariableNode::Literal(value)) => {
                format!("literal {}", value.to_json())
            }
            NodeKind::Calculate { op, left, .. } => {
                if left.is_none() && op.is_prefix() {
                    format!("calculate prefix '{}'", op.symbol())
                } else {
                    format!("calculate '{}'", op.symbol())
                }
            }
            NodeKind::Condition { op, .. } => format!("condition '{}'", op.symbol()),
            NodeKind::Syntax(syntax) => format!("syntax {}", syntax.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_lookup() {
        assert_eq!(CalcOp::from_unit("<<"), Some(CalcOp::Lshift));
        assert_eq!(CalcOp::from_unit("%"), Some(CalcOp::Rem));
        assert_eq!(CalcOp::from_unit("&&"), None);
        assert_eq!(CondOp::from_unit("&&"), Some(CondOp::And));
        assert_eq!(CondOp::from_unit("="), None);
    }

    #[test]
    fn test_syntax_children_order() {
        let mut syntax = SyntaxNode::new(SyntaxKind::For);
        syntax.init = Some(NodeId(1));
        syntax.left = Some(NodeId(2));
        syntax.aux = Some(NodeId(3));
        syntax.child = Some(NodeId(4));
        let kind = NodeKind::Syntax(syntax);
        assert_eq!(
            kind.children(),
            vec![NodeId(1), NodeId(2), NodeId(3), NodeId(4)]
        );
    }

    #[test]
    fn test_labels() {
        let node = Node::new(
            NodeKind::Variable(VariableNode::Named {
                name: "arr".into(),
                index: Some(Subscript {
                    kind: SubscriptKind::Array,
                    expr: NodeId(0),
                }),
            }),
            Span::dummy(),
        );
        assert_eq!(node.label(), "variable %arr%[]");
        assert_eq!(node.node_type(), NodeType::Variable);
    }
}
