//! Assembler: builds the template tree from the token stream
//!
//! Every statement is offered to the node builders in a fixed order. A
//! builder whose attempt fails has its tokens and tree changes rolled back
//! before the next one is tried, and its error is kept for the diagnostic
//! reported when no builder succeeds.

pub mod builders;
mod error;

pub use error::{AssembleError, AssembleResult};

use crate::ast::{Arena, Checkpoint, NodeId, NodeType, Slot};
use crate::config::compile_time::assembler::{MAX_ASSEMBLE_DEPTH, MAX_ERROR_HISTORY};
use crate::logging::codes;
use crate::tokens::{Token, TokenStream};
use crate::utils::Span;
use crate::{log_debug, log_error, log_success};
use builders::BUILDERS;
use std::collections::VecDeque;

/// Position to roll back to after a failed attempt
#[derive(Debug, Clone, Copy)]
pub struct AssemblerCheckpoint {
    pub position: usize,
    arena: Checkpoint,
}

/// Assembled forest of top-level statements
#[derive(Debug, Clone, Default)]
pub struct AssembledTemplate {
    pub arena: Arena,
    pub roots: Vec<NodeId>,
}

pub struct Assembler {
    pub(crate) tokens: TokenStream,
    pub(crate) arena: Arena,
    error_history: VecDeque<AssembleError>,
    depth: usize,
}

impl Assembler {
    pub fn new(tokens: TokenStream) -> Self {
        log_debug!("Creating assembler", "tokens" => tokens.len());

        Self {
            tokens,
            arena: Arena::new(),
            error_history: VecDeque::new(),
            depth: 0,
        }
    }

    /// Assemble every statement of the stream as a top-level node
    pub fn assemble_all(mut self) -> AssembleResult<AssembledTemplate> {
        let mut roots = Vec::new();

        while !self.tokens.is_at_end() {
            match self.assemble_statement(None) {
                Ok(node) => {
                    roots.push(node);
                    self.arena.commit();
                }
                Err(error) => {
                    log_error!(error.error_code(), "Template assembly failed",
                        span = error.span().unwrap_or_else(|| self.tokens.current_span()),
                        "reason" => &error,
                        "attempts" => self.error_history.len());
                    return Err(error);
                }
            }
        }

        log_success!(codes::success::ASSEMBLY_COMPLETE, "Template assembled",
            "statements" => roots.len(),
            "nodes" => self.arena.len());

        Ok(AssembledTemplate {
            arena: self.arena,
            roots,
        })
    }

    /// Try each builder in order against the statement at the cursor
    pub(crate) fn assemble_statement(&mut self, parent: Option<NodeId>) -> AssembleResult<NodeId> {
        self.enter()?;
        let result = self.try_builders(parent);
        self.leave();
        result
    }

    fn try_builders(&mut self, parent: Option<NodeId>) -> AssembleResult<NodeId> {
        let mut first_error = None;

        for builder in BUILDERS.iter() {
            if !(builder.can_attempt)(self) {
                continue;
            }

            let checkpoint = self.checkpoint();
            match (builder.assemble)(self, parent) {
                Ok(node) => return Ok(node),
                Err(error) => {
                    self.restore(checkpoint);
                    log_debug!("Builder attempt failed",
                        "node_type" => builder.node_type,
                        "reason" => &error);
                    self.record_error(error.clone());
                    if first_error.is_none() {
                        first_error = Some(error);
                    }
                }
            }
        }

        Err(first_error.unwrap_or_else(|| AssembleError::UnknownStatement {
            found: self
                .tokens
                .current_token()
                .map(Token::describe)
                .unwrap_or_else(|| "end of template".to_string()),
            span: self.tokens.current_span(),
        }))
    }

    /// Assemble the statements of a block owned by `owner` until a
    /// terminator attaches itself as `owner.right`.
    ///
    /// Each statement's parent is the statement before it, so terminators
    /// can walk back through the block to the construct they close.
    pub(crate) fn assemble_body(&mut self, owner: NodeId) -> AssembleResult<()> {
        let mut last = owner;

        loop {
            if self.arena.slot(owner, Slot::Right).is_some() {
                return Ok(());
            }

            if self.tokens.is_at_end() {
                let keyword = self.arena[owner]
                    .kind
                    .syntax_kind()
                    .ok_or(crate::ast::ArenaError::UnknownNode(owner))?;
                return Err(AssembleError::UnterminatedBlock {
                    keyword,
                    span: self.arena[owner].span,
                });
            }

            let statement = self.assemble_statement(Some(last))?;

            if self.arena.slot(owner, Slot::Right).is_some() {
                return Ok(());
            }

            let slot = if last == owner { Slot::Child } else { Slot::Next };
            self.arena.link(last, slot, Some(statement))?;
            last = statement;
        }
    }

    pub fn checkpoint(&self) -> AssemblerCheckpoint {
        AssemblerCheckpoint {
            position: self.tokens.save_position(),
            arena: self.arena.checkpoint(),
        }
    }

    pub fn restore(&mut self, checkpoint: AssemblerCheckpoint) {
        self.tokens.restore_position(checkpoint.position);
        self.arena.restore(checkpoint.arena);
    }

    pub(crate) fn enter(&mut self) -> AssembleResult<()> {
        if self.depth >= MAX_ASSEMBLE_DEPTH {
            return Err(AssembleError::MaxDepthExceeded {
                max: MAX_ASSEMBLE_DEPTH,
                span: self.tokens.current_span(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Span from the token at `start` to the last consumed token
    pub(crate) fn span_from(&self, start: usize) -> Span {
        self.tokens.span_from(start)
    }

    fn record_error(&mut self, error: AssembleError) {
        if self.error_history.len() >= MAX_ERROR_HISTORY {
            self.error_history.pop_front();
        }
        self.error_history.push_back(error);
    }

    /// Failed builder attempts, oldest first
    pub fn error_history(&self) -> Vec<&AssembleError> {
        self.error_history.iter().collect()
    }

    pub fn builder_order() -> Vec<NodeType> {
        BUILDERS.iter().map(|builder| builder.node_type).collect()
    }
}

/// Convenience wrapper: assemble a whole token stream
pub fn assemble(tokens: TokenStream) -> AssembleResult<AssembledTemplate> {
    Assembler::new(tokens).assemble_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CalcOp, CondOp, NodeKind, SyntaxKind, VariableNode};
    use crate::evaluator::Value;
    use crate::segmenter::segment;
    use assert_matches::assert_matches;

    fn assemble_source(source: &str) -> AssembleResult<AssembledTemplate> {
        let mut segments = segment(source).unwrap();
        let tokens = TokenStream::from_segments(&mut segments).unwrap();
        assemble(tokens)
    }

    /// Render an expression subtree in fully parenthesised form
    fn render(arena: &Arena, id: NodeId) -> String {
        match &arena[id].kind {
            NodeKind::Variable(VariableNode::Literal(value)) => value.to_json().to_string(),
            NodeKind::Variable(VariableNode::Named { name, index }) => match index {
                Some(subscript) => format!("{}[{}]", name, render(arena, subscript.expr)),
                None => name.clone(),
            },
            NodeKind::Calculate { op, left, right } => match (left, right) {
                (Some(l), Some(r)) => {
                    format!("({} {} {})", render(arena, *l), op.symbol(), render(arena, *r))
                }
                (Some(l), None) => format!("({}{})", render(arena, *l), op.symbol()),
                (None, Some(r)) => format!("({}{})", op.symbol(), render(arena, *r)),
                (None, None) => op.symbol().to_string(),
            },
            NodeKind::Condition { op, left, right } => format!(
                "({} {} {})",
                left.map(|l| render(arena, l)).unwrap_or_default(),
                op.symbol(),
                right.map(|r| render(arena, r)).unwrap_or_default()
            ),
            NodeKind::Print { child } => {
                format!("print {}", child.map(|c| render(arena, c)).unwrap_or_default())
            }
            other => other.node_type().to_string(),
        }
    }

    fn print_expression(source: &str) -> String {
        let template = assemble_source(source).unwrap();
        render(&template.arena, template.roots[0])
    }

    #[test]
    fn test_builder_order() {
        assert_eq!(
            Assembler::builder_order(),
            vec![
                NodeType::Static,
                NodeType::Comment,
                NodeType::Print,
                NodeType::Syntax,
                NodeType::Condition,
                NodeType::Calculate,
                NodeType::Variable,
            ]
        );
    }

    #[test]
    fn test_precedence_rotation() {
        assert_eq!(print_expression("{{= 2 + 3 * 4}}"), "print (2 + (3 * 4))");
        assert_eq!(print_expression("{{= 2 * 3 + 4}}"), "print ((2 * 3) + 4)");
        assert_eq!(
            print_expression("{{= 1 < 2 && 2 < 1}}"),
            "print ((1 < 2) && (2 < 1))"
        );
        assert_eq!(
            print_expression("{{= %a% + %b% * %c% - %d%}}"),
            "print ((a + (b * c)) - d)"
        );
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(print_expression("{{= 10 - 4 - 3}}"), "print ((10 - 4) - 3)");
        assert_eq!(print_expression("{{= 8 / 4 / 2}}"), "print ((8 / 4) / 2)");
    }

    #[test]
    fn test_assignment_is_right_associative_and_lowest() {
        assert_eq!(
            print_expression("{{%a% = %b% = 1 + 2}}"),
            "(a = (b = (1 + 2)))"
        );
    }

    #[test]
    fn test_unary_operators() {
        assert_eq!(print_expression("{{= -%a% * 2}}"), "print ((-a) * 2)");
        assert_eq!(print_expression("{{= !%a% && %b%}}"), "print ((!a) && b)");
        assert_eq!(print_expression("{{%i%++}}"), "(i++)");
        assert_eq!(print_expression("{{++%i%}}"), "(++i)");
        assert_eq!(print_expression("{{= %i%++ + 1}}"), "print ((i++) + 1)");
    }

    #[test]
    fn test_subscripts() {
        assert_eq!(print_expression("{{= %b%[%c% + 1]}}"), "print b[(c + 1)]");
        assert_eq!(print_expression("{{= %o%{'key'}}}"), "print o[\"key\"]");
    }

    #[test]
    fn test_parent_links_follow_rotation() {
        let template = assemble_source("{{= 2 + 3 * 4}}").unwrap();
        let arena = &template.arena;
        let print = template.roots[0];
        let NodeKind::Print { child: Some(add) } = arena[print].kind else {
            panic!("expected print with child");
        };
        assert_eq!(arena[add].parent, Some(print));
        let NodeKind::Calculate {
            op: CalcOp::Add,
            right: Some(mul),
            ..
        } = arena[add].kind
        else {
            panic!("expected addition at the root");
        };
        assert_eq!(arena[mul].parent, Some(add));
        assert!(arena.iter().all(|(_, node)| node.assembled));
    }

    #[test]
    fn test_if_chain() {
        let template =
            assemble_source("{{if %x% > 5}}big{{elif %x% > 1}}mid{{else}}small{{endif}}tail")
                .unwrap();
        let arena = &template.arena;
        assert_eq!(template.roots.len(), 2);

        let branch = arena[template.roots[0]].kind.as_syntax().unwrap();
        assert_eq!(branch.kind, SyntaxKind::If);
        assert_matches!(
            arena[branch.left.unwrap()].kind,
            NodeKind::Condition { op: CondOp::Gt, .. }
        );
        assert_matches!(arena[branch.child.unwrap()].kind, NodeKind::StaticText(ref t) if t == "big");

        let elif = arena[branch.right.unwrap()].kind.as_syntax().unwrap();
        assert_eq!(elif.kind, SyntaxKind::Elif);
        let other = arena[elif.right.unwrap()].kind.as_syntax().unwrap();
        assert_eq!(other.kind, SyntaxKind::Else);
        let end = arena[other.right.unwrap()].kind.as_syntax().unwrap();
        assert_eq!(end.kind, SyntaxKind::EndIf);
        assert_eq!(arena[template.roots[0]].next, None);
    }

    #[test]
    fn test_body_statements_chain_through_next() {
        let template = assemble_source("{{while %a%}}x{{=%a%}}y{{done}}").unwrap();
        let arena = &template.arena;
        let looped = arena[template.roots[0]].kind.as_syntax().unwrap();
        let first = looped.child.unwrap();
        let second = arena[first].next.unwrap();
        let third = arena[second].next.unwrap();
        assert_eq!(arena[third].next, None);
        assert_eq!(arena[second].parent, Some(first));
        assert_matches!(arena[looped.right.unwrap()].kind.syntax_kind(), Some(SyntaxKind::Done));
    }

    #[test]
    fn test_for_header() {
        let template = assemble_source("{{for %i%=0; %i%<3; %i%++}}{{=%i%}}{{done}}").unwrap();
        let arena = &template.arena;
        let looped = arena[template.roots[0]].kind.as_syntax().unwrap();
        assert_eq!(render(arena, looped.init.unwrap()), "(i = 0)");
        assert_eq!(render(arena, looped.left.unwrap()), "(i < 3)");
        assert_eq!(render(arena, looped.aux.unwrap()), "(i++)");
    }

    #[test]
    fn test_for_with_empty_clauses() {
        let template = assemble_source("{{for ; %i% < 3 ;}}{{break}}{{done}}").unwrap();
        let looped = template.arena[template.roots[0]].kind.as_syntax().unwrap();
        assert!(looped.init.is_none());
        assert!(looped.aux.is_none());
        assert!(looped.left.is_some());
    }

    #[test]
    fn test_for_requires_condition() {
        let result = assemble_source("{{for %i% = 0;;}}{{done}}");
        assert_matches!(result, Err(AssembleError::UnexpectedEnd { .. }));
    }

    #[test]
    fn test_foreach_structure() {
        let template = assemble_source("{{foreach %v% in %arr%}}{{=%v%}}{{done}}").unwrap();
        let arena = &template.arena;
        let looped = arena[template.roots[0]].kind.as_syntax().unwrap();
        assert_eq!(arena[looped.left.unwrap()].kind.variable_name(), Some("v"));
        let source = arena[looped.aux.unwrap()].kind.as_syntax().unwrap();
        assert_eq!(source.kind, SyntaxKind::In);
        assert_eq!(arena[source.left.unwrap()].kind.variable_name(), Some("arr"));
    }

    #[test]
    fn test_foreach_rejects_literal_binding() {
        let result = assemble_source("{{foreach 1 in %arr%}}{{done}}");
        assert_matches!(result, Err(AssembleError::InvalidOperand { .. }));
    }

    #[test]
    fn test_do_while() {
        let template = assemble_source("{{do}}{{%i%++}}{{while %i% < 3}}after").unwrap();
        let arena = &template.arena;
        assert_eq!(template.roots.len(), 2);
        let looped = arena[template.roots[0]].kind.as_syntax().unwrap();
        assert_eq!(looped.kind, SyntaxKind::Do);
        let terminator = arena[looped.right.unwrap()].kind.as_syntax().unwrap();
        assert_eq!(terminator.kind, SyntaxKind::While);
        assert!(terminator.left.is_some());
        assert!(terminator.child.is_none());
    }

    #[test]
    fn test_while_inside_if_inside_do_is_a_loop() {
        let source = "{{do}}{{if %a%}}{{while %b%}}x{{done}}{{endif}}{{while %c%}}";
        let template = assemble_source(source).unwrap();
        assert_eq!(template.roots.len(), 1);
    }

    #[test]
    fn test_nested_constructs() {
        let source = "{{if %a%}}{{if %b%}}x{{endif}}{{while %c%}}{{break}}{{done}}{{endif}}";
        let template = assemble_source(source).unwrap();
        assert_eq!(template.roots.len(), 1);
    }

    #[test]
    fn test_unmatched_terminators() {
        assert_matches!(
            assemble_source("{{endif}}"),
            Err(AssembleError::UnmatchedTerminator { keyword: SyntaxKind::EndIf, .. })
        );
        assert_matches!(
            assemble_source("{{while %a%}}{{endif}}"),
            Err(AssembleError::UnmatchedTerminator { keyword: SyntaxKind::EndIf, .. })
        );
        assert_matches!(
            assemble_source("{{do}}x{{done}}"),
            Err(AssembleError::UnmatchedTerminator { keyword: SyntaxKind::Done, .. })
        );
    }

    #[test]
    fn test_unterminated_block() {
        assert_matches!(
            assemble_source("{{if %a%}}x"),
            Err(AssembleError::UnterminatedBlock { keyword: SyntaxKind::If, .. })
        );
        assert_matches!(
            assemble_source("{{do}}x"),
            Err(AssembleError::UnterminatedBlock { keyword: SyntaxKind::Do, .. })
        );
    }

    #[test]
    fn test_misplaced_control() {
        assert_matches!(
            assemble_source("{{break}}"),
            Err(AssembleError::MisplacedControl { keyword: SyntaxKind::Break, .. })
        );
        assert_matches!(
            assemble_source("{{if %a%}}{{continue}}{{endif}}"),
            Err(AssembleError::MisplacedControl { keyword: SyntaxKind::Continue, .. })
        );
        assert!(assemble_source("{{while %a%}}{{if %b%}}{{continue}}{{endif}}{{done}}").is_ok());
    }

    #[test]
    fn test_if_requires_condition() {
        assert_matches!(
            assemble_source("{{if}}x{{endif}}"),
            Err(AssembleError::UnexpectedEnd { .. })
        );
    }

    #[test]
    fn test_condition_at_statement_start() {
        assert_matches!(
            assemble_source("{{== 1}}"),
            Err(AssembleError::InvalidOperand { node_type: NodeType::Condition, .. })
        );
    }

    #[test]
    fn test_trailing_units_rejected() {
        assert_matches!(
            assemble_source("{{= 1 2}}"),
            Err(AssembleError::UnexpectedUnit { .. })
        );
        assert_matches!(
            assemble_source("{{= 1 +}}"),
            Err(AssembleError::UnexpectedEnd { .. })
        );
    }

    #[test]
    fn test_unknown_word() {
        assert_matches!(
            assemble_source("{{= hello}}"),
            Err(AssembleError::InvalidLiteral { .. })
        );
        assert_matches!(
            assemble_source("{{hello}}"),
            Err(AssembleError::UnknownStatement { .. })
        );
    }

    #[test]
    fn test_comment_and_static() {
        let template = assemble_source("a{{# note }}b").unwrap();
        let arena = &template.arena;
        assert_eq!(template.roots.len(), 3);
        assert_matches!(arena[template.roots[1]].kind, NodeKind::Comment(ref text) if text == "# note");
        assert!(template.roots.iter().all(|id| arena[*id].parent.is_none()));
    }

    #[test]
    fn test_print_sub_statements() {
        let template = assemble_source("{{= 1; 'a'}}").unwrap();
        assert_eq!(template.roots.len(), 2);
        assert_eq!(render(&template.arena, template.roots[1]), "print \"a\"");
    }

    #[test]
    fn test_literal_values() {
        let template = assemble_source("{{= 0x1F + 0o17 + 0b101 + TRUE}}").unwrap();
        let arena = &template.arena;
        let literals: Vec<Value> = arena
            .iter()
            .filter_map(|(_, node)| match &node.kind {
                NodeKind::Variable(VariableNode::Literal(value)) => Some(value.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            literals,
            vec![
                Value::from(31),
                Value::from(15),
                Value::from(5),
                Value::from(true)
            ]
        );
    }

    #[test]
    fn test_failed_attempts_are_rolled_back() {
        let mut segments = segment("{{== 1}}").unwrap();
        let tokens = TokenStream::from_segments(&mut segments).unwrap();
        let mut assembler = Assembler::new(tokens);
        assert!(assembler.assemble_statement(None).is_err());
        assert_eq!(assembler.arena.len(), 0);
        assert_eq!(assembler.tokens.position(), 0);
        assert_eq!(assembler.error_history().len(), 1);
    }
}
