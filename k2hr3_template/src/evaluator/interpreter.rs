//! Tree-walking interpreter over an assembled arena
//!
//! Statements produce an [`ExecutionResult`]; expressions produce an
//! [`ExecutionOutcome`] so `?` can short-circuit an operand failure up to
//! the enclosing statement, where it becomes a failed result. Text already
//! produced before a failure is kept.

use super::error::{ExecutionError, ExecutionOutcome};
use super::operators;
use super::result::{ExecutionResult, VariablePath};
use super::value::{Value, VariableMap};
use crate::ast::{
    Arena, CalcOp, CondOp, Node, NodeId, NodeKind, SubscriptKind, SyntaxKind, SyntaxNode,
    VariableNode,
};
use crate::config::compile_time::execution::MAX_EXECUTION_DEPTH;
use crate::log_debug;

pub struct Interpreter<'a> {
    arena: &'a Arena,
    variables: &'a mut VariableMap,
    depth: usize,
    loop_budget: Option<u64>,
}

impl<'a> Interpreter<'a> {
    pub fn new(arena: &'a Arena, variables: &'a mut VariableMap) -> Self {
        Self {
            arena,
            variables,
            depth: 0,
            loop_budget: None,
        }
    }

    /// Fail any single loop that runs more than `budget` iterations
    pub fn with_loop_budget(mut self, budget: Option<u64>) -> Self {
        self.loop_budget = budget;
        self
    }

    /// Execute top-level statements in order, stopping at the first failure
    pub fn execute_forest(&mut self, roots: &[NodeId]) -> ExecutionResult {
        let mut result = ExecutionResult::ok();
        for &root in roots {
            result = result.merge(self.execute(root));
            if !result.success {
                break;
            }
        }
        result
    }

    /// Execute `start` and the statements chained after it through `next`
    pub fn execute_chain(&mut self, start: Option<NodeId>) -> ExecutionResult {
        let mut result = ExecutionResult::ok();
        let mut current = start;

        while let Some(id) = current {
            result = result.merge(self.execute(id));
            if result.interrupts() {
                break;
            }
            current = self.arena.get(id).and_then(|node| node.next);
        }
        result
    }

    /// Execute a single statement node, `next` excluded
    pub fn execute(&mut self, id: NodeId) -> ExecutionResult {
        if let Err(error) = self.enter() {
            return failed(error);
        }
        let outcome = self.statement(id);
        self.leave();
        outcome.unwrap_or_else(failed)
    }

    fn enter(&mut self) -> ExecutionOutcome<()> {
        if self.depth >= MAX_EXECUTION_DEPTH {
            return Err(ExecutionError::MaxDepthExceeded {
                max: MAX_EXECUTION_DEPTH,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn node(&self, id: NodeId) -> ExecutionOutcome<&'a Node> {
        let arena = self.arena;
        match arena.get(id) {
            Some(node) if node.assembled => Ok(node),
            _ => Err(ExecutionError::UnassembledNode { node: id }),
        }
    }

    fn statement(&mut self, id: NodeId) -> ExecutionOutcome<ExecutionResult> {
        let node = self.node(id)?;
        match &node.kind {
            NodeKind::StaticText(text) => Ok(ExecutionResult::text(text.clone())),
            NodeKind::Comment(_) => Ok(ExecutionResult::ok()),
            NodeKind::Print { child } => {
                let printed = self.evaluate(required(id, *child)?)?;
                Ok(ExecutionResult::ok().insert_print(printed))
            }
            NodeKind::Syntax(syntax) => self.syntax(id, syntax),
            NodeKind::Variable(_) | NodeKind::Calculate { .. } | NodeKind::Condition { .. } => {
                self.evaluate(id)
            }
        }
    }

    /// Evaluate an expression node
    pub fn evaluate(&mut self, id: NodeId) -> ExecutionOutcome<ExecutionResult> {
        self.enter()?;
        let outcome = self.expression(id);
        self.leave();
        outcome
    }

    fn expression(&mut self, id: NodeId) -> ExecutionOutcome<ExecutionResult> {
        let node = self.node(id)?;
        match &node.kind {
            NodeKind::Variable(VariableNode::Literal(value)) => {
                Ok(ExecutionResult::value(value.clone()))
            }
            NodeKind::Variable(VariableNode::Named { name, index }) => {
                let index = match index {
                    Some(subscript) => {
                        Some((subscript.kind, self.evaluate(subscript.expr)?.last_value))
                    }
                    None => None,
                };
                self.lookup(name, index)
            }
            NodeKind::Calculate { op, left, right } => self.calculate(id, *op, *left, *right),
            NodeKind::Condition { op, left, right } => {
                let condition = self.condition(*op, required(id, *left)?, required(id, *right)?)?;
                Ok(ExecutionResult::value(Value::Bool(condition)))
            }
            _ => self.statement(id),
        }
    }

    /// Read a variable, creating it as null when missing
    fn lookup(
        &mut self,
        name: &str,
        index: Option<(SubscriptKind, Value)>,
    ) -> ExecutionOutcome<ExecutionResult> {
        let container = self
            .variables
            .entry(name.to_string())
            .or_insert(Value::Null);

        let Some((kind, index)) = index else {
            let value = container.clone();
            return Ok(ExecutionResult::value(value).with_path(Some(VariablePath::new(name))));
        };

        let value = match (kind, &index) {
            (SubscriptKind::Array, Value::Number(n)) => match (&*container, array_position(*n)) {
                (Value::Array(items), Some(position)) => {
                    items.get(position).cloned().unwrap_or_default()
                }
                _ => Value::Null,
            },
            (SubscriptKind::Object, Value::String(key)) => match &*container {
                Value::Object(entries) => entries.get(key).cloned().unwrap_or_default(),
                _ => Value::Null,
            },
            (SubscriptKind::Array, other) => {
                return Err(ExecutionError::type_mismatch("[]", "a number", other.kind_name()))
            }
            (SubscriptKind::Object, other) => {
                return Err(ExecutionError::type_mismatch("{}", "a string", other.kind_name()))
            }
        };

        let path = VariablePath::new(name).with_index(index);
        Ok(ExecutionResult::value(value).with_path(Some(path)))
    }

    /// Write `value` at `path`, creating the container when the name is null
    fn assign(&mut self, path: &VariablePath, value: Value) -> ExecutionOutcome<()> {
        let Some(index) = &path.index else {
            self.variables.insert(path.name.clone(), value);
            return Ok(());
        };

        let container = self
            .variables
            .entry(path.name.clone())
            .or_insert(Value::Null);

        match index {
            Value::Number(n) => {
                if container.is_null() {
                    *container = Value::Array(Vec::new());
                }
                let Value::Array(items) = container else {
                    return Err(ExecutionError::invalid_assignment(format!(
                        "{} is not an array",
                        VariablePath::new(&path.name)
                    )));
                };
                match array_position(*n) {
                    Some(position) if position < items.len() => items[position] = value,
                    Some(position) if position == items.len() => items.push(value),
                    _ => {
                        return Err(ExecutionError::invalid_assignment(format!(
                            "{} is out of range",
                            path
                        )))
                    }
                }
            }
            Value::String(key) => {
                if container.is_null() {
                    *container = Value::Object(Default::default());
                }
                let Value::Object(entries) = container else {
                    return Err(ExecutionError::invalid_assignment(format!(
                        "{} is not an object",
                        VariablePath::new(&path.name)
                    )));
                };
                entries.insert(key.clone(), value);
            }
            other => {
                return Err(ExecutionError::invalid_assignment(format!(
                    "{} cannot be used as an index",
                    other.kind_name()
                )))
            }
        }
        Ok(())
    }

    fn calculate(
        &mut self,
        id: NodeId,
        op: CalcOp,
        left: Option<NodeId>,
        right: Option<NodeId>,
    ) -> ExecutionOutcome<ExecutionResult> {
        match op {
            CalcOp::Set => {
                let target = self.evaluate(required(id, left)?)?;
                let path = writable(op, target.touched_path)?;
                let value = self.evaluate(required(id, right)?)?.last_value;
                self.assign(&path, value.clone())?;
                Ok(ExecutionResult::value(value).with_path(Some(path)))
            }
            CalcOp::Inc | CalcOp::Dec => {
                // postfix keeps the operand on the left, prefix on the right
                let target = self.evaluate(required(id, left.or(right))?)?;
                let value = operators::step(op, &target.last_value)?;
                let path = writable(op, target.touched_path)?;
                self.assign(&path, value.clone())?;
                Ok(ExecutionResult::value(value).with_path(Some(path)))
            }
            CalcOp::Not => {
                let operand = self.evaluate(required(id, right)?)?;
                Ok(ExecutionResult::value(Value::Bool(!operand.condition)))
            }
            CalcOp::Sub if left.is_none() => {
                let operand = self.evaluate(required(id, right)?)?;
                Ok(ExecutionResult::value(operators::negate(&operand.last_value)?))
            }
            _ => {
                let lhs = self.evaluate(required(id, left)?)?.last_value;
                let rhs = self.evaluate(required(id, right)?)?.last_value;
                Ok(ExecutionResult::value(operators::calculate(op, &lhs, &rhs)?))
            }
        }
    }

    /// `&&` and `||` short-circuit on the operands' condition flags
    fn condition(&mut self, op: CondOp, left: NodeId, right: NodeId) -> ExecutionOutcome<bool> {
        let lhs = self.evaluate(left)?;
        match op {
            CondOp::And if !lhs.condition => Ok(false),
            CondOp::Or if lhs.condition => Ok(true),
            CondOp::And | CondOp::Or => Ok(self.evaluate(right)?.condition),
            _ => {
                let rhs = self.evaluate(right)?;
                operators::compare(op, &lhs.last_value, &rhs.last_value)
            }
        }
    }

    fn syntax(&mut self, id: NodeId, syntax: &SyntaxNode) -> ExecutionOutcome<ExecutionResult> {
        match syntax.kind {
            SyntaxKind::If | SyntaxKind::Elif => {
                if self.evaluate(required(id, syntax.left)?)?.condition {
                    Ok(self.execute_chain(syntax.child))
                } else {
                    Ok(syntax
                        .right
                        .map(|branch| self.execute(branch))
                        .unwrap_or_default())
                }
            }
            SyntaxKind::Else => Ok(self.execute_chain(syntax.child)),
            SyntaxKind::EndIf | SyntaxKind::Done | SyntaxKind::In => Ok(ExecutionResult::ok()),
            SyntaxKind::Break => Ok(ExecutionResult::ok().with_break()),
            SyntaxKind::Continue => Ok(ExecutionResult::ok().with_continue()),
            SyntaxKind::While => self.run_while(id, syntax),
            SyntaxKind::Do => self.run_do(id, syntax),
            SyntaxKind::For => self.run_for(id, syntax),
            SyntaxKind::Foreach => self.run_foreach(id, syntax),
        }
    }

    fn run_while(&mut self, id: NodeId, syntax: &SyntaxNode) -> ExecutionOutcome<ExecutionResult> {
        let condition = required(id, syntax.left)?;
        let mut looped = LoopState::default();

        while self.loop_condition(&mut looped, condition) {
            if !self.iterate(&mut looped, syntax.child) {
                break;
            }
        }
        Ok(looped.finish())
    }

    fn run_do(&mut self, id: NodeId, syntax: &SyntaxNode) -> ExecutionOutcome<ExecutionResult> {
        let terminator = required(id, syntax.right)?;
        let condition = required(
            terminator,
            self.node(terminator)?.kind.as_syntax().and_then(|s| s.left),
        )?;
        let mut looped = LoopState::default();

        while self.iterate(&mut looped, syntax.child) {
            if !self.loop_condition(&mut looped, condition) {
                break;
            }
        }
        Ok(looped.finish())
    }

    fn run_for(&mut self, id: NodeId, syntax: &SyntaxNode) -> ExecutionOutcome<ExecutionResult> {
        if let Some(init) = syntax.init {
            self.evaluate(init)?;
        }
        let condition = required(id, syntax.left)?;
        let mut looped = LoopState::default();

        while self.loop_condition(&mut looped, condition) {
            if !self.iterate(&mut looped, syntax.child) {
                break;
            }
            if let Some(step) = syntax.aux {
                if let Err(error) = self.evaluate(step) {
                    looped.fail(error);
                    break;
                }
            }
        }
        Ok(looped.finish())
    }

    fn run_foreach(&mut self, id: NodeId, syntax: &SyntaxNode) -> ExecutionOutcome<ExecutionResult> {
        let in_node = required(id, syntax.aux)?;
        let source = required(
            in_node,
            self.node(in_node)?.kind.as_syntax().and_then(|s| s.left),
        )?;

        // iterate over a snapshot so the body may rewrite the source
        let items = match self.evaluate(source)?.last_value {
            Value::Array(items) => items,
            Value::Object(entries) => entries.into_keys().map(Value::String).collect(),
            Value::Null => Vec::new(),
            other => {
                return Err(ExecutionError::type_mismatch(
                    "foreach",
                    "an array or object",
                    other.kind_name(),
                ))
            }
        };

        let bound = self.evaluate(required(id, syntax.left)?)?;
        let target = writable(CalcOp::Set, bound.touched_path)?;
        let mut looped = LoopState::default();

        for item in items {
            if let Err(error) = self.assign(&target, item) {
                looped.fail(error);
                break;
            }
            if !self.iterate(&mut looped, syntax.child) {
                break;
            }
        }
        Ok(looped.finish())
    }

    fn loop_condition(&mut self, looped: &mut LoopState, condition: NodeId) -> bool {
        match self.evaluate(condition) {
            Ok(result) => result.condition,
            Err(error) => {
                looped.fail(error);
                false
            }
        }
    }

    /// Run one pass of a loop body; false once the loop has to stop
    fn iterate(&mut self, looped: &mut LoopState, body: Option<NodeId>) -> bool {
        if let Some(limit) = self.loop_budget {
            if looped.iterations >= limit {
                log_debug!("Loop budget exhausted", "limit" => limit);
                looped.fail(ExecutionError::LoopLimitExceeded { limit });
                return false;
            }
        }
        looped.iterations += 1;

        let pass = self.execute_chain(body);
        let stop = !pass.success || pass.is_break;
        looped.result = std::mem::take(&mut looped.result).merge(pass);
        looped.result.clear_loop_flags();
        !stop
    }
}

#[derive(Default)]
struct LoopState {
    result: ExecutionResult,
    iterations: u64,
}

impl LoopState {
    fn fail(&mut self, error: ExecutionError) {
        self.result = std::mem::take(&mut self.result).merge_stop(failed(error));
    }

    /// Loop control never escapes the loop it was raised in
    fn finish(mut self) -> ExecutionResult {
        self.result.clear_loop_flags();
        self.result
    }
}

fn failed(error: ExecutionError) -> ExecutionResult {
    ExecutionResult::failure(error.error_code(), error.to_string())
}

fn required(node: NodeId, link: Option<NodeId>) -> ExecutionOutcome<NodeId> {
    link.ok_or(ExecutionError::UnassembledNode { node })
}

fn writable(op: CalcOp, path: Option<VariablePath>) -> ExecutionOutcome<VariablePath> {
    path.ok_or_else(|| {
        ExecutionError::invalid_assignment(format!("'{}' needs a variable operand", op.symbol()))
    })
}

fn array_position(n: f64) -> Option<usize> {
    (n.is_finite() && n >= 0.0 && n.fract() == 0.0).then_some(n as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::assemble;
    use crate::logging::codes;
    use crate::segmenter::segment;
    use crate::tokens::TokenStream;

    fn run_with_budget(
        source: &str,
        variables: &mut VariableMap,
        budget: Option<u64>,
    ) -> ExecutionResult {
        let mut segments = segment(source).unwrap();
        let tokens = TokenStream::from_segments(&mut segments).unwrap();
        let template = assemble(tokens).unwrap();
        Interpreter::new(&template.arena, variables)
            .with_loop_budget(budget)
            .execute_forest(&template.roots)
    }

    fn run(source: &str, variables: &mut VariableMap) -> ExecutionResult {
        run_with_budget(source, variables, None)
    }

    fn render(source: &str) -> String {
        let result = run(source, &mut VariableMap::new());
        assert!(result.success, "{:?}", result.error);
        result.output_text
    }

    fn vars(entries: &[(&str, Value)]) -> VariableMap {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_static_and_comment() {
        assert_eq!(render("plain {{# note }}text"), "plain text");
    }

    #[test]
    fn test_print_arithmetic() {
        assert_eq!(render("{{= 1 + 2}}"), "3");
        assert_eq!(render("{{= 2 + 3 * 4}}"), "14");
        assert_eq!(render("{{= 10 - 4 - 3}}"), "3");
        assert_eq!(render("{{= -2 * 3}}"), "-6");
        assert_eq!(render("{{= 7 / 2}}"), "3.5");
    }

    #[test]
    fn test_print_emits_value_not_text() {
        assert_eq!(render("{{= 'a' + 'b'}}"), "ab");
        assert_eq!(render("{{= 1 + 'b'}}"), "1b");
        assert_eq!(render("{{= %missing%}}"), "");
    }

    #[test]
    fn test_missing_variable_is_created() {
        let mut variables = VariableMap::new();
        let result = run("{{= %fresh%}}", &mut variables);
        assert!(result.success);
        assert_eq!(variables.get("fresh"), Some(&Value::Null));
    }

    #[test]
    fn test_assignment_writes_back() {
        let mut variables = VariableMap::new();
        let result = run("{{%a% = 2}}{{%b% = %a% * 5}}{{= %b%}}", &mut variables);
        assert_eq!(result.output_text, "10");
        assert_eq!(variables["a"], Value::from(2));
        assert_eq!(variables["b"], Value::from(10));
    }

    #[test]
    fn test_subscript_read_and_write() {
        let mut variables = vars(&[
            ("arr", Value::from(vec![Value::from(1), Value::from(2)])),
            ("key", Value::from("name")),
        ]);
        let result = run(
            "{{%arr%[1] = 5}}{{%arr%[2] = 9}}{{%obj%{%key%} = 'x'}}{{= %arr%[1]}}{{= %obj%{'name'} }}",
            &mut variables,
        );
        assert!(result.success, "{:?}", result.error);
        assert_eq!(result.output_text, "5x");
        assert_eq!(
            variables["arr"],
            Value::from(vec![Value::from(1), Value::from(5), Value::from(9)])
        );
    }

    #[test]
    fn test_subscript_out_of_range_reads_null() {
        let mut variables = vars(&[("arr", Value::from(vec![Value::from(1)]))]);
        let result = run("{{= %arr%[4]}}", &mut variables);
        assert!(result.success);
        assert_eq!(result.output_text, "");
    }

    #[test]
    fn test_subscript_write_past_end_fails() {
        let mut variables = vars(&[("arr", Value::from(vec![Value::from(1)]))]);
        let result = run("{{%arr%[5] = 1}}", &mut variables);
        assert!(!result.success);
        assert_eq!(
            result.error_code.as_deref(),
            Some(codes::execution::INVALID_ASSIGNMENT.as_str())
        );
    }

    #[test]
    fn test_increment_forms() {
        let mut variables = vars(&[("i", Value::from(1))]);
        let result = run("{{= %i%++}}{{= ++%i%}}{{= --%i%}}", &mut variables);
        assert_eq!(result.output_text, "232");
        assert_eq!(variables["i"], Value::from(2));
    }

    #[test]
    fn test_assignment_to_literal_fails() {
        let result = run("{{= 1++}}", &mut VariableMap::new());
        assert!(!result.success);
        assert_eq!(
            result.error_code.as_deref(),
            Some(codes::execution::INVALID_ASSIGNMENT.as_str())
        );
    }

    #[test]
    fn test_if_chain() {
        let source = "{{if %x% > 5}}big{{elif %x% > 2}}mid{{else}}small{{endif}}";
        for (x, expected) in [(10, "big"), (3, "mid"), (1, "small")] {
            let mut variables = vars(&[("x", Value::from(x))]);
            assert_eq!(run(source, &mut variables).output_text, expected);
        }
    }

    #[test]
    fn test_condition_flags() {
        let result = run("{{1 < 2 && 2 < 1}}", &mut VariableMap::new());
        assert!(result.success);
        assert!(!result.condition);

        let result = run("{{1 < 2 || %boom% / 0}}", &mut VariableMap::new());
        assert!(result.success);
        assert!(result.condition);
    }

    #[test]
    fn test_for_loop() {
        let mut variables = VariableMap::new();
        let result = run(
            "{{for %i%=0; %i%<3; %i%++}}{{=%i%}}{{done}}",
            &mut variables,
        );
        assert_eq!(result.output_text, "012");
        assert_eq!(variables["i"], Value::from(3));
    }

    #[test]
    fn test_while_with_break_and_continue() {
        let source = "{{%i% = 0}}{{while %i% < 10}}{{%i%++}}\
                      {{if %i% == 2}}{{continue}}{{endif}}\
                      {{if %i% == 5}}{{break}}{{endif}}{{=%i%}}{{done}}end";
        let result = run(source, &mut VariableMap::new());
        assert!(result.success, "{:?}", result.error);
        assert_eq!(result.output_text, "134end");
        assert!(!result.is_break);
    }

    #[test]
    fn test_nested_loop_control_stays_in_inner_loop() {
        let source = "{{for %i% = 0; %i% < 3; %i%++}}\
                      {{for %j% = 0; %j% < 3; %j%++}}\
                      {{if %j% == 1}}{{continue}}{{endif}}\
                      {{if %j% == 2}}{{break}}{{endif}}\
                      {{=%i%}}{{=%j%}}{{done}},{{done}}";
        let mut variables = VariableMap::new();
        let result = run(source, &mut variables);

        assert!(result.success, "{:?}", result.error);
        assert_eq!(result.output_text, "00,10,20,");
        assert!(!result.is_break);
        assert!(!result.is_continue);
        assert_eq!(variables.get("i"), Some(&Value::from(3)));
    }

    #[test]
    fn test_do_while_runs_once() {
        let mut variables = vars(&[("i", Value::from(10))]);
        let result = run("{{do}}{{=%i%}}{{%i%++}}{{while %i% < 3}}!", &mut variables);
        assert_eq!(result.output_text, "10!");
    }

    #[test]
    fn test_foreach() {
        let mut variables = vars(&[(
            "arr",
            Value::from(vec![Value::from(1), Value::from(2), Value::from(3)]),
        )]);
        let result = run("{{foreach %v% in %arr%}}{{=%v%}},{{done}}", &mut variables);
        assert_eq!(result.output_text, "1,2,3,");
        assert_eq!(variables["v"], Value::from(3));
    }

    #[test]
    fn test_foreach_over_object_keys_and_null() {
        let object = Value::from(serde_json::json!({"b": 1, "a": 2}));
        let mut variables = vars(&[("obj", object)]);
        let result = run("{{foreach %k% in %obj%}}{{=%k%}}{{done}}", &mut variables);
        assert_eq!(result.output_text, "ab");

        let result = run("{{foreach %k% in %nothing%}}x{{done}}", &mut VariableMap::new());
        assert!(result.success);
        assert_eq!(result.output_text, "");
    }

    #[test]
    fn test_division_by_zero_keeps_partial_output() {
        let result = run("before {{= 1/0}} after", &mut VariableMap::new());
        assert!(!result.success);
        assert_eq!(result.output_text, "before ");
        assert_eq!(
            result.error_code.as_deref(),
            Some(codes::execution::DIVISION_BY_ZERO.as_str())
        );
    }

    #[test]
    fn test_failure_inside_loop_stops_it() {
        let mut variables = vars(&[("arr", Value::from(vec![Value::from(1), Value::from(0)]))]);
        let result = run(
            "{{foreach %v% in %arr%}}{{= 4 / %v%}};{{done}}",
            &mut variables,
        );
        assert!(!result.success);
        assert_eq!(result.output_text, "4;");
    }

    #[test]
    fn test_loop_budget() {
        let result = run_with_budget("{{while true}}x{{done}}", &mut VariableMap::new(), Some(3));
        assert!(!result.success);
        assert_eq!(result.output_text, "xxx");
        assert_eq!(
            result.error_code.as_deref(),
            Some(codes::execution::LOOP_LIMIT_EXCEEDED.as_str())
        );
    }

    #[test]
    fn test_unassembled_node_is_rejected() {
        let mut arena = Arena::new();
        let id = arena.alloc(NodeKind::StaticText("x".into()), crate::utils::Span::dummy());
        let mut variables = VariableMap::new();
        let result = Interpreter::new(&arena, &mut variables).execute(id);
        assert!(!result.success);
        assert_eq!(
            result.error_code.as_deref(),
            Some(codes::execution::UNASSEMBLED_NODE.as_str())
        );
    }
}
