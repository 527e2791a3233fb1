//! Engine facade: load a template once, execute it many times
//!
//! Loading runs segmentation, tokenization and assembly. Execution never
//! fails with `Err`; the returned result carries the success flag.

mod error;

pub use error::LoadError;

use crate::assembler::{self, AssembledTemplate};
use crate::ast::{Arena, NodeId, NodeKind, VariableNode};
use crate::config::runtime::{EnginePreferences, ExecutionPreferences};
use crate::evaluator::{self, ExecutionError, ExecutionResult, VariableMap};
use crate::logging::codes;
use crate::segmenter::{self, StatementSegment};
use crate::tokens::TokenStream;
use crate::utils::Span;
use crate::{log_debug, log_error, log_info, log_success, log_warning};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Name accepted in a leading `{{#!name}}` tag
pub const ENGINE_NAME: &str = "k2hr3template";

const ENGINE_TAG_PREFIX: &str = "#!";

#[derive(Debug, Clone, Default, Serialize)]
pub struct EngineStatistics {
    pub segments: usize,
    pub statements: usize,
    pub nodes: usize,
    pub variables: usize,
    /// Node count per node type
    pub node_types: BTreeMap<&'static str, usize>,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateEngine {
    template: Option<AssembledTemplate>,
    segment_count: usize,
    engine_preferences: EnginePreferences,
    execution_preferences: ExecutionPreferences,
}

impl TemplateEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preferences(engine: EnginePreferences, execution: ExecutionPreferences) -> Self {
        Self {
            engine_preferences: engine,
            execution_preferences: execution,
            ..Self::default()
        }
    }

    /// Load and assemble `text`, replacing any previously loaded template.
    /// On failure the engine is left unloaded.
    pub fn load(&mut self, text: &str) -> Result<(), LoadError> {
        self.template = None;
        self.segment_count = 0;

        match self.build(text) {
            Ok((template, segment_count)) => {
                log_success!(codes::success::TEMPLATE_LOADED, "Template loaded",
                    "segments" => segment_count,
                    "statements" => template.roots.len(),
                    "nodes" => template.arena.len());

                self.template = Some(template);
                self.segment_count = segment_count;

                if self.engine_preferences.log_statistics {
                    let stats = self.statistics();
                    log_info!("Template statistics",
                        "segments" => stats.segments,
                        "statements" => stats.statements,
                        "nodes" => stats.nodes,
                        "variables" => stats.variables);
                }
                Ok(())
            }
            Err(error) => {
                log_error!(error.error_code(), "Template load failed",
                    span = error.span().unwrap_or_else(Span::dummy),
                    "reason" => &error);
                Err(error)
            }
        }
    }

    fn build(&self, text: &str) -> Result<(AssembledTemplate, usize), LoadError> {
        let mut segments = segmenter::segment(text)?;
        self.take_engine_tag(&mut segments)?;
        let segment_count = segments.len();

        let tokens = TokenStream::from_segments(&mut segments)?;
        let template = assembler::assemble(tokens)?;
        Ok((template, segment_count))
    }

    /// Remove a leading `{{#!name}}` tag, rejecting names of other engines
    fn take_engine_tag(&self, segments: &mut Vec<StatementSegment>) -> Result<(), LoadError> {
        let Some(first) = segments.first() else {
            return Ok(());
        };
        if !first.is_statement {
            return Ok(());
        }
        let Some(name) = first.converted_text.strip_prefix(ENGINE_TAG_PREFIX) else {
            return Ok(());
        };

        let name = name.trim();
        if !name.eq_ignore_ascii_case(ENGINE_NAME) {
            return Err(LoadError::UnsupportedEngine {
                name: name.to_string(),
                span: first.span,
            });
        }

        log_debug!("Engine tag accepted", "name" => name);
        segments.remove(0);

        if self.engine_preferences.strip_newline_after_engine_tag {
            strip_leading_newline(segments);
        }
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.template.is_some()
    }

    pub fn template(&self) -> Option<&AssembledTemplate> {
        self.template.as_ref()
    }

    /// Every distinct variable name referenced by the template, in order
    /// of first appearance
    pub fn variable_names(&self) -> Vec<String> {
        let Some(template) = &self.template else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for &root in &template.roots {
            for id in template.arena.descendants(root) {
                if let NodeKind::Variable(VariableNode::Named { name, .. }) = &template.arena[id].kind {
                    if seen.insert(name.as_str()) {
                        names.push(name.clone());
                    }
                }
            }
        }
        names
    }

    /// Run the loaded template against `variables`
    pub fn execute(&self, variables: &mut VariableMap) -> ExecutionResult {
        let Some(template) = &self.template else {
            let error = ExecutionError::NotLoaded;
            log_error!(error.error_code(), "Execute called before a template was loaded");
            return ExecutionResult::failure(error.error_code(), error.to_string());
        };

        let result = evaluator::execute(
            template,
            variables,
            self.execution_preferences.loop_budget(),
        );

        if result.success {
            log_success!(codes::success::EXECUTION_COMPLETE, "Template executed",
                "output_bytes" => result.output_text.len());
        } else {
            log_warning!("Template execution failed",
                "code" => result.error_code.as_deref().unwrap_or_default(),
                "reason" => result.error.as_deref().unwrap_or_default(),
                "output_bytes" => result.output_text.len());
        }
        result
    }

    pub fn statistics(&self) -> EngineStatistics {
        let Some(template) = &self.template else {
            return EngineStatistics::default();
        };

        let mut node_types = BTreeMap::new();
        for (_, node) in template.arena.iter() {
            *node_types.entry(node.node_type().as_str()).or_insert(0) += 1;
        }

        EngineStatistics {
            segments: self.segment_count,
            statements: template.roots.len(),
            nodes: template.arena.len(),
            variables: self.variable_names().len(),
            node_types,
        }
    }

    /// Indented outline of the assembled tree
    pub fn dump_tree(&self) -> String {
        let mut out = String::new();
        if let Some(template) = &self.template {
            for &root in &template.roots {
                outline(&template.arena, root, "", 0, &mut out);
            }
        }
        out
    }
}

/// Load `text` and execute it once
pub fn render(text: &str, variables: &mut VariableMap) -> Result<ExecutionResult, LoadError> {
    let mut engine = TemplateEngine::new();
    engine.load(text)?;
    Ok(engine.execute(variables))
}

fn strip_leading_newline(segments: &mut Vec<StatementSegment>) {
    let Some(first) = segments.first_mut() else {
        return;
    };
    if first.is_statement {
        return;
    }

    let text = first.converted_text.as_str();
    let newline = if text.starts_with("\r\n") {
        "\r\n"
    } else if text.starts_with('\n') {
        "\n"
    } else {
        return;
    };

    let rest = text[newline.len()..].to_string();
    if rest.is_empty() {
        segments.remove(0);
        return;
    }

    let span = Span::new(first.span.start.advance_str(newline), first.span.end);
    *first = StatementSegment::literal(first.original_text.clone(), rest, span);
}

/// Write `start` and the statements chained after it
fn outline(arena: &Arena, start: NodeId, label: &str, depth: usize, out: &mut String) {
    let mut current = Some(start);
    let mut label = label;

    while let Some(id) = current {
        let Some(node) = arena.get(id) else {
            return;
        };
        out.push_str(&format!(
            "{}{}{} [{}]\n",
            "  ".repeat(depth),
            label,
            node.label(),
            node.span
        ));
        for (slot, child) in labelled_children(&node.kind) {
            outline(arena, child, slot, depth + 1, out);
        }
        label = "";
        current = node.next;
    }
}

fn labelled_children(kind: &NodeKind) -> Vec<(&'static str, NodeId)> {
    let slots: Vec<(&'static str, Option<NodeId>)> = match kind {
        NodeKind::StaticText(_) | NodeKind::Comment(_) => Vec::new(),
        NodeKind::Print { child } => vec![("child: ", *child)],
        NodeKind::Variable(VariableNode::Named { index, .. }) => {
            vec![("index: ", index.map(|subscript| subscript.expr))]
        }
        NodeKind::Variable(VariableNode::Literal(_)) => Vec::new(),
        NodeKind::Calculate { left, right, .. } | NodeKind::Condition { left, right, .. } => {
            vec![("left: ", *left), ("right: ", *right)]
        }
        NodeKind::Syntax(syntax) => vec![
            ("init: ", syntax.init),
            ("left: ", syntax.left),
            ("aux: ", syntax.aux),
            ("child: ", syntax.child),
            ("right: ", syntax.right),
        ],
    };
    slots
        .into_iter()
        .filter_map(|(slot, id)| id.map(|id| (slot, id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::Value;
    use crate::logging::{self, LogLevel, LoggingService, MemoryLogger};
    use assert_matches::assert_matches;
    use std::sync::Arc;

    fn loaded(text: &str) -> TemplateEngine {
        let mut engine = TemplateEngine::with_preferences(
            EnginePreferences {
                strip_newline_after_engine_tag: true,
                log_statistics: false,
            },
            ExecutionPreferences::unbounded(),
        );
        engine.load(text).unwrap();
        engine
    }

    fn output(text: &str, variables: &mut VariableMap) -> String {
        let result = loaded(text).execute(variables);
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
    fn test_static_identity() {
        for text in ["", "plain text", "line one\nline two\n", "braces { } and } {"] {
            assert_eq!(output(text, &mut VariableMap::new()), text);
        }
    }

    #[test]
    fn test_print_expressions() {
        assert_eq!(output("{{= 1 + 2}}", &mut VariableMap::new()), "3");
        assert_eq!(output("{{= 'a' + 'b'}}", &mut VariableMap::new()), "ab");
        assert_eq!(output("{{= 1 + 'b'}}", &mut VariableMap::new()), "1b");
        assert_eq!(output("{{= 2 + 3 * 4}}", &mut VariableMap::new()), "14");
        assert_eq!(
            output("{{= 0xFFFFFFFFFFFFFFFF}}", &mut VariableMap::new()),
            "18446744073709552000"
        );
    }

    #[test]
    fn test_condition_precedence() {
        let result = loaded("{{1 < 2 && 2 < 1}}").execute(&mut VariableMap::new());
        assert!(result.success);
        assert!(!result.condition);
    }

    #[test]
    fn test_if_else() {
        let engine = loaded("{{if %x% > 5}}big{{else}}small{{endif}}");
        let mut big = vars(&[("x", Value::from(10))]);
        let mut small = vars(&[("x", Value::from(3))]);
        assert_eq!(engine.execute(&mut big).output_text, "big");
        assert_eq!(engine.execute(&mut small).output_text, "small");
    }

    #[test]
    fn test_for_loop_leaves_counter() {
        let mut variables = VariableMap::new();
        let text = "{{for %i%=0; %i%<3; %i%++}}{{=%i%}}{{done}}";
        assert_eq!(output(text, &mut variables), "012");
        assert_eq!(variables["i"], Value::from(3));
    }

    #[test]
    fn test_foreach() {
        let mut variables = vars(&[(
            "arr",
            Value::from(vec![Value::from(1), Value::from(2), Value::from(3)]),
        )]);
        let text = "{{foreach %v% in %arr%}}{{=%v%}},{{done}}";
        assert_eq!(output(text, &mut variables), "1,2,3,");
    }

    #[test]
    fn test_division_by_zero_fails_cleanly() {
        let result = loaded("{{= 1/0}}").execute(&mut VariableMap::new());
        assert!(!result.success);
        assert!(!result.output_text.contains("inf"));
        assert_eq!(
            result.error_code.as_deref(),
            Some(codes::execution::DIVISION_BY_ZERO.as_str())
        );
    }

    #[test]
    fn test_execute_is_repeatable() {
        let engine = loaded("{{if %a% == 'x'}}{{= %a% + %b%}}{{endif}}!");
        let fresh = vars(&[("a", Value::from("x")), ("b", Value::from(1))]);

        let first = engine.execute(&mut fresh.clone());
        let second = engine.execute(&mut fresh.clone());
        assert_eq!(first.output_text, "x1!");
        assert_eq!(first.output_text, second.output_text);
    }

    #[test]
    fn test_variable_names() {
        let engine = loaded("{{= %a%}} {{= %b%[%c%]}} {{%a% = %c%}}");
        assert_eq!(engine.variable_names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_escaped_braces() {
        assert_eq!(output("{{{literal}}}", &mut VariableMap::new()), "{{literal}}");
    }

    #[test]
    fn test_engine_tag() {
        let engine = loaded("{{#!k2hr3template}}\n#cloud-config\n{{= %name%}}");
        let mut variables = vars(&[("name", Value::from("host"))]);
        assert_eq!(engine.execute(&mut variables).output_text, "#cloud-config\nhost");

        let engine = loaded("{{#! K2HR3Template }}\r\nbody");
        assert_eq!(engine.execute(&mut VariableMap::new()).output_text, "body");

        let engine = loaded("{{#!k2hr3template}}");
        assert_eq!(engine.statistics().statements, 0);
    }

    #[test]
    fn test_engine_tag_newline_kept_when_disabled() {
        let mut engine = TemplateEngine::with_preferences(
            EnginePreferences {
                strip_newline_after_engine_tag: false,
                log_statistics: false,
            },
            ExecutionPreferences::unbounded(),
        );
        engine.load("{{#!k2hr3template}}\nbody").unwrap();
        assert_eq!(engine.execute(&mut VariableMap::new()).output_text, "\nbody");
    }

    #[test]
    fn test_unsupported_engine() {
        let mut engine = TemplateEngine::new();
        let error = engine.load("{{#!jinja}}body").unwrap_err();
        assert_matches!(&error, LoadError::UnsupportedEngine { name, .. } if name == "jinja");
        assert_eq!(error.error_code(), codes::segmenter::UNSUPPORTED_ENGINE);
        assert!(!engine.is_loaded());
    }

    #[test]
    fn test_engine_tag_only_recognised_first() {
        assert_eq!(output("a{{#!other}}b", &mut VariableMap::new()), "ab");
    }

    #[test]
    fn test_load_errors() {
        let mut engine = TemplateEngine::new();
        assert_matches!(engine.load("{{if %a%}}open"), Err(LoadError::Assemble(_)));
        assert_matches!(engine.load("{{= 'open}}"), Err(LoadError::Segment(_)));
        assert!(!engine.is_loaded());
    }

    #[test]
    fn test_failed_load_unloads_previous_template() {
        let mut engine = loaded("ok");
        assert!(engine.load("{{endif}}").is_err());
        let result = engine.execute(&mut VariableMap::new());
        assert!(!result.success);
        assert_eq!(
            result.error_code.as_deref(),
            Some(codes::execution::NOT_LOADED.as_str())
        );
    }

    #[test]
    fn test_statistics_and_tree() {
        let engine = loaded("{{if %a%}}x{{endif}}{{= 1 + %b%}}");
        let stats = engine.statistics();
        assert_eq!(stats.statements, 2);
        assert_eq!(stats.variables, 2);
        assert_eq!(stats.node_types.get("syntax"), Some(&2));
        assert_eq!(stats.nodes, engine.template().map_or(0, |t| t.arena.len()));

        let tree = engine.dump_tree();
        let lines: Vec<&str> = tree.lines().collect();
        assert!(lines[0].starts_with("syntax if"));
        assert!(lines[1].starts_with("  left: variable %a%"));
        assert!(lines[2].starts_with("  child: static \"x\""));
        assert!(lines[3].starts_with("  right: syntax endif"));
        assert!(lines[4].starts_with("print"));
    }

    #[test]
    fn test_load_and_execute_are_logged() {
        let logger = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(logger.clone(), LogLevel::Debug);
        logging::init_global_logging_with_service(Arc::new(service)).unwrap();

        let engine = loaded("{{= %a%}}");
        assert!(engine.execute(&mut VariableMap::new()).success);
        assert!(TemplateEngine::new().load("{{endif}}").is_err());

        assert!(logger.has_success_with_code(codes::success::TEMPLATE_LOADED));
        assert!(logger.has_success_with_code(codes::success::EXECUTION_COMPLETE));
        assert!(logger.has_error_with_code(codes::assembler::UNMATCHED_TERMINATOR));
        assert!(logger.get_events().iter().any(|event| event.is_debug()));
    }

    #[test]
    fn test_render() {
        let mut variables = vars(&[("who", Value::from("world"))]);
        let result = render("hello {{= %who%}}", &mut variables).unwrap();
        assert_eq!(result.output_text, "hello world");
        assert!(render("{{done}}", &mut variables).is_err());
    }
}
