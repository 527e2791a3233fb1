//! Error and success codes for the template engine
//!
//! Every code constant has a matching metadata entry in the registry below.
//! Classification helpers fall back to neutral values for unknown codes.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Template file loading error codes
pub mod template_file {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
}

/// Segmentation and engine tag error codes
pub mod segmenter {
    use super::Code;

    pub const TEMPLATE_TOO_LARGE: Code = Code::new("E020");
    pub const TOO_MANY_SEGMENTS: Code = Code::new("E021");
    pub const UNTERMINATED_STATEMENT: Code = Code::new("E022");
    pub const UNSUPPORTED_ENGINE: Code = Code::new("E023");
}

/// Unit tokenizer error codes
pub mod tokenizer {
    use super::Code;

    pub const UNTERMINATED_QUOTE: Code = Code::new("E030");
    pub const TOO_MANY_UNITS: Code = Code::new("E031");
    pub const INVALID_LITERAL: Code = Code::new("E032");
}

/// Assembler error codes
pub mod assembler {
    use super::Code;

    pub const UNEXPECTED_UNIT: Code = Code::new("E040");
    pub const UNEXPECTED_END: Code = Code::new("E041");
    pub const UNMATCHED_TERMINATOR: Code = Code::new("E042");
    pub const UNTERMINATED_BLOCK: Code = Code::new("E043");
    pub const INVALID_OPERAND: Code = Code::new("E044");
    pub const MISPLACED_CONTROL: Code = Code::new("E045");
    pub const MAX_RECURSION_DEPTH: Code = Code::new("E087");
}

/// Evaluation error codes
pub mod execution {
    use super::Code;

    pub const TYPE_MISMATCH: Code = Code::new("E060");
    pub const DIVISION_BY_ZERO: Code = Code::new("E061");
    pub const INVALID_ASSIGNMENT: Code = Code::new("E062");
    pub const LOOP_LIMIT_EXCEEDED: Code = Code::new("E063");
    pub const MAX_EXECUTION_DEPTH: Code = Code::new("E064");
    pub const NOT_LOADED: Code = Code::new("E065");
    pub const UNASSEMBLED_NODE: Code = Code::new("E066");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const TEMPLATE_FILE_LOADED: Code = Code::new("I006");
    pub const SEGMENTATION_COMPLETE: Code = Code::new("I020");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I030");
    pub const ASSEMBLY_COMPLETE: Code = Code::new("I040");
    pub const TEMPLATE_LOADED: Code = Code::new("I041");
    pub const EXECUTION_COMPLETE: Code = Code::new("I060");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

type Entry = (
    &'static str,
    &'static str,
    Severity,
    bool,
    bool,
    &'static str,
    &'static str,
);

#[rustfmt::skip]
const REGISTRY_ENTRIES: &[Entry] = &[
    // code, category, severity, recoverable, requires_halt, description, action
    ("ERR001", "System", Severity::Critical, false, true,
        "Internal engine error", "Report the template and inputs that triggered it"),
    ("ERR002", "System", Severity::Critical, false, true,
        "Logging or configuration initialization failed", "Check environment configuration"),

    ("E005", "TemplateFile", Severity::High, false, false,
        "Template file not found", "Check the template path"),
    ("E007", "TemplateFile", Severity::High, false, false,
        "Template file exceeds the configured size limit", "Split the template or raise max_file_size"),
    ("E008", "TemplateFile", Severity::Low, true, false,
        "Template file is empty", "Provide template content or allow empty files"),
    ("E009", "TemplateFile", Severity::High, false, false,
        "Permission denied reading template file", "Fix file permissions"),
    ("E010", "TemplateFile", Severity::High, false, false,
        "Template file is not valid UTF-8", "Re-encode the template as UTF-8"),
    ("E011", "TemplateFile", Severity::High, false, false,
        "I/O error reading template file", "Check the filesystem"),
    ("E012", "TemplateFile", Severity::Medium, false, false,
        "Template path is not a regular file", "Pass a file, not a directory"),

    ("E020", "Segmenter", Severity::High, false, true,
        "Template text exceeds the configured size limit", "Reduce template size"),
    ("E021", "Segmenter", Severity::High, false, true,
        "Template contains too many segments", "Reduce the number of statements"),
    ("E022", "Segmenter", Severity::Low, true, false,
        "Statement opener without a closing delimiter", "Close the statement with }}"),
    ("E023", "Segmenter", Severity::High, false, false,
        "Unsupported template engine tag", "Use {{#!k2hr3template}} or remove the tag"),

    ("E030", "Tokenizer", Severity::Medium, true, false,
        "Unterminated quoted string in statement", "Close the quoted string"),
    ("E031", "Tokenizer", Severity::High, false, true,
        "Statement contains too many units", "Split the statement"),
    ("E032", "Tokenizer", Severity::Medium, true, false,
        "Unit is not a valid literal", "Check number and string syntax"),

    ("E040", "Assembler", Severity::Medium, true, false,
        "Unit cannot start or continue a statement here", "Check operator and keyword placement"),
    ("E041", "Assembler", Severity::Medium, true, false,
        "Statement ended before it was complete", "Add the missing operand or clause"),
    ("E042", "Assembler", Severity::Medium, true, false,
        "Terminator without a matching opener", "Remove the terminator or add its opener"),
    ("E043", "Assembler", Severity::Medium, true, false,
        "Block was never terminated", "Add the closing endif or done"),
    ("E044", "Assembler", Severity::Medium, true, false,
        "Operand has the wrong shape", "Use a variable where one is required"),
    ("E045", "Assembler", Severity::Medium, true, false,
        "break or continue outside a loop", "Move the statement into a loop body"),
    ("E087", "Assembler", Severity::High, false, true,
        "Maximum nesting depth exceeded", "Reduce nesting depth"),

    ("E060", "Execution", Severity::Medium, true, false,
        "Operator applied to incompatible values", "Check variable types"),
    ("E061", "Execution", Severity::Medium, true, false,
        "Division or remainder by zero", "Guard the divisor"),
    ("E062", "Execution", Severity::Medium, true, false,
        "Left side of assignment is not a variable", "Assign to a %variable%"),
    ("E063", "Execution", Severity::High, false, true,
        "Loop iteration budget exhausted", "Check the loop condition or raise the budget"),
    ("E064", "Execution", Severity::High, false, true,
        "Maximum execution depth exceeded", "Reduce nesting depth"),
    ("E065", "Execution", Severity::Medium, true, false,
        "Execute called before a template was loaded", "Load a template first"),
    ("E066", "Execution", Severity::Critical, false, true,
        "Node was not fully assembled", "Report the template that triggered it"),

    ("I004", "System", Severity::Low, true, false,
        "Logging initialized", "None"),
    ("I006", "TemplateFile", Severity::Low, true, false,
        "Template file read", "Continue to load"),
    ("I020", "Segmenter", Severity::Low, true, false,
        "Template segmented", "Continue to tokenization"),
    ("I030", "Tokenizer", Severity::Low, true, false,
        "Statements tokenized", "Continue to assembly"),
    ("I040", "Assembler", Severity::Low, true, false,
        "Node tree assembled", "Template ready"),
    ("I041", "Engine", Severity::Low, true, false,
        "Template loaded", "Ready to execute"),
    ("I060", "Execution", Severity::Low, true, false,
        "Template executed", "None"),
];

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        REGISTRY_ENTRIES
            .iter()
            .map(
                |&(code, category, severity, recoverable, requires_halt, description, action)| {
                    (
                        code,
                        ErrorMetadata {
                            code,
                            category,
                            severity,
                            recoverable,
                            requires_halt,
                            description,
                            recommended_action: action,
                        },
                    )
                },
            )
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_constant_has_metadata() {
        let all = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            template_file::FILE_NOT_FOUND,
            template_file::FILE_TOO_LARGE,
            template_file::EMPTY_FILE,
            template_file::PERMISSION_DENIED,
            template_file::INVALID_ENCODING,
            template_file::IO_ERROR,
            template_file::INVALID_PATH,
            segmenter::TEMPLATE_TOO_LARGE,
            segmenter::TOO_MANY_SEGMENTS,
            segmenter::UNTERMINATED_STATEMENT,
            segmenter::UNSUPPORTED_ENGINE,
            tokenizer::UNTERMINATED_QUOTE,
            tokenizer::TOO_MANY_UNITS,
            tokenizer::INVALID_LITERAL,
            assembler::UNEXPECTED_UNIT,
            assembler::UNEXPECTED_END,
            assembler::UNMATCHED_TERMINATOR,
            assembler::UNTERMINATED_BLOCK,
            assembler::INVALID_OPERAND,
            assembler::MISPLACED_CONTROL,
            assembler::MAX_RECURSION_DEPTH,
            execution::TYPE_MISMATCH,
            execution::DIVISION_BY_ZERO,
            execution::INVALID_ASSIGNMENT,
            execution::LOOP_LIMIT_EXCEEDED,
            execution::MAX_EXECUTION_DEPTH,
            execution::NOT_LOADED,
            execution::UNASSEMBLED_NODE,
            success::SYSTEM_INITIALIZATION_COMPLETED,
            success::TEMPLATE_FILE_LOADED,
            success::SEGMENTATION_COMPLETE,
            success::TOKENIZATION_COMPLETE,
            success::ASSEMBLY_COMPLETE,
            success::TEMPLATE_LOADED,
            success::EXECUTION_COMPLETE,
        ];

        for code in all {
            assert!(
                get_error_metadata(code.as_str()).is_some(),
                "missing metadata for {}",
                code
            );
        }
    }

    #[test]
    fn test_classification() {
        assert_eq!(get_severity("ERR001"), Severity::Critical);
        assert!(requires_halt("E087"));
        assert!(is_recoverable("E022"));
        assert_eq!(get_category("E060"), "Execution");
    }

    #[test]
    fn test_unknown_code_fallbacks() {
        assert_eq!(get_description("Z999"), "Unknown error");
        assert_eq!(get_category("Z999"), "Unknown");
        assert!(!requires_halt("Z999"));
    }
}
