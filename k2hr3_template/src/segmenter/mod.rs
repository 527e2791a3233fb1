//! Segmenter: splits template text into literal and `{{ ... }}` statement segments
//!
//! `{{{` and `}}}` outside a statement are escapes for literal `{{` and `}}`.
//! Statement text is trimmed, literal text is kept verbatim. An opener with
//! no closing delimiter is kept as literal text rather than rejected.

mod scanner;

use crate::config::compile_time::segmenter::{MAX_SEGMENT_COUNT, MAX_TEMPLATE_SIZE};
use crate::log_error;
use crate::logging::{codes, Code};
use crate::utils::{Position, Span};
use serde::Serialize;

pub type SegmentResult<T> = Result<T, SegmentError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SegmentError {
    #[error("Template too large: {size} bytes (max: {max})")]
    TemplateTooLarge { size: usize, max: usize },

    #[error("Template has too many segments: {count} (max: {max})")]
    TooManySegments { count: usize, max: usize },

    #[error("Unterminated quoted string at {span}")]
    UnterminatedQuote { span: Span },

    #[error("Statement at {span} has too many units: {count} (max: {max})")]
    TooManyUnits { count: usize, max: usize, span: Span },
}

impl SegmentError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::TemplateTooLarge { .. } => codes::segmenter::TEMPLATE_TOO_LARGE,
            Self::TooManySegments { .. } => codes::segmenter::TOO_MANY_SEGMENTS,
            Self::UnterminatedQuote { .. } => codes::tokenizer::UNTERMINATED_QUOTE,
            Self::TooManyUnits { .. } => codes::tokenizer::TOO_MANY_UNITS,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnterminatedQuote { span } | Self::TooManyUnits { span, .. } => Some(*span),
            Self::TemplateTooLarge { .. } | Self::TooManySegments { .. } => None,
        }
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }
}

/// One literal or statement span of a template
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementSegment {
    pub is_statement: bool,
    /// Source text exactly as written, delimiters included
    pub original_text: String,
    /// Unescaped literal text, or trimmed statement body
    pub converted_text: String,
    /// Sub-statements split on `;`, each a list of units. Literal segments
    /// hold a single sub-statement with the converted text.
    pub formula_units: Vec<Vec<String>>,
    pub span: Span,
    /// Position of the first character of `converted_text` in the source
    #[serde(skip)]
    pub content_start: Position,
}

impl StatementSegment {
    pub fn literal(original_text: String, converted_text: String, span: Span) -> Self {
        Self {
            is_statement: false,
            formula_units: vec![vec![converted_text.clone()]],
            original_text,
            converted_text,
            span,
            content_start: span.start,
        }
    }

    pub fn statement(
        original_text: String,
        converted_text: String,
        span: Span,
        content_start: Position,
    ) -> Self {
        Self {
            is_statement: true,
            original_text,
            converted_text,
            formula_units: Vec::new(),
            span,
            content_start,
        }
    }
}

/// Split template text into segments
pub fn segment(text: &str) -> SegmentResult<Vec<StatementSegment>> {
    if text.len() > MAX_TEMPLATE_SIZE {
        let error = SegmentError::TemplateTooLarge {
            size: text.len(),
            max: MAX_TEMPLATE_SIZE,
        };
        log_error!(error.error_code(), "Template rejected before segmentation",
            "size" => text.len(),
            "max" => MAX_TEMPLATE_SIZE);
        return Err(error);
    }

    let segments = scanner::Scanner::new(text).scan();

    if segments.len() > MAX_SEGMENT_COUNT {
        let error = SegmentError::TooManySegments {
            count: segments.len(),
            max: MAX_SEGMENT_COUNT,
        };
        log_error!(error.error_code(), "Template has too many segments",
            "count" => segments.len());
        return Err(error);
    }

    Ok(segments)
}
