use crate::assembler::AssembleError;
use crate::logging::{codes, Code};
use crate::segmenter::SegmentError;
use crate::utils::Span;

/// Template loading errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error("Segmentation failed: {0}")]
    Segment(#[from] SegmentError),

    #[error("Assembly failed: {0}")]
    Assemble(#[from] AssembleError),

    #[error("Template engine '{name}' is not supported")]
    UnsupportedEngine { name: String, span: Span },
}

impl LoadError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::Segment(error) => error.error_code(),
            Self::Assemble(error) => error.error_code(),
            Self::UnsupportedEngine { .. } => codes::segmenter::UNSUPPORTED_ENGINE,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Segment(error) => error.span(),
            Self::Assemble(error) => error.span(),
            Self::UnsupportedEngine { span, .. } => Some(*span),
        }
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }
}
