//! Character scanner splitting template text on `{{`/`}}`

use super::StatementSegment;
use crate::logging::codes;
use crate::utils::{Position, Span};
use crate::{log_debug, log_warning};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const ESCAPED_OPEN: &str = "{{{";
const ESCAPED_CLOSE: &str = "}}}";

pub(super) struct Scanner<'a> {
    text: &'a str,
    offset: usize,
    position: Position,
    literal: String,
    literal_start: Position,
    segments: Vec<StatementSegment>,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            offset: 0,
            position: Position::start(),
            literal: String::new(),
            literal_start: Position::start(),
            segments: Vec::new(),
        }
    }

    pub fn scan(mut self) -> Vec<StatementSegment> {
        while self.offset < self.text.len() {
            let rest = &self.text[self.offset..];

            if rest.starts_with(ESCAPED_OPEN) {
                self.literal.push_str(OPEN);
                self.skip(ESCAPED_OPEN.len());
            } else if rest.starts_with(ESCAPED_CLOSE) {
                self.literal.push_str(CLOSE);
                self.skip(ESCAPED_CLOSE.len());
            } else if rest.starts_with(OPEN) {
                match find_statement_close(rest) {
                    Some(close) => self.push_statement(close),
                    None => {
                        log_warning!(code = codes::segmenter::UNTERMINATED_STATEMENT,
                            "Statement opener has no closing delimiter, kept as text",
                            "at" => self.position);
                        self.literal.push_str(rest);
                        self.skip(rest.len());
                    }
                }
            } else if let Some(ch) = rest.chars().next() {
                self.literal.push(ch);
                self.skip(ch.len_utf8());
            }
        }

        self.flush_literal();

        log_debug!("Template segmented",
            "segments" => self.segments.len(),
            "statements" => self.segments.iter().filter(|s| s.is_statement).count());

        self.segments
    }

    /// Consume `len` bytes of source, tracking line and column
    fn skip(&mut self, len: usize) {
        let consumed = &self.text[self.offset..self.offset + len];
        self.position = self.position.advance_str(consumed);
        self.offset += len;
    }

    fn flush_literal(&mut self) {
        if !self.literal.is_empty() {
            let original = &self.text[self.literal_start.offset..self.offset];
            self.segments.push(StatementSegment::literal(
                original.to_string(),
                std::mem::take(&mut self.literal),
                Span::new(self.literal_start, self.position),
            ));
        }
        self.literal_start = self.position;
    }

    /// `close` is the byte index of the closing `}}` relative to the current offset
    fn push_statement(&mut self, close: usize) {
        self.flush_literal();

        let start = self.position;
        let original = &self.text[self.offset..self.offset + close + CLOSE.len()];
        let inner = &original[OPEN.len()..close];

        let leading = inner.len() - inner.trim_start().len();
        let content_start = start.advance_str(&original[..OPEN.len() + leading]);

        self.skip(original.len());

        self.segments.push(StatementSegment::statement(
            original.to_string(),
            inner.trim().to_string(),
            Span::new(start, self.position),
            content_start,
        ));

        self.literal_start = self.position;
    }
}

/// Locate the closing `}}` of a statement starting at `rest[0..2] == "{{"`.
/// Quoted spans are skipped unless the statement is a comment. A run of
/// three or more braces closes at its final pair.
fn find_statement_close(rest: &str) -> Option<usize> {
    let body = &rest[OPEN.len()..];
    let is_comment = body.trim_start().starts_with('#');

    if !is_comment {
        if let Some(close) = scan_for_close(body, true) {
            return Some(close + OPEN.len());
        }
    }

    scan_for_close(body, false).map(|close| close + OPEN.len())
}

fn scan_for_close(body: &str, honor_quotes: bool) -> Option<usize> {
    let bytes = body.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        if honor_quotes && (b == b'\'' || b == b'"') {
            quote = Some(b);
            i += 1;
            continue;
        }

        if b == b'}' && bytes.get(i + 1) == Some(&b'}') {
            let mut run_end = i;
            while bytes.get(run_end) == Some(&b'}') {
                run_end += 1;
            }
            return Some(run_end - CLOSE.len());
        }

        i += 1;
    }

    None
}
