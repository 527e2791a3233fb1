//! Unit tokenizer: splits a statement body into `;`-separated lists of units

use super::token::{is_variable_name_char, SINGLE_CHAR_UNITS, TWO_CHAR_OPERATORS};
use crate::config::compile_time::segmenter::MAX_STATEMENT_UNITS;
use crate::segmenter::{SegmentError, SegmentResult, StatementSegment};
use crate::utils::{Position, Span, Spanned};

/// One sub-statement worth of units
pub type UnitLine = Vec<Spanned<String>>;

/// Split a segment into sub-statements of units.
///
/// Literal segments yield their text as a single unit. A statement starting
/// with `#` is a comment and yields one opaque unit. A statement starting
/// with a single `=` is a print; each of its sub-statements is prefixed
/// with an `=` unit. Empty units and sub-statements are dropped.
pub fn tokenize(segment: &StatementSegment) -> SegmentResult<Vec<UnitLine>> {
    if !segment.is_statement {
        return Ok(vec![vec![Spanned::new(
            segment.converted_text.clone(),
            segment.span,
        )]]);
    }

    let text = segment.converted_text.as_str();
    let start = segment.content_start;

    let lines = if text.is_empty() {
        Vec::new()
    } else if text.starts_with('#') {
        let span = Span::new(start, start.advance_str(text));
        vec![vec![Spanned::new(text.to_string(), span)]]
    } else if text.starts_with('=') && !text.starts_with("==") {
        let after_marker = start.advance('=');
        let marker = Span::new(start, after_marker);

        let mut lines = UnitScanner::new(&text[1..], after_marker).scan()?;
        if lines.is_empty() {
            lines.push(Vec::new());
        }
        for line in &mut lines {
            line.insert(0, Spanned::new("=".to_string(), marker));
        }
        lines
    } else {
        UnitScanner::new(text, start).scan()?
    };

    let count: usize = lines.iter().map(Vec::len).sum();
    if count > MAX_STATEMENT_UNITS {
        return Err(SegmentError::TooManyUnits {
            count,
            max: MAX_STATEMENT_UNITS,
            span: segment.span,
        });
    }

    Ok(lines)
}

struct UnitScanner<'a> {
    text: &'a str,
    offset: usize,
    position: Position,
    bare_start: Option<(usize, Position)>,
    line: UnitLine,
    lines: Vec<UnitLine>,
}

impl<'a> UnitScanner<'a> {
    fn new(text: &'a str, position: Position) -> Self {
        Self {
            text,
            offset: 0,
            position,
            bare_start: None,
            line: Vec::new(),
            lines: Vec::new(),
        }
    }

    fn scan(mut self) -> SegmentResult<Vec<UnitLine>> {
        while let Some(ch) = self.text[self.offset..].chars().next() {
            let rest = &self.text[self.offset..];

            if ch.is_whitespace() {
                self.flush_bare();
                self.skip(ch.len_utf8());
            } else if ch == ';' {
                self.flush_bare();
                self.skip(1);
                self.end_line();
            } else if ch == '\'' || ch == '"' {
                self.flush_bare();
                match quoted_len(rest, ch) {
                    Some(len) => self.push_unit(len),
                    None => {
                        return Err(SegmentError::UnterminatedQuote {
                            span: Span::new(self.position, self.position.advance_str(rest)),
                        })
                    }
                }
            } else if ch == '%' {
                self.flush_bare();
                // A lone `%` is the remainder operator
                self.push_unit(variable_len(rest).unwrap_or(1));
            } else if TWO_CHAR_OPERATORS.iter().any(|op| rest.starts_with(op)) {
                self.flush_bare();
                self.push_unit(2);
            } else if SINGLE_CHAR_UNITS.contains(&ch) {
                self.flush_bare();
                self.push_unit(1);
            } else {
                if self.bare_start.is_none() {
                    self.bare_start = Some((self.offset, self.position));
                }
                self.skip(ch.len_utf8());
            }
        }

        self.flush_bare();
        self.end_line();
        Ok(self.lines)
    }

    fn skip(&mut self, len: usize) {
        self.position = self
            .position
            .advance_str(&self.text[self.offset..self.offset + len]);
        self.offset += len;
    }

    fn push_unit(&mut self, len: usize) {
        let start = self.position;
        let unit = &self.text[self.offset..self.offset + len];
        self.skip(len);
        self.line
            .push(Spanned::new(unit.to_string(), Span::new(start, self.position)));
    }

    fn flush_bare(&mut self) {
        if let Some((offset, start)) = self.bare_start.take() {
            let unit = &self.text[offset..self.offset];
            self.line
                .push(Spanned::new(unit.to_string(), Span::new(start, self.position)));
        }
    }

    fn end_line(&mut self) {
        if !self.line.is_empty() {
            self.lines.push(std::mem::take(&mut self.line));
        }
    }
}

/// Byte length of the quoted span at the start of `rest`, quotes included
fn quoted_len(rest: &str, quote: char) -> Option<usize> {
    let mut chars = rest.char_indices().skip(1);
    while let Some((index, ch)) = chars.next() {
        if ch == '\\' {
            chars.next();
        } else if ch == quote {
            return Some(index + ch.len_utf8());
        }
    }
    None
}

/// Byte length of a `%name%` span at the start of `rest`
fn variable_len(rest: &str) -> Option<usize> {
    let name_len: usize = rest[1..]
        .chars()
        .take_while(|ch| is_variable_name_char(*ch))
        .map(char::len_utf8)
        .sum();

    if name_len > 0 && rest[1 + name_len..].starts_with('%') {
        Some(name_len + 2)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmenter::segment;
    use assert_matches::assert_matches;

    fn units_of(source: &str) -> Vec<Vec<String>> {
        let segments = segment(source).unwrap();
        let statement = segments.iter().find(|s| s.is_statement).unwrap();
        tokenize(statement)
            .unwrap()
            .into_iter()
            .map(|line| line.into_iter().map(|u| u.value).collect())
            .collect()
    }

    fn strings(lines: &[&[&str]]) -> Vec<Vec<String>> {
        lines
            .iter()
            .map(|line| line.iter().map(|u| u.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_print_with_operators() {
        assert_eq!(units_of("{{= 1 + 2}}"), strings(&[&["=", "1", "+", "2"]]));
        assert_eq!(
            units_of("{{=%a%<=%b%&&!%c%}}"),
            strings(&[&["=", "%a%", "<=", "%b%", "&&", "!", "%c%"]])
        );
    }

    #[test]
    fn test_print_sub_statements_each_get_marker() {
        assert_eq!(
            units_of("{{= %a%; %b%}}"),
            strings(&[&["=", "%a%"], &["=", "%b%"]])
        );
    }

    #[test]
    fn test_equality_is_not_print() {
        assert_eq!(units_of("{{== 1}}"), strings(&[&["==", "1"]]));
    }

    #[test]
    fn test_for_header_splits_on_semicolons() {
        assert_eq!(
            units_of("{{for %i%=0; %i%<3; %i%++}}"),
            strings(&[
                &["for", "%i%", "=", "0"],
                &["%i%", "<", "3"],
                &["%i%", "++"],
            ])
        );
    }

    #[test]
    fn test_quotes_protect_semicolons() {
        assert_eq!(
            units_of("{{= 'a;b' + \"c\\\"d\"}}"),
            strings(&[&["=", "'a;b'", "+", "\"c\\\"d\""]])
        );
    }

    #[test]
    fn test_subscripts() {
        assert_eq!(
            units_of("{{= %b%[%c%] + %o%{'k'}}}"),
            strings(&[&["=", "%b%", "[", "%c%", "]", "+", "%o%", "{", "'k'", "}"]])
        );
    }

    #[test]
    fn test_lone_percent_is_remainder() {
        assert_eq!(
            units_of("{{= 7 % 3}}"),
            strings(&[&["=", "7", "%", "3"]])
        );
    }

    #[test]
    fn test_comment_is_single_unit() {
        assert_eq!(
            units_of("{{# it's; all = one }}"),
            strings(&[&["# it's; all = one"]])
        );
    }

    #[test]
    fn test_empty_sub_statements_pruned() {
        assert_eq!(units_of("{{ ; %a% ;; }}"), strings(&[&["%a%"]]));
        assert!(units_of("{{ ; }}").is_empty());
    }

    #[test]
    fn test_literal_segment() {
        let segments = segment("plain").unwrap();
        let lines = tokenize(&segments[0]).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0][0].value, "plain");
    }

    #[test]
    fn test_unit_spans() {
        let segments = segment("ab{{= %x%}}").unwrap();
        let lines = tokenize(&segments[1]).unwrap();
        let variable = &lines[0][1];
        assert_eq!(variable.value, "%x%");
        assert_eq!(variable.span.start.column, 7);
        assert_eq!(variable.span.end.column, 10);
    }

    #[test]
    fn test_unterminated_quote() {
        let segments = segment("{{= 'oops }}").unwrap();
        let result = tokenize(&segments[0]);
        assert_matches!(result, Err(SegmentError::UnterminatedQuote { .. }));
    }
}
