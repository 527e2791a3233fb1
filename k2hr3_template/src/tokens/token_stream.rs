//! Flattened token stream consumed by the assembler

use super::token::Token;
use super::unit::tokenize;
use crate::segmenter::{SegmentResult, StatementSegment};
use crate::utils::{Span, Spanned};
use crate::{log_debug, log_error};

/// A token with span information
pub type SpannedToken = Spanned<Token>;

/// Token stream with lookahead and position checkpoints for backtracking
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<SpannedToken>,
    position: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Tokenize every segment, record its formula units and flatten the
    /// result. Each statement's sub-statements are separated by
    /// `Semicolon` and the statement ends with `Close`. Statements with
    /// no units produce nothing.
    pub fn from_segments(segments: &mut [StatementSegment]) -> SegmentResult<Self> {
        let mut tokens = Vec::new();

        for segment in segments.iter_mut() {
            let lines = tokenize(segment).map_err(|error| {
                log_error!(error.error_code(), "Statement could not be split into units",
                    span = segment.span,
                    "reason" => &error);
                error
            })?;

            segment.formula_units = lines
                .iter()
                .map(|line| line.iter().map(|unit| unit.value.clone()).collect())
                .collect();

            if !segment.is_statement {
                tokens.push(Spanned::new(
                    Token::Text(segment.converted_text.clone()),
                    segment.span,
                ));
                continue;
            }

            let line_count = lines.len();
            for (index, line) in lines.into_iter().enumerate() {
                let line_end = line.last().map(|unit| unit.span.end);
                tokens.extend(line.into_iter().map(|unit| unit.map(Token::Unit)));

                if index + 1 < line_count {
                    let at = line_end.unwrap_or(segment.span.start);
                    tokens.push(Spanned::new(Token::Semicolon, Span::point(at)));
                }
            }

            if line_count > 0 {
                tokens.push(Spanned::new(Token::Close, Span::point(segment.span.end)));
            }
        }

        log_debug!("Token stream built",
            "segments" => segments.len(),
            "tokens" => tokens.len());

        Ok(Self::new(tokens))
    }

    pub fn current(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.position)
    }

    pub fn current_token(&self) -> Option<&Token> {
        self.current().map(|spanned| &spanned.value)
    }

    /// Unit text of the current token, if it is a unit
    pub fn current_unit(&self) -> Option<&str> {
        self.current_token().and_then(Token::unit)
    }

    /// Consume the current token and return it
    pub fn advance(&mut self) -> Option<SpannedToken> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    /// Consume the current token if it is the unit `expected`
    pub fn advance_if_unit(&mut self, expected: &str) -> bool {
        if self.current_unit() == Some(expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Save current position as checkpoint for backtracking
    pub fn save_position(&self) -> usize {
        self.position
    }

    pub fn restore_position(&mut self, saved_position: usize) {
        self.position = saved_position.min(self.tokens.len());
    }

    /// Span of the current token, or of the last token once exhausted
    pub fn current_span(&self) -> Span {
        self.current()
            .or_else(|| self.tokens.last())
            .map(|spanned| spanned.span)
            .unwrap_or_else(Span::dummy)
    }

    /// Span from the token at `start_position` to the one before the cursor
    pub fn span_from(&self, start_position: usize) -> Span {
        let start = self.tokens.get(start_position).map(|t| t.span);
        let end = self
            .position
            .checked_sub(1)
            .and_then(|last| self.tokens.get(last))
            .map(|t| t.span);

        match (start, end) {
            (Some(start), Some(end)) if self.position > start_position => start.merge(end),
            (Some(start), _) => start,
            (None, _) => self.current_span(),
        }
    }

    pub fn tokens(&self) -> &[SpannedToken] {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmenter::segment;

    fn stream(source: &str) -> TokenStream {
        let mut segments = segment(source).unwrap();
        TokenStream::from_segments(&mut segments).unwrap()
    }

    fn values(stream: &TokenStream) -> Vec<Token> {
        stream.tokens().iter().map(|t| t.value.clone()).collect()
    }

    #[test]
    fn test_flatten_segments() {
        let stream = stream("a{{= %x%; 1}}b");
        assert_eq!(
            values(&stream),
            vec![
                Token::Text("a".into()),
                Token::Unit("=".into()),
                Token::Unit("%x%".into()),
                Token::Semicolon,
                Token::Unit("=".into()),
                Token::Unit("1".into()),
                Token::Close,
                Token::Text("b".into()),
            ]
        );
    }

    #[test]
    fn test_empty_statement_emits_nothing() {
        let stream = stream("a{{ }}b");
        assert_eq!(
            values(&stream),
            vec![Token::Text("a".into()), Token::Text("b".into())]
        );
    }

    #[test]
    fn test_formula_units_recorded() {
        let mut segments = segment("x{{if %a% == 1}}").unwrap();
        TokenStream::from_segments(&mut segments).unwrap();
        assert_eq!(segments[0].formula_units, vec![vec!["x".to_string()]]);
        assert_eq!(
            segments[1].formula_units,
            vec![vec!["if".to_string(), "%a%".into(), "==".into(), "1".into()]]
        );
    }

    #[test]
    fn test_navigation_and_checkpoints() {
        let mut stream = stream("{{= 1}}");
        assert_eq!(stream.current_unit(), Some("="));
        let saved = stream.save_position();

        assert!(stream.advance_if_unit("="));
        assert_eq!(stream.current_unit(), Some("1"));

        stream.restore_position(saved);
        assert_eq!(stream.current_unit(), Some("="));

        stream.advance();
        stream.advance();
        stream.advance();
        assert!(stream.is_at_end());
        assert_eq!(stream.advance(), None);
        assert_eq!(stream.position(), stream.len());
    }
}
