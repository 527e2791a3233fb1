//! Token and unit classification

use serde::Serialize;
use std::fmt;

/// One entry of the flattened statement stream handed to the assembler
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Token {
    /// Literal template text between statements
    Text(String),
    /// One formula unit inside a statement
    Unit(String),
    /// `;` separating sub-statements of one `{{ ... }}` segment
    Semicolon,
    /// End of a `{{ ... }}` segment
    Close,
}

impl Token {
    pub fn unit(&self) -> Option<&str> {
        match self {
            Token::Unit(unit) => Some(unit),
            _ => None,
        }
    }

    /// Whether this token ends the statement currently being assembled
    pub fn is_statement_end(&self) -> bool {
        matches!(self, Token::Semicolon | Token::Close | Token::Text(_))
    }

    pub fn describe(&self) -> String {
        match self {
            Token::Text(text) => format!("text {:?}", truncate(text, 20)),
            Token::Unit(unit) => format!("'{}'", unit),
            Token::Semicolon => "';'".to_string(),
            Token::Close => "'}}'".to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut short: String = text.chars().take(max_chars).collect();
        short.push_str("...");
        short
    }
}

/// Control keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Keyword {
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

impl Keyword {
    pub const ALL: [Keyword; 12] = [
        Keyword::If,
        Keyword::Elif,
        Keyword::Else,
        Keyword::EndIf,
        Keyword::While,
        Keyword::Do,
        Keyword::Done,
        Keyword::For,
        Keyword::Foreach,
        Keyword::In,
        Keyword::Break,
        Keyword::Continue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::If => "if",
            Keyword::Elif => "elif",
            Keyword::Else => "else",
            Keyword::EndIf => "endif",
            Keyword::While => "while",
            Keyword::Do => "do",
            Keyword::Done => "done",
            Keyword::For => "for",
            Keyword::Foreach => "foreach",
            Keyword::In => "in",
            Keyword::Break => "break",
            Keyword::Continue => "continue",
        }
    }

    /// Case-insensitive keyword lookup
    pub fn from_unit(unit: &str) -> Option<Keyword> {
        Self::ALL
            .iter()
            .copied()
            .find(|keyword| keyword.as_str().eq_ignore_ascii_case(unit))
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operators recognised as two-character units, longest match first
pub const TWO_CHAR_OPERATORS: [&str; 10] = ["++", "--", "==", "!=", "<=", ">=", "<<", ">>", "&&", "||"];

/// Characters that always form a unit on their own
pub const SINGLE_CHAR_UNITS: [char; 15] = [
    '[', ']', '{', '}', '*', '/', '!', '=', '+', '-', '&', '|', '<', '>', '%',
];

pub fn is_variable_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' || ch == '.'
}

/// Name inside a `%name%` unit
pub fn variable_name(unit: &str) -> Option<&str> {
    let inner = unit.strip_prefix('%')?.strip_suffix('%')?;
    if !inner.is_empty() && inner.chars().all(is_variable_name_char) {
        Some(inner)
    } else {
        None
    }
}

/// `'...'` or `"..."` unit with matching quotes
pub fn is_quoted(unit: &str) -> bool {
    let mut chars = unit.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) => (first == '\'' || first == '"') && first == last,
        _ => false,
    }
}

pub fn is_comment_unit(unit: &str) -> bool {
    unit.starts_with('#')
}
