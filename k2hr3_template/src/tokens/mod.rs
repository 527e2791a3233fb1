//! Unit tokenizer and token stream
//!
//! Statement segments are split into formula units: quoted strings,
//! `%name%` variables, operators, brackets and bare words. The units of
//! all segments are then flattened into one [`TokenStream`] where literal
//! text, `;` and the end of each statement are explicit tokens.

pub mod token;
pub mod token_stream;
pub mod unit;

pub use token::{Keyword, Token};
pub use token_stream::{SpannedToken, TokenStream};
pub use unit::{tokenize, UnitLine};
