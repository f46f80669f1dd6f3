//! things-lex - Lexical analyzer for ThingScript.
//!
//! The lexer transforms UTF-8 source text into a stream of [`Token`]s. Each
//! call to [`Lexer::next_token`] produces one token; once the input is
//! exhausted every further call produces an `EOF` token.
//!
//! Tokens carry their source position (line and column) and the literal text
//! exactly as it appeared in the source. Integer literals keep their radix
//! prefix (`0x1F`, `0b1010`, `0o17`, `017`); the parser performs the actual
//! numeric conversion with radix auto-detection.
//!
//! Comments are not discarded: `//` and `/* ... */` become `COMMENT` tokens
//! so downstream consumers can skip them without losing positions.
//!
//! A token whose line differs from the previous token's line is flagged
//! `no_infix`. The flag marks tokens that start a line and is reserved for
//! rejecting operator continuation across line breaks; the parser currently
//! does not act on it.

mod cursor;
mod edge_cases;
mod lexer;
mod token;

pub use cursor::Cursor;
pub use lexer::Lexer;
pub use token::{lookup_ident, Position, Token, TokenKind};

/// Default number of columns a tab character advances.
pub const DEFAULT_TAB_SIZE: u32 = 4;
