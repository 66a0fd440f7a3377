//! Protocol Module
//!
//! Parses the line-oriented text protocol.
//!
//! ## Request Format
//! ```text
//! SET <key> <value>
//! GET <key>
//! DEL <key>
//! ```
//!
//! ## Response Format
//! One line per request: `SET ok`, `DEL ok`, the value for GET, or the
//! error message.

mod analyzer;
mod command;
mod parser;

pub use analyzer::{Analyzer, MIN_TOKENS, SET_TOKENS};
pub use command::Command;
pub use parser::Tokenizer;

use crate::error::Result;

/// Raw text → [`Command`]
#[derive(Debug, Default, Clone, Copy)]
pub struct Processor {
    tokenizer: Tokenizer,
    analyzer: Analyzer,
}

impl Processor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize and analyze one request line
    pub fn parse_query(&self, query: &str) -> Result<Command> {
        let tokens = self.tokenizer.tokenize(query)?;
        self.analyzer.analyze(&tokens)
    }
}
