//! Tokenizer
//!
//! Splits a request line on single spaces. Tokens may contain ASCII
//! letters, digits, `*`, `/` and `_`; anything else is rejected.

use crate::error::{EmberError, Result};

/// Splits raw command text into tokens
#[derive(Debug, Default, Clone, Copy)]
pub struct Tokenizer;

impl Tokenizer {
    pub fn new() -> Self {
        Self
    }

    /// Tokenize one request line
    ///
    /// Every space ends a token, so consecutive spaces yield empty tokens.
    pub fn tokenize(&self, input: &str) -> Result<Vec<String>> {
        let mut tokens = Vec::new();
        let mut current = String::new();

        for ch in input.chars() {
            match ch {
                ' ' => tokens.push(std::mem::take(&mut current)),
                ch if is_valid(ch) => current.push(ch),
                _ => return Err(EmberError::Protocol("not valid symbol".to_string())),
            }
        }

        tokens.push(current);
        Ok(tokens)
    }
}

fn is_valid(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '*' | '/' | '_')
}
