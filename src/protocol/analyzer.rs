//! Analyzer
//!
//! Turns tokens into a [`Command`].

use super::Command;
use crate::error::{EmberError, Result};

/// Fewest tokens a command can have (`GET key`)
pub const MIN_TOKENS: usize = 2;

/// Tokens in a SET command (`SET key value`)
pub const SET_TOKENS: usize = 3;

/// Validates token sequences
#[derive(Debug, Default, Clone, Copy)]
pub struct Analyzer;

impl Analyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze tokens produced by the tokenizer
    ///
    /// Extra trailing tokens are ignored.
    pub fn analyze(&self, tokens: &[String]) -> Result<Command> {
        if tokens.len() < MIN_TOKENS {
            return Err(EmberError::Protocol(format!(
                "tokens size less than {}",
                MIN_TOKENS
            )));
        }

        let key = tokens[1].as_str();
        match tokens[0].as_str() {
            "SET" => {
                if tokens.len() < SET_TOKENS {
                    return Err(EmberError::Protocol("no value set for key".to_string()));
                }
                Ok(Command::set(key, tokens[2].as_str()))
            }
            "GET" => Ok(Command::get(key)),
            "DEL" => Ok(Command::del(key)),
            _ => Err(EmberError::Protocol("unknown command".to_string())),
        }
    }
}
