//! Tests for the text protocol and the command handler
//!
//! These tests verify:
//! - Tokenizer character rules and splitting
//! - Analyzer command validation
//! - App execution and response rendering

use emberkv::app::App;
use emberkv::engine::{ActionType, Engine};
use emberkv::protocol::{Analyzer, Command, Processor, Tokenizer};
use emberkv::sync::Context;
use emberkv::EmberError;

// =============================================================================
// Helper Functions
// =============================================================================

fn tokens(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// =============================================================================
// Tokenizer Tests
// =============================================================================

#[test]
fn test_tokenize_simple_command() {
    let result = Tokenizer::new().tokenize("SET key_1 value/2").unwrap();
    assert_eq!(result, tokens(&["SET", "key_1", "value/2"]));
}

#[test]
fn test_tokenize_allows_star_and_digits() {
    let result = Tokenizer::new().tokenize("GET *42*").unwrap();
    assert_eq!(result, tokens(&["GET", "*42*"]));
}

#[test]
fn test_tokenize_rejects_invalid_symbols() {
    for input in ["SET key val-ue", "GET ke.y", "DEL key\t", "SET k ключ"] {
        let err = Tokenizer::new().tokenize(input).unwrap_err();
        assert_eq!(err.to_string(), "not valid symbol", "input: {:?}", input);
    }
}

#[test]
fn test_tokenize_double_space_yields_empty_token() {
    let result = Tokenizer::new().tokenize("GET  key").unwrap();
    assert_eq!(result, tokens(&["GET", "", "key"]));
}

#[test]
fn test_tokenize_empty_input() {
    let result = Tokenizer::new().tokenize("").unwrap();
    assert_eq!(result, tokens(&[""]));
}

// =============================================================================
// Analyzer Tests
// =============================================================================

#[test]
fn test_analyze_set() {
    let command = Analyzer::new().analyze(&tokens(&["SET", "k", "v"])).unwrap();
    assert_eq!(command, Command::set("k", "v"));
    assert_eq!(command.action, ActionType::Set);
}

#[test]
fn test_analyze_get_and_del() {
    let analyzer = Analyzer::new();
    assert_eq!(analyzer.analyze(&tokens(&["GET", "k"])).unwrap(), Command::get("k"));
    assert_eq!(analyzer.analyze(&tokens(&["DEL", "k"])).unwrap(), Command::del("k"));
}

#[test]
fn test_analyze_too_few_tokens() {
    let err = Analyzer::new().analyze(&tokens(&["GET"])).unwrap_err();
    assert!(matches!(err, EmberError::Protocol(_)));
    assert_eq!(err.to_string(), "tokens size less than 2");
}

#[test]
fn test_analyze_set_without_value() {
    let err = Analyzer::new().analyze(&tokens(&["SET", "k"])).unwrap_err();
    assert_eq!(err.to_string(), "no value set for key");
}

#[test]
fn test_analyze_unknown_command() {
    let err = Analyzer::new().analyze(&tokens(&["PUT", "k", "v"])).unwrap_err();
    assert_eq!(err.to_string(), "unknown command");

    // Commands are case sensitive
    assert!(Analyzer::new().analyze(&tokens(&["get", "k"])).is_err());
}

#[test]
fn test_analyze_ignores_extra_tokens() {
    let command = Analyzer::new()
        .analyze(&tokens(&["GET", "k", "extra"]))
        .unwrap();
    assert_eq!(command, Command::get("k"));
}

#[test]
fn test_processor_parse_query() {
    let processor = Processor::new();
    assert_eq!(processor.parse_query("DEL abc").unwrap(), Command::del("abc"));
    assert!(processor.parse_query("DEL a-b").is_err());
}

// =============================================================================
// App Tests
// =============================================================================

#[test]
fn test_app_set_get_del() {
    let app = App::new(Engine::new());
    let ctx = Context::background();

    assert_eq!(app.handle(&ctx, "SET key_123 value_123"), "SET ok");
    assert_eq!(app.handle(&ctx, "GET key_123"), "value_123");
    assert_eq!(app.handle(&ctx, "DEL key_123"), "DEL ok");
    assert_eq!(app.handle(&ctx, "GET key_123"), "GET query: no key");
}

#[test]
fn test_app_execute_keeps_error_kind() {
    let app = App::new(Engine::new());
    let ctx = Context::background();

    let err = app.execute(&ctx, "GET missing").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_app_renders_parse_errors() {
    let app = App::new(Engine::new());
    let ctx = Context::background();

    assert_eq!(app.handle(&ctx, "SET k"), "parse query: no value set for key");
    assert_eq!(app.handle(&ctx, "NOPE k"), "parse query: unknown command");
    assert_eq!(app.handle(&ctx, "SET k v!"), "parse query: not valid symbol");
}

#[test]
fn test_app_renders_cancellation() {
    let app = App::new(Engine::new());
    let (ctx, cancel) = Context::with_cancel();
    cancel.cancel();

    assert_eq!(app.handle(&ctx, "SET k v"), "SET query: context cancelled");
}
