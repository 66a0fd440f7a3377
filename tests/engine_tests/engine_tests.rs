//! Engine Tests
//!
//! Tests verify:
//! - Basic upsert/get/del operations
//! - NotFound on missing keys, idempotent delete
//! - Fail-fast on cancelled contexts
//! - Flush (clear) behavior
//! - Concurrent access patterns

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use emberkv::engine::{Engine, Kv};
use emberkv::sync::Context;
use emberkv::EmberError;

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_new_engine_is_empty() {
    let engine = Engine::new();
    assert!(engine.is_empty());
    assert_eq!(engine.len(), 0);
}

#[test]
fn test_upsert_and_get() {
    let engine = Engine::new();
    let ctx = Context::background();

    engine.upsert(&ctx, Kv::new("key1", "value1")).unwrap();

    assert_eq!(engine.get(&ctx, "key1").unwrap(), "value1");
    assert_eq!(engine.len(), 1);
}

#[test]
fn test_get_missing_key_is_not_found() {
    let engine = Engine::new();
    let ctx = Context::background();

    let err = engine.get(&ctx, "missing").unwrap_err();
    assert!(matches!(err, EmberError::KeyNotFound));
    assert!(err.is_not_found());
}

#[test]
fn test_upsert_overwrites() {
    let engine = Engine::new();
    let ctx = Context::background();

    engine.upsert(&ctx, Kv::new("key", "v1")).unwrap();
    engine.upsert(&ctx, Kv::new("key", "v2")).unwrap();

    assert_eq!(engine.get(&ctx, "key").unwrap(), "v2");
    assert_eq!(engine.len(), 1);
}

#[test]
fn test_del_removes_key() {
    let engine = Engine::new();
    let ctx = Context::background();

    engine.upsert(&ctx, Kv::new("key", "value")).unwrap();
    engine.del(&ctx, "key").unwrap();

    assert!(engine.get(&ctx, "key").unwrap_err().is_not_found());
    assert!(engine.is_empty());
}

#[test]
fn test_del_missing_key_is_noop() {
    let engine = Engine::new();
    let ctx = Context::background();

    engine.del(&ctx, "never_set").unwrap();
    engine.del(&ctx, "never_set").unwrap();

    assert!(engine.get(&ctx, "never_set").unwrap_err().is_not_found());
}

#[test]
fn test_flush_clears_everything() {
    let engine = Engine::new();
    let ctx = Context::background();

    for i in 0..10 {
        engine
            .upsert(&ctx, Kv::new(format!("key{}", i), format!("value{}", i)))
            .unwrap();
    }
    assert_eq!(engine.len(), 10);

    engine.flush();

    assert!(engine.is_empty());
    assert!(engine.get(&ctx, "key0").unwrap_err().is_not_found());
}

#[test]
fn test_empty_value() {
    let engine = Engine::new();
    let ctx = Context::background();

    engine.upsert(&ctx, Kv::new("key", "")).unwrap();
    assert_eq!(engine.get(&ctx, "key").unwrap(), "");
}

// =============================================================================
// Cancellation Tests
// =============================================================================

#[test]
fn test_cancelled_context_fails_fast() {
    let engine = Engine::new();
    let background = Context::background();
    engine.upsert(&background, Kv::new("key", "value")).unwrap();

    let (ctx, cancel) = Context::with_cancel();
    cancel.cancel();

    assert!(matches!(
        engine.upsert(&ctx, Kv::new("key", "other")),
        Err(EmberError::Cancelled)
    ));
    assert!(matches!(engine.get(&ctx, "key"), Err(EmberError::Cancelled)));
    assert!(matches!(engine.del(&ctx, "key"), Err(EmberError::Cancelled)));

    // Nothing changed
    assert_eq!(engine.get(&background, "key").unwrap(), "value");
}

#[test]
fn test_expired_deadline_fails_fast() {
    let engine = Engine::new();
    let ctx = Context::with_timeout(Duration::from_millis(1));
    thread::sleep(Duration::from_millis(10));

    let err = engine.upsert(&ctx, Kv::new("key", "value")).unwrap_err();
    assert!(matches!(err, EmberError::DeadlineExceeded));
    assert!(err.is_cancelled());
    assert!(engine.is_empty());
}

// =============================================================================
// Concurrent Access Tests
// =============================================================================

#[test]
fn test_concurrent_writers_distinct_keys() {
    let engine = Arc::new(Engine::new());
    let mut handles = vec![];

    for t in 0..8 {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            let ctx = Context::background();
            for i in 0..100 {
                engine
                    .upsert(&ctx, Kv::new(format!("t{}_k{}", t, i), format!("v{}", i)))
                    .unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(engine.len(), 800);
}

#[test]
fn test_concurrent_readers() {
    let engine = Arc::new(Engine::new());
    let ctx = Context::background();
    engine.upsert(&ctx, Kv::new("shared", "value")).unwrap();

    let mut handles = vec![];
    for _ in 0..8 {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            let ctx = Context::background();
            for _ in 0..1000 {
                assert_eq!(engine.get(&ctx, "shared").unwrap(), "value");
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
}
