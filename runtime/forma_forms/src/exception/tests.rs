use std::cell::{Cell, RefCell};

use super::*;
use forma_patterns::Pattern;
use forma_value::{bad_match, exit, raise, throw, FailureKind, MapKey, RaiseKind};
use pretty_assertions::assert_eq;

#[test]
fn success_without_else_returns_block_value() {
    let result = Try::new(|| Ok(Value::int(1))).run().unwrap();
    assert_eq!(result, Value::int(1));
}

#[test]
fn else_receives_block_value() {
    let result = Try::new(|| Ok(Value::int(2)))
        .with_else(|v| Ok(Value::int(v.as_int().unwrap() * 10)))
        .run()
        .unwrap();
    assert_eq!(result, Value::int(20));
}

#[test]
fn rescue_gets_reason() {
    let raised = Value::map([(MapKey::from("__reason"), Value::atom("enoent"))]);
    let result = Try::new(move || Err(raise(raised)))
        .with_rescue(|rescued| Ok(rescued.reason))
        .run()
        .unwrap();
    assert_eq!(result, Value::atom("enoent"));
}

#[test]
fn rescue_without_reason_gets_payload() {
    let result = Try::new(|| Err(raise(Value::string("boom"))))
        .with_rescue(|rescued| {
            assert_eq!(rescued.original, raise(Value::string("boom")));
            Ok(rescued.reason)
        })
        .run()
        .unwrap();
    assert_eq!(result, Value::string("boom"));
}

#[test]
fn rescue_takes_priority_over_catch() {
    let caught = Cell::new(false);
    let result = Try::new(|| Err(throw(Value::int(1))))
        .with_rescue(|_| Ok(Value::atom("rescued")))
        .with_catch(|_| {
            caught.set(true);
            Ok(Value::atom("caught"))
        })
        .run()
        .unwrap();
    assert_eq!(result, Value::atom("rescued"));
    assert!(!caught.get());
}

#[test]
fn catch_gets_raw_failure() {
    let result = Try::new(|| Err(throw(Value::int(7))))
        .with_catch(|failure| {
            assert_eq!(failure.raise_kind(), Some(RaiseKind::Throw));
            Ok(failure.payload)
        })
        .run()
        .unwrap();
    assert_eq!(result, Value::int(7));
}

#[test]
fn unhandled_failure_propagates_after_running_after() {
    let after_runs = Cell::new(0);
    let err = Try::new(|| Err(exit(Value::atom("normal"))))
        .with_after(|| after_runs.set(after_runs.get() + 1))
        .run()
        .unwrap_err();
    assert_eq!(err, exit(Value::atom("normal")));
    assert_eq!(after_runs.get(), 1);
}

#[test]
fn after_runs_once_when_handler_fails() {
    let after_runs = Cell::new(0);
    let err = Try::new(|| Err(raise(Value::int(1))))
        .with_rescue(|_| Err(raise(Value::int(2))))
        .with_after(|| after_runs.set(after_runs.get() + 1))
        .run()
        .unwrap_err();
    assert_eq!(err, raise(Value::int(2)));
    assert_eq!(after_runs.get(), 1);
}

#[test]
fn after_runs_after_else() {
    let log = RefCell::new(Vec::new());
    Try::new(|| {
        log.borrow_mut().push("block");
        Ok(Value::Nil)
    })
    .with_else(|v| {
        log.borrow_mut().push("else");
        Ok(v)
    })
    .with_after(|| log.borrow_mut().push("after"))
    .run()
    .unwrap();
    assert_eq!(*log.borrow(), vec!["block", "else", "after"]);
}

#[test]
fn after_result_is_discarded() {
    let result = Try::new(|| Ok(Value::int(5)))
        .with_after(|| {})
        .run()
        .unwrap();
    assert_eq!(result, Value::int(5));
}

#[test]
fn else_match_error_becomes_no_match_in_else() {
    let err = Try::new(|| Ok(Value::int(3)))
        .with_else(|v| Err(bad_match(v)))
        .run()
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::NoMatchInElse {
            value: Value::int(3)
        }
    );
}

#[test]
fn else_clauses_without_match_fail() {
    let err = Try::new(|| Ok(Value::atom("other")))
        .with_else_clauses(vec![Clause::new(Pattern::ok(Pattern::capture()), |b| {
            Ok(b[0].clone())
        })])
        .run()
        .unwrap_err();
    assert!(matches!(err.kind, FailureKind::NoMatchInElse { .. }));

    let ok = Try::new(|| Ok(Value::ok(Value::int(1))))
        .with_else_clauses(vec![Clause::new(Pattern::ok(Pattern::capture()), |b| {
            Ok(b[0].clone())
        })])
        .run()
        .unwrap();
    assert_eq!(ok, Value::int(1));
}

#[test]
fn else_other_failures_propagate() {
    let err = Try::new(|| Ok(Value::Nil))
        .with_else(|_| Err(raise(Value::string("else failed"))))
        .run()
        .unwrap_err();
    assert_eq!(err, raise(Value::string("else failed")));
}

#[test]
fn after_runs_on_panic() {
    let after_ran = std::sync::atomic::AtomicBool::new(false);
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        Try::new(|| panic!("block panicked"))
            .with_after(|| after_ran.store(true, std::sync::atomic::Ordering::SeqCst))
            .run()
    }));
    assert!(outcome.is_err());
    assert!(after_ran.load(std::sync::atomic::Ordering::SeqCst));
}
