use std::cell::Cell;

use super::*;
use forma_value::{raise, FailureKind};
use pretty_assertions::assert_eq;

fn tagged(tag: &str) -> Pattern {
    Pattern::tuple(vec![Pattern::atom(tag), Pattern::capture()])
}

#[test]
fn first_matching_clause_wins() {
    let clauses = [
        Clause::new(tagged("ok"), |b| Ok(b[0].clone())),
        Clause::new(Pattern::wildcard(), |_| Ok(Value::atom("fallback"))),
    ];
    let result = match_any(&clauses, &Value::ok(Value::int(1))).unwrap();
    assert_eq!(result, Value::int(1));

    let result = match_any(&clauses, &Value::error(Value::int(1))).unwrap();
    assert_eq!(result, Value::atom("fallback"));
}

#[test]
fn guard_rejects_and_falls_through() {
    let clauses = [
        Clause::new(Pattern::capture(), |_| Ok(Value::atom("big")))
            .when(|b| b[0].as_int().is_some_and(|n| n > 10)),
        Clause::new(Pattern::capture(), |_| Ok(Value::atom("small"))),
    ];
    assert_eq!(match_any(&clauses, &Value::int(50)).unwrap(), Value::atom("big"));
    assert_eq!(match_any(&clauses, &Value::int(5)).unwrap(), Value::atom("small"));
}

#[test]
fn later_clauses_never_evaluated() {
    let later_guard_calls = Cell::new(0);
    let later_body_calls = Cell::new(0);
    let clauses = [
        Clause::new(Pattern::wildcard(), |_| Ok(Value::int(1))),
        Clause::new(Pattern::wildcard(), |_| {
            later_body_calls.set(later_body_calls.get() + 1);
            Ok(Value::int(2))
        })
        .when(|_| {
            later_guard_calls.set(later_guard_calls.get() + 1);
            true
        }),
    ];
    assert_eq!(match_any(&clauses, &Value::Nil).unwrap(), Value::int(1));
    assert_eq!(later_guard_calls.get(), 0);
    assert_eq!(later_body_calls.get(), 0);
}

#[test]
fn exhaustion_raises_no_clause_match() {
    let clauses = [Clause::new(tagged("ok"), |b| Ok(b[0].clone()))];
    let err = match_any(&clauses, &Value::atom("other")).unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::NoClauseMatch {
            value: Value::atom("other")
        }
    );
}

#[test]
fn empty_matcher_always_fails() {
    let clauses: [Clause<'_>; 0] = [];
    let matcher = defmatch(&clauses);
    assert!(matcher.is_empty());
    assert!(matcher.call(&Value::Nil).is_err());
}

#[test]
fn handler_failure_propagates_unchanged() {
    let clauses = [Clause::new(Pattern::wildcard(), |_| {
        Err(raise(Value::string("boom")))
    })];
    let err = match_any(&clauses, &Value::Nil).unwrap_err();
    assert_eq!(err, raise(Value::string("boom")));
}

#[test]
fn find_does_not_run_handler() {
    let runs = Cell::new(0);
    let clauses = [
        Clause::new(tagged("a"), |_| {
            runs.set(runs.get() + 1);
            Ok(Value::Nil)
        }),
        Clause::new(tagged("b"), |_| {
            runs.set(runs.get() + 1);
            Ok(Value::Nil)
        }),
    ];
    let matcher = defmatch(&clauses);
    assert_eq!(matcher.len(), 2);
    let (clause, bindings) = matcher
        .find(&Value::tuple(vec![Value::atom("b"), Value::int(7)]))
        .unwrap();
    assert_eq!(clause.pattern(), &tagged("b"));
    assert_eq!(bindings.as_slice(), &[Value::int(7)]);
    assert_eq!(runs.get(), 0);
}
