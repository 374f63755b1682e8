use std::cell::Cell;

use super::*;
use crate::collectable::ValueCollectable;
use forma_value::{raise, FailureKind};
use pretty_assertions::assert_eq;

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::int).collect()
}

#[test]
fn single_generator_maps_in_order() {
    let expr = ForExpr::new(|b| Ok(Value::int(b[0].as_int().unwrap() * 2)));
    let result = comprehend(
        &expr,
        vec![Generator::list(ints(&[1, 2, 3]))],
        &ValueCollectable,
        Value::list(vec![]),
    )
    .unwrap();
    assert_eq!(result, Value::list(ints(&[2, 4, 6])));
}

#[test]
fn leftmost_generator_varies_slowest() {
    let expr = ForExpr::new(|b| Ok(Value::tuple(b.to_vec())));
    let result = comprehend(
        &expr,
        vec![
            Generator::list(ints(&[1, 2])),
            Generator::list(vec![Value::atom("a"), Value::atom("b")]),
        ],
        &ValueCollectable,
        Value::list(vec![]),
    )
    .unwrap();
    let pair = |n: i64, a: &str| Value::tuple(vec![Value::int(n), Value::atom(a)]);
    assert_eq!(
        result,
        Value::list(vec![pair(1, "a"), pair(1, "b"), pair(2, "a"), pair(2, "b")])
    );
}

#[test]
fn three_generators_nest() {
    let expr = ForExpr::new(|b| {
        let digits: Vec<i64> = b.iter().map(|v| v.as_int().unwrap()).collect();
        Ok(Value::int(digits[0] * 100 + digits[1] * 10 + digits[2]))
    });
    let result = comprehend(
        &expr,
        vec![
            Generator::list(ints(&[1, 2])),
            Generator::list(ints(&[3, 4])),
            Generator::list(ints(&[5, 6])),
        ],
        &ValueCollectable,
        Value::list(vec![]),
    )
    .unwrap();
    assert_eq!(
        result,
        Value::list(ints(&[135, 136, 145, 146, 235, 236, 245, 246]))
    );
}

#[test]
fn guard_filters_tuples() {
    let expr = ForExpr::new(|b| Ok(b[0].clone())).when(|b| b[0].as_int().unwrap() % 2 == 0);
    let result = comprehend(
        &expr,
        vec![Generator::list(ints(&[1, 2, 3, 4]))],
        &ValueCollectable,
        Value::list(vec![]),
    )
    .unwrap();
    assert_eq!(result, Value::list(ints(&[2, 4])));
}

/// Records every step instruction it receives.
struct Recording<'r> {
    steps: &'r std::cell::RefCell<Vec<Collect>>,
}

impl Collectable for Recording<'_> {
    fn into_collector(&self, target: Value) -> FormResult<(Value, crate::collectable::StepFn<'_>)> {
        let step: crate::collectable::StepFn<'_> = Box::new(|acc: Value, instruction: Collect| {
            self.steps.borrow_mut().push(instruction);
            Ok(acc)
        });
        Ok((target, step))
    }
}

#[test]
fn one_cont_per_emitted_value_then_done() {
    let steps = std::cell::RefCell::new(Vec::new());
    let expr = ForExpr::new(|b| Ok(b[0].clone())).when(|b| b[0].as_int().unwrap() > 1);
    comprehend(
        &expr,
        vec![Generator::list(ints(&[1, 2, 3]))],
        &Recording { steps: &steps },
        Value::Nil,
    )
    .unwrap();
    assert_eq!(
        *steps.borrow(),
        vec![
            Collect::Cont(Value::int(2)),
            Collect::Cont(Value::int(3)),
            Collect::Done
        ]
    );
}

#[test]
fn empty_generator_yields_empty_product() {
    let body_calls = Cell::new(0);
    let expr = ForExpr::new(|_| {
        body_calls.set(body_calls.get() + 1);
        Ok(Value::Nil)
    });
    let result = comprehend(
        &expr,
        vec![Generator::list(ints(&[1, 2])), Generator::list(vec![])],
        &ValueCollectable,
        Value::list(vec![]),
    )
    .unwrap();
    assert_eq!(result, Value::list(vec![]));
    assert_eq!(body_calls.get(), 0);
}

#[test]
fn no_generators_returns_target() {
    let expr = ForExpr::new(|_| Ok(Value::Nil));
    let result = comprehend(&expr, vec![], &ValueCollectable, Value::string("x")).unwrap();
    assert_eq!(result, Value::string("x"));
}

#[test]
fn bindings_generator_spreads_tuples() {
    let expr = ForExpr::new(|b| Ok(Value::int(b[0].as_int().unwrap() + b[1].as_int().unwrap())));
    let result = comprehend(
        &expr,
        vec![Generator::bindings(|| {
            Ok(vec![
                Bindings::from_vec(ints(&[1, 2])),
                Bindings::from_vec(ints(&[10, 20])),
            ])
        })],
        &ValueCollectable,
        Value::list(vec![]),
    )
    .unwrap();
    assert_eq!(result, Value::list(ints(&[3, 30])));
}

#[test]
fn matching_generator_skips_mismatches() {
    let expr = ForExpr::new(|b| Ok(b[0].clone()));
    let result = comprehend(
        &expr,
        vec![Generator::matching(Pattern::ok(Pattern::capture()), || {
            Ok(vec![
                Value::ok(Value::int(1)),
                Value::error(Value::int(2)),
                Value::ok(Value::int(3)),
            ])
        })],
        &ValueCollectable,
        Value::list(vec![]),
    )
    .unwrap();
    assert_eq!(result, Value::list(ints(&[1, 3])));
}

#[test]
fn collects_into_map() {
    let expr = ForExpr::new(|b| {
        let n = b[0].as_int().unwrap();
        Ok(Value::tuple(vec![Value::int(n), Value::int(n * n)]))
    });
    let result = comprehend(
        &expr,
        vec![Generator::list(ints(&[2, 3]))],
        &ValueCollectable,
        Value::map([]),
    )
    .unwrap();
    assert_eq!(result.get(&forma_value::MapKey::Int(3)), Some(&Value::int(9)));
}

#[test]
fn uncollectable_target_skips_generators() {
    let produced = Cell::new(false);
    let expr = ForExpr::new(|_| Ok(Value::Nil));
    let err = comprehend(
        &expr,
        vec![Generator::values(|| {
            produced.set(true);
            Ok(ints(&[1]))
        })],
        &ValueCollectable,
        Value::int(0),
    )
    .unwrap_err();
    assert!(matches!(err.kind, FailureKind::NotCollectable { .. }));
    assert!(!produced.get());
}

#[test]
fn generator_failure_propagates() {
    let expr = ForExpr::new(|_| Ok(Value::Nil));
    let err = comprehend(
        &expr,
        vec![Generator::values(|| -> FormResult<Vec<Value>> {
            Err(raise(Value::string("no source")))
        })],
        &ValueCollectable,
        Value::list(vec![]),
    )
    .unwrap_err();
    assert_eq!(err, raise(Value::string("no source")));
}

#[test]
fn body_failure_stops_comprehension() {
    let calls = Cell::new(0);
    let expr = ForExpr::new(|b| {
        calls.set(calls.get() + 1);
        if b[0] == Value::int(2) {
            Err(raise(Value::atom("stop")))
        } else {
            Ok(b[0].clone())
        }
    });
    let err = comprehend(
        &expr,
        vec![Generator::list(ints(&[1, 2, 3]))],
        &ValueCollectable,
        Value::list(vec![]),
    )
    .unwrap_err();
    assert_eq!(err, raise(Value::atom("stop")));
    assert_eq!(calls.get(), 2);
}

#[test]
fn single_generator_is_consumed_lazily() {
    let pulled = Cell::new(0);
    let expr = ForExpr::new(|b| {
        if b[0] == Value::int(2) {
            Err(raise(Value::atom("stop")))
        } else {
            Ok(b[0].clone())
        }
    });
    let source = (1..=1000).map(|n| {
        pulled.set(pulled.get() + 1);
        Value::int(n)
    });
    let err = comprehend(
        &expr,
        vec![Generator::list(source)],
        &ValueCollectable,
        Value::list(vec![]),
    )
    .unwrap_err();
    assert_eq!(err, raise(Value::atom("stop")));
    assert_eq!(pulled.get(), 2);
}
