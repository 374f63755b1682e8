use super::*;
use forma_value::Atom;

#[test]
fn capture_counts() {
    assert_eq!(Pattern::wildcard().capture_count(), 0);
    assert_eq!(Pattern::capture().capture_count(), 1);
    assert_eq!(Pattern::atom("ok").capture_count(), 0);
    assert_eq!(Pattern::ok(Pattern::capture()).capture_count(), 1);
    assert_eq!(
        Pattern::tuple(vec![Pattern::capture(), Pattern::wildcard(), Pattern::capture()])
            .capture_count(),
        2
    );
}

#[test]
fn list_tail_counts() {
    let p = Pattern::cons(vec![Pattern::capture()], Pattern::capture());
    assert_eq!(p.capture_count(), 2);
    assert_eq!(Pattern::list(vec![]).capture_count(), 0);
}

#[test]
fn map_and_as_counts() {
    let p = Pattern::bound_as(Pattern::map(vec![
        (MapKey::Atom(Atom::new("a")), Pattern::capture()),
        (MapKey::from("b"), Pattern::literal(Value::int(1))),
    ]));
    assert_eq!(p.capture_count(), 2);
}

#[test]
fn alternatives_count_first() {
    let p = Pattern::any_of(vec![
        Pattern::ok(Pattern::capture()),
        Pattern::error(Pattern::capture()),
    ])
    .unwrap();
    assert_eq!(p.capture_count(), 1);
    assert_eq!(Pattern::any_of(vec![]).unwrap().capture_count(), 0);
}

#[test]
fn uneven_alternatives_are_rejected() {
    let err = Pattern::any_of(vec![
        Pattern::literal(Value::int(1)),
        Pattern::wildcard(),
        Pattern::capture(),
    ])
    .unwrap_err();
    assert_eq!(
        err,
        UnevenAlternatives {
            index: 2,
            expected: 0,
            found: 1
        }
    );
}

#[test]
fn value_converts_to_literal() {
    assert_eq!(Pattern::from(Value::int(1)), Pattern::Literal(Value::int(1)));
}
