//! Integration tests for the exception taxonomy, runtime type identity and the value container.

use std::sync::Arc;

use parsecore::{
    exceptions::{
        Cancellation, EmptyStack, IllegalArgument, IllegalState, IndexOutOfBounds, IoFailure,
        NullReference, ParseCancellation, RuntimeFailure, UnsupportedOperation,
    },
    impl_rtti,
    prelude::*,
    rtti::{checked_cast, downcast_arc},
};

fn fails_with(raised: Raised) -> std::result::Result<&'static str, Raised> {
    Err(raised)
}

/// Every runtime kind is caught by a handler for the root, I/O failures are not.
#[test]
fn test_root_handler_coverage() {
    let runtime_kinds = [
        Raised::new(IllegalState::new("state")),
        Raised::new(IllegalArgument::new("argument")),
        Raised::new(NullReference::new("null")),
        Raised::new(IndexOutOfBounds::new("index")),
        Raised::new(UnsupportedOperation::new("unsupported")),
        Raised::new(EmptyStack::new("empty")),
        Raised::new(Cancellation::new("cancel")),
        Raised::new(ParseCancellation::new("parse")),
    ];

    for raised in runtime_kinds {
        let message = raised.message().to_string();
        let handled = fails_with(raised).catch(|failure: &RuntimeFailure| {
            assert_eq!(failure.message(), message);
            "root"
        });
        assert_eq!(handled.unwrap(), "root");
    }

    let io = fails_with(Raised::new(IoFailure::new("disk"))).catch(|_: &RuntimeFailure| "root");
    assert!(io.unwrap_err().is::<IoFailure>());
}

/// A handler for an unrelated branch lets the exception propagate untouched.
#[test]
fn test_unrelated_handler_propagates() {
    let raised = fails_with(Raised::new(ParseCancellation::new("bail")))
        .catch(|_: &IllegalArgument| "argument")
        .unwrap_err();

    assert!(raised.is::<Cancellation>());
    assert!(raised.kind_name().ends_with("ParseCancellation"));
    assert_eq!(raised.message(), "bail");
}

/// Raised exceptions travel through the crate error type and out again.
#[test]
fn test_through_crate_error() {
    let err = parsecore::tree::TextChunk::new("").unwrap_err();
    let Error::Exception(raised) = err else {
        panic!("expected a raised exception");
    };

    let reason = raised
        .catch(|e: &IllegalArgument| e.message().to_string())
        .unwrap();
    assert_eq!(reason, "text cannot be empty");
}

// A four-level hierarchy declared outside the crate
#[derive(Debug)]
struct Expr {
    depth: u32,
}

#[derive(Debug)]
struct Binary {
    expr: Expr,
}

#[derive(Debug)]
struct Arith {
    binary: Binary,
}

#[derive(Debug)]
struct Add {
    arith: Arith,
    lhs: i64,
    rhs: i64,
}

#[derive(Debug)]
struct Compare {
    binary: Binary,
}

impl_rtti!(Expr);
impl_rtti!(Binary => expr);
impl_rtti!(Arith => binary);
impl_rtti!(Add => arith);
impl_rtti!(Compare => binary);

fn add() -> Add {
    Add {
        arith: Arith {
            binary: Binary {
                expr: Expr { depth: 3 },
            },
        },
        lhs: 2,
        rhs: 5,
    }
}

/// Casts across a downstream hierarchy follow the declared ancestry.
#[test]
fn test_downstream_hierarchy() {
    let value = add();
    let erased: &dyn Rtti = &value;

    assert!(is_a::<Add, _>(erased));
    assert!(is_a::<Arith, _>(erased));
    assert!(is_a::<Binary, _>(erased));
    assert_eq!(cast::<Expr, _>(erased).map(|e| e.depth), Some(3));
    assert!(cast::<Compare, _>(erased).is_none());
    assert!(checked_cast::<Compare, _>(erased).is_err());

    assert_ne!(TypeKey::of::<Add>(), TypeKey::of::<Compare>());
    assert_ne!(erased.type_key(), TypeKey::of::<Arith>());
}

/// Shared casts keep the original allocation alive for as long as the cast handle lives.
#[test]
fn test_shared_casts() {
    let shared: Arc<dyn Rtti> = Arc::new(add());

    let expr = cast_arc::<Expr>(&shared).unwrap();
    drop(shared);
    assert_eq!(expr.depth, 3);
    assert_eq!(expr.strong_count(), 1);

    let exact = downcast_arc::<Add>(expr.owner()).unwrap();
    assert_eq!(exact.lhs + exact.rhs, 7);
}

/// Container round trip, exact type tests and independent copies.
#[test]
fn test_value_container() -> Result<()> {
    let mut original = AnyValue::new(vec![String::from("a")]);
    assert!(original.is::<Vec<String>>());
    assert!(!original.is::<Vec<&str>>());

    let copy = original.try_clone()?;
    original.as_mut::<Vec<String>>()?.push(String::from("b"));

    assert_eq!(copy.as_ref::<Vec<String>>()?.len(), 1);
    assert_eq!(original.into_inner::<Vec<String>>()?, vec!["a", "b"]);

    let unique = AnyValue::new_unique(std::sync::Mutex::new(0_u32));
    assert!(matches!(unique.try_clone(), Err(Error::CloneUnsupported(_))));

    Ok(())
}
