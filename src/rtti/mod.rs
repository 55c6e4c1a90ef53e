//! Lightweight runtime type identity and safe downcasting.
//!
//! Generated parsers work with deep polymorphic hierarchies (parse-tree nodes, exception kinds,
//! holder types of the value container) and need to ask "is this value an X, and if so give me
//! the X" cheaply and without a reflection facility. This module provides that question as a
//! trait with two virtual operations:
//!
//! - [`Rtti::type_key`] - the exact identity of the dynamic type
//! - [`Rtti::as_type`] - returns the value itself when the requested identity matches, and
//!   otherwise delegates to the embedded base value(s)
//!
//! Identity is the native [`std::any::TypeId`] wrapped in [`TypeKey`]; it is stable for the
//! lifetime of the process and distinct for every type, regardless of simple names. Ancestry is
//! expressed by embedding the base as a field and naming it in [`crate::impl_rtti!`]. The cost
//! of a cast is bounded by the depth of the hierarchy.
//!
//! # Key Components
//!
//! - [`Rtti`] - The identity trait implemented by every participating type
//! - [`cast`], [`cast_mut`], [`checked_cast`], [`is_a`] - Borrowing casts
//! - [`cast_arc`] / [`RcCast`] - Ownership-preserving ancestor cast for `Arc` handles
//! - [`downcast_arc`] - Exact-type cast of an `Arc` handle
//!
//! # Example
//!
//! ```rust
//! use parsecore::{impl_rtti, rtti};
//!
//! struct Node { id: u32 }
//! struct Leaf { node: Node }
//! struct Branch { node: Node }
//!
//! impl_rtti!(Node);
//! impl_rtti!(Leaf => node);
//! impl_rtti!(Branch => node);
//!
//! let leaf = Leaf { node: Node { id: 7 } };
//! assert_eq!(rtti::cast::<Node, _>(&leaf).map(|n| n.id), Some(7));
//! assert!(rtti::cast::<Branch, _>(&leaf).is_none());
//! ```

use std::{
    any::{Any, TypeId},
    fmt,
    ops::Deref,
    sync::Arc,
};

use ouroboros::self_referencing;

use crate::{Error, Result};

/// Identity of a type participating in runtime type identification.
///
/// Two keys are equal exactly when they were produced for the same type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(TypeId);

impl TypeKey {
    /// Returns the key of `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        TypeKey(TypeId::of::<T>())
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({:?})", self.0)
    }
}

/// Runtime type identity of a polymorphic value.
///
/// Implement it through [`crate::impl_rtti!`] rather than by hand; the macro keeps
/// [`Rtti::as_type`] and [`Rtti::as_type_mut`] consistent with the declared ancestry.
///
/// Implementors are `Send + Sync` so that fully built trees and automata can be inspected from
/// several threads at once.
pub trait Rtti: Any + Send + Sync {
    /// Identity of the dynamic type.
    fn type_key(&self) -> TypeKey;

    /// Fully qualified name of the dynamic type, for diagnostics.
    fn type_name(&self) -> &'static str;

    /// Finds the part of `self` whose type has identity `tid`.
    ///
    /// Returns `self` when `tid` is the own identity, otherwise the result of asking the embedded
    /// base value(s), or `None` if no type in the ancestry chain matches.
    fn as_type(&self, tid: TypeKey) -> Option<&dyn Any>;

    /// Mutable counterpart of [`Rtti::as_type`].
    fn as_type_mut(&mut self, tid: TypeKey) -> Option<&mut dyn Any>;

    /// Converts a shared handle into one usable with [`Arc::downcast`].
    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// Casts `value` to `T` if `T` is its dynamic type or one of its ancestors.
///
/// # Arguments
/// * `value` - Any participating value, sized or a trait object
///
/// # Returns
/// `Some(&T)` pointing into `value`, or `None` when `T` is not in the ancestry chain
pub fn cast<T: Rtti, R: Rtti + ?Sized>(value: &R) -> Option<&T> {
    value.as_type(TypeKey::of::<T>())?.downcast_ref::<T>()
}

/// Mutable counterpart of [`cast`].
pub fn cast_mut<T: Rtti, R: Rtti + ?Sized>(value: &mut R) -> Option<&mut T> {
    value.as_type_mut(TypeKey::of::<T>())?.downcast_mut::<T>()
}

/// Returns `true` if `T` is the dynamic type of `value` or one of its ancestors.
pub fn is_a<T: Rtti, R: Rtti + ?Sized>(value: &R) -> bool {
    value.as_type(TypeKey::of::<T>()).is_some()
}

/// Like [`cast`], but reports a failed cast as an error.
///
/// # Errors
/// Returns [`Error::TypeMismatch`] naming both types if `T` is not in the ancestry chain.
pub fn checked_cast<T: Rtti, R: Rtti + ?Sized>(value: &R) -> Result<&T> {
    cast::<T, R>(value).ok_or(Error::TypeMismatch {
        expected: std::any::type_name::<T>(),
        found: value.type_name(),
    })
}

/// A shared handle to the `T` part of a value owned by an `Arc`.
///
/// Produced by [`cast_arc`]. The handle keeps the original allocation alive, so its lifetime is
/// exactly that of the handle it was cast from; dereferencing yields the `T` found by the cast.
#[self_referencing]
pub struct RcCast<T: Rtti> {
    owner: Arc<dyn Rtti>,
    #[borrows(owner)]
    target: &'this T,
}

impl<T: Rtti> RcCast<T> {
    /// The handle this cast was taken from.
    #[must_use]
    pub fn owner(&self) -> &Arc<dyn Rtti> {
        self.borrow_owner()
    }

    /// Number of strong references to the shared allocation.
    #[must_use]
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(self.borrow_owner())
    }
}

impl<T: Rtti> Deref for RcCast<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.borrow_target()
    }
}

impl<T: Rtti + fmt::Debug> fmt::Debug for RcCast<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RcCast").field(&**self).finish()
    }
}

/// Ownership-preserving cast of a shared handle.
///
/// On success the returned [`RcCast`] shares the allocation of `value` (the strong count grows
/// by one). On failure `None` is returned and `value` is left untouched.
pub fn cast_arc<T: Rtti>(value: &Arc<dyn Rtti>) -> Option<RcCast<T>> {
    RcCast::try_new(Arc::clone(value), |owner| {
        cast::<T, dyn Rtti>(&**owner).ok_or(())
    })
    .ok()
}

/// Exact-type cast of a shared handle.
///
/// Unlike [`cast_arc`] this only succeeds when `T` is the dynamic type itself, and in exchange
/// yields a plain `Arc<T>` sharing the allocation of `value`. A failed cast returns `None` and
/// leaves `value` untouched.
pub fn downcast_arc<T: Rtti>(value: &Arc<dyn Rtti>) -> Option<Arc<T>> {
    if value.type_key() != TypeKey::of::<T>() {
        return None;
    }

    Arc::clone(value).into_any_arc().downcast::<T>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Shape -> Polygon -> Quad -> Square, with Triangle and Circle as siblings
    #[derive(Debug, Default)]
    struct Shape {
        name: &'static str,
    }

    #[derive(Debug, Default)]
    struct Polygon {
        shape: Shape,
        corners: u32,
    }

    #[derive(Debug, Default)]
    struct Quad {
        polygon: Polygon,
    }

    #[derive(Debug, Default)]
    struct Square {
        quad: Quad,
        edge: u32,
    }

    #[derive(Debug, Default)]
    struct Triangle {
        polygon: Polygon,
    }

    #[derive(Debug, Default)]
    struct Circle {
        shape: Shape,
    }

    #[derive(Debug, Default)]
    struct Labeled {
        text: String,
    }

    #[derive(Debug, Default)]
    struct LabeledSquare {
        square: Square,
        label: Labeled,
    }

    impl_rtti!(Shape);
    impl_rtti!(Polygon => shape);
    impl_rtti!(Quad => polygon);
    impl_rtti!(Square => quad);
    impl_rtti!(Triangle => polygon);
    impl_rtti!(Circle => shape);
    impl_rtti!(Labeled);
    impl_rtti!(LabeledSquare => square, label);

    fn square() -> Square {
        Square {
            quad: Quad {
                polygon: Polygon {
                    shape: Shape { name: "square" },
                    corners: 4,
                },
            },
            edge: 3,
        }
    }

    #[test]
    fn keys_are_distinct() {
        let keys = [
            TypeKey::of::<Shape>(),
            TypeKey::of::<Polygon>(),
            TypeKey::of::<Quad>(),
            TypeKey::of::<Square>(),
            TypeKey::of::<Triangle>(),
            TypeKey::of::<Circle>(),
            TypeKey::of::<Labeled>(),
            TypeKey::of::<LabeledSquare>(),
        ];

        for (i, a) in keys.iter().enumerate() {
            for b in keys.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    // Two classes named `Node`, one under `Shape` and one under `Labeled`
    mod geometry {
        use super::Shape;

        #[derive(Debug, Default)]
        pub(super) struct Node {
            pub(super) shape: Shape,
        }

        impl_rtti!(Node => shape);
    }

    mod text {
        use super::Labeled;

        #[derive(Debug, Default)]
        pub(super) struct Node {
            pub(super) label: Labeled,
        }

        impl_rtti!(Node => label);
    }

    #[test]
    fn same_simple_name_does_not_collide() {
        assert_ne!(
            TypeKey::of::<geometry::Node>(),
            TypeKey::of::<text::Node>()
        );

        let shape_node = geometry::Node::default();
        let text_node = text::Node::default();
        assert!(cast::<text::Node, _>(&shape_node).is_none());
        assert!(cast::<geometry::Node, _>(&text_node).is_none());
        assert!(is_a::<Shape, _>(&shape_node));
        assert!(!is_a::<Labeled, _>(&shape_node));
        assert!(is_a::<Labeled, _>(&text_node));
        assert_ne!(shape_node.type_name(), text_node.type_name());
    }

    #[test]
    fn own_key() {
        let value = square();
        assert_eq!(value.type_key(), TypeKey::of::<Square>());
        assert!(value.type_name().ends_with("Square"));
    }

    #[test]
    fn exact_cast() {
        let value = square();
        let same: &Square = cast(&value).unwrap();
        assert_eq!(same.edge, 3);
    }

    #[test]
    fn ancestor_casts() {
        let value = square();
        assert_eq!(cast::<Quad, _>(&value).unwrap().polygon.corners, 4);
        assert_eq!(cast::<Polygon, _>(&value).unwrap().corners, 4);
        assert_eq!(cast::<Shape, _>(&value).unwrap().name, "square");
    }

    #[test]
    fn sibling_casts_fail() {
        let value = square();
        assert!(cast::<Triangle, _>(&value).is_none());
        assert!(cast::<Circle, _>(&value).is_none());
        assert!(!is_a::<Labeled, _>(&value));

        let circle = Circle::default();
        assert!(cast::<Polygon, _>(&circle).is_none());
        assert!(is_a::<Shape, _>(&circle));
    }

    #[test]
    fn descendant_cast_fails() {
        let polygon = Polygon::default();
        assert!(cast::<Square, _>(&polygon).is_none());
    }

    #[test]
    fn trait_object_cast() {
        let boxed: Box<dyn Rtti> = Box::new(square());
        assert!(is_a::<Quad, _>(boxed.as_ref()));
        assert!(cast::<Circle, _>(boxed.as_ref()).is_none());
    }

    #[test]
    fn two_bases() {
        let mut value = LabeledSquare {
            square: square(),
            label: Labeled {
                text: "north".into(),
            },
        };

        assert_eq!(cast::<Labeled, _>(&value).unwrap().text, "north");
        assert_eq!(cast::<Shape, _>(&value).unwrap().name, "square");
        assert!(cast::<Triangle, _>(&value).is_none());

        cast_mut::<Labeled, _>(&mut value).unwrap().text.push_str("-east");
        cast_mut::<Polygon, _>(&mut value).unwrap().corners = 5;
        assert_eq!(value.label.text, "north-east");
        assert_eq!(value.square.quad.polygon.corners, 5);
    }

    #[test]
    fn checked_cast_reports_types() {
        let value = Circle::default();
        match checked_cast::<Square, _>(&value) {
            Err(Error::TypeMismatch { expected, found }) => {
                assert!(expected.ends_with("Square"));
                assert!(found.ends_with("Circle"));
            }
            other => panic!("unexpected result: {:?}", other.map(|s| s.edge)),
        }
    }

    #[test]
    fn arc_cast_shares_lifetime() {
        let handle: Arc<dyn Rtti> = Arc::new(square());
        assert_eq!(Arc::strong_count(&handle), 1);

        let polygon = cast_arc::<Polygon>(&handle).unwrap();
        assert_eq!(polygon.corners, 4);
        assert_eq!(Arc::strong_count(&handle), 2);
        assert!(Arc::ptr_eq(polygon.owner(), &handle));

        drop(polygon);
        assert_eq!(Arc::strong_count(&handle), 1);
    }

    #[test]
    fn arc_cast_failure_leaves_original() {
        let handle: Arc<dyn Rtti> = Arc::new(square());
        assert!(cast_arc::<Circle>(&handle).is_none());
        assert_eq!(Arc::strong_count(&handle), 1);
        assert!(is_a::<Square, _>(handle.as_ref()));
    }

    #[test]
    fn arc_downcast_exact() {
        let handle: Arc<dyn Rtti> = Arc::new(square());
        assert!(downcast_arc::<Quad>(&handle).is_none());
        assert_eq!(Arc::strong_count(&handle), 1);

        let exact = downcast_arc::<Square>(&handle).unwrap();
        assert_eq!(exact.edge, 3);
        assert_eq!(Arc::strong_count(&handle), 2);
    }
}
