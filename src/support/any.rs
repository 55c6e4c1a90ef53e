//! Type-erased value container.
//!
//! [`AnyValue`] stores one value of any `'static` type behind a boxed holder. Every holder is a
//! [`ValueHolder<T>`] embedding the shared [`HolderBase`], so all holders answer to the common
//! ancestor while extraction requires the exact payload type.
//!
//! Holders answer identity queries through [`Holder`] itself rather than through
//! [`crate::rtti::Rtti`], which requires `Send + Sync`. Payloads such as `Rc<_>` or `Cell<_>`
//! can therefore be stored; the container is then confined to its thread like the payload.
//!
//! Deep copy is a capability bound at construction time: [`AnyValue::new`] records the clone
//! operation of a `Clone` payload, [`AnyValue::new_unique`] accepts any payload and records none.
//! Copying a container without the capability fails with [`Error::CloneUnsupported`].

use std::{any::Any, fmt};

use crate::{
    rtti::{Rtti, TypeKey},
    Error, Result,
};

/// Name reported for the stored type of an empty container.
const EMPTY: &str = "<empty>";

/// Common ancestor of all value holders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HolderBase;

impl_rtti!(HolderBase);

/// Behaviour of the boxed holder inside an [`AnyValue`].
///
/// The identity operations mirror [`Rtti`] without its thread-safety bound.
pub trait Holder: Any {
    /// Identity of the holder type.
    fn type_key(&self) -> TypeKey;

    /// Finds the part of the holder whose type has identity `tid`, the holder itself or its
    /// [`HolderBase`].
    fn as_type(&self, tid: TypeKey) -> Option<&dyn Any>;

    /// Mutable counterpart of [`Holder::as_type`].
    fn as_type_mut(&mut self, tid: TypeKey) -> Option<&mut dyn Any>;

    /// Deep copy of the holder and its payload.
    ///
    /// # Errors
    /// Returns [`Error::CloneUnsupported`] if the holder was created without a clone operation.
    fn clone_holder(&self) -> Result<Box<dyn Holder>>;

    /// Name of the payload type.
    fn value_type_name(&self) -> &'static str;

    /// Converts the boxed holder for use with [`Box::downcast`].
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// Holder of a payload of type `T`.
pub struct ValueHolder<T> {
    base: HolderBase,
    value: T,
    cloner: Option<fn(&T) -> T>,
}

impl<T> ValueHolder<T> {
    /// The payload.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Returns `true` if the holder can be deep-copied.
    #[must_use]
    pub fn is_cloneable(&self) -> bool {
        self.cloner.is_some()
    }
}

impl<T: 'static> Holder for ValueHolder<T> {
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<Self>()
    }

    fn as_type(&self, tid: TypeKey) -> Option<&dyn Any> {
        if tid == TypeKey::of::<Self>() {
            Some(self)
        } else {
            self.base.as_type(tid)
        }
    }

    fn as_type_mut(&mut self, tid: TypeKey) -> Option<&mut dyn Any> {
        if tid == TypeKey::of::<Self>() {
            Some(self)
        } else {
            self.base.as_type_mut(tid)
        }
    }

    fn clone_holder(&self) -> Result<Box<dyn Holder>> {
        let cloner = self
            .cloner
            .ok_or(Error::CloneUnsupported(std::any::type_name::<T>()))?;

        Ok(Box::new(ValueHolder {
            base: self.base,
            value: cloner(&self.value),
            cloner: self.cloner,
        }))
    }

    fn value_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// A container holding zero or one value of arbitrary type.
///
/// # Example
///
/// ```rust
/// use parsecore::support::AnyValue;
///
/// let mut value = AnyValue::new(String::from("ident"));
/// assert!(value.is::<String>());
/// assert!(!value.is::<&str>());
///
/// value.as_mut::<String>()?.push_str("ifier");
/// let copy = value.try_clone()?;
/// assert_eq!(copy.as_ref::<String>()?, "identifier");
/// # Ok::<(), parsecore::Error>(())
/// ```
#[derive(Default)]
pub struct AnyValue {
    holder: Option<Box<dyn Holder>>,
}

impl AnyValue {
    /// Wraps a cloneable `value`; the container supports [`AnyValue::try_clone`].
    pub fn new<T: Clone + 'static>(value: T) -> Self {
        AnyValue {
            holder: Some(Box::new(ValueHolder {
                base: HolderBase,
                value,
                cloner: Some(T::clone),
            })),
        }
    }

    /// Wraps `value` without a deep-copy capability.
    pub fn new_unique<T: 'static>(value: T) -> Self {
        AnyValue {
            holder: Some(Box::new(ValueHolder {
                base: HolderBase,
                value,
                cloner: None,
            })),
        }
    }

    /// Returns `true` if no value is stored.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.holder.is_none()
    }

    /// Returns `true` if a value is stored.
    #[must_use]
    pub fn is_not_null(&self) -> bool {
        self.holder.is_some()
    }

    /// Returns `true` if the stored value is exactly a `U`.
    #[must_use]
    pub fn is<U: 'static>(&self) -> bool {
        self.holder
            .as_ref()
            .is_some_and(|holder| holder.type_key() == TypeKey::of::<ValueHolder<U>>())
    }

    /// Name of the stored type, `None` when empty.
    #[must_use]
    pub fn type_name(&self) -> Option<&'static str> {
        self.holder.as_ref().map(|holder| holder.value_type_name())
    }

    /// The holder of the stored value.
    #[must_use]
    pub fn holder(&self) -> Option<&dyn Holder> {
        self.holder.as_deref()
    }

    /// Borrows the stored value as a `U`.
    ///
    /// # Errors
    /// Returns [`Error::TypeMismatch`] if the container is empty or holds another type.
    pub fn as_ref<U: 'static>(&self) -> Result<&U> {
        self.holder
            .as_deref()
            .and_then(cast_holder::<ValueHolder<U>>)
            .map(|holder| &holder.value)
            .ok_or_else(|| self.mismatch::<U>())
    }

    /// Mutably borrows the stored value as a `U`.
    ///
    /// # Errors
    /// Returns [`Error::TypeMismatch`] if the container is empty or holds another type.
    pub fn as_mut<U: 'static>(&mut self) -> Result<&mut U> {
        if !self.is::<U>() {
            return Err(self.mismatch::<U>());
        }

        self.holder
            .as_deref_mut()
            .and_then(cast_holder_mut::<ValueHolder<U>>)
            .map(|holder| &mut holder.value)
            .ok_or(Error::TypeMismatch {
                expected: std::any::type_name::<U>(),
                found: EMPTY,
            })
    }

    /// Moves the stored value out as a `U`.
    ///
    /// # Errors
    /// Returns [`Error::TypeMismatch`] if the container is empty or holds another type; the
    /// stored value is dropped in that case.
    pub fn into_inner<U: 'static>(self) -> Result<U> {
        if !self.is::<U>() {
            return Err(self.mismatch::<U>());
        }

        let mismatch = self.mismatch::<U>();
        self.holder
            .ok_or(mismatch)?
            .into_any()
            .downcast::<ValueHolder<U>>()
            .map(|holder| holder.value)
            .map_err(|_| Error::TypeMismatch {
                expected: std::any::type_name::<U>(),
                found: EMPTY,
            })
    }

    /// Deep copy of the container. An empty container copies to an empty container.
    ///
    /// # Errors
    /// Returns [`Error::CloneUnsupported`] if the value was stored without a clone operation.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(AnyValue {
            holder: self
                .holder
                .as_ref()
                .map(|holder| holder.clone_holder())
                .transpose()?,
        })
    }

    /// Moves the stored value into a new container, leaving this one empty.
    #[must_use]
    pub fn take(&mut self) -> Self {
        AnyValue {
            holder: self.holder.take(),
        }
    }

    /// Replaces the stored value with `value`.
    ///
    /// The previous holder is released after the new one is in place.
    pub fn set<T: Clone + 'static>(&mut self, value: T) {
        self.install(AnyValue::new(value));
    }

    /// Replaces the stored value with a deep copy of `other`'s.
    ///
    /// # Errors
    /// Returns [`Error::CloneUnsupported`] if `other` cannot be copied; `self` is unchanged then.
    pub fn assign_from(&mut self, other: &AnyValue) -> Result<()> {
        let copy = other.try_clone()?;
        self.install(copy);
        Ok(())
    }

    /// Replaces the stored value by moving out of `other`, leaving it empty.
    pub fn assign_take(&mut self, other: &mut AnyValue) {
        let moved = other.take();
        self.install(moved);
    }

    /// Returns `true` if both containers share the same holder (or are both empty).
    #[must_use]
    pub fn ptr_eq(&self, other: &AnyValue) -> bool {
        match (&self.holder, &other.holder) {
            (Some(a), Some(b)) => std::ptr::addr_eq(&**a, &**b),
            (None, None) => true,
            _ => false,
        }
    }

    fn install(&mut self, value: AnyValue) {
        let previous = std::mem::replace(&mut self.holder, value.holder);
        drop(previous);
    }

    fn mismatch<U>(&self) -> Error {
        Error::TypeMismatch {
            expected: std::any::type_name::<U>(),
            found: self.type_name().unwrap_or(EMPTY),
        }
    }
}

/// Casts `holder` to `T` if `T` is the holder type or [`HolderBase`].
pub fn cast_holder<T: Any>(holder: &dyn Holder) -> Option<&T> {
    holder.as_type(TypeKey::of::<T>())?.downcast_ref::<T>()
}

/// Mutable counterpart of [`cast_holder`].
pub fn cast_holder_mut<T: Any>(holder: &mut dyn Holder) -> Option<&mut T> {
    holder.as_type_mut(TypeKey::of::<T>())?.downcast_mut::<T>()
}

impl fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.type_name() {
            Some(name) => write!(f, "AnyValue({name})"),
            None => f.write_str("AnyValue(<empty>)"),
        }
    }
}
