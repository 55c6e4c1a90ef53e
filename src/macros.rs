/// Declares the runtime type identity of a class in a polymorphic hierarchy.
///
/// The macro implements [`crate::rtti::Rtti`] for the given type. Three forms exist:
///
/// - `impl_rtti!(Root)` - the type starts a hierarchy and only answers for itself
/// - `impl_rtti!(Derived => base)` - lookups that miss `Derived` continue in the field `base`
/// - `impl_rtti!(Derived => first, second)` - two bases, tried in declaration order
///
/// Base classes are embedded as fields, so a successful ancestor cast hands out a reference to
/// the embedded base value.
///
/// ```rust
/// use parsecore::{impl_rtti, rtti};
///
/// struct Shape { sides: u32 }
/// struct Square { shape: Shape, edge: f32 }
///
/// impl_rtti!(Shape);
/// impl_rtti!(Square => shape);
///
/// let square = Square { shape: Shape { sides: 4 }, edge: 2.0 };
/// let shape: &Shape = rtti::cast(&square).unwrap();
/// assert_eq!(shape.sides, 4);
/// ```
#[macro_export]
macro_rules! impl_rtti {
    ($ty:ty) => {
        impl $crate::rtti::Rtti for $ty {
            fn type_key(&self) -> $crate::rtti::TypeKey {
                $crate::rtti::TypeKey::of::<Self>()
            }

            fn type_name(&self) -> &'static str {
                ::std::any::type_name::<Self>()
            }

            fn into_any_arc(
                self: ::std::sync::Arc<Self>,
            ) -> ::std::sync::Arc<dyn ::std::any::Any + Send + Sync> {
                self
            }

            fn as_type(&self, tid: $crate::rtti::TypeKey) -> Option<&dyn ::std::any::Any> {
                if tid == $crate::rtti::TypeKey::of::<Self>() {
                    Some(self)
                } else {
                    None
                }
            }

            fn as_type_mut(
                &mut self,
                tid: $crate::rtti::TypeKey,
            ) -> Option<&mut dyn ::std::any::Any> {
                if tid == $crate::rtti::TypeKey::of::<Self>() {
                    Some(self)
                } else {
                    None
                }
            }
        }
    };

    ($ty:ty => $base:ident) => {
        impl $crate::rtti::Rtti for $ty {
            fn type_key(&self) -> $crate::rtti::TypeKey {
                $crate::rtti::TypeKey::of::<Self>()
            }

            fn type_name(&self) -> &'static str {
                ::std::any::type_name::<Self>()
            }

            fn into_any_arc(
                self: ::std::sync::Arc<Self>,
            ) -> ::std::sync::Arc<dyn ::std::any::Any + Send + Sync> {
                self
            }

            fn as_type(&self, tid: $crate::rtti::TypeKey) -> Option<&dyn ::std::any::Any> {
                if tid == $crate::rtti::TypeKey::of::<Self>() {
                    Some(self)
                } else {
                    $crate::rtti::Rtti::as_type(&self.$base, tid)
                }
            }

            fn as_type_mut(
                &mut self,
                tid: $crate::rtti::TypeKey,
            ) -> Option<&mut dyn ::std::any::Any> {
                if tid == $crate::rtti::TypeKey::of::<Self>() {
                    Some(self)
                } else {
                    $crate::rtti::Rtti::as_type_mut(&mut self.$base, tid)
                }
            }
        }
    };

    ($ty:ty => $first:ident, $second:ident) => {
        impl $crate::rtti::Rtti for $ty {
            fn type_key(&self) -> $crate::rtti::TypeKey {
                $crate::rtti::TypeKey::of::<Self>()
            }

            fn type_name(&self) -> &'static str {
                ::std::any::type_name::<Self>()
            }

            fn into_any_arc(
                self: ::std::sync::Arc<Self>,
            ) -> ::std::sync::Arc<dyn ::std::any::Any + Send + Sync> {
                self
            }

            fn as_type(&self, tid: $crate::rtti::TypeKey) -> Option<&dyn ::std::any::Any> {
                if tid == $crate::rtti::TypeKey::of::<Self>() {
                    return Some(self);
                }

                $crate::rtti::Rtti::as_type(&self.$first, tid)
                    .or_else(|| $crate::rtti::Rtti::as_type(&self.$second, tid))
            }

            fn as_type_mut(
                &mut self,
                tid: $crate::rtti::TypeKey,
            ) -> Option<&mut dyn ::std::any::Any> {
                if tid == $crate::rtti::TypeKey::of::<Self>() {
                    return Some(self);
                }

                match $crate::rtti::Rtti::as_type_mut(&mut self.$first, tid) {
                    Some(found) => Some(found),
                    None => $crate::rtti::Rtti::as_type_mut(&mut self.$second, tid),
                }
            }
        }
    };
}

/// Declares a member of the exception taxonomy that extends an existing kind.
///
/// The generated struct embeds its parent kind, forwards the message accessor to it and
/// registers the parent as its single base for runtime type identity.
macro_rules! derived_exception {
    ($(#[$meta:meta])* $name:ident : $parent:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            base: $parent,
        }

        impl $name {
            /// Creates the exception with the given message.
            pub fn new(message: impl Into<String>) -> Self {
                Self {
                    base: $parent::new(message),
                }
            }

            /// Returns the embedded parent kind.
            #[must_use]
            pub fn base(&self) -> &$parent {
                &self.base
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new("")
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.message())
            }
        }

        impl Exception for $name {
            fn message(&self) -> &str {
                self.base.message()
            }
        }

        impl_rtti!($name => base);
    };
}
