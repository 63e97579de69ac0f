use core::any::{Any, TypeId};
use core::fmt::Debug;

// ---------------------------------------------------------------- // Serializable

/// An object that can take part in graph serialization.
///
/// Implementors are registered in the [registry](crate::registry) under a
/// stable tag; the driver moves them around type-erased and recovers the
/// concrete type by downcasting. The easiest way to implement this trait is
/// [`impl_serializable!`](crate::impl_serializable), which also wires the
/// type into the [value model](crate::value) through its `Object` variant.
///
/// # Examples
///
/// ```
/// use sf_serial::{impl_serializable, Serializable};
///
/// #[derive(Debug, Default, Clone, PartialEq)]
/// struct Node {
///     label: String,
/// }
///
/// impl_serializable!(Node, "demo::Node");
///
/// let node: Box<dyn Serializable> = Box::new(Node::default());
/// assert_eq!(node.type_tag(), "demo::Node");
/// assert!(node.downcast_ref::<Node>().is_some());
/// ```
pub trait Serializable: Any + Send + Sync + Debug {
    /// The stable tag written into encoded records and used to find the
    /// factory on reconstruction. Conventionally the full type path.
    fn type_tag(&self) -> &'static str;

    /// The [`TypeId`] of the concrete implementor, readable through a trait
    /// object.
    #[inline]
    fn ty_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// Clone into a new boxed trait object.
    fn clone_serializable(&self) -> Box<dyn Serializable>;

    /// Type-erased equality: `false` whenever `other` is a different
    /// concrete type.
    fn eq_serializable(&self, other: &dyn Serializable) -> bool;

    #[inline]
    fn as_serializable(&self) -> &dyn Serializable
    where
        Self: Sized,
    {
        self
    }

    #[inline]
    fn into_serializable(self: Box<Self>) -> Box<dyn Serializable>
    where
        Self: Sized,
    {
        self
    }
}

impl dyn Serializable {
    /// Whether the underlying value is a `T`.
    #[inline]
    pub fn is<T: Serializable>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    /// Downcast a shared reference.
    #[inline]
    pub fn downcast_ref<T: Serializable>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    /// Downcast an exclusive reference.
    #[inline]
    pub fn downcast_mut<T: Serializable>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }
}

impl Clone for Box<dyn Serializable> {
    #[inline]
    fn clone(&self) -> Self {
        self.as_ref().clone_serializable()
    }
}

impl PartialEq for Box<dyn Serializable> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.as_ref().eq_serializable(other.as_ref())
    }
}

// ---------------------------------------------------------------- // impl_serializable

/// Implements [`Serializable`] plus the [`ToValue`](crate::value::ToValue) /
/// [`FromValue`](crate::value::FromValue) conversions for a
/// `Clone + PartialEq + Debug + 'static` type.
///
/// The second argument is the type's tag; it must be unique across the
/// registry and should be the full type path.
#[macro_export]
macro_rules! impl_serializable {
    ($ty:ty, $tag:expr) => {
        impl $crate::Serializable for $ty {
            #[inline]
            fn type_tag(&self) -> &'static str {
                $tag
            }

            fn clone_serializable(&self) -> ::std::boxed::Box<dyn $crate::Serializable> {
                ::std::boxed::Box::new(::core::clone::Clone::clone(self))
            }

            fn eq_serializable(&self, other: &dyn $crate::Serializable) -> bool {
                match other.downcast_ref::<$ty>() {
                    ::core::option::Option::Some(other) => self == other,
                    ::core::option::Option::None => false,
                }
            }
        }

        impl $crate::value::ToValue for $ty {
            fn to_value(&self) -> $crate::value::SerialValue {
                $crate::value::SerialValue::Object($crate::Serializable::clone_serializable(self))
            }
        }

        impl $crate::value::FromValue for $ty {
            fn from_value(
                value: $crate::value::SerialValue,
            ) -> ::core::result::Result<Self, $crate::error::DecodeError> {
                $crate::value::take_object::<$ty>(value, $tag)
            }
        }
    };
}
