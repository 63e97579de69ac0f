use core::hash::{Hash, Hasher};

use crate::error::DecodeError;
use crate::value::{FromValue, SerialValue, ToValue};

// ---------------------------------------------------------------- // Element

/// A collection slot with a per-element exclusion flag.
///
/// Owners that rebuild part of a collection in their constructor store those
/// items as [`transient`](Self::transient): the encoder drops them from the
/// collection output entirely, with no placeholder, and decoding produces
/// only the persistent items. Equality and hashing look through the flag so
/// a reconstructed collection compares equal to its source.
///
/// # Examples
///
/// ```
/// use sf_serial::value::Element;
///
/// let kept = Element::new(1);
/// let dropped = Element::transient(1);
/// assert_eq!(kept, dropped);
/// assert!(dropped.is_transient());
/// ```
#[derive(Debug, Clone)]
pub struct Element<T> {
    value: T,
    transient: bool,
}

impl<T> Element<T> {
    /// A persistent element; serialized normally.
    #[inline]
    pub const fn new(value: T) -> Self {
        Self {
            value,
            transient: false,
        }
    }

    /// An element the owner reconstructs itself; skipped by the encoder.
    #[inline]
    pub const fn transient(value: T) -> Self {
        Self {
            value,
            transient: true,
        }
    }

    #[inline]
    pub const fn is_transient(&self) -> bool {
        self.transient
    }

    #[inline]
    pub const fn get(&self) -> &T {
        &self.value
    }

    #[inline]
    pub const fn get_mut(&mut self) -> &mut T {
        &mut self.value
    }

    #[inline]
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> From<T> for Element<T> {
    #[inline]
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: PartialEq> PartialEq for Element<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Eq> Eq for Element<T> {}

impl<T: Hash> Hash for Element<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T: ToValue> ToValue for Element<T> {
    fn to_value(&self) -> SerialValue {
        let value = self.value.to_value();
        if self.transient {
            SerialValue::Excluded(Box::new(value))
        } else {
            value
        }
    }
}

impl<T: FromValue> FromValue for Element<T> {
    fn from_value(value: SerialValue) -> Result<Self, DecodeError> {
        match value {
            SerialValue::Excluded(inner) => T::from_value(*inner).map(Self::transient),
            value => T::from_value(value).map(Self::new),
        }
    }
}
