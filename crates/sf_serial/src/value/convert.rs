use core::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::Hash;

use crate::error::DecodeError;
use crate::value::SerialValue;
use crate::Serializable;

// ---------------------------------------------------------------- // ToValue / FromValue

/// Lift a value into the [`SerialValue`] union.
///
/// Implemented for scalars, strings, `Option`, the standard collections and
/// every type run through [`impl_serializable!`](crate::impl_serializable)
/// or [`impl_record!`](crate::impl_record). Property getters registered with
/// the [builder](crate::registry::ClassSpec::builder) return any `ToValue`
/// type.
pub trait ToValue {
    fn to_value(&self) -> SerialValue;
}

/// Lower a [`SerialValue`] back into a concrete type.
///
/// The inverse seam of [`ToValue`]; fails with a
/// [`TypeMismatch`](DecodeError::TypeMismatch) when the value has the wrong
/// kind.
pub trait FromValue: Sized {
    fn from_value(value: SerialValue) -> Result<Self, DecodeError>;
}

impl ToValue for SerialValue {
    #[inline]
    fn to_value(&self) -> SerialValue {
        self.clone()
    }
}

impl FromValue for SerialValue {
    #[inline]
    fn from_value(value: SerialValue) -> Result<Self, DecodeError> {
        Ok(value)
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    #[inline]
    fn to_value(&self) -> SerialValue {
        (**self).to_value()
    }
}

// ---------------------------------------------------------------- // Scalars

macro_rules! impl_value_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToValue for $ty {
                #[inline]
                fn to_value(&self) -> SerialValue {
                    SerialValue::Int(i64::from(*self))
                }
            }

            impl FromValue for $ty {
                fn from_value(value: SerialValue) -> Result<Self, DecodeError> {
                    match value {
                        SerialValue::Int(v) => <$ty>::try_from(v)
                            .map_err(|_| DecodeError::mismatch(stringify!($ty), "out-of-range integer")),
                        other => Err(DecodeError::mismatch("integer", other.kind_name())),
                    }
                }
            }
        )*
    };
}

impl_value_int!(i8, i16, i32, i64, u8, u16, u32);

impl ToValue for bool {
    #[inline]
    fn to_value(&self) -> SerialValue {
        SerialValue::Bool(*self)
    }
}

impl FromValue for bool {
    fn from_value(value: SerialValue) -> Result<Self, DecodeError> {
        match value {
            SerialValue::Bool(v) => Ok(v),
            other => Err(DecodeError::mismatch("boolean", other.kind_name())),
        }
    }
}

impl ToValue for f64 {
    #[inline]
    fn to_value(&self) -> SerialValue {
        SerialValue::Float(*self)
    }
}

impl FromValue for f64 {
    fn from_value(value: SerialValue) -> Result<Self, DecodeError> {
        match value {
            SerialValue::Float(v) => Ok(v),
            // JSON renders 2.0 as `2.0` but an integral source stays
            // integral, so accept both.
            SerialValue::Int(v) => Ok(v as f64),
            other => Err(DecodeError::mismatch("float", other.kind_name())),
        }
    }
}

impl ToValue for f32 {
    #[inline]
    fn to_value(&self) -> SerialValue {
        SerialValue::Float(f64::from(*self))
    }
}

impl FromValue for f32 {
    fn from_value(value: SerialValue) -> Result<Self, DecodeError> {
        f64::from_value(value).map(|v| v as f32)
    }
}

impl ToValue for String {
    #[inline]
    fn to_value(&self) -> SerialValue {
        SerialValue::Str(self.clone())
    }
}

impl FromValue for String {
    fn from_value(value: SerialValue) -> Result<Self, DecodeError> {
        match value {
            SerialValue::Str(v) => Ok(v),
            other => Err(DecodeError::mismatch("string", other.kind_name())),
        }
    }
}

impl ToValue for str {
    #[inline]
    fn to_value(&self) -> SerialValue {
        SerialValue::Str(self.to_owned())
    }
}

impl ToValue for char {
    #[inline]
    fn to_value(&self) -> SerialValue {
        SerialValue::Str(self.to_string())
    }
}

impl FromValue for char {
    fn from_value(value: SerialValue) -> Result<Self, DecodeError> {
        match value {
            SerialValue::Str(v) => {
                let mut chars = v.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(DecodeError::mismatch("single-character string", v)),
                }
            }
            other => Err(DecodeError::mismatch("single-character string", other.kind_name())),
        }
    }
}

// ---------------------------------------------------------------- // Option

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> SerialValue {
        match self {
            Some(value) => value.to_value(),
            None => SerialValue::Null,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: SerialValue) -> Result<Self, DecodeError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}

// ---------------------------------------------------------------- // Objects

impl ToValue for dyn Serializable {
    #[inline]
    fn to_value(&self) -> SerialValue {
        SerialValue::Object(self.clone_serializable())
    }
}

impl ToValue for Box<dyn Serializable> {
    #[inline]
    fn to_value(&self) -> SerialValue {
        SerialValue::Object(self.clone())
    }
}

impl FromValue for Box<dyn Serializable> {
    fn from_value(value: SerialValue) -> Result<Self, DecodeError> {
        match value {
            SerialValue::Object(obj) => Ok(obj),
            other => Err(DecodeError::mismatch("object", other.kind_name())),
        }
    }
}

/// Unwrap an `Object` value into its concrete type.
///
/// `expected` names the wanted type in the mismatch error; callers generated
/// by `impl_serializable!` pass the type tag.
pub fn take_object<T: Serializable>(
    value: SerialValue,
    expected: &'static str,
) -> Result<T, DecodeError> {
    match value {
        SerialValue::Object(obj) => {
            let found = obj.type_tag();
            let any: Box<dyn Any> = obj;
            match any.downcast::<T>() {
                Ok(obj) => Ok(*obj),
                Err(_) => Err(DecodeError::mismatch(expected, found)),
            }
        }
        other => Err(DecodeError::mismatch(expected, other.kind_name())),
    }
}

// ---------------------------------------------------------------- // Sequences

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> SerialValue {
        SerialValue::Seq(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: SerialValue) -> Result<Self, DecodeError> {
        match value {
            SerialValue::Seq(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(DecodeError::mismatch("sequence", other.kind_name())),
        }
    }
}

impl<T: ToValue> ToValue for VecDeque<T> {
    fn to_value(&self) -> SerialValue {
        SerialValue::Seq(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: FromValue> FromValue for VecDeque<T> {
    fn from_value(value: SerialValue) -> Result<Self, DecodeError> {
        match value {
            SerialValue::Seq(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(DecodeError::mismatch("sequence", other.kind_name())),
        }
    }
}

// ---------------------------------------------------------------- // Sets

impl<T: ToValue> ToValue for HashSet<T> {
    fn to_value(&self) -> SerialValue {
        SerialValue::Set(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: FromValue + Eq + Hash> FromValue for HashSet<T> {
    fn from_value(value: SerialValue) -> Result<Self, DecodeError> {
        match value {
            SerialValue::Set(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(DecodeError::mismatch("set", other.kind_name())),
        }
    }
}

impl<T: ToValue> ToValue for BTreeSet<T> {
    fn to_value(&self) -> SerialValue {
        SerialValue::Set(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: FromValue + Ord> FromValue for BTreeSet<T> {
    fn from_value(value: SerialValue) -> Result<Self, DecodeError> {
        match value {
            SerialValue::Set(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(DecodeError::mismatch("set", other.kind_name())),
        }
    }
}

// ---------------------------------------------------------------- // Mappings

/// A type usable as a mapping key.
///
/// The encoded form keys every mapping by string, so keys must render to and
/// parse from a canonical string form.
pub trait MapKey: Sized {
    fn to_key(&self) -> String;
    fn from_key(key: &str) -> Result<Self, DecodeError>;
}

impl MapKey for String {
    #[inline]
    fn to_key(&self) -> String {
        self.clone()
    }

    #[inline]
    fn from_key(key: &str) -> Result<Self, DecodeError> {
        Ok(key.to_owned())
    }
}

macro_rules! impl_map_key_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl MapKey for $ty {
                #[inline]
                fn to_key(&self) -> String {
                    self.to_string()
                }

                fn from_key(key: &str) -> Result<Self, DecodeError> {
                    key.parse()
                        .map_err(|_| DecodeError::mismatch("integer map key", key.to_owned()))
                }
            }
        )*
    };
}

impl_map_key_int!(i32, i64, u32, u64, usize);

impl<K: MapKey, V: ToValue> ToValue for HashMap<K, V> {
    fn to_value(&self) -> SerialValue {
        let mut entries: Vec<(String, SerialValue)> = self
            .iter()
            .map(|(k, v)| (k.to_key(), v.to_value()))
            .collect();
        // hash order is not deterministic; the encoded form is
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        SerialValue::Map(entries)
    }
}

impl<K: MapKey + Eq + Hash, V: FromValue> FromValue for HashMap<K, V> {
    fn from_value(value: SerialValue) -> Result<Self, DecodeError> {
        match value {
            SerialValue::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| Ok((K::from_key(&k)?, V::from_value(v)?)))
                .collect(),
            other => Err(DecodeError::mismatch("mapping", other.kind_name())),
        }
    }
}

impl<K: MapKey, V: ToValue> ToValue for BTreeMap<K, V> {
    fn to_value(&self) -> SerialValue {
        let mut entries: Vec<(String, SerialValue)> = self
            .iter()
            .map(|(k, v)| (k.to_key(), v.to_value()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        SerialValue::Map(entries)
    }
}

impl<K: MapKey + Ord, V: FromValue> FromValue for BTreeMap<K, V> {
    fn from_value(value: SerialValue) -> Result<Self, DecodeError> {
        match value {
            SerialValue::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| Ok((K::from_key(&k)?, V::from_value(v)?)))
                .collect(),
            other => Err(DecodeError::mismatch("mapping", other.kind_name())),
        }
    }
}
