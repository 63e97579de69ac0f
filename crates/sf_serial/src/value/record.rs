use std::collections::HashMap;

use crate::error::DecodeError;
use crate::value::{FromValue, SerialValue, ToValue};

// ---------------------------------------------------------------- // Record

/// A struct-shaped value with a fixed field list.
///
/// Field order is declaration order and survives the round trip. Decoding a
/// concrete type out of a `Record` fails with
/// [`MissingField`](DecodeError::MissingField) when a required field is
/// absent; use [`impl_record!`](crate::impl_record) to generate the
/// conversions for plain data structs.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Record {
    fields: Vec<(String, SerialValue)>,
}

impl Record {
    #[inline]
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub(crate) fn from_entries(fields: Vec<(String, SerialValue)>) -> Self {
        Self { fields }
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl ToValue) -> Self {
        self.insert(name, value.to_value());
        self
    }

    /// Insert a field, replacing any existing field of the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: SerialValue) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&SerialValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Remove and return a field, keeping the order of the others.
    pub fn take(&mut self, name: &str) -> Option<SerialValue> {
        let index = self.fields.iter().position(|(n, _)| n == name)?;
        Some(self.fields.remove(index).1)
    }

    /// [`take`](Self::take), but a missing field is a decode error.
    pub fn take_required(&mut self, name: &str) -> Result<SerialValue, DecodeError> {
        self.take(name).ok_or_else(|| DecodeError::MissingField {
            field: name.to_owned(),
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SerialValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub(crate) fn entries(&self) -> &[(String, SerialValue)] {
        &self.fields
    }
}

impl ToValue for Record {
    #[inline]
    fn to_value(&self) -> SerialValue {
        SerialValue::Record(self.clone())
    }
}

impl FromValue for Record {
    fn from_value(value: SerialValue) -> Result<Self, DecodeError> {
        match value {
            SerialValue::Record(record) => Ok(record),
            other => Err(DecodeError::mismatch("fixed record", other.kind_name())),
        }
    }
}

// ---------------------------------------------------------------- // OpenRecord

/// A struct-shaped value whose field list is not known ahead of time.
///
/// Keeps insertion order for encoding but compares order-insensitively, so
/// two open records with the same fields are equal however they were built.
#[derive(Debug, Default, Clone)]
pub struct OpenRecord {
    fields: Vec<(String, SerialValue)>,
    indices: HashMap<String, usize>,
}

impl OpenRecord {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
            indices: HashMap::with_capacity(capacity),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl ToValue) -> Self {
        self.insert(name, value.to_value());
        self
    }

    /// Insert a field, replacing any existing field of the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: SerialValue) {
        let name = name.into();
        match self.indices.get(&name) {
            Some(&index) => self.fields[index].1 = value,
            None => {
                self.indices.insert(name.clone(), self.fields.len());
                self.fields.push((name, value));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&SerialValue> {
        self.indices.get(name).map(|&index| &self.fields[index].1)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut SerialValue> {
        self.indices
            .get(name)
            .map(|&index| &mut self.fields[index].1)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SerialValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub(crate) fn entries(&self) -> &[(String, SerialValue)] {
        &self.fields
    }
}

impl PartialEq for OpenRecord {
    fn eq(&self, other: &Self) -> bool {
        self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .all(|(name, value)| other.get(name).is_some_and(|v| v == value))
    }
}

impl FromIterator<(String, SerialValue)> for OpenRecord {
    fn from_iter<I: IntoIterator<Item = (String, SerialValue)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

impl ToValue for OpenRecord {
    #[inline]
    fn to_value(&self) -> SerialValue {
        SerialValue::Bag(self.clone())
    }
}

impl FromValue for OpenRecord {
    fn from_value(value: SerialValue) -> Result<Self, DecodeError> {
        match value {
            SerialValue::Bag(record) => Ok(record),
            other => Err(DecodeError::mismatch("open record", other.kind_name())),
        }
    }
}

// ---------------------------------------------------------------- // impl_record

/// Implements [`ToValue`]/[`FromValue`] for a plain data struct through the
/// fixed-record shape.
///
/// Decoding requires every listed field to be present and fails with
/// [`MissingField`](crate::error::DecodeError::MissingField) otherwise.
///
/// # Examples
///
/// ```
/// use sf_serial::impl_record;
///
/// #[derive(Debug, Default, Clone, PartialEq)]
/// struct Margins {
///     top: i32,
///     bottom: i32,
/// }
///
/// impl_record!(Margins { top, bottom });
///
/// let text = sf_serial::serialize(&Margins { top: 4, bottom: 8 }).unwrap();
/// let back: Margins = sf_serial::deserialize(&text).unwrap();
/// assert_eq!(back.top, 4);
/// ```
#[macro_export]
macro_rules! impl_record {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl $crate::value::ToValue for $ty {
            fn to_value(&self) -> $crate::value::SerialValue {
                let mut record = $crate::value::Record::new();
                $(
                    record.insert(
                        ::core::stringify!($field),
                        $crate::value::ToValue::to_value(&self.$field),
                    );
                )+
                $crate::value::SerialValue::Record(record)
            }
        }

        impl $crate::value::FromValue for $ty {
            fn from_value(
                value: $crate::value::SerialValue,
            ) -> ::core::result::Result<Self, $crate::error::DecodeError> {
                let mut record =
                    <$crate::value::Record as $crate::value::FromValue>::from_value(value)?;
                Ok(Self {
                    $(
                        $field: $crate::value::FromValue::from_value(
                            record.take_required(::core::stringify!($field))?,
                        )?,
                    )+
                })
            }
        }
    };
}
