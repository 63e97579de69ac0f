use crate::value::{OpenRecord, Record};
use crate::Serializable;

// ---------------------------------------------------------------- // SerialValue

/// The discriminated union every serializable value is lifted into before
/// encoding, and lowered out of after decoding.
///
/// Scalars map to themselves; registered objects travel type-erased in the
/// `Object` variant; the collection variants keep entry order (`Map` entries
/// are key-ordered by construction so output is deterministic).
///
/// `Excluded` wraps a collection element flagged by
/// [`Element::transient`](crate::value::Element::transient): the encoder
/// drops it from collection output entirely. The flag has no meaning outside
/// a collection slot; a top-level `Excluded` is encoded as its inner value.
#[derive(Debug)]
pub enum SerialValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A registered object, encoded as a tagged property record.
    Object(Box<dyn Serializable>),
    /// An ordered sequence.
    Seq(Vec<SerialValue>),
    /// String-keyed entries, key-ordered.
    Map(Vec<(String, SerialValue)>),
    /// An unordered collection; element order in the encoded text is
    /// whatever the source container yielded.
    Set(Vec<SerialValue>),
    /// A struct-shaped value with a fixed field list.
    Record(Record),
    /// A struct-shaped value with an open field list.
    Bag(OpenRecord),
    /// A collection element carrying the exclusion flag.
    Excluded(Box<SerialValue>),
}

impl SerialValue {
    /// A short noun for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Object(_) => "object",
            Self::Seq(_) => "sequence",
            Self::Map(_) => "mapping",
            Self::Set(_) => "set",
            Self::Record(_) => "fixed record",
            Self::Bag(_) => "open record",
            Self::Excluded(_) => "excluded element",
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the underlying object of an `Object` value.
    #[inline]
    pub fn as_object(&self) -> Option<&dyn Serializable> {
        match self {
            Self::Object(obj) => Some(obj.as_ref()),
            _ => None,
        }
    }
}

impl Clone for SerialValue {
    fn clone(&self) -> Self {
        match self {
            Self::Null => Self::Null,
            Self::Bool(v) => Self::Bool(*v),
            Self::Int(v) => Self::Int(*v),
            Self::Float(v) => Self::Float(*v),
            Self::Str(v) => Self::Str(v.clone()),
            Self::Object(obj) => Self::Object(obj.clone_serializable()),
            Self::Seq(items) => Self::Seq(items.clone()),
            Self::Map(entries) => Self::Map(entries.clone()),
            Self::Set(items) => Self::Set(items.clone()),
            Self::Record(record) => Self::Record(record.clone()),
            Self::Bag(bag) => Self::Bag(bag.clone()),
            Self::Excluded(inner) => Self::Excluded(inner.clone()),
        }
    }
}

impl PartialEq for SerialValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a.eq_serializable(b.as_ref()),
            (Self::Seq(a), Self::Seq(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Set(a), Self::Set(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a == b,
            (Self::Bag(a), Self::Bag(b)) => a == b,
            (Self::Excluded(a), Self::Excluded(b)) => a == b,
            _ => false,
        }
    }
}
