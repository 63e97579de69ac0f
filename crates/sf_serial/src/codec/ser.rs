use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::codec::{keys, kind, Encoded, LeafScalar};

// ---------------------------------------------------------------- // Serialize

impl Serialize for LeafScalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::Str(v) => serializer.serialize_str(v),
        }
    }
}

/// Ordered `name -> value` entries rendered as a JSON object.
struct Entries<'a>(&'a [(String, Encoded)]);

impl Serialize for Entries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

fn tagged<S: Serializer>(
    serializer: S,
    tag: &str,
    payload_key: &'static str,
    payload: &impl Serialize,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(2))?;
    map.serialize_entry(keys::TYPE, tag)?;
    map.serialize_entry(payload_key, payload)?;
    map.end()
}

impl Serialize for Encoded {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::Str(v) => serializer.serialize_str(v),
            Self::Leaf { tag, values } => tagged(serializer, tag, keys::VALUE, values),
            Self::Object { tag, properties } => {
                tagged(serializer, tag, keys::PROPERTIES, &Entries(properties))
            }
            Self::Sequence(items) => tagged(serializer, kind::SEQUENCE, keys::ELEMENTS, items),
            Self::Set(items) => tagged(serializer, kind::SET, keys::ELEMENTS, items),
            Self::Mapping(entries) => {
                tagged(serializer, kind::MAPPING, keys::ENTRIES, &Entries(entries))
            }
            Self::FixedRecord(fields) => {
                tagged(serializer, kind::FIXED_RECORD, keys::FIELDS, &Entries(fields))
            }
            Self::OpenRecord(fields) => {
                tagged(serializer, kind::OPEN_RECORD, keys::FIELDS, &Entries(fields))
            }
        }
    }
}
