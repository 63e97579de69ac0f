use core::fmt;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;

use crate::codec::{keys, kind, Encoded, LeafScalar};

// ---------------------------------------------------------------- // LeafScalar

impl<'de> Deserialize<'de> for LeafScalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LeafScalarVisitor)
    }
}

struct LeafScalarVisitor;

impl<'de> Visitor<'de> for LeafScalarVisitor {
    type Value = LeafScalar;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a leaf scalar (integer, float or string)")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(LeafScalar::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v)
            .map(LeafScalar::Int)
            .map_err(|_| E::custom("leaf integer out of range"))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(LeafScalar::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(LeafScalar::Str(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(LeafScalar::Str(v))
    }
}

// ---------------------------------------------------------------- // Entries

/// A JSON object parsed into ordered `name -> value` entries.
struct Entries(Vec<(String, Encoded)>);

impl<'de> Deserialize<'de> for Entries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EntriesVisitor)
    }
}

struct EntriesVisitor;

impl<'de> Visitor<'de> for EntriesVisitor {
    type Value = Entries;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object of encoded values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(entry) = map.next_entry::<String, Encoded>()? {
            entries.push(entry);
        }
        Ok(Entries(entries))
    }
}

// ---------------------------------------------------------------- // Encoded

impl<'de> Deserialize<'de> for Encoded {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EncodedVisitor)
    }
}

struct EncodedVisitor;

impl<'de> Visitor<'de> for EncodedVisitor {
    type Value = Encoded;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an encoded value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Encoded::Null)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Encoded::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Encoded::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v)
            .map(Encoded::Int)
            .map_err(|_| E::custom("integer out of range"))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Encoded::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Encoded::Str(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Encoded::Str(v))
    }

    // Every array in the encoded form sits behind a payload key; a bare
    // array cannot be dispatched and is rejected.
    fn visit_seq<A: de::SeqAccess<'de>>(self, _seq: A) -> Result<Self::Value, A::Error> {
        Err(de::Error::custom("bare arrays are not part of the encoded form"))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        match map.next_key::<String>()? {
            Some(key) if key == keys::TYPE => {}
            Some(key) => {
                return Err(de::Error::custom(format!(
                    "expected `{}` as the first key, found `{key}`",
                    keys::TYPE
                )));
            }
            None => return Err(de::Error::missing_field(keys::TYPE)),
        }
        let tag: String = map.next_value()?;

        let encoded = match tag.as_str() {
            kind::SEQUENCE => {
                expect_key(&mut map, keys::ELEMENTS)?;
                Encoded::Sequence(map.next_value()?)
            }
            kind::SET => {
                expect_key(&mut map, keys::ELEMENTS)?;
                Encoded::Set(map.next_value()?)
            }
            kind::MAPPING => {
                expect_key(&mut map, keys::ENTRIES)?;
                Encoded::Mapping(map.next_value::<Entries>()?.0)
            }
            kind::FIXED_RECORD => {
                expect_key(&mut map, keys::FIELDS)?;
                Encoded::FixedRecord(map.next_value::<Entries>()?.0)
            }
            kind::OPEN_RECORD => {
                expect_key(&mut map, keys::FIELDS)?;
                Encoded::OpenRecord(map.next_value::<Entries>()?.0)
            }
            // A class tag: the payload key decides between a property
            // record and a leaf tuple.
            _ => match map.next_key::<String>()? {
                Some(key) if key == keys::PROPERTIES => Encoded::Object {
                    tag,
                    properties: map.next_value::<Entries>()?.0,
                },
                Some(key) if key == keys::VALUE => Encoded::Leaf {
                    tag,
                    values: map.next_value()?,
                },
                Some(key) => {
                    return Err(de::Error::custom(format!(
                        "expected `{}` or `{}` after tag `{tag}`, found `{key}`",
                        keys::PROPERTIES,
                        keys::VALUE
                    )));
                }
                None => {
                    return Err(de::Error::custom(format!("tag `{tag}` has no payload key")));
                }
            },
        };

        if map.next_key::<IgnoredAny>()?.is_some() {
            return Err(de::Error::custom("unexpected extra key in encoded record"));
        }
        Ok(encoded)
    }
}

fn expect_key<'de, A: MapAccess<'de>>(map: &mut A, expected: &'static str) -> Result<(), A::Error> {
    match map.next_key::<String>()? {
        Some(key) if key == expected => Ok(()),
        Some(key) => Err(de::Error::custom(format!(
            "expected key `{expected}`, found `{key}`"
        ))),
        None => Err(de::Error::missing_field(expected)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Encoded, serde_json::Error> {
        serde_json::from_str(text)
    }

    #[test]
    fn nested_document_parses() {
        let encoded = parse(
            r#"{"type":"sequence","elements":[{"type":"sf_geometry::Point","value":[10,90]},null]}"#,
        )
        .unwrap();
        assert_eq!(
            encoded,
            Encoded::Sequence(vec![
                Encoded::Leaf {
                    tag: "sf_geometry::Point".into(),
                    values: vec![LeafScalar::Int(10), LeafScalar::Int(90)],
                },
                Encoded::Null,
            ])
        );
    }

    #[test]
    fn object_properties_keep_document_order() {
        let encoded = parse(r#"{"type":"t::T","properties":{"b":2,"a":1}}"#).unwrap();
        match encoded {
            Encoded::Object { properties, .. } => {
                let names: Vec<_> = properties.iter().map(|(n, _)| n.as_str()).collect();
                assert_eq!(names, ["b", "a"]);
            }
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn rejects_bare_arrays() {
        assert!(parse("[1,2,3]").is_err());
    }

    #[test]
    fn rejects_misplaced_type_key() {
        assert!(parse(r#"{"properties":{},"type":"t::T"}"#).is_err());
    }

    #[test]
    fn rejects_extra_keys() {
        assert!(parse(r#"{"type":"sequence","elements":[],"more":1}"#).is_err());
    }

    #[test]
    fn rejects_wrong_payload_key() {
        assert!(parse(r#"{"type":"sequence","entries":{}}"#).is_err());
        assert!(parse(r#"{"type":"t::T","elements":[]}"#).is_err());
    }

    #[test]
    fn round_trips_through_text() {
        let encoded = Encoded::FixedRecord(vec![
            ("x".into(), Encoded::Float(1.5)),
            ("y".into(), Encoded::Str("s".into())),
        ]);
        let text = serde_json::to_string(&encoded).unwrap();
        assert_eq!(parse(&text).unwrap(), encoded);
    }
}
