use crate::codec::Encoded;
use crate::error::{DecodeError, SerializeError};
use crate::value::SerialValue;

// ---------------------------------------------------------------- // Encode

/// Encode sequence/set elements. Elements carrying the exclusion flag mean
/// "the owner rebuilds this one" and are dropped with no placeholder.
pub(crate) fn encode_elements(
    items: &[SerialValue],
    encode: &mut dyn FnMut(&SerialValue) -> Result<Encoded, SerializeError>,
) -> Result<Vec<Encoded>, SerializeError> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if matches!(item, SerialValue::Excluded(_)) {
            continue;
        }
        out.push(encode(item)?);
    }
    Ok(out)
}

/// Encode mapping/record entries, dropping entries whose value carries the
/// exclusion flag.
pub(crate) fn encode_entries(
    entries: &[(String, SerialValue)],
    encode: &mut dyn FnMut(&SerialValue) -> Result<Encoded, SerializeError>,
) -> Result<Vec<(String, Encoded)>, SerializeError> {
    let mut out = Vec::with_capacity(entries.len());
    for (name, value) in entries {
        if matches!(value, SerialValue::Excluded(_)) {
            continue;
        }
        out.push((name.clone(), encode(value)?));
    }
    Ok(out)
}

// ---------------------------------------------------------------- // Decode

pub(crate) fn decode_elements(
    items: Vec<Encoded>,
    decode: &mut dyn FnMut(Encoded) -> Result<SerialValue, DecodeError>,
) -> Result<Vec<SerialValue>, DecodeError> {
    items.into_iter().map(decode).collect()
}

pub(crate) fn decode_entries(
    entries: Vec<(String, Encoded)>,
    decode: &mut dyn FnMut(Encoded) -> Result<SerialValue, DecodeError>,
) -> Result<Vec<(String, SerialValue)>, DecodeError> {
    entries
        .into_iter()
        .map(|(name, value)| Ok((name, decode(value)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passthrough(value: &SerialValue) -> Result<Encoded, SerializeError> {
        match value {
            SerialValue::Int(v) => Ok(Encoded::Int(*v)),
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn excluded_elements_leave_no_placeholder() {
        let items = vec![
            SerialValue::Int(1),
            SerialValue::Excluded(Box::new(SerialValue::Int(2))),
            SerialValue::Int(3),
        ];
        let out = encode_elements(&items, &mut passthrough).unwrap();
        assert_eq!(out, vec![Encoded::Int(1), Encoded::Int(3)]);
    }

    #[test]
    fn excluded_entry_values_drop_the_entry() {
        let entries = vec![
            ("keep".to_owned(), SerialValue::Int(1)),
            (
                "drop".to_owned(),
                SerialValue::Excluded(Box::new(SerialValue::Int(2))),
            ),
        ];
        let out = encode_entries(&entries, &mut passthrough).unwrap();
        assert_eq!(out, vec![("keep".to_owned(), Encoded::Int(1))]);
    }
}
