// ---------------------------------------------------------------- // Markers

/// Collection kind markers occupying the `"type"` slot of collection
/// records. Class tags may not collide with these.
pub(crate) mod kind {
    pub const SEQUENCE: &str = "sequence";
    pub const SET: &str = "set";
    pub const MAPPING: &str = "mapping";
    pub const FIXED_RECORD: &str = "fixed-record";
    pub const OPEN_RECORD: &str = "open-record";
}

/// The record keys of the encoded form.
pub(crate) mod keys {
    pub const TYPE: &str = "type";
    pub const VALUE: &str = "value";
    pub const PROPERTIES: &str = "properties";
    pub const ELEMENTS: &str = "elements";
    pub const ENTRIES: &str = "entries";
    pub const FIELDS: &str = "fields";
}

pub(crate) fn is_reserved_tag(tag: &str) -> bool {
    matches!(
        tag,
        kind::SEQUENCE | kind::SET | kind::MAPPING | kind::FIXED_RECORD | kind::OPEN_RECORD
    )
}

// ---------------------------------------------------------------- // Encoded

/// One scalar slot of a leaf tuple.
#[derive(Debug, Clone, PartialEq)]
pub enum LeafScalar {
    Int(i64),
    Float(f64),
    Str(String),
}

/// The wire-side tree.
///
/// Every non-scalar node is a JSON object whose first key is `"type"`: a
/// class tag for objects and leaves, or one of the reserved collection kind
/// markers. The second key carries the payload and is determined by the
/// node's kind, so the text is self-describing and parses without consulting
/// the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum Encoded {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// `{"type": tag, "value": [scalars...]}`
    Leaf { tag: String, values: Vec<LeafScalar> },
    /// `{"type": tag, "properties": {...}}`, in resolved property order.
    Object {
        tag: String,
        properties: Vec<(String, Encoded)>,
    },
    /// `{"type": "sequence", "elements": [...]}`
    Sequence(Vec<Encoded>),
    /// `{"type": "set", "elements": [...]}`
    Set(Vec<Encoded>),
    /// `{"type": "mapping", "entries": {...}}`
    Mapping(Vec<(String, Encoded)>),
    /// `{"type": "fixed-record", "fields": {...}}`
    FixedRecord(Vec<(String, Encoded)>),
    /// `{"type": "open-record", "fields": {...}}`
    OpenRecord(Vec<(String, Encoded)>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_tags() {
        assert!(is_reserved_tag("sequence"));
        assert!(is_reserved_tag("fixed-record"));
        assert!(!is_reserved_tag("sf_geometry::Point"));
    }
}
