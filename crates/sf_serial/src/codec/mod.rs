//! The wire codec.
//!
//! [`Encoded`] is the tree actually rendered to and parsed from JSON; the
//! driver converts between it and the live [value
//! model](crate::value). `ser`/`de` carry the hand-written serde impls,
//! `leaf` the scalar-tuple codecs for the geometry types, and `collection`
//! the shared element/entry walkers that honor the exclusion flag.

mod collection;
mod de;
mod encoded;
mod ser;

pub(crate) mod leaf;

pub use encoded::{Encoded, LeafScalar};

pub(crate) use collection::{decode_elements, decode_entries, encode_elements, encode_entries};
pub(crate) use encoded::{is_reserved_tag, keys, kind};
