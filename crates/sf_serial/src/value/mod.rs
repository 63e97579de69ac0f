//! The in-memory value model.
//!
//! Every property read during serialization is first lifted into a
//! [`SerialValue`], the discriminated union the driver actually walks.
//! [`ToValue`]/[`FromValue`] are the conversion seams between user types and
//! that union; [`Record`]/[`OpenRecord`] model struct-shaped values and
//! [`Element`] is the collection slot carrying the per-element exclusion
//! flag.

mod convert;
mod element;
mod record;
mod value;

pub use convert::{take_object, FromValue, MapKey, ToValue};
pub use element::Element;
pub use record::{OpenRecord, Record};
pub use value::SerialValue;
