#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod codec;
pub mod error;
pub mod registry;
pub mod value;

mod driver;
mod serializable;

pub use driver::{deserialize, deserialize_object, deserialize_value, serialize};
pub use serializable::Serializable;

/// Not public API. Re-exports used by the macros of this crate.
#[cfg(feature = "auto_register")]
#[doc(hidden)]
pub mod __macro_exports {
    pub use inventory;
}
