#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use sf_geometry as geometry;
pub use sf_serial as serial;
