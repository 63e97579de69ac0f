#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod colour;
mod point;
mod rect;
mod size;

pub use colour::Colour;
pub use point::{Point, RealPoint};
pub use rect::Rect;
pub use size::Size;
