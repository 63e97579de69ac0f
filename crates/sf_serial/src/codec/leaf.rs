use sf_geometry::{Colour, Point, RealPoint, Rect, Size};

use crate::codec::LeafScalar;
use crate::error::DecodeError;
use crate::registry::{ClassSpec, SerialRegistry};

// ---------------------------------------------------------------- // Tags

pub(crate) const POINT: &str = "sf_geometry::Point";
pub(crate) const REAL_POINT: &str = "sf_geometry::RealPoint";
pub(crate) const SIZE: &str = "sf_geometry::Size";
pub(crate) const RECT: &str = "sf_geometry::Rect";
pub(crate) const COLOUR: &str = "sf_geometry::Colour";

crate::impl_serializable!(Point, POINT);
crate::impl_serializable!(RealPoint, REAL_POINT);
crate::impl_serializable!(Size, SIZE);
crate::impl_serializable!(Rect, RECT);
crate::impl_serializable!(Colour, COLOUR);

/// Register the builtin geometry codecs. Tags are statically unique so this
/// bypasses the collision checks.
pub(crate) fn register_builtin(registry: &mut SerialRegistry) {
    registry.insert(ClassSpec::leaf::<Point>(POINT, encode_point, decode_point));
    registry.insert(ClassSpec::leaf::<RealPoint>(
        REAL_POINT,
        encode_real_point,
        decode_real_point,
    ));
    registry.insert(ClassSpec::leaf::<Size>(SIZE, encode_size, decode_size));
    registry.insert(ClassSpec::leaf::<Rect>(RECT, encode_rect, decode_rect));
    registry.insert(ClassSpec::leaf::<Colour>(COLOUR, encode_colour, decode_colour));
}

// ---------------------------------------------------------------- // Scalar helpers

fn coord(value: i64) -> Result<i32, DecodeError> {
    i32::try_from(value).map_err(|_| DecodeError::mismatch("32-bit coordinate", "out-of-range integer"))
}

fn channel(value: i64) -> Result<u8, DecodeError> {
    u8::try_from(value).map_err(|_| DecodeError::mismatch("colour channel in 0..=255", "out-of-range integer"))
}

fn real(value: &LeafScalar) -> Result<f64, DecodeError> {
    match value {
        LeafScalar::Float(v) => Ok(*v),
        LeafScalar::Int(v) => Ok(*v as f64),
        LeafScalar::Str(_) => Err(DecodeError::mismatch("real coordinate", "string")),
    }
}

fn arity(expected: &'static str, values: &[LeafScalar]) -> DecodeError {
    DecodeError::mismatch(expected, format!("{} leaf scalar(s)", values.len()))
}

// ---------------------------------------------------------------- // Codecs

fn encode_point(point: &Point) -> Vec<LeafScalar> {
    vec![
        LeafScalar::Int(i64::from(point.x)),
        LeafScalar::Int(i64::from(point.y)),
    ]
}

fn decode_point(values: &[LeafScalar]) -> Result<Point, DecodeError> {
    match values {
        [LeafScalar::Int(x), LeafScalar::Int(y)] => Ok(Point::new(coord(*x)?, coord(*y)?)),
        _ => Err(arity("point payload `[x, y]`", values)),
    }
}

fn encode_real_point(point: &RealPoint) -> Vec<LeafScalar> {
    vec![LeafScalar::Float(point.x), LeafScalar::Float(point.y)]
}

fn decode_real_point(values: &[LeafScalar]) -> Result<RealPoint, DecodeError> {
    match values {
        [x, y] => Ok(RealPoint::new(real(x)?, real(y)?)),
        _ => Err(arity("real point payload `[x, y]`", values)),
    }
}

fn encode_size(size: &Size) -> Vec<LeafScalar> {
    vec![
        LeafScalar::Int(i64::from(size.width)),
        LeafScalar::Int(i64::from(size.height)),
    ]
}

fn decode_size(values: &[LeafScalar]) -> Result<Size, DecodeError> {
    match values {
        [LeafScalar::Int(w), LeafScalar::Int(h)] => Ok(Size::new(coord(*w)?, coord(*h)?)),
        _ => Err(arity("size payload `[width, height]`", values)),
    }
}

fn encode_rect(rect: &Rect) -> Vec<LeafScalar> {
    vec![
        LeafScalar::Int(i64::from(rect.x)),
        LeafScalar::Int(i64::from(rect.y)),
        LeafScalar::Int(i64::from(rect.width)),
        LeafScalar::Int(i64::from(rect.height)),
    ]
}

fn decode_rect(values: &[LeafScalar]) -> Result<Rect, DecodeError> {
    match values {
        [LeafScalar::Int(x), LeafScalar::Int(y), LeafScalar::Int(w), LeafScalar::Int(h)] => {
            Ok(Rect::new(coord(*x)?, coord(*y)?, coord(*w)?, coord(*h)?))
        }
        _ => Err(arity("rect payload `[x, y, width, height]`", values)),
    }
}

fn encode_colour(colour: &Colour) -> Vec<LeafScalar> {
    vec![
        LeafScalar::Int(i64::from(colour.red)),
        LeafScalar::Int(i64::from(colour.green)),
        LeafScalar::Int(i64::from(colour.blue)),
        LeafScalar::Int(i64::from(colour.alpha)),
    ]
}

fn decode_colour(values: &[LeafScalar]) -> Result<Colour, DecodeError> {
    match values {
        [LeafScalar::Int(r), LeafScalar::Int(g), LeafScalar::Int(b), LeafScalar::Int(a)] => Ok(
            Colour::new(channel(*r)?, channel(*g)?, channel(*b)?, channel(*a)?),
        ),
        _ => Err(arity("colour payload `[r, g, b, a]`", values)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{deserialize, serialize};

    #[test]
    fn point_exact_text() {
        let text = serialize(&Point::new(10, 90)).unwrap();
        assert_eq!(text, r#"{"type":"sf_geometry::Point","value":[10,90]}"#);
        let back: Point = deserialize(&text).unwrap();
        assert_eq!(back, Point::new(10, 90));
    }

    #[test]
    fn real_point_keeps_precision() {
        let source = RealPoint::new(10.25, -0.5);
        let back: RealPoint = deserialize(&serialize(&source).unwrap()).unwrap();
        assert_eq!(back, source);
    }

    #[test]
    fn size_and_rect_round_trip() {
        let size = Size::new(100, 50);
        let back: Size = deserialize(&serialize(&size).unwrap()).unwrap();
        assert_eq!(back, size);

        let rect = Rect::new(-5, 4, 30, 20);
        let back: Rect = deserialize(&serialize(&rect).unwrap()).unwrap();
        assert_eq!(back, rect);
    }

    #[test]
    fn named_colour_round_trip() {
        let red = Colour::named("red").unwrap();
        let text = serialize(&red).unwrap();
        assert_eq!(text, r#"{"type":"sf_geometry::Colour","value":[255,0,0,255]}"#);
        let back: Colour = deserialize(&text).unwrap();
        assert_eq!(back, red);
    }

    #[test]
    fn colour_channels_are_range_checked() {
        let text = r#"{"type":"sf_geometry::Colour","value":[300,0,0,255]}"#;
        assert!(deserialize::<Colour>(text).is_err());
    }

    #[test]
    fn leaf_arity_is_checked() {
        let text = r#"{"type":"sf_geometry::Point","value":[10]}"#;
        assert!(deserialize::<Point>(text).is_err());
    }
}
