//! Expansion of shorthand declarations into their longhands.

use serde::Serialize;

use super::reader::StylePropertyReader;
use super::{Color, Length};
use crate::sheet::{StyleValueKeyword, StyleValueType};

/// Four values, one per edge (or per corner for `border-radius`, clockwise
/// from the top-left corner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BoxArea<T> {
    /// Top edge, or top-left corner.
    pub top: T,
    /// Right edge, or top-right corner.
    pub right: T,
    /// Bottom edge, or bottom-right corner.
    pub bottom: T,
    /// Left edge, or bottom-left corner.
    pub left: T,
}

impl<T: Copy> BoxArea<T> {
    /// The same value on every edge.
    pub const fn all(value: T) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

/// Spread up to four values over the edges of a box.
///
/// | values | top | right | bottom | left |
/// |---|---|---|---|---|
/// | 0 | zero | zero | zero | zero |
/// | 1 | v0 | v0 | v0 | v0 |
/// | 2 | v0 | v1 | v0 | v1 |
/// | 3 | v0 | v1 | v2 | v1 |
/// | 4 | v0 | v1 | v2 | v3 |
///
/// Values past the fourth are ignored.
pub fn expand_box<T: Copy>(values: &[T], zero: T) -> BoxArea<T> {
    match *values {
        [] => BoxArea::all(zero),
        [v] => BoxArea::all(v),
        [v, h] => BoxArea {
            top: v,
            right: h,
            bottom: v,
            left: h,
        },
        [top, h, bottom] => BoxArea {
            top,
            right: h,
            bottom,
            left: h,
        },
        [top, right, bottom, left, ..] => BoxArea {
            top,
            right,
            bottom,
            left,
        },
    }
}

fn read_each<T>(reader: &StylePropertyReader<'_, '_>, read: impl Fn(usize) -> T) -> Vec<T> {
    (0..reader.value_count()).map(read).collect()
}

/// `margin` and `padding`.
#[must_use]
pub fn compile_box_lengths(reader: &StylePropertyReader<'_, '_>) -> BoxArea<Length> {
    expand_box(&read_each(reader, |i| reader.read_length(i)), Length::ZERO)
}

/// `border-width`.
#[must_use]
pub fn compile_box_floats(reader: &StylePropertyReader<'_, '_>) -> BoxArea<f32> {
    expand_box(&read_each(reader, |i| reader.read_float(i)), 0.0)
}

/// `border-color`.
#[must_use]
pub fn compile_box_colors(reader: &StylePropertyReader<'_, '_>) -> BoxArea<Color> {
    expand_box(&read_each(reader, |i| reader.read_color(i)), Color::TRANSPARENT)
}

/// `border-radius`: like [`compile_box_lengths`], with `auto` and `none`
/// read as zero.
#[must_use]
pub fn compile_border_radius(reader: &StylePropertyReader<'_, '_>) -> BoxArea<Length> {
    let radii = read_each(reader, |i| match reader.read_length(i) {
        Length::Auto | Length::None => Length::ZERO,
        length => length,
    });
    expand_box(&radii, Length::ZERO)
}

/// The longhands of `flex`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Flex {
    /// `flex-grow`.
    pub grow: f32,
    /// `flex-shrink`.
    pub shrink: f32,
    /// `flex-basis`.
    pub basis: Length,
}

/// `flex`.
///
/// - `none` is `0 0 auto`, `auto` is `1 1 auto`.
/// - Otherwise up to three values: a grow number optionally followed by a
///   shrink number, and a basis. The basis may come first; once the grow
///   number has been read it must be the last value.
/// - Omitted parts default to grow 0, shrink 1 and basis `auto`.
///
/// Returns `None` for any other arrangement.
#[must_use]
pub fn compile_flex(reader: &StylePropertyReader<'_, '_>) -> Option<Flex> {
    let count = reader.value_count();
    if count == 1 {
        match reader.keyword(0) {
            Some(StyleValueKeyword::None) => {
                return Some(Flex {
                    grow: 0.0,
                    shrink: 0.0,
                    basis: Length::Auto,
                });
            }
            Some(StyleValueKeyword::Auto) => {
                return Some(Flex {
                    grow: 1.0,
                    shrink: 1.0,
                    basis: Length::Auto,
                });
            }
            _ => {}
        }
    }
    if count == 0 || count > 3 {
        return None;
    }

    let mut flex = Flex {
        grow: 0.0,
        shrink: 1.0,
        basis: Length::Auto,
    };
    let mut grow_found = false;
    let mut basis_found = false;
    let mut i = 0;
    while i < count {
        let is_last = i == count - 1;
        match reader.value_type(i) {
            Some(StyleValueType::Dimension | StyleValueType::Keyword) if !basis_found => {
                if grow_found && !is_last {
                    return None;
                }
                if reader.keyword(i).is_some_and(|k| k != StyleValueKeyword::Auto) {
                    return None;
                }
                flex.basis = reader.read_length(i);
                basis_found = true;
            }
            Some(StyleValueType::Float) if !grow_found => {
                flex.grow = reader.read_float(i);
                grow_found = true;
                if reader.value_type(i + 1) == Some(StyleValueType::Float) {
                    i += 1;
                    flex.shrink = reader.read_float(i);
                }
            }
            // a unitless basis such as the `0` in `1 1 0`
            Some(StyleValueType::Float) if !basis_found && is_last => {
                flex.basis = reader.read_length(i);
                basis_found = true;
            }
            _ => return None,
        }
        i += 1;
    }
    Some(flex)
}

/// `-unity-text-outline`: a width and a color, in either order. Omitted
/// parts are zero and transparent.
#[must_use]
pub fn compile_text_outline(reader: &StylePropertyReader<'_, '_>) -> (f32, Color) {
    let mut width = 0.0;
    let mut color = Color::TRANSPARENT;
    for i in 0..reader.value_count() {
        if reader.is_color(i) {
            color = reader.read_color(i);
        } else {
            width = reader.read_float(i);
        }
    }
    (width, color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_box_table() {
        assert_eq!(expand_box::<u8>(&[], 0), BoxArea::all(0));
        assert_eq!(expand_box(&[1], 0), BoxArea::all(1));
        assert_eq!(
            expand_box(&[1, 2], 0),
            BoxArea {
                top: 1,
                right: 2,
                bottom: 1,
                left: 2
            }
        );
        assert_eq!(
            expand_box(&[1, 2, 3], 0),
            BoxArea {
                top: 1,
                right: 2,
                bottom: 3,
                left: 2
            }
        );
        assert_eq!(
            expand_box(&[1, 2, 3, 4], 0),
            BoxArea {
                top: 1,
                right: 2,
                bottom: 3,
                left: 4
            }
        );
    }
}
