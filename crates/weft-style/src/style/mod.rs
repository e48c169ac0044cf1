//! Typed style values, the declaration reader and computed styles.

pub mod computed;
pub mod reader;
pub mod resources;
pub mod shorthand;
mod values;

pub use computed::ComputedStyle;
pub use reader::StylePropertyReader;
pub use resources::{
    Background, Cursor, FilterMode, Font, NullResourceLoader, ResourceLoader, Texture, VectorImage,
    load_texture_for_scale, load_texture_or_placeholder,
};
pub use shorthand::{BoxArea, Flex};
pub use values::{
    Align, Color, CursorKind, DisplayStyle, FlexDirection, FontStyle, Justify, Length, Overflow,
    Position, ScaleMode, TextAnchor, Visibility, WhiteSpace, Wrap,
};
