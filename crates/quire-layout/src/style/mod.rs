//! Computed style values consumed by layout.
//!
//! The cascade that produces these values lives outside this crate; layout
//! only reads them.

pub mod computed;
pub mod display;
pub mod values;

pub use computed::ComputedStyle;
pub use display::{DisplayValue, InnerDisplayType, OuterDisplayType, parse_display_keyword};
pub use values::{
    AutoLength, BoxDecorationBreak, ClearSide, DEFAULT_FONT_SIZE_PX, Direction, FloatSide,
    Hyphens, LengthValue, LineHeight, Overflow, PositionType, TextAlign, TextOverflow,
    TextTransform, VerticalAlign, WhiteSpace, parse_length,
};
