//! CSS Box Model types.
//!
//! [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)

use serde::{Deserialize, Serialize};

use super::values::{AutoEdgeSizes, AutoOr};

/// A rectangle positioned in 2D space.
///
/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Horizontal position of the top-left corner.
    pub x: f32,
    /// Vertical position of the top-left corner.
    pub y: f32,
    /// Width of the rectangle.
    pub width: f32,
    /// Height of the rectangle.
    pub height: f32,
}

impl Rect {
    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Edge sizes for padding, border, or margin.
///
/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeSizes {
    /// Top edge size.
    pub top: f32,
    /// Right edge size.
    pub right: f32,
    /// Bottom edge size.
    pub bottom: f32,
    /// Left edge size.
    pub left: f32,
}

impl EdgeSizes {
    /// All four edges set to the same size.
    #[must_use]
    pub const fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Sum of the left and right edges.
    #[must_use]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Sum of the top and bottom edges.
    #[must_use]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// [§ 3. The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
///
/// "Each box has a content area and optional surrounding padding, border,
/// and margin areas."
///
/// Layout stores the top-left corner of the margin box plus the content size
/// and the three edge layers. Every other rectangle is derived from these
/// fields on demand, so translating the position and recomputing from scratch
/// always agree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxDimensions {
    /// Left edge of the margin box.
    pub position_x: f32,
    /// Top edge of the margin box.
    pub position_y: f32,
    /// Content width, 'auto' until resolved.
    pub width: AutoOr,
    /// Content height, 'auto' until resolved.
    pub height: AutoOr,
    /// Margins; 'auto' until resolved.
    pub margin: AutoEdgeSizes,
    /// Padding widths.
    pub padding: EdgeSizes,
    /// Border widths.
    pub border: EdgeSizes,
    /// Distance from the top of the margin box to the baseline, once known.
    pub baseline: Option<f32>,
}

impl BoxDimensions {
    // [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
    //
    // ┌─────────────────────────────────────────┐  <- (position_x, position_y)
    // │              margin-top                 │
    // │   ┌─────────────────────────────────┐   │
    // │   │          border-top             │   │
    // │   │   ┌─────────────────────────┐   │   │
    // │   │   │      padding-top        │   │   │
    // │   │   │   ┌─────────────────┐   │   │   │
    // │ m │ b │ p │                 │ p │ b │ m │
    // │ a │ o │ a │     CONTENT     │ a │ o │ a │
    // │ r │ r │ d │  width x height │ d │ r │ r │
    // │ g │ d │ d │                 │ d │ d │ g │
    // │ i │ e │ i │                 │ i │ e │ i │
    // │ n │ r │ n │                 │ n │ r │ n │
    // │   │   │ g │                 │ g │   │   │
    // │   │   │   └─────────────────┘   │   │   │
    // │   │   │      padding-bottom     │   │   │
    // │   │   └─────────────────────────┘   │   │
    // │   │          border-bottom          │   │
    // │   └─────────────────────────────────┘   │
    // │              margin-bottom              │
    // └─────────────────────────────────────────┘
    //
    // Unresolved ('auto') margins and sizes count as zero in every accessor.

    /// Width of the padding box: `width + padding.left + padding.right`.
    #[must_use]
    pub fn padding_width(&self) -> f32 {
        self.width.px() + self.padding.horizontal()
    }

    /// Height of the padding box.
    #[must_use]
    pub fn padding_height(&self) -> f32 {
        self.height.px() + self.padding.vertical()
    }

    /// Width of the border box: padding width plus left and right borders.
    #[must_use]
    pub fn border_width(&self) -> f32 {
        self.padding_width() + self.border.horizontal()
    }

    /// Height of the border box.
    #[must_use]
    pub fn border_height(&self) -> f32 {
        self.padding_height() + self.border.vertical()
    }

    /// [§ 3.1 Margins](https://www.w3.org/TR/css-box-3/#margins)
    ///
    /// ```text
    /// width = content.width
    ///       + padding.left + padding.right
    ///       + border.left + border.right
    ///       + margin.left + margin.right
    /// ```
    #[must_use]
    pub fn margin_width(&self) -> f32 {
        self.border_width() + self.margin.left.px() + self.margin.right.px()
    }

    /// Height of the margin box.
    #[must_use]
    pub fn margin_height(&self) -> f32 {
        self.border_height() + self.margin.top.px() + self.margin.bottom.px()
    }

    /// Left edge of the border box.
    #[must_use]
    pub fn border_box_x(&self) -> f32 {
        self.position_x + self.margin.left.px()
    }

    /// Top edge of the border box.
    #[must_use]
    pub fn border_box_y(&self) -> f32 {
        self.position_y + self.margin.top.px()
    }

    /// Left edge of the padding box.
    #[must_use]
    pub fn padding_box_x(&self) -> f32 {
        self.border_box_x() + self.border.left
    }

    /// Top edge of the padding box.
    #[must_use]
    pub fn padding_box_y(&self) -> f32 {
        self.border_box_y() + self.border.top
    }

    /// Left edge of the content box.
    #[must_use]
    pub fn content_box_x(&self) -> f32 {
        self.padding_box_x() + self.padding.left
    }

    /// Top edge of the content box.
    #[must_use]
    pub fn content_box_y(&self) -> f32 {
        self.padding_box_y() + self.padding.top
    }

    /// [§ 3.1 Margins](https://www.w3.org/TR/css-box-3/#margins)
    ///
    /// "The margin box is the outermost box, and contains all four areas."
    #[must_use]
    pub fn margin_box(&self) -> Rect {
        Rect {
            x: self.position_x,
            y: self.position_y,
            width: self.margin_width(),
            height: self.margin_height(),
        }
    }

    /// [§ 3.3 Borders](https://www.w3.org/TR/css-box-3/#borders)
    ///
    /// "The border box contains content, padding, and border areas."
    #[must_use]
    pub fn border_box(&self) -> Rect {
        Rect {
            x: self.border_box_x(),
            y: self.border_box_y(),
            width: self.border_width(),
            height: self.border_height(),
        }
    }

    /// [§ 3.2 Padding](https://www.w3.org/TR/css-box-3/#paddings)
    ///
    /// "The padding box contains both the content and padding areas."
    #[must_use]
    pub fn padding_box(&self) -> Rect {
        Rect {
            x: self.padding_box_x(),
            y: self.padding_box_y(),
            width: self.padding_width(),
            height: self.padding_height(),
        }
    }

    /// "The content box contains the actual content of the element."
    #[must_use]
    pub fn content_box(&self) -> Rect {
        Rect {
            x: self.content_box_x(),
            y: self.content_box_y(),
            width: self.width.px(),
            height: self.height.px(),
        }
    }

    /// Resolve 'auto' margins to zero on the given sides.
    pub fn zero_auto_margins(&mut self, vertical: bool, horizontal: bool) {
        let margin = &mut self.margin;
        if vertical {
            for side in [&mut margin.top, &mut margin.bottom] {
                if side.is_auto() {
                    *side = AutoOr::Length(0.0);
                }
            }
        }
        if horizontal {
            for side in [&mut margin.left, &mut margin.right] {
                if side.is_auto() {
                    *side = AutoOr::Length(0.0);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn dims(values: [u8; 14]) -> BoxDimensions {
        let v = values.map(f32::from);
        BoxDimensions {
            position_x: v[0],
            position_y: v[1],
            width: AutoOr::Length(v[2]),
            height: AutoOr::Length(v[3]),
            margin: AutoEdgeSizes {
                top: AutoOr::Length(v[4]),
                right: AutoOr::Length(v[5]),
                bottom: AutoOr::Auto,
                left: AutoOr::Length(v[6]),
            },
            padding: EdgeSizes {
                top: v[7],
                right: v[8],
                bottom: v[9],
                left: v[10],
            },
            border: EdgeSizes {
                top: v[11],
                right: v[12],
                bottom: v[13],
                left: v[13],
            },
            baseline: None,
        }
    }

    fn dims_from(values: &[u8]) -> BoxDimensions {
        let mut array = [0_u8; 14];
        for (slot, value) in array.iter_mut().zip(values) {
            *slot = *value;
        }
        dims(array)
    }

    #[quickcheck]
    fn prop_border_box_wraps_padding_box(values: Vec<u8>) -> bool {
        let d = dims_from(&values);
        let padding = d.padding_box();
        let border = d.border_box();
        let content = d.content_box();
        border.x == padding.x - d.border.left
            && border.y == padding.y - d.border.top
            && border.width == padding.width + d.border.horizontal()
            && border.height == padding.height + d.border.vertical()
            && padding.width == content.width + d.padding.horizontal()
            && padding.x == content.x - d.padding.left
    }

    #[quickcheck]
    fn prop_translation_matches_recomputation(values: Vec<u8>, dx: i8, dy: i8) -> bool {
        let original = dims_from(&values);
        let mut moved = original.clone();
        moved.position_x += f32::from(dx);
        moved.position_y += f32::from(dy);
        let before = original.content_box();
        let after = moved.content_box();
        after.x == before.x + f32::from(dx)
            && after.y == before.y + f32::from(dy)
            && after.width == before.width
    }

    #[test]
    fn test_auto_margins_count_as_zero() {
        let d = BoxDimensions {
            width: AutoOr::Length(100.0),
            margin: AutoEdgeSizes {
                left: AutoOr::Auto,
                right: AutoOr::Length(5.0),
                ..AutoEdgeSizes::default()
            },
            padding: EdgeSizes::uniform(2.0),
            ..BoxDimensions::default()
        };
        assert_eq!(d.margin_width(), 109.0);
        assert_eq!(d.content_box_x(), 2.0);
    }

    #[test]
    fn test_zero_auto_margins_only_touches_requested_axis() {
        let mut d = BoxDimensions::default();
        d.zero_auto_margins(true, false);
        assert_eq!(d.margin.top, AutoOr::Length(0.0));
        assert!(d.margin.left.is_auto());
    }
}
