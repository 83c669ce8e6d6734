//! Layout-wide state.
//!
//! [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
//!
//! "In a block formatting context, each box's left outer edge touches the
//! left edge of the containing block... This is true even in the presence
//! of floats."

use crate::style::{Direction, FloatSide};
use crate::text::TextShaper;

use super::box_model::Rect;
use super::layout_box::LayoutBox;

/// [§ 10.1 Definition of "containing block"](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
///
/// "The position and size of an element's box(es) are sometimes calculated
/// relative to a certain rectangle, called the containing block of the
/// element."
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainingBlock {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width; always definite.
    pub width: f32,
    /// Height, unknown while the containing block is still being laid out.
    pub height: Option<f32>,
    /// Direction of the generating box.
    pub direction: Direction,
}

impl ContainingBlock {
    /// The content box of `layout_box`.
    #[must_use]
    pub fn content_of(layout_box: &LayoutBox) -> Self {
        let d = &layout_box.dimensions;
        Self {
            x: d.content_box_x(),
            y: d.content_box_y(),
            width: d.width.px(),
            height: d.height.length(),
            direction: layout_box.style.direction,
        }
    }

    /// [§ 10.1 item 4](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
    ///
    /// "the containing block is formed by the padding edge of the ancestor"
    #[must_use]
    pub fn padding_of(layout_box: &LayoutBox) -> Self {
        let d = &layout_box.dimensions;
        Self {
            x: d.padding_box_x(),
            y: d.padding_box_y(),
            width: d.padding_width(),
            height: d.height.length().map(|height| height + d.padding.vertical()),
            direction: layout_box.style.direction,
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// A float that excludes space from line boxes and later floats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExcludedShape {
    /// Side the float went to.
    pub side: FloatSide,
    /// Its margin box, in absolute coordinates.
    pub margin_box: Rect,
}

/// State shared by every layout routine during one layout run.
///
/// Holds the text shaper and the float exclusions of the current block
/// formatting context. Formatting contexts nest: creating one saves the
/// enclosing exclusions, finishing it restores them.
pub struct LayoutContext<'a> {
    shaper: &'a dyn TextShaper,
    /// Floats placed so far in the current block formatting context.
    pub excluded_shapes: Vec<ExcludedShape>,
    enclosing_shapes: Vec<Vec<ExcludedShape>>,
}

impl<'a> LayoutContext<'a> {
    /// A context with no floats, measuring text with `shaper`.
    #[must_use]
    pub fn new(shaper: &'a dyn TextShaper) -> Self {
        Self {
            shaper,
            excluded_shapes: Vec::new(),
            enclosing_shapes: Vec::new(),
        }
    }

    /// The text shaper.
    #[must_use]
    pub fn shaper(&self) -> &'a dyn TextShaper {
        self.shaper
    }

    /// Enter a new block formatting context.
    pub fn create_block_formatting_context(&mut self) {
        let enclosing = std::mem::take(&mut self.excluded_shapes);
        self.enclosing_shapes.push(enclosing);
    }

    /// Leave the current block formatting context.
    ///
    /// [§ 10.6.7 'Auto' heights for block formatting context roots](https://www.w3.org/TR/CSS2/visudet.html#root-height)
    ///
    /// "In addition, if the element has any floating descendants whose bottom
    /// margin edge is below the element's bottom content edge, then the
    /// height is increased to include those edges."
    pub fn finish_block_formatting_context(&mut self, root: &mut LayoutBox) {
        if root.style.height.is_auto() && !self.excluded_shapes.is_empty() {
            let box_bottom = root.dimensions.content_box_y() + root.height();
            let max_shape_bottom = self
                .excluded_shapes
                .iter()
                .map(|shape| shape.margin_box.bottom())
                .fold(box_bottom, f32::max);
            root.dimensions.height = (root.height() + max_shape_bottom - box_bottom).into();
        }
        self.excluded_shapes = self.enclosing_shapes.pop().unwrap_or_default();
    }

    /// Record a placed float.
    pub fn exclude(&mut self, float_box: &LayoutBox) {
        if let Some(side) = float_box.float_side() {
            self.excluded_shapes.push(ExcludedShape {
                side,
                margin_box: float_box.dimensions.margin_box(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::layout::{BoxKind, values::AutoOr};
    use crate::style::{ComputedStyle, DisplayValue};
    use crate::text::ApproximateShaper;

    #[test]
    fn test_finish_extends_auto_height_to_floats() {
        let shaper = ApproximateShaper::default();
        let mut context = LayoutContext::new(&shaper);
        context.excluded_shapes.push(ExcludedShape {
            side: FloatSide::Left,
            margin_box: Rect {
                x: 0.0,
                y: 5.0,
                width: 10.0,
                height: 10.0,
            },
        });
        context.create_block_formatting_context();
        context.excluded_shapes.push(ExcludedShape {
            side: FloatSide::Right,
            margin_box: Rect {
                x: 50.0,
                y: 0.0,
                width: 10.0,
                height: 40.0,
            },
        });
        let style = Rc::new(ComputedStyle::with_display(DisplayValue::flow_root()));
        let mut root = LayoutBox::new(BoxKind::Block, "div", style);
        root.dimensions.height = AutoOr::Length(20.0);
        context.finish_block_formatting_context(&mut root);
        assert_eq!(root.dimensions.height, AutoOr::Length(40.0));
        assert_eq!(context.excluded_shapes.len(), 1);
        assert_eq!(context.excluded_shapes[0].side, FloatSide::Left);
    }
}
