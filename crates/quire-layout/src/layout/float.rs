//! CSS Float Layout.
//!
//! [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
//!
//! "A float is a box that is shifted to the left or right on the current line.
//! The most interesting characteristic of a float is that content may flow along
//! its side (or be prohibited from doing so by the 'clear' property)."

use crate::style::FloatSide;

use super::absolute::PlaceholderRef;
use super::block::block_container_layout;
use super::context::{ContainingBlock, ExcludedShape, LayoutContext};
use super::flex::flex_layout;
use super::inline::atomic::inline_replaced_box_width_height;
use super::layout_box::{Capabilities, LayoutBox};
use super::percentages::{resolve_percentages, resolve_position_percentages};
use super::preferred::shrink_to_fit;

/// [§ 9.5.1 Positioning the float](https://www.w3.org/TR/CSS2/visuren.html#float-position)
///
/// Lay out a floated box whose static position is already set, place it,
/// and record it as an exclusion in `context`.
pub fn float_layout(
    context: &mut LayoutContext<'_>,
    mut float_box: LayoutBox,
    containing_block: &ContainingBlock,
    absolute_boxes: &mut Vec<PlaceholderRef>,
    fixed_boxes: &mut Vec<PlaceholderRef>,
) -> LayoutBox {
    resolve_percentages(&mut float_box, containing_block.width, containing_block.height);
    let cb_height = containing_block
        .height
        .unwrap_or(float_box.position_y() - containing_block.y);
    resolve_position_percentages(&mut float_box, containing_block.width, cb_height);

    // [§ 10.3.5](https://www.w3.org/TR/CSS2/visudet.html#float-width)
    // "If 'margin-left', or 'margin-right' are computed as 'auto', their
    // used value is '0'."
    float_box.dimensions.zero_auto_margins(true, true);

    if let Some(clearance) = get_clearance(&context.excluded_shapes, &float_box, 0.0) {
        float_box.dimensions.position_y += clearance;
    }

    if float_box.is(Capabilities::BLOCK_REPLACED) {
        inline_replaced_box_width_height(&mut float_box, containing_block);
    } else if float_box.dimensions.width.is_auto() {
        // "If 'width' is computed as 'auto', the used value is the
        // 'shrink-to-fit' width."
        let width = shrink_to_fit(context, &float_box, containing_block.width);
        float_box.dimensions.width = width.into();
    }

    if float_box.is(Capabilities::BLOCK_CONTAINER) {
        context.create_block_formatting_context();
        let laid_out = block_container_layout(
            context,
            &float_box,
            f32::INFINITY,
            None,
            false,
            absolute_boxes,
            fixed_boxes,
        );
        let mut laid_out = laid_out.new_box.unwrap_or(float_box);
        context.finish_block_formatting_context(&mut laid_out);
        float_box = laid_out;
    } else if float_box.is(Capabilities::FLEX_CONTAINER) {
        let laid_out = flex_layout(
            context,
            &float_box,
            f32::INFINITY,
            None,
            containing_block,
            false,
            absolute_boxes,
            fixed_boxes,
        );
        float_box = laid_out.new_box.unwrap_or(float_box);
    }

    let float_box = find_float_position(&context.excluded_shapes, float_box, containing_block);
    context.exclude(&float_box);
    float_box
}

/// Move a laid-out float to its final position.
pub fn find_float_position(
    excluded_shapes: &[ExcludedShape],
    mut float_box: LayoutBox,
    containing_block: &ContainingBlock,
) -> LayoutBox {
    // Rules 5 and 6: "The outer top of a floating box may not be higher than
    // the outer top of any block or floated box generated by an element
    // earlier in the source document."
    if let Some(last) = excluded_shapes.last() {
        let highest_y = last.margin_box.y;
        if float_box.position_y() < highest_y {
            float_box.translate(0.0, highest_y - float_box.position_y(), false);
        }
    }

    // Rules 1 and 2
    let (mut position_x, position_y, available_width) =
        avoid_collisions(excluded_shapes, &float_box, containing_block, true);

    // Rule 9: "A left-floating box must be put as far to the left as
    // possible, a right-floating box as far to the right as possible."
    if float_box.float_side() == Some(FloatSide::Right) {
        position_x += available_width - float_box.margin_width();
    }

    let dx = position_x - float_box.position_x();
    let dy = position_y - float_box.position_y();
    float_box.translate(dx, dy, false);
    float_box
}

/// [§ 9.5.2 Controlling flow next to floats](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
///
/// "Computing the clearance of an element on which 'clear' is set is done
/// by first determining the hypothetical position of the element's top
/// border edge within its parent block."
///
/// Returns `None` when the box needs no clearance.
#[must_use]
pub fn get_clearance(
    excluded_shapes: &[ExcludedShape],
    layout_box: &LayoutBox,
    collapsed_margin: f32,
) -> Option<f32> {
    let clear = layout_box.style.clear?;
    let hypothetical_position = layout_box.position_y() + collapsed_margin;
    excluded_shapes
        .iter()
        .filter(|shape| clear.clears(shape.side))
        .map(|shape| shape.margin_box.bottom())
        .filter(|&bottom| hypothetical_position < bottom)
        .map(|bottom| bottom - hypothetical_position)
        .reduce(f32::max)
}

/// Find where a box can go without overlapping the floats in
/// `excluded_shapes`.
///
/// Returns `(position_x, position_y, available_width)`. With `outer`, the
/// margin box must avoid floats; otherwise the border box does and the
/// returned position is still that of the margin box.
///
/// "The border box of a table, a block-level replaced element, or an
/// element in the normal flow that establishes a new block formatting
/// context... must not overlap the margin box of any floats in the same
/// block formatting context as the element itself."
#[must_use]
pub fn avoid_collisions(
    excluded_shapes: &[ExcludedShape],
    layout_box: &LayoutBox,
    containing_block: &ContainingBlock,
    outer: bool,
) -> (f32, f32, f32) {
    let d = &layout_box.dimensions;
    let mut position_y = if outer { d.position_y } else { d.border_box_y() };
    let (box_width, box_height) = if outer {
        (d.margin_width(), d.margin_height())
    } else {
        (d.border_width(), d.border_height())
    };

    if d.border_height() == 0.0 && layout_box.is_floated() {
        return (containing_block.x, position_y, containing_block.width);
    }

    let mut max_left_bound;
    let mut max_right_bound;
    loop {
        // STEP 1: Collect the floats overlapping the box vertically.
        let colliding: Vec<&ExcludedShape> = excluded_shapes
            .iter()
            .filter(|shape| {
                let top = shape.margin_box.y;
                let bottom = shape.margin_box.bottom();
                (top < position_y && position_y < bottom)
                    || (top < position_y + box_height && position_y + box_height < bottom)
                    || (top >= position_y && bottom <= position_y + box_height)
            })
            .collect();

        // STEP 2: Narrow the containing block by the colliding floats.
        max_left_bound = containing_block.x;
        max_right_bound = containing_block.right();
        if !outer {
            max_left_bound += d.margin.left.px();
            max_right_bound -= d.margin.right.px();
        }
        for shape in &colliding {
            match shape.side {
                FloatSide::Left => max_left_bound = max_left_bound.max(shape.margin_box.right()),
                FloatSide::Right => max_right_bound = max_right_bound.min(shape.margin_box.x),
            }
        }

        // STEP 3: Rules 3, 7 and 8. If the box does not fit, move below the
        // first float that ends, if that moves it at all.
        if !colliding.is_empty() && box_width > max_right_bound - max_left_bound {
            let next_y = colliding
                .iter()
                .map(|shape| shape.margin_box.bottom())
                .fold(f32::INFINITY, f32::min);
            if next_y > position_y {
                position_y = next_y;
                continue;
            }
        }
        break;
    }

    let mut position_x = max_left_bound;
    let available_width = max_right_bound - max_left_bound;
    if !outer {
        position_x -= d.margin.left.px();
        position_y -= d.margin.top.px();
    }
    (position_x, position_y, available_width)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::layout::box_model::Rect;
    use crate::layout::{BoxKind, values::AutoOr};
    use crate::style::{ClearSide, ComputedStyle, Direction, DisplayValue};

    fn cb() -> ContainingBlock {
        ContainingBlock {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: None,
            direction: Direction::Ltr,
        }
    }

    fn shape(side: FloatSide, x: f32, y: f32, width: f32, height: f32) -> ExcludedShape {
        ExcludedShape {
            side,
            margin_box: Rect {
                x,
                y,
                width,
                height,
            },
        }
    }

    fn line(y: f32, width: f32, height: f32) -> LayoutBox {
        let mut line = LayoutBox::new(BoxKind::Line, "p", Rc::new(ComputedStyle::default()));
        line.dimensions.position_y = y;
        line.dimensions.width = AutoOr::Length(width);
        line.dimensions.height = AutoOr::Length(height);
        line
    }

    #[test]
    fn test_no_floats_gives_whole_width() {
        assert_eq!(avoid_collisions(&[], &line(0.0, 10.0, 10.0), &cb(), false), (0.0, 0.0, 100.0));
    }

    #[test]
    fn test_left_and_right_floats_narrow_line() {
        let shapes = [
            shape(FloatSide::Left, 0.0, 0.0, 20.0, 30.0),
            shape(FloatSide::Right, 70.0, 0.0, 30.0, 30.0),
        ];
        assert_eq!(
            avoid_collisions(&shapes, &line(5.0, 10.0, 10.0), &cb(), false),
            (20.0, 5.0, 50.0)
        );
    }

    #[test]
    fn test_box_too_wide_moves_below_float() {
        let shapes = [shape(FloatSide::Left, 0.0, 0.0, 80.0, 30.0)];
        assert_eq!(
            avoid_collisions(&shapes, &line(0.0, 50.0, 10.0), &cb(), false),
            (0.0, 30.0, 100.0)
        );
    }

    #[test]
    fn test_clearance() {
        let shapes = [
            shape(FloatSide::Left, 0.0, 0.0, 20.0, 30.0),
            shape(FloatSide::Right, 80.0, 0.0, 20.0, 50.0),
        ];
        let style = |clear| {
            Rc::new(ComputedStyle {
                clear,
                ..ComputedStyle::with_display(DisplayValue::block())
            })
        };
        let mut b = LayoutBox::new(BoxKind::Block, "div", style(Some(ClearSide::Left)));
        b.dimensions.position_y = 10.0;
        assert_eq!(get_clearance(&shapes, &b, 0.0), Some(20.0));
        b.style = style(Some(ClearSide::Both));
        assert_eq!(get_clearance(&shapes, &b, 0.0), Some(40.0));
        b.style = style(None);
        assert_eq!(get_clearance(&shapes, &b, 0.0), None);
    }

    #[test]
    fn test_right_float_placed_at_right_edge() {
        let style = Rc::new(ComputedStyle {
            float: Some(FloatSide::Right),
            ..ComputedStyle::with_display(DisplayValue::block())
        });
        let mut float = LayoutBox::new(BoxKind::Block, "aside", style);
        float.dimensions.width = AutoOr::Length(30.0);
        float.dimensions.height = AutoOr::Length(10.0);
        let placed = find_float_position(&[], float, &cb());
        assert_eq!(placed.position_x(), 70.0);
        assert_eq!(placed.position_y(), 0.0);
    }
}
