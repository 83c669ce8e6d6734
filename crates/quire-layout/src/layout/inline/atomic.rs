//! Atomic inline-level boxes: replaced elements, inline-blocks and
//! inline-flex containers.
//!
//! [§ 9.2.2 Inline-level elements and inline boxes](https://www.w3.org/TR/CSS2/visuren.html#inline-boxes)
//!
//! "Inline-level boxes that are not inline boxes (such as replaced
//! inline-level elements, inline-block elements, and inline-table elements)
//! are called atomic inline-level boxes because they participate in their
//! inline formatting context as a single opaque box."

use quire_common::warning::warn_once;

use crate::style::Overflow;

use super::super::absolute::PlaceholderRef;
use super::super::block::{block_container_layout, find_in_flow_baseline};
use super::super::context::{ContainingBlock, LayoutContext};
use super::super::flex::flex_layout;
use super::super::layout_box::{BoxNode, Capabilities, LayoutBox, Replacement};
use super::super::percentages::resolve_percentages;
use super::super::preferred::shrink_to_fit;
use super::super::skip_stack::SkipStack;
use super::super::values::AutoOr;

/// Width used for a replaced element with no intrinsic width or ratio.
pub const DEFAULT_REPLACED_WIDTH: f32 = 300.0;
/// Height used for a replaced element with no intrinsic height or ratio.
pub const DEFAULT_REPLACED_HEIGHT: f32 = 150.0;

/// Lay out an atomic inline-level box starting at `position_x`.
///
/// # Panics
/// If `layout_box` is not atomic.
pub fn atomic_box(
    context: &mut LayoutContext<'_>,
    layout_box: &LayoutBox,
    position_x: f32,
    skip_stack: Option<&SkipStack>,
    containing_block: &ContainingBlock,
    absolute_boxes: &mut Vec<PlaceholderRef>,
    fixed_boxes: &mut Vec<PlaceholderRef>,
) -> LayoutBox {
    if layout_box.is(Capabilities::REPLACED) {
        let mut new_box = layout_box.clone();
        resolve_percentages(&mut new_box, containing_block.width, containing_block.height);
        new_box.dimensions.zero_auto_margins(true, true);
        inline_replaced_box_width_height(&mut new_box, containing_block);
        new_box.dimensions.baseline = Some(new_box.margin_height());
        new_box
    } else if layout_box.is(Capabilities::INLINE_BLOCK | Capabilities::FLEX_CONTAINER) {
        if layout_box.is_table_wrapper {
            let _ = warn_once(
                "Layout",
                "inline tables are laid out as inline-blocks; table layout is not supported",
            );
        }
        inline_block_box_layout(
            context,
            layout_box.clone(),
            position_x,
            skip_stack,
            containing_block,
            absolute_boxes,
            fixed_boxes,
        )
    } else {
        panic!("atomic layout of {} is not handled", layout_box.kind.name())
    }
}

/// [§ 10.3.9 'Inline-block', non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#inlineblock-width)
///
/// "If 'width' is 'auto', the used value is the shrink-to-fit width as for
/// floating elements." The contents are laid out at unlimited height.
pub fn inline_block_box_layout(
    context: &mut LayoutContext<'_>,
    mut layout_box: LayoutBox,
    position_x: f32,
    skip_stack: Option<&SkipStack>,
    containing_block: &ContainingBlock,
    absolute_boxes: &mut Vec<PlaceholderRef>,
    fixed_boxes: &mut Vec<PlaceholderRef>,
) -> LayoutBox {
    resolve_percentages(&mut layout_box, containing_block.width, containing_block.height);
    // [§ 10.6.6](https://www.w3.org/TR/CSS2/visudet.html#block-root-margin)
    // "If 'margin-top', or 'margin-bottom' are 'auto', their used value is 0."
    layout_box.dimensions.zero_auto_margins(true, true);

    if layout_box.dimensions.width.is_auto() {
        let width = shrink_to_fit(context, &layout_box, containing_block.width);
        layout_box.dimensions.width = width.into();
    }
    clamp_width(&mut layout_box);

    layout_box.dimensions.position_x = position_x;
    layout_box.dimensions.position_y = 0.0;

    context.create_block_formatting_context();
    let laid_out = if layout_box.is(Capabilities::FLEX_CONTAINER) {
        flex_layout(
            context,
            &layout_box,
            f32::INFINITY,
            skip_stack,
            containing_block,
            true,
            absolute_boxes,
            fixed_boxes,
        )
        .new_box
    } else {
        block_container_layout(
            context,
            &layout_box,
            f32::INFINITY,
            skip_stack,
            true,
            absolute_boxes,
            fixed_boxes,
        )
        .new_box
    };
    let mut new_box = laid_out.unwrap_or(layout_box);
    context.finish_block_formatting_context(&mut new_box);
    new_box.dimensions.baseline = Some(inline_block_baseline(&new_box));
    new_box
}

/// [§ 10.8.1 'vertical-align'](https://www.w3.org/TR/CSS2/visudet.html#propdef-vertical-align)
///
/// "The baseline of an 'inline-block' is the baseline of its last line box
/// in the normal flow, unless it has either no in-flow line boxes or if its
/// 'overflow' property has a computed value other than 'visible', in which
/// case the baseline is the bottom margin edge."
#[must_use]
pub fn inline_block_baseline(layout_box: &LayoutBox) -> f32 {
    if layout_box.is_table_wrapper {
        // An inline table's baseline is the one of its first row.
        let first_row_baseline = layout_box
            .children
            .iter()
            .filter_map(BoxNode::as_box)
            .find(|child| child.is(Capabilities::TABLE))
            .and_then(|table| table.children.first())
            .and_then(|group| {
                group.with_box(|group| group.children.first().map(|row| row.with_box(LayoutBox::baseline)))
            });
        if let Some(baseline) = first_row_baseline {
            return baseline;
        }
    } else if layout_box.style.overflow == Overflow::Visible
        && let Some(baseline) = find_in_flow_baseline(layout_box, true)
    {
        return baseline;
    }
    layout_box.position_y() + layout_box.margin_height()
}

/// [§ 10.3.2](https://www.w3.org/TR/CSS2/visudet.html#inline-replaced-width)
/// and [§ 10.6.2](https://www.w3.org/TR/CSS2/visudet.html#inline-replaced-height):
/// used width and height of a replaced element.
pub fn inline_replaced_box_width_height(layout_box: &mut LayoutBox, containing_block: &ContainingBlock) {
    let Some(replacement) = layout_box.replacement().copied() else {
        panic!("replaced sizing of {}", layout_box.kind.name());
    };
    if layout_box.style.width.is_auto() && layout_box.style.height.is_auto() {
        replaced_box_width(layout_box, &replacement, containing_block);
        replaced_box_height(layout_box, &replacement);
        min_max_auto_replaced(layout_box);
    } else {
        replaced_box_width(layout_box, &replacement, containing_block);
        clamp_width(layout_box);
        replaced_box_height(layout_box, &replacement);
        clamp_height(layout_box);
    }
}

fn positive_ratio(replacement: &Replacement) -> Option<f32> {
    replacement.ratio().filter(|ratio| *ratio > 0.0)
}

fn replaced_box_width(layout_box: &mut LayoutBox, replacement: &Replacement, containing_block: &ContainingBlock) {
    let ratio = positive_ratio(replacement);
    let d = &mut layout_box.dimensions;
    if d.width.is_auto() && d.height.is_auto() {
        if let Some(width) = replacement.intrinsic_width {
            // "if the element also has an intrinsic width, then that
            // intrinsic width is the used value of 'width'."
            d.width = AutoOr::Length(width);
        } else if let Some(ratio) = ratio {
            if let Some(height) = replacement.intrinsic_height {
                d.width = AutoOr::Length(height * ratio);
            } else {
                // "the used value of 'width' is undefined in CSS 2.1. However,
                // it is suggested that ... the used width is calculated from
                // the constraint equation used for block-level, non-replaced
                // elements in normal flow."
                let margins = d.margin.left.px() + d.margin.right.px();
                let edges = d.padding.horizontal() + d.border.horizontal();
                d.width = AutoOr::Length((containing_block.width - margins - edges).max(0.0));
            }
        }
    }
    if d.width.is_auto() {
        d.width = AutoOr::Length(if let Some(ratio) = ratio {
            d.height.px() * ratio
        } else if let Some(width) = replacement.intrinsic_width {
            width
        } else {
            DEFAULT_REPLACED_WIDTH
        });
    }
}

fn replaced_box_height(layout_box: &mut LayoutBox, replacement: &Replacement) {
    let ratio = positive_ratio(replacement);
    let width_is_auto = layout_box.style.width.is_auto();
    let d = &mut layout_box.dimensions;
    if !d.height.is_auto() {
        return;
    }
    // The computed width decides, not the width used by now.
    let height = if width_is_auto {
        replacement
            .intrinsic_height
            .or_else(|| ratio.map(|ratio| d.width.px() / ratio))
    } else {
        ratio
            .map(|ratio| d.width.px() / ratio)
            .or(replacement.intrinsic_height)
    };
    d.height = AutoOr::Length(height.unwrap_or(DEFAULT_REPLACED_HEIGHT));
}

fn clamp_width(layout_box: &mut LayoutBox) {
    let width = layout_box.width();
    if width > layout_box.max_width {
        layout_box.dimensions.width = AutoOr::Length(layout_box.max_width);
    }
    if layout_box.width() < layout_box.min_width {
        layout_box.dimensions.width = AutoOr::Length(layout_box.min_width);
    }
}

fn clamp_height(layout_box: &mut LayoutBox) {
    let height = layout_box.height();
    if height > layout_box.max_height {
        layout_box.dimensions.height = AutoOr::Length(layout_box.max_height);
    }
    if layout_box.height() < layout_box.min_height {
        layout_box.dimensions.height = AutoOr::Length(layout_box.min_height);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Violation {
    None,
    Min,
    Max,
}

fn violation(value: f32, min: f32, max: f32) -> Violation {
    if value < min {
        Violation::Min
    } else if value > max {
        Violation::Max
    } else {
        Violation::None
    }
}

/// [§ 10.4 Minimum and maximum widths](https://www.w3.org/TR/CSS2/visudet.html#min-max-widths)
///
/// "However, for replaced elements with an intrinsic ratio and both 'width'
/// and 'height' specified as 'auto', the algorithm is as follows: Select
/// from the table the resolved height and width values for the appropriate
/// constraint violation."
pub fn min_max_auto_replaced(layout_box: &mut LayoutBox) {
    let mut width = layout_box.width();
    let mut height = layout_box.height();
    let min_width = layout_box.min_width;
    let min_height = layout_box.min_height;
    let max_width = min_width.max(layout_box.max_width);
    let max_height = min_height.max(layout_box.max_height);

    let violations = (
        violation(width, min_width, max_width),
        violation(height, min_height, max_height),
    );

    // Degenerate images would divide by zero below.
    if width == 0.0 {
        width = 1e-6;
    }
    if height == 0.0 {
        height = 1e-6;
    }

    let (used_width, used_height) = match violations {
        (Violation::None, Violation::None) => return,
        (Violation::Max, Violation::None) => (max_width, (max_width * height / width).max(min_height)),
        (Violation::Min, Violation::None) => (min_width, (min_width * height / width).min(max_height)),
        (Violation::None, Violation::Max) => ((max_height * width / height).max(min_width), max_height),
        (Violation::None, Violation::Min) => ((min_height * width / height).min(max_width), min_height),
        (Violation::Max, Violation::Max) => {
            if max_width / width <= max_height / height {
                (max_width, min_height.max(max_width * height / width))
            } else {
                (min_width.max(max_height * width / height), max_height)
            }
        }
        (Violation::Min, Violation::Min) => {
            if min_width / width <= min_height / height {
                (max_width.min(min_height * width / height), min_height)
            } else {
                (min_width, max_height.min(min_width * height / width))
            }
        }
        (Violation::Min, Violation::Max) => (min_width, max_height),
        (Violation::Max, Violation::Min) => (max_width, min_height),
    };
    layout_box.dimensions.width = AutoOr::Length(used_width);
    layout_box.dimensions.height = AutoOr::Length(used_height);
}

/// [§ 5.3 Concrete Object Size Resolution](https://www.w3.org/TR/css-images-3/#default-sizing)
///
/// The default sizing algorithm: the concrete size of an object given an
/// optional specified size and the size of the default object.
#[must_use]
pub fn default_image_sizing(
    replacement: &Replacement,
    specified_width: Option<f32>,
    specified_height: Option<f32>,
    default_width: f32,
    default_height: f32,
) -> (f32, f32) {
    let ratio = positive_ratio(replacement);
    match (specified_width, specified_height) {
        (Some(width), Some(height)) => (width, height),
        (Some(width), None) => (
            width,
            ratio
                .map(|ratio| width / ratio)
                .or(replacement.intrinsic_height)
                .unwrap_or(default_height),
        ),
        (None, Some(height)) => (
            ratio
                .map(|ratio| height * ratio)
                .or(replacement.intrinsic_width)
                .unwrap_or(default_width),
            height,
        ),
        (None, None) => {
            if replacement.intrinsic_width.is_some() || replacement.intrinsic_height.is_some() {
                default_image_sizing(
                    replacement,
                    replacement.intrinsic_width,
                    replacement.intrinsic_height,
                    default_width,
                    default_height,
                )
            } else {
                contain_constraint(default_width, default_height, ratio)
            }
        }
    }
}

/// "A contain constraint is resolved by setting the concrete object size to
/// the largest rectangle that has the object's intrinsic aspect ratio and
/// additionally has neither width nor height larger than the constraint
/// rectangle's width and height, respectively."
fn contain_constraint(width: f32, height: f32, ratio: Option<f32>) -> (f32, f32) {
    match ratio {
        None => (width, height),
        Some(ratio) if width > height * ratio => (height * ratio, height),
        Some(ratio) => (width, width / ratio),
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::layout::BoxKind;
    use crate::style::{AutoLength, ComputedStyle, Direction, DisplayValue};

    fn image(replacement: Replacement) -> LayoutBox {
        let mut b = LayoutBox::new(
            BoxKind::InlineReplaced(replacement),
            "img",
            Rc::new(ComputedStyle::with_display(DisplayValue::inline())),
        );
        b.dimensions.zero_auto_margins(true, true);
        b
    }

    fn cb() -> ContainingBlock {
        ContainingBlock {
            x: 0.0,
            y: 0.0,
            width: 400.0,
            height: None,
            direction: Direction::Ltr,
        }
    }

    #[test]
    fn test_intrinsic_size_used_when_auto() {
        let mut b = image(Replacement::sized(120.0, 80.0));
        inline_replaced_box_width_height(&mut b, &cb());
        assert_eq!((b.width(), b.height()), (120.0, 80.0));
    }

    #[test]
    fn test_max_height_violation_keeps_ratio() {
        let mut b = image(Replacement::sized(200.0, 100.0));
        b.max_height = 50.0;
        inline_replaced_box_width_height(&mut b, &cb());
        assert_eq!((b.width(), b.height()), (100.0, 50.0));
    }

    #[test]
    fn test_min_width_and_max_height_violations() {
        let mut b = image(Replacement::sized(20.0, 100.0));
        b.min_width = 40.0;
        b.max_height = 60.0;
        inline_replaced_box_width_height(&mut b, &cb());
        assert_eq!((b.width(), b.height()), (40.0, 60.0));
    }

    #[test]
    fn test_both_max_violations_pick_tighter_axis() {
        let mut b = image(Replacement::sized(400.0, 100.0));
        b.max_width = 200.0;
        b.max_height = 80.0;
        inline_replaced_box_width_height(&mut b, &cb());
        // 200/400 < 80/100: width is the binding constraint.
        assert_eq!((b.width(), b.height()), (200.0, 50.0));
    }

    #[test]
    fn test_no_intrinsic_size_uses_defaults() {
        let mut b = image(Replacement::default());
        inline_replaced_box_width_height(&mut b, &cb());
        assert_eq!((b.width(), b.height()), (300.0, 150.0));
    }

    #[test]
    fn test_specified_width_derives_height_from_ratio() {
        let style = ComputedStyle {
            width: AutoLength::px(50.0),
            ..ComputedStyle::with_display(DisplayValue::inline())
        };
        let mut b = LayoutBox::new(
            BoxKind::InlineReplaced(Replacement::sized(200.0, 100.0)),
            "img",
            Rc::new(style),
        );
        b.dimensions.width = AutoOr::Length(50.0);
        inline_replaced_box_width_height(&mut b, &cb());
        assert_eq!((b.width(), b.height()), (50.0, 25.0));
    }

    #[test]
    fn test_default_sizing_contains_ratio_in_default_object() {
        let ratio_only = Replacement {
            intrinsic_ratio: Some(4.0),
            ..Replacement::default()
        };
        assert_eq!(default_image_sizing(&ratio_only, None, None, 300.0, 150.0), (300.0, 75.0));
        assert_eq!(
            default_image_sizing(&Replacement::sized(10.0, 20.0), None, Some(40.0), 300.0, 150.0),
            (20.0, 40.0)
        );
    }
}
