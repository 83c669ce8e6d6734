//! Absolutely and fixed positioned boxes.
//!
//! [§ 9.6 Absolute positioning](https://www.w3.org/TR/CSS2/visuren.html#absolute-positioning)
//!
//! "In the absolute positioning model, a box is explicitly offset with
//! respect to its containing block. It is removed from the normal flow
//! entirely (it has no impact on later siblings)."
//!
//! Out-of-flow boxes are laid out in two phases. Normal-flow layout leaves an
//! [`AbsolutePlaceholder`] where the box would have been, which records the
//! static position. Once the containing block is laid out, [`absolute_layout`]
//! lays the box out against it and the placeholder wraps the result.

use std::cell::RefCell;
use std::rc::Rc;

use quire_common::warning::warn_once;

use crate::style::{Direction, PositionType};

use super::block::block_container_layout;
use super::context::{ContainingBlock, LayoutContext};
use super::flex::flex_layout;
use super::inline::atomic::inline_replaced_box_width_height;
use super::layout_box::{Capabilities, LayoutBox};
use super::percentages::{resolve_percentages, resolve_position_percentages};
use super::preferred::shrink_to_fit;
use super::values::AutoOr;

/// Shared handle to a placeholder. The placeholder sits in the box tree and
/// in the list of boxes waiting for their containing block at the same time.
pub type PlaceholderRef = Rc<RefCell<AbsolutePlaceholder>>;

#[derive(Debug, Clone, PartialEq)]
enum PlaceholderState {
    /// Only the static position is known; descendants are not positioned.
    Pending(LayoutBox),
    /// Laid out against the containing block.
    Resolved(LayoutBox),
}

/// Stand-in for an out-of-flow box in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct AbsolutePlaceholder {
    state: PlaceholderState,
}

impl AbsolutePlaceholder {
    /// Wrap an out-of-flow box whose static position is set.
    #[must_use]
    pub fn new(layout_box: LayoutBox) -> PlaceholderRef {
        Rc::new(RefCell::new(Self {
            state: PlaceholderState::Pending(layout_box),
        }))
    }

    /// The wrapped box: the pending box or its laid-out replacement.
    #[must_use]
    pub const fn layout_box(&self) -> &LayoutBox {
        match &self.state {
            PlaceholderState::Pending(layout_box) | PlaceholderState::Resolved(layout_box) => {
                layout_box
            }
        }
    }

    /// Whether the second layout phase has run.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self.state, PlaceholderState::Resolved(_))
    }

    /// `position: fixed`.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.layout_box().style.position == PositionType::Fixed
    }

    /// Move the placeholder.
    ///
    /// A pending box only has its own position; a resolved one moves with
    /// all its descendants.
    pub fn translate(&mut self, dx: f32, dy: f32, ignore_floats: bool) {
        match &mut self.state {
            PlaceholderState::Pending(layout_box) => {
                layout_box.dimensions.position_x += dx;
                layout_box.dimensions.position_y += dy;
            }
            PlaceholderState::Resolved(layout_box) => layout_box.translate(dx, dy, ignore_floats),
        }
    }

    /// Store the laid-out box.
    ///
    /// # Panics
    /// A placeholder is laid out once; a second call is a layout bug.
    pub fn set_laid_out_box(&mut self, layout_box: LayoutBox) {
        assert!(
            !self.is_resolved(),
            "placeholder for '{}' laid out twice",
            layout_box.element_tag
        );
        self.state = PlaceholderState::Resolved(layout_box);
    }

    /// The box to put in the final tree.
    #[must_use]
    pub fn into_box(self) -> LayoutBox {
        match self.state {
            PlaceholderState::Resolved(layout_box) => layout_box,
            PlaceholderState::Pending(layout_box) => {
                let _ = warn_once(
                    "Layout",
                    &format!(
                        "positioned box '{}' has no containing block and was not laid out",
                        layout_box.element_tag
                    ),
                );
                layout_box
            }
        }
    }
}

/// Lay out the box behind `placeholder` against `containing_block`.
///
/// The containing block is the content box of a page, or the padding box
/// of any other box.
///
/// # Panics
/// If the placeholder was already laid out.
pub fn absolute_layout(
    context: &mut LayoutContext<'_>,
    placeholder: &PlaceholderRef,
    containing_block: &LayoutBox,
    fixed_boxes: &mut Vec<PlaceholderRef>,
) {
    let pending = match &placeholder.borrow().state {
        PlaceholderState::Pending(layout_box) => layout_box.clone(),
        PlaceholderState::Resolved(layout_box) => {
            panic!("placeholder for '{}' laid out twice", layout_box.element_tag)
        }
    };
    #[cfg(feature = "layout-trace")]
    log::trace!(
        target: "quire::layout",
        "absolute layout of '{}' in {}",
        pending.element_tag,
        containing_block.kind.name()
    );
    let laid_out = absolute_box_layout(context, pending, containing_block, fixed_boxes);
    placeholder.borrow_mut().set_laid_out_box(laid_out);
}

fn absolute_box_layout(
    context: &mut LayoutContext<'_>,
    mut layout_box: LayoutBox,
    cb_box: &LayoutBox,
    fixed_boxes: &mut Vec<PlaceholderRef>,
) -> LayoutBox {
    // [§ 10.1](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
    // "If the element has 'position: absolute', the containing block is
    // established by the nearest ancestor with a 'position' of 'absolute',
    // 'relative' or 'fixed'... formed by the padding edge of the ancestor."
    let containing_block = if cb_box.is(Capabilities::PAGE) {
        ContainingBlock::content_of(cb_box)
    } else {
        ContainingBlock::padding_of(cb_box)
    };
    let cb_height = containing_block.height.unwrap_or(0.0);
    resolve_percentages(&mut layout_box, containing_block.width, Some(cb_height));
    resolve_position_percentages(&mut layout_box, containing_block.width, cb_height);

    context.create_block_formatting_context();
    let mut new_box = if layout_box.is(Capabilities::REPLACED) {
        absolute_replaced(layout_box, &containing_block)
    } else if layout_box.is(Capabilities::FLEX_CONTAINER) {
        absolute_flex(context, layout_box, &containing_block, fixed_boxes)
    } else if layout_box.is(Capabilities::PARENT) {
        absolute_block(context, layout_box, &containing_block, fixed_boxes)
    } else {
        panic!(
            "{} cannot be absolutely positioned; the tree builder blockifies it",
            layout_box.kind.name()
        )
    };
    context.finish_block_formatting_context(&mut new_box);
    new_box
}

/// Translation found by the width or height resolution for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisOffset {
    /// Shift from the static position.
    delta: f32,
    /// The size is only known after layout and must still be subtracted.
    minus_size: bool,
}

impl AxisOffset {
    const STATIC: Self = Self {
        delta: 0.0,
        minus_size: false,
    };

    const fn by(delta: f32) -> Self {
        Self {
            delta,
            minus_size: false,
        }
    }
}

/// [§ 10.3.7 Absolutely positioned, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#abs-non-replaced-width)
///
/// "The tentative used width is calculated (without 'min-width' and
/// 'max-width')... If the tentative used width is greater than 'max-width',
/// the rules above are applied again using the computed value of
/// 'max-width' as the computed value for 'width'."
fn absolute_width(
    context: &LayoutContext<'_>,
    layout_box: &mut LayoutBox,
    containing_block: &ContainingBlock,
) -> AxisOffset {
    let computed_margins = (layout_box.dimensions.margin.left, layout_box.dimensions.margin.right);
    let mut offset = tentative_absolute_width(context, layout_box, containing_block);
    if layout_box.width() > layout_box.max_width {
        layout_box.dimensions.width = AutoOr::Length(layout_box.max_width);
        (layout_box.dimensions.margin.left, layout_box.dimensions.margin.right) = computed_margins;
        offset = tentative_absolute_width(context, layout_box, containing_block);
    }
    if layout_box.width() < layout_box.min_width {
        layout_box.dimensions.width = AutoOr::Length(layout_box.min_width);
        (layout_box.dimensions.margin.left, layout_box.dimensions.margin.right) = computed_margins;
        offset = tentative_absolute_width(context, layout_box, containing_block);
    }
    offset
}

fn tentative_absolute_width(
    context: &LayoutContext<'_>,
    layout_box: &mut LayoutBox,
    containing_block: &ContainingBlock,
) -> AxisOffset {
    let d = &layout_box.dimensions;
    let (left, right, width) = (layout_box.insets.left, layout_box.insets.right, d.width);
    let (margin_l, margin_r) = (d.margin.left, d.margin.right);
    let padding_plus_borders = d.padding.horizontal() + d.border.horizontal();
    let cb_width = containing_block.width;
    let default_translate = containing_block.x - d.position_x;

    match (left, width, right) {
        // "If all three of 'left', 'width', and 'right' are 'auto': First set
        // any 'auto' values for 'margin-left' and 'margin-right' to 0."
        (AutoOr::Auto, AutoOr::Auto, AutoOr::Auto) => {
            layout_box.dimensions.zero_auto_margins(false, true);
            let margins = layout_box.dimensions.margin.left.px() + layout_box.dimensions.margin.right.px();
            let available = cb_width - (padding_plus_borders + margins);
            let width = shrink_to_fit(context, layout_box, available);
            layout_box.dimensions.width = width.into();
            AxisOffset::STATIC
        }
        // "If none of the three is 'auto': If both 'margin-left' and
        // 'margin-right' are 'auto', solve the equation under the extra
        // constraint that the two margins get equal values."
        (AutoOr::Length(left), AutoOr::Length(width), AutoOr::Length(right)) => {
            let width_for_margins = cb_width - (right + left + padding_plus_borders + width);
            let margin = &mut layout_box.dimensions.margin;
            match (margin_l.is_auto(), margin_r.is_auto()) {
                (true, true) if width_for_margins >= 0.0 => {
                    margin.left = AutoOr::Length(width_for_margins / 2.0);
                    margin.right = margin.left;
                }
                (true, true) => {
                    margin.left = AutoOr::Length(0.0);
                    margin.right = AutoOr::Length(width_for_margins);
                }
                (true, false) => margin.left = AutoOr::Length(width_for_margins - margin_r.px()),
                // Over-constrained: ignore 'right'.
                _ => margin.right = AutoOr::Length(width_for_margins - margin_l.px()),
            }
            AxisOffset::by(left + default_translate)
        }
        // "Otherwise, set 'auto' values for 'margin-left' and 'margin-right'
        // to 0, and pick the one of the following six rules that applies."
        (left, width, right) => {
            layout_box.dimensions.zero_auto_margins(false, true);
            let d = &layout_box.dimensions;
            let spacing = padding_plus_borders + d.margin.left.px() + d.margin.right.px();
            match (left, width, right) {
                // 1. "'left' and 'width' are 'auto' and 'right' is not 'auto',
                // then the width is shrink-to-fit. Then solve for 'left'."
                (AutoOr::Auto, AutoOr::Auto, AutoOr::Length(right)) => {
                    let width = shrink_to_fit(context, layout_box, cb_width - spacing - right);
                    layout_box.dimensions.width = width.into();
                    AxisOffset {
                        delta: cb_width - right - spacing + default_translate,
                        minus_size: true,
                    }
                }
                // 2. "'left' and 'right' are 'auto' and 'width' is not 'auto',
                // then ... set 'left' to the static position."
                (AutoOr::Auto, AutoOr::Length(_), AutoOr::Auto) => AxisOffset::STATIC,
                // 3. "'width' and 'right' are 'auto' and 'left' is not 'auto',
                // then the width is shrink-to-fit. Then solve for 'right'."
                (AutoOr::Length(left), AutoOr::Auto, AutoOr::Auto) => {
                    let width = shrink_to_fit(context, layout_box, cb_width - spacing - left);
                    layout_box.dimensions.width = width.into();
                    AxisOffset::by(left + default_translate)
                }
                // 4. "'left' is 'auto', 'width' and 'right' are not 'auto',
                // then solve for 'left'."
                (AutoOr::Auto, AutoOr::Length(width), AutoOr::Length(right)) => {
                    AxisOffset::by(cb_width + default_translate - right - spacing - width)
                }
                // 5. "'width' is 'auto', 'left' and 'right' are not 'auto',
                // then solve for 'width'."
                (AutoOr::Length(left), AutoOr::Auto, AutoOr::Length(right)) => {
                    layout_box.dimensions.width = AutoOr::Length(cb_width - right - left - spacing);
                    AxisOffset::by(left + default_translate)
                }
                // 6. "'right' is 'auto', 'left' and 'width' are not 'auto',
                // then solve for 'right'."
                (AutoOr::Length(left), AutoOr::Length(_), AutoOr::Auto) => {
                    AxisOffset::by(left + default_translate)
                }
                _ => unreachable!("all-auto and none-auto cases are handled above"),
            }
        }
    }
}

/// [§ 10.6.4 Absolutely positioned, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#abs-non-replaced-height)
///
/// "For absolutely positioned elements, the used values of the vertical
/// dimensions must satisfy this constraint: 'top' + 'margin-top' +
/// 'border-top-width' + 'padding-top' + 'height' + 'padding-bottom' +
/// 'border-bottom-width' + 'margin-bottom' + 'bottom' = height of
/// containing block."
fn absolute_height(layout_box: &mut LayoutBox, containing_block: &ContainingBlock) -> AxisOffset {
    let d = &layout_box.dimensions;
    let (top, bottom, height) = (layout_box.insets.top, layout_box.insets.bottom, d.height);
    let (margin_t, margin_b) = (d.margin.top, d.margin.bottom);
    let paddings_plus_borders = d.padding.vertical() + d.border.vertical();
    let cb_height = containing_block.height.unwrap_or(0.0);
    let default_translate = containing_block.y - d.position_y;

    match (top, height, bottom) {
        (AutoOr::Auto, AutoOr::Auto, AutoOr::Auto) => {
            // Keep the static position.
            layout_box.dimensions.zero_auto_margins(true, false);
            AxisOffset::STATIC
        }
        (AutoOr::Length(top), AutoOr::Length(height), AutoOr::Length(bottom)) => {
            let height_for_margins = cb_height - (top + bottom + paddings_plus_borders + height);
            let margin = &mut layout_box.dimensions.margin;
            match (margin_t.is_auto(), margin_b.is_auto()) {
                (true, true) => {
                    margin.top = AutoOr::Length(height_for_margins / 2.0);
                    margin.bottom = margin.top;
                }
                (true, false) => margin.top = AutoOr::Length(height_for_margins - margin_b.px()),
                _ => margin.bottom = AutoOr::Length(height_for_margins - margin_t.px()),
            }
            AxisOffset::by(top + default_translate)
        }
        (top, height, bottom) => {
            layout_box.dimensions.zero_auto_margins(true, false);
            let d = &layout_box.dimensions;
            let spacing = paddings_plus_borders + d.margin.top.px() + d.margin.bottom.px();
            match (top, height, bottom) {
                (AutoOr::Auto, AutoOr::Auto, AutoOr::Length(bottom)) => AxisOffset {
                    delta: cb_height - bottom - spacing + default_translate,
                    minus_size: true,
                },
                (AutoOr::Auto, AutoOr::Length(_), AutoOr::Auto) => AxisOffset::STATIC,
                (AutoOr::Length(top), AutoOr::Auto, AutoOr::Auto) => {
                    AxisOffset::by(top + default_translate)
                }
                (AutoOr::Auto, AutoOr::Length(height), AutoOr::Length(bottom)) => {
                    AxisOffset::by(cb_height + default_translate - bottom - spacing - height)
                }
                (AutoOr::Length(top), AutoOr::Auto, AutoOr::Length(bottom)) => {
                    layout_box.dimensions.height = AutoOr::Length(cb_height - bottom - top - spacing);
                    AxisOffset::by(top + default_translate)
                }
                (AutoOr::Length(top), AutoOr::Length(_), AutoOr::Auto) => {
                    AxisOffset::by(top + default_translate)
                }
                _ => unreachable!("all-auto and none-auto cases are handled above"),
            }
        }
    }
}

/// Move a laid-out box by the offsets found for both axes.
fn place_absolute(new_box: &mut LayoutBox, x: AxisOffset, y: AxisOffset) {
    let mut dx = x.delta;
    let mut dy = y.delta;
    if x.minus_size {
        dx -= new_box.width();
    }
    if y.minus_size {
        dy -= new_box.height();
    }
    new_box.translate(dx, dy, false);
}

fn absolute_block(
    context: &mut LayoutContext<'_>,
    mut layout_box: LayoutBox,
    containing_block: &ContainingBlock,
    fixed_boxes: &mut Vec<PlaceholderRef>,
) -> LayoutBox {
    let x = absolute_width(context, &mut layout_box, containing_block);
    let y = absolute_height(&mut layout_box, containing_block);

    // This box is the containing block of its absolute descendants.
    let mut absolute_boxes = Vec::new();
    let laid_out = block_container_layout(
        context,
        &layout_box,
        f32::INFINITY,
        None,
        false,
        &mut absolute_boxes,
        fixed_boxes,
    );
    let mut new_box = laid_out.new_box.unwrap_or(layout_box);
    for placeholder in &absolute_boxes {
        absolute_layout(context, placeholder, &new_box, fixed_boxes);
    }
    place_absolute(&mut new_box, x, y);
    new_box
}

fn absolute_flex(
    context: &mut LayoutContext<'_>,
    mut layout_box: LayoutBox,
    containing_block: &ContainingBlock,
    fixed_boxes: &mut Vec<PlaceholderRef>,
) -> LayoutBox {
    let x = absolute_width(context, &mut layout_box, containing_block);
    let y = absolute_height(&mut layout_box, containing_block);

    let mut absolute_boxes = Vec::new();
    let laid_out = flex_layout(
        context,
        &layout_box,
        f32::INFINITY,
        None,
        containing_block,
        false,
        &mut absolute_boxes,
        fixed_boxes,
    );
    let mut new_box = laid_out.new_box.unwrap_or(layout_box);
    for placeholder in &absolute_boxes {
        absolute_layout(context, placeholder, &new_box, fixed_boxes);
    }
    place_absolute(&mut new_box, x, y);
    new_box
}

/// [§ 10.3.8](https://www.w3.org/TR/CSS2/visudet.html#abs-replaced-width)
/// and [§ 10.6.5](https://www.w3.org/TR/CSS2/visudet.html#abs-replaced-height):
/// absolutely positioned replaced elements.
///
/// The size is already known, so only insets and margins are solved.
#[must_use]
pub fn absolute_replaced(mut layout_box: LayoutBox, containing_block: &ContainingBlock) -> LayoutBox {
    inline_replaced_box_width_height(&mut layout_box, containing_block);
    let cb = *containing_block;
    let cb_height = cb.height.unwrap_or(0.0);
    let ltr = layout_box.style.direction == Direction::Ltr;
    let insets = &mut layout_box.insets;
    let d = &mut layout_box.dimensions;

    // "If both 'left' and 'right' have the value 'auto', then if the
    // 'direction' property of the element establishing the static-position
    // containing block is 'ltr' set 'left' to the static position."
    if insets.left.is_auto() && insets.right.is_auto() {
        if ltr {
            insets.left = AutoOr::Length(d.position_x - cb.x);
        } else {
            insets.right = AutoOr::Length(cb.x + cb.width - d.position_x);
        }
    }
    if insets.left.is_auto() || insets.right.is_auto() {
        d.zero_auto_margins(false, true);
        let remaining = cb.width - d.margin_width();
        if insets.left.is_auto() {
            insets.left = AutoOr::Length(remaining - insets.right.px());
        }
        if insets.right.is_auto() {
            insets.right = AutoOr::Length(remaining - insets.left.px());
        }
    } else if d.margin.left.is_auto() || d.margin.right.is_auto() {
        let remaining = cb.width - (d.border_width() + insets.left.px() + insets.right.px());
        match (d.margin.left.is_auto(), d.margin.right.is_auto()) {
            (true, true) => {
                // "If ... the two margins are both 'auto', solve the equation
                // under the extra constraint that the two margins must get
                // equal values, unless this would make them negative."
                let (left, right) = if remaining >= 0.0 {
                    let half = (remaining / 2.0).floor();
                    (half, half)
                } else if ltr {
                    (0.0, remaining)
                } else {
                    (remaining, 0.0)
                };
                d.margin.left = AutoOr::Length(left);
                d.margin.right = AutoOr::Length(right);
            }
            (true, false) => d.margin.left = AutoOr::Length(remaining),
            _ => d.margin.right = AutoOr::Length(remaining),
        }
    } else if ltr {
        // Over-constrained: ignore 'right' (or 'left' in right-to-left).
        insets.right = AutoOr::Length(cb.width - (d.margin_width() + insets.left.px()));
    } else {
        insets.left = AutoOr::Length(cb.width - (d.margin_width() + insets.right.px()));
    }

    // "If both 'top' and 'bottom' have the value 'auto', replace 'top' with
    // the element's static position."
    if insets.top.is_auto() && insets.bottom.is_auto() {
        insets.top = AutoOr::Length(d.position_y - cb.y);
    }
    if insets.top.is_auto() || insets.bottom.is_auto() {
        d.zero_auto_margins(true, false);
        let remaining = cb_height - d.margin_height();
        if insets.top.is_auto() {
            insets.top = AutoOr::Length(remaining - insets.bottom.px());
        }
        if insets.bottom.is_auto() {
            insets.bottom = AutoOr::Length(remaining - insets.top.px());
        }
    } else if d.margin.top.is_auto() || d.margin.bottom.is_auto() {
        let remaining = cb_height - (d.border_height() + insets.top.px() + insets.bottom.px());
        match (d.margin.top.is_auto(), d.margin.bottom.is_auto()) {
            (true, true) => {
                let half = (remaining / 2.0).floor();
                d.margin.top = AutoOr::Length(half);
                d.margin.bottom = AutoOr::Length(half);
            }
            (true, false) => d.margin.top = AutoOr::Length(remaining),
            _ => d.margin.bottom = AutoOr::Length(remaining),
        }
    } else {
        // Over-constrained: ignore 'bottom'.
        insets.bottom = AutoOr::Length(cb_height - (d.margin_height() + insets.top.px()));
    }

    // Replaced boxes have no children to move along.
    d.position_x = cb.x + insets.left.px();
    d.position_y = cb.y + insets.top.px();
    layout_box
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::box_model::EdgeSizes;
    use crate::layout::values::AutoEdgeSizes;
    use crate::layout::BoxKind;
    use crate::style::{ComputedStyle, DisplayValue};
    use crate::text::ApproximateShaper;

    fn positioned(kind: BoxKind) -> LayoutBox {
        let style = ComputedStyle {
            position: PositionType::Absolute,
            ..ComputedStyle::with_display(DisplayValue::block())
        };
        LayoutBox::new(kind, "div", Rc::new(style))
    }

    fn cb(width: f32, height: f32) -> ContainingBlock {
        ContainingBlock {
            x: 10.0,
            y: 20.0,
            width,
            height: Some(height),
            direction: Direction::Ltr,
        }
    }

    #[test]
    fn test_pending_translate_moves_only_the_box() {
        let mut inner = positioned(BoxKind::Block);
        let child = positioned(BoxKind::Block);
        inner.children.push(child.into());
        let placeholder = AbsolutePlaceholder::new(inner);
        placeholder.borrow_mut().translate(5.0, 7.0, false);
        let p = placeholder.borrow();
        assert_eq!(p.layout_box().position_x(), 5.0);
        assert_eq!(p.layout_box().position_y(), 7.0);
        assert_eq!(p.layout_box().children[0].position_x(), 0.0);
    }

    #[test]
    fn test_resolved_translate_moves_descendants() {
        let placeholder = AbsolutePlaceholder::new(positioned(BoxKind::Block));
        let mut laid_out = positioned(BoxKind::Block);
        laid_out.children.push(positioned(BoxKind::Block).into());
        placeholder.borrow_mut().set_laid_out_box(laid_out);
        placeholder.borrow_mut().translate(3.0, 0.0, false);
        assert_eq!(placeholder.borrow().layout_box().children[0].position_x(), 3.0);
    }

    #[test]
    #[should_panic(expected = "laid out twice")]
    fn test_double_resolution_panics() {
        let placeholder = AbsolutePlaceholder::new(positioned(BoxKind::Block));
        placeholder.borrow_mut().set_laid_out_box(positioned(BoxKind::Block));
        placeholder.borrow_mut().set_laid_out_box(positioned(BoxKind::Block));
    }

    #[test]
    fn test_width_all_definite_centers_auto_margins() {
        let shaper = ApproximateShaper::default();
        let context = LayoutContext::new(&shaper);
        let mut b = positioned(BoxKind::Block);
        b.insets.left = AutoOr::Length(10.0);
        b.insets.right = AutoOr::Length(10.0);
        b.dimensions.width = AutoOr::Length(60.0);
        b.dimensions.padding = EdgeSizes::uniform(5.0);
        b.dimensions.margin.left = AutoOr::Auto;
        b.dimensions.margin.right = AutoOr::Auto;
        let offset = absolute_width(&context, &mut b, &cb(100.0, 50.0));
        assert_eq!(b.dimensions.margin.left, AutoOr::Length(5.0));
        assert_eq!(b.dimensions.margin.right, AutoOr::Length(5.0));
        assert_eq!(offset, AxisOffset::by(20.0));
    }

    #[test]
    fn test_width_solved_between_insets_respects_max_width() {
        let shaper = ApproximateShaper::default();
        let context = LayoutContext::new(&shaper);
        let mut b = positioned(BoxKind::Block);
        b.insets.left = AutoOr::Length(10.0);
        b.insets.right = AutoOr::Length(20.0);
        b.dimensions.margin = AutoEdgeSizes::uniform(0.0);
        b.max_width = 40.0;
        let offset = absolute_width(&context, &mut b, &cb(100.0, 50.0));
        // Retried with width = max-width: over-constrained, 'right' ignored.
        assert_eq!(b.dimensions.width, AutoOr::Length(40.0));
        assert_eq!(b.dimensions.margin.right, AutoOr::Length(30.0));
        assert_eq!(offset, AxisOffset::by(20.0));
    }

    #[test]
    fn test_height_from_bottom_subtracts_size_later() {
        let mut b = positioned(BoxKind::Block);
        b.dimensions.position_y = 30.0;
        b.insets.bottom = AutoOr::Length(5.0);
        let offset = absolute_height(&mut b, &cb(100.0, 50.0));
        assert_eq!(
            offset,
            AxisOffset {
                delta: 50.0 - 5.0 + (20.0 - 30.0),
                minus_size: true
            }
        );
    }
}
