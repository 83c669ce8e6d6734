//! Block-level layout.
//!
//! [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
//!
//! "In a block formatting context, boxes are laid out one after the other,
//! vertically, beginning at the top of a containing block. The vertical
//! distance between two sibling boxes is determined by the 'margin'
//! properties. Vertical margins between adjacent block-level boxes in a
//! block formatting context collapse."

use std::rc::Rc;

use quire_common::warning::warn_once;

use crate::style::{AutoLength, ComputedStyle, Direction, PositionType};

use super::absolute::{AbsolutePlaceholder, PlaceholderRef, absolute_layout};
use super::context::{ContainingBlock, LayoutContext};
use super::flex::flex_layout;
use super::float::{avoid_collisions, float_layout, get_clearance};
use super::inline::atomic::inline_replaced_box_width_height;
use super::inline::iter_line_boxes;
use super::layout_box::{BoxNode, Capabilities, LayoutBox};
use super::percentages::{resolve_percentages, resolve_position_percentages};
use super::skip_stack::SkipStack;
use super::values::AutoOr;

/// Result of laying out a block container or a block-level box.
#[derive(Debug, Default)]
pub struct BlockLayout {
    /// The laid-out box, `None` when nothing of it fits on the page.
    pub new_box: Option<LayoutBox>,
    /// Where to resume on the next page, `None` when the box is finished.
    pub resume_at: Option<SkipStack>,
}

/// [§ 8.3.1 Collapsing margins](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
///
/// "When two or more margins collapse, the resulting margin width is the
/// maximum of the collapsing margins' widths. In the case of negative
/// margins, the maximum of the absolute values of the negative adjoining
/// margins is deducted from the maximum of the positive adjoining margins.
/// If there are no positive margins, the maximum of the absolute values
/// of the adjoining margins is deducted from zero."
#[must_use]
pub fn collapse_two_margins(a: f32, b: f32) -> f32 {
    if a >= 0.0 && b >= 0.0 {
        a.max(b)
    } else if a < 0.0 && b < 0.0 {
        a.min(b)
    } else {
        a + b
    }
}

/// Marks of the output lists, to drop what a rejected child added.
struct Marks {
    absolute: usize,
    fixed: usize,
    shapes: usize,
}

impl Marks {
    fn take(context: &LayoutContext<'_>, absolute: &[PlaceholderRef], fixed: &[PlaceholderRef]) -> Self {
        Self {
            absolute: absolute.len(),
            fixed: fixed.len(),
            shapes: context.excluded_shapes.len(),
        }
    }

    fn rollback(
        &self,
        context: &mut LayoutContext<'_>,
        absolute: &mut Vec<PlaceholderRef>,
        fixed: &mut Vec<PlaceholderRef>,
    ) {
        absolute.truncate(self.absolute);
        fixed.truncate(self.fixed);
        context.excluded_shapes.truncate(self.shapes);
    }
}

/// Lay out a block-level box whose margin-box position is already set.
///
/// Resolves the used width (§ 10.3.3 and § 10.4), lays out the contents
/// and applies relative positioning.
#[allow(clippy::too_many_arguments)]
pub fn block_level_layout(
    context: &mut LayoutContext<'_>,
    layout_box: &LayoutBox,
    max_position_y: f32,
    skip_stack: Option<&SkipStack>,
    containing_block: &ContainingBlock,
    page_is_empty: bool,
    absolute_boxes: &mut Vec<PlaceholderRef>,
    fixed_boxes: &mut Vec<PlaceholderRef>,
) -> BlockLayout {
    let mut block = layout_box.clone();
    resolve_percentages(&mut block, containing_block.width, containing_block.height);
    // "If 'margin-top', or 'margin-bottom' are 'auto', their used value is 0."
    block.dimensions.zero_auto_margins(true, false);

    if block.is(Capabilities::BLOCK_REPLACED) {
        inline_replaced_box_width_height(&mut block, containing_block);
        block_level_width(&mut block, containing_block);
        relative_positioning(&mut block, containing_block);
        return BlockLayout {
            new_box: Some(block),
            resume_at: None,
        };
    }

    block_level_width(&mut block, containing_block);

    let establishes_context = block.establishes_formatting_context();
    if establishes_context && !context.excluded_shapes.is_empty() {
        // "The border box of ... an element in the normal flow that
        // establishes a new block formatting context ... must not overlap the
        // margin box of any floats in the same block formatting context."
        let (position_x, position_y, available_width) =
            avoid_collisions(&context.excluded_shapes, &block, containing_block, false);
        if block.style.width.is_auto() {
            let d = &block.dimensions;
            let width = available_width - d.border.horizontal() - d.padding.horizontal();
            block.dimensions.width = width.max(0.0).into();
        }
        block.dimensions.position_x = position_x;
        block.dimensions.position_y = position_y;
    }

    if establishes_context {
        context.create_block_formatting_context();
    }
    let laid_out = if block.is(Capabilities::FLEX_CONTAINER) {
        let flex = flex_layout(
            context,
            &block,
            max_position_y,
            skip_stack,
            containing_block,
            page_is_empty,
            absolute_boxes,
            fixed_boxes,
        );
        BlockLayout {
            new_box: flex.new_box,
            resume_at: flex.resume_at,
        }
    } else {
        if block.is(Capabilities::TABLE | Capabilities::TABLE_ROW_GROUP | Capabilities::TABLE_ROW) {
            let _ = warn_once(
                "Layout",
                &format!(
                    "table layout is not supported; '{}' is stacked like a block",
                    block.element_tag
                ),
            );
        }
        block_container_layout(
            context,
            &block,
            max_position_y,
            skip_stack,
            page_is_empty,
            absolute_boxes,
            fixed_boxes,
        )
    };

    let BlockLayout { new_box, resume_at } = laid_out;
    let new_box = new_box.map(|mut new_box| {
        if establishes_context {
            context.finish_block_formatting_context(&mut new_box);
        }
        relative_positioning(&mut new_box, containing_block);
        new_box
    });
    if new_box.is_none() && establishes_context {
        // Drop the formatting context opened for a box that did not fit.
        let mut discarded = block;
        context.finish_block_formatting_context(&mut discarded);
    }
    BlockLayout { new_box, resume_at }
}

/// [§ 10.3.3 Block-level, non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
///
/// "The following constraints must hold among the used values of the other
/// properties:
///
///   'margin-left' + 'border-left-width' + 'padding-left' + 'width' +
///   'padding-right' + 'border-right-width' + 'margin-right'
///   = width of containing block"
///
/// Then [§ 10.4](https://www.w3.org/TR/CSS2/visudet.html#min-max-widths):
/// the rules run again with the clamped width when `max-width` or
/// `min-width` is violated.
pub fn block_level_width(layout_box: &mut LayoutBox, containing_block: &ContainingBlock) {
    let specified_margin = layout_box.dimensions.margin;
    solve_block_width(layout_box, containing_block);

    // "If the tentative used width is greater than 'max-width', the rules
    // above are applied again using the computed value of 'max-width' as
    // the computed value for 'width'."
    if layout_box.width() > layout_box.max_width {
        layout_box.dimensions.margin = specified_margin;
        layout_box.dimensions.width = layout_box.max_width.into();
        solve_block_width(layout_box, containing_block);
    }
    // "If the resulting width is smaller than 'min-width', the rules above
    // are applied again using the value of 'min-width' as the computed
    // value for 'width'."
    if layout_box.width() < layout_box.min_width {
        layout_box.dimensions.margin = specified_margin;
        layout_box.dimensions.width = layout_box.min_width.into();
        solve_block_width(layout_box, containing_block);
    }

    #[cfg(feature = "layout-trace")]
    log::trace!(
        target: "quire::layout",
        "block width of '{}': {}",
        layout_box.element_tag,
        layout_box.width()
    );
}

fn solve_block_width(layout_box: &mut LayoutBox, containing_block: &ContainingBlock) {
    let d = &mut layout_box.dimensions;
    let cb_width = containing_block.width;
    let edges = d.border.horizontal() + d.padding.horizontal();
    let mut margin_left = d.margin.left;
    let mut margin_right = d.margin.right;

    // "If 'width' is not 'auto' and [the sum] is larger than the width of the
    // containing block, then any 'auto' values for 'margin-left' or
    // 'margin-right' are, for the following rules, treated as zero."
    if let AutoOr::Length(width) = d.width
        && edges + width + margin_left.px() + margin_right.px() > cb_width
    {
        margin_left = AutoOr::Length(margin_left.px());
        margin_right = AutoOr::Length(margin_right.px());
    }

    let (width, margin_left, margin_right) = match (d.width, margin_left, margin_right) {
        // "If 'width' is set to 'auto', any other 'auto' values become '0'
        // and 'width' follows from the resulting equality."
        (AutoOr::Auto, left, right) => {
            let (left, right) = (left.px(), right.px());
            (cb_width - left - right - edges, left, right)
        }
        // "If both 'margin-left' and 'margin-right' are 'auto', their used
        // values are equal."
        (AutoOr::Length(width), AutoOr::Auto, AutoOr::Auto) => {
            let margin = (cb_width - width - edges) / 2.0;
            (width, margin, margin)
        }
        // "If there is exactly one value specified as 'auto', its used value
        // follows from the equality."
        (AutoOr::Length(width), AutoOr::Auto, AutoOr::Length(right)) => {
            (width, cb_width - width - right - edges, right)
        }
        (AutoOr::Length(width), AutoOr::Length(left), AutoOr::Auto) => {
            (width, left, cb_width - width - left - edges)
        }
        // "If all of the above have a computed value other than 'auto', the
        // values are said to be 'over-constrained'... If the 'direction'
        // property of the containing block has the value 'ltr', the specified
        // value of 'margin-right' is ignored... If 'direction' is 'rtl', this
        // happens to 'margin-left' instead."
        (AutoOr::Length(width), AutoOr::Length(left), AutoOr::Length(right)) => {
            match containing_block.direction {
                Direction::Ltr => (width, left, cb_width - width - left - edges),
                Direction::Rtl => (width, cb_width - width - right - edges, right),
            }
        }
    };

    d.width = width.into();
    d.margin.left = margin_left.into();
    d.margin.right = margin_right.into();
}

/// [§ 9.4.3 Relative positioning](https://www.w3.org/TR/CSS2/visuren.html#relative-positioning)
///
/// "Once a box has been laid out according to the normal flow or floated,
/// it may be shifted relative to this position."
pub fn relative_positioning(layout_box: &mut LayoutBox, containing_block: &ContainingBlock) {
    if layout_box.style.position != PositionType::Relative {
        return;
    }
    resolve_position_percentages(layout_box, containing_block.width, containing_block.height.unwrap_or(0.0));
    let insets = layout_box.insets;
    // "If neither 'left' nor 'right' is 'auto', the position is
    // over-constrained, and one of them has to be ignored."
    let dx = match (insets.left, insets.right, containing_block.direction) {
        (AutoOr::Length(left), AutoOr::Auto, _) | (AutoOr::Length(left), _, Direction::Ltr) => left,
        (_, AutoOr::Length(right), _) => -right,
        (AutoOr::Auto, AutoOr::Auto, _) => 0.0,
    };
    // "If both 'top' and 'bottom' are 'auto', their used values are both
    // '0'... If neither of them is 'auto', 'bottom' is ignored."
    let dy = match (insets.top, insets.bottom) {
        (AutoOr::Length(top), _) => top,
        (AutoOr::Auto, AutoOr::Length(bottom)) => -bottom,
        (AutoOr::Auto, AutoOr::Auto) => 0.0,
    };
    layout_box.translate(dx, dy, false);
}

fn used_margin_top(style: &ComputedStyle, cb_width: f32) -> f32 {
    match style.margin_top {
        AutoLength::Auto => 0.0,
        AutoLength::Length(length) => length.resolve(cb_width),
    }
}

/// Whether the top margin of the first in-flow child collapses with the top
/// margin of `layout_box`.
fn collapses_top_with_first_child(layout_box: &LayoutBox) -> bool {
    let d = &layout_box.dimensions;
    layout_box.is(Capabilities::BLOCK)
        && !layout_box.establishes_formatting_context()
        && d.border.top == 0.0
        && d.padding.top == 0.0
}

/// Whether the bottom margin of the last in-flow child collapses with the
/// bottom margin of `layout_box`.
fn collapses_bottom_with_last_child(layout_box: &LayoutBox) -> bool {
    let d = &layout_box.dimensions;
    layout_box.is(Capabilities::BLOCK)
        && !layout_box.establishes_formatting_context()
        && layout_box.style.height.is_auto()
        && d.border.bottom == 0.0
        && d.padding.bottom == 0.0
}

/// Lay out the children of a block container whose position, width and
/// horizontal margins are set.
///
/// Children are stacked from the top of the content box, line boxes are
/// cut into lines, floats and out-of-flow boxes are collected. Content
/// whose bottom would pass `max_position_y` is left for the next page and
/// reported through `resume_at`, unless it is the first thing on an empty
/// page.
///
/// The caller creates the block formatting context when the box
/// establishes one.
#[allow(clippy::too_many_arguments, clippy::too_many_lines)]
pub fn block_container_layout(
    context: &mut LayoutContext<'_>,
    layout_box: &LayoutBox,
    max_position_y: f32,
    skip_stack: Option<&SkipStack>,
    page_is_empty: bool,
    absolute_boxes: &mut Vec<PlaceholderRef>,
    fixed_boxes: &mut Vec<PlaceholderRef>,
) -> BlockLayout {
    // STEP 1: A relatively positioned box is the containing block of the
    // absolutely positioned boxes found inside it.
    let mut own_absolute_boxes = Vec::new();
    let is_relative = layout_box.is_relatively_positioned();

    // A resumed box has no top decoration.
    let mut new_box = layout_box.copy_with_children(Vec::new(), skip_stack.is_none(), true);
    new_box.dimensions.zero_auto_margins(true, false);

    let (skip, mut child_skip_stack) = skip_stack.map_or((0, None), SkipStack::split);
    let mut new_children: Vec<BoxNode> = Vec::new();
    let mut resume_at: Option<SkipStack> = None;
    let mut page_is_empty = page_is_empty;

    let collapse_top = skip_stack.is_none() && collapses_top_with_first_child(&new_box);
    let mut first_in_flow = true;
    let mut pending_margin: Option<f32> = None;
    let mut position_y = new_box.dimensions.content_box_y();
    let mut containing_block = ContainingBlock::content_of(&new_box);

    for (index, node) in layout_box.children.iter().enumerate().skip(skip) {
        let child_skip = child_skip_stack.take();
        let BoxNode::Box(child) = node else {
            new_children.push(node.clone());
            continue;
        };

        let sinks = if is_relative { &mut own_absolute_boxes } else { &mut *absolute_boxes };

        // STEP 2: Out-of-flow boxes leave a placeholder at their static
        // position.
        if child.is_absolutely_positioned() {
            let mut static_box = child.clone();
            static_box.dimensions.position_x = containing_block.x;
            static_box.dimensions.position_y = position_y + pending_margin.unwrap_or(0.0);
            let is_fixed = static_box.style.position == PositionType::Fixed;
            let placeholder = AbsolutePlaceholder::new(static_box);
            if is_fixed {
                fixed_boxes.push(Rc::clone(&placeholder));
            } else {
                sinks.push(Rc::clone(&placeholder));
            }
            new_children.push(BoxNode::Placeholder(placeholder));
            continue;
        }

        if child.is_floated() {
            let marks = Marks::take(context, sinks, fixed_boxes);
            let mut float_box = child.clone();
            float_box.dimensions.position_x = containing_block.x;
            float_box.dimensions.position_y = position_y + pending_margin.unwrap_or(0.0);
            let float_box = float_layout(context, float_box, &containing_block, sinks, fixed_boxes);
            let bottom = float_box.position_y() + float_box.margin_height();
            if bottom > max_position_y && !page_is_empty {
                marks.rollback(context, sinks, fixed_boxes);
                resume_at = Some(SkipStack::leaf(index));
                break;
            }
            new_children.push(BoxNode::Box(float_box));
            continue;
        }

        // STEP 3: Line boxes. Margins do not collapse through them.
        if child.is(Capabilities::LINE) {
            if first_in_flow && collapse_top {
                // Nothing to collapse with: the parent keeps its margin.
                first_in_flow = false;
            }
            position_y += pending_margin.take().unwrap_or(0.0);
            let first_letter_style = (index == 0).then(|| layout_box.first_letter_style.clone()).flatten();
            let mut lines =
                iter_line_boxes(child, position_y, child_skip.cloned(), &containing_block, first_letter_style);
            loop {
                let line_skip = lines.skip_stack().cloned();
                let marks = Marks::take(context, sinks, fixed_boxes);
                let Some(laid_out) = lines.next_line(context, sinks, fixed_boxes) else {
                    break;
                };
                let bottom = laid_out.line.position_y() + laid_out.line.height();
                if bottom > max_position_y && !page_is_empty {
                    marks.rollback(context, sinks, fixed_boxes);
                    resume_at = Some(SkipStack::nested(index, line_skip));
                    break;
                }
                let mut line = laid_out.line;
                for line_child in &mut line.children {
                    if let BoxNode::Box(line_child) = line_child
                        && line_child.is_in_normal_flow()
                    {
                        relative_positioning(line_child, &containing_block);
                    }
                }
                position_y = bottom;
                page_is_empty = false;
                new_children.push(BoxNode::Box(line));
            }
            first_in_flow = false;
            if resume_at.is_some() {
                break;
            }
            continue;
        }

        assert!(
            !child.is(Capabilities::INLINE_LEVEL),
            "inline-level {} '{}' outside of a line box",
            child.kind.name(),
            child.element_tag
        );

        // STEP 4: Block-level boxes, with collapsing margins.
        let child_margin_top = used_margin_top(&child.style, containing_block.width);
        let mut collapsed_margin = match pending_margin.take() {
            Some(previous) => collapse_two_margins(previous, child_margin_top),
            None => child_margin_top,
        };
        let mut placed = child.clone();
        placed.dimensions.position_x = containing_block.x;
        placed.dimensions.position_y = position_y;

        let has_clearance = child.style.clear.is_some()
            && get_clearance(&context.excluded_shapes, &placed, collapsed_margin).is_some();
        if first_in_flow && collapse_top && !has_clearance {
            // "The top margin of a box collapses with its first in-flow
            // block-level child's top margin if the box has no top border,
            // no top padding, and the child has no clearance."
            let parent_margin = new_box.dimensions.margin.top.px();
            new_box.dimensions.margin.top = collapse_two_margins(parent_margin, child_margin_top).into();
            position_y = new_box.dimensions.content_box_y();
            containing_block = ContainingBlock::content_of(&new_box);
            collapsed_margin = 0.0;
        }
        first_in_flow = false;

        placed.dimensions.position_x = containing_block.x;
        placed.dimensions.position_y = position_y + collapsed_margin - child_margin_top;
        if let Some(clearance) = get_clearance(&context.excluded_shapes, &placed, child_margin_top) {
            // "Clearance inhibits margin collapsing and acts as spacing
            // above the margin-top of an element."
            placed.dimensions.position_y += clearance;
        }

        let marks = Marks::take(context, sinks, fixed_boxes);
        let laid_out = block_level_layout(
            context,
            &placed,
            max_position_y,
            child_skip,
            &containing_block,
            page_is_empty,
            sinks,
            fixed_boxes,
        );
        let Some(new_child) = laid_out.new_box else {
            marks.rollback(context, sinks, fixed_boxes);
            resume_at = Some(SkipStack::leaf(index));
            break;
        };

        let border_bottom = new_child.position_y() + new_child.margin_height() - new_child.dimensions.margin.bottom.px();
        if laid_out.resume_at.is_none() && border_bottom > max_position_y && !page_is_empty {
            marks.rollback(context, sinks, fixed_boxes);
            resume_at = Some(SkipStack::leaf(index));
            break;
        }

        #[cfg(feature = "layout-trace")]
        log::trace!(
            target: "quire::layout",
            "block child {index} '{}' at y={} height={}",
            new_child.element_tag,
            new_child.position_y(),
            new_child.height()
        );

        position_y = border_bottom;
        pending_margin = Some(new_child.dimensions.margin.bottom.px());
        page_is_empty = false;
        new_children.push(BoxNode::Box(new_child));
        if let Some(child_resume) = laid_out.resume_at {
            resume_at = Some(SkipStack::nested(index, Some(child_resume)));
            break;
        }
    }

    // STEP 5: Nothing fits: the whole box moves to the next page.
    if resume_at.is_some() && !page_is_empty && !new_children.iter().any(BoxNode::is_in_normal_flow) {
        return BlockLayout::default();
    }

    // STEP 6: The last bottom margin either collapses with ours or stays
    // inside the box.
    if let Some(margin) = pending_margin {
        if resume_at.is_none() && collapses_bottom_with_last_child(&new_box) {
            let own = new_box.dimensions.margin.bottom.px();
            new_box.dimensions.margin.bottom = collapse_two_margins(own, margin).into();
        } else {
            position_y += margin;
        }
    }
    if resume_at.is_some() {
        new_box.remove_decoration(false, true);
    }

    // STEP 7: [§ 10.6.3](https://www.w3.org/TR/CSS2/visudet.html#normal-block)
    // "If 'height' is 'auto', the height depends on whether the element has
    // any block-level children and whether it has padding or borders."
    if new_box.dimensions.height.is_auto() {
        let content_height = position_y - new_box.dimensions.content_box_y();
        let height = content_height.min(new_box.max_height).max(new_box.min_height);
        new_box.dimensions.height = height.max(0.0).into();
    }
    new_box.children = new_children;

    for placeholder in &own_absolute_boxes {
        absolute_layout(context, placeholder, &new_box, fixed_boxes);
    }

    BlockLayout {
        new_box: Some(new_box),
        resume_at,
    }
}

/// Absolute y of the first (or last) in-flow baseline inside `layout_box`.
///
/// [§ 8.5 Determining the baseline](https://www.w3.org/TR/css-align-3/#baseline-export)
///
/// Table captions are skipped. A flex container takes its baseline from its
/// first item.
#[must_use]
pub fn find_in_flow_baseline(layout_box: &LayoutBox, last: bool) -> Option<f32> {
    if layout_box.is(Capabilities::LINE) {
        return Some(layout_box.position_y() + layout_box.baseline());
    }
    if !layout_box.is(Capabilities::PARENT) || layout_box.is(Capabilities::TABLE_CAPTION) {
        return None;
    }
    let in_flow = |child: &&LayoutBox| child.is_in_normal_flow() && !child.is(Capabilities::TABLE_CAPTION);
    let mut children = layout_box.children.iter().filter_map(BoxNode::as_box).filter(in_flow);
    if layout_box.is(Capabilities::FLEX_CONTAINER) {
        return children.next().and_then(|item| find_in_flow_baseline(item, false));
    }
    if last {
        children.rev().find_map(|child| find_in_flow_baseline(child, last))
    } else {
        children.find_map(|child| find_in_flow_baseline(child, last))
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;
    use crate::layout::BoxKind;
    use crate::style::{ClearSide, DisplayValue, FloatSide, LengthValue};
    use crate::text::ApproximateShaper;

    fn style(f: impl FnOnce(&mut ComputedStyle)) -> Rc<ComputedStyle> {
        let mut style = ComputedStyle {
            font_size: 10.0,
            ..ComputedStyle::with_display(DisplayValue::block())
        };
        f(&mut style);
        Rc::new(style)
    }

    fn block(style: Rc<ComputedStyle>, children: Vec<LayoutBox>) -> LayoutBox {
        LayoutBox::new(BoxKind::Block, "div", style).with_children(children).unwrap()
    }

    fn paragraph(text: &str) -> LayoutBox {
        let p = style(|_| {});
        let line = LayoutBox::new(BoxKind::Line, "p", Rc::clone(&p))
            .with_children([LayoutBox::text("p", Rc::clone(&p), text).unwrap()])
            .unwrap();
        block(p, vec![line])
    }

    fn cb(width: f32) -> ContainingBlock {
        ContainingBlock {
            x: 0.0,
            y: 0.0,
            width,
            height: None,
            direction: Direction::Ltr,
        }
    }

    fn layout(root: &LayoutBox, width: f32, max_position_y: f32, skip: Option<&SkipStack>) -> BlockLayout {
        let shaper = ApproximateShaper::default();
        let mut context = LayoutContext::new(&shaper);
        let (mut absolute, mut fixed) = (Vec::new(), Vec::new());
        block_level_layout(
            &mut context,
            root,
            max_position_y,
            skip,
            &cb(width),
            true,
            &mut absolute,
            &mut fixed,
        )
    }

    fn child(b: &LayoutBox, index: usize) -> &LayoutBox {
        b.children[index].as_box().unwrap()
    }

    #[test]
    fn test_collapse_two_margins() {
        assert_eq!(collapse_two_margins(10.0, 20.0), 20.0);
        assert_eq!(collapse_two_margins(-10.0, -20.0), -20.0);
        assert_eq!(collapse_two_margins(20.0, -5.0), 15.0);
    }

    #[quickcheck]
    fn prop_collapse_is_symmetric(a: i16, b: i16) -> bool {
        let (a, b) = (f32::from(a), f32::from(b));
        collapse_two_margins(a, b) == collapse_two_margins(b, a)
    }

    #[test]
    fn test_auto_width_fills_containing_block() {
        let root = block(style(|s| s.margin_left = AutoLength::px(10.0)), vec![]);
        let new_box = layout(&root, 200.0, f32::INFINITY, None).new_box.unwrap();
        assert_eq!(new_box.width(), 190.0);
        assert_eq!(new_box.height(), 0.0);
    }

    #[test]
    fn test_auto_margins_center() {
        let root = block(
            style(|s| {
                s.width = AutoLength::px(100.0);
                s.margin_left = AutoLength::Auto;
                s.margin_right = AutoLength::Auto;
            }),
            vec![],
        );
        let new_box = layout(&root, 200.0, f32::INFINITY, None).new_box.unwrap();
        assert_eq!(new_box.dimensions.margin.left, AutoOr::Length(50.0));
        assert_eq!(new_box.dimensions.margin.right, AutoOr::Length(50.0));
    }

    #[test]
    fn test_over_constrained_ignores_end_margin() {
        let root = block(
            style(|s| {
                s.width = AutoLength::px(100.0);
                s.margin_left = AutoLength::px(10.0);
                s.margin_right = AutoLength::px(10.0);
            }),
            vec![],
        );
        let ltr = layout(&root, 200.0, f32::INFINITY, None).new_box.unwrap();
        assert_eq!(ltr.dimensions.margin.right, AutoOr::Length(90.0));

        let mut rtl_cb = cb(200.0);
        rtl_cb.direction = Direction::Rtl;
        let mut rtl = root.clone();
        resolve_percentages(&mut rtl, 200.0, None);
        block_level_width(&mut rtl, &rtl_cb);
        assert_eq!(rtl.dimensions.margin.left, AutoOr::Length(90.0));
        assert_eq!(rtl.dimensions.margin.right, AutoOr::Length(10.0));
    }

    #[test]
    fn test_max_width_clamps() {
        let root = block(style(|s| s.max_width = Some(LengthValue::Px(50.0))), vec![]);
        let new_box = layout(&root, 200.0, f32::INFINITY, None).new_box.unwrap();
        assert_eq!(new_box.width(), 50.0);
    }

    #[test]
    fn test_lines_give_auto_height() {
        let root = block(style(|_| {}), vec![paragraph("aa bb cc")]);
        let new_box = layout(&root, 20.0, f32::INFINITY, None).new_box.unwrap();
        let p = child(&new_box, 0);
        assert_eq!(p.children.len(), 3);
        assert_eq!(new_box.height(), 36.0);
    }

    #[test]
    fn test_sibling_margins_collapse() {
        let first = block(style(|s| s.margin_bottom = AutoLength::px(20.0)), vec![paragraph("a")]);
        let second = block(style(|s| s.margin_top = AutoLength::px(10.0)), vec![paragraph("b")]);
        let root = block(style(|s| s.border_top_width = 1.0), vec![first, second]);
        let new_box = layout(&root, 100.0, f32::INFINITY, None).new_box.unwrap();
        let second = child(&new_box, 1);
        // 1 border + 12 line + 20 collapsed margin.
        assert_eq!(second.dimensions.border_box_y(), 33.0);
        assert_eq!(new_box.height(), 44.0);
    }

    #[test]
    fn test_first_child_margin_collapses_with_parent() {
        let inner = block(style(|s| s.margin_top = AutoLength::px(20.0)), vec![paragraph("a")]);
        let root = block(style(|s| s.margin_top = AutoLength::px(10.0)), vec![inner]);
        let new_box = layout(&root, 100.0, f32::INFINITY, None).new_box.unwrap();
        assert_eq!(new_box.dimensions.margin.top, AutoOr::Length(20.0));
        assert_eq!(child(&new_box, 0).dimensions.border_box_y(), 20.0);
        assert_eq!(new_box.height(), 12.0);
    }

    #[test]
    fn test_float_is_placed_and_lines_flow_around_it() {
        let float_box = block(
            style(|s| {
                s.float = Some(FloatSide::Left);
                s.width = AutoLength::px(30.0);
                s.height = AutoLength::px(20.0);
            }),
            vec![],
        );
        let root = block(style(|_| {}), vec![float_box, paragraph("ab")]);
        let new_box = layout(&root, 100.0, f32::INFINITY, None).new_box.unwrap();
        let float_box = child(&new_box, 0);
        assert_eq!(float_box.position_x(), 0.0);
        let line = child(child(&new_box, 1), 0);
        assert_eq!(line.position_x(), 30.0);
    }

    #[test]
    fn test_clearance_moves_below_float() {
        let float_box = block(
            style(|s| {
                s.float = Some(FloatSide::Left);
                s.width = AutoLength::px(30.0);
                s.height = AutoLength::px(20.0);
            }),
            vec![],
        );
        let cleared = block(style(|s| s.clear = Some(ClearSide::Both)), vec![paragraph("ab")]);
        let root = block(style(|_| {}), vec![float_box, cleared]);
        let new_box = layout(&root, 100.0, f32::INFINITY, None).new_box.unwrap();
        assert_eq!(child(&new_box, 1).dimensions.border_box_y(), 20.0);
    }

    #[test]
    fn test_pagination_resumes_inside_line_box() {
        let root = block(style(|_| {}), vec![paragraph("aa bb cc")]);
        let laid_out = layout(&root, 20.0, 25.0, None);
        let new_box = laid_out.new_box.unwrap();
        assert_eq!(child(&new_box, 0).children.len(), 2);
        let resume_at = laid_out.resume_at.unwrap();
        assert_eq!(resume_at, SkipStack::nested(0, Some(SkipStack::nested(0, Some(SkipStack::nested(0, Some(SkipStack::leaf(6))))))));

        let next = layout(&root, 20.0, f32::INFINITY, Some(&resume_at)).new_box.unwrap();
        let p = child(&next, 0);
        assert_eq!(p.children.len(), 1);
        let text = child(child(p, 0), 0);
        assert_eq!(text.text_str(), Some("cc"));
    }

    #[test]
    fn test_absolute_child_leaves_placeholder() {
        let absolute = block(style(|s| s.position = PositionType::Absolute), vec![]);
        let root = block(style(|_| {}), vec![paragraph("a"), absolute]);
        let shaper = ApproximateShaper::default();
        let mut context = LayoutContext::new(&shaper);
        let (mut absolute_boxes, mut fixed) = (Vec::new(), Vec::new());
        let new_box = block_level_layout(
            &mut context,
            &root,
            f32::INFINITY,
            None,
            &cb(100.0),
            true,
            &mut absolute_boxes,
            &mut fixed,
        )
        .new_box
        .unwrap();
        assert_eq!(absolute_boxes.len(), 1);
        assert!(matches!(new_box.children[1], BoxNode::Placeholder(_)));
        assert_eq!(absolute_boxes[0].borrow().layout_box().position_y(), 12.0);
    }

    #[test]
    fn test_in_flow_baseline() {
        let root = block(style(|_| {}), vec![paragraph("a"), paragraph("b")]);
        let new_box = layout(&root, 100.0, f32::INFINITY, None).new_box.unwrap();
        let first = find_in_flow_baseline(&new_box, false).unwrap();
        let last = find_in_flow_baseline(&new_box, true).unwrap();
        assert!((first - 9.6).abs() < 1e-4);
        assert!((last - 21.6).abs() < 1e-4);
    }
}
