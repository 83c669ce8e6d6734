//! CSS Flexbox Layout (single line).
//!
//! [§ 9 Flex Layout Algorithm](https://www.w3.org/TR/css-flexbox-1/#layout-algorithm)
//!
//! A minimal subset of the flex layout algorithm:
//! - `flex-direction: row`, a single flex line
//! - flex base size from `width`, or the max-content width
//! - shrinking weighted by base size (`flex-shrink: 1`), no growing
//! - items aligned to the start of the cross axis
//!
//! The container's baseline is the one of its first item.

use std::rc::Rc;

use crate::style::PositionType;

use super::absolute::{AbsolutePlaceholder, PlaceholderRef, absolute_layout};
use super::block::{block_container_layout, relative_positioning};
use super::context::{ContainingBlock, LayoutContext};
use super::inline::atomic::inline_replaced_box_width_height;
use super::layout_box::{BoxNode, Capabilities, LayoutBox};
use super::percentages::resolve_percentages;
use super::preferred::max_content_width;
use super::skip_stack::SkipStack;

/// Result of [`flex_layout`].
#[derive(Debug, Default)]
pub struct FlexLayout {
    /// The laid-out container.
    pub new_box: Option<LayoutBox>,
    /// Always `None`: flex containers are not split between pages.
    pub resume_at: Option<SkipStack>,
}

/// Per-item data collected during flex layout.
///
/// [§ 9.2 Line Length Determination](https://www.w3.org/TR/css-flexbox-1/#algo-main-item)
struct FlexItem {
    /// The item, percentages resolved.
    layout_box: LayoutBox,
    /// [§ 9.2 step 3](https://www.w3.org/TR/css-flexbox-1/#algo-main-item)
    /// The flex base size.
    base_size: f32,
    /// The resolved target main size after § 9.7.
    target_size: f32,
}

/// Lay out a flex container whose position and width are set.
#[allow(clippy::too_many_arguments)]
pub fn flex_layout(
    context: &mut LayoutContext<'_>,
    layout_box: &LayoutBox,
    _max_position_y: f32,
    skip_stack: Option<&SkipStack>,
    _containing_block: &ContainingBlock,
    _page_is_empty: bool,
    absolute_boxes: &mut Vec<PlaceholderRef>,
    fixed_boxes: &mut Vec<PlaceholderRef>,
) -> FlexLayout {
    let mut new_box = layout_box.copy_with_children(Vec::new(), skip_stack.is_none(), true);
    new_box.dimensions.zero_auto_margins(true, false);
    let content = ContainingBlock::content_of(&new_box);
    let skip = skip_stack.map_or(0, |skip_stack| skip_stack.skip);

    let mut own_absolute_boxes = Vec::new();
    let is_relative = layout_box.is_relatively_positioned();

    // STEP 1: Collect the flex items. Out-of-flow children leave a
    // placeholder at the start of the content box.
    let mut items = Vec::new();
    let mut placeholders = Vec::new();
    for node in layout_box.children.iter().skip(skip) {
        let BoxNode::Box(child) = node else {
            placeholders.push(node.clone());
            continue;
        };
        if child.is_absolutely_positioned() {
            let mut static_box = child.clone();
            static_box.dimensions.position_x = content.x;
            static_box.dimensions.position_y = content.y;
            let placeholder = AbsolutePlaceholder::new(static_box);
            if child.style.position == PositionType::Fixed {
                fixed_boxes.push(Rc::clone(&placeholder));
            } else if is_relative {
                own_absolute_boxes.push(Rc::clone(&placeholder));
            } else {
                absolute_boxes.push(Rc::clone(&placeholder));
            }
            placeholders.push(BoxNode::Placeholder(placeholder));
            continue;
        }
        assert!(
            !child.is(Capabilities::INLINE_LEVEL | Capabilities::LINE),
            "flex item {} '{}' was not blockified",
            child.kind.name(),
            child.element_tag
        );

        // STEP 2: Flex base size.
        // "If the item has a definite used flex basis, that's the flex base
        // size." Otherwise the max-content size is used.
        let mut item = child.clone();
        resolve_percentages(&mut item, content.width, content.height);
        item.dimensions.zero_auto_margins(true, true);
        let base_size = match item.dimensions.width.length() {
            Some(width) => width,
            None => max_content_width(context, &item, false),
        };
        let base_size = base_size.min(item.max_width).max(item.min_width);
        items.push(FlexItem {
            layout_box: item,
            base_size,
            target_size: base_size,
        });
    }

    // STEP 3: [§ 9.7 Resolving Flexible Lengths](https://www.w3.org/TR/css-flexbox-1/#resolve-flexible-lengths)
    resolve_flexible_lengths(&mut items, content.width);

    // STEP 4: Lay out each item once, at its target size.
    let mut position_x = content.x;
    let mut cross_size: f32 = 0.0;
    let mut new_children = Vec::with_capacity(items.len() + placeholders.len());
    for FlexItem {
        layout_box: mut item,
        target_size,
        ..
    } in items
    {
        item.dimensions.width = target_size.into();
        item.dimensions.position_x = position_x;
        item.dimensions.position_y = content.y;

        let sinks = if is_relative { &mut own_absolute_boxes } else { &mut *absolute_boxes };
        let mut laid_out = if item.is(Capabilities::REPLACED) {
            inline_replaced_box_width_height(&mut item, &content);
            item
        } else if item.is(Capabilities::FLEX_CONTAINER) {
            let nested = flex_layout(context, &item, f32::INFINITY, None, &content, true, sinks, fixed_boxes);
            nested.new_box.unwrap_or(item)
        } else {
            // Flex items establish a formatting context for their contents.
            context.create_block_formatting_context();
            let nested = block_container_layout(context, &item, f32::INFINITY, None, true, sinks, fixed_boxes);
            let mut new_item = nested.new_box.unwrap_or(item);
            context.finish_block_formatting_context(&mut new_item);
            new_item
        };
        relative_positioning(&mut laid_out, &content);

        #[cfg(feature = "layout-trace")]
        log::trace!(
            target: "quire::layout",
            "flex item '{}' at x={} width={}",
            laid_out.element_tag,
            laid_out.position_x(),
            laid_out.width()
        );

        position_x += laid_out.margin_width();
        cross_size = cross_size.max(laid_out.margin_height());
        new_children.push(BoxNode::Box(laid_out));
    }
    new_children.extend(placeholders);

    // STEP 5: [§ 9.4 step 15](https://www.w3.org/TR/css-flexbox-1/#algo-cross-container)
    // "If the cross size property is a definite size, use that... Otherwise,
    // use the sum of the flex lines' cross sizes."
    if new_box.dimensions.height.is_auto() {
        let height = cross_size.min(new_box.max_height).max(new_box.min_height);
        new_box.dimensions.height = height.into();
    }
    new_box.children = new_children;

    for placeholder in &own_absolute_boxes {
        absolute_layout(context, placeholder, &new_box, fixed_boxes);
    }

    FlexLayout {
        new_box: Some(new_box),
        resume_at: None,
    }
}

/// Shrink the items when their base sizes overflow `available_main`.
///
/// "If the sum of the outer hypothetical main sizes is greater than the flex
/// container's inner main size, use the flex shrink factor", scaled by the
/// flex base size.
fn resolve_flexible_lengths(items: &mut [FlexItem], available_main: f32) {
    let outer_sum: f32 = items
        .iter()
        .map(|item| item.base_size + item.layout_box.margin_width() - item.layout_box.width())
        .sum();
    let overflow = outer_sum - available_main;
    let scaled_sum: f32 = items.iter().map(|item| item.base_size).sum();
    if overflow <= 0.0 || scaled_sum <= 0.0 {
        return;
    }
    for item in items {
        let shrink = overflow * item.base_size / scaled_sum;
        item.target_size = (item.base_size - shrink).max(item.layout_box.min_width).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::BoxKind;
    use crate::layout::block::find_in_flow_baseline;
    use crate::style::{AutoLength, ComputedStyle, Direction, DisplayValue};
    use crate::text::ApproximateShaper;

    fn style(display: DisplayValue) -> Rc<ComputedStyle> {
        Rc::new(ComputedStyle {
            font_size: 10.0,
            ..ComputedStyle::with_display(display)
        })
    }

    fn item(text: &str) -> LayoutBox {
        let s = style(DisplayValue::block());
        let line = LayoutBox::new(BoxKind::Line, "span", Rc::clone(&s))
            .with_children([LayoutBox::text("span", Rc::clone(&s), text).unwrap()])
            .unwrap();
        LayoutBox::new(BoxKind::Block, "span", s).with_children([line]).unwrap()
    }

    fn container(width: f32, children: Vec<LayoutBox>) -> LayoutBox {
        let mut flex = LayoutBox::new(BoxKind::Flex, "div", style(DisplayValue::flex()))
            .with_children(children)
            .unwrap();
        flex.dimensions.zero_auto_margins(true, true);
        flex.dimensions.width = width.into();
        flex
    }

    fn layout(flex: &LayoutBox) -> LayoutBox {
        let shaper = ApproximateShaper::default();
        let mut context = LayoutContext::new(&shaper);
        let (mut absolute, mut fixed) = (Vec::new(), Vec::new());
        let cb = ContainingBlock {
            x: 0.0,
            y: 0.0,
            width: flex.width(),
            height: None,
            direction: Direction::Ltr,
        };
        flex_layout(
            &mut context,
            flex,
            f32::INFINITY,
            None,
            &cb,
            true,
            &mut absolute,
            &mut fixed,
        )
        .new_box
        .unwrap()
    }

    fn child(b: &LayoutBox, index: usize) -> &LayoutBox {
        b.children[index].as_box().unwrap()
    }

    #[test]
    fn test_items_are_placed_in_a_row() {
        let flex = layout(&container(100.0, vec![item("ab"), item("cde")]));
        assert_eq!(child(&flex, 0).position_x(), 0.0);
        assert_eq!(child(&flex, 0).width(), 12.0);
        assert_eq!(child(&flex, 1).position_x(), 12.0);
        assert_eq!(child(&flex, 1).width(), 18.0);
        assert_eq!(flex.height(), 12.0);
    }

    #[test]
    fn test_overflowing_items_shrink_by_base_size() {
        let mut wide = item("a");
        wide.style = Rc::new(ComputedStyle {
            width: AutoLength::px(60.0),
            ..(*wide.style).clone()
        });
        let mut narrow = item("b");
        narrow.style = Rc::new(ComputedStyle {
            width: AutoLength::px(40.0),
            ..(*narrow.style).clone()
        });
        let flex = layout(&container(50.0, vec![wide, narrow]));
        assert!((child(&flex, 0).width() - 30.0).abs() < 1e-4);
        assert!((child(&flex, 1).width() - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_baseline_comes_from_first_item() {
        let flex = layout(&container(100.0, vec![item("ab"), item("cd")]));
        let baseline = find_in_flow_baseline(&flex, true).unwrap();
        assert!((baseline - 9.6).abs() < 1e-4);
    }
}
