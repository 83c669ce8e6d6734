//! Vertical alignment inside a line.
//!
//! [§ 10.8 Line height calculations: the 'line-height' and 'vertical-align' properties](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "The height of each inline-level box in the line box is calculated...
//! The inline-level boxes are aligned vertically according to their
//! 'vertical-align' property. In case they are aligned 'top' or 'bottom',
//! they must be aligned so as to minimize the line box height."

use crate::style::VerticalAlign;

use super::super::context::LayoutContext;
use super::super::layout_box::{BoxNode, Capabilities, LayoutBox};

/// Child indexes leading from the line to a `top`/`bottom` aligned subtree.
type SubtreePath = Vec<usize>;

/// Place the descendants of a line vertically, assuming the line's
/// baseline is at `y = 0`.
///
/// Returns `(max_y, min_y)`: the bottom and top of the line's margin boxes.
/// Floats are not aligned: they stay where they were placed.
pub fn line_box_verticality(context: &LayoutContext<'_>, line: &mut LayoutBox) -> (f32, f32) {
    let mut deferred = Vec::new();
    let (mut max_y, min_y) = aligned_subtree_verticality(context, line, &mut Vec::new(), &mut deferred, 0.0);

    // STEP 1: Lay out each top/bottom subtree on its own, baseline at 0.
    let mut extents = Vec::with_capacity(deferred.len());
    for path in &deferred {
        let Some(subtree) = subtree_at(line, path) else {
            continue;
        };
        let extent = aligned_subtree_verticality(context, subtree, &mut Vec::new(), &mut Vec::new(), 0.0);
        extents.push((path, extent));
    }

    // STEP 2: The line must be at least as tall as the tallest of them.
    let highest = extents
        .iter()
        .map(|(_, (sub_max, sub_min))| sub_max - sub_min)
        .fold(0.0, f32::max);
    if !extents.is_empty() {
        max_y = max_y.max(min_y + highest);
    }

    // STEP 3: Stick them to the top or the bottom of the line.
    for (path, (sub_max, sub_min)) in extents {
        let Some(subtree) = subtree_at(line, path) else {
            continue;
        };
        let dy = match subtree.style.vertical_align {
            VerticalAlign::Top => min_y - sub_min,
            // Only `top` and `bottom` subtrees are deferred.
            _ => max_y - sub_max,
        };
        translate_subtree(subtree, dy);
    }
    (max_y, min_y)
}

fn subtree_at<'b>(root: &'b mut LayoutBox, path: &[usize]) -> Option<&'b mut LayoutBox> {
    path.iter()
        .try_fold(root, |node, &index| node.children.get_mut(index)?.as_box_mut())
}

/// Move a `top`/`bottom` aligned subtree vertically.
fn translate_subtree(layout_box: &mut LayoutBox, dy: f32) {
    if layout_box.is(Capabilities::INLINE) {
        layout_box.dimensions.position_y += dy;
        if matches!(layout_box.style.vertical_align, VerticalAlign::Top | VerticalAlign::Bottom) {
            for child in &mut layout_box.children {
                match child {
                    BoxNode::Box(child) => translate_subtree(child, dy),
                    BoxNode::Placeholder(_) => child.translate(0.0, dy, true),
                }
            }
        }
    } else {
        layout_box.translate(0.0, dy, true);
    }
}

fn aligned_subtree_verticality(
    context: &LayoutContext<'_>,
    layout_box: &mut LayoutBox,
    path: &mut SubtreePath,
    deferred: &mut Vec<SubtreePath>,
    baseline_y: f32,
) -> (f32, f32) {
    let (max_y, min_y) = inline_box_verticality(context, layout_box, path, deferred, baseline_y);
    // The box itself counts too.
    let top = baseline_y - layout_box.baseline();
    let bottom = top + layout_box.margin_height();
    (
        max_y.map_or(bottom, |max_y| max_y.max(bottom)),
        min_y.map_or(top, |min_y| min_y.min(top)),
    )
}

/// Place the children of a line or inline box whose baseline is at
/// `baseline_y`. Returns the extent of their margin boxes, if any.
fn inline_box_verticality(
    context: &LayoutContext<'_>,
    layout_box: &mut LayoutBox,
    path: &mut SubtreePath,
    deferred: &mut Vec<SubtreePath>,
    baseline_y: f32,
) -> (Option<f32>, Option<f32>) {
    let mut max_y: Option<f32> = None;
    let mut min_y: Option<f32> = None;
    if !layout_box.is(Capabilities::LINE | Capabilities::INLINE) {
        return (max_y, min_y);
    }

    // The parent's content area, for text-top and text-bottom.
    let d = &layout_box.dimensions;
    let content_top = baseline_y - layout_box.baseline() + d.margin.top.px() + d.border.top + d.padding.top;
    let content_bottom = content_top + layout_box.height();
    let one_ex = layout_box.style.font_size * context.shaper().ex_ratio(&layout_box.style);

    for (index, node) in layout_box.children.iter_mut().enumerate() {
        let BoxNode::Box(child) = node else {
            continue;
        };
        if !child.is_in_normal_flow() {
            continue;
        }
        let vertical_align = child.style.vertical_align;
        let child_baseline_y = match vertical_align {
            VerticalAlign::Baseline => baseline_y,
            VerticalAlign::Middle => {
                let top = baseline_y - (one_ex + child.margin_height()) / 2.0;
                top + child.baseline()
            }
            VerticalAlign::TextTop => content_top + child.baseline(),
            VerticalAlign::TextBottom => content_bottom - child.margin_height() + child.baseline(),
            // Aligned later, against the extent of the whole line.
            VerticalAlign::Top | VerticalAlign::Bottom => 0.0,
            raised => baseline_y - raised.raise(child.style.font_size).unwrap_or(0.0),
        };

        let top = child_baseline_y - child.baseline();
        if child.is(Capabilities::INLINE_BLOCK | Capabilities::FLEX_CONTAINER) {
            let dy = top - child.position_y();
            child.translate(0.0, dy, false);
        } else {
            // Children of inline boxes are placed by the recursion below.
            child.dimensions.position_y = top;
        }

        path.push(index);
        if matches!(vertical_align, VerticalAlign::Top | VerticalAlign::Bottom) {
            deferred.push(path.clone());
            path.pop();
            continue;
        }

        let bottom = top + child.margin_height();
        min_y = Some(min_y.map_or(top, |min_y| min_y.min(top)));
        max_y = Some(max_y.map_or(bottom, |max_y| max_y.max(bottom)));
        if child.is(Capabilities::INLINE) {
            let (children_max, children_min) =
                inline_box_verticality(context, child, path, deferred, child_baseline_y);
            if let Some(children_min) = children_min {
                min_y = Some(min_y.map_or(children_min, |min_y| min_y.min(children_min)));
            }
            if let Some(children_max) = children_max {
                max_y = Some(max_y.map_or(children_max, |max_y| max_y.max(children_max)));
            }
        }
        path.pop();
    }
    (max_y, min_y)
}
