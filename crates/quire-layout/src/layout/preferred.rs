//! Preferred (intrinsic) widths.
//!
//! [§ 5 Intrinsic Size Determination](https://www.w3.org/TR/css-sizing-3/#intrinsic-sizes)
//!
//! "The min-content size of a box in each axis is the size it would have if
//! it was a float given an auto size in that axis (and no minimum or maximum
//! size in that axis) and if its containing block was zero-sized in that
//! axis."

use crate::style::{AutoLength, ComputedStyle, LengthValue};

use super::context::LayoutContext;
use super::inline::atomic::default_image_sizing;
use super::layout_box::{BoxNode, Capabilities, LayoutBox};
use super::skip_stack::SkipStack;

/// [§ 10.3.5 Floating, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#float-width)
///
/// "Calculation of the shrink-to-fit width is similar to calculating the
/// width of a table cell using the automatic table layout algorithm...
/// the shrink-to-fit width is: min(max(preferred minimum width, available
/// width), preferred width)."
#[must_use]
pub fn shrink_to_fit(context: &LayoutContext<'_>, layout_box: &LayoutBox, available_width: f32) -> f32 {
    min_content_width(context, layout_box, false)
        .max(available_width)
        .min(max_content_width(context, layout_box, false))
}

/// The min-content width of `layout_box`, with its margins, borders and
/// padding when `outer`.
#[must_use]
pub fn min_content_width(context: &LayoutContext<'_>, layout_box: &LayoutBox, outer: bool) -> f32 {
    preferred_width(context, layout_box, outer, true)
}

/// The max-content width of `layout_box`, with its margins, borders and
/// padding when `outer`.
#[must_use]
pub fn max_content_width(context: &LayoutContext<'_>, layout_box: &LayoutBox, outer: bool) -> f32 {
    preferred_width(context, layout_box, outer, false)
}

fn preferred_width(context: &LayoutContext<'_>, layout_box: &LayoutBox, outer: bool, minimum: bool) -> f32 {
    if layout_box.is(Capabilities::REPLACED) {
        replaced_content_width(layout_box, outer, minimum)
    } else if layout_box.is(Capabilities::INLINE | Capabilities::LINE) {
        inline_content_width(context, layout_box, outer, minimum, None, false)
    } else if let Some(content) = layout_box.text_content() {
        let mut lines = text_line_widths(context, layout_box, &content.text, minimum, false).0;
        if let Some(last) = lines.last_mut() {
            *last -= trailing_whitespace_size(context, layout_box);
        }
        adjust(layout_box, outer, lines.into_iter().fold(0.0, f32::max), true, true)
    } else if layout_box.is(Capabilities::FLEX_CONTAINER) {
        flex_content_width(context, layout_box, outer, minimum)
    } else {
        block_content_width(context, layout_box, outer, minimum)
    }
}

/// Min-content width of inline content, optionally starting at
/// `skip_stack` and looking at the first line only.
#[must_use]
pub fn inline_min_content_width(
    context: &LayoutContext<'_>,
    layout_box: &LayoutBox,
    outer: bool,
    skip_stack: Option<&SkipStack>,
    first_line: bool,
) -> f32 {
    inline_content_width(context, layout_box, outer, true, skip_stack, first_line)
}

fn inline_content_width(
    context: &LayoutContext<'_>,
    layout_box: &LayoutBox,
    outer: bool,
    minimum: bool,
    skip_stack: Option<&SkipStack>,
    first_line: bool,
) -> f32 {
    let mut widths = inline_line_widths(context, layout_box, outer, true, minimum, skip_stack, first_line);
    if first_line {
        widths.truncate(1);
    } else if let Some(last) = widths.last_mut() {
        *last -= trailing_whitespace_size(context, layout_box);
    }
    adjust(layout_box, outer, widths.into_iter().fold(0.0, f32::max), true, true)
}

fn block_content_width(context: &LayoutContext<'_>, layout_box: &LayoutBox, outer: bool, minimum: bool) -> f32 {
    // [§ 4.1](https://www.w3.org/TR/css-sizing-3/#intrinsic-contribution)
    // Percentage widths behave as 'auto' for intrinsic contributions.
    let width = match layout_box.style.width {
        AutoLength::Length(LengthValue::Px(width)) => width,
        _ => layout_box
            .children
            .iter()
            .filter_map(BoxNode::as_box)
            .filter(|child| !child.is_absolutely_positioned())
            .map(|child| preferred_width(context, child, true, minimum))
            .fold(0.0, f32::max),
    };
    adjust(layout_box, outer, width, true, true)
}

fn flex_content_width(context: &LayoutContext<'_>, layout_box: &LayoutBox, outer: bool, minimum: bool) -> f32 {
    // Items sit on a single line, so their contributions add up.
    let width = layout_box
        .children
        .iter()
        .filter_map(BoxNode::as_box)
        .filter(|child| child.is_in_normal_flow())
        .map(|child| preferred_width(context, child, true, minimum))
        .sum();
    adjust(layout_box, outer, width, true, true)
}

fn replaced_content_width(layout_box: &LayoutBox, outer: bool, minimum: bool) -> f32 {
    let style = &layout_box.style;
    let width = match style.width {
        AutoLength::Length(LengthValue::Px(width)) => width,
        AutoLength::Length(LengthValue::Percent(_)) if minimum => 0.0,
        _ if minimum && matches!(style.max_width, Some(LengthValue::Percent(_))) => 0.0,
        _ => {
            let height = match style.height {
                AutoLength::Length(LengthValue::Px(height)) => Some(height),
                _ => None,
            };
            let replacement = layout_box.replacement().copied().unwrap_or_default();
            default_image_sizing(&replacement, None, height, 300.0, 150.0).0
        }
    };
    adjust(layout_box, outer, width, true, true)
}

/// Widths of the lines `layout_box`'s inline content forms when it breaks
/// at every opportunity (`minimum`) or only at forced breaks.
fn inline_line_widths(
    context: &LayoutContext<'_>,
    layout_box: &LayoutBox,
    outer: bool,
    mut is_line_start: bool,
    minimum: bool,
    skip_stack: Option<&SkipStack>,
    first_line: bool,
) -> Vec<f32> {
    let mut text_indent = match layout_box.style.text_indent {
        LengthValue::Px(indent) if layout_box.is(Capabilities::LINE) => indent,
        _ => 0.0,
    };
    let mut widths = Vec::new();
    let mut current_line = 0.0;
    let (skip, mut child_skip) = skip_stack.map_or((0, None), SkipStack::split);

    for child in layout_box.children.iter().skip(skip).filter_map(BoxNode::as_box) {
        if child.is_absolutely_positioned() {
            continue;
        }
        let lines = if child.is(Capabilities::INLINE) {
            let mut lines =
                inline_line_widths(context, child, outer, is_line_start, minimum, child_skip, first_line);
            if first_line {
                lines.truncate(1);
            }
            let last = lines.len() - 1;
            if last == 0 {
                lines[0] = adjust(child, outer, lines[0], true, true);
            } else {
                lines[0] = adjust(child, outer, lines[0], true, false);
                lines[last] = adjust(child, outer, lines[last], false, true);
            }
            lines
        } else if let Some(content) = child.text_content() {
            let skip = child_skip.map_or(0, |stack| stack.skip);
            let text: String = content.text.chars().skip(skip).collect();
            let text = if is_line_start && child.style.white_space.collapses_spaces() {
                text.trim_start_matches(' ')
            } else {
                text.as_str()
            };
            if minimum && text == " " {
                vec![0.0, 0.0]
            } else {
                let (lines, broken) = text_line_widths(context, child, text, minimum, first_line);
                if first_line && broken {
                    current_line += lines[0];
                    break;
                }
                lines
            }
        } else {
            // [§ 5.2](https://www.w3.org/TR/css-text-3/#line-breaking)
            // "For soft wrap opportunities defined by the boundary between
            // two characters or atomic inlines, the white-space property on
            // the nearest common ancestor of the two characters controls
            // breaking"; atomic inlines break like U+FFFC, on both sides.
            let width = max_content_width(context, child, true);
            if minimum { vec![0.0, width, 0.0] } else { vec![width] }
        };

        current_line += lines[0];
        if let [_, middle @ .., last] = lines.as_slice() {
            widths.push(current_line + text_indent);
            text_indent = 0.0;
            widths.extend_from_slice(middle);
            current_line = *last;
        }
        is_line_start = lines.last().is_some_and(|&last| last == 0.0);
        child_skip = None;
    }
    widths.push(current_line + text_indent);
    widths
}

/// Line widths of `text` laid out alone; the flag tells whether the first
/// line had to break.
fn text_line_widths(
    context: &LayoutContext<'_>,
    text_box: &LayoutBox,
    text: &str,
    minimum: bool,
    first_line: bool,
) -> (Vec<f32>, bool) {
    let shaper = context.shaper();
    let spacing = text_box.text_content().map_or(0.0, |content| content.justification_spacing);
    let max_width = minimum.then_some(0.0);
    let mut widths = Vec::new();
    let mut rest = text.to_string();
    loop {
        let line = shaper.split_first_line(&rest, &text_box.style, max_width, spacing);
        widths.push(line.width);
        match line.resume_at {
            Some(_) if first_line => return (widths, true),
            Some(resume_at) => rest = rest.chars().skip(resume_at).collect(),
            None => return (widths, false),
        }
    }
}

/// Width of the collapsible spaces ending the inline content of
/// `layout_box`.
#[must_use]
pub fn trailing_whitespace_size(context: &LayoutContext<'_>, layout_box: &LayoutBox) -> f32 {
    let mut last = layout_box;
    while last.is(Capabilities::INLINE | Capabilities::LINE) {
        match last.children.last() {
            Some(BoxNode::Box(child)) => last = child,
            _ => return 0.0,
        }
    }
    let Some(content) = last.text_content() else {
        return 0.0;
    };
    if !last.style.white_space.collapses_spaces() || last.style.font_size == 0.0 {
        return 0.0;
    }
    let stripped = content.text.trim_end_matches(' ');
    if stripped.len() == content.text.len() {
        return 0.0;
    }
    let shaper = context.shaper();
    let spacing = content.justification_spacing;
    shaper.measure(&content.text, &last.style, spacing) - shaper.measure(stripped, &last.style, spacing)
}

/// Clamp `width` by the box's min/max widths and, when `outer`, add the
/// horizontal margins, borders and padding on the requested sides.
fn adjust(layout_box: &LayoutBox, outer: bool, width: f32, left: bool, right: bool) -> f32 {
    let style = &layout_box.style;
    let min_width = match style.min_width {
        LengthValue::Px(min) => min,
        LengthValue::Percent(_) => 0.0,
    };
    let max_width = match style.max_width {
        Some(LengthValue::Px(max)) => max,
        _ => f32::INFINITY,
    };
    let fixed = width.min(max_width).max(min_width);
    if outer { margin_width(style, fixed, left, right) } else { fixed }
}

/// [Outer intrinsic size](https://www.w3.org/TR/css-sizing-3/#intrinsic-contribution)
///
/// Percentage margins and padding are solved for: the content is
/// `1 - percentages` of the outer width.
fn margin_width(style: &ComputedStyle, width: f32, left: bool, right: bool) -> f32 {
    let mut width = width;
    let mut percentages = 0.0;
    let mut sides = Vec::with_capacity(4);
    if left {
        sides.push((style.margin_left.length(), style.padding_left));
        width += style.border_left_width;
    }
    if right {
        sides.push((style.margin_right.length(), style.padding_right));
        width += style.border_right_width;
    }
    for (margin, padding) in sides {
        for value in margin.into_iter().chain(std::iter::once(padding)) {
            match value {
                LengthValue::Px(px) => width += px,
                LengthValue::Percent(percent) => percentages += percent,
            }
        }
    }
    if percentages < 100.0 {
        width / (1.0 - percentages / 100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use quickcheck_macros::quickcheck;

    use super::*;
    use crate::layout::BoxKind;
    use crate::style::{DisplayValue, WhiteSpace};
    use crate::text::ApproximateShaper;

    fn paragraph(text: &str) -> LayoutBox {
        let style = Rc::new(ComputedStyle {
            font_size: 10.0,
            ..ComputedStyle::with_display(DisplayValue::block())
        });
        let inline_style = Rc::new(ComputedStyle::inherit_from(&style));
        let text_box = LayoutBox::text("p", Rc::clone(&inline_style), text).unwrap();
        let line = LayoutBox::new(BoxKind::Line, "p", inline_style)
            .with_children([text_box])
            .unwrap();
        LayoutBox::new(BoxKind::Block, "p", style)
            .with_children([line])
            .unwrap()
    }

    #[test]
    fn test_min_and_max_content_of_text() {
        let shaper = ApproximateShaper::default();
        let context = LayoutContext::new(&shaper);
        let p = paragraph("aa bbbb c");
        assert!((min_content_width(&context, &p, false) - 24.0).abs() < 1e-3);
        assert!((max_content_width(&context, &p, false) - 54.0).abs() < 1e-3);
    }

    #[test]
    fn test_trailing_whitespace_is_not_preferred_width() {
        let shaper = ApproximateShaper::default();
        let context = LayoutContext::new(&shaper);
        let p = paragraph("ab  ");
        assert!((max_content_width(&context, &p, false) - 12.0).abs() < 1e-3);
        let line = p.children[0].as_box().unwrap();
        assert!((trailing_whitespace_size(&context, line) - 12.0).abs() < 1e-3);
    }

    #[test]
    fn test_outer_width_adds_edges_and_solves_percentages() {
        let style = ComputedStyle {
            margin_left: AutoLength::px(10.0),
            padding_right: LengthValue::Percent(50.0),
            border_left_width: 2.0,
            ..ComputedStyle::default()
        };
        assert!((margin_width(&style, 40.0, true, true) - 104.0).abs() < 1e-3);
        assert!((margin_width(&style, 40.0, false, false) - 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_nowrap_min_content_is_max_content() {
        let shaper = ApproximateShaper::default();
        let context = LayoutContext::new(&shaper);
        let mut p = paragraph("aa bb");
        Rc::make_mut(&mut p.style).white_space = WhiteSpace::Nowrap;
        if let Some(BoxNode::Box(line)) = p.children.first_mut() {
            Rc::make_mut(&mut line.style).white_space = WhiteSpace::Nowrap;
            if let Some(BoxNode::Box(text)) = line.children.first_mut() {
                Rc::make_mut(&mut text.style).white_space = WhiteSpace::Nowrap;
            }
        }
        let min = min_content_width(&context, &p, false);
        assert!((min - max_content_width(&context, &p, false)).abs() < 1e-3);
    }

    #[quickcheck]
    fn prop_shrink_to_fit_is_monotonic(words: Vec<u8>, a: u16, b: u16) -> bool {
        let text: String = words
            .iter()
            .map(|&len| "x".repeat(usize::from(len % 7) + 1))
            .collect::<Vec<_>>()
            .join(" ");
        if text.is_empty() {
            return true;
        }
        let shaper = ApproximateShaper::default();
        let context = LayoutContext::new(&shaper);
        let p = paragraph(&text);
        let (low, high) = (f32::from(a.min(b)), f32::from(a.max(b)));
        let narrow = shrink_to_fit(&context, &p, low);
        let wide = shrink_to_fit(&context, &p, high);
        narrow <= wide + 1e-3
            && narrow >= min_content_width(&context, &p, false) - 1e-3
            && wide <= max_content_width(&context, &p, false) + 1e-3
    }
}
