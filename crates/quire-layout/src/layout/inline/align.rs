//! Horizontal alignment and justification of a line.
//!
//! [§ 7 Alignment and Justification](https://www.w3.org/TR/css-text-3/#justification)

use crate::style::{Direction, TextAlign};

use super::super::layout_box::{BoxNode, Capabilities, LayoutBox};

/// [§ 16.2 Alignment: the 'text-align' property](https://www.w3.org/TR/CSS2/text.html#alignment-prop)
///
/// "When the total width of the inline-level boxes on a line is less than
/// the width of the line box containing them, their horizontal distribution
/// within the line box is determined by the 'text-align' property."
///
/// Returns how far the line must move to the right. Justified lines are
/// stretched in place and never move.
pub fn text_align(line: &mut LayoutBox, available_width: f32, last: bool) -> f32 {
    if line.width() >= available_width {
        return 0.0;
    }

    let style = &line.style;
    let rtl = style.direction == Direction::Rtl;
    let start = if rtl { TextAlign::Right } else { TextAlign::Left };
    let align = match style.text_align {
        TextAlign::Start => start,
        TextAlign::End if rtl => TextAlign::Left,
        TextAlign::End => TextAlign::Right,
        // "text-align-last: auto" aligns the last line to the start.
        TextAlign::Justify if last => start,
        other => other,
    };
    let offset = available_width - line.width();
    match align {
        TextAlign::Left | TextAlign::Start => 0.0,
        TextAlign::Right | TextAlign::End => offset,
        TextAlign::Center => offset / 2.0,
        TextAlign::Justify => {
            // Justifying preserved spaces is neither required nor allowed.
            if style.white_space.collapses_spaces() {
                justify_line(line, offset);
            }
            0.0
        }
    }
}

/// Spread `extra_width` evenly over the spaces of the line.
pub fn justify_line(line: &mut LayoutBox, extra_width: f32) {
    let spaces = count_spaces(line);
    if spaces == 0 {
        return;
    }
    #[allow(clippy::cast_precision_loss)]
    let spacing = extra_width / spaces as f32;
    let _ = add_word_spacing(line, spacing, 0.0);
}

/// Number of space characters in the text of `layout_box`.
#[must_use]
pub fn count_spaces(layout_box: &LayoutBox) -> usize {
    if let Some(text) = layout_box.text_str() {
        return text.matches(' ').count();
    }
    if layout_box.is(Capabilities::LINE | Capabilities::INLINE) {
        return layout_box
            .children
            .iter()
            .filter_map(BoxNode::as_box)
            .map(count_spaces)
            .sum();
    }
    0
}

/// Give every space `justification_spacing` more room and move the boxes
/// after them. `x_advance` is the shift accumulated before this box; the
/// shift after it is returned.
pub fn add_word_spacing(
    layout_box: &mut LayoutBox,
    justification_spacing: f32,
    mut x_advance: f32,
) -> f32 {
    let spaces = count_spaces(layout_box);
    if let Some(content) = layout_box.text_content_mut() {
        content.justification_spacing = justification_spacing;
        layout_box.dimensions.position_x += x_advance;
        if spaces > 0 {
            #[allow(clippy::cast_precision_loss)]
            let extra_space = justification_spacing * spaces as f32;
            x_advance += extra_space;
            let width = layout_box.width() + extra_space;
            layout_box.dimensions.width = width.into();
        }
    } else if layout_box.is(Capabilities::LINE | Capabilities::INLINE) {
        layout_box.dimensions.position_x += x_advance;
        let previous_x_advance = x_advance;
        for child in &mut layout_box.children {
            if let BoxNode::Box(child) = child
                && child.is_in_normal_flow()
            {
                x_advance = add_word_spacing(child, justification_spacing, x_advance);
            }
        }
        let width = layout_box.width() + x_advance - previous_x_advance;
        layout_box.dimensions.width = width.into();
    } else {
        // Atomic inline-level box.
        layout_box.translate(x_advance, 0.0, false);
    }
    x_advance
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use quickcheck_macros::quickcheck;

    use super::*;
    use crate::layout::BoxKind;
    use crate::style::ComputedStyle;
    use crate::text::{ApproximateShaper, TextShaper};

    fn style(text_align: TextAlign, direction: Direction) -> Rc<ComputedStyle> {
        Rc::new(ComputedStyle {
            font_size: 10.0,
            text_align,
            direction,
            ..ComputedStyle::default()
        })
    }

    /// A laid-out line of text runs placed side by side.
    fn line(words: &[&str], text_align: TextAlign) -> LayoutBox {
        let shaper = ApproximateShaper::default();
        let style = style(text_align, Direction::Ltr);
        let mut x = 0.0;
        let mut l = LayoutBox::new(BoxKind::Line, "p", Rc::clone(&style));
        for word in words {
            let mut t = LayoutBox::text("p", Rc::clone(&style), word).unwrap();
            let width = shaper.measure(word, &style, 0.0);
            t.dimensions.position_x = x;
            t.dimensions.width = width.into();
            x += width;
            l.append_child(t).unwrap();
        }
        l.dimensions.width = x.into();
        l
    }

    #[test]
    fn test_start_and_end_follow_direction() {
        let mut ltr = line(&["ab"], TextAlign::End);
        assert_eq!(text_align(&mut ltr, 100.0, false), 88.0);

        let mut rtl = line(&["ab"], TextAlign::Start);
        rtl.style = style(TextAlign::Start, Direction::Rtl);
        assert_eq!(text_align(&mut rtl, 100.0, false), 88.0);
    }

    #[test]
    fn test_center() {
        let mut l = line(&["ab"], TextAlign::Center);
        assert_eq!(text_align(&mut l, 100.0, true), 44.0);
    }

    #[test]
    fn test_justify_last_line_is_start_aligned() {
        let mut l = line(&["a b"], TextAlign::Justify);
        assert_eq!(text_align(&mut l, 100.0, true), 0.0);
        assert_eq!(l.width(), 18.0);
    }

    #[test]
    fn test_justify_moves_following_runs() {
        let mut l = line(&["a b ", "c"], TextAlign::Justify);
        assert_eq!(text_align(&mut l, 50.0, false), 0.0);
        // 20px spread over two spaces.
        assert_eq!(l.width(), 50.0);
        let second = l.children[1].as_box().unwrap();
        assert_eq!(second.position_x(), 44.0);
    }

    #[quickcheck]
    fn prop_justified_line_fills_available_width(spaces: u8, slack: u16) -> bool {
        let spaces = usize::from(spaces % 20) + 1;
        let slack = f32::from(slack % 500);
        let text = vec!["w"; spaces + 1].join(" ");
        let mut l = line(&[&text], TextAlign::Justify);
        let available = l.width() + slack;
        let _ = text_align(&mut l, available, false);
        let t = l.children[0].as_box().unwrap();
        let spacing = t.text_content().unwrap().justification_spacing;
        #[allow(clippy::cast_precision_loss)]
        let expected_spacing = if slack > 0.0 { slack / spaces as f32 } else { 0.0 };
        (l.width() - available).abs() < 1e-2 && (spacing - expected_spacing).abs() < 1e-3
    }
}
