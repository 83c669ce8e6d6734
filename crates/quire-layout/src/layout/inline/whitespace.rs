//! Collapsible white space at line edges, `::first-letter` boxes and
//! phantom lines.
//!
//! [§ 4.1.2 Phase II: Trimming and Positioning](https://www.w3.org/TR/css-text-3/#white-space-phase-2)
//!
//! "A sequence of collapsible spaces at the beginning of a line is removed."
//! "A sequence of collapsible spaces at the end of a line is removed."

use std::rc::Rc;

use crate::style::{ComputedStyle, PositionType};

use super::super::context::LayoutContext;
use super::super::layout_box::{BoxKind, BoxNode, Capabilities, LayoutBox};
use super::super::skip_stack::SkipStack;

/// Where a line starts once its leading collapsible spaces are skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadingWhitespace {
    /// Resume at this cursor (`None` for the very start).
    Resume(Option<SkipStack>),
    /// Nothing is left at or after the cursor.
    Exhausted,
}

/// Skip the collapsible spaces at `skip_stack` inside `layout_box`.
///
/// # Panics
/// If the cursor goes deeper than a text box or into an atomic box.
#[must_use]
pub fn skip_first_whitespace(layout_box: &LayoutBox, skip_stack: Option<&SkipStack>) -> LeadingWhitespace {
    let (mut index, next_skip_stack) = skip_stack.map_or((0, None), SkipStack::split);

    if let Some(content) = layout_box.text_content() {
        assert!(
            next_skip_stack.is_none(),
            "skip stack {skip_stack:?} goes below text box '{}'",
            layout_box.element_tag
        );
        let chars: Vec<char> = content.text.chars().collect();
        if index >= chars.len() {
            return LeadingWhitespace::Exhausted;
        }
        if layout_box.style.white_space.collapses_spaces() {
            while index < chars.len() && chars[index] == ' ' {
                index += 1;
            }
        }
        return LeadingWhitespace::Resume((index != 0).then(|| SkipStack::leaf(index)));
    }

    if layout_box.is(Capabilities::LINE | Capabilities::INLINE) {
        let children = &layout_box.children;
        if index == 0 && children.is_empty() {
            return LeadingWhitespace::Resume(None);
        }
        let Some(child) = children.get(index) else {
            return LeadingWhitespace::Exhausted;
        };
        let mut result = child.with_box(|child| skip_first_whitespace(child, next_skip_stack));
        if result == LeadingWhitespace::Exhausted {
            index += 1;
            let Some(next) = children.get(index) else {
                return LeadingWhitespace::Exhausted;
            };
            result = next.with_box(|next| skip_first_whitespace(next, None));
        }
        let inner = match result {
            LeadingWhitespace::Resume(inner) => inner,
            LeadingWhitespace::Exhausted => None,
        };
        if index != 0 || inner.is_some() {
            return LeadingWhitespace::Resume(Some(SkipStack::nested(index, inner)));
        }
        return LeadingWhitespace::Resume(None);
    }

    assert!(
        skip_stack.is_none(),
        "unexpected skip stack {skip_stack:?} inside {}",
        layout_box.kind.name()
    );
    LeadingWhitespace::Resume(None)
}

/// Remove the collapsible spaces ending a laid-out line, shrinking the
/// inline ancestors of the trimmed text by the removed width.
pub fn remove_last_whitespace(context: &LayoutContext<'_>, layout_box: &mut LayoutBox) {
    let _ = trim_trailing_spaces(context, layout_box);
}

fn trim_trailing_spaces(context: &LayoutContext<'_>, layout_box: &mut LayoutBox) -> Option<f32> {
    if layout_box.is(Capabilities::LINE | Capabilities::INLINE) {
        let last = layout_box.children.last_mut()?.as_box_mut()?;
        let removed = trim_trailing_spaces(context, last)?;
        layout_box.dimensions.width = (layout_box.width() - removed).into();
        return Some(removed);
    }
    if !layout_box.style.white_space.collapses_spaces() {
        return None;
    }
    let old_width = layout_box.width();
    let style = Rc::clone(&layout_box.style);
    let content = layout_box.text_content_mut()?;
    let kept_len = content.text.trim_end_matches(' ').len();
    if kept_len == content.text.len() {
        return None;
    }
    content.text.truncate(kept_len);
    let new_width = if content.text.is_empty() {
        content.visual_text = None;
        0.0
    } else {
        let line = context
            .shaper()
            .split_first_line(&content.text, &style, None, content.justification_spacing);
        content.visual_text = line.visual_text;
        line.width
    };
    layout_box.dimensions.width = new_width.into();
    Some(old_width - new_width)
}

/// Punctuation that is kept with the first letter: the Unicode categories
/// Ps, Pe, Pi, Pf and Po, for the scripts text is likely to start with.
fn is_first_letter_punctuation(c: char) -> bool {
    matches!(
        c,
        '!' | '"' | '#' | '%' | '&' | '\'' | '(' | ')' | '*' | ',' | '.' | '/' | ':' | ';' | '?' | '@'
            | '[' | '\\' | ']' | '{' | '}'
            | '\u{a1}' | '\u{a7}' | '\u{ab}' | '\u{b6}' | '\u{b7}' | '\u{bb}' | '\u{bf}'
            | '\u{2016}'..='\u{2027}'
            | '\u{2030}'..='\u{203e}'
            | '\u{2045}' | '\u{2046}'
            | '\u{3001}'..='\u{3003}'
            | '\u{3008}'..='\u{3011}'
            | '\u{3014}'..='\u{301f}'
            | '\u{ff01}'..='\u{ff0f}'
    ) && !matches!(c, '\u{2010}'..='\u{2015}' | '\u{ff04}' | '\u{ff0b}' | '\u{ff0d}')
}

/// [§ 7.2 The ::first-letter pseudo-element](https://www.w3.org/TR/selectors-3/#first-letter)
///
/// Move the first typographic letter of the line (with the punctuation
/// around it) into its own box, an inline box or a float depending on
/// `float`. The box is inserted before the text run, in the run's parent.
/// Returns the cursor adjusted to the new children.
#[must_use]
pub fn first_letter_to_box(
    layout_box: &mut LayoutBox,
    skip_stack: Option<SkipStack>,
    first_letter_style: &Rc<ComputedStyle>,
) -> Option<SkipStack> {
    let index = skip_stack.as_ref().map_or(0, |stack| stack.skip);
    let Some(BoxNode::Box(child)) = layout_box.children.get(index) else {
        return skip_stack;
    };
    // "position" does not apply to first-letter boxes.
    let first_letter_style = Rc::new(ComputedStyle {
        position: PositionType::Static,
        ..(**first_letter_style).clone()
    });
    let letter_tag = format!("{}::first-letter", layout_box.element_tag);
    let letter_text_style = Rc::new(ComputedStyle::inherit_from(&first_letter_style));

    if let Some(text) = child.text_str() {
        if child.element_tag.ends_with("::first-letter") {
            let mut letter_box = LayoutBox::new(BoxKind::Inline, letter_tag, first_letter_style);
            letter_box.children.push(BoxNode::Box(child.clone()));
            layout_box.children[index] = BoxNode::Box(letter_box);
            return skip_stack;
        }
        let start = skip_stack
            .as_ref()
            .and_then(|stack| stack.stack.as_deref())
            .map_or(0, |inner| inner.skip);
        let rest: Vec<char> = text.chars().skip(start).collect();
        let mut first_letter = String::new();
        let mut character_found = false;
        let mut taken = 0;
        for &next_letter in &rest {
            if !is_first_letter_punctuation(next_letter) {
                if character_found {
                    break;
                }
                character_found = true;
            }
            first_letter.push(next_letter);
            taken += 1;
        }
        if first_letter.trim_start_matches('\n').is_empty() {
            return skip_stack;
        }

        let Ok(letter_text) = LayoutBox::text(letter_tag.clone(), letter_text_style, &first_letter) else {
            return skip_stack;
        };
        let letter_box = if first_letter_style.float.is_none() {
            // "This type of initial letter is similar to an inline-level
            // element if its 'float' property is 'none', otherwise it is
            // similar to a floated element."
            let mut letter_box = LayoutBox::new(BoxKind::Inline, letter_tag, first_letter_style);
            letter_box.children.push(BoxNode::Box(letter_text));
            letter_box
        } else {
            let mut line = LayoutBox::new(BoxKind::Line, letter_tag.clone(), Rc::clone(&first_letter_style));
            line.children.push(BoxNode::Box(letter_text));
            let mut letter_box = LayoutBox::new(BoxKind::Block, letter_tag, first_letter_style);
            letter_box.children.push(BoxNode::Box(line));
            letter_box
        };

        let remaining: String = rest[taken..].iter().collect();
        if remaining.is_empty() {
            layout_box.children[index] = BoxNode::Box(letter_box);
        } else {
            let rest_box = child.copy_with_text(remaining);
            layout_box.children[index] = BoxNode::Box(rest_box);
            layout_box.children.insert(index, BoxNode::Box(letter_box));
        }
        // The text now starts where the cursor pointed.
        return (index != 0).then(|| SkipStack::leaf(index));
    }

    if child.is(Capabilities::INLINE) {
        let child_skip = skip_stack.as_ref().and_then(|stack| stack.stack.as_deref()).cloned();
        if let Some(BoxNode::Box(child)) = layout_box.children.get_mut(index) {
            let child_skip = first_letter_to_box(child, child_skip, &first_letter_style);
            return skip_stack.map(|_| SkipStack::nested(index, child_skip));
        }
    }
    skip_stack
}

/// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#phantom-line-box)
///
/// "Line boxes that contain no text, no preserved white space, no inline
/// elements with non-zero margins, padding, or borders or other in-flow
/// content (such as images, inline blocks or inline tables), and do not end
/// with a preserved newline must be treated as zero-height line boxes."
#[must_use]
pub fn is_phantom_linebox(layout_box: &LayoutBox) -> bool {
    layout_box.children.iter().all(|child| match child.as_box() {
        Some(child) if child.is(Capabilities::INLINE) => is_phantom_linebox(child) && has_no_edges(&child.style),
        Some(child) => !child.is_in_normal_flow(),
        None => true,
    })
}

fn has_no_edges(style: &ComputedStyle) -> bool {
    let margins = [style.margin_top, style.margin_right, style.margin_bottom, style.margin_left];
    let paddings = [style.padding_top, style.padding_right, style.padding_bottom, style.padding_left];
    let borders = [
        style.border_top_width,
        style.border_right_width,
        style.border_bottom_width,
        style.border_left_width,
    ];
    margins.iter().all(|margin| margin.length().is_none_or(|length| length.is_zero()))
        && paddings.iter().all(|padding| padding.is_zero())
        && borders.iter().all(|border| *border == 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{AutoLength, DisplayValue, FloatSide, WhiteSpace};
    use crate::text::ApproximateShaper;

    fn style() -> Rc<ComputedStyle> {
        Rc::new(ComputedStyle {
            font_size: 10.0,
            ..ComputedStyle::default()
        })
    }

    fn text(value: &str) -> LayoutBox {
        LayoutBox::text("p", style(), value).unwrap()
    }

    fn line(children: Vec<LayoutBox>) -> LayoutBox {
        LayoutBox::new(BoxKind::Line, "p", style()).with_children(children).unwrap()
    }

    #[test]
    fn test_skip_leading_spaces_of_first_text() {
        let l = line(vec![text("  ab")]);
        assert_eq!(
            skip_first_whitespace(&l, None),
            LeadingWhitespace::Resume(Some(SkipStack::nested(0, Some(SkipStack::leaf(2)))))
        );
    }

    #[test]
    fn test_exhausted_text_advances_to_next_sibling() {
        let l = line(vec![text("ab"), text("cd")]);
        let at_end = SkipStack::nested(0, Some(SkipStack::leaf(2)));
        assert_eq!(
            skip_first_whitespace(&l, Some(&at_end)),
            LeadingWhitespace::Resume(Some(SkipStack::leaf(1)))
        );
        let past_last = SkipStack::nested(1, Some(SkipStack::leaf(2)));
        assert_eq!(skip_first_whitespace(&l, Some(&past_last)), LeadingWhitespace::Exhausted);
    }

    #[test]
    fn test_preserved_spaces_are_not_skipped() {
        let pre = Rc::new(ComputedStyle {
            white_space: WhiteSpace::Pre,
            ..ComputedStyle::default()
        });
        let l = line(vec![LayoutBox::text("pre", pre, "  ab").unwrap()]);
        assert_eq!(skip_first_whitespace(&l, None), LeadingWhitespace::Resume(None));
    }

    #[test]
    fn test_remove_last_whitespace_shrinks_ancestors() {
        let shaper = ApproximateShaper::default();
        let context = LayoutContext::new(&shaper);
        let mut t = text("ab  ");
        t.dimensions.width = 24.0.into();
        let mut inline = LayoutBox::new(BoxKind::Inline, "span", style()).with_children([t]).unwrap();
        inline.dimensions.width = 24.0.into();
        let mut l = line(vec![inline]);
        l.dimensions.width = 30.0.into();
        remove_last_whitespace(&context, &mut l);
        assert_eq!(l.width(), 18.0);
        let inline = l.children[0].as_box().unwrap();
        assert_eq!(inline.width(), 12.0);
        assert_eq!(inline.children[0].as_box().unwrap().text_str(), Some("ab"));
    }

    #[test]
    fn test_first_letter_takes_leading_punctuation() {
        let mut l = line(vec![text("\u{ab}Hello")]);
        let letter_style = Rc::new(ComputedStyle::default());
        let skip = first_letter_to_box(&mut l, None, &letter_style);
        assert_eq!(skip, None);
        assert_eq!(l.children.len(), 2);
        let letter = l.children[0].as_box().unwrap();
        assert_eq!(letter.kind, BoxKind::Inline);
        assert_eq!(letter.children[0].as_box().unwrap().text_str(), Some("\u{ab}H"));
        assert_eq!(l.children[1].as_box().unwrap().text_str(), Some("ello"));
    }

    #[test]
    fn test_floated_first_letter_after_skipped_spaces() {
        let mut l = line(vec![text("  Go")]);
        let letter_style = Rc::new(ComputedStyle {
            float: Some(FloatSide::Left),
            ..ComputedStyle::with_display(DisplayValue::block())
        });
        let skip = SkipStack::nested(0, Some(SkipStack::leaf(2)));
        assert_eq!(first_letter_to_box(&mut l, Some(skip), &letter_style), None);
        let letter = l.children[0].as_box().unwrap();
        assert_eq!(letter.kind, BoxKind::Block);
        assert!(letter.is_floated());
        assert_eq!(l.children[1].as_box().unwrap().text_str(), Some("o"));
    }

    #[test]
    fn test_phantom_line_detection() {
        let empty_inline = LayoutBox::new(BoxKind::Inline, "span", style());
        assert!(is_phantom_linebox(&line(vec![empty_inline])));

        let padded = Rc::new(ComputedStyle {
            margin_left: AutoLength::px(2.0),
            ..ComputedStyle::default()
        });
        let margin_inline = LayoutBox::new(BoxKind::Inline, "span", padded);
        assert!(!is_phantom_linebox(&line(vec![margin_inline])));
        assert!(!is_phantom_linebox(&line(vec![text("x")])));
    }
}
