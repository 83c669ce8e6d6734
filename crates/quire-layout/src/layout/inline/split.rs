//! Fitting inline content into the width of a line.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "When an inline box exceeds the width of a line box, it is split into
//! several boxes and these boxes are distributed across several line boxes.
//! If an inline box cannot be split (e.g., if the inline box contains a
//! single character, or language specific word breaking rules disallow a
//! break within the inline box, or if the inline box is affected by a
//! white-space value of nowrap or pre), then the inline box overflows the
//! line box."

use std::rc::Rc;

use crate::style::{BoxDecorationBreak, Direction, FloatSide, PositionType};

use super::super::absolute::{AbsolutePlaceholder, PlaceholderRef, absolute_layout};
use super::super::context::{ContainingBlock, LayoutContext};
use super::super::float::float_layout;
use super::super::layout_box::{BoxNode, Capabilities, LayoutBox};
use super::super::percentages::resolve_percentages;
use super::super::preferred::{shrink_to_fit, trailing_whitespace_size};
use super::super::skip_stack::SkipStack;
use super::super::values::AutoOr;
use super::atomic::atomic_box;

/// Separators allowed between two lines of a text box when a preserved
/// line break ended the first one.
const LINE_BREAKS: [char; 8] = [
    '\n', '\t', '\u{c}', '\u{85}', '\u{2028}', '\u{2029}', '\r', '\u{b}',
];

/// [§ 5 Line Breaking](https://www.w3.org/TR/css-text-3/#line-breaking)
///
/// "For Web-compatibility there is a soft wrap opportunity before and after
/// each replaced element or other atomic inline." Atomic boxes break like
/// an ideographic character.
const ATOMIC_LETTER: char = '\u{2e80}';

/// Last character of a split box, as seen by the break test with the next
/// sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastLetter {
    /// A regular character.
    Char(char),
    /// The box ended with a space that collapsed into the next sibling.
    CollapsedSpace,
}

/// Margin widths of the floats placed while splitting a box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FloatWidths {
    /// Left floats.
    pub left: f32,
    /// Right floats.
    pub right: f32,
}

/// Out-of-flow boxes collected while building one line.
#[derive(Debug, Default)]
pub struct LineLists {
    /// Absolutely positioned placeholders, resolved by the block container.
    pub absolute_boxes: Vec<PlaceholderRef>,
    /// Fixed positioned placeholders, resolved per page.
    pub fixed_boxes: Vec<PlaceholderRef>,
    /// Every placeholder created on the line, for static positioning.
    pub line_placeholders: Vec<PlaceholderRef>,
    /// Floats that did not fit and go below the line.
    pub waiting_floats: Vec<LayoutBox>,
}

#[derive(Debug, Clone, Copy)]
struct ListMarks {
    absolute_boxes: usize,
    fixed_boxes: usize,
    line_placeholders: usize,
    waiting_floats: usize,
    excluded_shapes: usize,
}

impl LineLists {
    fn marks(&self, context: &LayoutContext<'_>) -> ListMarks {
        ListMarks {
            absolute_boxes: self.absolute_boxes.len(),
            fixed_boxes: self.fixed_boxes.len(),
            line_placeholders: self.line_placeholders.len(),
            waiting_floats: self.waiting_floats.len(),
            excluded_shapes: context.excluded_shapes.len(),
        }
    }

    /// Forget everything recorded after `marks`, floats placed included.
    fn rollback(&mut self, context: &mut LayoutContext<'_>, marks: ListMarks) {
        self.absolute_boxes.truncate(marks.absolute_boxes);
        self.fixed_boxes.truncate(marks.fixed_boxes);
        self.line_placeholders.truncate(marks.line_placeholders);
        self.waiting_floats.truncate(marks.waiting_floats);
        context.excluded_shapes.truncate(marks.excluded_shapes);
    }
}

/// Result of fitting an inline-level box in a width.
#[derive(Debug, Default)]
pub struct InlineSplit {
    /// The part of the box that fits, `None` for text with nothing to show.
    pub new_box: Option<LayoutBox>,
    /// Where the next line resumes, `None` when everything fit.
    pub resume_at: Option<SkipStack>,
    /// The split happened at a preserved line break.
    pub preserved_line_break: bool,
    /// First character of the content, for the break test with the
    /// previous sibling.
    pub first_letter: Option<char>,
    /// Last character of the content.
    pub last_letter: Option<LastLetter>,
    /// Floats placed directly inside the box.
    pub float_widths: FloatWidths,
    /// Horizontal shift that floats placed inside the box apply to the
    /// content laid out earlier on the line.
    pub line_shift: f32,
}

/// Fit as much of an inline-level box as possible between `position_x` and
/// `max_x`.
///
/// The result is never empty unless the box is, and overflows `max_x` only
/// when no break is possible.
///
/// # Panics
/// If the box is not inline-level, or on a skip stack going below a text box.
#[allow(clippy::too_many_arguments)]
pub fn split_inline_level(
    context: &mut LayoutContext<'_>,
    layout_box: &LayoutBox,
    position_x: f32,
    position_y: f32,
    max_x: f32,
    skip_stack: Option<&SkipStack>,
    containing_block: &ContainingBlock,
    lists: &mut LineLists,
) -> InlineSplit {
    if let Some(content) = layout_box.text_content() {
        let skip = match skip_stack {
            Some(stack) => {
                assert!(stack.stack.is_none(), "skip stack {stack} goes below a text box");
                stack.skip
            }
            None => 0,
        };
        let (new_box, resume_at, preserved_line_break) =
            split_text_box(context, layout_box, Some(max_x - position_x), skip);
        let new_box = new_box.map(|mut new_box| {
            new_box.dimensions.position_x = position_x;
            new_box.dimensions.position_y = position_y;
            new_box
        });
        let chars: Vec<char> = content.text.chars().collect();
        let last_letter = match resume_at {
            Some(resume) => chars.get(resume - 1).copied(),
            None => chars.last().copied(),
        };
        return InlineSplit {
            new_box,
            resume_at: resume_at.map(SkipStack::leaf),
            preserved_line_break,
            first_letter: chars.get(skip).copied(),
            last_letter: last_letter.map(LastLetter::Char),
            ..InlineSplit::default()
        };
    }

    if layout_box.is(Capabilities::INLINE) {
        let mut shell = layout_box.clone_without_children();
        resolve_percentages(&mut shell, containing_block.width, containing_block.height);
        shell.dimensions.position_y = position_y;
        shell.dimensions.zero_auto_margins(false, true);
        return split_inline_children(
            context,
            &shell,
            &layout_box.children,
            position_x,
            max_x,
            skip_stack,
            containing_block,
            lists,
        );
    }

    if layout_box.is(Capabilities::ATOMIC_INLINE_LEVEL) {
        let mut new_box = atomic_box(
            context,
            layout_box,
            position_x,
            skip_stack,
            containing_block,
            &mut lists.absolute_boxes,
            &mut lists.fixed_boxes,
        );
        new_box.dimensions.position_x = position_x;
        return InlineSplit {
            new_box: Some(new_box),
            first_letter: Some(ATOMIC_LETTER),
            last_letter: Some(LastLetter::Char(ATOMIC_LETTER)),
            ..InlineSplit::default()
        };
    }

    panic!("inline layout of {} is not handled", layout_box.kind.name())
}

/// Split a line or inline box. The box's own percentages must already be
/// resolved.
///
/// # Panics
/// If the box is neither a line nor an inline box.
#[allow(clippy::too_many_arguments)]
pub fn split_inline_box(
    context: &mut LayoutContext<'_>,
    layout_box: &LayoutBox,
    position_x: f32,
    max_x: f32,
    skip_stack: Option<&SkipStack>,
    containing_block: &ContainingBlock,
    lists: &mut LineLists,
) -> InlineSplit {
    split_inline_children(
        context,
        layout_box,
        &layout_box.children,
        position_x,
        max_x,
        skip_stack,
        containing_block,
        lists,
    )
}

#[allow(clippy::too_many_arguments, clippy::too_many_lines)]
fn split_inline_children(
    context: &mut LayoutContext<'_>,
    shell: &LayoutBox,
    children: &[BoxNode],
    mut position_x: f32,
    max_x: f32,
    skip_stack: Option<&SkipStack>,
    containing_block: &ContainingBlock,
    lists: &mut LineLists,
) -> InlineSplit {
    assert!(
        shell.is(Capabilities::LINE | Capabilities::INLINE),
        "expected a line or inline box, got {}",
        shell.kind.name()
    );

    // Shrink-to-fit widths come back as sums of the same advances, with
    // rounding errors that must not cause a break.
    let mut max_x = max_x * (1.0 + 1e-9);

    let is_line = shell.is(Capabilities::LINE);
    let direction = shell.style.direction;
    let is_start = skip_stack.is_none();
    let initial_position_x = position_x;
    let initial_skip_stack = skip_stack;

    let d = &shell.dimensions;
    let left_spacing = d.padding.left + d.margin.left.px() + d.border.left;
    let right_spacing = d.padding.right + d.margin.right.px() + d.border.right;
    let content_box_left = position_x;

    let mut laid_out: Vec<(usize, BoxNode)> = Vec::new();
    let mut waiting_children: Vec<(usize, BoxNode)> = Vec::new();
    let mut preserved_line_break = false;
    let mut first_letter: Option<char> = None;
    let mut last_letter: Option<LastLetter> = None;
    let mut float_widths = FloatWidths::default();
    let mut line_shift = 0.0;
    let mut float_resume_at = 0;

    // A relatively positioned inline box is the containing block of the
    // absolutely positioned boxes inside it.
    let is_relative = shell.style.position == PositionType::Relative;
    let enclosing_absolute_boxes = is_relative.then(|| std::mem::take(&mut lists.absolute_boxes));

    let (skip, mut skip_stack) = skip_stack.map_or((0, None), SkipStack::split);
    let mut resume_at: Option<SkipStack> = None;
    let mut broken = false;

    for (index, node) in children.iter().enumerate().skip(skip) {
        if node.with_box(LayoutBox::is_absolutely_positioned) {
            let mut child = node.with_box(LayoutBox::clone);
            child.dimensions.position_x = position_x;
            child.dimensions.position_y = shell.position_y();
            let is_fixed = child.style.position == PositionType::Fixed;
            let placeholder = AbsolutePlaceholder::new(child);
            lists.line_placeholders.push(Rc::clone(&placeholder));
            if is_fixed {
                lists.fixed_boxes.push(Rc::clone(&placeholder));
            } else {
                lists.absolute_boxes.push(Rc::clone(&placeholder));
            }
            waiting_children.push((index, BoxNode::Placeholder(placeholder)));
            continue;
        }
        let Some(child) = node.as_box() else {
            continue;
        };

        if child.is_floated() {
            let mut float_box = child.clone();
            float_box.dimensions.position_x = position_x;
            float_box.dimensions.position_y = shell.position_y();
            let mut float_width = shrink_to_fit(context, &float_box, containing_block.width);

            // The trailing spaces of the line do not take room from floats.
            let last_non_floating = laid_out
                .iter()
                .chain(&waiting_children)
                .filter(|(_, node)| !node.is_floated())
                .last();
            if let Some((_, last)) = last_non_floating {
                float_width -= last.with_box(|last| trailing_whitespace_size(context, last));
            }

            if float_width > max_x - position_x || !lists.waiting_floats.is_empty() {
                lists.waiting_floats.push(float_box);
            } else {
                let float_box = float_layout(
                    context,
                    float_box,
                    containing_block,
                    &mut lists.absolute_boxes,
                    &mut lists.fixed_boxes,
                );
                let dx = float_box.margin_width().max(0.0);
                let side = float_box.float_side();
                match side {
                    Some(FloatSide::Left) => {
                        float_widths.left += dx;
                        // Inside an inline box, the line moves its position
                        // itself when the inline box comes back.
                        if is_line {
                            position_x += dx;
                        }
                    }
                    Some(FloatSide::Right) => {
                        float_widths.right += dx;
                        max_x -= dx;
                    }
                    None => {}
                }
                if pushes_line_content(side, direction) {
                    line_shift += dx;
                    if is_line {
                        shift_in_flow(&mut laid_out, &mut waiting_children, dx);
                    }
                }
                waiting_children.push((index, BoxNode::Box(float_box)));
            }
            float_resume_at = index + 1;
            continue;
        }

        let last_child = index == children.len() - 1;
        let mut available_width = max_x;
        let enclosing_waiting_floats = std::mem::take(&mut lists.waiting_floats);
        let marks = lists.marks(context);
        let mut split = split_inline_level(
            context,
            child,
            position_x,
            shell.position_y(),
            available_width,
            skip_stack,
            containing_block,
            lists,
        );
        if last_child && right_spacing != 0.0 && split.resume_at.is_none() {
            // The last child must also leave room for the end decoration.
            lists.rollback(context, marks);
            available_width -= match direction {
                Direction::Rtl => left_spacing,
                Direction::Ltr => right_spacing,
            };
            split = split_inline_level(
                context,
                child,
                position_x,
                shell.position_y(),
                available_width,
                skip_stack,
                containing_block,
                lists,
            );
        }
        let mut child_waiting_floats =
            std::mem::replace(&mut lists.waiting_floats, enclosing_waiting_floats);

        #[cfg(feature = "layout-trace")]
        log::trace!(
            target: "quire::layout",
            "split child {index} ({}) of {} at x={position_x}: resume {:?}",
            child.kind.name(),
            shell.element_tag,
            split.resume_at
        );

        match direction {
            Direction::Rtl => max_x -= split.float_widths.left,
            Direction::Ltr => max_x -= split.float_widths.right,
        }
        if split.line_shift != 0.0 {
            if is_line {
                shift_in_flow(&mut laid_out, &mut waiting_children, split.line_shift);
            } else {
                line_shift += split.line_shift;
            }
        }

        skip_stack = None;
        if split.preserved_line_break {
            preserved_line_break = true;
        }

        let can_break = match (last_letter, split.first_letter) {
            (Some(LastLetter::CollapsedSpace), Some(first)) => context.shaper().can_break_between(' ', first),
            _ if !shell.style.white_space.wraps() => false,
            (Some(LastLetter::Char(last)), Some(first)) => context.shaper().can_break_between(last, first),
            _ => false,
        };
        if can_break {
            laid_out.append(&mut waiting_children);
        }

        if first_letter.is_none() {
            first_letter = split.first_letter;
        }
        last_letter = if child.trailing_collapsible_space {
            Some(LastLetter::CollapsedSpace)
        } else {
            split.last_letter
        };

        let mut child_resume_at = split.resume_at;
        match split.new_box {
            None => assert!(
                child.is(Capabilities::TEXT),
                "only text boxes may come back empty, got {}",
                child.kind.name()
            ),
            Some(new_child) => {
                let trailing_whitespace = new_child.text_str().is_some_and(|text| text.trim().is_empty());
                let new_position_x = new_child.position_x() + new_child.margin_width();

                if new_position_x > max_x && !trailing_whitespace {
                    if let Some((found_at, resumed)) =
                        break_waiting_child(context, &waiting_children, containing_block, lists)
                    {
                        let (child_index, waiting) = &waiting_children[found_at];
                        let child_index = *child_index;
                        let waiting_is_text = waiting.as_box().is_some_and(|waiting| waiting.is(Capabilities::TEXT));
                        // The shaper may refuse the break, the child is then
                        // kept whole on this line.
                        let break_found = resumed.resume_at.is_some();
                        let child_resume = resumed.resume_at.unwrap_or(SkipStack::leaf(0));
                        waiting_children.truncate(found_at);
                        laid_out.append(&mut waiting_children);
                        match resumed.new_box {
                            Some(new_box) => laid_out.push((child_index, BoxNode::Box(new_box))),
                            None => assert!(waiting_is_text, "only text boxes may come back empty"),
                        }
                        // The re-split child already started at the original
                        // cursor, so its resume offsets are relative to it.
                        resume_at = Some(SkipStack::combine(
                            initial_skip_stack,
                            child_index,
                            Some(child_resume),
                        ));
                        if break_found {
                            broken = true;
                            break;
                        }
                    }
                    if let Some(&(last_index, _)) = laid_out.last() {
                        // Nothing breaks and the line is not empty: the child
                        // goes entirely on the next line.
                        resume_at = Some(SkipStack::leaf(last_index + 1));
                        broken = true;
                        break;
                    }
                }

                position_x = new_position_x;
                waiting_children.push((index, BoxNode::Box(new_child)));
            }
        }

        lists.waiting_floats.append(&mut child_waiting_floats);
        if let Some(child_resume) = child_resume_at.take() {
            laid_out.append(&mut waiting_children);
            resume_at = Some(SkipStack::nested(index, Some(child_resume)));
            broken = true;
            break;
        }
    }
    if !broken {
        laid_out.append(&mut waiting_children);
        resume_at = None;
    }

    let is_end = resume_at.is_none();
    let new_children = laid_out.into_iter().map(|(_, node)| node).collect();
    let mut new_box = shell.copy_with_children(new_children, is_start, is_end);

    if is_line {
        let last_in_flow = new_box.children.iter().rev().find(|child| child.is_in_normal_flow());
        let right = last_in_flow.map_or(new_box.position_x(), |child| child.position_x() + child.margin_width());
        new_box.dimensions.width = (right - new_box.position_x()).into();
    } else {
        new_box.dimensions.position_x = initial_position_x;
        let translation_needed = match (shell.style.box_decoration_break, direction) {
            (BoxDecorationBreak::Clone, _) => true,
            (BoxDecorationBreak::Slice, Direction::Ltr) => is_start,
            (BoxDecorationBreak::Slice, Direction::Rtl) => is_end,
        };
        if translation_needed {
            for child in &mut new_box.children {
                child.translate(left_spacing, 0.0, false);
            }
        }
        new_box.dimensions.width = (position_x - content_box_left).into();
        new_box.translate(float_widths.left, 0.0, true);
    }

    // [§ 10.8.1](https://www.w3.org/TR/CSS2/visudet.html#leading)
    // The box is as tall as its strut: margins take the half-leading, minus
    // borders and paddings so that the margin height is the line height.
    let (line_height, strut_baseline) = context.shaper().strut(&shell.style);
    let font_size = shell.style.font_size;
    let half_leading = (line_height - font_size) / 2.0;
    let d = &mut new_box.dimensions;
    d.baseline = Some(strut_baseline);
    d.height = font_size.into();
    d.margin.top = AutoOr::Length(half_leading - d.border.top - d.padding.top);
    d.margin.bottom = AutoOr::Length(half_leading - d.border.bottom - d.padding.bottom);

    if let Some(enclosing) = enclosing_absolute_boxes {
        for placeholder in std::mem::replace(&mut lists.absolute_boxes, enclosing) {
            absolute_layout(context, &placeholder, &new_box, &mut lists.fixed_boxes);
        }
    }

    if let Some(resume) = &resume_at
        && resume.skip < float_resume_at
    {
        resume_at = Some(SkipStack::leaf(float_resume_at));
    }

    InlineSplit {
        new_box: Some(new_box),
        resume_at,
        preserved_line_break,
        first_letter,
        last_letter,
        float_widths,
        line_shift,
    }
}

/// Try to break the most recent breakable waiting child, re-splitting it
/// one pixel narrower than it was laid out.
///
/// Returns the position of the child in `waiting_children` and the new
/// split, or `None` when no waiting child can break.
fn break_waiting_child(
    context: &mut LayoutContext<'_>,
    waiting_children: &[(usize, BoxNode)],
    containing_block: &ContainingBlock,
    lists: &mut LineLists,
) -> Option<(usize, InlineSplit)> {
    for (position, (_, node)) in waiting_children.iter().enumerate().rev() {
        let Some(waiting) = node.as_box() else {
            continue;
        };
        if !(waiting.is_in_normal_flow() && can_break_inside(context, waiting)) {
            continue;
        }
        let max_x = waiting.position_x() + waiting.margin_width() - 1.0;
        let split = split_inline_level(
            context,
            waiting,
            waiting.position_x(),
            waiting.position_y(),
            max_x,
            None,
            containing_block,
            lists,
        );
        return Some((position, split));
    }
    None
}

/// Whether a float on `side` pushes the content already on the line.
fn pushes_line_content(side: Option<FloatSide>, direction: Direction) -> bool {
    matches!(
        (side, direction),
        (Some(FloatSide::Left), Direction::Ltr) | (Some(FloatSide::Right), Direction::Rtl)
    )
}

fn shift_in_flow(laid_out: &mut [(usize, BoxNode)], waiting_children: &mut [(usize, BoxNode)], dx: f32) {
    for (_, node) in laid_out.iter_mut().chain(waiting_children.iter_mut()) {
        if node.is_in_normal_flow() {
            node.translate(dx, 0.0, true);
        }
    }
}

/// [§ 3 White Space and Wrapping](https://www.w3.org/TR/css-text-3/#white-space-property)
///
/// Whether the box has a soft wrap opportunity inside it.
#[must_use]
pub fn can_break_inside(context: &LayoutContext<'_>, layout_box: &LayoutBox) -> bool {
    if layout_box.is(Capabilities::ATOMIC_INLINE_LEVEL) || !layout_box.style.white_space.wraps() {
        return false;
    }
    if let Some(text) = layout_box.text_str() {
        return context.shaper().can_break_inside(text);
    }
    layout_box.is(Capabilities::PARENT)
        && layout_box
            .children
            .iter()
            .any(|child| child.as_box().is_some_and(|child| can_break_inside(context, child)))
}

/// Keep as much of a text box as fits in `available_width`, starting at
/// character `skip`.
///
/// Returns the new box (`None` when nothing is left or the font size is
/// zero), the absolute character offset to resume at, and whether the
/// text was broken at a preserved line break.
///
/// # Panics
/// If the shaper reports a zero resume offset, or if anything other than
/// a line break separates the two lines.
#[must_use]
pub fn split_text_box(
    context: &LayoutContext<'_>,
    text_box: &LayoutBox,
    available_width: Option<f32>,
    skip: usize,
) -> (Option<LayoutBox>, Option<usize>, bool) {
    let Some(content) = text_box.text_content() else {
        panic!("split_text_box called on {}", text_box.kind.name());
    };
    let style = &text_box.style;
    let chars: Vec<char> = content.text.chars().skip(skip).collect();
    if style.font_size == 0.0 || chars.is_empty() {
        return (None, None, false);
    }
    let text: String = chars.iter().collect();
    let shaper = context.shaper();
    let line = shaper.split_first_line(&text, style, available_width, content.justification_spacing);
    assert_ne!(line.resume_at, Some(0), "shaper resumed '{text}' at offset zero");

    let new_box = (line.length > 0).then(|| {
        let mut new_box = text_box.copy_with_text(line.text.clone());
        let (line_height, _) = shaper.strut(style);
        let half_leading = (line_height - line.height) / 2.0;
        let d = &mut new_box.dimensions;
        d.width = line.width.into();
        d.height = line.height.into();
        // Only the line height counts: margins make the margin height equal
        // to it, and the baseline is measured from the margin box top.
        d.margin.top = AutoOr::Length(half_leading);
        d.margin.bottom = AutoOr::Length(half_leading);
        d.baseline = Some(line.baseline + half_leading);
        if let Some(content) = new_box.text_content_mut() {
            content.visual_text = line.visual_text.clone();
        }
        new_box
    });

    let mut preserved_line_break = false;
    let resume_at = line.resume_at.map(|resume| {
        let between: String = chars[line.length..resume].iter().collect();
        preserved_line_break = line.length != resume && !between.trim_matches(' ').is_empty();
        if preserved_line_break {
            assert!(
                between.trim_matches(' ').chars().all(|c| LINE_BREAKS.contains(&c)),
                "got {between:?} between two lines, expected nothing or a preserved line break"
            );
        }
        resume + skip
    });

    (new_box, resume_at, preserved_line_break)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::BoxKind;
    use crate::style::{ComputedStyle, WhiteSpace};
    use crate::text::{ApproximateShaper, TextShaper};

    fn style(white_space: WhiteSpace) -> Rc<ComputedStyle> {
        Rc::new(ComputedStyle {
            font_size: 10.0,
            white_space,
            ..ComputedStyle::default()
        })
    }

    fn text(value: &str) -> LayoutBox {
        LayoutBox::text("p", style(WhiteSpace::Normal), value).unwrap()
    }

    fn line(children: Vec<LayoutBox>) -> LayoutBox {
        LayoutBox::new(BoxKind::Line, "p", style(WhiteSpace::Normal))
            .with_children(children)
            .unwrap()
    }

    fn cb() -> ContainingBlock {
        ContainingBlock {
            x: 0.0,
            y: 0.0,
            width: 200.0,
            height: None,
            direction: Direction::Ltr,
        }
    }

    fn texts(line: &LayoutBox) -> Vec<&str> {
        line.children
            .iter()
            .filter_map(BoxNode::as_box)
            .filter_map(LayoutBox::text_str)
            .collect()
    }

    #[test]
    fn test_split_text_box_breaks_at_space() {
        let shaper = ApproximateShaper::default();
        let context = LayoutContext::new(&shaper);
        let t = text("Hello world");
        let (first, resume, preserved) = split_text_box(&context, &t, Some(40.0), 0);
        let first = first.unwrap();
        assert_eq!(first.text_str(), Some("Hello"));
        assert_eq!(first.width(), 30.0);
        assert_eq!(resume, Some(6));
        assert!(!preserved);

        let (rest, resume, _) = split_text_box(&context, &t, Some(40.0), 6);
        assert_eq!(rest.unwrap().text_str(), Some("world"));
        assert_eq!(resume, None);
    }

    #[test]
    fn test_split_text_box_margin_height_is_line_height() {
        let shaper = ApproximateShaper::default();
        let context = LayoutContext::new(&shaper);
        let (first, _, _) = split_text_box(&context, &text("ab"), None, 0);
        let first = first.unwrap();
        let (line_height, _) = shaper.strut(&first.style);
        assert!((first.margin_height() - line_height).abs() < 1e-4);
    }

    #[test]
    fn test_split_text_box_reports_preserved_newline() {
        let shaper = ApproximateShaper::default();
        let context = LayoutContext::new(&shaper);
        let t = LayoutBox::text("pre", style(WhiteSpace::PreLine), "ab\ncd").unwrap();
        let (first, resume, preserved) = split_text_box(&context, &t, None, 0);
        assert_eq!(first.unwrap().text_str(), Some("ab"));
        assert_eq!(resume, Some(3));
        assert!(preserved);
    }

    #[test]
    fn test_exhausted_text_gives_nothing() {
        let shaper = ApproximateShaper::default();
        let context = LayoutContext::new(&shaper);
        assert_eq!(split_text_box(&context, &text("ab"), None, 2), (None, None, false));
    }

    #[test]
    fn test_two_runs_fit_on_one_line() {
        let shaper = ApproximateShaper::default();
        let mut context = LayoutContext::new(&shaper);
        let mut lists = LineLists::default();
        let l = line(vec![text("aaa "), text("bbbb")]);
        let split = split_inline_box(&mut context, &l, 0.0, 50.0, None, &cb(), &mut lists);
        assert_eq!(split.resume_at, None);
        let new_line = split.new_box.unwrap();
        assert_eq!(texts(&new_line), ["aaa ", "bbbb"]);
        assert_eq!(new_line.width(), 48.0);
    }

    #[test]
    fn test_unbreakable_run_moves_to_next_line() {
        let shaper = ApproximateShaper::default();
        let mut context = LayoutContext::new(&shaper);
        let mut lists = LineLists::default();
        let l = line(vec![text("aaa "), text("bbbb")]);
        let split = split_inline_box(&mut context, &l, 0.0, 40.0, None, &cb(), &mut lists);
        assert_eq!(split.resume_at, Some(SkipStack::leaf(1)));
        assert_eq!(texts(&split.new_box.unwrap()), ["aaa "]);
    }

    #[test]
    fn test_overflow_breaks_inside_waiting_child() {
        let shaper = ApproximateShaper::default();
        let mut context = LayoutContext::new(&shaper);
        let mut lists = LineLists::default();
        let l = line(vec![text("aa bb"), text("cc")]);
        let split = split_inline_box(&mut context, &l, 0.0, 40.0, None, &cb(), &mut lists);
        assert_eq!(split.resume_at, Some(SkipStack::nested(0, Some(SkipStack::leaf(3)))));
        assert_eq!(texts(&split.new_box.unwrap()), ["aa"]);
    }

    #[test]
    fn test_absolute_child_becomes_placeholder() {
        let shaper = ApproximateShaper::default();
        let mut context = LayoutContext::new(&shaper);
        let mut lists = LineLists::default();
        let absolute = Rc::new(ComputedStyle {
            position: PositionType::Absolute,
            ..ComputedStyle::with_display(crate::style::DisplayValue::block())
        });
        let mut l = line(vec![text("ab")]);
        l.append_child(LayoutBox::new(BoxKind::Block, "div", absolute)).unwrap();
        let split = split_inline_box(&mut context, &l, 0.0, 100.0, None, &cb(), &mut lists);
        assert_eq!(lists.absolute_boxes.len(), 1);
        assert_eq!(lists.line_placeholders.len(), 1);
        let new_line = split.new_box.unwrap();
        assert!(matches!(new_line.children[1], BoxNode::Placeholder(_)));
        // Placeholders take no room on the line.
        assert_eq!(new_line.width(), 12.0);
        assert_eq!(lists.absolute_boxes[0].borrow().layout_box().position_x(), 12.0);
    }
}
