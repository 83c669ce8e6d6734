//! Inline formatting contexts.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "In an inline formatting context, boxes are laid out horizontally, one
//! after the other, beginning at the top of a containing block."
//!
//! A line box of the box tree holds all the inline content of a block
//! container. Layout cuts it into as many laid-out line boxes as needed,
//! one at a time, each resuming where the previous one stopped.

pub mod align;
pub mod atomic;
pub mod split;
pub mod vertical;
pub mod whitespace;

use std::rc::Rc;

use crate::style::ComputedStyle;

use self::align::text_align;
use self::split::{LineLists, split_inline_box};
use self::vertical::line_box_verticality;
use self::whitespace::{
    LeadingWhitespace, first_letter_to_box, is_phantom_linebox, remove_last_whitespace, skip_first_whitespace,
};
use super::absolute::PlaceholderRef;
use super::context::{ContainingBlock, LayoutContext};
use super::float::{avoid_collisions, float_layout};
use super::layout_box::{BoxNode, LayoutBox};
use super::percentages::resolve_percentages;
use super::preferred::inline_min_content_width;
use super::skip_stack::SkipStack;
use super::values::AutoOr;

/// One laid-out line and where the next one starts.
#[derive(Debug)]
pub struct LaidOutLine {
    /// The line, with as much content as fits in the available width.
    pub line: LayoutBox,
    /// Cursor for the next line, `None` after the last one.
    pub resume_at: Option<SkipStack>,
}

/// Lines of a line box, laid out one at a time by [`LineBoxes::next_line`].
#[derive(Debug)]
pub struct LineBoxes {
    template: LayoutBox,
    position_y: f32,
    skip_stack: Option<SkipStack>,
    containing_block: ContainingBlock,
    first_letter_style: Option<Rc<ComputedStyle>>,
    done: bool,
}

/// Start laying out the lines of `line` from `skip_stack`, the first one at
/// `position_y`.
///
/// `first_letter_style` is the `::first-letter` style of the block
/// container, given when `line` is its first line box.
#[must_use]
pub fn iter_line_boxes(
    line: &LayoutBox,
    position_y: f32,
    skip_stack: Option<SkipStack>,
    containing_block: &ContainingBlock,
    first_letter_style: Option<Rc<ComputedStyle>>,
) -> LineBoxes {
    let mut template = line.clone();
    resolve_percentages(&mut template, containing_block.width, containing_block.height);
    // [§ 16.1 Indentation](https://www.w3.org/TR/CSS2/text.html#indentation-prop)
    // "'Text-indent' only affects a line if it is the first formatted line
    // of an element."
    template.text_indent = if skip_stack.is_none() {
        template.style.text_indent.resolve(containing_block.width)
    } else {
        0.0
    };

    let mut first_letter_style = first_letter_style;
    if skip_stack.is_some()
        && let Some(style) = first_letter_style.take()
    {
        // The first line was laid out before, from this line box with its
        // first letter split out. Split it again so that the cursor points
        // into the same children.
        if let LeadingWhitespace::Resume(leading) = skip_first_whitespace(&template, None) {
            let _ = first_letter_to_box(&mut template, leading, &style);
        }
    }

    LineBoxes {
        template,
        position_y,
        skip_stack,
        containing_block: *containing_block,
        first_letter_style,
        done: false,
    }
}

impl LineBoxes {
    /// Lay out the next line, collecting the absolutely and fixed positioned
    /// boxes it contains. Returns `None` once the content is exhausted.
    pub fn next_line(
        &mut self,
        context: &mut LayoutContext<'_>,
        absolute_boxes: &mut Vec<PlaceholderRef>,
        fixed_boxes: &mut Vec<PlaceholderRef>,
    ) -> Option<LaidOutLine> {
        if self.done {
            return None;
        }
        let laid_out = get_next_linebox(
            context,
            &mut self.template,
            self.position_y,
            self.skip_stack.as_ref(),
            &self.containing_block,
            absolute_boxes,
            fixed_boxes,
            self.first_letter_style.take(),
        );
        match &laid_out {
            Some(laid_out) => {
                self.position_y = laid_out.line.position_y() + laid_out.line.height();
                self.skip_stack.clone_from(&laid_out.resume_at);
                self.done = laid_out.resume_at.is_none();
                self.template.text_indent = 0.0;
            }
            None => self.done = true,
        }
        laid_out
    }

    /// Where the next line will start.
    #[must_use]
    pub const fn skip_stack(&self) -> Option<&SkipStack> {
        self.skip_stack.as_ref()
    }
}

/// Lay out the line starting at `skip_stack`, as wide as the floats at
/// `position_y` allow.
///
/// Returns `None` when nothing but collapsible white space is left.
#[allow(clippy::too_many_arguments, clippy::too_many_lines)]
pub fn get_next_linebox(
    context: &mut LayoutContext<'_>,
    linebox: &mut LayoutBox,
    position_y: f32,
    skip_stack: Option<&SkipStack>,
    containing_block: &ContainingBlock,
    absolute_boxes: &mut Vec<PlaceholderRef>,
    fixed_boxes: &mut Vec<PlaceholderRef>,
    first_letter_style: Option<Rc<ComputedStyle>>,
) -> Option<LaidOutLine> {
    // STEP 1: Skip the collapsible spaces starting the line.
    let skip_stack = match skip_first_whitespace(linebox, skip_stack) {
        LeadingWhitespace::Exhausted => return None,
        LeadingWhitespace::Resume(skip_stack) => skip_stack,
    };

    // STEP 2: Split out the first letter.
    let skip_stack = match &first_letter_style {
        Some(style) => first_letter_to_box(linebox, skip_stack, style),
        None => skip_stack,
    };

    // STEP 3: Find room between the floats.
    linebox.dimensions.position_y = position_y;
    if context.excluded_shapes.is_empty() {
        // The width and height will come from the laid-out line.
        linebox.dimensions.width = 0.0.into();
        linebox.dimensions.height = 0.0.into();
    } else {
        let width = inline_min_content_width(context, linebox, true, skip_stack.as_ref(), true);
        let (line_height, _) = context.shaper().strut(&linebox.style);
        linebox.dimensions.width = width.into();
        linebox.dimensions.height = line_height.into();
    }
    let (mut position_x, mut position_y, mut available_width) =
        avoid_collisions(&context.excluded_shapes, linebox, containing_block, false);

    let mut candidate_height = linebox.height();
    let excluded_shapes = context.excluded_shapes.clone();

    let (mut line, resume_at, lists) = loop {
        linebox.dimensions.position_x = position_x;
        linebox.dimensions.position_y = position_y;
        let max_x = position_x + available_width;

        // STEP 4: Fit the content. Lists start empty on every attempt.
        let mut lists = LineLists::default();
        let split = split_inline_box(
            context,
            linebox,
            position_x + linebox.text_indent,
            max_x,
            skip_stack.as_ref(),
            containing_block,
            &mut lists,
        );
        let Some(mut line) = split.new_box else {
            panic!("line box of '{}' split into nothing", linebox.element_tag);
        };
        linebox.dimensions.width = line.dimensions.width;
        linebox.dimensions.height = line.dimensions.height;

        // STEP 5: Phantom lines take no room.
        if is_phantom_linebox(&line) && !split.preserved_line_break {
            line.dimensions.height = 0.0.into();
            break (line, split.resume_at, lists);
        }

        // STEP 6: Drop the collapsible spaces ending the line.
        remove_last_whitespace(context, &mut line);

        // STEP 7: Align, against the room left next to the floats by the
        // actual content.
        let (new_position_x, _, new_available_width) =
            avoid_collisions(&context.excluded_shapes, linebox, containing_block, false);
        let new_available_width = new_available_width - split.float_widths.right;
        let alignment_available_width = new_available_width + new_position_x - linebox.position_x();
        let last = split.resume_at.is_none() || split.preserved_line_break;
        let offset_x = text_align(&mut line, alignment_available_width, last);

        // STEP 8: Align vertically and place the line.
        let (bottom, top) = line_box_verticality(context, &mut line);
        line.dimensions.baseline = Some(-top);
        line.dimensions.position_y = top;
        line.dimensions.height = (bottom - top).into();
        line.dimensions.margin.top = AutoOr::Length(0.0);
        line.dimensions.margin.bottom = AutoOr::Length(0.0);
        line.translate(offset_x, position_y - top, true);
        // Translating back and forth loses precision.
        line.dimensions.position_y = position_y;

        #[cfg(feature = "layout-trace")]
        log::trace!(
            target: "quire::layout",
            "line of '{}' at ({position_x}, {position_y}): {}x{}, resume {:?}",
            linebox.element_tag,
            line.width(),
            line.height(),
            split.resume_at
        );

        if line.height() <= candidate_height {
            break (line, split.resume_at, lists);
        }
        candidate_height = line.height();

        // The line grew taller than expected: look for room again, without
        // the floats placed by this attempt.
        let new_excluded_shapes = std::mem::replace(&mut context.excluded_shapes, excluded_shapes.clone());
        let (retry_x, retry_y, retry_width) =
            avoid_collisions(&context.excluded_shapes, &line, containing_block, false);
        if retry_x == linebox.position_x() && retry_y == linebox.position_y() {
            context.excluded_shapes = new_excluded_shapes;
            break (line, split.resume_at, lists);
        }
        position_x = retry_x;
        position_y = retry_y;
        available_width = retry_width;
    };

    // STEP 9: Static positions of the out-of-flow boxes, then the floats
    // that waited for the end of the line.
    absolute_boxes.extend(lists.absolute_boxes);
    fixed_boxes.extend(lists.fixed_boxes);
    for placeholder in &lists.line_placeholders {
        let mut placeholder = placeholder.borrow_mut();
        let static_box = placeholder.layout_box();
        let (dx, dy) = if static_box.style.specified_display.is_inline_level() {
            (0.0, position_y - static_box.position_y())
        } else {
            // Block-level boxes start the next line.
            (
                line.position_x() - static_box.position_x(),
                position_y + line.height() - static_box.position_y(),
            )
        };
        placeholder.translate(dx, dy, false);
    }

    let waiting_floats_y = line.position_y() + line.height();
    for mut waiting_float in lists.waiting_floats {
        waiting_float.dimensions.position_y = waiting_floats_y;
        let float_box = float_layout(context, waiting_float, containing_block, absolute_boxes, fixed_boxes);
        line.children.push(BoxNode::Box(float_box));
    }

    Some(LaidOutLine { line, resume_at })
}
