//! Integration tests for line, block and out-of-flow layout.

use std::rc::Rc;

use quickcheck_macros::quickcheck;

use quire_layout::layout::absolute::absolute_replaced;
use quire_layout::layout::percentages::{resolve_percentages, resolve_position_percentages};
use quire_layout::layout::preferred::{max_content_width, min_content_width, shrink_to_fit};
use quire_layout::layout::{
    AutoOr, BoxKind, BoxNode, ContainingBlock, LayoutBox, LayoutContext, Replacement, block_level_layout,
    iter_line_boxes,
};
use quire_layout::style::{
    AutoLength, ComputedStyle, Direction, DisplayValue, LengthValue, PositionType, TextAlign,
};
use quire_layout::text::ApproximateShaper;

fn style() -> ComputedStyle {
    ComputedStyle {
        font_size: 10.0,
        ..ComputedStyle::with_display(DisplayValue::block())
    }
}

fn inline_style() -> Rc<ComputedStyle> {
    Rc::new(ComputedStyle {
        font_size: 10.0,
        ..ComputedStyle::with_display(DisplayValue::inline())
    })
}

fn text(content: &str) -> LayoutBox {
    LayoutBox::text("p", inline_style(), content).unwrap()
}

fn line(style: &Rc<ComputedStyle>, children: Vec<LayoutBox>) -> LayoutBox {
    LayoutBox::new(BoxKind::Line, "p", Rc::clone(style))
        .with_children(children)
        .unwrap()
}

fn paragraph_with(style: ComputedStyle, content: &str) -> LayoutBox {
    let style = Rc::new(style);
    let line = line(&style, vec![LayoutBox::text("p", Rc::clone(&style), content).unwrap()]);
    LayoutBox::new(BoxKind::Block, "p", style).with_children([line]).unwrap()
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

/// Every line of `line_box` laid out in a `width` wide containing block.
fn lines(line_box: &LayoutBox, width: f32) -> Vec<LayoutBox> {
    let shaper = ApproximateShaper::default();
    let mut context = LayoutContext::new(&shaper);
    let (mut absolute, mut fixed) = (Vec::new(), Vec::new());
    let mut lines = iter_line_boxes(line_box, 0.0, None, &cb(width), None);
    std::iter::from_fn(|| lines.next_line(&mut context, &mut absolute, &mut fixed))
        .map(|laid_out| laid_out.line)
        .collect()
}

fn texts(line: &LayoutBox) -> Vec<String> {
    line.children
        .iter()
        .filter_map(BoxNode::as_box)
        .filter_map(|child| child.text_str().map(str::to_string))
        .collect()
}

fn layout_block(root: &LayoutBox, width: f32) -> LayoutBox {
    let shaper = ApproximateShaper::default();
    let mut context = LayoutContext::new(&shaper);
    let (mut absolute, mut fixed) = (Vec::new(), Vec::new());
    block_level_layout(
        &mut context,
        root,
        f32::INFINITY,
        None,
        &cb(width),
        true,
        &mut absolute,
        &mut fixed,
    )
    .new_box
    .unwrap()
}

// ---------------------------------------------------------------------------
// Line building
//
// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
// ---------------------------------------------------------------------------

#[test]
fn test_two_text_runs_on_one_line() {
    let p = Rc::new(style());
    let l = line(&p, vec![text("Hello "), text("world")]);
    let laid_out = lines(&l, 200.0);
    assert_eq!(laid_out.len(), 1);
    // Only the last run of the line loses its trailing space.
    assert_eq!(texts(&laid_out[0]), vec!["Hello ", "world"]);
    assert_eq!(laid_out[0].width(), 66.0);
}

#[test]
fn test_trailing_space_of_last_run_is_trimmed() {
    let p = Rc::new(style());
    let l = line(&p, vec![text("Hello "), text("world ")]);
    let laid_out = lines(&l, 200.0);
    assert_eq!(texts(&laid_out[0]), vec!["Hello ", "world"]);
    assert_eq!(laid_out[0].width(), 66.0);
}

#[test]
fn test_empty_inline_box_gives_phantom_line() {
    let p = Rc::new(style());
    let empty = LayoutBox::new(BoxKind::Inline, "span", inline_style());
    let laid_out = lines(&line(&p, vec![empty]), 200.0);
    assert_eq!(laid_out.len(), 1);
    assert_eq!(laid_out[0].height(), 0.0);
}

#[test]
fn test_break_inside_nested_inline_box() {
    let p = Rc::new(style());
    let span = LayoutBox::new(BoxKind::Inline, "span", inline_style())
        .with_children([text("bb cc")])
        .unwrap();
    let l = line(&p, vec![text("aa "), span]);
    let laid_out = lines(&l, 40.0);
    assert_eq!(laid_out.len(), 2);
    // "aa bb" fits in 40px, "cc" goes to the next line inside the span.
    let second_span = laid_out[1].children[0].as_box().unwrap();
    assert_eq!(second_span.kind.name(), "InlineBox");
    assert_eq!(texts(second_span), vec!["cc"]);
}

#[test]
fn test_preserved_newline_breaks_line() {
    let mut pre = style();
    pre.white_space = quire_layout::style::WhiteSpace::PreLine;
    let pre = Rc::new(pre);
    let l = line(&pre, vec![LayoutBox::text("p", Rc::clone(&pre), "ab\ncd").unwrap()]);
    let laid_out = lines(&l, 200.0);
    assert_eq!(laid_out.len(), 2);
    assert_eq!(texts(&laid_out[0]), vec!["ab"]);
    assert_eq!(texts(&laid_out[1]), vec!["cd"]);
}

#[test]
fn test_justified_lines_fill_the_width_except_the_last() {
    let p = paragraph_with(
        ComputedStyle {
            text_align: TextAlign::Justify,
            ..style()
        },
        "aa bb cc dd ee",
    );
    let root = layout_block(&p, 60.0);
    let first = root.children[0].as_box().unwrap();
    let last = root.children[1].as_box().unwrap();
    assert!((first.width() - 60.0).abs() < 1e-3);
    assert_eq!(texts(last), vec!["dd ee"]);
    assert_eq!(last.width(), 30.0);
}

#[test]
fn test_centered_line() {
    let p = paragraph_with(
        ComputedStyle {
            text_align: TextAlign::Center,
            ..style()
        },
        "ab",
    );
    let root = layout_block(&p, 100.0);
    let first = root.children[0].as_box().unwrap();
    let run = first.children[0].as_box().unwrap();
    assert_eq!(run.position_x(), 44.0);
}

#[test]
fn test_first_letter_is_split_out() {
    let mut p = paragraph_with(style(), "Hello");
    p.first_letter_style = Some(Rc::new(ComputedStyle {
        font_size: 20.0,
        ..style()
    }));
    let root = layout_block(&p, 200.0);
    let first = root.children[0].as_box().unwrap();
    let letter = first.children[0].as_box().unwrap();
    assert_eq!(letter.element_tag, "p::first-letter");
    assert_eq!(texts(letter), vec!["H"]);
    assert_eq!(texts(first), vec!["ello"]);
    // The bigger letter makes the line taller.
    assert!(first.height() > 12.0);
}

// ---------------------------------------------------------------------------
// Resumption
// ---------------------------------------------------------------------------

#[quickcheck]
fn prop_lines_concatenate_to_the_unsplit_line(word_lengths: Vec<u8>, width: u8) -> bool {
    let words: Vec<String> = word_lengths
        .iter()
        .take(12)
        .map(|length| "w".repeat(usize::from(length % 7) + 1))
        .collect();
    if words.is_empty() {
        return true;
    }
    let content = words.join(" ");
    let p = Rc::new(style());
    let l = line(&p, vec![LayoutBox::text("p", Rc::clone(&p), &content).unwrap()]);

    let width = f32::from(width % 80) + 6.0;
    let split: Vec<String> = lines(&l, width).iter().map(|line| texts(line).concat()).collect();
    let whole: Vec<String> = lines(&l, 10_000.0).iter().map(|line| texts(line).concat()).collect();
    whole.len() == 1 && split.join(" ") == whole[0]
}

// ---------------------------------------------------------------------------
// Out-of-flow boxes
// ---------------------------------------------------------------------------

#[test]
fn test_absolute_box_with_auto_insets_stays_at_static_position() {
    let absolute = LayoutBox::new(
        BoxKind::Block,
        "aside",
        Rc::new(ComputedStyle {
            position: PositionType::Absolute,
            ..style()
        }),
    );
    let root = LayoutBox::new(
        BoxKind::Block,
        "div",
        Rc::new(ComputedStyle {
            position: PositionType::Relative,
            ..style()
        }),
    )
    .with_children([paragraph_with(style(), "a"), absolute])
    .unwrap();

    let root = layout_block(&root, 100.0).into_resolved();
    let aside = root.children[1].as_box().unwrap();
    assert_eq!(aside.position_x(), 0.0);
    assert_eq!(aside.position_y(), 12.0);
}

fn replaced(style: ComputedStyle, replacement: Replacement) -> LayoutBox {
    LayoutBox::new(BoxKind::BlockReplaced(replacement), "img", Rc::new(style))
}

#[test]
fn test_replaced_box_clamped_by_max_height_keeps_ratio() {
    let img = replaced(
        ComputedStyle {
            max_height: Some(LengthValue::Px(50.0)),
            ..style()
        },
        Replacement::sized(200.0, 100.0),
    );
    let img = layout_block(&img, 500.0);
    assert_eq!(img.height(), 50.0);
    assert_eq!(img.width(), 100.0);
}

/// An inline image alone on a line, laid out in a 500px containing block.
fn image_in_line(style: ComputedStyle, replacement: Replacement) -> (LayoutBox, LayoutBox) {
    let img = LayoutBox::new(
        BoxKind::InlineReplaced(replacement),
        "img",
        Rc::new(ComputedStyle {
            display: DisplayValue::inline(),
            specified_display: DisplayValue::inline(),
            ..style
        }),
    );
    let p = Rc::new(self::style());
    let mut laid_out = lines(&line(&p, vec![img]), 500.0);
    assert_eq!(laid_out.len(), 1);
    let line = laid_out.remove(0);
    let img = line.children[0].as_box().unwrap().clone();
    (line, img)
}

#[test]
fn test_inline_image_width_keeps_ratio() {
    let (_, img) = image_in_line(
        ComputedStyle {
            width: AutoLength::px(50.0),
            ..style()
        },
        Replacement::sized(200.0, 100.0),
    );
    assert_eq!((img.width(), img.height()), (50.0, 25.0));
}

#[test]
fn test_inline_image_clamped_by_max_height() {
    let (_, img) = image_in_line(
        ComputedStyle {
            max_height: Some(LengthValue::Px(50.0)),
            ..style()
        },
        Replacement::sized(200.0, 100.0),
    );
    assert_eq!((img.width(), img.height()), (100.0, 50.0));
}

#[test]
fn test_inline_image_grown_to_min_width() {
    let (_, img) = image_in_line(
        ComputedStyle {
            min_width: LengthValue::Px(80.0),
            ..style()
        },
        Replacement::sized(40.0, 20.0),
    );
    assert_eq!((img.width(), img.height()), (80.0, 40.0));
}

#[test]
fn test_inline_image_sits_on_the_baseline() {
    let (line, img) = image_in_line(style(), Replacement::sized(40.0, 30.0));
    // The baseline of a replaced box is its bottom margin edge.
    assert_eq!(img.dimensions.baseline, Some(30.0));
    let image_bottom = img.position_y() + img.margin_height();
    let line_baseline = line.position_y() + line.baseline();
    assert!((image_bottom - line_baseline).abs() < 1e-3);
    // The image is taller than the strut, so it starts the line.
    assert!((img.position_y() - line.position_y()).abs() < 1e-3);
}

fn over_constrained(direction: Direction) -> LayoutBox {
    let mut img = replaced(
        ComputedStyle {
            position: PositionType::Absolute,
            direction,
            left: AutoLength::px(10.0),
            right: AutoLength::px(10.0),
            width: AutoLength::px(50.0),
            height: AutoLength::px(50.0),
            margin_left: AutoLength::px(5.0),
            margin_right: AutoLength::px(5.0),
            ..style()
        },
        Replacement::sized(50.0, 50.0),
    );
    let containing_block = ContainingBlock {
        height: Some(100.0),
        direction,
        ..cb(200.0)
    };
    resolve_percentages(&mut img, 200.0, Some(100.0));
    resolve_position_percentages(&mut img, 200.0, 100.0);
    absolute_replaced(img, &containing_block)
}

#[test]
fn test_over_constrained_replaced_adjusts_end_inset() {
    let ltr = over_constrained(Direction::Ltr);
    assert_eq!(ltr.insets.left, AutoOr::Length(10.0));
    assert_eq!(ltr.insets.right, AutoOr::Length(130.0));
    assert_eq!(ltr.position_x(), 10.0);

    let rtl = over_constrained(Direction::Rtl);
    assert_eq!(rtl.insets.right, AutoOr::Length(10.0));
    assert_eq!(rtl.insets.left, AutoOr::Length(130.0));
    assert_eq!(rtl.position_x(), 130.0);
}

// ---------------------------------------------------------------------------
// Preferred widths
// ---------------------------------------------------------------------------

#[quickcheck]
fn prop_shrink_to_fit_is_monotonic(narrow: u8, extra: u8) -> bool {
    let shaper = ApproximateShaper::default();
    let context = LayoutContext::new(&shaper);
    let p = paragraph_with(style(), "aaa bb cccc d");
    let narrow = f32::from(narrow);
    let wide = narrow + f32::from(extra);
    let min_content = min_content_width(&context, &p, false);
    let max_content = max_content_width(&context, &p, false);
    let at_narrow = shrink_to_fit(&context, &p, narrow);
    let at_wide = shrink_to_fit(&context, &p, wide);
    at_narrow <= at_wide && min_content <= at_narrow && at_wide <= max_content
}
