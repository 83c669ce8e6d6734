//! Used values of percentage-valued geometry.
//!
//! [§ 4.3 Used values](https://www.w3.org/TR/CSS2/cascade.html#used-value)

use crate::style::{AutoLength, LengthValue};

use super::layout_box::LayoutBox;
use super::values::AutoOr;

fn resolve_auto(value: AutoLength, reference: f32) -> AutoOr {
    match value {
        AutoLength::Auto => AutoOr::Auto,
        AutoLength::Length(length) => AutoOr::Length(length.resolve(reference)),
    }
}

/// [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
///
/// "The percentage is calculated with respect to the width of the generated
/// box's containing block. Note that this is true for 'margin-top' and
/// 'margin-bottom' as well."
///
/// Sets margins, padding, border widths, `width`/`height` and the min/max
/// sizes of `layout_box` from its style. When the containing block height
/// depends on its content (`cb_height` is `None`), percentage heights behave
/// as `auto`.
pub fn resolve_percentages(layout_box: &mut LayoutBox, cb_width: f32, cb_height: Option<f32>) {
    let style = std::rc::Rc::clone(&layout_box.style);
    let d = &mut layout_box.dimensions;
    d.margin.top = resolve_auto(style.margin_top, cb_width);
    d.margin.right = resolve_auto(style.margin_right, cb_width);
    d.margin.bottom = resolve_auto(style.margin_bottom, cb_width);
    d.margin.left = resolve_auto(style.margin_left, cb_width);
    d.padding.top = style.padding_top.resolve(cb_width);
    d.padding.right = style.padding_right.resolve(cb_width);
    d.padding.bottom = style.padding_bottom.resolve(cb_width);
    d.padding.left = style.padding_left.resolve(cb_width);
    d.border.top = style.border_top_width;
    d.border.right = style.border_right_width;
    d.border.bottom = style.border_bottom_width;
    d.border.left = style.border_left_width;

    d.width = resolve_auto(style.width, cb_width);
    layout_box.min_width = style.min_width.resolve(cb_width);
    layout_box.max_width = style.max_width.map_or(f32::INFINITY, |max| max.resolve(cb_width));

    match cb_height {
        Some(cb_height) => {
            layout_box.dimensions.height = resolve_auto(style.height, cb_height);
            layout_box.min_height = style.min_height.resolve(cb_height);
            layout_box.max_height = style.max_height.map_or(f32::INFINITY, |max| max.resolve(cb_height));
        }
        None => {
            // [§ 10.5](https://www.w3.org/TR/CSS2/visudet.html#the-height-property)
            // "If the height of the containing block is not specified
            // explicitly... the value computes to 'auto'."
            layout_box.dimensions.height = match style.height {
                AutoLength::Length(LengthValue::Px(height)) => AutoOr::Length(height),
                _ => AutoOr::Auto,
            };
            layout_box.min_height = style.min_height.resolve(0.0);
            layout_box.max_height = match style.max_height {
                Some(LengthValue::Px(max)) => max,
                _ => f32::INFINITY,
            };
        }
    }
}

/// [§ 9.3.2 Box offsets](https://www.w3.org/TR/CSS2/visuren.html#position-props)
///
/// "Percentages: refer to width of containing block" for `left`/`right`,
/// "refer to height of containing block" for `top`/`bottom`.
pub fn resolve_position_percentages(layout_box: &mut LayoutBox, cb_width: f32, cb_height: f32) {
    let style = &layout_box.style;
    layout_box.insets.top = resolve_auto(style.top, cb_height);
    layout_box.insets.right = resolve_auto(style.right, cb_width);
    layout_box.insets.bottom = resolve_auto(style.bottom, cb_height);
    layout_box.insets.left = resolve_auto(style.left, cb_width);
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::layout::BoxKind;
    use crate::style::{ComputedStyle, DisplayValue};

    fn styled(style: ComputedStyle) -> LayoutBox {
        LayoutBox::new(BoxKind::Block, "div", Rc::new(style))
    }

    #[test]
    fn test_margins_resolve_against_width() {
        let mut b = styled(ComputedStyle {
            margin_top: AutoLength::percent(10.0),
            margin_left: AutoLength::Auto,
            padding_right: LengthValue::Percent(5.0),
            ..ComputedStyle::with_display(DisplayValue::block())
        });
        resolve_percentages(&mut b, 200.0, Some(50.0));
        assert_eq!(b.dimensions.margin.top, AutoOr::Length(20.0));
        assert_eq!(b.dimensions.margin.left, AutoOr::Auto);
        assert_eq!(b.dimensions.padding.right, 10.0);
        assert_eq!(b.max_width, f32::INFINITY);
    }

    #[test]
    fn test_percentage_height_is_auto_without_definite_cb_height() {
        let mut b = styled(ComputedStyle {
            height: AutoLength::percent(50.0),
            min_height: LengthValue::Percent(20.0),
            max_height: Some(LengthValue::Percent(80.0)),
            ..ComputedStyle::with_display(DisplayValue::block())
        });
        resolve_percentages(&mut b, 200.0, None);
        assert_eq!(b.dimensions.height, AutoOr::Auto);
        assert_eq!(b.min_height, 0.0);
        assert_eq!(b.max_height, f32::INFINITY);

        resolve_percentages(&mut b, 200.0, Some(100.0));
        assert_eq!(b.dimensions.height, AutoOr::Length(50.0));
        assert_eq!(b.min_height, 20.0);
        assert_eq!(b.max_height, 80.0);
    }

    #[test]
    fn test_insets() {
        let mut b = styled(ComputedStyle {
            top: AutoLength::percent(10.0),
            left: AutoLength::px(7.0),
            ..ComputedStyle::default()
        });
        resolve_position_percentages(&mut b, 300.0, 100.0);
        assert_eq!(b.insets.top, AutoOr::Length(10.0));
        assert_eq!(b.insets.left, AutoOr::Length(7.0));
        assert!(b.insets.right.is_auto());
    }
}
