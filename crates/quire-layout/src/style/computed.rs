//! CSS Computed Style
//!
//! [§ 4.4 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
//! "The computed value is the result of resolving the specified value..."

use serde::{Deserialize, Serialize};

use super::display::DisplayValue;
use super::values::{
    AutoLength, BoxDecorationBreak, ClearSide, DEFAULT_FONT_SIZE_PX, Direction, FloatSide,
    Hyphens, LengthValue, LineHeight, Overflow, PositionType, TextAlign, TextOverflow,
    TextTransform, VerticalAlign, WhiteSpace,
};

/// Computed styles for a box.
///
/// [§ 4.4 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
///
/// Every field holds a final computed value; `Default` yields the initial
/// value of each property. Styles are shared between boxes through `Rc` and
/// are never mutated by layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ComputedStyle {
    /// [§ 2 'display'](https://www.w3.org/TR/css-display-3/#the-display-properties)
    ///
    /// Computed display, after blockification of floated and absolutely
    /// positioned boxes.
    pub display: DisplayValue,
    /// The display value before blockification. Decides whether an
    /// out-of-flow box takes its static position from the current line or
    /// from the start of the next one.
    pub specified_display: DisplayValue,
    /// [§ 2 'position'](https://www.w3.org/TR/css-position-3/#position-property)
    pub position: PositionType,
    /// [§ 9.5.1 'float'](https://www.w3.org/TR/CSS2/visuren.html#float-position)
    pub float: Option<FloatSide>,
    /// [§ 9.5.2 'clear'](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
    pub clear: Option<ClearSide>,

    /// [§ 2.1 'direction'](https://www.w3.org/TR/css-writing-modes-4/#direction)
    ///
    /// Inherited: yes
    pub direction: Direction,
    /// [§ 3 'white-space'](https://www.w3.org/TR/css-text-3/#white-space-property)
    ///
    /// Inherited: yes
    pub white_space: WhiteSpace,
    /// [§ 7.1 'text-align'](https://www.w3.org/TR/css-text-3/#text-align-property)
    ///
    /// Inherited: yes
    pub text_align: TextAlign,
    /// [§ 8.1 'text-indent'](https://www.w3.org/TR/css-text-3/#text-indent-property)
    ///
    /// Percentages refer to the containing block width. Inherited: yes
    pub text_indent: LengthValue,
    /// [§ 2.1 'text-transform'](https://www.w3.org/TR/css-text-3/#text-transform-property)
    ///
    /// Inherited: yes
    pub text_transform: TextTransform,
    /// [§ 5.4 'hyphens'](https://www.w3.org/TR/css-text-3/#hyphens-property)
    ///
    /// Inherited: yes
    pub hyphens: Hyphens,
    /// [§ 10.8.1 'vertical-align'](https://www.w3.org/TR/CSS2/visudet.html#propdef-vertical-align)
    pub vertical_align: VerticalAlign,
    /// [§ 3.5 'font-size'](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
    ///
    /// Computed to pixels. Inherited: yes
    pub font_size: f32,
    /// [§ 4.2 'line-height'](https://www.w3.org/TR/css-inline-3/#line-height-property)
    ///
    /// Inherited: yes
    pub line_height: LineHeight,

    /// [§ 3 'overflow'](https://www.w3.org/TR/css-overflow-3/#overflow-properties)
    pub overflow: Overflow,
    /// [§ 6.1 'text-overflow'](https://www.w3.org/TR/css-overflow-3/#text-overflow)
    pub text_overflow: TextOverflow,
    /// [§ 5.4 'box-decoration-break'](https://www.w3.org/TR/css-break-3/#break-decoration)
    pub box_decoration_break: BoxDecorationBreak,

    /// [§ 8.3 'margin-top'](https://www.w3.org/TR/CSS2/box.html#margin-properties)
    pub margin_top: AutoLength,
    /// 'margin-right'
    pub margin_right: AutoLength,
    /// 'margin-bottom'
    pub margin_bottom: AutoLength,
    /// 'margin-left'
    pub margin_left: AutoLength,

    /// [§ 8.4 'padding-top'](https://www.w3.org/TR/CSS2/box.html#padding-properties)
    pub padding_top: LengthValue,
    /// 'padding-right'
    pub padding_right: LengthValue,
    /// 'padding-bottom'
    pub padding_bottom: LengthValue,
    /// 'padding-left'
    pub padding_left: LengthValue,

    /// [§ 8.5.1 'border-top-width'](https://www.w3.org/TR/CSS2/box.html#border-width-properties)
    ///
    /// Computed to pixels (zero when the border style is `none`).
    pub border_top_width: f32,
    /// 'border-right-width'
    pub border_right_width: f32,
    /// 'border-bottom-width'
    pub border_bottom_width: f32,
    /// 'border-left-width'
    pub border_left_width: f32,

    /// [§ 10.2 'width'](https://www.w3.org/TR/CSS2/visudet.html#the-width-property)
    pub width: AutoLength,
    /// [§ 10.5 'height'](https://www.w3.org/TR/CSS2/visudet.html#the-height-property)
    pub height: AutoLength,
    /// [§ 10.4 'min-width'](https://www.w3.org/TR/CSS2/visudet.html#min-max-widths)
    pub min_width: LengthValue,
    /// 'max-width'; `None` is `none`.
    pub max_width: Option<LengthValue>,
    /// [§ 10.7 'min-height'](https://www.w3.org/TR/CSS2/visudet.html#min-max-heights)
    pub min_height: LengthValue,
    /// 'max-height'; `None` is `none`.
    pub max_height: Option<LengthValue>,

    /// [§ 9.3.2 Box offsets](https://www.w3.org/TR/CSS2/visuren.html#position-props)
    pub top: AutoLength,
    /// 'right'
    pub right: AutoLength,
    /// 'bottom'
    pub bottom: AutoLength,
    /// 'left'
    pub left: AutoLength,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: DisplayValue::inline(),
            specified_display: DisplayValue::inline(),
            position: PositionType::Static,
            float: None,
            clear: None,
            direction: Direction::Ltr,
            white_space: WhiteSpace::Normal,
            text_align: TextAlign::Start,
            text_indent: LengthValue::ZERO,
            text_transform: TextTransform::None,
            hyphens: Hyphens::Manual,
            vertical_align: VerticalAlign::Baseline,
            font_size: DEFAULT_FONT_SIZE_PX,
            line_height: LineHeight::Normal,
            overflow: Overflow::Visible,
            text_overflow: TextOverflow::Clip,
            box_decoration_break: BoxDecorationBreak::Slice,
            margin_top: AutoLength::ZERO,
            margin_right: AutoLength::ZERO,
            margin_bottom: AutoLength::ZERO,
            margin_left: AutoLength::ZERO,
            padding_top: LengthValue::ZERO,
            padding_right: LengthValue::ZERO,
            padding_bottom: LengthValue::ZERO,
            padding_left: LengthValue::ZERO,
            border_top_width: 0.0,
            border_right_width: 0.0,
            border_bottom_width: 0.0,
            border_left_width: 0.0,
            width: AutoLength::Auto,
            height: AutoLength::Auto,
            min_width: LengthValue::ZERO,
            max_width: None,
            min_height: LengthValue::ZERO,
            max_height: None,
            top: AutoLength::Auto,
            right: AutoLength::Auto,
            bottom: AutoLength::Auto,
            left: AutoLength::Auto,
        }
    }
}

impl ComputedStyle {
    /// [§ 7 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
    ///
    /// Style of a box that has no cascaded declarations of its own: inherited
    /// properties take the parent's computed value, everything else its
    /// initial value. Anonymous boxes get their style this way.
    #[must_use]
    pub fn inherit_from(parent: &Self) -> Self {
        Self {
            direction: parent.direction,
            white_space: parent.white_space,
            text_align: parent.text_align,
            text_indent: parent.text_indent,
            text_transform: parent.text_transform,
            hyphens: parent.hyphens,
            font_size: parent.font_size,
            line_height: parent.line_height,
            ..Self::default()
        }
    }

    /// Initial style with the given display, both computed and specified.
    #[must_use]
    pub fn with_display(display: DisplayValue) -> Self {
        Self {
            display,
            specified_display: display,
            ..Self::default()
        }
    }

    /// Whether the box is taken out of flow by `position`.
    #[must_use]
    pub const fn is_absolutely_positioned(&self) -> bool {
        self.position.is_absolutely_positioned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inherit_from_keeps_inherited_resets_others() {
        let parent = ComputedStyle {
            font_size: 24.0,
            direction: Direction::Rtl,
            white_space: WhiteSpace::Pre,
            margin_left: AutoLength::px(10.0),
            position: PositionType::Relative,
            float: Some(FloatSide::Left),
            ..ComputedStyle::with_display(DisplayValue::block())
        };
        let child = ComputedStyle::inherit_from(&parent);
        assert_eq!(child.font_size, 24.0);
        assert_eq!(child.direction, Direction::Rtl);
        assert_eq!(child.white_space, WhiteSpace::Pre);
        assert_eq!(child.margin_left, AutoLength::ZERO);
        assert_eq!(child.position, PositionType::Static);
        assert_eq!(child.float, None);
        assert_eq!(child.display, DisplayValue::inline());
    }

    #[test]
    fn test_partial_json_fills_initial_values() {
        let style: ComputedStyle =
            serde_json::from_str(r#"{"display": "block", "width": "50%", "margin-left": "auto"}"#)
                .expect("valid style");
        assert_eq!(style.display, DisplayValue::block());
        assert_eq!(style.width, AutoLength::percent(50.0));
        assert!(style.margin_left.is_auto());
        assert_eq!(style.font_size, DEFAULT_FONT_SIZE_PX);
    }
}
