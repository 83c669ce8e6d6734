//! Computed value types for the properties layout reads.
//!
//! [§ 4.4 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
//!
//! Lengths are already in CSS pixels; only percentages survive to layout,
//! where they are resolved against the containing block.

use serde::{Deserialize, Serialize};

/// Default font size (CSS `medium`).
pub const DEFAULT_FONT_SIZE_PX: f32 = 16.0;

/// Raw JSON form shared by the length-like values: a bare number is pixels,
/// a string may carry a `px` or `%` suffix or be a keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f32),
    Text(String),
}

fn parse_number(text: &str) -> Option<f32> {
    text.trim().parse::<f32>().ok().filter(|value| value.is_finite())
}

/// Parse `12`, `12px` or `50%`.
#[must_use]
pub fn parse_length(text: &str) -> Option<LengthValue> {
    let text = text.trim();
    if let Some(percent) = text.strip_suffix('%') {
        return parse_number(percent).map(LengthValue::Percent);
    }
    parse_number(text.strip_suffix("px").unwrap_or(text)).map(LengthValue::Px)
}

/// [§ 4.2 Percentages](https://www.w3.org/TR/css-values-4/#percentages)
///
/// A computed `<length-percentage>`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawValue", into = "RawValue")]
pub enum LengthValue {
    /// Absolute length in CSS pixels.
    Px(f32),
    /// "A percentage value... is always relative to another quantity."
    Percent(f32),
}

impl LengthValue {
    /// Zero pixels.
    pub const ZERO: Self = Self::Px(0.0);

    /// Resolve against the reference quantity the property uses.
    #[must_use]
    pub fn resolve(self, reference: f32) -> f32 {
        match self {
            Self::Px(px) => px,
            Self::Percent(percent) => reference * percent / 100.0,
        }
    }

    /// Whether resolving yields zero whatever the reference.
    #[must_use]
    pub fn is_zero(self) -> bool {
        match self {
            Self::Px(value) | Self::Percent(value) => value == 0.0,
        }
    }
}

impl Default for LengthValue {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<RawValue> for LengthValue {
    type Error = String;

    fn try_from(raw: RawValue) -> Result<Self, Self::Error> {
        match raw {
            RawValue::Number(px) => Ok(Self::Px(px)),
            RawValue::Text(text) => parse_length(&text).ok_or_else(|| format!("invalid length '{text}'")),
        }
    }
}

impl From<LengthValue> for RawValue {
    fn from(value: LengthValue) -> Self {
        match value {
            LengthValue::Px(px) => Self::Number(px),
            LengthValue::Percent(percent) => Self::Text(format!("{percent}%")),
        }
    }
}

/// [§ 4.4 Automatic values](https://www.w3.org/TR/CSS2/cascade.html#value-def-auto)
///
/// A computed value that may still be `auto`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(try_from = "RawValue", into = "RawValue")]
pub enum AutoLength {
    /// `auto`, resolved during layout.
    #[default]
    Auto,
    /// A length or percentage.
    Length(LengthValue),
}

impl AutoLength {
    /// Zero pixels (the initial value of margins).
    pub const ZERO: Self = Self::Length(LengthValue::ZERO);

    /// A pixel length.
    #[must_use]
    pub const fn px(value: f32) -> Self {
        Self::Length(LengthValue::Px(value))
    }

    /// A percentage.
    #[must_use]
    pub const fn percent(value: f32) -> Self {
        Self::Length(LengthValue::Percent(value))
    }

    /// Check if the value is 'auto'.
    #[must_use]
    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }

    /// The length, if any.
    #[must_use]
    pub const fn length(self) -> Option<LengthValue> {
        match self {
            Self::Auto => None,
            Self::Length(length) => Some(length),
        }
    }
}

impl TryFrom<RawValue> for AutoLength {
    type Error = String;

    fn try_from(raw: RawValue) -> Result<Self, Self::Error> {
        match raw {
            RawValue::Text(text) if text.trim().eq_ignore_ascii_case("auto") => Ok(Self::Auto),
            other => LengthValue::try_from(other).map(Self::Length),
        }
    }
}

impl From<AutoLength> for RawValue {
    fn from(value: AutoLength) -> Self {
        match value {
            AutoLength::Auto => Self::Text("auto".to_string()),
            AutoLength::Length(length) => length.into(),
        }
    }
}

/// [§ 4.2 'line-height'](https://www.w3.org/TR/css-inline-3/#line-height-property)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(try_from = "RawValue", into = "RawValue")]
pub enum LineHeight {
    /// "Determine the preferred line height automatically based on font metrics."
    #[default]
    Normal,
    /// "The computed value is the number itself", multiplied by the font size.
    Number(f32),
    /// A length; percentages refer to the element's font size.
    Length(LengthValue),
}

impl LineHeight {
    /// Used line height in pixels, or `None` for `normal` (font-derived).
    #[must_use]
    pub fn resolve(self, font_size: f32) -> Option<f32> {
        match self {
            Self::Normal => None,
            Self::Number(factor) => Some(factor * font_size),
            Self::Length(length) => Some(length.resolve(font_size)),
        }
    }
}

impl TryFrom<RawValue> for LineHeight {
    type Error = String;

    fn try_from(raw: RawValue) -> Result<Self, Self::Error> {
        match raw {
            RawValue::Number(factor) => Ok(Self::Number(factor)),
            RawValue::Text(text) if text.trim().eq_ignore_ascii_case("normal") => Ok(Self::Normal),
            RawValue::Text(text) => {
                let trimmed = text.trim();
                if trimmed.ends_with('%') || trimmed.ends_with("px") {
                    parse_length(trimmed)
                        .map(Self::Length)
                        .ok_or_else(|| format!("invalid line-height '{text}'"))
                } else {
                    parse_number(trimmed)
                        .map(Self::Number)
                        .ok_or_else(|| format!("invalid line-height '{text}'"))
                }
            }
        }
    }
}

impl From<LineHeight> for RawValue {
    fn from(value: LineHeight) -> Self {
        match value {
            LineHeight::Normal => Self::Text("normal".to_string()),
            LineHeight::Number(factor) => Self::Number(factor),
            LineHeight::Length(LengthValue::Px(px)) => Self::Text(format!("{px}px")),
            LineHeight::Length(length) => length.into(),
        }
    }
}

/// [§ 10.8.1 'vertical-align'](https://www.w3.org/TR/CSS2/visudet.html#propdef-vertical-align)
///
/// "This property affects the vertical positioning inside a line box of the
/// boxes generated by an inline-level element."
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(try_from = "RawValue", into = "RawValue")]
pub enum VerticalAlign {
    /// "Align the baseline of the box with the baseline of the parent box."
    #[default]
    Baseline,
    /// "Align the vertical midpoint of the box with the baseline of the parent
    /// box plus half the x-height of the parent."
    Middle,
    /// "Lower the baseline of the box to the proper position for subscripts."
    Sub,
    /// "Raise the baseline of the box to the proper position for superscripts."
    Super,
    /// "Align the top of the box with the top of the parent's content area."
    TextTop,
    /// "Align the bottom of the box with the bottom of the parent's content area."
    TextBottom,
    /// "Align the top of the aligned subtree with the top of the line box."
    Top,
    /// "Align the bottom of the aligned subtree with the bottom of the line box."
    Bottom,
    /// "Raise (positive value) or lower (negative value) the box by this distance."
    Length(f32),
}

impl VerticalAlign {
    /// The raise above the parent's baseline for `sub`, `super` and lengths.
    ///
    /// `sub` and `super` compute to half the element's own font size.
    #[must_use]
    pub fn raise(self, font_size: f32) -> Option<f32> {
        match self {
            Self::Sub => Some(-0.5 * font_size),
            Self::Super => Some(0.5 * font_size),
            Self::Length(raise) => Some(raise),
            _ => None,
        }
    }
}

impl TryFrom<RawValue> for VerticalAlign {
    type Error = String;

    fn try_from(raw: RawValue) -> Result<Self, Self::Error> {
        match raw {
            RawValue::Number(raise) => Ok(Self::Length(raise)),
            RawValue::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "baseline" => Ok(Self::Baseline),
                "middle" => Ok(Self::Middle),
                "sub" => Ok(Self::Sub),
                "super" => Ok(Self::Super),
                "text-top" => Ok(Self::TextTop),
                "text-bottom" => Ok(Self::TextBottom),
                "top" => Ok(Self::Top),
                "bottom" => Ok(Self::Bottom),
                other => match parse_length(other) {
                    Some(LengthValue::Px(raise)) => Ok(Self::Length(raise)),
                    _ => Err(format!("invalid vertical-align '{text}'")),
                },
            },
        }
    }
}

impl From<VerticalAlign> for RawValue {
    fn from(value: VerticalAlign) -> Self {
        let keyword = match value {
            VerticalAlign::Length(raise) => return Self::Number(raise),
            VerticalAlign::Baseline => "baseline",
            VerticalAlign::Middle => "middle",
            VerticalAlign::Sub => "sub",
            VerticalAlign::Super => "super",
            VerticalAlign::TextTop => "text-top",
            VerticalAlign::TextBottom => "text-bottom",
            VerticalAlign::Top => "top",
            VerticalAlign::Bottom => "bottom",
        };
        Self::Text(keyword.to_string())
    }
}

/// [§ 2.1 'direction'](https://www.w3.org/TR/css-writing-modes-4/#direction)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Left-to-right inline base direction.
    #[default]
    Ltr,
    /// Right-to-left inline base direction.
    Rtl,
}

/// [§ 3 White Space and Wrapping: the 'white-space' property](https://www.w3.org/TR/css-text-3/#white-space-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WhiteSpace {
    /// Collapse spaces, wrap lines.
    #[default]
    Normal,
    /// Preserve everything, never wrap.
    Pre,
    /// Collapse spaces, never wrap.
    Nowrap,
    /// Preserve everything, wrap lines.
    PreWrap,
    /// Collapse spaces but preserve segment breaks, wrap lines.
    PreLine,
}

impl WhiteSpace {
    /// Whether sequences of spaces collapse (`normal`, `nowrap`, `pre-line`).
    #[must_use]
    pub const fn collapses_spaces(self) -> bool {
        matches!(self, Self::Normal | Self::Nowrap | Self::PreLine)
    }

    /// Whether lines may wrap at soft wrap opportunities.
    #[must_use]
    pub const fn wraps(self) -> bool {
        matches!(self, Self::Normal | Self::PreWrap | Self::PreLine)
    }

    /// Whether segment breaks force a line break.
    #[must_use]
    pub const fn preserves_newlines(self) -> bool {
        matches!(self, Self::Pre | Self::PreWrap | Self::PreLine)
    }
}

/// [§ 7.1 Text Alignment: the 'text-align' shorthand](https://www.w3.org/TR/css-text-3/#text-align-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlign {
    /// Align to the start edge of the line box.
    #[default]
    Start,
    /// Align to the end edge of the line box.
    End,
    /// Align to the line-left edge.
    Left,
    /// Align to the line-right edge.
    Right,
    /// Center within the line box.
    Center,
    /// Stretch interior spaces so the line fills the line box.
    Justify,
}

/// [§ 2.1 Case Transforms: the 'text-transform' property](https://www.w3.org/TR/css-text-3/#text-transform-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TextTransform {
    /// No effects.
    #[default]
    None,
    /// "Puts all letters in uppercase."
    Uppercase,
    /// "Puts all letters in lowercase."
    Lowercase,
    /// "Puts the first typographic letter unit of each word in titlecase."
    Capitalize,
    /// "Puts all typographic character units in fullwidth form."
    FullWidth,
}

/// [§ 5.4 Hyphenation Control: the 'hyphens' property](https://www.w3.org/TR/css-text-3/#hyphens-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Hyphens {
    /// "Words are not hyphenated, even if characters inside the word explicitly
    /// define hyphenation opportunities."
    None,
    /// Only soft hyphens create opportunities.
    #[default]
    Manual,
    /// Automatic hyphenation (treated as `manual` here).
    Auto,
}

/// [§ 3 Scrolling and Clipping Overflow](https://www.w3.org/TR/css-overflow-3/#overflow-properties)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Overflow {
    /// Content is not clipped.
    #[default]
    Visible,
    /// Content is clipped.
    Hidden,
    /// Content is clipped and scrollable.
    Scroll,
    /// Scrollable when needed.
    Auto,
}

/// [§ 6.1 'text-overflow'](https://www.w3.org/TR/css-overflow-3/#text-overflow)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TextOverflow {
    /// Truncate at the content edge.
    #[default]
    Clip,
    /// Render an ellipsis for clipped inline content.
    Ellipsis,
}

/// [§ 5.4 Fragmented Box Decorations: the 'box-decoration-break' property](https://www.w3.org/TR/css-break-3/#break-decoration)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BoxDecorationBreak {
    /// "No break is applied between fragments; decorations are sliced."
    #[default]
    Slice,
    /// "Each box fragment is independently wrapped with the border, padding, and margin."
    Clone,
}

/// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
///
/// "Values have the following meanings:
///
/// left
///   The element generates a block box that is floated to the left.
///
/// right
///   The element generates a block box that is floated to the right."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FloatSide {
    /// "The element generates a block box that is floated to the left."
    Left,
    /// "The element generates a block box that is floated to the right."
    Right,
}

/// [§ 9.5.2 Controlling flow next to floats: the 'clear' property](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
///
/// "This property indicates which sides of an element's box(es) may not
/// be adjacent to an earlier floating box."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClearSide {
    /// "Requires the top border edge be below any left-floating boxes."
    Left,
    /// "Requires the top border edge be below any right-floating boxes."
    Right,
    /// "Requires the top border edge be below any floating boxes."
    Both,
}

impl ClearSide {
    /// Whether this clearance applies to a float on `side`.
    #[must_use]
    pub fn clears(self, side: FloatSide) -> bool {
        matches!(
            (self, side),
            (Self::Both, _) | (Self::Left, FloatSide::Left) | (Self::Right, FloatSide::Right)
        )
    }
}

/// [§ 2 Choosing A Positioning Scheme: 'position' property](https://www.w3.org/TR/css-position-3/#position-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PositionType {
    /// "The box is laid out in accordance with normal flow."
    #[default]
    Static,
    /// "The box is laid out as for static, then offset from the resulting position."
    Relative,
    /// "The box is taken out of flow... positioned relative to its containing block."
    Absolute,
    /// "Same as absolute, except the box is positioned relative to the viewport" (the page).
    Fixed,
}

impl PositionType {
    /// `absolute` or `fixed`.
    #[must_use]
    pub const fn is_absolutely_positioned(self) -> bool {
        matches!(self, Self::Absolute | Self::Fixed)
    }
}
