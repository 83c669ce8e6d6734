//! Text shaping backend.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."
//!
//! Layout measures and breaks text through the [`TextShaper`] trait. The
//! crate ships [`ApproximateShaper`], which uses fixed per-character ratios
//! and is the shaper used by tests.

use serde::{Deserialize, Serialize};
use unicode_bidi::{BidiInfo, Level};
use unicode_linebreak::{BreakOpportunity, linebreaks};

use crate::style::{ComputedStyle, Direction};

/// The first line of a run of text, as broken by the shaper.
///
/// Offsets count characters from the start of the shaped text.
#[derive(Debug, Clone, PartialEq)]
pub struct FirstLine {
    /// Text kept on the line, without the hard line break that ended it and,
    /// when spaces collapse, without the spaces at a soft break.
    pub text: String,
    /// Number of characters of `text`.
    pub length: usize,
    /// Where the next line starts, or `None` when all of the text fits.
    /// Never zero.
    pub resume_at: Option<usize>,
    /// Advance width of `text`.
    pub width: f32,
    /// Height of the content area.
    pub height: f32,
    /// Baseline offset from the top of the content area.
    pub baseline: f32,
    /// Visual order of `text` when it contains right-to-left runs.
    pub visual_text: Option<String>,
}

/// Interface to the text shaping backend.
pub trait TextShaper {
    /// Break `text` so that its first line fits in `max_width` if possible.
    ///
    /// When nothing fits, the first line still holds the text up to the
    /// first break opportunity. `None` means unlimited width.
    fn split_first_line(
        &self,
        text: &str,
        style: &ComputedStyle,
        max_width: Option<f32>,
        justification_spacing: f32,
    ) -> FirstLine;

    /// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
    ///
    /// The strut of `style`: its used line height and its baseline measured
    /// from the top of the line.
    fn strut(&self, style: &ComputedStyle) -> (f32, f32);

    /// x-height of the font divided by the font size.
    fn ex_ratio(&self, style: &ComputedStyle) -> f32;

    /// Advance width of `text` on a single line.
    fn measure(&self, text: &str, style: &ComputedStyle, justification_spacing: f32) -> f32;

    /// [UAX #14](https://www.unicode.org/reports/tr14/) line-break
    /// opportunity between two adjacent characters.
    fn can_break_between(&self, before: char, after: char) -> bool {
        let mut pair = String::with_capacity(before.len_utf8() + after.len_utf8());
        pair.push(before);
        pair.push(after);
        linebreaks(&pair).any(|(index, _)| index == before.len_utf8())
    }

    /// Whether `text` has a line-break opportunity strictly inside it.
    fn can_break_inside(&self, text: &str) -> bool {
        linebreaks(text).any(|(index, _)| index > 0 && index < text.len())
    }
}

/// Ratios used by [`ApproximateShaper`], relative to the font size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ApproximateShaperConfig {
    /// Advance width of every character.
    pub advance_ratio: f32,
    /// Content-area height, also used for `line-height: normal`.
    pub line_height_ratio: f32,
    /// Ascent as a fraction of the content-area height.
    pub ascent_ratio: f32,
    /// x-height.
    pub x_height_ratio: f32,
}

impl Default for ApproximateShaperConfig {
    fn default() -> Self {
        Self {
            advance_ratio: 0.6,
            line_height_ratio: 1.2,
            ascent_ratio: 0.8,
            x_height_ratio: 0.5,
        }
    }
}

/// Shaper with fixed-ratio metrics.
///
/// Every character advances by `advance_ratio × font-size`, which matches
/// typical proportional Latin text closely enough for layout without font
/// data. Line breaking follows UAX #14.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateShaper {
    config: ApproximateShaperConfig,
}

impl ApproximateShaper {
    /// A shaper using the given ratios.
    #[must_use]
    pub const fn new(config: ApproximateShaperConfig) -> Self {
        Self { config }
    }

    /// The ratios in use.
    #[must_use]
    pub const fn config(&self) -> &ApproximateShaperConfig {
        &self.config
    }

    fn content_height(&self, style: &ComputedStyle) -> f32 {
        style.font_size * self.config.line_height_ratio
    }

    fn width_of(&self, chars: &[char], style: &ComputedStyle, justification_spacing: f32) -> f32 {
        let spaces = chars.iter().filter(|&&c| c == ' ').count();
        (chars.len() as f32).mul_add(
            self.config.advance_ratio * style.font_size,
            spaces as f32 * justification_spacing,
        )
    }

    /// Width of `chars` once its trailing spaces hang past the line end.
    fn fitting_width(&self, chars: &[char], style: &ComputedStyle, spacing: f32) -> f32 {
        let end = chars.iter().rposition(|&c| c != ' ').map_or(0, |last| last + 1);
        self.width_of(&chars[..end], style, spacing)
    }
}

/// Line-break opportunities of `text` as character offsets, without the
/// final one at the end of the text.
fn break_opportunities(text: &str, preserve_newlines: bool) -> Vec<(usize, bool)> {
    let mut opportunities = Vec::new();
    let mut chars_before = 0;
    let mut last_byte = 0;
    for (byte, opportunity) in linebreaks(text) {
        if byte == text.len() {
            break;
        }
        chars_before += text[last_byte..byte].chars().count();
        last_byte = byte;
        let mandatory = opportunity == BreakOpportunity::Mandatory && preserve_newlines;
        opportunities.push((chars_before, mandatory));
    }
    opportunities
}

fn visual_order(text: &str, direction: Direction) -> Option<String> {
    let level = match direction {
        Direction::Ltr => Level::ltr(),
        Direction::Rtl => Level::rtl(),
    };
    let bidi = BidiInfo::new(text, Some(level));
    if !bidi.has_rtl() {
        return None;
    }
    let paragraph = bidi.paragraphs.first()?;
    Some(bidi.reorder_line(paragraph, paragraph.range.clone()).into_owned())
}

impl TextShaper for ApproximateShaper {
    fn split_first_line(
        &self,
        text: &str,
        style: &ComputedStyle,
        max_width: Option<f32>,
        justification_spacing: f32,
    ) -> FirstLine {
        let chars: Vec<char> = text.chars().collect();
        let white_space = style.white_space;
        let opportunities = break_opportunities(text, white_space.preserves_newlines());

        // A hard break ends the candidate line; the break characters stay
        // between the line and the resume offset.
        let hard_break = opportunities.iter().find(|(_, mandatory)| *mandatory).map(|&(at, _)| at);
        let (mut length, mut resume_at) = match hard_break {
            Some(at) => {
                let content = chars[..at]
                    .iter()
                    .rposition(|c| !matches!(c, '\n' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}' | '\u{b}' | '\u{c}'))
                    .map_or(0, |last| last + 1);
                (content, Some(at))
            }
            None => (chars.len(), None),
        };

        if let Some(max_width) = max_width
            && white_space.wraps()
            && self.fitting_width(&chars[..length], style, justification_spacing) > max_width
        {
            let soft: Vec<usize> = opportunities
                .iter()
                .map(|&(at, _)| at)
                .filter(|&at| at > 0 && at < length)
                .collect();
            let fitting = soft.iter().rev().find(|&&at| {
                self.fitting_width(&chars[..at], style, justification_spacing) <= max_width
            });
            if let Some(&at) = fitting.or_else(|| soft.first()) {
                length = at;
                resume_at = Some(at);
            }
        }

        // A broken line does not keep the spaces it ends with when they
        // collapse; they stay between the line and the resume offset.
        if resume_at.is_some() && white_space.collapses_spaces() {
            while length > 0 && chars[length - 1] == ' ' {
                length -= 1;
            }
        }

        let line: String = chars[..length].iter().collect();
        let height = self.content_height(style);
        FirstLine {
            visual_text: visual_order(&line, style.direction),
            width: self.width_of(&chars[..length], style, justification_spacing),
            text: line,
            length,
            resume_at,
            height,
            baseline: height * self.config.ascent_ratio,
        }
    }

    fn strut(&self, style: &ComputedStyle) -> (f32, f32) {
        let content_height = self.content_height(style);
        let ascent = content_height * self.config.ascent_ratio;
        let line_height = style
            .line_height
            .resolve(style.font_size)
            .unwrap_or(content_height);
        (line_height, ascent + (line_height - content_height) / 2.0)
    }

    fn ex_ratio(&self, _style: &ComputedStyle) -> f32 {
        self.config.x_height_ratio
    }

    fn measure(&self, text: &str, style: &ComputedStyle, justification_spacing: f32) -> f32 {
        let chars: Vec<char> = text.chars().collect();
        self.width_of(&chars, style, justification_spacing)
    }
}
