//! CSS Display property types
//!
//! [§ 2 Box Layout Modes: the display property](https://www.w3.org/TR/css-display-3/#the-display-properties)

use serde::{Deserialize, Serialize};

// [§ 2 Box Layout Modes: the display property](https://www.w3.org/TR/css-display-3/#the-display-properties)
//
// "The display property defines an element's display type, which consists of
// the two basic qualities of how an element generates boxes:
//   - the inner display type, which defines the kind of formatting context
//     it generates, dictating how its descendant boxes are laid out.
//   - the outer display type, which dictates how the principal box itself
//     participates in flow layout."

/// [§ 2.1 Outer Display Roles](https://www.w3.org/TR/css-display-3/#outer-role)
///
/// "The `<display-outside>` keywords specify the element's outer display type,
/// which is essentially its principal box's role in flow layout."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OuterDisplayType {
    /// "The element generates a block-level box when placed in flow layout."
    Block,
    /// "The element generates an inline-level box when placed in flow layout."
    Inline,
}

/// [§ 2.2 Inner Display Layout Models](https://www.w3.org/TR/css-display-3/#inner-model)
///
/// "The `<display-inside>` keywords specify the element's inner display type,
/// which defines the type of formatting context that lays out its contents."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InnerDisplayType {
    /// "The element lays out its contents using flow layout (block-and-inline layout)."
    Flow,
    /// Same as Flow but establishes a new block formatting context.
    FlowRoot,
    /// "The element lays out its contents using table layout."
    Table,
    /// "The element lays out its contents using flex layout."
    Flex,
}

/// Combined display value
///
/// Serialized as the CSS keyword (`"block"`, `"inline-block"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayValue {
    /// "The outer display type, which dictates how the box participates in flow layout."
    pub outer: OuterDisplayType,
    /// "The inner display type, which dictates how its descendant boxes are laid out."
    pub inner: InnerDisplayType,
}

impl DisplayValue {
    /// `display: block` - block outer, flow inner
    #[must_use]
    pub const fn block() -> Self {
        Self {
            outer: OuterDisplayType::Block,
            inner: InnerDisplayType::Flow,
        }
    }

    /// `display: inline` - inline outer, flow inner
    #[must_use]
    pub const fn inline() -> Self {
        Self {
            outer: OuterDisplayType::Inline,
            inner: InnerDisplayType::Flow,
        }
    }

    /// `display: inline-block` - inline outer, flow-root inner
    #[must_use]
    pub const fn inline_block() -> Self {
        Self {
            outer: OuterDisplayType::Inline,
            inner: InnerDisplayType::FlowRoot,
        }
    }

    /// `display: flow-root` - block outer, flow-root inner
    #[must_use]
    pub const fn flow_root() -> Self {
        Self {
            outer: OuterDisplayType::Block,
            inner: InnerDisplayType::FlowRoot,
        }
    }

    /// `display: flex` - block outer, flex inner
    #[must_use]
    pub const fn flex() -> Self {
        Self {
            outer: OuterDisplayType::Block,
            inner: InnerDisplayType::Flex,
        }
    }

    /// `display: inline-flex` - inline outer, flex inner
    #[must_use]
    pub const fn inline_flex() -> Self {
        Self {
            outer: OuterDisplayType::Inline,
            inner: InnerDisplayType::Flex,
        }
    }

    /// `display: table` - block outer, table inner
    #[must_use]
    pub const fn table() -> Self {
        Self {
            outer: OuterDisplayType::Block,
            inner: InnerDisplayType::Table,
        }
    }

    /// `display: inline-table` - inline outer, table inner
    #[must_use]
    pub const fn inline_table() -> Self {
        Self {
            outer: OuterDisplayType::Inline,
            inner: InnerDisplayType::Table,
        }
    }

    /// Whether the principal box participates in an inline formatting context.
    #[must_use]
    pub fn is_inline_level(self) -> bool {
        self.outer == OuterDisplayType::Inline
    }

    /// [§ 2.7 Automatic Box Type Transformations](https://www.w3.org/TR/css-display-3/#transformations)
    ///
    /// "Some layout effects require blockification or inlinification of the
    /// box type, which sets the box's computed outer display type to block or
    /// inline (respectively)."
    #[must_use]
    pub const fn blockified(self) -> Self {
        Self {
            outer: OuterDisplayType::Block,
            inner: self.inner,
        }
    }

    /// The CSS keyword for this value.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match (self.outer, self.inner) {
            (OuterDisplayType::Block, InnerDisplayType::Flow) => "block",
            (OuterDisplayType::Block, InnerDisplayType::FlowRoot) => "flow-root",
            (OuterDisplayType::Block, InnerDisplayType::Table) => "table",
            (OuterDisplayType::Block, InnerDisplayType::Flex) => "flex",
            (OuterDisplayType::Inline, InnerDisplayType::Flow) => "inline",
            (OuterDisplayType::Inline, InnerDisplayType::FlowRoot) => "inline-block",
            (OuterDisplayType::Inline, InnerDisplayType::Table) => "inline-table",
            (OuterDisplayType::Inline, InnerDisplayType::Flex) => "inline-flex",
        }
    }
}

impl Default for DisplayValue {
    /// "Initial: inline"
    fn default() -> Self {
        Self::inline()
    }
}

/// [§ 2 The display property](https://www.w3.org/TR/css-display-3/#the-display-properties)
///
/// Parse a display keyword. Returns None for unsupported keywords.
#[must_use]
pub fn parse_display_keyword(keyword: &str) -> Option<DisplayValue> {
    match keyword.trim().to_ascii_lowercase().as_str() {
        // "block: The element generates a block-level box."
        "block" | "list-item" => Some(DisplayValue::block()),
        // "inline: The element generates an inline-level box."
        "inline" => Some(DisplayValue::inline()),
        // [§ 2.4 Combination Display Keywords]
        // "inline-block: This value causes an element to generate an inline-level
        // block container."
        "inline-block" => Some(DisplayValue::inline_block()),
        "flow-root" => Some(DisplayValue::flow_root()),
        "flex" => Some(DisplayValue::flex()),
        "inline-flex" => Some(DisplayValue::inline_flex()),
        "table" => Some(DisplayValue::table()),
        "inline-table" => Some(DisplayValue::inline_table()),
        _ => None,
    }
}

impl TryFrom<String> for DisplayValue {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_display_keyword(&value).ok_or_else(|| format!("unsupported display value '{value}'"))
    }
}

impl From<DisplayValue> for String {
    fn from(value: DisplayValue) -> Self {
        value.keyword().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_round_trip() {
        for keyword in [
            "block",
            "inline",
            "inline-block",
            "flow-root",
            "flex",
            "inline-flex",
            "table",
            "inline-table",
        ] {
            let value = parse_display_keyword(keyword).expect("supported keyword");
            assert_eq!(value.keyword(), keyword);
        }
    }

    #[test]
    fn test_blockified_inline_block_is_flow_root() {
        assert_eq!(
            DisplayValue::inline_block().blockified(),
            DisplayValue::flow_root()
        );
        assert!(!DisplayValue::inline_flex().blockified().is_inline_level());
    }

    #[test]
    fn test_unknown_keyword_rejected() {
        assert!(DisplayValue::try_from("grid".to_string()).is_err());
    }
}
