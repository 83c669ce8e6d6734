//! Serializable snapshot of a positioned box tree.

use serde::Serialize;

use super::box_model::{EdgeSizes, Rect};
use super::layout_box::{BoxNode, LayoutBox};

/// One box of a laid-out tree, with its used geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxDump {
    /// Variant name, e.g. `"BlockBox"`.
    pub kind: &'static str,
    /// Generating element.
    pub tag: String,
    /// Margin box.
    pub margin_box: Rect,
    /// Content box.
    pub content_box: Rect,
    /// Used margins ('auto' as zero).
    pub margin: EdgeSizes,
    /// Baseline from the top of the margin box, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<f32>,
    /// Text of a text box.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Children in tree order. Unresolved placeholders show their static
    /// position.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BoxDump>,
}

impl From<&LayoutBox> for BoxDump {
    fn from(layout_box: &LayoutBox) -> Self {
        let d = &layout_box.dimensions;
        Self {
            kind: layout_box.kind.name(),
            tag: layout_box.element_tag.clone(),
            margin_box: d.margin_box(),
            content_box: d.content_box(),
            margin: EdgeSizes {
                top: d.margin.top.px(),
                right: d.margin.right.px(),
                bottom: d.margin.bottom.px(),
                left: d.margin.left.px(),
            },
            baseline: d.baseline,
            text: layout_box.text_str().map(str::to_string),
            children: layout_box.children.iter().map(BoxDump::from).collect(),
        }
    }
}

impl From<&BoxNode> for BoxDump {
    #[allow(clippy::redundant_closure)]
    fn from(node: &BoxNode) -> Self {
        node.with_box(|layout_box| Self::from(layout_box))
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::layout::BoxKind;
    use crate::style::ComputedStyle;

    #[test]
    fn test_dump_serializes_text_and_skips_empty_fields() {
        let style = Rc::new(ComputedStyle::default());
        let mut text = LayoutBox::text("p", Rc::clone(&style), "hi").unwrap();
        text.dimensions.width = 12.0.into();
        let line = LayoutBox::new(BoxKind::Line, "p", style).with_children([text]).unwrap();

        let dump = BoxDump::from(&line);
        assert_eq!(dump.children.len(), 1);
        assert_eq!(dump.children[0].text.as_deref(), Some("hi"));

        let json = serde_json::to_value(&dump).unwrap();
        assert!(json.get("text").is_none());
        assert_eq!(json["children"][0]["content_box"]["width"], 12.0);
        assert!(json["children"][0].get("children").is_none());
    }
}
