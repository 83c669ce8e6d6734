//! JSON box-tree documents.
//!
//! A document is a tree of elements and text strings:
//!
//! ```json
//! {
//!   "page": {"width": 400, "height": 300, "margin": 20},
//!   "root": {
//!     "tag": "body",
//!     "style": {"display": "block", "font-size": 12},
//!     "children": [
//!       {"tag": "p", "style": {"display": "block"}, "children": ["Hello ", {"tag": "em", "children": ["world"]}]},
//!       {"tag": "img", "style": {"display": "inline"}, "replaced": {"intrinsic-width": 40, "intrinsic-height": 30}}
//!     ]
//!   }
//! }
//! ```
//!
//! Styles are partial computed styles. Inherited properties a node does not
//! set come from its parent; every other property takes its initial value.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! Building the box tree runs the anonymous box rules: inline-level runs of
//! a block container go into anonymous line boxes, and when block-level and
//! inline-level children are mixed those lines are wrapped in anonymous
//! block boxes.

use std::rc::Rc;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

use quire_common::warning::warn_once;
use quire_layout::error::BoxError;
use quire_layout::layout::{BoxKind, Capabilities, LayoutBox, PageSettings, Replacement};
use quire_layout::style::{ComputedStyle, DisplayValue, InnerDisplayType, OuterDisplayType};

/// A parsed document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
    /// Page size and margins, when the document sets them.
    #[serde(default)]
    pub page: Option<PageSettings>,
    /// The root element.
    pub root: ElementNode,
}

/// A child of an element.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// A run of text.
    Text(String),
    /// A nested element.
    Element(ElementNode),
}

/// An element and its subtree.
#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ElementNode {
    /// Element name, used to label its boxes.
    pub tag: String,
    /// Declared style, as a partial computed style.
    pub style: Map<String, Value>,
    /// Style of the `::first-letter` pseudo-element.
    pub first_letter: Option<Map<String, Value>>,
    /// Makes the element a replaced element with these natural dimensions.
    pub replaced: Option<Replacement>,
    /// Children in document order.
    pub children: Vec<Node>,
}

impl Default for ElementNode {
    fn default() -> Self {
        Self {
            tag: "div".to_string(),
            style: Map::new(),
            first_letter: None,
            replaced: None,
            children: Vec::new(),
        }
    }
}

/// Parse a document from its JSON source.
///
/// # Errors
/// Fails on malformed JSON or a document that does not have the expected shape.
pub fn parse_document(source: &str) -> Result<Document> {
    serde_json::from_str(source).context("document is not a valid box-tree JSON document")
}

/// Properties whose `none` keyword is stored as a missing value.
const NONE_AS_NULL: [&str; 4] = ["float", "clear", "max-width", "max-height"];

/// [§ 7 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
///
/// The computed style of an element declaring `declarations` under a parent
/// with style `parent`.
///
/// # Errors
/// Fails when a declared value cannot be parsed.
pub fn resolve_style(parent: &ComputedStyle, declarations: &Map<String, Value>, tag: &str) -> Result<ComputedStyle> {
    let inherited = ComputedStyle::inherit_from(parent);
    let mut merged = serde_json::to_value(&inherited)?
        .as_object()
        .cloned()
        .unwrap_or_default();

    for (property, value) in declarations {
        if !merged.contains_key(property) {
            let _ = warn_once("Document", &format!("unknown style property '{property}' on <{tag}>"));
            continue;
        }
        let value = match value {
            Value::String(keyword) if keyword == "none" && NONE_AS_NULL.contains(&property.as_str()) => Value::Null,
            _ => value.clone(),
        };
        let _ = merged.insert(property.clone(), value);
    }

    let mut style: ComputedStyle =
        serde_json::from_value(Value::Object(merged)).with_context(|| format!("invalid style on <{tag}>"))?;
    if declarations.contains_key("display") {
        style.specified_display = style.display;
    }
    // [§ 9.7](https://www.w3.org/TR/CSS2/visuren.html#dis-pos-flo)
    // "Otherwise, if 'float' has a value other than 'none', the box is
    // floated and 'display' is set according to the table below."
    if style.float.is_some() || style.is_absolutely_positioned() {
        style.display = style.display.blockified();
    }
    Ok(style)
}

/// How the parent lays out its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParentLayout {
    Flow,
    Inline,
    Flex,
}

/// Build the box tree of `root`.
///
/// # Errors
/// Fails on invalid styles and on boxes that violate containment rules.
pub fn build_box_tree(root: &ElementNode) -> Result<LayoutBox> {
    let initial = ComputedStyle::with_display(DisplayValue::block());
    let mut style = resolve_style(&initial, &root.style, &root.tag)?;
    // The root element's display is always block-level.
    style.display = style.display.blockified();
    build_element(root, style)
}

fn build_element(node: &ElementNode, style: ComputedStyle) -> Result<LayoutBox> {
    let style = Rc::new(style);
    let mut element = LayoutBox::new(box_kind(style.display, node.replaced), node.tag.clone(), Rc::clone(&style));
    if let Some(first_letter) = &node.first_letter {
        let letter_tag = format!("{}::first-letter", node.tag);
        element.first_letter_style = Some(Rc::new(resolve_style(&style, first_letter, &letter_tag)?));
    }
    if element.is(Capabilities::REPLACED) {
        if !node.children.is_empty() {
            let _ = warn_once("Document", &format!("children of replaced element <{}> are ignored", node.tag));
        }
        return Ok(element);
    }

    let layout = if element.is(Capabilities::FLEX_CONTAINER) {
        ParentLayout::Flex
    } else if element.is(Capabilities::INLINE) {
        ParentLayout::Inline
    } else {
        ParentLayout::Flow
    };

    let mut children = Vec::with_capacity(node.children.len());
    for child in &node.children {
        match child {
            Node::Text(text) => match LayoutBox::anonymous_text_from(&element, text) {
                Ok(text_box) => children.push(text_box),
                Err(BoxError::EmptyText { .. }) => {}
                Err(error) => return Err(error.into()),
            },
            Node::Element(child) => {
                let child_style = resolve_style(&style, &child.style, &child.tag)?;
                let child_style = adjust_display(child_style, layout, &child.tag);
                children.push(build_element(child, child_style)?);
            }
        }
    }

    let children = match layout {
        ParentLayout::Inline => children,
        ParentLayout::Flex => wrap_inline_runs(&element, children, true)?,
        ParentLayout::Flow => {
            let mixed = children.iter().any(|child| !joins_line(child));
            wrap_inline_runs(&element, children, mixed)?
        }
    };
    element
        .with_children(children)
        .with_context(|| format!("cannot build the boxes of <{}>", node.tag))
}

/// The box variant generated for `display`.
fn box_kind(display: DisplayValue, replaced: Option<Replacement>) -> BoxKind {
    let inline = display.is_inline_level();
    match (replaced, display.inner) {
        (Some(replacement), _) if inline => BoxKind::InlineReplaced(replacement),
        (Some(replacement), _) => BoxKind::BlockReplaced(replacement),
        (None, InnerDisplayType::Flow) if inline => BoxKind::Inline,
        (None, InnerDisplayType::FlowRoot) if inline => BoxKind::InlineBlock,
        (None, InnerDisplayType::Flow | InnerDisplayType::FlowRoot) => BoxKind::Block,
        (None, InnerDisplayType::Flex) if inline => BoxKind::InlineFlex,
        (None, InnerDisplayType::Flex) => BoxKind::Flex,
        (None, InnerDisplayType::Table) if inline => BoxKind::InlineTable,
        (None, InnerDisplayType::Table) => BoxKind::Table,
    }
}

/// Display fixups that depend on the parent.
fn adjust_display(mut style: ComputedStyle, parent: ParentLayout, tag: &str) -> ComputedStyle {
    match parent {
        // [§ 4 Flex Items](https://www.w3.org/TR/css-flexbox-1/#flex-items)
        // "The display value of a flex item is blockified."
        ParentLayout::Flex => style.display = style.display.blockified(),
        ParentLayout::Inline if !style.display.is_inline_level() && style.float.is_none() && !style.is_absolutely_positioned() => {
            let _ = warn_once("Document", &format!("block-level <{tag}> inside an inline box is laid out as inline-block"));
            style.display = DisplayValue {
                outer: OuterDisplayType::Inline,
                inner: match style.display.inner {
                    InnerDisplayType::Flow => InnerDisplayType::FlowRoot,
                    inner => inner,
                },
            };
        }
        ParentLayout::Inline | ParentLayout::Flow => {}
    }
    style
}

/// Whether `child` goes into a line box: inline-level boxes, and
/// out-of-flow boxes that were inline-level before blockification.
fn joins_line(child: &LayoutBox) -> bool {
    if child.is_in_normal_flow() {
        child.is(Capabilities::INLINE_LEVEL)
    } else {
        child.style.specified_display.is_inline_level()
    }
}

fn is_collapsible_space(child: &LayoutBox) -> bool {
    child.style.white_space.collapses_spaces()
        && child
            .text_str()
            .is_some_and(|text| text.chars().all(|c| matches!(c, ' ' | '\t' | '\n')))
}

/// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
///
/// Put every run of line content of `parent` into an anonymous line box,
/// itself inside an anonymous block box when `in_blocks`.
fn wrap_inline_runs(parent: &LayoutBox, children: Vec<LayoutBox>, in_blocks: bool) -> Result<Vec<LayoutBox>> {
    let mut wrapped = Vec::new();
    let mut run = Vec::new();
    for child in children {
        if joins_line(&child) {
            run.push(child);
            continue;
        }
        flush_run(parent, &mut run, in_blocks, &mut wrapped)?;
        wrapped.push(child);
    }
    flush_run(parent, &mut run, in_blocks, &mut wrapped)?;
    Ok(wrapped)
}

fn flush_run(parent: &LayoutBox, run: &mut Vec<LayoutBox>, in_block: bool, wrapped: &mut Vec<LayoutBox>) -> Result<()> {
    let run = std::mem::take(run);
    // Collapsible white space between blocks generates no box.
    if run.is_empty() || (in_block && run.iter().all(is_collapsible_space)) {
        return Ok(());
    }
    let line = LayoutBox::anonymous_from(BoxKind::Line, parent, run)?;
    if in_block {
        wrapped.push(LayoutBox::anonymous_from(BoxKind::Block, parent, vec![line])?);
    } else {
        wrapped.push(line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_layout::layout::BoxNode;
    use quire_layout::style::{AutoLength, FloatSide};

    fn build(json: &str) -> LayoutBox {
        let document = parse_document(json).unwrap();
        build_box_tree(&document.root).unwrap()
    }

    fn child(layout_box: &LayoutBox, index: usize) -> &LayoutBox {
        layout_box.children[index].as_box().unwrap()
    }

    fn kinds(layout_box: &LayoutBox) -> Vec<&'static str> {
        layout_box
            .children
            .iter()
            .filter_map(BoxNode::as_box)
            .map(|child| child.kind.name())
            .collect()
    }

    #[test]
    fn test_inline_content_gets_one_line_box() {
        let root = build(r#"{"root": {"tag": "p", "children": ["Hello ", {"tag": "em", "children": ["world"]}]}}"#);
        assert_eq!(kinds(&root), vec!["LineBox"]);
        assert_eq!(kinds(child(&root, 0)), vec!["TextBox", "InlineBox"]);
    }

    #[test]
    fn test_mixed_content_is_wrapped_in_anonymous_blocks() {
        let root = build(
            r#"{"root": {"tag": "div", "children": [
                "before",
                {"tag": "p", "style": {"display": "block"}, "children": ["para"]},
                "  ",
                {"tag": "p", "style": {"display": "block"}}
            ]}}"#,
        );
        // The white space between the paragraphs generates nothing.
        assert_eq!(kinds(&root), vec!["BlockBox", "BlockBox", "BlockBox"]);
        let anonymous = child(&root, 0);
        assert_eq!(anonymous.element_tag, "div");
        assert_eq!(kinds(anonymous), vec!["LineBox"]);
    }

    #[test]
    fn test_styles_inherit_and_reset() {
        let root = build(
            r#"{"root": {"tag": "body", "style": {"display": "block", "font-size": 20, "margin-left": 8},
                "children": [{"tag": "p", "style": {"display": "block"}}]}}"#,
        );
        let p = child(&root, 0);
        assert_eq!(p.style.font_size, 20.0);
        assert_eq!(p.style.margin_left, AutoLength::ZERO);
    }

    #[test]
    fn test_unknown_property_is_ignored() {
        let parent = ComputedStyle::default();
        let mut declarations = Map::new();
        let _ = declarations.insert("colour".to_string(), Value::from("red"));
        let _ = declarations.insert("float".to_string(), Value::from("none"));
        let style = resolve_style(&parent, &declarations, "p").unwrap();
        assert_eq!(style.float, None);
    }

    #[test]
    fn test_floats_are_blockified_and_remember_their_display() {
        let root = build(
            r#"{"root": {"tag": "p", "children": [
                "text",
                {"tag": "span", "style": {"display": "inline", "float": "left"}, "children": ["x"]}
            ]}}"#,
        );
        // The float was inline-level, so it stays in the line.
        assert_eq!(kinds(&root), vec!["LineBox"]);
        let float = child(child(&root, 0), 1);
        assert_eq!(float.kind.name(), "BlockBox");
        assert_eq!(float.style.float, Some(FloatSide::Left));
        assert!(float.style.specified_display.is_inline_level());
    }

    #[test]
    fn test_flex_text_is_wrapped_into_block_items() {
        let root = build(
            r#"{"root": {"tag": "nav", "style": {"display": "flex"}, "children": [
                "one",
                {"tag": "a", "style": {"display": "inline"}, "children": ["two"]}
            ]}}"#,
        );
        assert_eq!(root.kind.name(), "FlexBox");
        assert_eq!(kinds(&root), vec!["BlockBox", "BlockBox"]);
        assert_eq!(kinds(child(&root, 1)), vec!["LineBox"]);
    }

    #[test]
    fn test_replaced_element() {
        let root = build(
            r#"{"root": {"tag": "figure", "children": [
                {"tag": "img", "replaced": {"intrinsic-width": 40, "intrinsic-height": 30}}
            ]}}"#,
        );
        let img = child(child(&root, 0), 0);
        assert_eq!(img.kind, BoxKind::InlineReplaced(Replacement::sized(40.0, 30.0)));
    }

    #[test]
    fn test_invalid_style_value_is_an_error() {
        let document = parse_document(r#"{"root": {"style": {"width": "wide"}}}"#).unwrap();
        assert!(build_box_tree(&document.root).is_err());
    }
}
