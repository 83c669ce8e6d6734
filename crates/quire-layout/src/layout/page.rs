//! Pagination.
//!
//! [§ 3 Page Boxes](https://www.w3.org/TR/css-page-3/#page-box-page-rule)
//!
//! "The page box is a rectangular region that contains two areas: the page
//! area ... and the margin area." The root box is laid out into the page
//! area of one page after the other, each page resuming where the previous
//! one stopped.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use quire_common::warning::warn_once;

use crate::style::ComputedStyle;

use super::absolute::{PlaceholderRef, absolute_layout};
use super::block::block_level_layout;
use super::context::{ContainingBlock, LayoutContext};
use super::layout_box::{BoxKind, BoxNode, LayoutBox};
use super::skip_stack::SkipStack;
use super::values::{AutoEdgeSizes, AutoOr};

/// Size and margins of every page, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PageSettings {
    /// Width of the page box.
    pub width: f32,
    /// Height of the page box.
    pub height: f32,
    /// Margin on all four sides.
    pub margin: f32,
}

impl Default for PageSettings {
    /// A4 with 2cm margins.
    fn default() -> Self {
        Self {
            width: 794.0,
            height: 1123.0,
            margin: 76.0,
        }
    }
}

impl PageSettings {
    /// An empty page box, its page area sized by these settings.
    #[must_use]
    pub fn page_box(&self) -> LayoutBox {
        let mut page = LayoutBox::new(BoxKind::Page, "@page", Rc::new(ComputedStyle::default()));
        let d = &mut page.dimensions;
        d.margin = AutoEdgeSizes::uniform(self.margin);
        d.width = AutoOr::Length((self.width - 2.0 * self.margin).max(0.0));
        d.height = AutoOr::Length((self.height - 2.0 * self.margin).max(0.0));
        page
    }
}

/// Lay out `root` on as many pages as it needs.
///
/// Out-of-flow boxes whose containing block is the page are resolved
/// against each page's area. Returns the pages with every placeholder
/// replaced by its laid-out box.
pub fn layout_document(context: &mut LayoutContext<'_>, root: &LayoutBox, settings: &PageSettings) -> Vec<LayoutBox> {
    let mut pages = Vec::new();
    let mut skip_stack: Option<SkipStack> = None;
    loop {
        let mut page = settings.page_box();
        let containing_block = ContainingBlock::content_of(&page);
        let max_position_y = containing_block.y + containing_block.height.unwrap_or(f32::INFINITY);

        let mut root_box = root.clone();
        root_box.dimensions.position_x = containing_block.x;
        root_box.dimensions.position_y = containing_block.y;

        let (mut absolute_boxes, mut fixed_boxes) = (Vec::new(), Vec::new());
        context.create_block_formatting_context();
        let laid_out = block_level_layout(
            context,
            &root_box,
            max_position_y,
            skip_stack.as_ref(),
            &containing_block,
            true,
            &mut absolute_boxes,
            &mut fixed_boxes,
        );
        let Some(mut new_root) = laid_out.new_box else {
            // An empty page always takes its first piece of content.
            context.finish_block_formatting_context(&mut root_box);
            let _ = warn_once("Page", &format!("'{}' produced no content on page {}", root.element_tag, pages.len() + 1));
            break;
        };
        context.finish_block_formatting_context(&mut new_root);
        page.children.push(BoxNode::Box(new_root));

        // The page is the containing block of the remaining out-of-flow
        // boxes, fixed ones included.
        resolve_page_placeholders(context, &page, absolute_boxes, fixed_boxes);

        log::debug!(target: "quire::page", "page {} laid out, resume at {:?}", pages.len() + 1, laid_out.resume_at);
        pages.push(page.into_resolved());

        match laid_out.resume_at {
            None => break,
            Some(resume_at) if skip_stack.as_ref() == Some(&resume_at) => {
                let _ = warn_once(
                    "Page",
                    &format!("layout made no progress on page {}; stopping", pages.len()),
                );
                break;
            }
            Some(resume_at) => skip_stack = Some(resume_at),
        }
    }
    pages
}

fn resolve_page_placeholders(
    context: &mut LayoutContext<'_>,
    page: &LayoutBox,
    absolute_boxes: Vec<PlaceholderRef>,
    mut fixed_boxes: Vec<PlaceholderRef>,
) {
    for placeholder in &absolute_boxes {
        absolute_layout(context, placeholder, page, &mut fixed_boxes);
    }
    // Laying out fixed boxes can find more of them.
    while !fixed_boxes.is_empty() {
        let mut found = Vec::new();
        for placeholder in &fixed_boxes {
            absolute_layout(context, placeholder, page, &mut found);
        }
        fixed_boxes = found;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::BoxKind;
    use crate::style::{AutoLength, DisplayValue, PositionType};
    use crate::text::ApproximateShaper;

    fn style() -> Rc<ComputedStyle> {
        Rc::new(ComputedStyle {
            font_size: 10.0,
            ..ComputedStyle::with_display(DisplayValue::block())
        })
    }

    fn paragraph(text: &str) -> LayoutBox {
        let line = LayoutBox::new(BoxKind::Line, "p", style())
            .with_children([LayoutBox::text("p", style(), text).unwrap()])
            .unwrap();
        LayoutBox::new(BoxKind::Block, "p", style()).with_children([line]).unwrap()
    }

    fn settings() -> PageSettings {
        PageSettings {
            width: 40.0,
            height: 50.0,
            margin: 10.0,
        }
    }

    fn lines_on(page: &LayoutBox) -> usize {
        let root = page.children[0].as_box().unwrap();
        root.children
            .iter()
            .filter_map(BoxNode::as_box)
            .map(|p| p.children.len())
            .sum()
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: PageSettings = serde_json::from_str(r#"{"width": 300}"#).unwrap();
        assert_eq!(settings.width, 300.0);
        assert_eq!(settings.height, PageSettings::default().height);
    }

    #[test]
    fn test_page_area() {
        let page = settings().page_box();
        let cb = ContainingBlock::content_of(&page);
        assert_eq!((cb.x, cb.y, cb.width, cb.height), (10.0, 10.0, 20.0, Some(30.0)));
    }

    #[test]
    fn test_content_flows_onto_next_pages() {
        let shaper = ApproximateShaper::default();
        let mut context = LayoutContext::new(&shaper);
        let root = LayoutBox::new(BoxKind::Block, "html", style())
            .with_children([paragraph("aa bb cc dd ee")])
            .unwrap();
        let pages = layout_document(&mut context, &root, &settings());
        // Two 12px lines fit in the 30px page area.
        assert_eq!(pages.len(), 3);
        assert_eq!(lines_on(&pages[0]), 2);
        assert_eq!(lines_on(&pages[1]), 2);
        assert_eq!(lines_on(&pages[2]), 1);
    }

    #[test]
    fn test_absolute_box_is_resolved_against_page() {
        let shaper = ApproximateShaper::default();
        let mut context = LayoutContext::new(&shaper);
        let absolute = LayoutBox::new(
            BoxKind::Block,
            "aside",
            Rc::new(ComputedStyle {
                position: PositionType::Absolute,
                top: AutoLength::px(5.0),
                left: AutoLength::px(5.0),
                width: AutoLength::px(10.0),
                height: AutoLength::px(10.0),
                ..(*style()).clone()
            }),
        );
        let root = LayoutBox::new(BoxKind::Block, "html", style())
            .with_children([absolute])
            .unwrap();
        let pages = layout_document(&mut context, &root, &settings());
        assert_eq!(pages.len(), 1);
        let root = pages[0].children[0].as_box().unwrap();
        let aside = root.children[0].as_box().unwrap();
        assert_eq!(aside.position_x(), 15.0);
        assert_eq!(aside.position_y(), 15.0);
    }
}
