//! Layout box tree.
//!
//! [§ 9 Visual formatting model](https://www.w3.org/TR/CSS2/visuren.html)
//!
//! "In the visual formatting model, each element in the document tree
//! generates zero or more boxes according to the box model."
//!
//! A box is one of a fixed set of concrete variants ([`BoxKind`]). Layout never
//! switches on the variant itself: it asks which [`Capabilities`] the variant
//! carries. [`BoxKind::capabilities`] is the only place that maps variants to
//! capabilities.

use std::rc::Rc;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum_macros::IntoStaticStr;

use crate::error::{BoxError, Result};
use crate::style::{
    BoxDecorationBreak, ComputedStyle, Direction, DisplayValue, FloatSide, Hyphens,
    InnerDisplayType, Overflow, PositionType, TextTransform,
};

use super::absolute::PlaceholderRef;
use super::box_model::BoxDimensions;
use super::values::{AutoEdgeSizes, AutoOr};

bitflags! {
    /// Capability tags a box variant carries.
    ///
    /// These mirror the abstract box categories of CSS: a block container
    /// that is also inline-level is an inline-block, a replaced box that is
    /// inline-level is atomic, and so on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        /// Has an ordered list of children.
        const PARENT = 1;
        /// [§ 9.2.1](https://www.w3.org/TR/CSS2/visuren.html#block-boxes)
        /// "Block-level boxes are boxes that participate in a block formatting context."
        const BLOCK_LEVEL = 1 << 1;
        /// Contains only block-level boxes or only line boxes.
        const BLOCK_CONTAINER = 1 << 2;
        /// "A block-level box that is also a block container."
        const BLOCK = 1 << 3;
        /// [§ 9.4.2](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
        /// "The rectangular area that contains the boxes that form a line."
        const LINE = 1 << 4;
        /// "Inline-level boxes participate in an inline formatting context."
        const INLINE_LEVEL = 1 << 5;
        /// A non-replaced inline box whose contents take part in its IFC.
        const INLINE = 1 << 6;
        /// A run of text.
        const TEXT = 1 << 7;
        /// "An inline-level box that is not an inline box... participates in
        /// its inline formatting context as a single opaque box."
        const ATOMIC_INLINE_LEVEL = 1 << 8;
        /// Inline-level block container.
        const INLINE_BLOCK = 1 << 9;
        /// "An element whose content is outside the scope of the CSS formatting model."
        const REPLACED = 1 << 10;
        /// Replaced element in block flow.
        const BLOCK_REPLACED = 1 << 11;
        /// Replaced element in inline flow.
        const INLINE_REPLACED = 1 << 12;
        /// Table or inline-table.
        const TABLE = 1 << 13;
        /// Inline-level table.
        const INLINE_TABLE = 1 << 14;
        /// `table-row-group`, `table-header-group` or `table-footer-group`.
        const TABLE_ROW_GROUP = 1 << 15;
        /// `table-row`.
        const TABLE_ROW = 1 << 16;
        /// `table-column-group`.
        const TABLE_COLUMN_GROUP = 1 << 17;
        /// `table-column`.
        const TABLE_COLUMN = 1 << 18;
        /// `table-cell`.
        const TABLE_CELL = 1 << 19;
        /// `table-caption`.
        const TABLE_CAPTION = 1 << 20;
        /// A page area.
        const PAGE = 1 << 21;
        /// A page-margin box.
        const MARGIN = 1 << 22;
        /// Lays out its children with flex layout.
        const FLEX_CONTAINER = 1 << 23;
    }
}

/// Intrinsic dimensions of a replaced element.
///
/// [§ 5.1 Intrinsic Sizes](https://www.w3.org/TR/css-images-3/#intrinsic-sizes)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Replacement {
    /// Natural width, if the image has one.
    pub intrinsic_width: Option<f32>,
    /// Natural height, if the image has one.
    pub intrinsic_height: Option<f32>,
    /// Natural aspect ratio (width / height). Derived from the natural size
    /// when not given explicitly.
    pub intrinsic_ratio: Option<f32>,
}

impl Replacement {
    /// A replacement with both natural dimensions.
    #[must_use]
    pub const fn sized(width: f32, height: f32) -> Self {
        Self {
            intrinsic_width: Some(width),
            intrinsic_height: Some(height),
            intrinsic_ratio: None,
        }
    }

    /// The natural aspect ratio, if any.
    #[must_use]
    pub fn ratio(&self) -> Option<f32> {
        self.intrinsic_ratio.or_else(|| match (self.intrinsic_width, self.intrinsic_height) {
            (Some(width), Some(height)) if height > 0.0 => Some(width / height),
            _ => None,
        })
    }
}

/// Content of a text box.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextContent {
    /// The text, with `text-transform` and `hyphens` already applied.
    pub text: String,
    /// Extra space added to each space character by justification.
    pub justification_spacing: f32,
    /// Visual (display) order of the text when it contains right-to-left runs.
    pub visual_text: Option<String>,
}

/// The concrete box variants.
#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
pub enum BoxKind {
    /// Block-level block container.
    #[strum(serialize = "BlockBox")]
    Block,
    /// A line inside an inline formatting context.
    #[strum(serialize = "LineBox")]
    Line,
    /// Non-replaced inline box.
    #[strum(serialize = "InlineBox")]
    Inline,
    /// A run of text.
    #[strum(serialize = "TextBox")]
    Text(TextContent),
    /// Inline-level block container.
    #[strum(serialize = "InlineBlockBox")]
    InlineBlock,
    /// Block-level replaced element.
    #[strum(serialize = "BlockReplacedBox")]
    BlockReplaced(Replacement),
    /// Inline-level replaced element.
    #[strum(serialize = "InlineReplacedBox")]
    InlineReplaced(Replacement),
    /// Block-level table.
    #[strum(serialize = "TableBox")]
    Table,
    /// Inline-level table.
    #[strum(serialize = "InlineTableBox")]
    InlineTable,
    /// Row group.
    #[strum(serialize = "TableRowGroupBox")]
    TableRowGroup,
    /// Row.
    #[strum(serialize = "TableRowBox")]
    TableRow,
    /// Column group.
    #[strum(serialize = "TableColumnGroupBox")]
    TableColumnGroup,
    /// Column.
    #[strum(serialize = "TableColumnBox")]
    TableColumn,
    /// Cell.
    #[strum(serialize = "TableCellBox")]
    TableCell,
    /// Caption.
    #[strum(serialize = "TableCaptionBox")]
    TableCaption,
    /// Page area.
    #[strum(serialize = "PageBox")]
    Page,
    /// Page-margin box.
    #[strum(serialize = "MarginBox")]
    Margin,
    /// Block-level flex container.
    #[strum(serialize = "FlexBox")]
    Flex,
    /// Inline-level flex container.
    #[strum(serialize = "InlineFlexBox")]
    InlineFlex,
}

impl BoxKind {
    /// The variant table: which capabilities each concrete variant has.
    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        use Capabilities as C;
        match self {
            Self::Block => C::PARENT
                .union(C::BLOCK_LEVEL)
                .union(C::BLOCK_CONTAINER)
                .union(C::BLOCK),
            Self::Line => C::PARENT.union(C::LINE),
            Self::Inline => C::PARENT.union(C::INLINE_LEVEL).union(C::INLINE),
            Self::Text(_) => C::INLINE_LEVEL.union(C::TEXT),
            Self::InlineBlock => C::PARENT
                .union(C::BLOCK_CONTAINER)
                .union(C::INLINE_LEVEL)
                .union(C::ATOMIC_INLINE_LEVEL)
                .union(C::INLINE_BLOCK),
            Self::BlockReplaced(_) => C::REPLACED.union(C::BLOCK_LEVEL).union(C::BLOCK_REPLACED),
            Self::InlineReplaced(_) => C::REPLACED
                .union(C::INLINE_LEVEL)
                .union(C::ATOMIC_INLINE_LEVEL)
                .union(C::INLINE_REPLACED),
            Self::Table => C::PARENT.union(C::BLOCK_LEVEL).union(C::TABLE),
            Self::InlineTable => C::PARENT.union(C::TABLE).union(C::INLINE_TABLE),
            Self::TableRowGroup => C::PARENT.union(C::TABLE_ROW_GROUP),
            Self::TableRow => C::PARENT.union(C::TABLE_ROW),
            Self::TableColumnGroup => C::PARENT.union(C::TABLE_COLUMN_GROUP),
            Self::TableColumn => C::PARENT.union(C::TABLE_COLUMN),
            Self::TableCell => C::PARENT.union(C::BLOCK_CONTAINER).union(C::TABLE_CELL),
            Self::TableCaption => C::PARENT
                .union(C::BLOCK_LEVEL)
                .union(C::BLOCK_CONTAINER)
                .union(C::BLOCK)
                .union(C::TABLE_CAPTION),
            Self::Page => C::PARENT.union(C::PAGE),
            Self::Margin => C::PARENT.union(C::BLOCK_CONTAINER).union(C::MARGIN),
            Self::Flex => C::PARENT.union(C::BLOCK_LEVEL).union(C::FLEX_CONTAINER),
            Self::InlineFlex => C::PARENT
                .union(C::INLINE_LEVEL)
                .union(C::ATOMIC_INLINE_LEVEL)
                .union(C::FLEX_CONTAINER),
        }
    }

    /// Debug name of the variant (`"BlockBox"`, `"TextBox"`, ...).
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// [§ 17.2.1 Anonymous table objects](https://www.w3.org/TR/CSS21/tables.html#anonymous-boxes)
    ///
    /// Table-internal boxes may only appear under the parents CSS allows for
    /// them. Every other variant accepts any parent.
    #[must_use]
    pub const fn is_proper_child_of(&self, parent: &Self) -> bool {
        use Capabilities as C;
        let allowed = match self {
            Self::TableRowGroup | Self::TableColumnGroup | Self::TableCaption => C::TABLE,
            Self::TableRow => C::TABLE.union(C::TABLE_ROW_GROUP),
            Self::TableColumn => C::TABLE.union(C::TABLE_COLUMN_GROUP),
            _ => return true,
        };
        parent.capabilities().intersects(allowed)
    }

    /// Whether the tree builder may generate this variant anonymously.
    #[must_use]
    pub const fn allows_anonymous(&self) -> bool {
        !matches!(
            self,
            Self::Page | Self::Margin | Self::BlockReplaced(_) | Self::InlineReplaced(_)
        )
    }
}

/// A child slot in the box tree: a regular box, or a placeholder standing in
/// for an absolutely or fixed positioned box until it is laid out.
#[derive(Debug, Clone, PartialEq)]
pub enum BoxNode {
    /// A box in the tree.
    Box(LayoutBox),
    /// An out-of-flow box awaiting (or after) its second layout pass.
    Placeholder(PlaceholderRef),
}

impl From<LayoutBox> for BoxNode {
    fn from(layout_box: LayoutBox) -> Self {
        Self::Box(layout_box)
    }
}

impl BoxNode {
    /// The box, unless this is a placeholder.
    #[must_use]
    pub const fn as_box(&self) -> Option<&LayoutBox> {
        match self {
            Self::Box(b) => Some(b),
            Self::Placeholder(_) => None,
        }
    }

    /// Mutable access to the box, unless this is a placeholder.
    pub const fn as_box_mut(&mut self) -> Option<&mut LayoutBox> {
        match self {
            Self::Box(b) => Some(b),
            Self::Placeholder(_) => None,
        }
    }

    /// Run `f` on the box, borrowing through the placeholder if needed.
    pub fn with_box<R>(&self, f: impl FnOnce(&LayoutBox) -> R) -> R {
        match self {
            Self::Box(b) => f(b),
            Self::Placeholder(placeholder) => f(placeholder.borrow().layout_box()),
        }
    }

    /// Out-of-flow placeholders and floats are not in normal flow.
    #[must_use]
    pub fn is_in_normal_flow(&self) -> bool {
        self.as_box().is_some_and(LayoutBox::is_in_normal_flow)
    }

    /// Whether this is a floated box.
    #[must_use]
    pub fn is_floated(&self) -> bool {
        self.as_box().is_some_and(LayoutBox::is_floated)
    }

    /// Translate the box or the placeholder.
    pub fn translate(&mut self, dx: f32, dy: f32, ignore_floats: bool) {
        match self {
            Self::Box(b) => b.translate(dx, dy, ignore_floats),
            Self::Placeholder(placeholder) => {
                placeholder.borrow_mut().translate(dx, dy, ignore_floats);
            }
        }
    }

    /// Left edge of the margin box.
    #[must_use]
    pub fn position_x(&self) -> f32 {
        self.with_box(|b| b.dimensions.position_x)
    }

    /// Width of the margin box.
    #[must_use]
    pub fn margin_width(&self) -> f32 {
        self.with_box(|b| b.dimensions.margin_width())
    }

    /// Unwrap into a plain box, substituting a placeholder's laid-out box.
    #[must_use]
    pub fn into_box(self) -> LayoutBox {
        match self {
            Self::Box(b) => b,
            Self::Placeholder(placeholder) => match Rc::try_unwrap(placeholder) {
                Ok(cell) => cell.into_inner().into_box(),
                Err(shared) => shared.borrow().layout_box().clone(),
            },
        }
    }
}

/// A box in the layout tree.
///
/// [§ 9.1 Introduction to the visual formatting model](https://www.w3.org/TR/CSS2/visuren.html#visual-model-intro)
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBox {
    /// Concrete variant, carrying per-variant content.
    pub kind: BoxKind,
    /// Identifier of the element that generated the box (for debugging and
    /// pseudo-element correlation, e.g. `"p::first-letter"`).
    pub element_tag: String,
    /// Computed style, shared and never mutated.
    pub style: Rc<ComputedStyle>,
    /// Children in document order.
    pub children: Vec<BoxNode>,
    /// Position and box-model edges.
    pub dimensions: BoxDimensions,
    /// Used values of `top`/`right`/`bottom`/`left`.
    pub insets: AutoEdgeSizes,
    /// Used `min-width`.
    pub min_width: f32,
    /// Used `max-width` (infinite for `none`).
    pub max_width: f32,
    /// Used `min-height`.
    pub min_height: f32,
    /// Used `max-height` (infinite for `none`).
    pub max_height: f32,
    /// Used `text-indent` for the next line of a line box.
    pub text_indent: f32,
    /// Anonymous wrapper generated around a table.
    pub is_table_wrapper: bool,
    /// The box ends with a space that collapsed into a following sibling.
    pub trailing_collapsible_space: bool,
    /// Style of the `::first-letter` pseudo-element of a block container.
    pub first_letter_style: Option<Rc<ComputedStyle>>,
}

impl LayoutBox {
    /// A box of the given variant with no children.
    #[must_use]
    pub fn new(kind: BoxKind, element_tag: impl Into<String>, style: Rc<ComputedStyle>) -> Self {
        Self {
            kind,
            element_tag: element_tag.into(),
            style,
            children: Vec::new(),
            dimensions: BoxDimensions::default(),
            insets: AutoEdgeSizes::default(),
            min_width: 0.0,
            max_width: f32::INFINITY,
            min_height: 0.0,
            max_height: f32::INFINITY,
            text_indent: 0.0,
            is_table_wrapper: false,
            trailing_collapsible_space: false,
            first_letter_style: None,
        }
    }

    /// [§ 2.1 Case Transforms](https://www.w3.org/TR/css-text-3/#text-transform-property)
    ///
    /// A text box. `text-transform` and `hyphens: none` are applied here, so
    /// layout only ever sees the final text. Fails if no text remains.
    ///
    /// # Errors
    /// Returns [`BoxError::EmptyText`] when the (transformed) text is empty.
    pub fn text(
        element_tag: impl Into<String>,
        style: Rc<ComputedStyle>,
        text: &str,
    ) -> Result<Self> {
        let element_tag = element_tag.into();
        let text = transform_text(text, &style);
        if text.is_empty() {
            return Err(BoxError::EmptyText { element_tag });
        }
        let content = TextContent {
            text,
            ..TextContent::default()
        };
        Ok(Self::new(BoxKind::Text(content), element_tag, style))
    }

    /// An anonymous box of `kind` generated inside `parent`.
    ///
    /// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    ///
    /// "The properties of anonymous boxes are inherited from the enclosing
    /// non-anonymous box." Non-inherited properties take their initial value.
    ///
    /// # Errors
    /// Fails for variants that are never anonymous and for children that are
    /// not proper children of the new box.
    pub fn anonymous_from(kind: BoxKind, parent: &Self, children: Vec<Self>) -> Result<Self> {
        if !kind.allows_anonymous() || matches!(kind, BoxKind::Text(_)) {
            return Err(BoxError::NotAnonymous { kind: kind.name() });
        }
        let mut style = ComputedStyle::inherit_from(&parent.style);
        if kind.capabilities().contains(Capabilities::LINE) && parent.style.overflow != Overflow::Visible {
            style.text_overflow = parent.style.text_overflow;
        }
        if kind.capabilities().contains(Capabilities::BLOCK) {
            style.display = DisplayValue::block();
            style.specified_display = style.display;
        }
        Self::new(kind, parent.element_tag.clone(), Rc::new(style)).with_children(children)
    }

    /// An anonymous text box inside `parent`.
    ///
    /// # Errors
    /// Returns [`BoxError::EmptyText`] for empty text.
    pub fn anonymous_text_from(parent: &Self, text: &str) -> Result<Self> {
        let style = ComputedStyle::inherit_from(&parent.style);
        Self::text(parent.element_tag.clone(), Rc::new(style), text)
    }

    /// Append children, checking containment rules.
    ///
    /// # Errors
    /// See [`Self::append_child`].
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Result<Self> {
        for child in children {
            self.append_child(child)?;
        }
        Ok(self)
    }

    /// Append a child, checking that this box can hold children and that the
    /// child is a proper child of it.
    ///
    /// # Errors
    /// [`BoxError::NotAParent`] or [`BoxError::ImproperChild`].
    pub fn append_child(&mut self, child: Self) -> Result<()> {
        if !self.is(Capabilities::PARENT) {
            return Err(BoxError::NotAParent {
                kind: self.kind.name(),
            });
        }
        if !child.kind.is_proper_child_of(&self.kind) {
            return Err(BoxError::ImproperChild {
                child: child.kind.name(),
                parent: self.kind.name(),
            });
        }
        self.children.push(BoxNode::Box(child));
        Ok(())
    }

    /// Capabilities of this box's variant.
    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        self.kind.capabilities()
    }

    /// Whether the box has any of the given capabilities.
    #[must_use]
    pub const fn is(&self, capabilities: Capabilities) -> bool {
        self.capabilities().intersects(capabilities)
    }

    /// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
    #[must_use]
    pub fn is_floated(&self) -> bool {
        self.style.float.is_some()
    }

    /// Side of a floated box.
    #[must_use]
    pub fn float_side(&self) -> Option<FloatSide> {
        self.style.float
    }

    /// [§ 9.6 Absolute positioning](https://www.w3.org/TR/CSS2/visuren.html#absolute-positioning)
    #[must_use]
    pub fn is_absolutely_positioned(&self) -> bool {
        self.style.is_absolutely_positioned()
    }

    /// `position: relative`.
    #[must_use]
    pub fn is_relatively_positioned(&self) -> bool {
        self.style.position == PositionType::Relative
    }

    /// [§ 9.3 Positioning schemes](https://www.w3.org/TR/CSS2/visuren.html#positioning-scheme)
    ///
    /// "An element is called out of flow if it is floated, absolutely
    /// positioned, or is the root element."
    #[must_use]
    pub fn is_in_normal_flow(&self) -> bool {
        !(self.is_floated() || self.is_absolutely_positioned())
    }

    /// Text content of a text box.
    #[must_use]
    pub const fn text_content(&self) -> Option<&TextContent> {
        match &self.kind {
            BoxKind::Text(content) => Some(content),
            _ => None,
        }
    }

    /// Mutable text content of a text box.
    pub const fn text_content_mut(&mut self) -> Option<&mut TextContent> {
        match &mut self.kind {
            BoxKind::Text(content) => Some(content),
            _ => None,
        }
    }

    /// Text of a text box.
    #[must_use]
    pub fn text_str(&self) -> Option<&str> {
        self.text_content().map(|content| content.text.as_str())
    }

    /// Intrinsic dimensions of a replaced box.
    #[must_use]
    pub const fn replacement(&self) -> Option<&Replacement> {
        match &self.kind {
            BoxKind::BlockReplaced(replacement) | BoxKind::InlineReplaced(replacement) => {
                Some(replacement)
            }
            _ => None,
        }
    }

    /// Whether the box establishes a new block formatting context for its
    /// contents.
    ///
    /// [§ 9.4.1](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
    /// "Floats, absolutely positioned elements, block containers (such as
    /// inline-blocks, table-cells, and table-captions) that are not block
    /// boxes, and block boxes with 'overflow' other than 'visible'..."
    #[must_use]
    pub fn establishes_formatting_context(&self) -> bool {
        self.is_floated()
            || self.is_absolutely_positioned()
            || (self.is(Capabilities::BLOCK_CONTAINER) && !self.is(Capabilities::BLOCK))
            || (self.is(Capabilities::BLOCK) && self.style.overflow != Overflow::Visible)
            || (self.is(Capabilities::BLOCK) && self.style.display.inner == InnerDisplayType::FlowRoot)
            || self.is(Capabilities::FLEX_CONTAINER)
    }

    /// A copy of this box with the given text, keeping everything else.
    ///
    /// # Panics
    /// Text boxes are never empty; passing empty text is a layout bug.
    #[must_use]
    pub fn copy_with_text(&self, text: String) -> Self {
        assert!(!text.is_empty(), "text box for '{}' copied with empty text", self.element_tag);
        let mut copy = self.clone_without_children();
        match copy.text_content_mut() {
            Some(content) => {
                content.text = text;
                content.visual_text = None;
            }
            None => panic!("copy_with_text called on {}", self.kind.name()),
        }
        copy
    }

    /// A copy of this box holding `children` in place of its own.
    ///
    /// A box split across lines or pages loses its decorations on the sides
    /// where it was split (`box-decoration-break: slice`).
    #[must_use]
    pub fn copy_with_children(&self, children: Vec<BoxNode>, is_start: bool, is_end: bool) -> Self {
        let mut copy = self.clone_without_children();
        copy.children = children;
        copy.remove_decoration(!is_start, !is_end);
        copy
    }

    pub(crate) fn clone_without_children(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            element_tag: self.element_tag.clone(),
            style: Rc::clone(&self.style),
            children: Vec::new(),
            dimensions: self.dimensions.clone(),
            insets: self.insets,
            min_width: self.min_width,
            max_width: self.max_width,
            min_height: self.min_height,
            max_height: self.max_height,
            text_indent: self.text_indent,
            is_table_wrapper: self.is_table_wrapper,
            trailing_collapsible_space: self.trailing_collapsible_space,
            first_letter_style: self.first_letter_style.clone(),
        }
    }

    /// [§ 5.4 Fragmented Box Decorations](https://www.w3.org/TR/css-break-3/#break-decoration)
    ///
    /// Drop margin, border and padding on the start and/or end side. Inline
    /// boxes are split along the inline axis (sides follow `direction`),
    /// everything else along the block axis.
    pub fn remove_decoration(&mut self, start: bool, end: bool) {
        if self.style.box_decoration_break == BoxDecorationBreak::Clone || !(start || end) {
            return;
        }
        let d = &mut self.dimensions;
        if self.kind.capabilities().contains(Capabilities::INLINE_LEVEL) {
            let ltr = self.style.direction == Direction::Ltr;
            let (left, right) = if ltr { (start, end) } else { (end, start) };
            if left {
                d.margin.left = AutoOr::Length(0.0);
                d.padding.left = 0.0;
                d.border.left = 0.0;
            }
            if right {
                d.margin.right = AutoOr::Length(0.0);
                d.padding.right = 0.0;
                d.border.right = 0.0;
            }
        } else {
            if start {
                d.margin.top = AutoOr::Length(0.0);
                d.padding.top = 0.0;
                d.border.top = 0.0;
            }
            if end {
                d.margin.bottom = AutoOr::Length(0.0);
                d.padding.bottom = 0.0;
                d.border.bottom = 0.0;
            }
        }
    }

    /// Move the box and all its descendants.
    ///
    /// With `ignore_floats`, floated descendants stay where they are.
    pub fn translate(&mut self, dx: f32, dy: f32, ignore_floats: bool) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        self.dimensions.position_x += dx;
        self.dimensions.position_y += dy;
        for child in &mut self.children {
            if !(ignore_floats && child.is_floated()) {
                child.translate(dx, dy, ignore_floats);
            }
        }
    }

    /// Substitute every placeholder with its laid-out box, yielding a tree of
    /// plain boxes.
    #[must_use]
    pub fn into_resolved(mut self) -> Self {
        self.children = std::mem::take(&mut self.children)
            .into_iter()
            .map(|child| BoxNode::Box(child.into_box().into_resolved()))
            .collect();
        self
    }

    /// Left edge of the margin box.
    #[must_use]
    pub const fn position_x(&self) -> f32 {
        self.dimensions.position_x
    }

    /// Top edge of the margin box.
    #[must_use]
    pub const fn position_y(&self) -> f32 {
        self.dimensions.position_y
    }

    /// Content width ('auto' as zero).
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.dimensions.width.px()
    }

    /// Content height ('auto' as zero).
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.dimensions.height.px()
    }

    /// Width of the margin box.
    #[must_use]
    pub fn margin_width(&self) -> f32 {
        self.dimensions.margin_width()
    }

    /// Height of the margin box.
    #[must_use]
    pub fn margin_height(&self) -> f32 {
        self.dimensions.margin_height()
    }

    /// Baseline offset from the top of the margin box ('unset' as zero).
    #[must_use]
    pub fn baseline(&self) -> f32 {
        self.dimensions.baseline.unwrap_or(0.0)
    }
}

/// Apply `text-transform` and `hyphens: none` to raw text.
fn transform_text(text: &str, style: &ComputedStyle) -> String {
    let mut transformed = match style.text_transform {
        TextTransform::None => text.to_string(),
        TextTransform::Uppercase => text.to_uppercase(),
        TextTransform::Lowercase => text.to_lowercase(),
        TextTransform::Capitalize => capitalize(text),
        TextTransform::FullWidth => text.chars().map(full_width).collect(),
    };
    if style.hyphens == Hyphens::None {
        transformed.retain(|c| c != '\u{ad}');
    }
    transformed
}

/// Titlecase the first letter of every word.
fn capitalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start = true;
    for c in text.chars() {
        if word_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        word_start = !c.is_alphanumeric() && c != '\'' && c != '\u{2019}';
    }
    out
}

/// Map printable ASCII to its fullwidth form.
fn full_width(c: char) -> char {
    match c {
        ' ' => '\u{3000}',
        '!'..='~' => char::from_u32(u32::from(c) + 0xFEE0).unwrap_or(c),
        _ => c,
    }
}
