//! Layout of a box tree into positioned boxes.
//!
//! # Relevant Specifications
//!
//! - [CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html)
//! - [CSS 2.1 Visual Formatting Model Details](https://www.w3.org/TR/CSS2/visudet.html)
//! - [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)
//! - [CSS Fragmentation Module Level 3](https://www.w3.org/TR/css-break-3/)
//! - [CSS Text Module Level 3](https://www.w3.org/TR/css-text-3/)
//!
//! # Module Structure
//!
//! - [`box_model`] - Box dimensions, rectangles, and edge sizes
//! - [`values`] - Auto value types
//! - [`layout_box`] - The box tree and box capabilities
//! - [`skip_stack`] - Resumption cursors for split boxes
//! - [`context`] - Containing blocks and float exclusions
//! - [`block`] - Block formatting contexts
//! - [`inline`] - Inline formatting contexts and line boxes
//! - [`float`] - Float layout and clearance
//! - [`absolute`] - Absolutely and fixed positioned boxes
//! - [`flex`] - Single-line flex layout
//! - [`page`] - Pagination
//! - [`dump`] - Serializable snapshot of a laid-out tree

pub mod absolute;
pub mod block;
pub mod box_model;
pub mod context;
pub mod dump;
pub mod flex;
pub mod float;
pub mod inline;
pub mod layout_box;
pub mod page;
pub mod percentages;
pub mod preferred;
pub mod skip_stack;
pub mod values;

// Re-exports for convenience
pub use absolute::{AbsolutePlaceholder, PlaceholderRef, absolute_layout};
pub use block::{BlockLayout, block_container_layout, block_level_layout, find_in_flow_baseline};
pub use box_model::{BoxDimensions, EdgeSizes, Rect};
pub use context::{ContainingBlock, ExcludedShape, LayoutContext};
pub use dump::BoxDump;
pub use inline::{LaidOutLine, LineBoxes, iter_line_boxes};
pub use layout_box::{BoxKind, BoxNode, Capabilities, LayoutBox, Replacement, TextContent};
pub use page::{PageSettings, layout_document};
pub use skip_stack::SkipStack;
pub use values::{AutoEdgeSizes, AutoOr};
