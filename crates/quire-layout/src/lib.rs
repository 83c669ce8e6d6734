//! Box tree, inline formatting and pagination core of the quire layout engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Box tree** ([§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen))
//!   - Box variants tagged with capabilities
//!   - Anonymous boxes and containment rules
//!
//! - **Inline formatting** ([§ 9.4.2](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting))
//!   - Line breaking with resumable skip stacks
//!   - Floats next to line content, `::first-letter`
//!   - `text-align`, justification and `vertical-align`
//!
//! - **Out-of-flow boxes** ([§ 9.6](https://www.w3.org/TR/CSS2/visuren.html#absolute-positioning))
//!   - Placeholders at the static position, resolved against their
//!     containing block once it is laid out
//!
//! - **Block, flex and page layout**
//!   - Margin collapsing, clearance, min/max sizes
//!   - Pagination
//!
//! # Not Yet Implemented
//!
//! - Table layout (table boxes are stacked like blocks)
//! - Multi-line and column flex layout
//! - Font-backed text shaping

/// Errors raised while building the box tree.
pub mod error;
/// Layout algorithms per the [CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html).
pub mod layout;
/// Computed style values read by layout.
pub mod style;
/// Text measurement and line breaking.
pub mod text;
