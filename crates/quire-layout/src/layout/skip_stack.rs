//! Resumption cursors for split boxes.
//!
//! [§ 4 Splitting Boxes](https://www.w3.org/TR/css-break-3/#breaking-boxes)
//!
//! When a box does not fit on the current line or page, layout reports where
//! it stopped as a [`SkipStack`]: an index into the box's children plus, when
//! that child was itself split, the cursor inside it. The innermost level of a
//! text box counts characters instead of children.

use std::fmt;

/// A persistent, nested "resume here" cursor.
///
/// Values are immutable: splitting never edits a cursor in place, so several
/// candidate resumes can coexist while a line searches for a break.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SkipStack {
    /// Index of the child (or character, for text) to resume at.
    pub skip: usize,
    /// Cursor inside the child at `skip`, if that child was split.
    pub stack: Option<Box<SkipStack>>,
}

impl SkipStack {
    /// A cursor with no nested level.
    #[must_use]
    pub const fn leaf(skip: usize) -> Self {
        Self { skip, stack: None }
    }

    /// Resume inside child `skip` at `inner`.
    #[must_use]
    pub fn nested(skip: usize, inner: Option<Self>) -> Self {
        Self {
            skip,
            stack: inner.map(Box::new),
        }
    }

    /// The child index and the cursor inside it.
    #[must_use]
    pub fn split(&self) -> (usize, Option<&Self>) {
        (self.skip, self.stack.as_deref())
    }

    /// Number of levels.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.stack.as_ref().map_or(0, |inner| inner.depth())
    }

    /// Cursor for a child that was re-split after a first pass had already
    /// laid it out starting from `initial`.
    ///
    /// The re-split sees the child as copied by the first pass, whose
    /// children (or text) begin at the original cursor. Its resume offsets
    /// are therefore relative to `initial`, and the two cursors are added
    /// level by level. Levels are absorbed only while the re-split resumes at
    /// offset zero: as soon as it resumes further in, the deeper levels of
    /// `initial` no longer describe the same child.
    #[must_use]
    pub fn combine(initial: Option<&Self>, child_index: usize, child_resume: Option<Self>) -> Self {
        let inner = match initial {
            Some(initial) if initial.skip == child_index => {
                merge_resumed(initial.stack.as_deref(), child_resume)
            }
            _ => child_resume,
        };
        Self::nested(child_index, inner)
    }
}

fn merge_resumed(original: Option<&SkipStack>, resume: Option<SkipStack>) -> Option<SkipStack> {
    match (original, resume) {
        (Some(original), Some(resume)) => {
            let tail = resume.stack.map(|inner| *inner);
            let stack = if resume.skip == 0 {
                merge_resumed(original.stack.as_deref(), tail)
            } else {
                tail
            };
            Some(SkipStack::nested(original.skip + resume.skip, stack))
        }
        (_, resume) => resume,
    }
}

impl fmt::Display for SkipStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.stack {
            Some(inner) => write!(f, "{{{}: {inner}}}", self.skip),
            None => write!(f, "{{{}}}", self.skip),
        }
    }
}
