//! Auto value types for CSS layout.
//!
//! [§ 6.1 Used Values](https://www.w3.org/TR/css-cascade-4/#used)

/// [§ 4.4 Automatic values](https://www.w3.org/TR/CSS2/cascade.html#value-def-auto)
///
/// "Some properties can take the keyword 'auto' as a value. This keyword
/// allows the user agent to compute the value based on other properties."
///
/// This enum represents a value that can either be 'auto' or a specific length.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AutoOr {
    /// The value is 'auto' and must be resolved during layout.
    #[default]
    Auto,
    /// The value is a specific length in pixels.
    Length(f32),
}

impl AutoOr {
    /// Check if the value is 'auto'.
    #[must_use]
    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Get the length value, or a default if 'auto'.
    #[must_use]
    pub const fn to_px_or(self, default: f32) -> f32 {
        match self {
            Self::Length(v) => v,
            Self::Auto => default,
        }
    }

    /// The length, with 'auto' counting as zero.
    #[must_use]
    pub const fn px(self) -> f32 {
        self.to_px_or(0.0)
    }

    /// The length, if resolved.
    #[must_use]
    pub const fn length(self) -> Option<f32> {
        match self {
            Self::Length(v) => Some(v),
            Self::Auto => None,
        }
    }
}

impl From<f32> for AutoOr {
    fn from(value: f32) -> Self {
        Self::Length(value)
    }
}

/// [§ 8 Box model](https://www.w3.org/TR/CSS2/box.html)
///
/// Edge values where each side can be 'auto' or a specific length.
/// Used for margins and box offsets where 'auto' has special meaning.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AutoEdgeSizes {
    /// Top edge value.
    pub top: AutoOr,
    /// Right edge value.
    pub right: AutoOr,
    /// Bottom edge value.
    pub bottom: AutoOr,
    /// Left edge value.
    pub left: AutoOr,
}

impl AutoEdgeSizes {
    /// All four edges set to the same length.
    #[must_use]
    pub const fn uniform(value: f32) -> Self {
        Self {
            top: AutoOr::Length(value),
            right: AutoOr::Length(value),
            bottom: AutoOr::Length(value),
            left: AutoOr::Length(value),
        }
    }
}
