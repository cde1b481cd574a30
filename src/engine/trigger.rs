//! Line classification.
//!
//! Each line is scanned once into a `LineTraits` set before any rule runs.
//! Rules declare which traits can activate them; a rule whose traits are all
//! absent is skipped without being evaluated.
//!
//! This is a *necessary* condition only. The scan is cheap and may report
//! traits on lines a rule will still decline (for example `FORMAT_TOKEN` on a
//! quantity line ending in `1l`), since every rule re-checks its own pattern.

use crate::Format;
use crate::text::{self, FRESH_MARKER, FROZEN_MARKER, RETURN_KEYWORD};

bitflags::bitflags! {
    /// Coarse per-line features.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LineTraits: u16 {
        const HAS_DIGITS      = 1 << 0;
        const LEADING_INTEGER = 1 << 1;
        const PLUS_MARKER     = 1 << 2;
        const RETURN_MARKER   = 1 << 3;
        const FORMAT_TOKEN    = 1 << 4;
        const FROZEN_MARKER   = 1 << 5;
        const FRESH_MARKER    = 1 << 6;
        /// First token starts with a digit (`3`, `2cool`).
        const LEADING_DIGIT   = 1 << 7;
    }
}

impl LineTraits {
    pub fn scan(line: &str) -> Self {
        let mut traits = LineTraits::empty();
        let trimmed = line.trim();
        let folded = text::fold(trimmed);

        if trimmed.bytes().any(|b| b.is_ascii_digit()) {
            traits |= LineTraits::HAS_DIGITS;
        }
        if trimmed.bytes().next().is_some_and(|b| b.is_ascii_digit()) {
            traits |= LineTraits::LEADING_DIGIT;
        }
        if trimmed.split_whitespace().next().is_some_and(text::is_integer) {
            traits |= LineTraits::LEADING_INTEGER;
        }
        if trimmed.starts_with('+') {
            traits |= LineTraits::PLUS_MARKER;
        }
        if folded.starts_with(RETURN_KEYWORD) {
            traits |= LineTraits::RETURN_MARKER;
        }
        if folded.contains(FROZEN_MARKER) {
            traits |= LineTraits::FROZEN_MARKER;
        }
        for token in folded.split_whitespace() {
            if Format::from_keyword(token).is_some() {
                traits |= LineTraits::FORMAT_TOKEN;
            }
            if token == FRESH_MARKER {
                traits |= LineTraits::FRESH_MARKER;
            }
        }

        traits
    }

    /// Whether a rule requiring `required` may run on a line with these traits.
    pub fn activates(self, required: LineTraits) -> bool {
        required.is_empty() || self.intersects(required)
    }
}
