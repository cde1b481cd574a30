//! Suffix mini-parser.
//!
//! Text after a client name on the same line (`Ksouri surg 5l`) is applied to
//! the freshly opened order with a reduced rule set: format, frozen, quantity
//! and numeric block. Client, new-order and return detection never run here,
//! so a suffix cannot open another order.
//!
//! Each pass hands the unconsumed remainder of the previous match to the next
//! pass. Passes are capped by `Options::suffix_passes` and stop early when
//! nothing matches or nothing is left.

use super::context::OrderAssembler;
use super::parser::Parser;
use crate::{Line, Outcome};

impl Parser<'_> {
    /// Re-parse `suffix` in the current context; returns the number of items
    /// it produced.
    pub(super) fn reparse_suffix(&self, suffix: &str, assembler: &mut OrderAssembler) -> usize {
        let mut remaining = suffix.trim().to_string();
        let mut added = 0;

        for pass in 0..self.options.suffix_passes {
            if remaining.is_empty() {
                break;
            }

            let line = Line::new(&remaining, None);
            let Some((name, outcome)) = self.first_match(self.suffix_rules, &line, assembler.context()) else {
                tracing::debug!(pass, suffix = %remaining, "suffix left unparsed");
                break;
            };

            let delta = match outcome {
                Outcome::Continue(delta) | Outcome::ConsumesNextLine(delta) => delta,
                Outcome::OpensNewOrder(_) | Outcome::NoMatch => {
                    tracing::warn!(rule = name, "suffix rule did not produce a context delta");
                    break;
                }
            };

            tracing::debug!(pass, rule = name, suffix = %remaining, "suffix pass matched");
            let next = delta.remainder.clone().unwrap_or_default();
            added += assembler.apply(delta);
            remaining = next;
        }

        added
    }
}
