//! Message interpretation engine.
//!
//! A message is read line by line. Every line goes through the rule set in a
//! fixed precedence order; the first rule that matches wins and its outcome is
//! applied to the parsing context. Orders are closed whenever a rule opens a
//! new one, and once more at the end of the message.
//!
//! ```text
//! message ── split + trim + drop blanks
//!               │
//!               v
//!   for each line:  LineTraits::scan          (trigger.rs)
//!                    │  gate rules by traits
//!                    v
//!                 first matching rule ─> Outcome
//!                    │
//!         ┌──────────┼─────────────────┬──────────────────┐
//!         v          v                 v                  v
//!      NoMatch    Continue      OpensNewOrder       ConsumesNextLine
//!      (skip)   apply delta   flush + reset ctx     apply delta,
//!                             (+ suffix re-parse)   skip next line
//!               │
//!               v
//!   end of message: final flush ─> Vec<Order>
//! ```
//!
//! ## Responsibilities by module
//!
//! - `trigger.rs`: cheap per-line classification into `LineTraits`, used to
//!   skip rules that cannot match.
//! - `context.rs`: the mutable parsing state and the order assembler
//!   (close-before-open, never emit empty orders).
//! - `parser.rs`: the line loop and rule dispatch.
//! - `suffix.rs`: the bounded re-parse of text trailing a client name.
//! - `metrics.rs`: per-line trace records for verbose runs.
//!
//! Every call builds its own context, so concurrent parses never share state.
//! Set `RUST_LOG=delivra=debug` to see rule decisions.

#[path = "engine/context.rs"]
mod context;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/parser.rs"]
mod parser;
#[path = "engine/suffix.rs"]
mod suffix;
#[path = "engine/trigger.rs"]
mod trigger;

pub(crate) use context::{Context, FormatSource};
pub use metrics::LineTrace;
pub(crate) use parser::Parser;
pub(crate) use trigger::LineTraits;
