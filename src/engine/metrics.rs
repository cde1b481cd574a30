//! Run traces.
//!
//! `Parser::run` returns only orders. `Parser::run_with_trace` also records,
//! for every line the loop visited, which rule claimed it and what it did.
//! Lines swallowed by a double-line match do not get their own entry; they
//! appear as `consumed_next` on the line that read them.

use crate::Order;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineTrace {
    /// 1-based position among the non-blank lines of the message.
    pub line: usize,
    pub text: String,
    /// Rule that claimed the line, `None` when the line was skipped.
    pub rule: Option<&'static str>,
    /// Text of the following line when it was read as part of this one.
    pub consumed_next: Option<String>,
    pub opened_order: bool,
    /// Items produced by this line (including its suffix, if any).
    pub items: usize,
}

/// Parser output bundled with its trace.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub orders: Vec<Order>,
    pub trace: Vec<LineTrace>,
    pub elapsed: Duration,
}
