use crate::engine::{self, LineTrace};
use crate::{Order, Rule, Tables};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::time::Duration;

static LINE_RULES: Lazy<Vec<Rule>> = Lazy::new(crate::rules::line_rules);
static SUFFIX_RULES: Lazy<Vec<Rule>> = Lazy::new(crate::rules::suffix_rules);

/// Options that affect interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Largest edit distance accepted by the fuzzy client lookup.
    pub fuzzy_max_distance: usize,
    /// Maximum number of passes over the text trailing a client name.
    pub suffix_passes: usize,
    /// Read two consecutive numeric blocks as 1L then 25CL.
    pub double_line: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options { fuzzy_max_distance: 2, suffix_passes: 3, double_line: true }
    }
}

/// Result from [`parse`] and [`parse_with`].
#[derive(Debug, Clone, Serialize)]
pub struct ParseResult {
    /// The parsed message.
    pub text: String,
    /// Orders in the order they were closed.
    pub orders: Vec<Order>,
    pub elapsed: Duration,
}

/// Per-line details returned by [`parse_verbose`] and [`parse_verbose_with`].
#[derive(Debug, Clone, Serialize)]
pub struct ParseDetails {
    pub lines: Vec<LineTrace>,
    pub total: Duration,
    /// Lines no rule claimed.
    pub unmatched: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseResultVerbose {
    pub text: String,
    pub orders: Vec<Order>,
    pub elapsed: Duration,
    pub details: ParseDetails,
}

/// Interpret `text` against `tables` with default [`Options`].
///
/// # Example
/// ```
/// use delivra::{parse, Tables};
///
/// let tables = Tables::from_json_str(r#"{
///     "clients": [{ "ID_Client": "C001", "Nom_Client": "Aziz", "DEFAULT": "1" }],
///     "abbreviations": [{ "ID_Client": "C001", "Nom_Client": "Aziz", "AB1": "aziz" }]
/// }"#).unwrap();
///
/// let out = parse("Aziz\n3 4", &tables);
/// assert_eq!(out.orders.len(), 1);
/// assert_eq!(out.orders[0].items[0].product_id, "C1L");
/// ```
pub fn parse(text: &str, tables: &Tables) -> ParseResult {
    parse_with(text, tables, &Options::default())
}

pub fn parse_with(text: &str, tables: &Tables, options: &Options) -> ParseResult {
    let parser = engine::Parser::new(tables, options, &LINE_RULES, &SUFFIX_RULES);
    let run = parser.run_with_trace(text);

    ParseResult { text: text.to_string(), orders: run.orders, elapsed: run.elapsed }
}

pub fn parse_verbose(text: &str, tables: &Tables) -> ParseResultVerbose {
    parse_verbose_with(text, tables, &Options::default())
}

/// Like [`parse_with`], and also reports which rule claimed each line.
pub fn parse_verbose_with(text: &str, tables: &Tables, options: &Options) -> ParseResultVerbose {
    let parser = engine::Parser::new(tables, options, &LINE_RULES, &SUFFIX_RULES);
    let run = parser.run_with_trace(text);

    let unmatched = run.trace.iter().filter(|t| t.rule.is_none()).count();
    let details = ParseDetails { lines: run.trace, total: run.elapsed, unmatched };

    ParseResultVerbose { text: text.to_string(), orders: run.orders, elapsed: run.elapsed, details }
}
