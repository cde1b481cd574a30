#[macro_use]
mod macros;
mod api;
mod directory;
mod engine;
mod families;
mod rules;
mod sink;
mod text;

pub use api::{Options, ParseDetails, ParseResult, ParseResultVerbose, parse, parse_verbose, parse_verbose_with, parse_with};
pub use directory::{AbbreviationRow, Client, ClientDirectory, ClientIdentity, ClientRecord, DirectoryError, Tables};
pub use engine::LineTrace;
pub use families::{FamilyEntry, FamilyTable};
pub use sink::{DeliveryRecord, JsonLinesSink, MemorySink, OrderSink, SinkError};

pub(crate) use engine::{Context, LineTraits};

use serde::{Deserialize, Serialize};
use std::fmt;

// --- Domain types -----------------------------------------------------------

/// Packaging unit of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    #[serde(rename = "1L")]
    L1,
    #[serde(rename = "25CL")]
    Cl25,
    #[serde(rename = "5L")]
    L5,
    #[serde(rename = "3L")]
    L3,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::L1 => "1L",
            Format::Cl25 => "25CL",
            Format::L5 => "5L",
            Format::L3 => "3L",
        }
    }

    /// Strict keyword match: the whole token must be a format keyword
    /// (`5l`, `25cl`, `1l`, `3l`), ignoring case and diacritics.
    pub fn from_keyword(token: &str) -> Option<Format> {
        match text::fold(token).as_str() {
            "5l" => Some(Format::L5),
            "25cl" => Some(Format::Cl25),
            "1l" => Some(Format::L1),
            "3l" => Some(Format::L3),
            _ => None,
        }
    }

    /// Lenient match used for the optional trailing token of a quantity line,
    /// where `25` alone is accepted as 25CL.
    pub fn from_hint(token: &str) -> Option<Format> {
        let folded = text::fold(token);
        if folded.contains("5l") {
            Some(Format::L5)
        } else if folded.contains("25") {
            Some(Format::Cl25)
        } else if folded.contains("3l") {
            Some(Format::L3)
        } else if folded.contains("1l") {
            Some(Format::L1)
        } else {
            None
        }
    }

    /// Map a client's default-format code to the format an order opens with.
    pub fn from_default_code(code: &str) -> Format {
        match code.trim() {
            "5" => Format::L5,
            "25" => Format::Cl25,
            "3" => Format::L3,
            _ => Format::L1,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suffix appended to product ids produced while the frozen flag is active.
pub const FROZEN_SUFFIX: &str = "S";

/// Compose a product id: family code, format, then the frozen suffix if any.
///
/// ```text
/// ("C", 1L, false)  -> "C1L"
/// ("MG", 25CL, true) -> "MG25CLS"
/// ```
pub fn product_id(family_code: &str, format: Format, frozen: bool) -> String {
    let mut id = format!("{}{}", family_code.to_uppercase(), format.as_str());
    if frozen {
        id.push_str(FROZEN_SUFFIX);
    }
    id
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(rename = "productId")]
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Delivery,
    Return,
}

/// A closed order. Only ever built with a client and at least one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub client: Client,
    pub items: Vec<LineItem>,
    #[serde(rename = "type")]
    pub kind: OrderKind,
}

// --- Rules ------------------------------------------------------------------

/// One non-blank, trimmed line handed to a rule, with a peek at the line
/// after it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Line<'a> {
    pub text: &'a str,
    pub next: Option<&'a str>,
    pub traits: LineTraits,
}

impl<'a> Line<'a> {
    pub fn new(text: &'a str, next: Option<&'a str>) -> Self {
        Line { text, next, traits: LineTraits::scan(text) }
    }
}

/// Read-only view a rule evaluates against.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Env<'a> {
    pub directory: &'a ClientDirectory,
    pub families: &'a FamilyTable,
    pub context: &'a Context,
    pub options: &'a Options,
}

pub(crate) type Apply = fn(&Line<'_>, &Env<'_>) -> Outcome;

/// A parsing rule: a name, the line traits that can activate it (empty means
/// always on) and the matcher itself.
pub(crate) struct Rule {
    pub name: &'static str,
    pub buckets: LineTraits,
    pub apply: Apply,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).field("buckets", &self.buckets).finish()
    }
}

/// What a rule decided about a line.
#[derive(Debug, Clone)]
pub(crate) enum Outcome {
    NoMatch,
    /// Mutate the context in place; the open order stays open.
    Continue(Delta),
    /// Close the open order and start a new one.
    OpensNewOrder(Opening),
    /// Like `Continue`, and the following line has been read as well.
    ConsumesNextLine(Delta),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Delta {
    pub format: Option<Format>,
    pub frozen: Option<bool>,
    pub items: Vec<LineItem>,
    /// Tokens the rule did not consume. Only the suffix mini-parser reads it.
    pub remainder: Option<String>,
}

impl Delta {
    pub fn items(items: Vec<LineItem>) -> Self {
        Delta { items, ..Delta::default() }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Opening {
    pub client: Option<Client>,
    pub kind: OrderKind,
    /// Trailing text after the client name, re-parsed in the new order.
    pub suffix: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_ids_compose_family_format_and_frozen_suffix() {
        assert_eq!(product_id("C", Format::L1, false), "C1L");
        assert_eq!(product_id("C", Format::L1, true), "C1LS");
        assert_eq!(product_id("mg", Format::Cl25, false), "MG25CL");
        assert_eq!(product_id("F", Format::L5, true), "F5LS");
    }

    #[test]
    fn format_keywords_are_strict_and_hints_are_lenient() {
        assert_eq!(Format::from_keyword("25CL"), Some(Format::Cl25));
        assert_eq!(Format::from_keyword("5l"), Some(Format::L5));
        assert_eq!(Format::from_keyword("25"), None);
        assert_eq!(Format::from_hint("25"), Some(Format::Cl25));
        assert_eq!(Format::from_hint("5L"), Some(Format::L5));
        assert_eq!(Format::from_hint("surg"), None);
    }

    #[test]
    fn default_codes_map_to_formats() {
        assert_eq!(Format::from_default_code("5"), Format::L5);
        assert_eq!(Format::from_default_code("25"), Format::Cl25);
        assert_eq!(Format::from_default_code("3"), Format::L3);
        assert_eq!(Format::from_default_code("1"), Format::L1);
        assert_eq!(Format::from_default_code(""), Format::L1);
    }
}
