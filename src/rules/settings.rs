//! Rules that change how following items are read, without producing any.
//!
//! The format rule declines on quantity lines so that `2 f 1l` keeps its
//! trailing format as an item hint; `3 25cl` is a format line. The frozen
//! rule declines on lines starting with an integer. Each consumes one token
//! and reports the rest as remainder.

use crate::rules::predicates::quantity_line;
use crate::text::{self, FRESH_MARKER, FROZEN_MARKER};
use crate::{Delta, Env, Format, Line, LineTraits, Outcome, Rule};

fn detect_format(line: &Line<'_>, _env: &Env<'_>) -> Outcome {
    if quantity_line(line.text).is_some() {
        return Outcome::NoMatch;
    }

    let tokens: Vec<&str> = line.text.split_whitespace().collect();
    let Some((pos, format)) = tokens.iter().enumerate().find_map(|(i, t)| Format::from_keyword(t).map(|f| (i, f)))
    else {
        return Outcome::NoMatch;
    };

    Outcome::Continue(Delta { format: Some(format), remainder: Some(text::join_without(&tokens, pos)), ..Delta::default() })
}

fn detect_frozen(line: &Line<'_>, _env: &Env<'_>) -> Outcome {
    if line.traits.contains(LineTraits::LEADING_INTEGER) {
        return Outcome::NoMatch;
    }

    let tokens: Vec<&str> = line.text.split_whitespace().collect();
    let folded: Vec<String> = tokens.iter().map(|t| text::fold(t)).collect();

    let frozen_at = folded.iter().position(|t| t.contains(FROZEN_MARKER));
    let fresh_at = folded.iter().position(|t| t == FRESH_MARKER);
    let (pos, frozen) = match (frozen_at, fresh_at) {
        (Some(pos), _) => (pos, true),
        (None, Some(pos)) => (pos, false),
        (None, None) => return Outcome::NoMatch,
    };

    Outcome::Continue(Delta { frozen: Some(frozen), remainder: Some(text::join_without(&tokens, pos)), ..Delta::default() })
}

pub(crate) fn rule_format() -> Rule {
    rule! {
        name: "format keyword",
        buckets: LineTraits::FORMAT_TOKEN,
        apply: detect_format,
    }
}

pub(crate) fn rule_frozen() -> Rule {
    rule! {
        name: "frozen keyword",
        buckets: LineTraits::FROZEN_MARKER | LineTraits::FRESH_MARKER,
        apply: detect_frozen,
    }
}
