//! Rules that produce line items.

use crate::engine::FormatSource;
use crate::rules::helpers::{interpret_block, push_item};
use crate::rules::predicates::{is_lookahead_block, numeric_block, quantity_line};
use crate::{Delta, Env, Format, Line, LineTraits, Outcome, Rule};

/// `<qty> <abbrev> [<format>]`. The line is claimed even when the
/// abbreviation is unknown; the item is then dropped. A trailing format only
/// applies to this item.
fn detect_quantity(line: &Line<'_>, env: &Env<'_>) -> Outcome {
    let Some(parsed) = quantity_line(line.text) else {
        return Outcome::NoMatch;
    };

    let Some(family) = env.families.family_code(parsed.abbreviation) else {
        tracing::warn!(abbreviation = parsed.abbreviation, text = line.text, "unknown product abbreviation, dropping item");
        return Outcome::Continue(Delta::default());
    };

    let format = parsed.format_hint.and_then(Format::from_hint).unwrap_or(env.context.format);
    let mut items = Vec::with_capacity(1);
    push_item(&mut items, family, format, env.context.frozen, parsed.quantity);
    Outcome::Continue(Delta::items(items))
}

/// Bare integers, decoded positionally. When the following line is another
/// block, this line is read at 1L and the next one at 25CL, and the next line
/// is consumed. No lookahead in 5L or after an explicit format keyword.
fn detect_numeric_block(line: &Line<'_>, env: &Env<'_>) -> Outcome {
    let Some(block) = numeric_block(line.text) else {
        return Outcome::NoMatch;
    };
    let ctx = env.context;

    let lookahead = env.options.double_line
        && ctx.format != Format::L5
        && ctx.format_source == FormatSource::ClientDefault
        && line.next.is_some_and(is_lookahead_block);

    if lookahead {
        if let Some(second) = line.next.and_then(numeric_block) {
            let mut items = interpret_block(&block, Format::L1, ctx.frozen, env.families);
            items.extend(interpret_block(&second, Format::Cl25, ctx.frozen, env.families));
            return Outcome::ConsumesNextLine(Delta::items(items));
        }
    }

    Outcome::Continue(Delta::items(interpret_block(&block, ctx.format, ctx.frozen, env.families)))
}

pub(crate) fn rule_quantity() -> Rule {
    rule! {
        name: "quantity + abbreviation",
        buckets: LineTraits::LEADING_INTEGER,
        apply: detect_quantity,
    }
}

pub(crate) fn rule_numeric_block() -> Rule {
    rule! {
        name: "numeric block",
        buckets: LineTraits::LEADING_DIGIT,
        apply: detect_numeric_block,
    }
}
