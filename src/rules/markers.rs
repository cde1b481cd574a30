//! Rules that open a new order: client line, `+client`, `retour [client]`.

use crate::text::{self, RETURN_KEYWORD};
use crate::{Client, Env, Line, LineTraits, Opening, OrderKind, Outcome, Rule};

/// Longest token prefix of `line_text` that resolves to a client, together
/// with the tokens left after it.
///
/// ```text
/// "Ksouri surg 5l"
///   try "ksouri surg 5l"  x
///   try "ksouri surg"     x
///   try "ksouri"          ✓  suffix = "surg 5l"
/// ```
///
/// Exact keys are tried over every prefix before any fuzzy lookup, so
/// `aziz 3` never swallows its `3` through a distance-2 match on the whole
/// line. Prefixes made only of setting keywords (`5l`, `surg`, `frais`) are
/// never looked up, so keyword lines cannot fuzzy-match a short client key.
fn resolve_longest_prefix(line_text: &str, env: &Env<'_>) -> Option<(Client, String)> {
    let tokens: Vec<&str> = line_text.split_whitespace().collect();

    for max_distance in [0, env.options.fuzzy_max_distance] {
        for cut in (1..=tokens.len()).rev() {
            let head = &tokens[..cut];
            if head.iter().all(|t| text::is_reserved_keyword(t)) {
                continue;
            }
            if let Some(client) = env.directory.resolve(&head.join(" "), max_distance) {
                return Some((client, tokens[cut..].join(" ")));
            }
        }
    }
    None
}

fn detect_client_with_suffix(line: &Line<'_>, env: &Env<'_>) -> Outcome {
    if line.traits.intersects(LineTraits::PLUS_MARKER | LineTraits::RETURN_MARKER | LineTraits::LEADING_INTEGER) {
        return Outcome::NoMatch;
    }

    let Some((client, suffix)) = resolve_longest_prefix(line.text, env) else {
        return Outcome::NoMatch;
    };

    tracing::debug!(client = %client.id, suffix = %suffix, "client line");
    Outcome::OpensNewOrder(Opening {
        client: Some(client),
        kind: OrderKind::Delivery,
        suffix: (!suffix.is_empty()).then_some(suffix),
    })
}

fn detect_new_order(line: &Line<'_>, env: &Env<'_>) -> Outcome {
    let Some(name) = line.text.strip_prefix('+').map(str::trim).filter(|n| !n.is_empty()) else {
        return Outcome::NoMatch;
    };

    match env.directory.resolve(name, env.options.fuzzy_max_distance) {
        Some(client) => Outcome::OpensNewOrder(Opening { client: Some(client), kind: OrderKind::Delivery, suffix: None }),
        None => {
            tracing::debug!(name, "new-order marker names no known client");
            Outcome::NoMatch
        }
    }
}

/// `retour` alone keeps the current client; `retour <name>` switches to
/// `<name>` when it resolves.
fn detect_return(line: &Line<'_>, env: &Env<'_>) -> Outcome {
    if !text::fold(line.text).starts_with(RETURN_KEYWORD) {
        return Outcome::NoMatch;
    }

    let rest = line
        .text
        .char_indices()
        .nth(RETURN_KEYWORD.chars().count())
        .map(|(idx, _)| line.text[idx..].trim())
        .unwrap_or("");

    let named = if rest.is_empty() { None } else { env.directory.resolve(rest, env.options.fuzzy_max_distance) };
    let client = named.or_else(|| env.context.client.clone());

    Outcome::OpensNewOrder(Opening { client, kind: OrderKind::Return, suffix: None })
}

pub(crate) fn rule_client_with_suffix() -> Rule {
    rule! {
        name: "client with suffix",
        apply: detect_client_with_suffix,
    }
}

pub(crate) fn rule_new_order() -> Rule {
    rule! {
        name: "new order marker",
        buckets: LineTraits::PLUS_MARKER,
        apply: detect_new_order,
    }
}

pub(crate) fn rule_return() -> Rule {
    rule! {
        name: "return marker",
        buckets: LineTraits::RETURN_MARKER,
        apply: detect_return,
    }
}
