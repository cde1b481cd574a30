//! The rule set, in precedence order.
//!
//! | # | rule                | activates on                   | effect                  |
//! |---|---------------------|--------------------------------|-------------------------|
//! | 1 | client with suffix  | always                         | opens order (+ suffix)  |
//! | 2 | new order marker    | `+`                            | opens order             |
//! | 3 | return marker       | `retour...`                    | opens return order      |
//! | 4 | format keyword      | `1l`, `25cl`, `5l`, `3l`       | sets format             |
//! | 5 | frozen keyword      | `surg...`, `frais`             | sets frozen flag        |
//! | 6 | quantity + abbrev   | leading integer                | one item                |
//! | 7 | numeric block       | leading digit                  | positional items        |

pub(crate) mod helpers;
pub(crate) mod items;
pub(crate) mod markers;
pub(crate) mod predicates;
pub(crate) mod settings;

#[cfg(test)]
mod tests;

use crate::Rule;

/// Rules tried against every line of a message.
pub(crate) fn line_rules() -> Vec<Rule> {
    vec![
        markers::rule_client_with_suffix(),
        markers::rule_new_order(),
        markers::rule_return(),
        settings::rule_format(),
        settings::rule_frozen(),
        items::rule_quantity(),
        items::rule_numeric_block(),
    ]
}

/// Rules tried against the text trailing a client name. Nothing here can open
/// an order.
pub(crate) fn suffix_rules() -> Vec<Rule> {
    vec![settings::rule_format(), settings::rule_frozen(), items::rule_quantity(), items::rule_numeric_block()]
}
