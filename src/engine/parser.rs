//! Line loop and rule dispatch.
//!
//! ```text
//! lines: ["aziz", "3 4 5 2", "1 0 2 0", "+ksouri", "2 6"]
//!          │        │          │          │          │
//!          │        └─ numeric block reads the next line too (idx += 2)
//!          └─ opens order(aziz)          └─ flush aziz, open order(ksouri)
//! ```
//!
//! Rules are evaluated lazily in precedence order; the first non-`NoMatch`
//! outcome wins and the remaining rules are not consulted for that line.

use super::context::{Context, OrderAssembler};
use super::metrics::{LineTrace, RunResult};
use crate::{Env, Line, Options, Outcome, Rule, Tables};
use std::time::Instant;

#[derive(Debug)]
pub(crate) struct Parser<'a> {
    tables: &'a Tables,
    pub(super) options: &'a Options,
    rules: &'a [Rule],
    pub(super) suffix_rules: &'a [Rule],
}

impl<'a> Parser<'a> {
    pub fn new(tables: &'a Tables, options: &'a Options, rules: &'a [Rule], suffix_rules: &'a [Rule]) -> Self {
        Parser { tables, options, rules, suffix_rules }
    }

    #[cfg(test)]
    pub fn run(&self, message: &str) -> Vec<crate::Order> {
        self.run_with_trace(message).orders
    }

    pub fn run_with_trace(&self, message: &str) -> RunResult {
        let start = Instant::now();
        let lines: Vec<&str> = message.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

        let mut assembler = OrderAssembler::new();
        let mut trace = Vec::with_capacity(lines.len());
        let mut idx = 0;

        while idx < lines.len() {
            let line = Line::new(lines[idx], lines.get(idx + 1).copied());
            let mut entry = LineTrace {
                line: idx + 1,
                text: line.text.to_string(),
                rule: None,
                consumed_next: None,
                opened_order: false,
                items: 0,
            };
            let mut step = 1;

            match self.first_match(self.rules, &line, assembler.context()) {
                None => {
                    tracing::warn!(line = idx + 1, text = line.text, "no rule matched, skipping line");
                }
                Some((name, outcome)) => {
                    entry.rule = Some(name);
                    match outcome {
                        Outcome::NoMatch => {}
                        Outcome::Continue(delta) => {
                            entry.items = assembler.apply(delta);
                        }
                        Outcome::ConsumesNextLine(delta) => {
                            entry.items = assembler.apply(delta);
                            entry.consumed_next = line.next.map(str::to_string);
                            step = 2;
                        }
                        Outcome::OpensNewOrder(mut opening) => {
                            let suffix = opening.suffix.take();
                            assembler.open(opening);
                            entry.opened_order = true;
                            if let Some(suffix) = suffix {
                                entry.items = self.reparse_suffix(&suffix, &mut assembler);
                            }
                        }
                    }
                }
            }

            trace.push(entry);
            idx += step;
        }

        let orders = assembler.finish();
        let elapsed = start.elapsed();
        tracing::debug!(lines = lines.len(), orders = orders.len(), ?elapsed, "message parsed");

        RunResult { orders, trace, elapsed }
    }

    /// Evaluate `rules` in order against `line` and return the first outcome
    /// that is not `NoMatch`, tagged with the rule's name.
    pub(super) fn first_match(
        &self,
        rules: &[Rule],
        line: &Line<'_>,
        context: &Context,
    ) -> Option<(&'static str, Outcome)> {
        let env = Env { directory: &self.tables.clients, families: &self.tables.families, context, options: self.options };

        for rule in rules {
            if !line.traits.activates(rule.buckets) {
                continue;
            }
            match (rule.apply)(line, &env) {
                Outcome::NoMatch => {
                    tracing::trace!(rule = rule.name, text = line.text, "rule declined");
                }
                outcome => {
                    tracing::debug!(rule = rule.name, text = line.text, "rule matched");
                    return Some((rule.name, outcome));
                }
            }
        }
        None
    }
}
