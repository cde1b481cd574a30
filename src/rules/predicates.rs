//! Line shapes shared by several rules.

use crate::Format;

/// `<qty> <abbreviation> [<format hint>]`, the abbreviation starting with a
/// non-digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct QuantityLine<'a> {
    pub quantity: u32,
    pub abbreviation: &'a str,
    pub format_hint: Option<&'a str>,
}

pub(crate) fn quantity_line(text: &str) -> Option<QuantityLine<'_>> {
    let caps = regex!(r"^([0-9]+)\s+([^0-9\s]\S*)(?:\s+(\S+))?$").captures(text.trim())?;
    Some(QuantityLine {
        quantity: caps.get(1)?.as_str().parse().ok()?,
        abbreviation: caps.get(2)?.as_str(),
        format_hint: caps.get(3).map(|m| m.as_str()),
    })
}

/// Whitespace-separated integers, optionally followed by one word (which may
/// be glued to the last integer, as in `2cool`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NumericBlock<'a> {
    pub quantities: Vec<u32>,
    pub word: Option<&'a str>,
}

pub(crate) fn numeric_block(text: &str) -> Option<NumericBlock<'_>> {
    // `3 25cl` would otherwise read as `3 25` plus the word `cl`.
    if text.split_whitespace().last().is_some_and(|t| Format::from_keyword(t).is_some()) {
        return None;
    }
    let caps = regex!(r"^([0-9]+(?:\s+[0-9]+)*)(?:\s*([^0-9\s]\S*))?$").captures(text.trim())?;
    let quantities = caps
        .get(1)?
        .as_str()
        .split_whitespace()
        .map(str::parse::<u32>)
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    Some(NumericBlock { quantities, word: caps.get(2).map(|m| m.as_str()) })
}

/// A line the double-line lookahead may read as the 25CL half of a block.
/// Quantity lines are excluded: they belong to their own rule.
pub(crate) fn is_lookahead_block(text: &str) -> bool {
    numeric_block(text).is_some() && quantity_line(text).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_lines() {
        assert_eq!(
            quantity_line("2 f 25cl"),
            Some(QuantityLine { quantity: 2, abbreviation: "f", format_hint: Some("25cl") })
        );
        assert_eq!(quantity_line("1 red").map(|q| q.abbreviation), Some("red"));
        assert!(quantity_line("1 2").is_none());
        assert!(quantity_line("3 4 5 2").is_none());
        assert!(quantity_line("f 2").is_none());
    }

    #[test]
    fn numeric_blocks() {
        let block = numeric_block("3 4 5 2").unwrap();
        assert_eq!(block.quantities, vec![3, 4, 5, 2]);
        assert_eq!(block.word, None);

        let glued = numeric_block("4 3 0 2cool").unwrap();
        assert_eq!(glued.quantities, vec![4, 3, 0, 2]);
        assert_eq!(glued.word, Some("cool"));

        let spaced = numeric_block("1 0 0 0 3 mg").unwrap();
        assert_eq!(spaced.quantities.len(), 5);
        assert_eq!(spaced.word, Some("mg"));

        assert!(numeric_block("3 x 4").is_none());
        assert!(numeric_block("aziz").is_none());
        assert!(numeric_block("99999999999").is_none());
    }

    #[test]
    fn trailing_format_keyword_is_not_a_block() {
        assert!(numeric_block("3 25cl").is_none());
        assert!(numeric_block("5l").is_none());
        assert!(numeric_block("4 2 1L").is_none());
        assert!(!is_lookahead_block("25cl"));
        assert_eq!(numeric_block("2 25").map(|b| b.quantities), Some(vec![2, 25]));
    }

    #[test]
    fn lookahead_candidates() {
        assert!(is_lookahead_block("1 0 2 0"));
        assert!(is_lookahead_block("5"));
        assert!(!is_lookahead_block("2 f"));
        assert!(!is_lookahead_block("+aziz"));
    }
}
