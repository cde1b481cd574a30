//! Text normalization shared by the tables and the rules.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Keyword that opens a return order when it starts a line.
pub(crate) const RETURN_KEYWORD: &str = "retour";
/// Substring marking frozen goods (`surgelé`, `surgl`, `surgelees`, ...).
pub(crate) const FROZEN_MARKER: &str = "surg";
/// Token switching back to fresh goods.
pub(crate) const FRESH_MARKER: &str = "frais";

/// Remove combining marks after canonical decomposition (`é` -> `e`).
pub(crate) fn strip_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Trim, lowercase and strip diacritics.
pub(crate) fn fold(s: &str) -> String {
    strip_diacritics(&s.trim().to_lowercase())
}

/// Client abbreviation keys are only trimmed and lowercased.
pub(crate) fn client_key(s: &str) -> String {
    s.trim().to_lowercase()
}

pub(crate) fn is_integer(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// True for tokens that only ever carry a setting (format, frozen, fresh).
pub(crate) fn is_reserved_keyword(token: &str) -> bool {
    let folded = fold(token);
    crate::Format::from_keyword(&folded).is_some() || folded.contains(FROZEN_MARKER) || folded == FRESH_MARKER
}

/// Join every token but the one at `skip`.
pub(crate) fn join_without(tokens: &[&str], skip: usize) -> String {
    tokens.iter().enumerate().filter(|(idx, _)| *idx != skip).map(|(_, t)| *t).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_strips_accents_and_case() {
        assert_eq!(fold("  Surgelé "), "surgele");
        assert_eq!(fold("FRAÎCHE"), "fraiche");
        assert_eq!(strip_diacritics("Café"), "Cafe");
    }

    #[test]
    fn reserved_keywords() {
        assert!(is_reserved_keyword("25CL"));
        assert!(is_reserved_keyword("Surgelées"));
        assert!(is_reserved_keyword("frais"));
        assert!(!is_reserved_keyword("aziz"));
        assert!(!is_reserved_keyword("25"));
    }

    #[test]
    fn integers_are_ascii_digit_runs() {
        assert!(is_integer("042"));
        assert!(!is_integer("2cool"));
        assert!(!is_integer(""));
        assert!(!is_integer("-3"));
    }

    #[test]
    fn join_without_drops_one_token() {
        assert_eq!(join_without(&["a", "b", "c"], 1), "a c");
        assert_eq!(join_without(&["a"], 0), "");
    }
}
