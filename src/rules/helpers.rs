use crate::families::{BLOCK_FAMILIES, COOL, FIVE_LITRE_FAMILIES};
use crate::rules::predicates::NumericBlock;
use crate::{FamilyTable, Format, LineItem, product_id};

/// Append an item unless its quantity is zero.
pub(crate) fn push_item(items: &mut Vec<LineItem>, family_code: &str, format: Format, frozen: bool, quantity: u32) {
    if quantity == 0 {
        return;
    }
    items.push(LineItem { product_id: product_id(family_code, format, frozen), quantity });
}

/// Decode a numeric block at `format`.
///
/// ```text
/// 5L, two numbers:   [F, C]
/// otherwise:         [C, M, F, R] (+ 5th: trailing word's family, else Cool)
/// ```
///
/// Missing trailing columns and zeros produce nothing; columns past the
/// fifth are ignored.
pub(crate) fn interpret_block(
    block: &NumericBlock<'_>,
    format: Format,
    frozen: bool,
    families: &FamilyTable,
) -> Vec<LineItem> {
    let mut items = Vec::new();

    if format == Format::L5 && block.quantities.len() == FIVE_LITRE_FAMILIES.len() {
        for (family, &qty) in FIVE_LITRE_FAMILIES.iter().zip(&block.quantities) {
            push_item(&mut items, family, format, frozen, qty);
        }
        return items;
    }

    for (family, &qty) in BLOCK_FAMILIES.iter().zip(&block.quantities) {
        push_item(&mut items, family, format, frozen, qty);
    }

    if let Some(&extra) = block.quantities.get(BLOCK_FAMILIES.len()) {
        let family = block.word.and_then(|w| families.family_code(w)).unwrap_or(COOL);
        push_item(&mut items, family, format, frozen, extra);
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::predicates::numeric_block;

    fn decode(line: &str, format: Format, frozen: bool) -> Vec<(String, u32)> {
        let block = numeric_block(line).unwrap();
        interpret_block(&block, format, frozen, &FamilyTable::default())
            .into_iter()
            .map(|i| (i.product_id, i.quantity))
            .collect()
    }

    fn pairs(expected: &[(&str, u32)]) -> Vec<(String, u32)> {
        expected.iter().map(|(id, q)| (id.to_string(), *q)).collect()
    }

    #[test]
    fn positional_default_mapping() {
        assert_eq!(decode("3 4 5", Format::L1, false), pairs(&[("C1L", 3), ("M1L", 4), ("F1L", 5)]));
        assert_eq!(decode("0 2 0 1", Format::Cl25, false), pairs(&[("M25CL", 2), ("R25CL", 1)]));
    }

    #[test]
    fn five_litre_pairs_are_fraise_then_citron() {
        assert_eq!(decode("2 6", Format::L5, false), pairs(&[("F5L", 2), ("C5L", 6)]));
        assert_eq!(decode("2 6 1", Format::L5, false), pairs(&[("C5L", 2), ("M5L", 6), ("F5L", 1)]));
    }

    #[test]
    fn fifth_column_uses_trailing_word_or_cool() {
        assert_eq!(decode("1 0 0 0 3 mg", Format::L1, false), pairs(&[("C1L", 1), ("MG1L", 3)]));
        assert_eq!(decode("1 0 0 0 3", Format::L1, false), pairs(&[("C1L", 1), ("CL1L", 3)]));
        assert_eq!(decode("0 0 0 0 2 zz", Format::L1, true), pairs(&[("CL1LS", 2)]));
        assert_eq!(decode("1 1 1 1 1 1 1", Format::L3, false).len(), 5);
    }
}
