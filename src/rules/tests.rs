use crate::engine::Parser;
use crate::rules::{line_rules, suffix_rules};
use crate::{AbbreviationRow, ClientDirectory, ClientRecord, FamilyTable, Options, OrderKind, Tables};

fn record(id: &str, name: &str, default_format: &str) -> ClientRecord {
    ClientRecord {
        id: id.to_string(),
        name: name.to_string(),
        zone: Some("Tunis".to_string()),
        accounting_mode: Some("Facture".to_string()),
        default_format: Some(default_format.to_string()),
    }
}

fn abbreviations(id: &str, name: &str, keys: &[&str]) -> AbbreviationRow {
    let mut keys = keys.iter().map(|k| Some(k.to_string()));
    AbbreviationRow {
        id: id.to_string(),
        name: name.to_string(),
        ab1: keys.next().flatten(),
        ab2: keys.next().flatten(),
        ab3: keys.next().flatten(),
        ..AbbreviationRow::default()
    }
}

fn tables() -> Tables {
    let records = vec![
        record("C001", "Aziz", "1"),
        record("C002", "BGH Ennasr", "25"),
        record("C003", "Café Ksouri", "5"),
        record("C004", "Fresh Market", "1"),
    ];
    let rows = vec![
        abbreviations("C001", "Aziz", &["aziz"]),
        abbreviations("C002", "Bgh Ennasr", &["bgh nasr", "bgh ennasr"]),
        abbreviations("C003", "Ksouri", &["ksouri"]),
        abbreviations("C004", "Fresh", &["fresh"]),
        abbreviations("C005", "Mourad", &["mourad"]),
    ];
    Tables::new(ClientDirectory::from_rows(records, &rows), FamilyTable::default())
}

type Summary = Vec<(String, OrderKind, Vec<(String, u32)>)>;

fn run(message: &str) -> Summary {
    let tables = tables();
    let options = Options::default();
    let rules = line_rules();
    let suffix = suffix_rules();
    Parser::new(&tables, &options, &rules, &suffix)
        .run(message)
        .into_iter()
        .map(|o| (o.client.id, o.kind, o.items.into_iter().map(|i| (i.product_id, i.quantity)).collect()))
        .collect()
}

fn delivery(client: &str, items: &[(&str, u32)]) -> (String, OrderKind, Vec<(String, u32)>) {
    (client.to_string(), OrderKind::Delivery, items.iter().map(|(p, q)| (p.to_string(), *q)).collect())
}

fn ret(client: &str, items: &[(&str, u32)]) -> (String, OrderKind, Vec<(String, u32)>) {
    (client.to_string(), OrderKind::Return, items.iter().map(|(p, q)| (p.to_string(), *q)).collect())
}

#[test]
fn message_examples() {
    let cases: Vec<(&str, Summary)> = vec![
        // positional block at the client's default format
        ("Aziz\n3 4 5 2", vec![delivery("C001", &[("C1L", 3), ("M1L", 4), ("F1L", 5), ("R1L", 2)])]),
        // 5L clients read two numbers as fraise, citron
        ("ksouri\n2 6", vec![delivery("C003", &[("F5L", 2), ("C5L", 6)])]),
        // two consecutive blocks: 1L then 25CL
        (
            "aziz\n3 4 5 2\n1 0 2 0",
            vec![delivery("C001", &[("C1L", 3), ("M1L", 4), ("F1L", 5), ("R1L", 2), ("C25CL", 1), ("F25CL", 2)])],
        ),
        // a quantity line after a block is not read as its second half
        (
            "aziz\n3 4 5 2\n2 c",
            vec![delivery("C001", &[("C1L", 3), ("M1L", 4), ("F1L", 5), ("R1L", 2), ("C1L", 2)])],
        ),
        // an explicit format keyword turns the lookahead off
        ("aziz\n1l\n3 4\n1 2", vec![delivery("C001", &[("C1L", 3), ("M1L", 4), ("C1L", 1), ("M1L", 2)])]),
        ("aziz\n25cl\n3 4", vec![delivery("C001", &[("C25CL", 3), ("M25CL", 4)])]),
        // frozen flag until `frais`
        ("aziz\nsurg\n2 mj\nfrais\n1 mj", vec![delivery("C001", &[("M1LS", 2), ("M1L", 1)])]),
        ("aziz\nSurgelé\n0 0 3", vec![delivery("C001", &[("F1LS", 3)])]),
        // trailing format only applies to its own item
        ("aziz\n2 f 25\n3 c", vec![delivery("C001", &[("F25CL", 2), ("C1L", 3)])]),
        ("aziz\n2 f 5l", vec![delivery("C001", &[("F5L", 2)])]),
        // unknown abbreviations drop the item, not the order
        ("aziz\n2 zz\n1 c", vec![delivery("C001", &[("C1L", 1)])]),
        // a trailing format token makes a format line, not a quantity
        ("aziz\n3 25cl", vec![]),
        ("aziz\n3 25cl\n1 2", vec![delivery("C001", &[("C25CL", 1), ("M25CL", 2)])]),
        ("ksouri 3 25cl", vec![delivery("C003", &[("C25CL", 3)])]),
        // a word glued to the last integer, alone or as the second line
        ("aziz\n2cool", vec![delivery("C001", &[("C1L", 2)])]),
        ("aziz\n3 4\n2cool", vec![delivery("C001", &[("C1L", 3), ("M1L", 4), ("C25CL", 2)])]),
        // fifth column
        ("aziz\n0 0 0 0 2 mg", vec![delivery("C001", &[("MG1L", 2)])]),
        ("aziz\n0 0 0 0 2", vec![delivery("C001", &[("CL1L", 2)])]),
        // suffix on the client line
        ("aziz surg\n2 c", vec![delivery("C001", &[("C1LS", 2)])]),
        ("ksouri 1l 3 4", vec![delivery("C003", &[("C1L", 3), ("M1L", 4)])]),
        ("fresh 25cl 2 mj", vec![delivery("C004", &[("M25CL", 2)])]),
        // explicit new order
        ("+bgh nasr\n1 2", vec![delivery("C002", &[("C25CL", 1), ("M25CL", 2)])]),
        (
            "aziz\n1 c\n+ bgh ennasr\n2 m",
            vec![delivery("C001", &[("C1L", 1)]), delivery("C002", &[("M25CL", 2)])],
        ),
        // returns
        ("aziz\n2 c\nretour\n1 c", vec![delivery("C001", &[("C1L", 2)]), ret("C001", &[("C1L", 1)])]),
        ("aziz\n2 c\nRetour ksouri\n2 6", vec![delivery("C001", &[("C1L", 2)]), ret("C003", &[("F5L", 2), ("C5L", 6)])]),
        ("retour\n2 c", vec![]),
        // a client without items produces no order
        ("aziz\nfresh\n1 c", vec![delivery("C004", &[("C1L", 1)])]),
        // noise is skipped without closing the open order
        ("aziz\n2 c\nmerci beaucoup\n3 m", vec![delivery("C001", &[("C1L", 2), ("M1L", 3)])]),
        (
            "aziz\n2 c\nblah blah noise\nksouri\n2 6",
            vec![delivery("C001", &[("C1L", 2)]), delivery("C003", &[("F5L", 2), ("C5L", 6)])],
        ),
        (
            "Bonjour\naziz\n2 c\n\n   \nfresh\n1 f",
            vec![delivery("C001", &[("C1L", 2)]), delivery("C004", &[("F1L", 1)])],
        ),
        // abbreviation without a client record
        ("mourad\n1 c", vec![delivery("C005", &[("C1L", 1)])]),
        // fuzzy client names
        ("aziiz\n1 c", vec![delivery("C001", &[("C1L", 1)])]),
        ("Bgh nasrr\n1 c", vec![delivery("C002", &[("C25CL", 1)])]),
        ("azizxyz\n1 c", vec![]),
        // items before any client are dropped
        ("3 4\naziz\n1 c", vec![delivery("C001", &[("C1L", 1)])]),
        ("", vec![]),
    ];

    for (input, expected) in cases {
        assert_eq!(run(input), expected, "message: {input:?}");
    }
}

#[test]
fn partial_client_opens_at_one_litre() {
    let tables = tables();
    let options = Options::default();
    let rules = line_rules();
    let suffix = suffix_rules();
    let orders = Parser::new(&tables, &options, &rules, &suffix).run("mourad\n1 2");

    assert_eq!(orders.len(), 1);
    let client = &orders[0].client;
    assert_eq!(client.name, "Mourad");
    assert_eq!(client.default_format, "1");
    assert_eq!(client.zone, None);
}

#[test]
fn double_line_is_traced_once() {
    let tables = tables();
    let options = Options::default();
    let rules = line_rules();
    let suffix = suffix_rules();
    let run = Parser::new(&tables, &options, &rules, &suffix).run_with_trace("aziz\n3 4\n1 2\nmerci");

    assert_eq!(run.trace.len(), 3);
    assert_eq!(run.trace[1].rule, Some("numeric block"));
    assert_eq!(run.trace[1].consumed_next.as_deref(), Some("1 2"));
    assert_eq!(run.trace[1].items, 4);
    assert_eq!(run.trace[2].line, 4);
    assert_eq!(run.trace[2].rule, None);
}

#[test]
fn disabling_double_line_reads_blocks_separately() {
    let tables = tables();
    let options = Options { double_line: false, ..Options::default() };
    let rules = line_rules();
    let suffix = suffix_rules();
    let orders = Parser::new(&tables, &options, &rules, &suffix).run("aziz\n3\n1");

    let ids: Vec<_> = orders[0].items.iter().map(|i| i.product_id.as_str()).collect();
    assert_eq!(ids, vec!["C1L", "C1L"]);
}

#[test]
fn suffix_passes_are_bounded() {
    let tables = tables();
    let options = Options { suffix_passes: 1, ..Options::default() };
    let rules = line_rules();
    let suffix = suffix_rules();
    let orders = Parser::new(&tables, &options, &rules, &suffix).run("aziz surg 2 c");

    // the only pass sets the frozen flag; `2 c` is never read
    assert!(orders.is_empty());
}
