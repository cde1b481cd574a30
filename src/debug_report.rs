use delivra::{LineTrace, Order, OrderKind, ParseResultVerbose};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(input: &str, res: &ParseResultVerbose, color: bool) {
    let palette = ansi::Palette::new(color);
    let line_count = input.lines().filter(|l| !l.trim().is_empty()).count();
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Parsing {line_count} line(s)"), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Lines ━━━", ansi::GRAY));
    for trace in &res.details.lines {
        println!("  {}", fmt_line(trace, &palette));
    }

    println!("\n{}", palette.paint("━━━ Orders ━━━", ansi::GRAY));
    if res.orders.is_empty() {
        println!("{}", palette.dim("  No orders produced"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • No line resolved to a known client");
        println!("  • Clients were named but no item followed them");
        println!("\n{}", palette.dim("  Tip: Set RUST_LOG=delivra=debug to see rule decisions"));
    } else {
        for (idx, order) in res.orders.iter().enumerate() {
            print_order(idx, order, &palette);
        }
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Lines: {}  │  Unmatched: {}",
        palette.paint(format!("{:?}", res.details.total), ansi::GREEN),
        palette.paint(res.details.lines.len().to_string(), ansi::CYAN),
        if res.details.unmatched > 0 {
            palette.paint(res.details.unmatched.to_string(), ansi::YELLOW)
        } else {
            palette.dim("0")
        },
    );
    println!();
}

fn fmt_line(trace: &LineTrace, palette: &ansi::Palette) -> String {
    let number = palette.paint(format!("{:>3}", trace.line), ansi::GRAY);
    let Some(rule) = trace.rule else {
        return format!("{} {} {}", number, palette.dim(&trace.text), palette.paint("✗ skipped", ansi::RED));
    };

    let mut out = format!("{} {} {} {}", number, trace.text, palette.dim("│"), palette.paint(rule, ansi::BLUE));
    if trace.opened_order {
        out.push_str(&format!(" {}", palette.paint("↳ new order", ansi::CYAN)));
    }
    if let Some(next) = &trace.consumed_next {
        out.push_str(&format!(" {}", palette.dim(format!("+ \"{next}\""))));
    }
    if trace.items > 0 {
        out.push_str(&format!(" {}", palette.paint(format!("✓ {} item(s)", trace.items), ansi::GREEN)));
    }
    out
}

fn print_order(idx: usize, order: &Order, palette: &ansi::Palette) {
    let kind = match order.kind {
        OrderKind::Delivery => palette.paint("delivery", ansi::GREEN),
        OrderKind::Return => palette.paint("return", ansi::YELLOW),
    };
    println!(
        "  {} {} {} {} {}",
        palette.paint(format!("[{}]", idx), ansi::GRAY),
        palette.bold(&order.client.name),
        palette.dim(format!("({})", order.client.id)),
        palette.dim("│"),
        kind,
    );
    for item in &order.items {
        println!("      {:<10} {}", palette.paint(&item.product_id, ansi::CYAN), item.quantity);
    }
}
