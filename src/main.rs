mod debug_report;

use chrono::{Local, NaiveDateTime};
use delivra::{FamilyTable, JsonLinesSink, Options, OrderSink, Tables, parse_verbose_with};
use std::fs::OpenOptions;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DIRECTORY_ENV: &str = "DELIVRA_DIRECTORY";

fn main() {
    init_tracing();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = run(config) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).try_init();
}

fn run(config: CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut tables = Tables::load(&config.directory)?;
    if let Some(path) = &config.families {
        tables.families = FamilyTable::load(path)?;
    }

    let res = parse_verbose_with(&config.input, &tables, &config.options);

    if config.json {
        println!("{}", serde_json::to_string_pretty(&res.orders)?);
    } else {
        debug_report::print_run(&config.input, &res, config.color);
    }

    if let Some(path) = &config.record {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut sink = JsonLinesSink::new(file);
        let at = config.reference.unwrap_or_else(|| Local::now().naive_local());
        let mut rows = 0;
        for order in &res.orders {
            rows += sink.record(order, at)?.len();
        }
        tracing::info!(path = %path.display(), orders = res.orders.len(), rows, "recorded deliveries");
    }

    Ok(())
}

struct CliConfig {
    input: String,
    directory: PathBuf,
    families: Option<PathBuf>,
    options: Options,
    json: bool,
    record: Option<PathBuf>,
    reference: Option<NaiveDateTime>,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut directory: Option<PathBuf> = std::env::var_os(DIRECTORY_ENV).map(PathBuf::from);
    let mut families: Option<PathBuf> = None;
    let mut options = Options::default();
    let mut json = false;
    let mut record: Option<PathBuf> = None;
    let mut reference: Option<NaiveDateTime> = None;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };
        let mut value = |name: &str| -> Result<String, String> {
            inline.clone().or_else(|| args.next()).ok_or_else(|| format!("error: {name} expects a value"))
        };

        match flag.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("delivra {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--json" => json = true,
            "-d" | "--directory" => directory = Some(PathBuf::from(value("--directory")?)),
            "--families" => families = Some(PathBuf::from(value("--families")?)),
            "--record" => record = Some(PathBuf::from(value("--record")?)),
            "--reference" => reference = Some(parse_reference(&value("--reference")?)?),
            "--max-distance" => {
                let raw = value("--max-distance")?;
                options.fuzzy_max_distance =
                    raw.parse().map_err(|_| format!("error: invalid --max-distance '{raw}' (expected an integer)"))?;
            }
            "--no-double-line" => options.double_line = false,
            "--input" | "-i" => {
                let text = value("--input")?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(text);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join("\n");
                if !rest.trim().is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                // Each remaining argument is one message line.
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join("\n");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(rest);
                break;
            }
        }
    }

    let Some(directory) = directory else {
        return Err(format!("error: no client directory given (use --directory or {DIRECTORY_ENV})\n\n{}", help_text()));
    };

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, directory, families, options, json, record, reference, color })
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn parse_reference(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .map_err(|_| format!("error: invalid --reference '{value}' (expected YYYY-MM-DDTHH:MM:SS)"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "delivra {version}

Turn delivery messages into orders.

Usage:
  delivra [OPTIONS] --directory <file> [--] <line...>
  delivra [OPTIONS] --directory <file> --input <text>
  delivra [OPTIONS] --directory <file> < message.txt

Options:
  -d, --directory <file>     Client directory JSON (clients, abbreviations,
                             optional families). Env: {directory_env}
  -i, --input <text>         Message to parse. If omitted, reads remaining args
                             (one per line) or stdin.
  --families <file>          Family table JSON, replacing the directory's.
  --max-distance <n>         Largest edit distance for fuzzy client names.
                             Default: 2
  --no-double-line           Never read two numeric lines as 1L + 25CL.
  --json                     Print orders as JSON instead of the report.
  --record <file>            Append delivery records (JSON lines) to <file>.
  --reference <timestamp>    Record timestamp in YYYY-MM-DDTHH:MM:SS.
                             Default: now
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Logging:
  RUST_LOG=delivra=debug     Show rule decisions on stderr.

Exit codes:
  0  Success.
  1  Directory, family table or record file error.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        directory_env = DIRECTORY_ENV,
    )
}
