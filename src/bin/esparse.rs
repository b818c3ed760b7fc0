//! CLI tool that parses a JavaScript file and prints its ESTree JSON
//!
//! Usage: esparse [options] [file]
//!
//! Options:
//!   --module           Parse with the module goal
//!   --strict           Start in strict mode
//!   --loc              Attach line/column locations to every node
//!   --no-web-compat    Disable the Annex B allowances
//!   --max-depth <n>    Maximum syntactic nesting (default: 256)
//!
//! Reads standard input when no file (or `-`) is given.

use std::env;
use std::fs;
use std::io::{self, Read};

use esparse::ParseOptions;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// CLI configuration
struct Config {
    input: Option<String>,
    options: ParseOptions,
}

fn parse_args() -> Result<Config, String> {
    let args: Vec<String> = env::args().collect();
    let program_name = args.first().map_or("esparse", |s| s.as_str());

    let mut options = ParseOptions::default();
    let mut input: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        let Some(arg) = args.get(i) else {
            break;
        };
        match arg.as_str() {
            "--module" => options = options.with_module(true),
            "--strict" => options = options.with_strict(true),
            "--loc" => options = options.with_loc(true),
            "--no-web-compat" => options = options.with_web_compat(false),
            "--max-depth" => {
                i += 1;
                let depth = args
                    .get(i)
                    .ok_or_else(|| "--max-depth requires a value".to_string())?
                    .parse::<u32>()
                    .map_err(|_| "--max-depth must be a positive integer".to_string())?;
                options = options.with_max_nesting_depth(depth);
            }
            "-" => input = None,
            other if other.starts_with('-') => {
                return Err(format!(
                    "Unknown option: {}\nUsage: {} [--module] [--strict] [--loc] [--no-web-compat] [--max-depth <n>] [file]",
                    other, program_name
                ));
            }
            other => input = Some(other.to_string()),
        }
        i += 1;
    }

    Ok(Config { input, options })
}

fn run() -> Result<(), String> {
    let config = parse_args()?;

    let (name, source) = match &config.input {
        Some(path) => {
            let source =
                fs::read_to_string(path).map_err(|e| format!("Cannot read {}: {}", path, e))?;
            (path.as_str(), source)
        }
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .map_err(|e| format!("Cannot read standard input: {}", e))?;
            ("<stdin>", source)
        }
    };

    let program = esparse::parse(&source, &config.options).map_err(|e| format!("{}: {}", name, e))?;
    let json = serde_json::to_string_pretty(&program.to_estree())
        .map_err(|e| format!("Cannot serialize syntax tree: {}", e))?;
    println!("{}", json);
    Ok(())
}
